use std::path::PathBuf;

use objpack::pack::{PackCodec, Packer, Result, ValueCodec, encode_zstd};

use crate::cmd::json::json_to_value;

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	#[arg(short, long)]
	pub output: PathBuf,
	#[arg(long)]
	pub zstd: bool,
	#[arg(long, default_value_t = 3)]
	pub level: i32,
}

/// Encode a JSON document as one packed value.
pub fn run(args: Args) -> Result<()> {
	let Args { input, output, zstd, level } = args;

	let raw = std::fs::read(&input)?;
	let doc: serde_json::Value = serde_json::from_slice(&raw).map_err(std::io::Error::from)?;

	let mut packer = Packer::new();
	ValueCodec.pack(&mut packer, &json_to_value(&doc))?;
	let packed = packer.into_inner();
	let packed_len = packed.len();

	let bytes = if zstd { encode_zstd(&packed, level)? } else { packed };
	std::fs::write(&output, &bytes)?;

	println!("wrote {} bytes ({packed_len} packed) to {}", bytes.len(), output.display());
	Ok(())
}

#[cfg(test)]
mod tests;
