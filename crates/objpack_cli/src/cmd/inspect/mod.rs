use std::path::PathBuf;

use objpack::pack::{Result, Unpacker, unpack_values};
use serde_json::json;

use crate::cmd::json::value_to_json;
use crate::cmd::print::{PrintOptions, render_value};
use crate::cmd::util::{load_options, read_stream};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-array")]
	pub max_array: Option<usize>,
	#[arg(long)]
	pub options: Option<PathBuf>,
}

/// Decode every top-level value of a packed stream and print it.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file,
		json,
		max_depth,
		max_array,
		options,
	} = args;

	let pack_options = load_options(options.as_deref())?;
	let (compression, bytes) = read_stream(&file)?;
	let mut unpacker = Unpacker::with_options(&bytes, &pack_options);
	let values = unpack_values(&mut unpacker)?;

	if json {
		let doc = json!({
			"path": file.display().to_string(),
			"compression": compression.as_str(),
			"bytes": bytes.len(),
			"values": values.iter().map(value_to_json).collect::<Vec<_>>(),
		});
		println!("{doc}");
		return Ok(());
	}

	let mut print = PrintOptions::default();
	if let Some(max_depth) = max_depth {
		print.max_print_depth = max_depth;
	}
	if let Some(max_array) = max_array {
		print.max_array_items = max_array;
	}

	println!("path: {}", file.display());
	println!("compression: {}", compression.as_str());
	println!("bytes: {}", bytes.len());
	println!("values: {}", values.len());
	for (index, value) in values.iter().enumerate() {
		println!("[{index}]");
		print!("{}", render_value(value, 2, print));
	}

	Ok(())
}

#[cfg(test)]
mod tests;
