use std::fmt::{self, Write};

use objpack::pack::Value;

/// Output truncation limits for rendered values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of items printed for arrays and maps.
	pub max_array_items: usize,
	/// Maximum nested depth printed before collapsing.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_array_items: 16,
			max_print_depth: 6,
		}
	}
}

/// Render one value tree as indented text, one line per scalar.
pub fn render_value(value: &Value, indent: usize, options: PrintOptions) -> String {
	let mut out = String::new();
	// Writing into a String cannot fail.
	let _ = write_value(&mut out, value, indent, 0, options);
	out
}

fn write_value(out: &mut String, value: &Value, indent: usize, depth: u32, options: PrintOptions) -> fmt::Result {
	let pad = " ".repeat(indent);
	match value {
		Value::Array(items) => {
			if depth >= options.max_print_depth {
				return writeln!(out, "{pad}[... {} items]", items.len());
			}
			writeln!(out, "{pad}[")?;
			for item in items.iter().take(options.max_array_items) {
				write_value(out, item, indent + 2, depth + 1, options)?;
			}
			if items.len() > options.max_array_items {
				writeln!(out, "{pad}  ... {} more", items.len() - options.max_array_items)?;
			}
			writeln!(out, "{pad}]")
		}
		Value::Map(entries) => {
			if depth >= options.max_print_depth {
				return writeln!(out, "{pad}{{ ... {} entries }}", entries.len());
			}
			writeln!(out, "{pad}{{")?;
			for (key, item) in entries.iter().take(options.max_array_items) {
				write!(out, "{pad}  {} = ", scalar_label(key, options))?;
				if matches!(item, Value::Array(_) | Value::Map(_)) {
					writeln!(out)?;
					write_value(out, item, indent + 4, depth + 1, options)?;
				} else {
					writeln!(out, "{}", scalar_label(item, options))?;
				}
			}
			if entries.len() > options.max_array_items {
				writeln!(out, "{pad}  ... {} more entries", entries.len() - options.max_array_items)?;
			}
			writeln!(out, "{pad}}}")
		}
		scalar => writeln!(out, "{pad}{}", scalar_label(scalar, options)),
	}
}

fn scalar_label(value: &Value, options: PrintOptions) -> String {
	match value {
		Value::Nil => "nil".to_owned(),
		Value::Bool(v) => v.to_string(),
		Value::Int(v) => v.to_string(),
		Value::UInt(v) => v.to_string(),
		Value::F32(v) => v.to_string(),
		Value::F64(v) => v.to_string(),
		Value::Str(v) => format!("\"{}\"", truncate(v, options.max_string_len)),
		Value::Bin(v) => format!("bin[{}]", v.len()),
		Value::Ext { kind, data } => format!("ext({kind})[{}]", data.len()),
		Value::Array(items) => format!("[{} items]", items.len()),
		Value::Map(entries) => format!("{{{} entries}}", entries.len()),
	}
}

fn truncate(value: &str, max_chars: usize) -> String {
	if value.chars().count() <= max_chars {
		return value.to_owned();
	}
	let mut out: String = value.chars().take(max_chars).collect();
	out.push_str("...");
	out
}
