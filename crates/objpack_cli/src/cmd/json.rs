use objpack::pack::Value;
use serde_json::{Map, Number, Value as Json, json};

/// Convert a decoded value into JSON. Non-string map keys are rendered as compact JSON text.
pub(crate) fn value_to_json(value: &Value) -> Json {
	match value {
		Value::Nil => Json::Null,
		Value::Bool(v) => Json::Bool(*v),
		Value::Int(v) => Json::from(*v),
		Value::UInt(v) => Json::from(*v),
		Value::F32(v) => float_json(f64::from(*v)),
		Value::F64(v) => float_json(*v),
		Value::Str(v) => Json::String(v.to_string()),
		Value::Bin(v) => json!({ "bin": v }),
		Value::Ext { kind, data } => json!({ "ext": kind, "data": data }),
		Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
		Value::Map(entries) => {
			let mut out = Map::with_capacity(entries.len());
			for (key, item) in entries {
				out.insert(key_label(key), value_to_json(item));
			}
			Json::Object(out)
		}
	}
}

/// Convert a JSON document into a packable value.
pub(crate) fn json_to_value(json: &Json) -> Value {
	match json {
		Json::Null => Value::Nil,
		Json::Bool(v) => Value::Bool(*v),
		Json::Number(n) => number_value(n),
		Json::String(v) => Value::from(v.as_str()),
		Json::Array(items) => Value::Array(items.iter().map(json_to_value).collect()),
		Json::Object(entries) => Value::Map(entries.iter().map(|(key, item)| (Value::from(key.as_str()), json_to_value(item))).collect()),
	}
}

fn number_value(n: &Number) -> Value {
	if let Some(v) = n.as_u64() {
		Value::UInt(v)
	} else if let Some(v) = n.as_i64() {
		Value::Int(v)
	} else {
		Value::F64(n.as_f64().unwrap_or(f64::NAN))
	}
}

fn float_json(v: f64) -> Json {
	Number::from_f64(v).map_or(Json::Null, Json::Number)
}

fn key_label(key: &Value) -> String {
	match key {
		Value::Str(v) => v.to_string(),
		other => value_to_json(other).to_string(),
	}
}
