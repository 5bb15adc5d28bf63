//! Console argument values and their flattening into log text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Rendering used when an argument carries no value, unserializable value, or description.
pub const UNDEFINED_PLACEHOLDER: &str = "undefined";

/// Mirror of the runtime's `RemoteObject`, restricted to the fields used for rendering.
///
/// `value` distinguishes an absent field from an explicit JSON `null`; the
/// latter is how `console.log(null)` arrives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtype: Option<String>,
	#[serde(
		default,
		deserialize_with = "present",
		skip_serializing_if = "Option::is_none"
	)]
	pub value: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unserializable_value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
	D: Deserializer<'de>,
{
	Value::deserialize(deserializer).map(Some)
}

impl RemoteObject {
	/// Renders this argument as text.
	///
	/// First match wins: `value`, then `unserializableValue`, then
	/// `description`, then [`UNDEFINED_PLACEHOLDER`].
	pub fn render(&self) -> String {
		if let Some(value) = &self.value {
			return match value {
				Value::String(s) => s.clone(),
				other => other.to_string(),
			};
		}
		if let Some(raw) = &self.unserializable_value {
			return raw.clone();
		}
		if let Some(description) = &self.description {
			return description.clone();
		}
		UNDEFINED_PLACEHOLDER.to_string()
	}
}

/// Space-joins the rendering of each argument.
pub fn join_args(args: &[RemoteObject]) -> String {
	args.iter()
		.map(RemoteObject::render)
		.collect::<Vec<_>>()
		.join(" ")
}
