//! Normalized request parameters and the coercion rules applied to them.

use crate::error::DispatchError;
use remote_pc_executor::os::keys::KeyCode;
use remote_pc_executor::os::window::WindowHandle;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// String-to-string parameter bag. Query strings, form bodies and JSON
/// bodies all collapse into this before dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a JSON object. Strings are kept as-is, numbers and booleans
    /// become their text, arrays and objects their JSON text, and `null`
    /// counts as absent.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Array(_) | Value::Object(_) => value.to_string(),
                };
                Some((key.clone(), text))
            })
            .collect()
    }

    /// Overlay `other` on top of this bag; its values win.
    pub fn merge(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    /// Repeat count. Missing, unparsable or non-positive input means 1.
    pub fn steps(&self) -> u32 {
        self.get("steps")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|n| n.clamp(1, i64::from(u32::MAX)) as u32)
            .unwrap_or(1)
    }

    /// True only for `true`, `1` or `yes`, any case.
    pub fn force(&self) -> bool {
        self.get("force")
            .map(|raw| {
                let raw = raw.trim().to_ascii_lowercase();
                matches!(raw.as_str(), "true" | "1" | "yes")
            })
            .unwrap_or(false)
    }

    /// Explicit window handle. `None` (absent or unparsable) means the
    /// foreground window.
    pub fn hwnd(&self) -> Option<WindowHandle> {
        self.get("hwnd")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(WindowHandle)
    }

    /// Ordered key list from a JSON array, given either as a JSON-encoded
    /// string or as a native array flattened to its JSON text.
    pub fn keys(&self) -> Result<Vec<KeyCode>, DispatchError> {
        let raw = self.required("keys", json!({"keys": "[17,67]"}))?;

        let parsed: Value = serde_json::from_str(raw)
            .map_err(|_| DispatchError::validation("keys is malformed, expected a JSON array"))?;
        let items = parsed
            .as_array()
            .ok_or_else(|| DispatchError::validation("keys must be an array"))?;
        if items.is_empty() {
            return Err(DispatchError::validation_with_example(
                "keys must not be empty",
                json!({"keys": "[17,67]"}),
            ));
        }

        items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .map(KeyCode)
                    .ok_or_else(|| {
                        DispatchError::validation(format!(
                            "keys must be integers between 0 and 255, got {item}"
                        ))
                    })
            })
            .collect()
    }

    /// A parameter that must be present and non-blank.
    pub fn required(&self, key: &str, example: Value) -> Result<&str, DispatchError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(DispatchError::validation_with_example(
                format!("Missing required parameter: {key}"),
                example,
            )),
        }
    }

    /// A parameter that defaults to the empty string.
    pub fn optional(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Params {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
