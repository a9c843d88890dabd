use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform outcome of one executor operation.
///
/// Serializes as a flat JSON object: `success`, `message`, optional `action`,
/// then any action-specific fields (`pid`, `hwnd`, `processes`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionResult {
    pub fn ok(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            action: Some(action.into()),
            extra: Map::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            action: None,
            extra: Map::new(),
        }
    }

    /// Attach an action-specific field. Failures never carry extra fields.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if self.success {
            self.extra.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_serializes_flat() {
        let result = ActionResult::ok("volume_up", "Volume raised 3 step(s)").with("steps", 3);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Volume raised 3 step(s)",
                "action": "volume_up",
                "steps": 3
            })
        );
    }

    #[test]
    fn test_failure_drops_extra() {
        let result = ActionResult::failure("no window").with("hwnd", 1);
        assert!(result.extra.is_empty());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"success": false, "message": "no window"}));
    }
}
