use serde::{Deserialize, Serialize};

/// Uniform result envelope returned for every dispatched command.
///
/// On success `message` carries the payload and `error` is absent. On failure
/// `error` carries the description and `message` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: String::new(),
            error: Some(error.into()),
        }
    }

    /// The text a caller should display: the message on success, the error
    /// otherwise.
    pub fn text(&self) -> &str {
        if self.success {
            &self.message
        } else {
            self.error.as_deref().unwrap_or_default()
        }
    }

    /// Serialize to the stable JSON wire form (`success`, `message`, `error`).
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(err) => format!(
                "{{\"success\":false,\"message\":\"\",\"error\":{:?}}}",
                err.to_string()
            ),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn success_omits_error_field() {
        let json = CommandResponse::ok("Model set to gpt-x").to_json();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], Value::Bool(true));
        assert_eq!(value["message"], "Model set to gpt-x");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_carries_error_and_empty_message() {
        let response = CommandResponse::failure("usage: /model set <name>");
        let parsed = CommandResponse::from_json(&response.to_json()).unwrap();
        assert_eq!(parsed, response);
        assert!(!parsed.success);
        assert!(parsed.message.is_empty());
        assert_eq!(parsed.text(), "usage: /model set <name>");
    }

    #[test]
    fn multiline_payloads_survive_serialization() {
        let response = CommandResponse::ok("first\nsecond \"quoted\"");
        let parsed = CommandResponse::from_json(&response.to_json()).unwrap();
        assert_eq!(parsed.message, "first\nsecond \"quoted\"");
    }
}
