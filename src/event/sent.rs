//! Events sent from the plugin to the host.

use std::collections::HashMap;

use serde::Serialize;

/// Discriminator of the feedback message.
pub const SET_FEEDBACK: &str = "setFeedback";

/// Update the layout values shown for an action instance.
///
/// All three fields are always serialized, even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetFeedbackEvent {
    event: &'static str,
    /// Action instance the feedback targets.
    pub context: String,
    /// Layout item key to new value.
    pub payload: HashMap<String, String>,
}

impl SetFeedbackEvent {
    /// Create a feedback message for `context`.
    pub fn new(context: impl Into<String>, payload: HashMap<String, String>) -> Self {
        Self {
            event: SET_FEEDBACK,
            context: context.into(),
            payload,
        }
    }

    /// The `event` field, always `"setFeedback"`.
    pub fn event(&self) -> &'static str {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_feedback_wire_format() {
        let mut payload = HashMap::new();
        payload.insert("value".to_string(), "40%".to_string());

        let msg = SetFeedbackEvent::new("ctx-1", payload);
        let parsed: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(parsed["event"], "setFeedback");
        assert_eq!(parsed["context"], "ctx-1");
        assert_eq!(parsed["payload"]["value"], "40%");
    }

    #[test]
    fn test_set_feedback_empty_fields_present() {
        let msg = SetFeedbackEvent::new("", HashMap::new());
        let parsed: serde_json::Value = serde_json::to_value(&msg).unwrap();
        let obj = parsed.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(obj["context"], "");
        assert!(obj["payload"].as_object().unwrap().is_empty());
    }
}
