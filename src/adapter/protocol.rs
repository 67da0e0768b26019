use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Newline-delimited JSON envelope exchanged with an external UI adapter.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdapterMessage {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: AdapterMessageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdapterMessageContent {
    Request {
        command: String,
        arguments: Option<Value>,
    },
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        message: Option<String>,
        body: Option<Value>,
    },
    Event {
        event: String,
        body: Option<Value>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips() {
        let json = r#"{"seq":1,"type":"request","command":"start","arguments":null}"#;
        let msg: AdapterMessage = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(msg.seq, 1);
        match msg.content {
            AdapterMessageContent::Request { command, .. } => assert_eq!(command, "start"),
            other => panic!("expected a request, got {:?}", other),
        }
    }

    #[test]
    fn request_with_arguments() {
        let json = r#"{"seq":2,"type":"request","command":"toggleBreakpoint","arguments":{"line":3}}"#;
        let msg: AdapterMessage = serde_json::from_str(json).expect("should deserialize");
        match msg.content {
            AdapterMessageContent::Request { arguments, .. } => {
                let line = arguments
                    .and_then(|a| a.get("line").and_then(Value::as_u64))
                    .expect("line argument");
                assert_eq!(line, 3);
            }
            other => panic!("expected a request, got {:?}", other),
        }
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let msg = AdapterMessage {
            seq: 7,
            msg_type: "event".to_string(),
            content: AdapterMessageContent::Event {
                event: "stopped".to_string(),
                body: Some(serde_json::json!({"reason": "breakpoint", "pausedAt": 2})),
            },
        };
        let json = serde_json::to_value(&msg).expect("should serialize");
        assert_eq!(json["type"], "event");
        assert_eq!(json["event"], "stopped");
        assert_eq!(json["body"]["pausedAt"], 2);
    }
}
