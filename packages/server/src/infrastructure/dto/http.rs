//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat/send`
///
/// `message` is optional here so a missing field can be answered with 400
/// by the handler instead of a framework rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Client-side send time (ISO 8601); informational only
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `{"status":"ok"}` / `{"status":"error","error":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(reason.into()),
        }
    }
}

/// Channel summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSummaryDto {
    pub name: String,
    pub subscribers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ok_serialization() {
        // テスト項目: 成功レスポンスは {"status":"ok"} のみになる
        // when (操作):
        let json = serde_json::to_string(&StatusResponse::ok()).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_send_message_request_missing_message() {
        // テスト項目: message フィールドが無いリクエストもパースでき、None になる
        // when (操作):
        let request: SendMessageRequest =
            serde_json::from_str(r#"{"timestamp":"2025-01-01T00:00:00Z"}"#).unwrap();

        // then (期待する結果):
        assert!(request.message.is_none());
        assert!(request.timestamp.is_some());
    }
}
