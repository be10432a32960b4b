//! Client configuration.

use crate::{error::ClientError, reconnect::ReconnectPolicy};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CHANNEL: &str = "chat";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without trailing slash, `http(s)://` scheme
    http_base: String,
    /// Base URL with `ws(s)://` scheme
    ws_base: String,
    pub channel: String,
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Build a config from the relay's base URL.
    ///
    /// Accepts `http(s)://` or `ws(s)://`; the other scheme is derived.
    pub fn new(
        server_url: &str,
        channel: impl Into<String>,
        reconnect: ReconnectPolicy,
    ) -> Result<Self, ClientError> {
        let base = server_url.trim().trim_end_matches('/');
        let (http_base, ws_base) = if let Some(rest) = base.strip_prefix("http://") {
            (base.to_string(), format!("ws://{rest}"))
        } else if let Some(rest) = base.strip_prefix("https://") {
            (base.to_string(), format!("wss://{rest}"))
        } else if let Some(rest) = base.strip_prefix("ws://") {
            (format!("http://{rest}"), base.to_string())
        } else if let Some(rest) = base.strip_prefix("wss://") {
            (format!("https://{rest}"), base.to_string())
        } else {
            return Err(ClientError::InvalidUrl(server_url.to_string()));
        };

        if http_base.ends_with("://") {
            return Err(ClientError::InvalidUrl(server_url.to_string()));
        }

        Ok(Self {
            http_base,
            ws_base,
            channel: channel.into(),
            reconnect,
        })
    }

    /// WebSocket endpoint
    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.ws_base)
    }

    /// Ingress endpoint
    pub fn send_url(&self) -> String {
        format!("{}/api/chat/send", self.http_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_url_derives_ws_url() {
        // テスト項目: http の URL から ws の URL が導出される
        // when (操作):
        let config =
            ClientConfig::new("http://127.0.0.1:8080/", "chat", ReconnectPolicy::default())
                .unwrap();

        // then (期待する結果):
        assert_eq!(config.ws_url(), "ws://127.0.0.1:8080/ws");
        assert_eq!(config.send_url(), "http://127.0.0.1:8080/api/chat/send");
    }

    #[test]
    fn test_wss_url_derives_https_url() {
        // テスト項目: wss の URL から https の送信先が導出される
        // when (操作):
        let config =
            ClientConfig::new("wss://chat.example.com", "chat", ReconnectPolicy::default())
                .unwrap();

        // then (期待する結果):
        assert_eq!(config.ws_url(), "wss://chat.example.com/ws");
        assert_eq!(config.send_url(), "https://chat.example.com/api/chat/send");
    }

    #[test]
    fn test_unknown_scheme_fails() {
        // テスト項目: 未対応のスキームや空のホストはエラーになる
        // then (期待する結果):
        assert!(ClientConfig::new("ftp://host", "chat", ReconnectPolicy::default()).is_err());
        assert!(ClientConfig::new("127.0.0.1:8080", "chat", ReconnectPolicy::default()).is_err());
        assert!(ClientConfig::new("http://", "chat", ReconnectPolicy::default()).is_err());
    }
}
