use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::chat::ChatError;
use crate::chat::types::{PromptRequest, PromptResponse};
use crate::config::NetworkConfig;

/// One request/response exchange with the chat service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_prompt(&self, prompt: &str) -> Result<String, ChatError>;

    fn endpoint(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    pub endpoint: String,
    pub(crate) inner: reqwest::Client,
}

impl ChatClient {
    pub fn with_network_config(
        endpoint: impl Into<String>,
        cfg: NetworkConfig,
    ) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if cfg.connect_timeout_ms > 0 {
            builder = builder.connect_timeout(Duration::from_millis(cfg.connect_timeout_ms));
        }
        if cfg.request_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(cfg.request_timeout_ms));
        }
        Ok(Self {
            endpoint: endpoint.into(),
            inner: builder.build()?,
        })
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn send_prompt(&self, prompt: &str) -> Result<String, ChatError> {
        let req = PromptRequest { prompt };
        debug!(endpoint=%self.endpoint, prompt_len=prompt.len(), "sending prompt");

        let resp = self
            .inner
            .post(&self.endpoint)
            .headers(Self::headers())
            .json(&req)
            .send()
            .await
            .map_err(ChatError::Transport)?;

        // The status is informational only; the body decides the outcome.
        let status = resp.status();
        if !status.is_success() {
            warn!(status=%status.as_u16(), "chat endpoint returned non-success status");
        }

        let text = resp.text().await.map_err(ChatError::Body)?;
        let body: PromptResponse = serde_json::from_str(&text)?;
        let reply = body.into_text();
        info!(status=%status.as_u16(), reply_len=reply.len(), "chat response received");
        Ok(reply)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatErrorKind;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    fn client_for(url: impl Into<String>) -> ChatClient {
        ChatClient::with_network_config(url, NetworkConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn send_prompt_happy_path() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/chat"),
                request::headers(contains(("content-type", "application/json"))),
                request::body(json_decoded(eq(serde_json::json!({"prompt": "  Hello "})))),
            ])
            .respond_with(json_encoded(serde_json::json!({"response": "Hi there"}))),
        );

        let client = client_for(server.url_str("/chat"));
        let reply = client.send_prompt("  Hello ").await.unwrap();
        assert_eq!(reply, "Hi there");
    }

    #[tokio::test]
    async fn missing_response_field_is_empty() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/chat"))
                .respond_with(json_encoded(serde_json::json!({"answer": "nope"}))),
        );
        let client = client_for(server.url_str("/chat"));
        assert_eq!(client.send_prompt("x").await.unwrap(), "");
    }

    #[tokio::test]
    async fn non_success_status_with_json_body_is_read() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/chat")).respond_with(
                status_code(500)
                    .append_header("Content-Type", "application/json")
                    .body(r#"{"error":"boom"}"#),
            ),
        );
        let client = client_for(server.url_str("/chat"));
        assert_eq!(client.send_prompt("x").await.unwrap(), "");
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/chat"))
                .respond_with(status_code(200).body("<html>oops</html>")),
        );
        let client = client_for(server.url_str("/chat"));
        let err = client.send_prompt("x").await.unwrap_err();
        assert_eq!(err.kind(), ChatErrorKind::Decode);
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        // Grab a free port and close it again so nothing is listening.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let client = client_for(format!("http://127.0.0.1:{port}/chat"));
        let err = client.send_prompt("x").await.unwrap_err();
        assert_eq!(err.kind(), ChatErrorKind::Network);
    }

    #[tokio::test]
    async fn slow_server_hits_timeout() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/chat")).respond_with(
                delay_and_then(
                    Duration::from_millis(500),
                    json_encoded(serde_json::json!({"response": "late"})),
                ),
            ),
        );
        let client = ChatClient::with_network_config(
            server.url_str("/chat"),
            NetworkConfig {
                connect_timeout_ms: 1_000,
                request_timeout_ms: 50,
            },
        )
        .unwrap();
        let err = client.send_prompt("x").await.unwrap_err();
        assert_eq!(err.kind(), ChatErrorKind::Timeout);
    }
}
