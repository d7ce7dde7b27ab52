use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use crate::error::TransportError;

/// Carries one serialized request to the node and returns the raw response.
///
/// Implementations decide timeouts and connection reuse. The client makes
/// exactly one `send` per call and never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: String) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: String) -> Result<String, TransportError> {
        (**self).send(request).await
    }
}

/// HTTP POST transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.rpc_url(),
        })
    }

    /// URL every request is posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: self.url.clone(),
            }
        } else {
            TransportError::Http(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: String) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            tracing::debug!(url = %self.url, status = status.as_u16(), "node returned HTTP error");
            if carries_rpc_error(&body) {
                return Ok(body);
            }
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Whether `body` is a JSON-RPC error envelope. Nodes may send these with a
/// non-2xx status.
fn carries_rpc_error(body: &str) -> bool {
    serde_json::from_str::<ResponseEnvelope>(body).is_ok_and(|envelope| envelope.error.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;

    #[test]
    fn http_transport_posts_to_rpc_path() {
        let config = ClientConfig::with_endpoint("http://127.0.0.1:7077/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url(), "http://127.0.0.1:7077/rpc");
    }

    #[tokio::test]
    async fn error_envelope_survives_http_500() {
        let body = r#"{"jsonrpc":"2.0","id":"1","error":{"code":-32000,"message":"chain not found"}}"#;
        let url = serve_once("500 Internal Server Error", body).await;
        let transport = HttpTransport::new(&ClientConfig::with_endpoint(url)).unwrap();

        assert_eq!(transport.send("{}".into()).await.unwrap(), body);
    }

    #[tokio::test]
    async fn plain_http_error_is_a_status_error() {
        let url = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;
        let transport = HttpTransport::new(&ClientConfig::with_endpoint(url)).unwrap();

        match transport.send("{}".into()).await {
            Err(TransportError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.contains("bad gateway"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn only_error_envelopes_pass_through() {
        assert!(carries_rpc_error(r#"{"error":"legacy failure"}"#));
        assert!(!carries_rpc_error(r#"{"jsonrpc":"2.0","id":"1","result":3}"#));
        assert!(!carries_rpc_error("Service Unavailable"));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_transport_error() {
        // Port 9 (discard) is closed on loopback in practice.
        let config = ClientConfig {
            timeout_secs: 2,
            ..ClientConfig::with_endpoint("http://127.0.0.1:9")
        };
        let transport = HttpTransport::new(&config).unwrap();
        let err = transport.send("{}".into()).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Http(_) | TransportError::Timeout { .. }
        ));
    }
}
