//! The generic call executor behind every catalogue method.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::{Paginated, RequestEnvelope, ResponseEnvelope};
use crate::error::ClientError;
use crate::methods::{self, MethodDescriptor, ResultShape};
use crate::transport::{HttpTransport, Transport};

/// Client for a Phantasma node.
///
/// Owns its transport; callers only see typed values and [`ClientError`].
/// Shareable across tasks when the transport is.
pub struct PhantasmaClient<T = HttpTransport> {
    transport: T,
    next_id: AtomicU64,
}

impl PhantasmaClient<HttpTransport> {
    /// Connect to `endpoint` (e.g. `http://localhost:7077`) with default settings.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::from_config(&ClientConfig::with_endpoint(endpoint))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        tracing::debug!(url = transport.url(), "phantasma client created");
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> PhantasmaClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke `method` and decode its result as `R`.
    ///
    /// `R` is the element type for single results and `Vec<element>` for list
    /// and paginated results. Page metadata of paginated results is dropped;
    /// use [`PhantasmaClient::call_page`] to keep it.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &MethodDescriptor,
        args: Vec<Value>,
    ) -> Result<R, ClientError> {
        let result = self.execute(method, args).await?;
        let result = match method.shape {
            ResultShape::Paginated => Self::unwrap_page(method, result)?.result,
            ResultShape::Single | ResultShape::List => result,
        };
        serde_json::from_value(result)
            .map_err(|e| ClientError::decode(method.wire_name(), method.expected_shape(), e))
    }

    /// Invoke a paginated `method`, keeping the page metadata.
    pub async fn call_page<E: DeserializeOwned>(
        &self,
        method: &MethodDescriptor,
        args: Vec<Value>,
    ) -> Result<Paginated<Vec<E>>, ClientError> {
        if !method.is_paginated() {
            return Err(ClientError::InvalidArguments {
                method: method.wire_name(),
                reason: "method is not paginated".into(),
            });
        }
        let result = self.execute(method, args).await?;
        let Paginated {
            page,
            page_size,
            total,
            total_pages,
            result,
        } = Self::unwrap_page(method, result)?;
        let items: Vec<E> = serde_json::from_value(result)
            .map_err(|e| ClientError::decode(method.wire_name(), method.expected_shape(), e))?;
        Ok(Paginated {
            page,
            page_size,
            total,
            total_pages,
            result: items,
        })
    }

    /// Invoke a catalogue method by name (any casing) with JSON arguments.
    ///
    /// The result is decoded against the declared shape and handed back as
    /// JSON, so schema violations still fail with [`ClientError::Decode`].
    pub async fn call_by_name(&self, name: &str, args: Vec<Value>) -> Result<Value, ClientError> {
        let method = methods::find(name).ok_or_else(|| ClientError::UnknownMethod(name.to_string()))?;
        let result = self.execute(method, args).await?;
        let conformed = match method.shape {
            ResultShape::Single => method.returns.conform(result),
            ResultShape::List => method.returns.conform_list(result),
            ResultShape::Paginated => {
                let page = Self::unwrap_page(method, result)?;
                method.returns.conform_list(page.result)
            }
        };
        conformed.map_err(|e| ClientError::decode(method.wire_name(), method.expected_shape(), e))
    }

    /// Validate, send and unwrap the envelope of one call.
    async fn execute(&self, method: &MethodDescriptor, args: Vec<Value>) -> Result<Value, ClientError> {
        let wire_name = method.wire_name();
        method
            .check_args(&args)
            .map_err(|reason| ClientError::InvalidArguments {
                method: wire_name.clone(),
                reason,
            })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let request = RequestEnvelope::new(wire_name.as_str(), args, id.as_str());
        let body = serde_json::to_string(&request).map_err(ClientError::Encode)?;

        tracing::debug!(method = %wire_name, %id, "sending rpc request");
        tracing::trace!(%body, "rpc request");

        let response = self.transport.send(body).await?;
        tracing::trace!(%response, "rpc response");

        let envelope: ResponseEnvelope = serde_json::from_str(&response)
            .map_err(|e| ClientError::decode(wire_name.as_str(), "JSON-RPC response envelope", e))?;

        if let Some(error) = &envelope.error {
            tracing::warn!(
                method = %wire_name,
                code = error.code(),
                message = error.message(),
                "node rejected rpc call"
            );
            return Err(ClientError::Rpc {
                code: error.code(),
                message: error.message().to_string(),
            });
        }

        if !envelope.answers(&id) {
            return Err(ClientError::decode(
                wire_name,
                "JSON-RPC response envelope",
                serde_json::Error::custom(format!(
                    "response id {:?} does not match request id {id:?}",
                    envelope.id
                )),
            ));
        }

        envelope.result.ok_or_else(|| {
            ClientError::decode(
                wire_name,
                method.expected_shape(),
                serde_json::Error::custom("response carries neither a result nor an error"),
            )
        })
    }

    /// First decode stage of a paginated result.
    fn unwrap_page(method: &MethodDescriptor, result: Value) -> Result<Paginated, ClientError> {
        serde_json::from_value(result).map_err(|e| ClientError::decode(method.wire_name(), "page descriptor", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::methods::{GET_BLOCK_HEIGHT, GET_CHAINS, GET_TOKEN_TRANSFERS};
    use crate::testing::{serve_once, ScriptedTransport};
    use crate::types::{Chain, Transaction};
    use serde_json::json;

    #[tokio::test]
    async fn node_error_with_http_500_is_an_rpc_error() {
        let url = serve_once(
            "500 Internal Server Error",
            r#"{"jsonrpc":"2.0","id":"1","error":{"code":-32000,"message":"chain not found"}}"#,
        )
        .await;
        let client = PhantasmaClient::new(url).unwrap();

        match client.get_block_height("nope").await {
            Err(ClientError::Rpc { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "chain not found");
            }
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    struct ClosedChannel;

    #[async_trait::async_trait]
    impl Transport for ClosedChannel {
        async fn send(&self, _request: String) -> Result<String, TransportError> {
            Err(TransportError::Unavailable("channel closed".into()))
        }
    }

    #[tokio::test]
    async fn custom_transport_reports_unavailable() {
        let client = PhantasmaClient::with_transport(ClosedChannel);
        match client.get_chains().await {
            Err(ClientError::Transport(TransportError::Unavailable(reason))) => {
                assert_eq!(reason, "channel closed");
            }
            other => panic!("expected unavailable transport, got {other:?}"),
        }
        assert!(!client.is_connected().await);
    }

    #[tokio::test]
    async fn http_503_without_envelope_stays_a_transport_error() {
        let url = serve_once("503 Service Unavailable", "down for maintenance").await;
        let client = PhantasmaClient::new(url).unwrap();

        let err = client.get_chains().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::Status { status: 503, .. })
        ));
    }

    fn client(transport: ScriptedTransport) -> PhantasmaClient<ScriptedTransport> {
        PhantasmaClient::with_transport(transport)
    }

    fn tx_json(hash: &str) -> Value {
        json!({
            "hash": hash,
            "chainAddress": "main",
            "timestamp": 100,
            "confirmations": 1,
            "blockHeight": 1,
            "blockHash": "0xabc",
            "script": "",
            "events": [],
            "result": ""
        })
    }

    #[tokio::test]
    async fn request_ids_are_unique_per_call() {
        let c = client(
            ScriptedTransport::new()
                .reply(json!({ "result": 1 }))
                .reply(json!({ "result": 2 })),
        );
        let a: u64 = c.call(&GET_BLOCK_HEIGHT, vec![json!("main")]).await.unwrap();
        let b: u64 = c.call(&GET_BLOCK_HEIGHT, vec![json!("main")]).await.unwrap();
        assert_eq!((a, b), (1, 2));

        let sent = c.transport().requests();
        assert_eq!(sent[0]["jsonrpc"], "2.0");
        assert_eq!(sent[0]["method"], "getBlockHeight");
        assert_ne!(sent[0]["id"], sent[1]["id"]);
        assert!(sent[0]["id"].is_string());
    }

    #[tokio::test]
    async fn invalid_arguments_are_not_sent() {
        let c = client(ScriptedTransport::new());
        let err = c
            .call::<u64>(&GET_BLOCK_HEIGHT, vec![json!("main"), json!(1)])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidArguments { .. }));
        assert!(c.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_surfaces_once() {
        let c = client(ScriptedTransport::new().fail(TransportError::Timeout {
            url: "http://node/rpc".into(),
        }));
        let err = c.call::<Vec<Chain>>(&GET_CHAINS, vec![]).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::Timeout { .. })
        ));
        assert_eq!(c.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn error_envelope_wins_over_result() {
        let c = client(ScriptedTransport::new().reply(json!({
            "result": 5,
            "error": { "code": -32000, "message": "chain not found" }
        })));
        let err = c
            .call::<u64>(&GET_BLOCK_HEIGHT, vec![json!("nope")])
            .await
            .unwrap_err();
        match err {
            ClientError::Rpc { code, message } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "chain not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_envelopes_are_decode_errors() {
        let c = client(
            ScriptedTransport::new()
                .reply_raw("<html>bad gateway</html>")
                .reply(json!({ "jsonrpc": "2.0", "id": "1" }))
                .reply(json!({ "result": null }))
                .reply(json!({ "result": 3, "id": "999" })),
        );
        for _ in 0..4 {
            let err = c
                .call::<u64>(&GET_BLOCK_HEIGHT, vec![json!("main")])
                .await
                .unwrap_err();
            assert!(matches!(err, ClientError::Decode { .. }), "got {err}");
        }
    }

    #[tokio::test]
    async fn wrong_shape_names_method_and_expectation() {
        let c = client(ScriptedTransport::new().reply(json!({ "result": { "name": "main" } })));
        let err = c.call::<Vec<Chain>>(&GET_CHAINS, vec![]).await.unwrap_err();
        match err {
            ClientError::Decode { method, expected, .. } => {
                assert_eq!(method, "getChains");
                assert_eq!(expected, "list of Chain");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn paginated_call_returns_inner_list_only() {
        let page = json!({
            "result": {
                "page": 1,
                "pageSize": 5,
                "total": 12,
                "totalPages": 3,
                "result": [tx_json("0x1")]
            }
        });
        let c = client(ScriptedTransport::new().reply(page.clone()).reply(page));

        let txs: Vec<Transaction> = c
            .call(
                &GET_TOKEN_TRANSFERS,
                vec![json!("SOUL"), json!(1), json!(5)],
            )
            .await
            .unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].hash, "0x1");

        let paged = c
            .call_page::<Transaction>(
                &GET_TOKEN_TRANSFERS,
                vec![json!("SOUL"), json!(1), json!(5)],
            )
            .await
            .unwrap();
        assert_eq!(paged.total, 12);
        assert_eq!(paged.total_pages, 3);
        assert_eq!(paged.result[0].hash, "0x1");
    }

    #[tokio::test]
    async fn paginated_call_rejects_bare_list() {
        let c = client(ScriptedTransport::new().reply(json!({ "result": [tx_json("0x1")] })));
        let err = c
            .call::<Vec<Transaction>>(
                &GET_TOKEN_TRANSFERS,
                vec![json!("SOUL"), json!(1), json!(5)],
            )
            .await
            .unwrap_err();
        match err {
            ClientError::Decode { expected, .. } => assert_eq!(expected, "page descriptor"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn paginated_inner_result_must_be_a_list() {
        let c = client(ScriptedTransport::new().reply(json!({
            "result": { "page": 1, "pageSize": 5, "total": 1, "totalPages": 1, "result": tx_json("0x1") }
        })));
        let err = c
            .call::<Vec<Transaction>>(
                &GET_TOKEN_TRANSFERS,
                vec![json!("SOUL"), json!(1), json!(5)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn call_page_refuses_unpaginated_methods() {
        let c = client(ScriptedTransport::new());
        let err = c.call_page::<Chain>(&GET_CHAINS, vec![]).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn call_by_name_normalizes_and_conforms() {
        let c = client(
            ScriptedTransport::new()
                .reply(json!({ "result": 42 }))
                .reply(json!({ "result": "forty-two" })),
        );
        let height = c
            .call_by_name("get_block_height", vec![json!("main")])
            .await
            .unwrap();
        assert_eq!(height, json!(42));
        assert_eq!(c.transport().requests()[0]["method"], "getBlockHeight");

        let err = c
            .call_by_name("GetBlockHeight", vec![json!("main")])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn call_by_name_unknown_method() {
        let c = client(ScriptedTransport::new());
        let err = c.call_by_name("getPeers", vec![]).await.unwrap_err();
        assert!(matches!(err, ClientError::UnknownMethod(name) if name == "getPeers"));
    }

    #[tokio::test]
    async fn call_by_name_unwraps_pages() {
        let c = client(ScriptedTransport::new().reply(json!({
            "result": { "page": 1, "pageSize": 5, "total": 1, "totalPages": 1, "result": [tx_json("0x9")] }
        })));
        let value = c
            .call_by_name("getTokenTransfers", vec![json!("SOUL"), json!(1), json!(5)])
            .await
            .unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["hash"], "0x9");
    }

    #[test]
    fn from_config_validates() {
        let config = ClientConfig::with_endpoint("node.example.org");
        assert!(matches!(
            PhantasmaClient::from_config(&config),
            Err(ClientError::Config(_))
        ));
        assert!(PhantasmaClient::new("http://localhost:7077").is_ok());
    }
}
