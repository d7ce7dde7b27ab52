//! JSON-RPC 2.0 envelopes exchanged with the node.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Code reported for legacy error envelopes that carry only a message.
pub const LEGACY_ERROR_CODE: i64 = -32000;

/// Outgoing request. Lives for the duration of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: String,
}

impl RequestEnvelope {
    pub fn new(method: impl Into<String>, params: Vec<Value>, id: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// Incoming response: either a `result` or an `error`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorPayload>,
}

impl ResponseEnvelope {
    /// Whether the response id refers to the request `id`.
    ///
    /// Absent and null ids are accepted; some nodes omit them.
    pub fn answers(&self, id: &str) -> bool {
        match &self.id {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s == id,
            Some(Value::Number(n)) => n.to_string() == id,
            Some(_) => false,
        }
    }
}

/// The `error` member of a response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Object(RpcErrorObject),
    /// Older nodes answer `{"error": "message"}`.
    Text(String),
}

impl ErrorPayload {
    pub fn code(&self) -> i64 {
        match self {
            ErrorPayload::Object(obj) => obj.code,
            ErrorPayload::Text(_) => LEGACY_ERROR_CODE,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ErrorPayload::Object(obj) => &obj.message,
            ErrorPayload::Text(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Page descriptor that paginated methods return in the `result` position.
///
/// Decoding is two-stage: the envelope result decodes into
/// `Paginated<Value>`, then `result` is decoded again as the element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Paginated<T = Value> {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub result: T,
}

impl<T> Paginated<T> {
    /// Replace the payload, keeping the page metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Paginated<U> {
        Paginated {
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
            result: f(self.result),
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
