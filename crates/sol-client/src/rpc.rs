//! JSON-RPC 2.0 framing.
//!
//! The crate never opens a connection itself. Callers plug an HTTP (or any
//! other) transport in through [`RpcSender`], which receives a fully built
//! request and hands back the raw JSON response body.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::commitment::Commitment;
use crate::error::ClientError;

/// The transport that carries requests to a node.
pub trait RpcSender {
    /// Send one request and return the response body as JSON.
    fn send(&self, request: &RpcRequest) -> Result<Value, ClientError>;
}

impl<T: RpcSender + ?Sized> RpcSender for &T {
    fn send(&self, request: &RpcRequest) -> Result<Value, ClientError> {
        (**self).send(request)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: &str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.to_string(),
            params,
        }
    }

    /// Attach a commitment level.
    ///
    /// Merged into a trailing config object when there is one, otherwise
    /// appended as `{"commitment": ...}`.
    pub fn with_commitment(mut self, commitment: Option<Commitment>) -> Self {
        let Some(commitment) = commitment else {
            return self;
        };
        let value = Value::String(commitment.to_string());
        match self.params.last_mut() {
            Some(Value::Object(config)) => {
                config.insert("commitment".to_string(), value);
            }
            _ => {
                let mut config = Map::new();
                config.insert("commitment".to_string(), value);
                self.params.push(Value::Object(config));
            }
        }
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "jsonrpc": self.jsonrpc,
            "id": self.id,
            "method": self.method,
            "params": self.params,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Strip the JSON-RPC envelope from a response.
///
/// An `error` member becomes [`ClientError::Rpc`]. Otherwise `result` is
/// returned, unwrapped from its `{context, value}` wrapper when it has one.
pub fn clean_response(mut response: Value) -> Result<Value, ClientError> {
    if let Some(error) = response.get_mut("error").filter(|e| e.is_object()) {
        let err: RpcErrorObject = serde_json::from_value(error.take())?;
        return Err(ClientError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    let Some(mut result) = response.get_mut("result").map(Value::take) else {
        return Err(ClientError::Decode("response has no result".into()));
    };

    match result.get_mut("value") {
        Some(value) => Ok(value.take()),
        None => Ok(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope() {
        let req = RpcRequest::new(7, "getLatestBlockhash", vec![]);
        assert_eq!(
            req.to_json(),
            json!({"jsonrpc": "2.0", "id": 7, "method": "getLatestBlockhash", "params": []})
        );
        assert_eq!(serde_json::to_value(&req).unwrap(), req.to_json());
    }

    #[test]
    fn commitment_appended_as_object() {
        let req = RpcRequest::new(1, "getBalance", vec![json!("abc")])
            .with_commitment(Some(Commitment::Confirmed));
        assert_eq!(req.params, vec![json!("abc"), json!({"commitment": "confirmed"})]);
    }

    #[test]
    fn commitment_merged_into_config() {
        let req = RpcRequest::new(1, "getAccountInfo", vec![json!("abc"), json!({"encoding": "base64"})])
            .with_commitment(Some(Commitment::Processed));
        assert_eq!(
            req.params[1],
            json!({"encoding": "base64", "commitment": "processed"})
        );
    }

    #[test]
    fn no_commitment_leaves_params() {
        let req = RpcRequest::new(1, "getSlot", vec![]).with_commitment(None);
        assert!(req.params.is_empty());
    }

    #[test]
    fn clean_unwraps_value() {
        let resp = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"context": {"slot": 5}, "value": {"blockhash": "abc"}}
        });
        assert_eq!(clean_response(resp).unwrap(), json!({"blockhash": "abc"}));
    }

    #[test]
    fn clean_keeps_plain_result() {
        let resp = json!({"jsonrpc": "2.0", "id": 1, "result": "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW"});
        assert!(clean_response(resp).unwrap().is_string());
    }

    #[test]
    fn clean_keeps_null_value() {
        let resp = json!({"jsonrpc": "2.0", "id": 1, "result": {"context": {"slot": 5}, "value": null}});
        assert!(clean_response(resp).unwrap().is_null());
    }

    #[test]
    fn clean_maps_error_object() {
        let resp = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "Invalid params"}
        });
        assert_eq!(
            clean_response(resp).unwrap_err(),
            ClientError::Rpc {
                code: -32602,
                message: "Invalid params".into()
            }
        );
    }

    #[test]
    fn clean_rejects_missing_result() {
        let resp = json!({"jsonrpc": "2.0", "id": 1});
        assert!(matches!(clean_response(resp), Err(ClientError::Decode(_))));
    }
}
