use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};
use serde_json::{json, Value};

use sol_tx::{PublicKey, Transaction};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::rpc::{clean_response, RpcRequest, RpcSender};
use crate::types::{AccountInfo, Blockhash};

/// RPC client over a caller-supplied transport.
pub struct Client<S> {
    sender: S,
    config: ClientConfig,
    next_id: AtomicU64,
}

impl<S: RpcSender> Client<S> {
    pub fn new(sender: S, config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            sender,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: &str, params: Vec<Value>) -> RpcRequest {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        RpcRequest::new(id, method, params)
    }

    fn call(&self, request: RpcRequest) -> Result<Value, ClientError> {
        debug!("rpc {} (id {}) -> {}", request.method, request.id, self.config.endpoint);
        let response = self.sender.send(&request)?;
        clean_response(response)
    }

    pub fn get_account_info(&self, pubkey: &PublicKey) -> Result<AccountInfo, ClientError> {
        let request = self
            .request(
                "getAccountInfo",
                vec![json!(pubkey.to_string()), json!({"encoding": "base64"})],
            )
            .with_commitment(self.config.commitment);

        let value = self.call(request)?;
        if value.is_null() {
            return Err(ClientError::AccountNotFound(pubkey.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch a blockhash to anchor a new transaction (`getLatestBlockhash`).
    pub fn get_recent_blockhash(&self) -> Result<Blockhash, ClientError> {
        let request = self
            .request("getLatestBlockhash", vec![])
            .with_commitment(self.config.commitment);
        let blockhash: Blockhash = serde_json::from_value(self.call(request)?)?;
        blockhash.hash()?;
        Ok(blockhash)
    }

    /// Submit already-serialized transaction bytes. Returns the transaction
    /// signature reported by the node.
    pub fn send_raw_transaction(&self, wire: &[u8]) -> Result<String, ClientError> {
        let request = self.request(
            "sendTransaction",
            vec![json!(base64::encode(wire)), json!({"encoding": "base64"})],
        );
        let signature: String = serde_json::from_value(self.call(request)?)?;
        info!("submitted transaction {signature} ({} bytes)", wire.len());
        Ok(signature)
    }

    /// Fetch a blockhash if the transaction has none, sign, serialize and
    /// submit.
    pub fn send_transaction(&self, transaction: &mut Transaction) -> Result<String, ClientError> {
        if transaction.recent_blockhash.is_none() && transaction.nonce_info.is_none() {
            let blockhash = self.get_recent_blockhash()?;
            debug!("using blockhash {}", blockhash.blockhash);
            transaction.recent_blockhash = Some(blockhash.blockhash);
        }

        transaction.sign()?;
        let wire = transaction.serialize()?;
        self.send_raw_transaction(&wire)
    }
}
