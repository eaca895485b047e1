//! Thin JSON-RPC client for submitting `sol-tx` transactions.
//!
//! Covers only what the transaction flow needs: account info, a recent
//! blockhash and raw transaction submission. The transport is pluggable via
//! [`RpcSender`] so the crate carries no HTTP stack of its own.

pub mod client;
pub mod commitment;
pub mod config;
pub mod error;
pub mod rpc;
pub mod types;

pub use client::Client;
pub use commitment::Commitment;
pub use config::{ClientConfig, Cluster};
pub use error::ClientError;
pub use rpc::{clean_response, RpcRequest, RpcSender};
pub use types::{AccountInfo, Blockhash};
