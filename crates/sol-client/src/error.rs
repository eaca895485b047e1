use thiserror::Error;

use sol_tx::SolError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("failed to decode RPC response: {0}")]
    Decode(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid commitment: {0}")]
    InvalidCommitment(String),

    #[error(transparent)]
    Transaction(#[from] SolError),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}
