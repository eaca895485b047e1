use thiserror::Error;

use crate::publickey::PublicKey;

/// Errors raised while constructing keys, instructions, messages or
/// transactions from caller-supplied input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid blockhash: {0}")]
    InvalidBlockhash(String),

    #[error("no instructions provided")]
    NoInstructions,

    #[error("recent blockhash required")]
    MissingBlockhash,

    #[error("account {0} missing from the account table")]
    MissingAccountKey(PublicKey),

    #[error("too many accounts: {0} (max 256)")]
    TooManyAccounts(usize),

    #[error("too many signatures to encode: {0}")]
    TooManySignatures(usize),

    #[error("transaction too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("signature has invalid length: {0} (expected 64)")]
    InvalidSignatureLength(usize),

    #[error("seed exceeds {max} bytes: {len}")]
    SeedTooLong { len: usize, max: usize },

    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),
}

/// Errors raised when an operation is called out of order in the
/// transaction lifecycle (e.g. serializing before signing).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("transaction not signed")]
    NotSigned,

    #[error("transaction not signed correctly")]
    NotSignedCorrectly,

    #[error("unknown signer: {0}")]
    UnknownSigner(PublicKey),

    #[error("no signers or fee payer set")]
    NoSigners,
}

/// Failures of the signing backend itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    #[error("produced signature has invalid length: {0}")]
    InvalidSignatureLength(usize),
}

/// Errors raised while decoding wire bytes or text encodings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid content: {0}")]
    Invalid(String),

    #[error("base58 decode failed: {0}")]
    Base58(String),
}

/// Top-level error for the transaction library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    #[error("transaction build error: {0}")]
    Build(#[from] BuildError),

    #[error("transaction state error: {0}")]
    State(#[from] StateError),

    #[error("signing error: {0}")]
    Sign(#[from] SignError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}
