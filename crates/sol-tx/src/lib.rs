//! Solana transaction construction for native clients.
//!
//! This crate builds, signs and serializes legacy Solana transactions
//! without pulling in `solana-sdk`. It owns the parts that must be
//! byte-exact for the network to accept a payload: the compact-u16 length
//! codec, the account-table ordering rules of the message compiler, and the
//! signature/message wire layout.
//!
//! Signing uses `ed25519-dalek`; addresses and blockhashes are Base58 via
//! `bs58`. Nothing here performs I/O. Fetching a blockhash and submitting
//! the bytes is left to a transport (see the `sol-client` crate).

pub mod constants;
pub mod error;
pub mod hash;
pub mod instruction;
pub mod keypair;
pub mod message;
pub mod publickey;
pub mod shortvec;
pub mod signature;
pub mod system_instruction;
pub mod transaction;
pub mod units;

// Re-export key public types for ergonomic imports.
pub use constants::{LAMPORTS_PER_SOL, PACKET_DATA_SIZE, SYSTEM_PROGRAM_ID};
pub use error::{BuildError, DecodeError, SignError, SolError, StateError};
pub use hash::Hash;
pub use instruction::{AccountMeta, CompiledInstruction, Instruction};
pub use keypair::Keypair;
pub use message::{Message, MessageHeader};
pub use publickey::PublicKey;
pub use shortvec::{decode_length, encode_length};
pub use signature::Signature;
pub use system_instruction::SystemInstruction;
pub use transaction::{
    NonceInfo, SignaturePair, Transaction, TransactionConfig, TransactionState,
};
pub use units::{lamports_to_sol, sol_to_lamports};
