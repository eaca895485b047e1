//! Network-wide constants.

use crate::publickey::PublicKey;

/// Length of a public key / account address in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of a blockhash in bytes.
pub const HASH_LENGTH: usize = 32;

/// Maximum length of a single seed for derived addresses.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds for program derived addresses.
pub const MAX_SEEDS: usize = 16;

/// Maximum over-the-wire size of a transaction: the IPv6 minimum MTU (1280)
/// minus the IPv6 header (40) and the UDP header (8).
pub const PACKET_DATA_SIZE: usize = 1280 - 40 - 8;

/// Signature counts at or above this cannot be serialized.
pub const MAX_SIGNATURES: usize = 64 * 4;

/// Number of lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Fractional digits kept when converting lamports to SOL.
pub const SOL_FLOATING_PRECISION: usize = 9;

/// The System Program: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: PublicKey = PublicKey::new([0u8; 32]);

/// `SysvarRecentB1ockHashes11111111111111111111`
pub const SYSVAR_RECENT_BLOCKHASHES_ID: PublicKey = PublicKey::new([
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x56, 0x8e, 0xe0, 0x8a, 0x84, 0x5f, 0x73, 0xd2, 0x97,
    0x88, 0xcf, 0x03, 0x5c, 0x31, 0x45, 0xb2, 0x1a, 0xb3, 0x44, 0xd8, 0x06, 0x2e, 0xa9, 0x40,
    0x00, 0x00,
]);

/// `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: PublicKey = PublicKey::new([
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1,
    0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00,
    0x00, 0x00,
]);

/// Size of a nonce account's data.
pub const NONCE_ACCOUNT_LENGTH: u64 = 80;
