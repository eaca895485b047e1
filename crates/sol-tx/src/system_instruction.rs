//! System Program instructions.
//!
//! Every System Program instruction's data is a little-endian `u32`
//! discriminant followed by fixed-layout arguments:
//!
//! ```text
//! u64 fields      8 bytes LE
//! key fields      32 raw bytes
//! seed strings    u32 LE length | 4 zero bytes | UTF-8 bytes
//! ```
//!
//! Builders take typed parameter structs and return ready-to-compile
//! [`Instruction`]s with the account layout the System Program expects.

use crate::constants::{
    NONCE_ACCOUNT_LENGTH, SYSTEM_PROGRAM_ID, SYSVAR_RECENT_BLOCKHASHES_ID, SYSVAR_RENT_ID,
};
use crate::error::DecodeError;
use crate::instruction::{AccountMeta, Instruction};
use crate::publickey::PublicKey;
use crate::shortvec::ByteReader;

/// A decoded System Program instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemInstruction {
    CreateAccount {
        lamports: u64,
        space: u64,
        owner: PublicKey,
    },
    Assign {
        owner: PublicKey,
    },
    Transfer {
        lamports: u64,
    },
    CreateAccountWithSeed {
        base: PublicKey,
        seed: String,
        lamports: u64,
        space: u64,
        owner: PublicKey,
    },
    AdvanceNonceAccount,
    WithdrawNonceAccount {
        lamports: u64,
    },
    InitializeNonceAccount {
        authority: PublicKey,
    },
    AuthorizeNonceAccount {
        new_authority: PublicKey,
    },
    Allocate {
        space: u64,
    },
    AllocateWithSeed {
        base: PublicKey,
        seed: String,
        space: u64,
        owner: PublicKey,
    },
    AssignWithSeed {
        base: PublicKey,
        seed: String,
        owner: PublicKey,
    },
    TransferWithSeed {
        lamports: u64,
        from_seed: String,
        from_owner: PublicKey,
    },
}

impl SystemInstruction {
    pub fn discriminant(&self) -> u32 {
        match self {
            Self::CreateAccount { .. } => 0,
            Self::Assign { .. } => 1,
            Self::Transfer { .. } => 2,
            Self::CreateAccountWithSeed { .. } => 3,
            Self::AdvanceNonceAccount => 4,
            Self::WithdrawNonceAccount { .. } => 5,
            Self::InitializeNonceAccount { .. } => 6,
            Self::AuthorizeNonceAccount { .. } => 7,
            Self::Allocate { .. } => 8,
            Self::AllocateWithSeed { .. } => 9,
            Self::AssignWithSeed { .. } => 10,
            Self::TransferWithSeed { .. } => 11,
        }
    }

    /// Encode to instruction data.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&self.discriminant().to_le_bytes());

        match self {
            Self::CreateAccount {
                lamports,
                space,
                owner,
            } => {
                buf.extend_from_slice(&lamports.to_le_bytes());
                buf.extend_from_slice(&space.to_le_bytes());
                buf.extend_from_slice(owner.as_ref());
            }
            Self::Assign { owner } => buf.extend_from_slice(owner.as_ref()),
            Self::Transfer { lamports } | Self::WithdrawNonceAccount { lamports } => {
                buf.extend_from_slice(&lamports.to_le_bytes());
            }
            Self::CreateAccountWithSeed {
                base,
                seed,
                lamports,
                space,
                owner,
            } => {
                buf.extend_from_slice(base.as_ref());
                put_seed(&mut buf, seed);
                buf.extend_from_slice(&lamports.to_le_bytes());
                buf.extend_from_slice(&space.to_le_bytes());
                buf.extend_from_slice(owner.as_ref());
            }
            Self::AdvanceNonceAccount => {}
            Self::InitializeNonceAccount { authority } => {
                buf.extend_from_slice(authority.as_ref());
            }
            Self::AuthorizeNonceAccount { new_authority } => {
                buf.extend_from_slice(new_authority.as_ref());
            }
            Self::Allocate { space } => buf.extend_from_slice(&space.to_le_bytes()),
            Self::AllocateWithSeed {
                base,
                seed,
                space,
                owner,
            } => {
                buf.extend_from_slice(base.as_ref());
                put_seed(&mut buf, seed);
                buf.extend_from_slice(&space.to_le_bytes());
                buf.extend_from_slice(owner.as_ref());
            }
            Self::AssignWithSeed { base, seed, owner } => {
                buf.extend_from_slice(base.as_ref());
                put_seed(&mut buf, seed);
                buf.extend_from_slice(owner.as_ref());
            }
            Self::TransferWithSeed {
                lamports,
                from_seed,
                from_owner,
            } => {
                buf.extend_from_slice(&lamports.to_le_bytes());
                put_seed(&mut buf, from_seed);
                buf.extend_from_slice(from_owner.as_ref());
            }
        }

        buf
    }

    /// Decode instruction data.
    ///
    /// Short data is [`DecodeError::Truncated`]; an unknown discriminant,
    /// bad seed padding, invalid UTF-8 or trailing bytes are
    /// [`DecodeError::Invalid`].
    pub fn unpack(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(data);
        let discriminant = r.read_u32_le()?;

        let ix = match discriminant {
            0 => Self::CreateAccount {
                lamports: r.read_u64_le()?,
                space: r.read_u64_le()?,
                owner: read_pubkey(&mut r)?,
            },
            1 => Self::Assign {
                owner: read_pubkey(&mut r)?,
            },
            2 => Self::Transfer {
                lamports: r.read_u64_le()?,
            },
            3 => Self::CreateAccountWithSeed {
                base: read_pubkey(&mut r)?,
                seed: read_seed(&mut r)?,
                lamports: r.read_u64_le()?,
                space: r.read_u64_le()?,
                owner: read_pubkey(&mut r)?,
            },
            4 => Self::AdvanceNonceAccount,
            5 => Self::WithdrawNonceAccount {
                lamports: r.read_u64_le()?,
            },
            6 => Self::InitializeNonceAccount {
                authority: read_pubkey(&mut r)?,
            },
            7 => Self::AuthorizeNonceAccount {
                new_authority: read_pubkey(&mut r)?,
            },
            8 => Self::Allocate {
                space: r.read_u64_le()?,
            },
            9 => Self::AllocateWithSeed {
                base: read_pubkey(&mut r)?,
                seed: read_seed(&mut r)?,
                space: r.read_u64_le()?,
                owner: read_pubkey(&mut r)?,
            },
            10 => Self::AssignWithSeed {
                base: read_pubkey(&mut r)?,
                seed: read_seed(&mut r)?,
                owner: read_pubkey(&mut r)?,
            },
            11 => Self::TransferWithSeed {
                lamports: r.read_u64_le()?,
                from_seed: read_seed(&mut r)?,
                from_owner: read_pubkey(&mut r)?,
            },
            other => {
                return Err(DecodeError::Invalid(format!(
                    "unknown system instruction {other}"
                )))
            }
        };

        if !r.is_empty() {
            return Err(DecodeError::Invalid(format!(
                "{} trailing bytes after system instruction",
                r.remaining().len()
            )));
        }

        Ok(ix)
    }
}

fn put_seed(buf: &mut Vec<u8>, seed: &str) {
    buf.extend_from_slice(&(seed.len() as u32).to_le_bytes());
    buf.extend_from_slice(&[0u8; 4]);
    buf.extend_from_slice(seed.as_bytes());
}

fn read_seed(r: &mut ByteReader<'_>) -> Result<String, DecodeError> {
    let len = r.read_u32_le()? as usize;
    let padding = r.read_bytes(4)?;
    if padding.iter().any(|&b| b != 0) {
        return Err(DecodeError::Invalid("non-zero seed length padding".into()));
    }
    let bytes = r.read_bytes(len)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| DecodeError::Invalid(format!("seed is not UTF-8: {e}")))
}

fn read_pubkey(r: &mut ByteReader<'_>) -> Result<PublicKey, DecodeError> {
    Ok(PublicKey::new(r.read_array()?))
}

fn system_instruction(ix: SystemInstruction, accounts: Vec<AccountMeta>) -> Instruction {
    Instruction::new(SYSTEM_PROGRAM_ID, accounts, ix.pack())
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateAccountParams {
    pub from_pubkey: PublicKey,
    pub new_account_pubkey: PublicKey,
    pub lamports: u64,
    pub space: u64,
    pub owner: PublicKey,
}

#[derive(Debug, Clone)]
pub struct CreateAccountWithSeedParams {
    pub from_pubkey: PublicKey,
    /// Must equal `PublicKey::create_with_seed(base, seed, owner)`.
    pub new_account_pubkey: PublicKey,
    pub base: PublicKey,
    pub seed: String,
    pub lamports: u64,
    pub space: u64,
    pub owner: PublicKey,
}

#[derive(Debug, Clone)]
pub struct WithdrawNonceParams {
    pub nonce_pubkey: PublicKey,
    pub authorized_pubkey: PublicKey,
    pub to_pubkey: PublicKey,
    pub lamports: u64,
}

#[derive(Debug, Clone)]
pub struct AllocateWithSeedParams {
    pub address: PublicKey,
    pub base: PublicKey,
    pub seed: String,
    pub space: u64,
    pub owner: PublicKey,
}

#[derive(Debug, Clone)]
pub struct AssignWithSeedParams {
    pub address: PublicKey,
    pub base: PublicKey,
    pub seed: String,
    pub owner: PublicKey,
}

#[derive(Debug, Clone)]
pub struct TransferWithSeedParams {
    pub from_pubkey: PublicKey,
    pub from_base: PublicKey,
    pub from_seed: String,
    pub from_owner: PublicKey,
    pub to_pubkey: PublicKey,
    pub lamports: u64,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Move `lamports` from `from` (signer) to `to`.
///
/// Data: u32 LE 2 followed by u64 LE lamports (12 bytes).
pub fn transfer(from: &PublicKey, to: &PublicKey, lamports: u64) -> Instruction {
    system_instruction(
        SystemInstruction::Transfer { lamports },
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
    )
}

pub fn create_account(params: &CreateAccountParams) -> Instruction {
    system_instruction(
        SystemInstruction::CreateAccount {
            lamports: params.lamports,
            space: params.space,
            owner: params.owner,
        },
        vec![
            AccountMeta::new(params.from_pubkey, true),
            AccountMeta::new(params.new_account_pubkey, true),
        ],
    )
}

pub fn assign(pubkey: &PublicKey, owner: &PublicKey) -> Instruction {
    system_instruction(
        SystemInstruction::Assign { owner: *owner },
        vec![AccountMeta::new(*pubkey, true)],
    )
}

pub fn create_account_with_seed(params: &CreateAccountWithSeedParams) -> Instruction {
    system_instruction(
        SystemInstruction::CreateAccountWithSeed {
            base: params.base,
            seed: params.seed.clone(),
            lamports: params.lamports,
            space: params.space,
            owner: params.owner,
        },
        vec![
            AccountMeta::new(params.from_pubkey, true),
            AccountMeta::new(params.new_account_pubkey, false),
            AccountMeta::new_readonly(params.base, true),
        ],
    )
}

pub fn advance_nonce_account(nonce_pubkey: &PublicKey, authorized: &PublicKey) -> Instruction {
    system_instruction(
        SystemInstruction::AdvanceNonceAccount,
        vec![
            AccountMeta::new(*nonce_pubkey, false),
            AccountMeta::new_readonly(SYSVAR_RECENT_BLOCKHASHES_ID, false),
            AccountMeta::new_readonly(*authorized, true),
        ],
    )
}

pub fn withdraw_nonce_account(params: &WithdrawNonceParams) -> Instruction {
    system_instruction(
        SystemInstruction::WithdrawNonceAccount {
            lamports: params.lamports,
        },
        vec![
            AccountMeta::new(params.nonce_pubkey, false),
            AccountMeta::new(params.to_pubkey, false),
            AccountMeta::new_readonly(SYSVAR_RECENT_BLOCKHASHES_ID, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
            AccountMeta::new_readonly(params.authorized_pubkey, true),
        ],
    )
}

pub fn initialize_nonce_account(nonce_pubkey: &PublicKey, authority: &PublicKey) -> Instruction {
    system_instruction(
        SystemInstruction::InitializeNonceAccount {
            authority: *authority,
        },
        vec![
            AccountMeta::new(*nonce_pubkey, false),
            AccountMeta::new_readonly(SYSVAR_RECENT_BLOCKHASHES_ID, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
    )
}

pub fn authorize_nonce_account(
    nonce_pubkey: &PublicKey,
    authorized: &PublicKey,
    new_authority: &PublicKey,
) -> Instruction {
    system_instruction(
        SystemInstruction::AuthorizeNonceAccount {
            new_authority: *new_authority,
        },
        vec![
            AccountMeta::new(*nonce_pubkey, false),
            AccountMeta::new_readonly(*authorized, true),
        ],
    )
}

pub fn allocate(pubkey: &PublicKey, space: u64) -> Instruction {
    system_instruction(
        SystemInstruction::Allocate { space },
        vec![AccountMeta::new(*pubkey, true)],
    )
}

pub fn allocate_with_seed(params: &AllocateWithSeedParams) -> Instruction {
    system_instruction(
        SystemInstruction::AllocateWithSeed {
            base: params.base,
            seed: params.seed.clone(),
            space: params.space,
            owner: params.owner,
        },
        vec![
            AccountMeta::new(params.address, false),
            AccountMeta::new_readonly(params.base, true),
        ],
    )
}

pub fn assign_with_seed(params: &AssignWithSeedParams) -> Instruction {
    system_instruction(
        SystemInstruction::AssignWithSeed {
            base: params.base,
            seed: params.seed.clone(),
            owner: params.owner,
        },
        vec![
            AccountMeta::new(params.address, false),
            AccountMeta::new_readonly(params.base, true),
        ],
    )
}

pub fn transfer_with_seed(params: &TransferWithSeedParams) -> Instruction {
    system_instruction(
        SystemInstruction::TransferWithSeed {
            lamports: params.lamports,
            from_seed: params.from_seed.clone(),
            from_owner: params.from_owner,
        },
        vec![
            AccountMeta::new(params.from_pubkey, false),
            AccountMeta::new_readonly(params.from_base, true),
            AccountMeta::new(params.to_pubkey, false),
        ],
    )
}

/// Create and initialize a durable nonce account in one go.
pub fn create_nonce_account(
    from_pubkey: &PublicKey,
    nonce_pubkey: &PublicKey,
    authority: &PublicKey,
    lamports: u64,
) -> [Instruction; 2] {
    [
        create_account(&CreateAccountParams {
            from_pubkey: *from_pubkey,
            new_account_pubkey: *nonce_pubkey,
            lamports,
            space: NONCE_ACCOUNT_LENGTH,
            owner: SYSTEM_PROGRAM_ID,
        }),
        initialize_nonce_account(nonce_pubkey, authority),
    ]
}
