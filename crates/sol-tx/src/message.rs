//! Legacy message compilation and wire format.
//!
//! ```text
//! Message:
//!   num_required_sigs     u8
//!   num_readonly_signed   u8
//!   num_readonly_unsigned u8
//!   num_accounts          shortvec
//!   account_keys          32 bytes * num_accounts
//!   recent_blockhash      32 bytes
//!   num_instructions      shortvec
//!   instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index      u8
//!   num_accounts          shortvec
//!   account_indices       u8 * num_accounts
//!   data_len              shortvec
//!   data                  u8 * data_len
//! ```
//!
//! The serialized message is exactly the byte string every signer signs.

use std::collections::HashMap;

use log::debug;

use crate::constants::PUBLIC_KEY_LENGTH;
use crate::error::{BuildError, DecodeError, SolError, StateError};
use crate::hash::Hash;
use crate::instruction::{AccountMeta, CompiledInstruction, Instruction};
use crate::publickey::PublicKey;
use crate::shortvec::{encode_length, ByteReader};

/// Bit set in the first byte of a versioned (non-legacy) message.
const VERSION_PREFIX_MASK: u8 = 0x80;

/// Signer and writability counts, derived from the account table order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// The first `num_required_signatures` account keys must sign.
    pub num_required_signatures: u8,
    /// The last `num_readonly_signed_accounts` signed keys are read-only.
    pub num_readonly_signed_accounts: u8,
    /// The last `num_readonly_unsigned_accounts` unsigned keys are read-only.
    pub num_readonly_unsigned_accounts: u8,
}

/// A compiled legacy message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    /// Account table: signers first (fee payer at 0), then non-signers;
    /// writable before read-only within each group.
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions into a message.
    ///
    /// `signers` are the designated signer keys, in order; each is seeded
    /// into the account table as a writable signer even if no instruction
    /// references it. `fee_payer` defaults to the first signer.
    pub fn compile(
        instructions: &[Instruction],
        signers: &[PublicKey],
        fee_payer: Option<&PublicKey>,
        recent_blockhash: Hash,
    ) -> Result<Self, SolError> {
        Self::compile_with_cosigners(instructions, signers, &[], fee_payer, recent_blockhash)
    }

    /// Like [`compile`](Self::compile), with extra keys that must sign.
    ///
    /// `cosigners` are seeded after `signers` as read-only signers, so they
    /// keep whatever writability the instructions give them. `fee_payer`
    /// falls back to the first signer, then the first cosigner.
    pub fn compile_with_cosigners(
        instructions: &[Instruction],
        signers: &[PublicKey],
        cosigners: &[PublicKey],
        fee_payer: Option<&PublicKey>,
        recent_blockhash: Hash,
    ) -> Result<Self, SolError> {
        if instructions.is_empty() {
            return Err(BuildError::NoInstructions.into());
        }
        let fee_payer = *fee_payer
            .or_else(|| signers.first())
            .or_else(|| cosigners.first())
            .ok_or(StateError::NoSigners)?;

        // Flatten instruction accounts, then add every distinct program id
        // as a read-only non-signer.
        let mut metas: Vec<AccountMeta> = Vec::new();
        let mut program_ids: Vec<PublicKey> = Vec::new();
        for ix in instructions {
            metas.extend_from_slice(&ix.accounts);
            if !program_ids.contains(&ix.program_id) {
                program_ids.push(ix.program_id);
            }
        }
        metas.extend(
            program_ids
                .iter()
                .map(|id| AccountMeta::new_readonly(*id, false)),
        );

        // Stable: ties keep their input order.
        metas.sort_by_key(|m| (!m.is_signer, !m.is_writable));

        let mut keys = UniqueKeys::default();
        for signer in signers {
            keys.upsert(*signer, true, true);
        }
        for cosigner in cosigners {
            keys.upsert(*cosigner, true, false);
        }
        for meta in &metas {
            keys.upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        let entries = keys.into_fee_payer_first(fee_payer);

        if entries.len() > u8::MAX as usize + 1 {
            return Err(BuildError::TooManyAccounts(entries.len()).into());
        }

        let (signed, unsigned): (Vec<AccountMeta>, Vec<AccountMeta>) =
            entries.into_iter().partition(|m| m.is_signer);

        let count = |n: usize| u8::try_from(n).map_err(|_| BuildError::TooManyAccounts(n));
        let header = MessageHeader {
            num_required_signatures: count(signed.len())?,
            num_readonly_signed_accounts: count(signed.iter().filter(|m| !m.is_writable).count())?,
            num_readonly_unsigned_accounts: count(
                unsigned.iter().filter(|m| !m.is_writable).count(),
            )?,
        };

        let account_keys: Vec<PublicKey> =
            signed.iter().chain(unsigned.iter()).map(|m| m.pubkey).collect();

        let index_of: HashMap<PublicKey, u8> = account_keys
            .iter()
            .enumerate()
            .map(|(i, k)| (*k, i as u8))
            .collect();

        // Compile instructions: replace pubkeys with indices, keeping each
        // instruction's own account order.
        let lookup = |key: &PublicKey| {
            index_of
                .get(key)
                .copied()
                .ok_or(BuildError::MissingAccountKey(*key))
        };
        let mut compiled = Vec::with_capacity(instructions.len());
        for ix in instructions {
            let program_id_index = lookup(&ix.program_id)?;
            let accounts = ix
                .accounts
                .iter()
                .map(|m| lookup(&m.pubkey))
                .collect::<Result<Vec<u8>, BuildError>>()?;
            compiled.push(CompiledInstruction {
                program_id_index,
                accounts,
                data: ix.data.clone(),
            });
        }

        debug!(
            "compiled message: {} accounts, header ({}, {}, {}), {} instructions",
            account_keys.len(),
            header.num_required_signatures,
            header.num_readonly_signed_accounts,
            header.num_readonly_unsigned_accounts,
            compiled.len()
        );

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// The keys that must sign, in table order.
    pub fn signer_keys(&self) -> &[PublicKey] {
        let n = (self.header.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    pub fn fee_payer(&self) -> Option<&PublicKey> {
        self.signer_keys().first()
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < self.header.num_required_signatures as usize
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let num_signed = self.header.num_required_signatures as usize;
        let writable_signed =
            num_signed.saturating_sub(self.header.num_readonly_signed_accounts as usize);
        let writable_end = self
            .account_keys
            .len()
            .saturating_sub(self.header.num_readonly_unsigned_accounts as usize);

        index < writable_signed || (num_signed <= index && index < writable_end)
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            3 + 3 + self.account_keys.len() * PUBLIC_KEY_LENGTH + 32 + 3 + 64,
        );

        // Header: 3 bytes.
        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed_accounts);
        buf.push(self.header.num_readonly_unsigned_accounts);

        // Account keys.
        buf.extend_from_slice(&encode_length(self.account_keys.len() as u64));
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_ref());
        }

        // Recent blockhash.
        buf.extend_from_slice(self.recent_blockhash.as_bytes());

        // Instructions.
        buf.extend_from_slice(&encode_length(self.instructions.len() as u64));
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&encode_length(ix.accounts.len() as u64));
            buf.extend_from_slice(&ix.accounts);

            buf.extend_from_slice(&encode_length(ix.data.len() as u64));
            buf.extend_from_slice(&ix.data);
        }

        buf
    }

    /// Decode a legacy message. The whole input must be consumed.
    pub fn deserialize(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(data);

        let num_required_signatures = r.read_u8()?;
        if num_required_signatures & VERSION_PREFIX_MASK != 0 {
            return Err(DecodeError::Invalid(
                "versioned messages are not supported".into(),
            ));
        }
        let header = MessageHeader {
            num_required_signatures,
            num_readonly_signed_accounts: r.read_u8()?,
            num_readonly_unsigned_accounts: r.read_u8()?,
        };

        let num_accounts = r.read_length()?;
        let mut account_keys = Vec::new();
        for _ in 0..num_accounts {
            account_keys.push(PublicKey::new(r.read_array()?));
        }

        let recent_blockhash = Hash::new(r.read_array()?);

        let num_instructions = r.read_length()?;
        let mut instructions = Vec::new();
        for _ in 0..num_instructions {
            let program_id_index = r.read_u8()?;
            let num_indices = r.read_length()?;
            let accounts = r.read_bytes(num_indices)?.to_vec();
            let data_len = r.read_length()?;
            let data = r.read_bytes(data_len)?.to_vec();
            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        if !r.is_empty() {
            return Err(DecodeError::Invalid(format!(
                "{} trailing bytes after message",
                r.remaining().len()
            )));
        }

        let message = Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        };
        message.sanitize()?;
        Ok(message)
    }

    /// Check that the header and every index fit the account table.
    fn sanitize(&self) -> Result<(), DecodeError> {
        let num_keys = self.account_keys.len();
        let num_signed = self.header.num_required_signatures as usize;

        if num_signed > num_keys
            || self.header.num_readonly_signed_accounts as usize > num_signed
            || self.header.num_readonly_unsigned_accounts as usize > num_keys - num_signed
        {
            return Err(DecodeError::Invalid(format!(
                "header {:?} does not fit {num_keys} account keys",
                self.header
            )));
        }

        for ix in &self.instructions {
            let out_of_range = std::iter::once(&ix.program_id_index)
                .chain(ix.accounts.iter())
                .find(|&&i| i as usize >= num_keys);
            if let Some(i) = out_of_range {
                return Err(DecodeError::Invalid(format!(
                    "account index {i} out of range for {num_keys} keys"
                )));
            }
        }

        Ok(())
    }
}

/// Ordered, deduplicated account metas for one compile call.
#[derive(Default)]
struct UniqueKeys {
    entries: Vec<AccountMeta>,
    index: HashMap<PublicKey, usize>,
}

impl UniqueKeys {
    /// Insert a key, or OR its flags into the existing entry.
    fn upsert(&mut self, pubkey: PublicKey, is_signer: bool, is_writable: bool) {
        if let Some(&i) = self.index.get(&pubkey) {
            let entry = &mut self.entries[i];
            entry.is_signer |= is_signer;
            entry.is_writable |= is_writable;
        } else {
            self.index.insert(pubkey, self.entries.len());
            self.entries.push(AccountMeta {
                pubkey,
                is_signer,
                is_writable,
            });
        }
    }

    /// Final ordering: signers before non-signers, writable before read-only,
    /// with the fee payer moved to index 0.
    fn into_fee_payer_first(mut self, fee_payer: PublicKey) -> Vec<AccountMeta> {
        // Fee payer is always signer + writable.
        self.upsert(fee_payer, true, true);

        let mut entries = self.entries;
        // An OR-merge can promote an entry past its sort group; regroup.
        entries.sort_by_key(|m| (!m.is_signer, !m.is_writable));

        if let Some(pos) = entries.iter().position(|m| m.pubkey == fee_payer) {
            if pos != 0 {
                let payer = entries.remove(pos);
                entries.insert(0, payer);
            }
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::seq::SliceRandom;
    use rand::Rng;

    use super::*;
    use crate::constants::SYSTEM_PROGRAM_ID;
    use crate::system_instruction;

    fn key(b: u8) -> PublicKey {
        PublicKey::new([b; 32])
    }

    fn blockhash() -> Hash {
        Hash::new([0xCC; 32])
    }

    fn meta(pubkey: PublicKey, is_signer: bool, is_writable: bool) -> AccountMeta {
        AccountMeta {
            pubkey,
            is_signer,
            is_writable,
        }
    }

    fn assert_ordering_invariants(message: &Message) {
        let n = message.account_keys.len();
        let flags: Vec<(bool, bool)> = (0..n)
            .map(|i| (message.is_signer(i), message.is_writable(i)))
            .collect();
        for pair in flags.windows(2) {
            let rank = |(s, w): (bool, bool)| (!s, !w);
            assert!(rank(pair[0]) <= rank(pair[1]), "bad order: {flags:?}");
        }
        let unique: HashSet<_> = message.account_keys.iter().collect();
        assert_eq!(unique.len(), n, "duplicate keys in account table");
    }

    // -- Transfer scenario --------------------------------------------------

    #[test]
    fn one_sol_transfer_compiles_to_three_accounts() {
        let from = key(1);
        let to = key(2);
        let ix = system_instruction::transfer(&from, &to, 1_000_000_000);
        let message = Message::compile(&[ix], &[from], None, Hash::default()).unwrap();

        assert_eq!(message.account_keys, vec![from, to, SYSTEM_PROGRAM_ID]);
        assert_eq!(
            message.header,
            MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 1,
            }
        );
        assert_eq!(message.instructions.len(), 1);
        let cix = &message.instructions[0];
        assert_eq!(cix.program_id_index, 2);
        assert_eq!(cix.accounts, vec![0, 1]);
        let mut expected = vec![0x02, 0x00, 0x00, 0x00];
        expected.extend_from_slice(&1_000_000_000u64.to_le_bytes());
        assert_eq!(cix.data, expected);
    }

    #[test]
    fn self_transfer_deduplicates_accounts() {
        let k = key(0xAA);
        let ix = system_instruction::transfer(&k, &k, 100);
        let message = Message::compile(&[ix], &[k], None, blockhash()).unwrap();

        // Accounts: key (signer+writable), system_program (read-only).
        assert_eq!(message.account_keys, vec![k, SYSTEM_PROGRAM_ID]);
        assert_eq!(message.header.num_required_signatures, 1);
        assert_eq!(message.instructions[0].accounts, vec![0, 0]);
    }

    // -- Merging and ordering -----------------------------------------------

    #[test]
    fn flags_are_or_merged_across_instructions() {
        let payer = key(1);
        let shared = key(9);
        let program = key(50);
        let ix1 = Instruction::new(program, vec![meta(shared, false, true)], vec![1]);
        let ix2 = Instruction::new(program, vec![meta(shared, true, false)], vec![2]);

        let message = Message::compile(&[ix1, ix2], &[], Some(&payer), blockhash()).unwrap();

        let positions: Vec<usize> = message
            .account_keys
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == shared)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 1);
        let i = positions[0];
        assert!(message.is_signer(i));
        assert!(message.is_writable(i));
        assert_eq!(message.account_keys, vec![payer, shared, program]);
        assert_eq!(message.header.num_required_signatures, 2);
        assert_eq!(message.header.num_readonly_signed_accounts, 0);
        assert_ordering_invariants(&message);
    }

    #[test]
    fn program_keeps_stronger_flags() {
        let payer = key(1);
        let program = key(7);
        // The program id is also passed as a writable account.
        let ix = Instruction::new(program, vec![meta(program, false, true)], vec![]);
        let message = Message::compile(&[ix], &[payer], None, blockhash()).unwrap();

        assert_eq!(message.account_keys, vec![payer, program]);
        assert!(message.is_writable(1));
        assert_eq!(message.header.num_readonly_unsigned_accounts, 0);
    }

    #[test]
    fn canonical_four_group_order() {
        let payer = key(1);
        let ro_signer = key(2);
        let w_nonsigner = key(3);
        let ro_nonsigner = key(4);
        let program = key(5);
        let ix = Instruction::new(
            program,
            vec![
                meta(ro_nonsigner, false, false),
                meta(w_nonsigner, false, true),
                meta(ro_signer, true, false),
            ],
            vec![],
        );

        let message = Message::compile(&[ix], &[], Some(&payer), blockhash()).unwrap();

        assert_eq!(
            message.account_keys,
            vec![payer, ro_signer, w_nonsigner, ro_nonsigner, program]
        );
        assert_eq!(
            message.header,
            MessageHeader {
                num_required_signatures: 2,
                num_readonly_signed_accounts: 1,
                num_readonly_unsigned_accounts: 2,
            }
        );
        // Instruction keeps its own key order.
        assert_eq!(message.instructions[0].accounts, vec![3, 2, 1]);
        assert_eq!(message.instructions[0].program_id_index, 4);
    }

    #[test]
    fn designated_signer_is_present_without_references() {
        let payer = key(1);
        let extra = key(2);
        let ix = system_instruction::transfer(&payer, &key(3), 5);

        let message = Message::compile(&[ix], &[payer, extra], None, blockhash()).unwrap();

        assert_eq!(message.signer_keys(), &[payer, extra]);
        assert!(message.is_writable(1));
    }

    #[test]
    fn cosigner_keeps_readonly_flag() {
        let payer = key(1);
        let cosigner = key(2);
        let ix = Instruction::new(
            key(9),
            vec![meta(payer, true, true), meta(cosigner, true, false)],
            vec![],
        );

        let message =
            Message::compile_with_cosigners(&[ix], &[payer], &[cosigner], None, blockhash())
                .unwrap();

        assert_eq!(message.signer_keys(), &[payer, cosigner]);
        assert_eq!(message.header.num_readonly_signed_accounts, 1);
        assert!(!message.is_writable(1));
    }

    #[test]
    fn cosigner_only_adds_signer_flag() {
        let payer = key(1);
        let co = key(2);
        // Referenced as a writable non-signer; the cosigner seed promotes it
        // to signer and leaves it writable.
        let ix = Instruction::new(
            key(9),
            vec![meta(payer, true, true), meta(co, false, true)],
            vec![],
        );

        let message =
            Message::compile_with_cosigners(&[ix], &[], &[co], Some(&payer), blockhash())
                .unwrap();

        assert_eq!(message.signer_keys(), &[payer, co]);
        assert_eq!(message.header.num_readonly_signed_accounts, 0);
        assert!(message.is_writable(1));
    }

    #[test]
    fn fee_payer_falls_back_to_first_cosigner() {
        let a = key(1);
        let b = key(2);
        let ix = Instruction::new(
            key(9),
            vec![meta(a, true, false), meta(b, true, false)],
            vec![],
        );

        let message =
            Message::compile_with_cosigners(&[ix], &[], &[b, a], None, blockhash()).unwrap();

        assert_eq!(message.fee_payer(), Some(&b));
        // The fee payer is forced writable; the other cosigner stays read-only.
        assert!(message.is_writable(0));
        assert!(!message.is_writable(1));
        assert_eq!(message.header.num_readonly_signed_accounts, 1);
    }

    #[test]
    fn fee_payer_is_rotated_to_front() {
        let a = key(1);
        let b = key(2);
        let c = key(3);
        let ix = Instruction::new(
            key(9),
            vec![meta(a, true, true), meta(b, true, true), meta(c, true, true)],
            vec![],
        );

        let message = Message::compile(&[ix], &[a, b, c], Some(&c), blockhash()).unwrap();

        // Other signers keep their relative order.
        assert_eq!(message.signer_keys(), &[c, a, b]);
        assert_eq!(message.fee_payer(), Some(&c));
        assert_eq!(message.instructions[0].accounts, vec![1, 2, 0]);
    }

    #[test]
    fn fee_payer_only_in_instructions_becomes_writable_signer() {
        let payer = key(1);
        let ix = Instruction::new(key(9), vec![meta(payer, false, false)], vec![]);

        let message = Message::compile(&[ix], &[], Some(&payer), blockhash()).unwrap();

        assert_eq!(message.account_keys[0], payer);
        assert!(message.is_signer(0));
        assert!(message.is_writable(0));
    }

    #[test]
    fn random_instruction_sets_hold_invariants() {
        let mut rng = rand::thread_rng();
        let pool: Vec<PublicKey> = (1..=8).map(key).collect();

        for _ in 0..200 {
            let num_ix = rng.gen_range(1..=4);
            let instructions: Vec<Instruction> = (0..num_ix)
                .map(|_| {
                    let program = *pool.choose(&mut rng).unwrap();
                    let accounts = (0..rng.gen_range(0..=5))
                        .map(|_| meta(*pool.choose(&mut rng).unwrap(), rng.gen(), rng.gen()))
                        .collect();
                    Instruction::new(program, accounts, vec![rng.gen()])
                })
                .collect();
            let payer = *pool.choose(&mut rng).unwrap();

            let message =
                Message::compile(&instructions, &[payer], None, blockhash()).unwrap();

            assert_ordering_invariants(&message);
            assert_eq!(message.account_keys[0], payer);

            for ix in &instructions {
                assert!(message.account_keys.contains(&ix.program_id));
                for m in &ix.accounts {
                    let i = message.account_keys.iter().position(|k| *k == m.pubkey).unwrap();
                    if m.is_signer {
                        assert!(message.is_signer(i));
                    }
                    if m.is_writable {
                        assert!(message.is_writable(i));
                    }
                }
            }
        }
    }

    // -- Errors -------------------------------------------------------------

    #[test]
    fn empty_instructions_fail() {
        let err = Message::compile(&[], &[key(1)], None, blockhash()).unwrap_err();
        assert_eq!(err, SolError::Build(BuildError::NoInstructions));
    }

    #[test]
    fn no_signer_or_fee_payer_fails() {
        let ix = system_instruction::transfer(&key(1), &key(2), 1);
        let err = Message::compile(&[ix], &[], None, blockhash()).unwrap_err();
        assert_eq!(err, SolError::State(StateError::NoSigners));
    }

    #[test]
    fn more_than_256_accounts_fail() {
        let accounts = (0..300u32)
            .map(|i| {
                let mut bytes = [0u8; 32];
                bytes[..4].copy_from_slice(&(i + 1).to_le_bytes());
                meta(PublicKey::new(bytes), false, true)
            })
            .collect();
        let ix = Instruction::new(key(0xEE), accounts, vec![]);
        let err = Message::compile(&[ix], &[key(0xFF)], None, blockhash()).unwrap_err();
        assert!(matches!(err, SolError::Build(BuildError::TooManyAccounts(_))));
    }

    // -- Serialization ------------------------------------------------------

    #[test]
    fn serialize_transfer_layout() {
        let from = key(1);
        let to = key(2);
        let ix = system_instruction::transfer(&from, &to, 1_000_000_000);
        let message = Message::compile(&[ix], &[from], None, blockhash()).unwrap();
        let bytes = message.serialize();

        assert_eq!(&bytes[..3], &[1, 0, 1]);
        assert_eq!(bytes[3], 3);
        assert_eq!(&bytes[4..36], from.as_ref());
        assert_eq!(&bytes[36..68], to.as_ref());
        assert_eq!(&bytes[68..100], SYSTEM_PROGRAM_ID.as_ref());
        assert_eq!(&bytes[100..132], &[0xCC; 32]);
        // 1 instruction, program index 2, 2 accounts [0, 1], 12 data bytes.
        assert_eq!(&bytes[132..138], &[1, 2, 2, 0, 1, 12]);
        assert_eq!(hex::encode(&bytes[138..]), "0200000000ca9a3b00000000");
        assert_eq!(bytes.len(), 150);
    }

    #[test]
    fn deserialize_roundtrip() {
        let payer = key(1);
        let instructions = vec![
            system_instruction::transfer(&payer, &key(2), 42),
            Instruction::new(
                key(5),
                vec![meta(key(3), true, false), meta(key(4), false, false)],
                vec![7u8; 200],
            ),
        ];
        let message = Message::compile(&instructions, &[payer], None, blockhash()).unwrap();

        let decoded = Message::deserialize(&message.serialize()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn deserialize_rejects_versioned_prefix() {
        let err = Message::deserialize(&[0x80, 1, 0, 0]).unwrap_err();
        assert!(err.to_string().contains("versioned"));
    }

    #[test]
    fn deserialize_truncated_input() {
        let ix = system_instruction::transfer(&key(1), &key(2), 42);
        let bytes = Message::compile(&[ix], &[key(1)], None, blockhash())
            .unwrap()
            .serialize();

        for cut in [0, 2, 3, 40, 110, bytes.len() - 1] {
            assert!(
                matches!(
                    Message::deserialize(&bytes[..cut]),
                    Err(DecodeError::Truncated { .. })
                ),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn deserialize_rejects_out_of_range_index() {
        let ix = system_instruction::transfer(&key(1), &key(2), 42);
        let mut bytes = Message::compile(&[ix], &[key(1)], None, blockhash())
            .unwrap()
            .serialize();
        // Program index byte sits right after the instruction count.
        bytes[133] = 9;
        assert!(matches!(
            Message::deserialize(&bytes),
            Err(DecodeError::Invalid(_))
        ));
    }

    #[test]
    fn deserialize_rejects_bad_header() {
        let mut bytes = vec![3, 0, 0, 1];
        bytes.extend_from_slice(&[1u8; 32]);
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.push(0);
        assert!(matches!(
            Message::deserialize(&bytes),
            Err(DecodeError::Invalid(_))
        ));
    }
}
