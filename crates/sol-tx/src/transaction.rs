//! Transaction assembly, signing and wire format.
//!
//! ```text
//! Transaction:
//!   num_signatures          shortvec
//!   signatures              64 bytes * num_signatures
//!   message                 (see `message`)
//! ```
//!
//! A missing signature is written as 64 zero bytes. The signature slots
//! follow the order of the signed-account prefix of the message's account
//! table.
//!
//! Lifecycle: a transaction starts unsigned, may collect some signatures via
//! [`Transaction::add_signature`] or [`Transaction::partial_sign`], becomes
//! signed once every required slot holds a signature, and is finally turned
//! into bytes by [`Transaction::serialize`]. `&mut self` on every mutating
//! step keeps a transaction single-writer.

use std::borrow::Cow;

use log::{trace, warn};

use crate::constants::{MAX_SIGNATURES, PACKET_DATA_SIZE, SIGNATURE_LENGTH};
use crate::error::{BuildError, DecodeError, SignError, SolError, StateError};
use crate::hash::Hash;
use crate::instruction::{AccountMeta, Instruction};
use crate::keypair::Keypair;
use crate::message::Message;
use crate::publickey::PublicKey;
use crate::shortvec::{encode_length, ByteReader};
use crate::signature::Signature;

/// A signer slot: the key that must sign and, once collected, its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePair {
    pub pubkey: PublicKey,
    pub signature: Option<Signature>,
}

impl SignaturePair {
    pub fn new(pubkey: PublicKey) -> Self {
        Self {
            pubkey,
            signature: None,
        }
    }
}

/// Durable nonce in place of a recent blockhash.
///
/// The nonce value becomes the message's blockhash and the advance-nonce
/// instruction is placed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceInfo {
    /// Base58 nonce value stored in the nonce account.
    pub nonce: String,
    pub nonce_instruction: Instruction,
}

/// Construction parameters for a [`Transaction`].
#[derive(Debug, Clone, Default)]
pub struct TransactionConfig {
    /// Defaults to the first signer.
    pub fee_payer: Option<PublicKey>,
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Keypair>,
    /// Base58 blockhash.
    pub recent_blockhash: Option<String>,
    pub nonce_info: Option<NonceInfo>,
}

/// Where a transaction is in its signing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Unsigned,
    PartiallySigned,
    Signed,
}

#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub fee_payer: Option<PublicKey>,
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Keypair>,
    pub recent_blockhash: Option<String>,
    pub nonce_info: Option<NonceInfo>,
    pub signatures: Vec<SignaturePair>,
    /// Message this transaction was decoded from, reused while the fields
    /// it was rebuilt into are left unchanged.
    decoded: Option<DecodedMessage>,
}

#[derive(Debug, Clone)]
struct DecodedMessage {
    message: Message,
    fee_payer: Option<PublicKey>,
    instructions: Vec<Instruction>,
    recent_blockhash: Option<String>,
}

impl Transaction {
    pub fn new(config: TransactionConfig) -> Self {
        Self {
            fee_payer: config.fee_payer,
            instructions: config.instructions,
            signers: config.signers,
            recent_blockhash: config.recent_blockhash,
            nonce_info: config.nonce_info,
            signatures: Vec::new(),
            decoded: None,
        }
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn add_instructions(&mut self, instructions: impl IntoIterator<Item = Instruction>) {
        self.instructions.extend(instructions);
    }

    /// Derived from the signature slots; does not verify signatures.
    pub fn state(&self) -> TransactionState {
        let signed = self
            .signatures
            .iter()
            .filter(|p| p.signature.is_some())
            .count();
        match signed {
            0 => TransactionState::Unsigned,
            n if n == self.signatures.len() => TransactionState::Signed,
            _ => TransactionState::PartiallySigned,
        }
    }

    /// Compile the current instructions into a message.
    ///
    /// The keypairs in `signers` are the designated (writable) signers.
    /// Slot keys without a local keypair must sign too but keep the
    /// writability their instructions declare. Does not touch the slots;
    /// see [`compile_message`](Self::compile_message).
    pub fn compile(&self) -> Result<Message, SolError> {
        if let Some(message) = self.unchanged_decoded_message() {
            return Ok(message.clone());
        }

        let instructions = self.effective_instructions();
        if instructions.is_empty() {
            return Err(BuildError::NoInstructions.into());
        }
        let recent_blockhash = self.effective_blockhash()?;

        let signers: Vec<PublicKey> = self.signers.iter().map(Keypair::pubkey).collect();
        let cosigners: Vec<PublicKey> = self
            .signatures
            .iter()
            .map(|p| p.pubkey)
            .filter(|k| !signers.contains(k))
            .collect();
        Message::compile_with_cosigners(
            &instructions,
            &signers,
            &cosigners,
            self.fee_payer.as_ref(),
            recent_blockhash,
        )
    }

    /// Compile, and lay the signer slots out in the message's signed-key
    /// order. Missing slots are created empty; collected signatures are kept.
    ///
    /// Slot keys are fed back into the compiler as cosigners, so after a
    /// realignment the message is compiled once more. The returned message
    /// is the one [`serialize`](Self::serialize) will reproduce.
    pub fn compile_message(&mut self) -> Result<Message, SolError> {
        let message = self.compile()?;
        if self.slots_match(&message) {
            return Ok(message);
        }
        self.align_slots(&message);

        let message = self.compile()?;
        self.align_slots(&message);
        Ok(message)
    }

    /// The exact bytes every signer signs.
    pub fn serialize_message(&self) -> Result<Vec<u8>, SolError> {
        Ok(self.compile()?.serialize())
    }

    /// Sign with every keypair in `signers`.
    ///
    /// Signer slots are reset to the designated signers and the message is
    /// compiled. Required signers without a local keypair keep any
    /// signature previously collected for them.
    pub fn sign(&mut self) -> Result<(), SolError> {
        if self.signers.is_empty() {
            return Err(StateError::NoSigners.into());
        }

        let previous = std::mem::take(&mut self.signatures);
        self.signatures = self
            .signers
            .iter()
            .map(|s| SignaturePair::new(s.pubkey()))
            .collect();

        let message = match self.compile_message() {
            Ok(message) => message,
            Err(e) => {
                self.signatures = previous;
                return Err(e);
            }
        };
        let sign_data = message.serialize();

        for pair in &mut self.signatures {
            pair.signature = match self.signers.iter().find(|s| s.pubkey() == pair.pubkey) {
                Some(signer) => {
                    let signature = signer.sign(&sign_data);
                    let len = signature.as_bytes().len();
                    if len != SIGNATURE_LENGTH {
                        return Err(SignError::InvalidSignatureLength(len).into());
                    }
                    trace!("signed message for {}", pair.pubkey);
                    Some(signature)
                }
                None => previous
                    .iter()
                    .find(|p| p.pubkey == pair.pubkey)
                    .and_then(|p| p.signature),
            };
        }

        Ok(())
    }

    /// Sign only the slots belonging to `signers`, leaving the others as they
    /// are.
    pub fn partial_sign(&mut self, signers: &[&Keypair]) -> Result<(), SolError> {
        let sign_data = self.compile_message()?.serialize();

        for signer in signers {
            let pubkey = signer.pubkey();
            let pair = self
                .signatures
                .iter_mut()
                .find(|p| p.pubkey == pubkey)
                .ok_or(StateError::UnknownSigner(pubkey))?;
            pair.signature = Some(signer.sign(&sign_data));
            trace!("partially signed message for {pubkey}");
        }

        Ok(())
    }

    /// Place an externally collected signature in its signer slot.
    pub fn add_signature(
        &mut self,
        pubkey: &PublicKey,
        signature: Signature,
    ) -> Result<(), SolError> {
        let pair = self
            .signatures
            .iter_mut()
            .find(|p| p.pubkey == *pubkey)
            .ok_or(StateError::UnknownSigner(*pubkey))?;
        pair.signature = Some(signature);
        Ok(())
    }

    /// Check every signer slot against the message bytes.
    ///
    /// `signed_data` defaults to a fresh compile. Any missing or invalid
    /// signature, or no slots at all, yields `false`.
    pub fn verify_signatures(&self, signed_data: Option<&[u8]>) -> Result<bool, SolError> {
        let data: Cow<'_, [u8]> = match signed_data {
            Some(data) => Cow::Borrowed(data),
            None => Cow::Owned(self.serialize_message()?),
        };

        if self.signatures.is_empty() {
            return Ok(false);
        }

        for pair in &self.signatures {
            match &pair.signature {
                Some(sig) if sig.verify(&pair.pubkey, &data) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Produce the wire bytes of a fully and correctly signed transaction.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        if self.signatures.is_empty() {
            return Err(StateError::NotSigned.into());
        }

        let sign_data = self.serialize_message()?;
        if !self.verify_signatures(Some(&sign_data))? {
            warn!("refusing to serialize: signature verification failed");
            return Err(StateError::NotSignedCorrectly.into());
        }

        if self.signatures.len() >= MAX_SIGNATURES {
            return Err(BuildError::TooManySignatures(self.signatures.len()).into());
        }

        let mut wire = Vec::with_capacity(
            3 + self.signatures.len() * SIGNATURE_LENGTH + sign_data.len(),
        );
        wire.extend_from_slice(&encode_length(self.signatures.len() as u64));
        for pair in &self.signatures {
            match &pair.signature {
                Some(sig) => wire.extend_from_slice(sig.as_ref()),
                None => wire.extend_from_slice(&[0u8; SIGNATURE_LENGTH]),
            }
        }
        wire.extend_from_slice(&sign_data);

        if wire.len() > PACKET_DATA_SIZE {
            return Err(BuildError::TooLarge {
                size: wire.len(),
                max: PACKET_DATA_SIZE,
            }
            .into());
        }

        Ok(wire)
    }

    /// Decode wire bytes back into a transaction.
    ///
    /// All-zero signatures become empty slots.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SolError> {
        let mut r = ByteReader::new(data);
        let num_signatures = r.read_length()?;

        let mut signatures = Vec::new();
        for _ in 0..num_signatures {
            let sig = Signature::new(r.read_array()?);
            signatures.push((!sig.is_placeholder()).then_some(sig));
        }

        let message = Message::deserialize(r.remaining())?;
        Ok(Self::populate(message, signatures)?)
    }

    /// Rebuild a transaction from a decoded message and its signatures.
    ///
    /// An account is a signer if the header marks it or if it holds one of
    /// the collected signatures.
    pub fn populate(
        message: Message,
        signatures: Vec<Option<Signature>>,
    ) -> Result<Self, DecodeError> {
        if signatures.len() > message.account_keys.len() {
            return Err(DecodeError::Invalid(format!(
                "{} signatures for {} account keys",
                signatures.len(),
                message.account_keys.len()
            )));
        }

        let pairs: Vec<SignaturePair> = signatures
            .into_iter()
            .zip(message.account_keys.iter())
            .map(|(signature, pubkey)| SignaturePair {
                pubkey: *pubkey,
                signature,
            })
            .collect();

        let key_at = |i: u8| {
            message
                .account_keys
                .get(i as usize)
                .copied()
                .ok_or_else(|| DecodeError::Invalid(format!("account index {i} out of range")))
        };

        let mut instructions = Vec::with_capacity(message.instructions.len());
        for cix in &message.instructions {
            let mut accounts = Vec::with_capacity(cix.accounts.len());
            for &i in &cix.accounts {
                let pubkey = key_at(i)?;
                let has_signature = pairs
                    .iter()
                    .any(|p| p.pubkey == pubkey && p.signature.is_some());
                accounts.push(AccountMeta {
                    pubkey,
                    is_signer: message.is_signer(i as usize) || has_signature,
                    is_writable: message.is_writable(i as usize),
                });
            }
            instructions.push(Instruction::new(
                key_at(cix.program_id_index)?,
                accounts,
                cix.data.clone(),
            ));
        }

        let fee_payer = message.fee_payer().copied();
        let recent_blockhash = Some(message.recent_blockhash.to_string());
        Ok(Self {
            fee_payer,
            instructions: instructions.clone(),
            signers: Vec::new(),
            recent_blockhash: recent_blockhash.clone(),
            nonce_info: None,
            signatures: pairs,
            decoded: Some(DecodedMessage {
                message,
                fee_payer,
                instructions,
                recent_blockhash,
            }),
        })
    }

    /// The decoded message, if nothing that would change its bytes has been
    /// touched and every local keypair already has a slot in it.
    fn unchanged_decoded_message(&self) -> Option<&Message> {
        let decoded = self.decoded.as_ref()?;
        let unchanged = self.nonce_info.is_none()
            && self.fee_payer == decoded.fee_payer
            && self.recent_blockhash == decoded.recent_blockhash
            && self.instructions == decoded.instructions
            && self
                .signers
                .iter()
                .all(|s| decoded.message.signer_keys().contains(&s.pubkey()));
        unchanged.then_some(&decoded.message)
    }

    fn slots_match(&self, message: &Message) -> bool {
        self.signatures
            .iter()
            .map(|p| &p.pubkey)
            .eq(message.signer_keys().iter())
    }

    fn align_slots(&mut self, message: &Message) {
        let previous = std::mem::take(&mut self.signatures);
        self.signatures = message
            .signer_keys()
            .iter()
            .map(|key| SignaturePair {
                pubkey: *key,
                signature: previous
                    .iter()
                    .find(|p| p.pubkey == *key)
                    .and_then(|p| p.signature),
            })
            .collect();
    }

    fn effective_blockhash(&self) -> Result<Hash, BuildError> {
        let encoded = match (&self.nonce_info, &self.recent_blockhash) {
            (Some(nonce), _) => &nonce.nonce,
            (None, Some(blockhash)) if !blockhash.is_empty() => blockhash,
            _ => return Err(BuildError::MissingBlockhash),
        };
        encoded.parse()
    }

    fn effective_instructions(&self) -> Cow<'_, [Instruction]> {
        match &self.nonce_info {
            Some(nonce) if self.instructions.first() != Some(&nonce.nonce_instruction) => {
                let mut all = Vec::with_capacity(self.instructions.len() + 1);
                all.push(nonce.nonce_instruction.clone());
                all.extend_from_slice(&self.instructions);
                Cow::Owned(all)
            }
            _ => Cow::Borrowed(&self.instructions),
        }
    }
}
