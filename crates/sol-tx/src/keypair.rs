//! Ed25519 signing keys.
//!
//! A [`Keypair`] owns a 32-byte seed and the public key derived from it. The
//! secret never reaches the wire format; it is used only to sign message
//! bytes. The exported text form is Base58 of `seed || public_key` (64 bytes),
//! the layout used by common wallet tooling.

use std::fmt;

use ed25519_dalek::{Signer as _, SigningKey};
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::error::BuildError;
use crate::publickey::PublicKey;
use crate::signature::Signature;

const SEED_LENGTH: usize = 32;
const KEYPAIR_LENGTH: usize = 64;

/// An Ed25519 keypair. The signing key is zeroized on drop by
/// `ed25519-dalek`.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
    pubkey: PublicKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS random number generator.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Build a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        let mut copy = *seed;
        let signing_key = SigningKey::from_bytes(&copy);
        copy.zeroize();
        Self::from_signing_key(signing_key)
    }

    /// Build a keypair from either a 32-byte seed or 64 bytes of
    /// `seed || public_key`. In the latter case the public half must match
    /// the key derived from the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BuildError> {
        match bytes.len() {
            SEED_LENGTH | KEYPAIR_LENGTH => {}
            n => {
                return Err(BuildError::InvalidPrivateKey(format!(
                    "expected 32 or 64 bytes, got {n}"
                )))
            }
        }

        let mut seed = [0u8; SEED_LENGTH];
        seed.copy_from_slice(&bytes[..SEED_LENGTH]);
        let keypair = Self::from_seed(&seed);
        seed.zeroize();

        if bytes.len() == KEYPAIR_LENGTH && bytes[SEED_LENGTH..] != keypair.pubkey.as_bytes()[..]
        {
            return Err(BuildError::InvalidPrivateKey(
                "public key half does not match the seed".into(),
            ));
        }

        Ok(keypair)
    }

    /// Decode a Base58 private key (32-byte seed or 64-byte keypair).
    pub fn from_base58(encoded: &str) -> Result<Self, BuildError> {
        let mut bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| BuildError::InvalidPrivateKey(format!("base58 decode failed: {e}")))?;
        let result = Self::from_bytes(&bytes);
        bytes.zeroize();
        result
    }

    /// Export as Base58 of `seed || public_key`.
    pub fn to_base58(&self) -> String {
        let mut bytes = self.signing_key.to_keypair_bytes();
        let encoded = bs58::encode(&bytes).into_string();
        bytes.zeroize();
        encoded
    }

    pub fn pubkey(&self) -> PublicKey {
        self.pubkey
    }

    /// Sign arbitrary bytes.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::new(self.signing_key.sign(message).to_bytes())
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let pubkey = PublicKey::new(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            pubkey,
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}
