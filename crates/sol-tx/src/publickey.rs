//! Account addresses.
//!
//! An address is a raw 32-byte value, usually an Ed25519 public key. Its
//! text form is plain Base58 of those bytes with no checksum and no hashing.
//! Program derived addresses are the exception: they are SHA-256 outputs
//! chosen to lie off the Ed25519 curve so that no private key exists for them.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::constants::{MAX_SEEDS, MAX_SEED_LEN, PUBLIC_KEY_LENGTH};
use crate::error::BuildError;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// A 32-byte account address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub const fn new(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build a reserved address from a small integer.
    ///
    /// The integer is right-aligned in an otherwise zero key, so
    /// `from_u8(0)` is the System Program.
    pub const fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes[PUBLIC_KEY_LENGTH - 1] = value;
        Self(bytes)
    }

    /// Build an address from a slice that must be exactly 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, BuildError> {
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            BuildError::InvalidPublicKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Whether the bytes decompress to a valid Ed25519 point.
    pub fn is_on_curve(&self) -> bool {
        curve25519_dalek::edwards::CompressedEdwardsY(self.0)
            .decompress()
            .is_some()
    }

    /// Derive an address from a base key, a UTF-8 seed and an owner program.
    ///
    /// `SHA-256(base || seed || owner)`. The owner must not itself look like
    /// a PDA marker suffix.
    pub fn create_with_seed(
        base: &PublicKey,
        seed: &str,
        owner: &PublicKey,
    ) -> Result<PublicKey, BuildError> {
        if seed.len() > MAX_SEED_LEN {
            return Err(BuildError::SeedTooLong {
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }

        if owner.0.ends_with(PDA_MARKER) {
            return Err(BuildError::InvalidSeeds(
                "owner address ends with the PDA marker".into(),
            ));
        }

        let mut hasher = Sha256::new();
        hasher.update(base.0);
        hasher.update(seed.as_bytes());
        hasher.update(owner.0);
        Ok(Self(hasher.finalize().into()))
    }

    /// Create a program derived address from explicit seeds.
    ///
    /// Fails if any seed is too long, if there are too many seeds, or if the
    /// resulting hash falls on the Ed25519 curve.
    pub fn create_program_address(
        seeds: &[&[u8]],
        program_id: &PublicKey,
    ) -> Result<PublicKey, BuildError> {
        if seeds.len() > MAX_SEEDS {
            return Err(BuildError::InvalidSeeds(format!(
                "at most {MAX_SEEDS} seeds allowed, got {}",
                seeds.len()
            )));
        }
        if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
            return Err(BuildError::SeedTooLong {
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }

        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update(program_id.0);
        hasher.update(PDA_MARKER);

        let address = Self(hasher.finalize().into());

        // A valid PDA must NOT be on the Ed25519 curve.
        if address.is_on_curve() {
            return Err(BuildError::InvalidSeeds(
                "derived address lies on the ed25519 curve".into(),
            ));
        }

        Ok(address)
    }

    /// Find a valid program derived address and its bump seed.
    ///
    /// Iterates bump seeds from 255 down to 0 and returns the first address
    /// that is off the curve.
    pub fn find_program_address(
        seeds: &[&[u8]],
        program_id: &PublicKey,
    ) -> Result<(PublicKey, u8), BuildError> {
        if seeds.len() >= MAX_SEEDS {
            return Err(BuildError::InvalidSeeds(format!(
                "at most {} seeds allowed with a bump, got {}",
                MAX_SEEDS - 1,
                seeds.len()
            )));
        }

        for bump in (0u8..=255).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = seeds.to_vec();
            with_bump.push(&bump_seed);
            match Self::create_program_address(&with_bump, program_id) {
                Ok(address) => return Ok((address, bump)),
                Err(BuildError::InvalidSeeds(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Err(BuildError::InvalidSeeds(
            "could not find valid PDA bump seed".into(),
        ))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

impl FromStr for PublicKey {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| BuildError::InvalidPublicKey(format!("base58 decode failed: {e}")))?;
        Self::try_from_slice(&bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = BuildError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(bytes)
    }
}

impl TryFrom<&str> for PublicKey {
    type Error = BuildError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
