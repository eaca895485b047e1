use std::fmt;
use std::str::FromStr;

use crate::constants::HASH_LENGTH;
use crate::error::BuildError;

/// A 32-byte blockhash, displayed as Base58.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash([u8; HASH_LENGTH]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

impl FromStr for Hash {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| BuildError::InvalidBlockhash(format!("base58 decode failed: {e}")))?;
        let arr: [u8; HASH_LENGTH] = bytes.try_into().map_err(|v: Vec<u8>| {
            BuildError::InvalidBlockhash(format!("expected 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

impl From<[u8; HASH_LENGTH]> for Hash {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_ones_string_is_zero_hash() {
        let hash: Hash = "11111111111111111111111111111111".parse().unwrap();
        assert_eq!(hash, Hash::default());
    }

    #[test]
    fn display_roundtrip() {
        let hash = Hash::new([0xCC; 32]);
        let parsed: Hash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn short_hash_is_rejected() {
        let err = "abc".parse::<Hash>().unwrap_err();
        assert!(matches!(err, BuildError::InvalidBlockhash(_)));
    }
}
