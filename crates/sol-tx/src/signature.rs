use std::fmt;
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;

use crate::constants::SIGNATURE_LENGTH;
use crate::error::{BuildError, DecodeError, SolError};
use crate::publickey::PublicKey;

/// A 64-byte Ed25519 signature.
///
/// The all-zero value is the wire placeholder for a signature that has not
/// been collected yet.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub const fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Whether this is the all-zero "not signed" placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Verify this signature over `message` against `pubkey`.
    ///
    /// Returns `false` for keys that are not valid curve points.
    pub fn verify(&self, pubkey: &PublicKey, message: &[u8]) -> bool {
        let Ok(vk) = VerifyingKey::from_bytes(pubkey.as_bytes()) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&self.0);
        vk.verify_strict(message, &sig).is_ok()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; SIGNATURE_LENGTH])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for Signature {
    fn from(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = BuildError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| BuildError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl FromStr for Signature {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| DecodeError::Base58(e.to_string()))?;
        Ok(Self::try_from(bytes.as_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Keypair;

    #[test]
    fn default_is_placeholder() {
        assert!(Signature::default().is_placeholder());
        assert!(!Signature::new([1u8; 64]).is_placeholder());
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = Signature::try_from(&[0u8; 63][..]).unwrap_err();
        assert_eq!(err, BuildError::InvalidSignatureLength(63));
        assert!(Signature::try_from(&[0u8; 65][..]).is_err());
    }

    #[test]
    fn base58_roundtrip() {
        let sig = Signature::new([0x5Au8; 64]);
        let parsed: Signature = sig.to_string().parse().unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn invalid_base58_is_decode_error() {
        let err = "0OIl".parse::<Signature>().unwrap_err();
        assert!(matches!(err, SolError::Decode(DecodeError::Base58(_))));
    }

    #[test]
    fn verify_accepts_own_signature_only() {
        let signer = Keypair::from_seed(&[0x42u8; 32]);
        let other = Keypair::from_seed(&[0x43u8; 32]);
        let sig = signer.sign(b"hello");

        assert!(sig.verify(&signer.pubkey(), b"hello"));
        assert!(!sig.verify(&signer.pubkey(), b"hellp"));
        assert!(!sig.verify(&other.pubkey(), b"hello"));
    }

    #[test]
    fn placeholder_never_verifies() {
        let signer = Keypair::from_seed(&[0x42u8; 32]);
        assert!(!Signature::default().verify(&signer.pubkey(), b"hello"));
    }
}
