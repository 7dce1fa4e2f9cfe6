// crates/ballast-core/src/crypto.rs

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::BallastError;
use crate::identity::Address;

/// An ed25519 keypair for signing and verification.
///
/// Issuers sign the SHA-256 digest of a credential payload with their
/// signing key; the protocol verifies against the issuer's address, which
/// is the verifying key itself.
pub struct Keypair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl Keypair {
    /// Generate a new random ed25519 keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Keypair {
            signing_key,
            verifying_key,
        }
    }

    /// The protocol address of this keypair (the verifying-key bytes).
    pub fn address(&self) -> Address {
        Address(self.verifying_key.to_bytes())
    }

    /// Get the public key bytes (32 bytes).
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Sign a message and return the signature bytes.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature = self.signing_key.sign(message);
        signature.to_bytes().to_vec()
    }
}

/// Verify an ed25519 signature against a participant address.
///
/// Returns `true` if the signature is valid for the given message under the
/// verifying key the address encodes. Malformed keys or signatures are
/// errors rather than `false`, so callers can distinguish garbage input
/// from a genuine signer mismatch.
pub fn verify_signature(
    signer: &Address,
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<bool, BallastError> {
    let verifying_key = VerifyingKey::from_bytes(signer.as_bytes())
        .map_err(|e| BallastError::Crypto(format!("Invalid public key: {}", e)))?;

    let signature_array: [u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| BallastError::Crypto("Signature must be exactly 64 bytes".to_string()))?;

    let signature = ed25519_dalek::Signature::from_bytes(&signature_array);

    match verifying_key.verify(message, &signature) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Compute the SHA-256 hash of the given bytes.
///
/// This is the content hash of a credential payload: it doubles as the
/// message that issuers sign and as the per-subject replay key.
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let digest = hash_bytes(b"employment credential payload");

        let signature = keypair.sign(&digest);
        let valid = verify_signature(&keypair.address(), &digest, &signature).unwrap();
        assert!(valid);

        // A different digest must not verify
        let other = hash_bytes(b"tampered payload");
        let invalid = verify_signature(&keypair.address(), &other, &signature).unwrap();
        assert!(!invalid);
    }

    #[test]
    fn test_wrong_signer_rejected() {
        let issuer = Keypair::generate();
        let impostor = Keypair::generate();
        let digest = hash_bytes(b"kyc credential");

        let signature = impostor.sign(&digest);
        let valid = verify_signature(&issuer.address(), &digest, &signature).unwrap();
        assert!(!valid);
    }

    #[test]
    fn test_malformed_signature_is_error() {
        let keypair = Keypair::generate();
        let digest = hash_bytes(b"payload");
        let result = verify_signature(&keypair.address(), &digest, &[0u8; 10]);
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_bytes() {
        let data = b"income statement 2026";
        let hash = hash_bytes(data);
        assert_eq!(hash.len(), 32);

        // Same input should produce same hash
        let hash2 = hash_bytes(data);
        assert_eq!(hash, hash2);

        // Different input should produce different hash
        let hash3 = hash_bytes(b"income statement 2025");
        assert_ne!(hash, hash3);
    }
}
