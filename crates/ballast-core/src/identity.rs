// crates/ballast-core/src/identity.rs
//
// Participant addresses and registry identifiers for the Ballast Protocol.
//
// Every participant is identified by the 32 bytes of the ed25519 verifying
// key it controls. Issuers in particular must be addressed by their
// verifying key, because credential signatures are checked directly
// against the issuer address.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte participant address (ed25519 verifying-key bytes).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zeroes address. Never valid as a participant.
    pub fn zero() -> Self {
        Address([0u8; 32])
    }

    /// Returns true for the all-zeroes address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Opaque identifier of a registered credential type (e.g. KYC, proof of
/// income). Assigned by the authority at registration time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CredentialTypeId(pub u32);

impl fmt::Display for CredentialTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Identifier of a lending-pool asset. Assets are independent silos; there
/// is no cross-asset netting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset#{}", self.0)
    }
}
