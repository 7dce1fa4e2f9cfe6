// crates/ballast-credential/src/issuers.rs
//
// Issuer registry for the Ballast Protocol.
//
// Issuers are the trust anchors of the scoring system: every credential
// must carry a signature that verifies under a registered issuer's address.
// The authority assigns each issuer a trust score in [0, 100] that scales
// the weight of everything it signs. Issuers are never deleted — a
// deactivated issuer stops new submissions but its past credentials keep
// scoring at the issuer's current trust value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ballast_core::{Address, BallastError};

/// Maximum issuer trust score. Effective weights scale by trust/100.
pub const MAX_TRUST_SCORE: u8 = 100;

/// A registered credential issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerRecord {
    /// The issuer's address (its ed25519 verifying key).
    pub address: Address,
    /// Human-readable issuer name, non-empty.
    pub name: String,
    /// Trust multiplier numerator in [0, 100].
    pub trust_score: u8,
    /// Deactivated issuers cannot submit new credentials.
    pub active: bool,
    pub registered_at: DateTime<Utc>,
    /// Number of credentials accepted from this issuer.
    pub credential_count: u64,
}

/// All registered issuers, keyed by address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuerRegistry {
    issuers: HashMap<Address, IssuerRecord>,
}

impl IssuerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            issuers: HashMap::new(),
        }
    }

    /// Register a new issuer.
    ///
    /// # Errors
    /// - `Validation` for a zero address, empty name, or trust above 100.
    /// - `Conflict` if the address is already registered.
    pub fn register(
        &mut self,
        address: Address,
        name: &str,
        trust_score: u8,
        now: DateTime<Utc>,
    ) -> Result<(), BallastError> {
        if address.is_zero() {
            return Err(BallastError::Validation(
                "Issuer address cannot be the zero address".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(BallastError::Validation(
                "Issuer name cannot be empty".to_string(),
            ));
        }
        if trust_score > MAX_TRUST_SCORE {
            return Err(BallastError::Validation(format!(
                "Trust score {} exceeds the maximum of {}",
                trust_score, MAX_TRUST_SCORE
            )));
        }
        if self.issuers.contains_key(&address) {
            return Err(BallastError::Conflict(format!(
                "Issuer {} is already registered",
                address
            )));
        }

        self.issuers.insert(
            address,
            IssuerRecord {
                address,
                name: name.to_string(),
                trust_score,
                active: true,
                registered_at: now,
                credential_count: 0,
            },
        );
        Ok(())
    }

    /// Update an issuer's trust score, returning the previous value.
    ///
    /// # Errors
    /// - `NotFound` if the issuer is not registered.
    /// - `Validation` if the new trust score exceeds 100.
    pub fn update_trust(
        &mut self,
        address: Address,
        new_trust: u8,
    ) -> Result<u8, BallastError> {
        if new_trust > MAX_TRUST_SCORE {
            return Err(BallastError::Validation(format!(
                "Trust score {} exceeds the maximum of {}",
                new_trust, MAX_TRUST_SCORE
            )));
        }
        let record = self.issuers.get_mut(&address).ok_or_else(|| {
            BallastError::NotFound(format!("Issuer {} is not registered", address))
        })?;
        let old = record.trust_score;
        record.trust_score = new_trust;
        Ok(old)
    }

    /// Deactivate an issuer. Existing credentials keep scoring; new
    /// submissions from this issuer are rejected.
    ///
    /// # Errors
    /// - `NotFound` if the issuer is not registered.
    /// - `Conflict` if the issuer is already deactivated.
    pub fn deactivate(&mut self, address: Address) -> Result<(), BallastError> {
        let record = self.issuers.get_mut(&address).ok_or_else(|| {
            BallastError::NotFound(format!("Issuer {} is not registered", address))
        })?;
        if !record.active {
            return Err(BallastError::Conflict(format!(
                "Issuer {} is already deactivated",
                address
            )));
        }
        record.active = false;
        Ok(())
    }

    /// Look up an issuer record.
    pub fn get(&self, address: Address) -> Option<&IssuerRecord> {
        self.issuers.get(&address)
    }

    pub fn is_registered(&self, address: Address) -> bool {
        self.issuers.contains_key(&address)
    }

    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }

    /// Bump the accepted-credential counter for an issuer. Called by the
    /// ledger after a successful submission.
    pub(crate) fn record_issuance(&mut self, address: Address) {
        if let Some(record) = self.issuers.get_mut(&address) {
            record.credential_count = record.credential_count.saturating_add(1);
        }
    }
}
