// crates/ballast-credential/src/ledger.rs
//
// Append-only credential ledger with replay protection.
//
// A submission is accepted only after the full precondition chain passes:
// registered active issuer, unexpired credential, valid issuer signature
// over the payload hash, registered active type, fresh content hash for the
// subject, and room under the per-user cap. Accepted records are immutable;
// nothing is ever deleted, and a content hash stays burned for its subject
// forever — even after the credential expires.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ballast_core::crypto::{hash_bytes, verify_signature};
use ballast_core::{Address, BallastError, CredentialTypeId};

use crate::credential_types::CredentialTypeRegistry;
use crate::issuers::IssuerRegistry;

/// Default per-user credential cap. Bounds score recomputation cost.
pub const DEFAULT_MAX_CREDENTIALS_PER_USER: usize = 20;

/// One accepted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub issuer: Address,
    pub subject: Address,
    pub type_id: CredentialTypeId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// SHA-256 of the signed payload; unique per subject forever.
    pub content_hash: [u8; 32],
}

impl CredentialRecord {
    /// A credential is expired from its expiry instant onward.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Hex rendering of the content hash, as used in audit events.
    pub fn content_hash_hex(&self) -> String {
        hex::encode(self.content_hash)
    }
}

/// Per-subject credential storage plus the replay set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialLedger {
    by_subject: HashMap<Address, Vec<CredentialRecord>>,
    /// (subject, content hash) pairs that have ever been accepted.
    seen: HashSet<(Address, [u8; 32])>,
    max_per_subject: usize,
}

impl CredentialLedger {
    /// Create an empty ledger with the given per-user cap.
    pub fn new(max_per_subject: usize) -> Self {
        Self {
            by_subject: HashMap::new(),
            seen: HashSet::new(),
            max_per_subject,
        }
    }

    /// Validate and append a credential submission.
    ///
    /// `subject` is the submitting user; `data` is the raw credential
    /// payload the issuer signed (the ledger stores only its hash);
    /// `signature` is the issuer's ed25519 signature over SHA-256(data).
    ///
    /// On success the record is stored, the content hash is burned for this
    /// subject, and the issuer's credential count is bumped. Every failure
    /// leaves the ledger untouched.
    ///
    /// # Errors
    /// - `Validation` — zero subject address, or the subject is at the cap.
    /// - `NotFound` — unknown issuer or credential type.
    /// - `Unauthorized` — deactivated issuer or credential type.
    /// - `Expired` — `expires_at` is not strictly in the future.
    /// - `Crypto` — the signature does not verify under the issuer address.
    /// - `Conflict` — this subject already submitted the same payload.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        issuers: &mut IssuerRegistry,
        types: &CredentialTypeRegistry,
        subject: Address,
        issuer: Address,
        type_id: CredentialTypeId,
        data: &[u8],
        signature: &[u8],
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<CredentialRecord, BallastError> {
        if subject.is_zero() {
            return Err(BallastError::Validation(
                "Subject address cannot be the zero address".to_string(),
            ));
        }

        let issuer_record = issuers.get(issuer).ok_or_else(|| {
            BallastError::NotFound(format!("Issuer {} is not registered", issuer))
        })?;
        if !issuer_record.active {
            return Err(BallastError::Unauthorized(format!(
                "Issuer {} has been deactivated",
                issuer
            )));
        }

        if expires_at <= now {
            return Err(BallastError::Expired(format!(
                "Credential expiry {} is not in the future",
                expires_at
            )));
        }

        let content_hash = hash_bytes(data);
        if !verify_signature(&issuer, &content_hash, signature)? {
            return Err(BallastError::Crypto(format!(
                "Signature does not verify under issuer {}",
                issuer
            )));
        }

        let type_config = types.get(type_id).ok_or_else(|| {
            BallastError::NotFound(format!("Credential {} is not registered", type_id))
        })?;
        if !type_config.active {
            return Err(BallastError::Unauthorized(format!(
                "Credential {} has been deactivated",
                type_id
            )));
        }

        if self.seen.contains(&(subject, content_hash)) {
            return Err(BallastError::Conflict(
                "Credential payload was already submitted by this subject".to_string(),
            ));
        }

        if self.count_for(subject) >= self.max_per_subject {
            return Err(BallastError::Validation(format!(
                "Subject already holds the maximum of {} credentials",
                self.max_per_subject
            )));
        }

        let record = CredentialRecord {
            issuer,
            subject,
            type_id,
            issued_at: now,
            expires_at,
            content_hash,
        };
        self.by_subject
            .entry(subject)
            .or_default()
            .push(record.clone());
        self.seen.insert((subject, content_hash));
        issuers.record_issuance(issuer);

        Ok(record)
    }

    /// All credentials ever accepted for a subject, expired ones included.
    pub fn credentials_of(&self, subject: Address) -> &[CredentialRecord] {
        self.by_subject
            .get(&subject)
            .map(|records| records.as_slice())
            .unwrap_or(&[])
    }

    pub fn count_for(&self, subject: Address) -> usize {
        self.by_subject
            .get(&subject)
            .map(|records| records.len())
            .unwrap_or(0)
    }

    /// True if this subject has ever submitted the given payload hash.
    pub fn has_content_hash(&self, subject: Address, content_hash: [u8; 32]) -> bool {
        self.seen.contains(&(subject, content_hash))
    }

    pub fn max_per_subject(&self) -> usize {
        self.max_per_subject
    }
}

impl Default for CredentialLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CREDENTIALS_PER_USER)
    }
}
