// crates/ballast-core/src/events.rs
//
// Structured audit events emitted by state-changing protocol operations.
//
// Events are the only interface off-chain indexers (leaderboards, activity
// feeds, dashboards) consume; internal storage layout is free to change as
// long as the event stream stays stable. The borrow index fields are
// rendered as decimal strings because JSON numbers cannot carry u128.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BallastError;
use crate::identity::{Address, AssetId, CredentialTypeId};
use crate::units::Amount;

/// One audit event per observable state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuditEvent {
    IssuerRegistered {
        issuer: Address,
        name: String,
        trust_score: u8,
    },
    IssuerTrustUpdated {
        issuer: Address,
        old_trust: u8,
        new_trust: u8,
    },
    IssuerDeactivated {
        issuer: Address,
    },
    CredentialTypeRegistered {
        type_id: CredentialTypeId,
        name: String,
        base_weight: u32,
        decay_days: u8,
    },
    CredentialTypeWeightUpdated {
        type_id: CredentialTypeId,
        old_weight: u32,
        new_weight: u32,
    },
    CredentialTypeDeactivated {
        type_id: CredentialTypeId,
    },
    CredentialSubmitted {
        subject: Address,
        issuer: Address,
        type_id: CredentialTypeId,
        /// Hex-encoded SHA-256 of the credential payload.
        content_hash: String,
        expires_at: DateTime<Utc>,
        old_score: u16,
        new_score: u16,
    },
    /// One counted credential's contribution to a subject's score, at
    /// its recency as of the emitting operation.
    CredentialScored {
        subject: Address,
        issuer: Address,
        type_id: CredentialTypeId,
        effective_weight: f64,
    },
    ScoreComputed {
        subject: Address,
        score: u16,
        credentials_counted: u32,
        distinct_types: u32,
    },
    TiersInitialized {
        tier_count: u32,
    },
    AssetEnabled {
        asset_id: AssetId,
        base_rate_bps: u16,
    },
    AssetDisabled {
        asset_id: AssetId,
    },
    InterestAccrued {
        asset_id: AssetId,
        /// Decimal string of the pre-accrual index (INDEX_SCALE fixed point).
        old_index: String,
        /// Decimal string of the post-accrual index.
        new_index: String,
        elapsed_secs: u64,
    },
    Supplied {
        user: Address,
        asset_id: AssetId,
        amount: Amount,
        new_supplied: Amount,
    },
    Withdrawn {
        user: Address,
        asset_id: AssetId,
        amount: Amount,
        remaining_supplied: Amount,
    },
    Borrowed {
        user: Address,
        asset_id: AssetId,
        amount: Amount,
        new_principal: Amount,
    },
    Repaid {
        user: Address,
        asset_id: AssetId,
        amount_requested: Amount,
        amount_applied: Amount,
        remaining_debt: Amount,
    },
    Liquidated {
        liquidator: Address,
        target: Address,
        asset_id: AssetId,
        debt_repaid: Amount,
        collateral_seized: Amount,
    },
}

impl AuditEvent {
    /// Render this event as a JSON string for an external indexer.
    pub fn to_json(&self) -> Result<String, BallastError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Append-only in-memory event log.
///
/// The protocol records one or more entries per state-changing operation;
/// an indexer drains them with `take` for exactly-once consumption.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<AuditEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event to the log.
    pub fn record(&mut self, event: AuditEvent) {
        self.events.push(event);
    }

    /// All events recorded so far, oldest first.
    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Remove and return all recorded events.
    pub fn take(&mut self) -> Vec<AuditEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
