// crates/ballast-score/src/engine.rs
//
// Credit score computation.
//
// The score is always derived fresh from the credential ledger and the
// current registry configuration — there is no authoritative cached value.
// Base score 500, plus the sum of effective credential weights, times the
// diversity bonus, clamped to [0, 1000].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ballast_core::{Address, CredentialTypeId};
use ballast_credential::{CredentialLedger, CredentialTypeRegistry, IssuerRegistry};

use crate::decay::recency_factor;

/// Score of a subject with no credentials at all.
pub const BASE_SCORE: u16 = 500;

/// Upper clamp of the score range.
pub const MAX_SCORE: u16 = 1000;

/// Diversity bonus per distinct credential type: +5% of the running total.
const DIVERSITY_BONUS_PER_TYPE: f64 = 0.05;

/// Diversity bonus cap: +25%, reached at five distinct types.
const MAX_DIVERSITY_BONUS: f64 = 0.25;

/// One credential's contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditContribution {
    pub issuer: Address,
    pub type_id: CredentialTypeId,
    pub base_weight: u32,
    pub trust_score: u8,
    pub recency_factor: f64,
    /// base_weight x (trust/100) x recency.
    pub effective_weight: f64,
}

/// Full audit-grade decomposition of a computed score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: u16,
    /// Sum of effective weights before the base and bonus.
    pub weighted_sum: f64,
    /// Applied diversity bonus as a fraction (0.15 for three types).
    pub diversity_bonus: f64,
    /// Non-expired credentials that entered the fold.
    pub credentials_counted: u32,
    pub distinct_types: u32,
    pub contributions: Vec<CreditContribution>,
}

/// Cached result of the last explicit score computation.
///
/// Informational only — reads recompute from the ledger; the snapshot
/// exists so indexers and UIs can show "score as of" without a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub last_score: u16,
    pub last_updated: DateTime<Utc>,
    pub initialized: bool,
}

/// Compute a subject's score with its full per-credential decomposition.
///
/// Expired credentials are skipped entirely. A fully-decayed credential
/// still counts toward the fold (with zero weight) and toward type
/// diversity. Issuer trust is read live, so trust updates and weight
/// updates take effect on the next computation with no migration.
pub fn compute_breakdown(
    subject: Address,
    ledger: &CredentialLedger,
    issuers: &IssuerRegistry,
    types: &CredentialTypeRegistry,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let mut contributions = Vec::new();
    let mut distinct: HashSet<CredentialTypeId> = HashSet::new();
    let mut weighted_sum = 0.0_f64;

    for credential in ledger.credentials_of(subject) {
        if credential.is_expired(now) {
            continue;
        }
        // Registries never delete entries, so these lookups only fail for
        // a ledger populated out of band; such records are skipped.
        let Some(type_config) = types.get(credential.type_id) else {
            continue;
        };
        let Some(issuer_record) = issuers.get(credential.issuer) else {
            continue;
        };

        let recency = recency_factor(credential.issued_at, now, type_config.decay_days);
        let effective = type_config.base_weight as f64
            * (issuer_record.trust_score as f64 / 100.0)
            * recency;

        distinct.insert(credential.type_id);
        weighted_sum += effective;
        contributions.push(CreditContribution {
            issuer: credential.issuer,
            type_id: credential.type_id,
            base_weight: type_config.base_weight,
            trust_score: issuer_record.trust_score,
            recency_factor: recency,
            effective_weight: effective,
        });
    }

    let diversity_bonus =
        (distinct.len() as f64 * DIVERSITY_BONUS_PER_TYPE).min(MAX_DIVERSITY_BONUS);
    let raw = (BASE_SCORE as f64 + weighted_sum) * (1.0 + diversity_bonus);

    ScoreBreakdown {
        score: clamp_score(raw),
        weighted_sum,
        diversity_bonus,
        credentials_counted: contributions.len() as u32,
        distinct_types: distinct.len() as u32,
        contributions,
    }
}

/// Compute just the score.
pub fn compute_score(
    subject: Address,
    ledger: &CredentialLedger,
    issuers: &IssuerRegistry,
    types: &CredentialTypeRegistry,
    now: DateTime<Utc>,
) -> u16 {
    compute_breakdown(subject, ledger, issuers, types, now).score
}

/// Floor to an integer and clamp into [0, MAX_SCORE].
fn clamp_score(raw: f64) -> u16 {
    raw.floor().clamp(0.0, MAX_SCORE as f64) as u16
}
