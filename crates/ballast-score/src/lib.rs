// crates/ballast-score/src/lib.rs
//
// ballast-score: Credential-weighted score engine for the Ballast Protocol.
//
// Turns a subject's credential ledger into a single integer credit score in
// [0, 1000]. Each live credential contributes base weight x issuer trust x
// linear recency decay, and a diversity bonus rewards distinct credential
// types. The final value is bucketed into one of eight tiers that drive
// lending terms.

pub mod decay;
pub mod engine;
pub mod tiers;

// Re-export key types for ergonomic access from downstream crates.

pub use decay::recency_factor;
pub use engine::{
    compute_breakdown, compute_score, CreditContribution, ScoreBreakdown, ScoreSnapshot,
    BASE_SCORE, MAX_SCORE,
};
pub use tiers::{Tier, TierTable, TIER_COUNT};
