// crates/ballast-pool/src/lib.rs
//
// ballast-pool: Lending-pool state for the Ballast Protocol.
//
// Each asset is an independent silo with its own liquidity totals and a
// monotone borrow index that compounds debt lazily — positions store the
// index at their last reconciliation and scale principal by index growth.
// Risk math (collateral requirements, health factors, liquidation splits)
// is pure functions over those ledgers.

pub mod assets;
pub mod interest;
pub mod positions;
pub mod risk;

// Re-export key types for ergonomic access from downstream crates.

pub use assets::{AssetLedger, AssetState};
pub use interest::{accrue, accrued_interest, owed, projected_index, AccrualOutcome};
pub use positions::{Position, PositionLedger};
pub use risk::{
    available_borrow, health_factor, is_healthy, liquidation_seizure, required_collateral,
};
