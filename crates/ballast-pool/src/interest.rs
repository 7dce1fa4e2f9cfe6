// crates/ballast-pool/src/interest.rs
//
// Borrow-index interest accrual.
//
// The index starts at 1.0 and grows by `rate * elapsed / year` per accrual
// call — simple interest over each elapsed window, so compounding
// granularity equals call frequency. Debt never needs a per-position
// timer: a position stores the index at its last reconciliation, and
// current debt is `principal * current_index / snapshot`.

use chrono::{DateTime, Utc};

use ballast_core::units::mul_div;
use ballast_core::{Amount, BallastError, BPS_DENOMINATOR, SECONDS_PER_YEAR};

use crate::assets::AssetState;

/// Result of committing an accrual, for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualOutcome {
    pub old_index: u128,
    pub new_index: u128,
    pub elapsed_secs: u64,
}

impl AccrualOutcome {
    pub fn index_changed(&self) -> bool {
        self.new_index != self.old_index
    }
}

/// Advance the asset's borrow index to `now` and stamp the accrual time.
///
/// A `now` at or before the last accrual is a no-op — the index never
/// moves backward and the stamp is never rewound.
pub fn accrue(asset: &mut AssetState, now: DateTime<Utc>) -> AccrualOutcome {
    let old_index = asset.borrow_index;
    let elapsed = elapsed_secs(asset, now);
    if elapsed == 0 {
        return AccrualOutcome {
            old_index,
            new_index: old_index,
            elapsed_secs: 0,
        };
    }

    asset.borrow_index = grown_index(old_index, asset.base_rate_bps, elapsed);
    asset.last_accrual = now;
    AccrualOutcome {
        old_index,
        new_index: asset.borrow_index,
        elapsed_secs: elapsed,
    }
}

/// The index value an accrual at `now` would produce, without committing.
///
/// Read paths and precondition checks use this so that a failed operation
/// leaves even the accrual stamp untouched.
pub fn projected_index(asset: &AssetState, now: DateTime<Utc>) -> u128 {
    let elapsed = elapsed_secs(asset, now);
    if elapsed == 0 {
        return asset.borrow_index;
    }
    grown_index(asset.borrow_index, asset.base_rate_bps, elapsed)
}

/// Debt owed right now: principal scaled by index growth since the
/// position's snapshot. Zero principal or snapshot means no debt.
///
/// # Errors
/// `Validation` if the scaled debt overflows the amount range.
pub fn owed(
    principal: Amount,
    current_index: u128,
    index_snapshot: u128,
) -> Result<Amount, BallastError> {
    if principal == 0 || index_snapshot == 0 {
        return Ok(0);
    }
    let scaled = mul_div(principal as u128, current_index, index_snapshot)
        .ok_or_else(|| BallastError::Validation("Debt computation overflowed".to_string()))?;
    Amount::try_from(scaled)
        .map_err(|_| BallastError::Validation("Debt exceeds the representable amount".to_string()))
}

/// Interest accumulated since the last reconciliation.
pub fn accrued_interest(
    principal: Amount,
    current_index: u128,
    index_snapshot: u128,
) -> Result<Amount, BallastError> {
    let total = owed(principal, current_index, index_snapshot)?;
    Ok(total.saturating_sub(principal))
}

fn elapsed_secs(asset: &AssetState, now: DateTime<Utc>) -> u64 {
    let elapsed = (now - asset.last_accrual).num_seconds();
    if elapsed <= 0 {
        0
    } else {
        elapsed as u64
    }
}

/// index + index * rate * elapsed / year, in INDEX_SCALE fixed point.
///
/// The rate term is divided out before multiplying by elapsed so the
/// intermediate stays far from u128 overflow; at pathological magnitudes
/// the math saturates rather than wraps.
fn grown_index(index: u128, rate_bps: u16, elapsed_secs: u64) -> u128 {
    let annual = index.saturating_mul(rate_bps as u128) / BPS_DENOMINATOR as u128;
    let delta = annual.saturating_mul(elapsed_secs as u128) / SECONDS_PER_YEAR as u128;
    index.saturating_add(delta)
}
