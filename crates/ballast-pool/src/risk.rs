// crates/ballast-pool/src/risk.rs
//
// Pure risk mathematics.
//
// Everything here is a function of explicit inputs — no ledger access, no
// clock. Rounding always favors the pool: collateral requirements round
// up, borrow capacity rounds down. Health comparisons are exact integer
// cross-multiplications; the f64 health factor exists for display only.

use ballast_core::units::{bps_of_ceil, BPS_DENOMINATOR};
use ballast_core::Amount;

/// Collateral required to hold `debt` at the given collateral factor,
/// rounded up.
pub fn required_collateral(debt: Amount, collateral_factor_bps: u16) -> Amount {
    bps_of_ceil(debt, collateral_factor_bps)
}

/// Additional borrow capacity for a position, rounded down.
///
/// Collateral not already reserved for existing debt, divided by the
/// collateral factor. Callers still cap this by pool liquidity.
pub fn available_borrow(
    supplied: Amount,
    current_debt: Amount,
    collateral_factor_bps: u16,
) -> Amount {
    if collateral_factor_bps == 0 {
        return 0;
    }
    let reserved = required_collateral(current_debt, collateral_factor_bps);
    let free = supplied.saturating_sub(reserved);
    let capacity = free as u128 * BPS_DENOMINATOR as u128 / collateral_factor_bps as u128;
    Amount::try_from(capacity).unwrap_or(Amount::MAX)
}

/// Exact health check: `supplied * threshold >= debt`, cross-multiplied in
/// u128 so the boundary case (health factor exactly 1.0) is unambiguous.
/// A position with no debt is always healthy.
pub fn is_healthy(supplied: Amount, liquidation_threshold_bps: u16, debt: Amount) -> bool {
    if debt == 0 {
        return true;
    }
    supplied as u128 * liquidation_threshold_bps as u128
        >= debt as u128 * BPS_DENOMINATOR as u128
}

/// Display health factor; infinite for a debt-free position.
pub fn health_factor(supplied: Amount, liquidation_threshold_bps: u16, debt: Amount) -> f64 {
    if debt == 0 {
        return f64::INFINITY;
    }
    (supplied as f64 * liquidation_threshold_bps as f64 / BPS_DENOMINATOR as f64) / debt as f64
}

/// Collateral seized when liquidating: the repaid debt scaled up by the
/// liquidation bonus, capped at what the target actually holds.
pub fn liquidation_seizure(
    debt_repaid: Amount,
    liquidation_bonus_bps: u16,
    target_supplied: Amount,
) -> Amount {
    let scaled = debt_repaid as u128
        * (BPS_DENOMINATOR as u128 + liquidation_bonus_bps as u128)
        / BPS_DENOMINATOR as u128;
    Amount::try_from(scaled)
        .unwrap_or(Amount::MAX)
        .min(target_supplied)
}
