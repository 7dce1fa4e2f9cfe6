// crates/ballast-core/src/units.rs
//
// Integer unit system for money, rates, and the borrow index.
//
// All balance accounting uses integer base units (u64); there is no floating
// point anywhere in a money path. Rates and factors are basis points
// (1 bps = 0.01%). The per-asset borrow index is a u128 fixed-point value
// scaled by INDEX_SCALE, so `1.0` is stored as 10^18.

/// Type alias for the smallest unit of a pool asset.
pub type Amount = u64;

/// Basis-point denominator: 10,000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fixed-point scale of the borrow index: 1.0 == 10^18.
pub const INDEX_SCALE: u128 = 1_000_000_000_000_000_000;

/// Seconds in a (non-leap) year, the interest accrual denominator.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Seconds in a day, the credential decay denominator.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// `amount * bps / 10_000`, rounded down.
///
/// Intermediate math is u128 so the product cannot overflow; a result that
/// would not fit back into u64 saturates at `u64::MAX` (factors above 100%
/// applied to near-max amounts).
pub fn bps_of(amount: Amount, bps: u16) -> Amount {
    let product = amount as u128 * bps as u128;
    u64::try_from(product / BPS_DENOMINATOR as u128).unwrap_or(u64::MAX)
}

/// `amount * bps / 10_000`, rounded up.
///
/// Used for collateral requirements, where rounding must favor the pool.
pub fn bps_of_ceil(amount: Amount, bps: u16) -> Amount {
    let product = amount as u128 * bps as u128;
    let ceiling = (product + (BPS_DENOMINATOR as u128 - 1)) / BPS_DENOMINATOR as u128;
    u64::try_from(ceiling).unwrap_or(u64::MAX)
}

/// Multiply-then-divide in u128 with overflow checking.
///
/// Returns `None` if the intermediate product overflows u128 or `den` is 0.
pub fn mul_div(value: u128, num: u128, den: u128) -> Option<u128> {
    if den == 0 {
        return None;
    }
    value.checked_mul(num).map(|product| product / den)
}
