// crates/ballast-score/src/decay.rs
//
// Time decay of credential weight.
//
// A credential contributes its full weight at issuance and decays linearly
// to zero over the decay window its type configures, then stays at zero
// until it expires. Decay keeps scores honest: stale attestations must be
// renewed to keep counting.

use chrono::{DateTime, Utc};

use ballast_core::SECONDS_PER_DAY;

/// Linear recency factor in [0.0, 1.0].
///
/// 1.0 at issuance, falling to 0.0 once `decay_days` have elapsed, floored
/// at zero thereafter. An issuance instant in the future (clock skew)
/// clamps to 1.0.
pub fn recency_factor(issued_at: DateTime<Utc>, now: DateTime<Utc>, decay_days: u8) -> f64 {
    if decay_days == 0 {
        // The type registry forbids a zero window; treat it as fully decayed.
        return 0.0;
    }
    let elapsed = (now - issued_at).num_seconds();
    if elapsed <= 0 {
        return 1.0;
    }
    let window = decay_days as f64 * SECONDS_PER_DAY as f64;
    (1.0 - elapsed as f64 / window).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fresh_credential_full_weight() {
        let now = Utc::now();
        let factor = recency_factor(now, now, 30);
        assert!((factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_halfway_through_window() {
        let now = Utc::now();
        let issued = now - Duration::days(15);
        let factor = recency_factor(issued, now, 30);
        assert!((factor - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_exactly_at_window_end() {
        let now = Utc::now();
        let issued = now - Duration::days(30);
        let factor = recency_factor(issued, now, 30);
        assert!(factor.abs() < 1e-9);
    }

    #[test]
    fn test_floors_at_zero_beyond_window() {
        let now = Utc::now();
        let issued = now - Duration::days(90);
        let factor = recency_factor(issued, now, 30);
        assert_eq!(factor, 0.0);
    }

    #[test]
    fn test_future_issuance_clamps_to_one() {
        let now = Utc::now();
        let issued = now + Duration::hours(1);
        let factor = recency_factor(issued, now, 30);
        assert_eq!(factor, 1.0);
    }

    #[test]
    fn test_zero_window_fully_decayed() {
        let now = Utc::now();
        assert_eq!(recency_factor(now, now, 0), 0.0);
    }
}
