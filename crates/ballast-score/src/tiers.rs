// crates/ballast-score/src/tiers.rs
//
// Score tier table.
//
// Eight contiguous bands cover the full [0, 1000] score range. Each band
// carries the collateral factor applied to borrows and an advisory borrow
// rate for display; interest accrual itself uses the per-asset base rate.
// A boundary score belongs to the higher band: 900 is in the top band,
// 899 in the one below.

use serde::{Deserialize, Serialize};

use ballast_core::BallastError;

use crate::engine::MAX_SCORE;

/// Number of bands in a valid tier table.
pub const TIER_COUNT: usize = 8;

/// One score band and its lending terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    /// Inclusive lower bound.
    pub min_score: u16,
    /// Inclusive upper bound.
    pub max_score: u16,
    /// Collateral required per unit borrowed, in basis points.
    /// 15000 = 150% overcollateralized, 5000 = borrow at half collateral.
    pub collateral_factor_bps: u16,
    /// Advisory borrow APR for display; not used by accrual.
    pub advisory_rate_bps: u16,
}

/// The validated, immutable tier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Build a table from eight bands, validating full coverage.
    ///
    /// Bands may be given in any order; they are sorted by `min_score`.
    ///
    /// # Errors
    /// `Validation` if the band count is not eight, any band is inverted or
    /// has a zero collateral factor, the bands are not contiguous, or they
    /// do not cover [0, 1000] exactly.
    pub fn from_tiers(mut tiers: Vec<Tier>) -> Result<Self, BallastError> {
        if tiers.len() != TIER_COUNT {
            return Err(BallastError::Validation(format!(
                "Tier table requires exactly {} bands, got {}",
                TIER_COUNT,
                tiers.len()
            )));
        }
        tiers.sort_by_key(|tier| tier.min_score);

        for tier in &tiers {
            if tier.min_score > tier.max_score {
                return Err(BallastError::Validation(format!(
                    "Tier '{}' has an inverted range {}..{}",
                    tier.name, tier.min_score, tier.max_score
                )));
            }
            if tier.collateral_factor_bps == 0 {
                return Err(BallastError::Validation(format!(
                    "Tier '{}' has a zero collateral factor",
                    tier.name
                )));
            }
        }

        if tiers[0].min_score != 0 {
            return Err(BallastError::Validation(
                "Tier table must start at score 0".to_string(),
            ));
        }
        if tiers[TIER_COUNT - 1].max_score != MAX_SCORE {
            return Err(BallastError::Validation(format!(
                "Tier table must end at score {}",
                MAX_SCORE
            )));
        }
        for window in tiers.windows(2) {
            if window[1].min_score != window[0].max_score + 1 {
                return Err(BallastError::Validation(format!(
                    "Tier boundaries must be contiguous: {}..{} is followed by {}..{}",
                    window[0].min_score,
                    window[0].max_score,
                    window[1].min_score,
                    window[1].max_score
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// The canonical eight-band table.
    pub fn standard() -> Self {
        Self::from_tiers(Self::standard_tiers()).expect("standard tier bands are statically valid")
    }

    /// The bands of the canonical table, worst credit first.
    pub fn standard_tiers() -> Vec<Tier> {
        let bands: [(&str, u16, u16, u16, u16); TIER_COUNT] = [
            ("Subprime", 0, 299, 15_000, 1_800),
            ("Poor", 300, 399, 13_500, 1_600),
            ("Building", 400, 499, 12_000, 1_400),
            ("Fair", 500, 599, 10_000, 1_200),
            ("Good", 600, 699, 9_000, 1_000),
            ("Very Good", 700, 799, 8_000, 800),
            ("Excellent", 800, 899, 6_500, 600),
            ("Exceptional", 900, 1_000, 5_000, 400),
        ];
        bands
            .into_iter()
            .map(|(name, min, max, cf, rate)| Tier {
                name: name.to_string(),
                min_score: min,
                max_score: max,
                collateral_factor_bps: cf,
                advisory_rate_bps: rate,
            })
            .collect()
    }

    /// The band a score falls into. Scores above the range clamp to the
    /// top band.
    pub fn tier_for(&self, score: u16) -> &Tier {
        let score = score.min(MAX_SCORE);
        self.tiers
            .iter()
            .find(|tier| score >= tier.min_score && score <= tier.max_score)
            .unwrap_or(&self.tiers[TIER_COUNT - 1])
    }

    /// Collateral factor for a score, in basis points.
    pub fn collateral_factor_bps(&self, score: u16) -> u16 {
        self.tier_for(score).collateral_factor_bps
    }

    /// All bands, ascending by score.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = TierTable::standard();
        assert_eq!(table.tiers().len(), TIER_COUNT);
        assert_eq!(table.tiers()[0].min_score, 0);
        assert_eq!(table.tiers()[TIER_COUNT - 1].max_score, MAX_SCORE);
    }

    #[test]
    fn test_boundary_belongs_to_higher_band() {
        let table = TierTable::standard();
        assert_eq!(table.tier_for(900).name, "Exceptional");
        assert_eq!(table.tier_for(899).name, "Excellent");
        assert_eq!(table.tier_for(800).name, "Excellent");
        assert_eq!(table.tier_for(799).name, "Very Good");
    }

    #[test]
    fn test_collateral_factor_examples() {
        let table = TierTable::standard();
        assert_eq!(table.collateral_factor_bps(950), 5_000);
        assert_eq!(table.collateral_factor_bps(250), 15_000);
        assert_eq!(table.collateral_factor_bps(500), 10_000);
    }

    #[test]
    fn test_collateral_factor_non_increasing() {
        let table = TierTable::standard();
        let mut previous = u16::MAX;
        for score in 0..=MAX_SCORE {
            let factor = table.collateral_factor_bps(score);
            assert!(factor <= previous, "factor rose at score {}", score);
            previous = factor;
        }
    }

    #[test]
    fn test_range_extremes() {
        let table = TierTable::standard();
        assert_eq!(table.tier_for(0).name, "Subprime");
        assert_eq!(table.tier_for(1_000).name, "Exceptional");
        // Out-of-range scores clamp to the top band
        assert_eq!(table.tier_for(u16::MAX).name, "Exceptional");
    }

    #[test]
    fn test_wrong_band_count_rejected() {
        let mut bands = TierTable::standard_tiers();
        bands.pop();
        assert!(matches!(
            TierTable::from_tiers(bands),
            Err(BallastError::Validation(_))
        ));
    }

    #[test]
    fn test_gap_rejected() {
        let mut bands = TierTable::standard_tiers();
        bands[1].min_score = 301;
        assert!(matches!(
            TierTable::from_tiers(bands),
            Err(BallastError::Validation(_))
        ));
    }

    #[test]
    fn test_overlap_rejected() {
        let mut bands = TierTable::standard_tiers();
        bands[1].min_score = 299;
        assert!(matches!(
            TierTable::from_tiers(bands),
            Err(BallastError::Validation(_))
        ));
    }

    #[test]
    fn test_partial_coverage_rejected() {
        let mut bands = TierTable::standard_tiers();
        bands[7].max_score = 999;
        assert!(matches!(
            TierTable::from_tiers(bands),
            Err(BallastError::Validation(_))
        ));

        let mut bands = TierTable::standard_tiers();
        bands[0].min_score = 1;
        assert!(matches!(
            TierTable::from_tiers(bands),
            Err(BallastError::Validation(_))
        ));
    }

    #[test]
    fn test_unsorted_input_accepted() {
        let mut bands = TierTable::standard_tiers();
        bands.reverse();
        let table = TierTable::from_tiers(bands).unwrap();
        assert_eq!(table.tier_for(0).name, "Subprime");
    }
}
