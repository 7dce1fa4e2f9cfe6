// crates/ballast-pool/src/assets.rs
//
// Per-asset pool state.
//
// An asset tracks aggregate liquidity (total supplied and total borrowed
// principal) and the borrow index that prices all outstanding debt.
// Totals always equal the sum over per-user positions: the pool's idle
// liquidity is `total_supplied - total_borrowed`, which understates
// unreconciled interest and therefore errs on the conservative side.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ballast_core::{Amount, AssetId, BallastError, INDEX_SCALE};

/// State of one lending-pool asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetState {
    pub id: AssetId,
    /// Disabled assets reject new supply and borrows; repayments and
    /// withdrawals always stay open.
    pub enabled: bool,
    /// Uniform pool borrow APR in basis points, applied by the index.
    pub base_rate_bps: u16,
    pub total_supplied: Amount,
    /// Sum of reconciled borrow principals across positions.
    pub total_borrowed: Amount,
    /// Cumulative borrow index, INDEX_SCALE fixed point. Starts at 1.0 and
    /// never decreases.
    pub borrow_index: u128,
    pub last_accrual: DateTime<Utc>,
}

impl AssetState {
    /// Fresh asset with an index of exactly 1.0.
    pub fn new(id: AssetId, base_rate_bps: u16, now: DateTime<Utc>) -> Self {
        Self {
            id,
            enabled: true,
            base_rate_bps,
            total_supplied: 0,
            total_borrowed: 0,
            borrow_index: INDEX_SCALE,
            last_accrual: now,
        }
    }

    /// Idle liquidity available for borrows and withdrawals.
    pub fn available_liquidity(&self) -> Amount {
        self.total_supplied.saturating_sub(self.total_borrowed)
    }
}

/// All pool assets, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetLedger {
    assets: HashMap<AssetId, AssetState>,
}

impl AssetLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Insert a brand-new asset.
    ///
    /// # Errors
    /// `Conflict` if the id already exists (re-enabling a disabled asset
    /// goes through its mutable state instead).
    pub fn insert(&mut self, asset: AssetState) -> Result<(), BallastError> {
        if self.assets.contains_key(&asset.id) {
            return Err(BallastError::Conflict(format!(
                "{} already exists",
                asset.id
            )));
        }
        self.assets.insert(asset.id, asset);
        Ok(())
    }

    pub fn get(&self, id: AssetId) -> Option<&AssetState> {
        self.assets.get(&id)
    }

    pub fn get_mut(&mut self, id: AssetId) -> Option<&mut AssetState> {
        self.assets.get_mut(&id)
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.assets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
