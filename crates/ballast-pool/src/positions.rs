// crates/ballast-pool/src/positions.rs
//
// Per-user, per-asset positions.
//
// A position is plain storage: supplied collateral, reconciled borrow
// principal, and the borrow index at the last reconciliation. The lending
// operations maintain the invariant that `index_snapshot` is zero exactly
// when the position carries no debt.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ballast_core::{Address, Amount, AssetId};

/// One user's position in one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Collateral deposited into the pool.
    pub supplied: Amount,
    /// Borrow principal as of the last borrow/repay reconciliation.
    pub borrowed_principal: Amount,
    /// Borrow index at the last reconciliation; zero iff no debt.
    pub index_snapshot: u128,
}

impl Position {
    pub fn has_debt(&self) -> bool {
        self.borrowed_principal > 0
    }

    /// True when the position holds neither collateral nor debt.
    pub fn is_vacant(&self) -> bool {
        self.supplied == 0 && self.borrowed_principal == 0
    }
}

/// All positions, keyed by (user, asset).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionLedger {
    positions: HashMap<(Address, AssetId), Position>,
}

impl PositionLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// Copy of a position; absent positions read as all-zero.
    pub fn get(&self, user: Address, asset: AssetId) -> Position {
        self.positions
            .get(&(user, asset))
            .copied()
            .unwrap_or_default()
    }

    /// Mutable access, creating a zero position on first touch.
    pub fn get_mut(&mut self, user: Address, asset: AssetId) -> &mut Position {
        self.positions.entry((user, asset)).or_default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_position_reads_zero() {
        let ledger = PositionLedger::new();
        let position = ledger.get(Address([1u8; 32]), AssetId(1));
        assert!(position.is_vacant());
        assert!(!position.has_debt());
        assert_eq!(position.index_snapshot, 0);
    }

    #[test]
    fn test_get_mut_creates_and_persists() {
        let mut ledger = PositionLedger::new();
        let user = Address([1u8; 32]);

        ledger.get_mut(user, AssetId(1)).supplied = 500;
        assert_eq!(ledger.get(user, AssetId(1)).supplied, 500);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_positions_are_per_asset() {
        let mut ledger = PositionLedger::new();
        let user = Address([1u8; 32]);

        ledger.get_mut(user, AssetId(1)).supplied = 100;
        ledger.get_mut(user, AssetId(2)).supplied = 200;

        assert_eq!(ledger.get(user, AssetId(1)).supplied, 100);
        assert_eq!(ledger.get(user, AssetId(2)).supplied, 200);
    }
}
