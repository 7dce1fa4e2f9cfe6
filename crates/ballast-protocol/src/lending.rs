// crates/ballast-protocol/src/lending.rs
//
// Collateralized lending operations on the protocol facade.
//
// Every state-changing operation runs checks first against projected
// values, then commits its effects, then appends audit events. A failed
// operation leaves no trace — not even an accrual stamp. The collateral
// factor applied to borrow and withdraw admission always comes from the
// subject's live recomputed score.

use chrono::{DateTime, Utc};

use ballast_core::{Address, Amount, AssetId, AuditEvent, BallastError};
use ballast_pool::{interest, risk, AssetState, Position};

use crate::protocol::Protocol;

/// Snapshot of one user's standing in one asset, for display and
/// liquidation monitoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountData {
    pub user: Address,
    pub asset_id: AssetId,
    /// Collateral deposited into the pool.
    pub supplied: Amount,
    /// Reconciled borrow principal.
    pub borrowed_principal: Amount,
    /// Debt including interest accrued since reconciliation.
    pub debt: Amount,
    pub accrued_interest: Amount,
    /// Additional borrow capacity, capped by pool liquidity.
    pub available_borrow: Amount,
    pub liquidation_threshold_bps: u16,
    /// Display value; infinite for a debt-free position.
    pub health_factor: f64,
    pub is_healthy: bool,
}

impl Protocol {
    /// Deposit collateral into an asset pool.
    pub fn supply(
        &mut self,
        user: Address,
        asset_id: AssetId,
        amount: Amount,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            if amount == 0 {
                return Err(BallastError::Validation(
                    "Supply amount must be positive".to_string(),
                ));
            }
            let asset = p.asset_ref(asset_id)?;
            if !asset.enabled {
                return Err(BallastError::Validation(format!(
                    "{} is disabled",
                    asset_id
                )));
            }
            let position = p.positions.get(user, asset_id);
            let new_supplied = position.supplied.checked_add(amount).ok_or_else(|| {
                BallastError::Validation("Supplied balance would overflow".to_string())
            })?;

            let asset = p.asset_mut(asset_id)?;
            asset.total_supplied = asset.total_supplied.saturating_add(amount);
            p.positions.get_mut(user, asset_id).supplied = new_supplied;

            tracing::info!(%user, %asset_id, amount, new_supplied, "collateral supplied");
            p.events.record(AuditEvent::Supplied {
                user,
                asset_id,
                amount,
                new_supplied,
            });
            Ok(())
        })
    }

    /// Withdraw collateral from an asset pool.
    ///
    /// With outstanding debt the remaining collateral must still satisfy
    /// the live collateral-factor requirement and keep the position
    /// healthy. Withdrawals work on disabled assets.
    pub fn withdraw(
        &mut self,
        user: Address,
        asset_id: AssetId,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            if amount == 0 {
                return Err(BallastError::Validation(
                    "Withdrawal amount must be positive".to_string(),
                ));
            }
            let asset = p.asset_ref(asset_id)?;
            let position = p.positions.get(user, asset_id);
            if amount > position.supplied {
                return Err(BallastError::Validation(format!(
                    "Withdrawal of {} exceeds the supplied balance of {}",
                    amount, position.supplied
                )));
            }
            if amount > asset.available_liquidity() {
                return Err(BallastError::Liquidity(format!(
                    "{} has only {} idle liquidity, {} requested",
                    asset_id,
                    asset.available_liquidity(),
                    amount
                )));
            }

            let remaining = position.supplied - amount;
            if position.has_debt() {
                let projected = interest::projected_index(asset, now);
                let debt =
                    interest::owed(position.borrowed_principal, projected, position.index_snapshot)?;
                let factor = p.live_collateral_factor(user, now)?;
                let required = risk::required_collateral(debt, factor);
                if remaining < required {
                    return Err(BallastError::Insolvent(format!(
                        "Remaining collateral {} is below the {} required for current debt",
                        remaining, required
                    )));
                }
                if !risk::is_healthy(remaining, p.config.liquidation_threshold_bps, debt) {
                    return Err(BallastError::Insolvent(format!(
                        "Withdrawal would leave an unhealthy position: collateral {}, debt {}",
                        remaining, debt
                    )));
                }
            }

            let asset = p.asset_mut(asset_id)?;
            asset.total_supplied = asset.total_supplied.saturating_sub(amount);
            p.positions.get_mut(user, asset_id).supplied = remaining;

            tracing::info!(%user, %asset_id, amount, remaining, "collateral withdrawn");
            p.events.record(AuditEvent::Withdrawn {
                user,
                asset_id,
                amount,
                remaining_supplied: remaining,
            });
            Ok(())
        })
    }

    /// Borrow from an asset pool against supplied collateral.
    ///
    /// Admission requires `required_collateral(new debt, live factor)` to
    /// fit within the supplied balance, and the pool to hold the amount in
    /// idle liquidity. On success the accrued debt is reconciled: the new
    /// principal is the old debt with interest plus the borrowed amount.
    pub fn borrow(
        &mut self,
        user: Address,
        asset_id: AssetId,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            if amount == 0 {
                return Err(BallastError::Validation(
                    "Borrow amount must be positive".to_string(),
                ));
            }
            let asset = p.asset_ref(asset_id)?;
            if !asset.enabled {
                return Err(BallastError::Validation(format!(
                    "{} is disabled",
                    asset_id
                )));
            }
            if amount > asset.available_liquidity() {
                return Err(BallastError::Liquidity(format!(
                    "{} has only {} idle liquidity, {} requested",
                    asset_id,
                    asset.available_liquidity(),
                    amount
                )));
            }

            let projected = interest::projected_index(asset, now);
            let position = p.positions.get(user, asset_id);
            let debt =
                interest::owed(position.borrowed_principal, projected, position.index_snapshot)?;
            let new_principal = debt.checked_add(amount).ok_or_else(|| {
                BallastError::Validation("Borrow would overflow the debt amount".to_string())
            })?;
            let factor = p.live_collateral_factor(user, now)?;
            let required = risk::required_collateral(new_principal, factor);
            if position.supplied < required {
                return Err(BallastError::Insolvent(format!(
                    "Borrowing requires {} collateral at {} bps, only {} supplied",
                    required, factor, position.supplied
                )));
            }

            let asset = p.asset_mut(asset_id)?;
            let outcome = interest::accrue(asset, now);
            let snapshot = asset.borrow_index;
            asset.total_borrowed = asset
                .total_borrowed
                .saturating_add(new_principal.saturating_sub(position.borrowed_principal));
            let entry = p.positions.get_mut(user, asset_id);
            entry.borrowed_principal = new_principal;
            entry.index_snapshot = snapshot;

            tracing::info!(%user, %asset_id, amount, new_principal, "borrow opened");
            if outcome.index_changed() {
                p.events.record(AuditEvent::InterestAccrued {
                    asset_id,
                    old_index: outcome.old_index.to_string(),
                    new_index: outcome.new_index.to_string(),
                    elapsed_secs: outcome.elapsed_secs,
                });
            }
            p.events.record(AuditEvent::Borrowed {
                user,
                asset_id,
                amount,
                new_principal,
            });
            Ok(())
        })
    }

    /// Repay debt, truncating overpayment to the amount actually owed.
    ///
    /// Returns the amount applied. A repayment smaller than the accrued
    /// interest capitalizes: the reconciled principal comes out larger
    /// than before.
    pub fn repay(
        &mut self,
        user: Address,
        asset_id: AssetId,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<Amount, BallastError> {
        self.non_reentrant(|p| {
            if amount == 0 {
                return Err(BallastError::Validation(
                    "Repay amount must be positive".to_string(),
                ));
            }
            let asset = p.asset_ref(asset_id)?;
            let position = p.positions.get(user, asset_id);
            if !position.has_debt() {
                return Err(BallastError::Validation(
                    "No outstanding debt to repay".to_string(),
                ));
            }
            let projected = interest::projected_index(asset, now);
            let debt =
                interest::owed(position.borrowed_principal, projected, position.index_snapshot)?;
            let applied = amount.min(debt);
            let remaining = debt - applied;

            let asset = p.asset_mut(asset_id)?;
            let outcome = interest::accrue(asset, now);
            let snapshot = if remaining == 0 { 0 } else { asset.borrow_index };
            if remaining >= position.borrowed_principal {
                asset.total_borrowed = asset
                    .total_borrowed
                    .saturating_add(remaining - position.borrowed_principal);
            } else {
                asset.total_borrowed = asset
                    .total_borrowed
                    .saturating_sub(position.borrowed_principal - remaining);
            }
            let entry = p.positions.get_mut(user, asset_id);
            entry.borrowed_principal = remaining;
            entry.index_snapshot = snapshot;

            tracing::info!(%user, %asset_id, applied, remaining, "debt repaid");
            if outcome.index_changed() {
                p.events.record(AuditEvent::InterestAccrued {
                    asset_id,
                    old_index: outcome.old_index.to_string(),
                    new_index: outcome.new_index.to_string(),
                    elapsed_secs: outcome.elapsed_secs,
                });
            }
            p.events.record(AuditEvent::Repaid {
                user,
                asset_id,
                amount_requested: amount,
                amount_applied: applied,
                remaining_debt: remaining,
            });
            Ok(applied)
        })
    }

    /// Liquidate an unhealthy position.
    ///
    /// The liquidator settles the target's full debt with outside funds
    /// and is credited the equivalent collateral plus the liquidation
    /// bonus, capped at what the target holds. Pool-wide supplied
    /// collateral is unchanged; the seized amount moves between positions.
    /// Returns the seized collateral.
    pub fn liquidate(
        &mut self,
        liquidator: Address,
        target: Address,
        asset_id: AssetId,
        now: DateTime<Utc>,
    ) -> Result<Amount, BallastError> {
        self.non_reentrant(|p| {
            if liquidator == target {
                return Err(BallastError::Validation(
                    "Cannot liquidate your own position".to_string(),
                ));
            }
            let asset = p.asset_ref(asset_id)?;
            let position = p.positions.get(target, asset_id);
            if !position.has_debt() {
                return Err(BallastError::Validation(format!(
                    "{} has no debt to liquidate",
                    target
                )));
            }
            let projected = interest::projected_index(asset, now);
            let debt =
                interest::owed(position.borrowed_principal, projected, position.index_snapshot)?;
            if risk::is_healthy(position.supplied, p.config.liquidation_threshold_bps, debt) {
                return Err(BallastError::Validation(format!(
                    "{} is healthy and cannot be liquidated",
                    target
                )));
            }
            let seized =
                risk::liquidation_seizure(debt, p.config.liquidation_bonus_bps, position.supplied);
            let liquidator_supplied = p
                .positions
                .get(liquidator, asset_id)
                .supplied
                .checked_add(seized)
                .ok_or_else(|| {
                    BallastError::Validation(
                        "Seizure would overflow the liquidator's balance".to_string(),
                    )
                })?;

            let asset = p.asset_mut(asset_id)?;
            let outcome = interest::accrue(asset, now);
            asset.total_borrowed = asset.total_borrowed.saturating_sub(position.borrowed_principal);
            let entry = p.positions.get_mut(target, asset_id);
            entry.supplied = position.supplied - seized;
            entry.borrowed_principal = 0;
            entry.index_snapshot = 0;
            p.positions.get_mut(liquidator, asset_id).supplied = liquidator_supplied;

            tracing::warn!(
                %liquidator,
                %target,
                %asset_id,
                debt_repaid = debt,
                collateral_seized = seized,
                "position liquidated"
            );
            if outcome.index_changed() {
                p.events.record(AuditEvent::InterestAccrued {
                    asset_id,
                    old_index: outcome.old_index.to_string(),
                    new_index: outcome.new_index.to_string(),
                    elapsed_secs: outcome.elapsed_secs,
                });
            }
            p.events.record(AuditEvent::Liquidated {
                liquidator,
                target,
                asset_id,
                debt_repaid: debt,
                collateral_seized: seized,
            });
            Ok(seized)
        })
    }

    /// Pool-level state of an asset.
    pub fn asset(&self, asset_id: AssetId) -> Result<&AssetState, BallastError> {
        self.asset_ref(asset_id)
    }

    /// A user's raw position; absent positions read as all-zero.
    pub fn position(&self, user: Address, asset_id: AssetId) -> Position {
        self.positions.get(user, asset_id)
    }

    pub fn supplied(&self, user: Address, asset_id: AssetId) -> Amount {
        self.positions.get(user, asset_id).supplied
    }

    pub fn borrowed_principal(&self, user: Address, asset_id: AssetId) -> Amount {
        self.positions.get(user, asset_id).borrowed_principal
    }

    /// Current debt including interest accrued since reconciliation.
    pub fn borrow_balance_with_interest(
        &self,
        user: Address,
        asset_id: AssetId,
        now: DateTime<Utc>,
    ) -> Result<Amount, BallastError> {
        let asset = self.asset_ref(asset_id)?;
        let position = self.positions.get(user, asset_id);
        interest::owed(
            position.borrowed_principal,
            interest::projected_index(asset, now),
            position.index_snapshot,
        )
    }

    /// Interest accumulated since the last borrow/repay reconciliation.
    pub fn accrued_interest(
        &self,
        user: Address,
        asset_id: AssetId,
        now: DateTime<Utc>,
    ) -> Result<Amount, BallastError> {
        let asset = self.asset_ref(asset_id)?;
        let position = self.positions.get(user, asset_id);
        interest::accrued_interest(
            position.borrowed_principal,
            interest::projected_index(asset, now),
            position.index_snapshot,
        )
    }

    /// Full standing of a user in one asset. Requires the tier table,
    /// since borrow capacity depends on the live collateral factor.
    pub fn account_data(
        &self,
        user: Address,
        asset_id: AssetId,
        now: DateTime<Utc>,
    ) -> Result<AccountData, BallastError> {
        let asset = self.asset_ref(asset_id)?;
        let position = self.positions.get(user, asset_id);
        let projected = interest::projected_index(asset, now);
        let debt =
            interest::owed(position.borrowed_principal, projected, position.index_snapshot)?;
        let factor = self.live_collateral_factor(user, now)?;
        let available =
            risk::available_borrow(position.supplied, debt, factor).min(asset.available_liquidity());
        let threshold = self.config.liquidation_threshold_bps;

        Ok(AccountData {
            user,
            asset_id,
            supplied: position.supplied,
            borrowed_principal: position.borrowed_principal,
            debt,
            accrued_interest: debt.saturating_sub(position.borrowed_principal),
            available_borrow: available,
            liquidation_threshold_bps: threshold,
            health_factor: risk::health_factor(position.supplied, threshold, debt),
            is_healthy: risk::is_healthy(position.supplied, threshold, debt),
        })
    }
}
