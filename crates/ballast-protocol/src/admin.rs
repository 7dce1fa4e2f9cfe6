// crates/ballast-protocol/src/admin.rs
//
// Authority-gated administrative operations: issuer and credential-type
// registration, tier table initialization, and asset lifecycle. Every
// operation here rejects callers other than the configured authority.

use chrono::{DateTime, Utc};

use ballast_core::{Address, AssetId, AuditEvent, BallastError, CredentialTypeId};
use ballast_pool::{interest, AssetState};
use ballast_score::{Tier, TierTable};

use crate::protocol::Protocol;

impl Protocol {
    /// Register a credential issuer with an initial trust score.
    pub fn register_issuer(
        &mut self,
        caller: Address,
        issuer: Address,
        name: &str,
        trust_score: u8,
        now: DateTime<Utc>,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            p.issuers.register(issuer, name, trust_score, now)?;
            tracing::info!(%issuer, trust_score, "issuer registered");
            p.events.record(AuditEvent::IssuerRegistered {
                issuer,
                name: name.to_string(),
                trust_score,
            });
            Ok(())
        })
    }

    /// Change an issuer's trust score. Applies retroactively: the next
    /// score computation reads the new value for all of the issuer's
    /// credentials.
    pub fn update_issuer_trust(
        &mut self,
        caller: Address,
        issuer: Address,
        new_trust: u8,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            let old_trust = p.issuers.update_trust(issuer, new_trust)?;
            tracing::info!(%issuer, old_trust, new_trust, "issuer trust updated");
            p.events.record(AuditEvent::IssuerTrustUpdated {
                issuer,
                old_trust,
                new_trust,
            });
            Ok(())
        })
    }

    /// Deactivate an issuer. Blocks new submissions; existing credentials
    /// keep scoring.
    pub fn deactivate_issuer(
        &mut self,
        caller: Address,
        issuer: Address,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            p.issuers.deactivate(issuer)?;
            tracing::info!(%issuer, "issuer deactivated");
            p.events.record(AuditEvent::IssuerDeactivated { issuer });
            Ok(())
        })
    }

    /// Register a credential type with its base weight and decay window.
    pub fn register_credential_type(
        &mut self,
        caller: Address,
        type_id: CredentialTypeId,
        name: &str,
        base_weight: u32,
        decay_days: u8,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            p.credential_types
                .register(type_id, name, base_weight, decay_days)?;
            tracing::info!(%type_id, base_weight, decay_days, "credential type registered");
            p.events.record(AuditEvent::CredentialTypeRegistered {
                type_id,
                name: name.to_string(),
                base_weight,
                decay_days,
            });
            Ok(())
        })
    }

    /// Change a type's base weight; takes effect on the next computation.
    pub fn update_credential_type_weight(
        &mut self,
        caller: Address,
        type_id: CredentialTypeId,
        new_weight: u32,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            let old_weight = p.credential_types.update_weight(type_id, new_weight)?;
            tracing::info!(%type_id, old_weight, new_weight, "credential type weight updated");
            p.events.record(AuditEvent::CredentialTypeWeightUpdated {
                type_id,
                old_weight,
                new_weight,
            });
            Ok(())
        })
    }

    /// Deactivate a credential type. Blocks new submissions of the type;
    /// existing credentials keep scoring.
    pub fn deactivate_credential_type(
        &mut self,
        caller: Address,
        type_id: CredentialTypeId,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            p.credential_types.deactivate(type_id)?;
            tracing::info!(%type_id, "credential type deactivated");
            p.events.record(AuditEvent::CredentialTypeDeactivated { type_id });
            Ok(())
        })
    }

    /// Install the tier table. Runs exactly once per deployment.
    ///
    /// # Errors
    /// `Conflict` on re-initialization; `Validation` if the bands do not
    /// cover [0, 1000] in eight contiguous pieces.
    pub fn initialize_tiers(
        &mut self,
        caller: Address,
        tiers: Vec<Tier>,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            if p.tiers.is_some() {
                return Err(BallastError::Conflict(
                    "Tier table is already initialized".to_string(),
                ));
            }
            let table = TierTable::from_tiers(tiers)?;
            let tier_count = table.tiers().len() as u32;
            p.tiers = Some(table);
            tracing::info!(tier_count, "tier table initialized");
            p.events.record(AuditEvent::TiersInitialized { tier_count });
            Ok(())
        })
    }

    /// Install the canonical eight-band tier table.
    pub fn initialize_standard_tiers(&mut self, caller: Address) -> Result<(), BallastError> {
        self.initialize_tiers(caller, TierTable::standard_tiers())
    }

    /// Enable a pool asset at a borrow rate, creating it on first mention.
    ///
    /// Re-enabling a disabled asset first catches its index up at the old
    /// rate, so the new rate never applies retroactively.
    pub fn enable_asset(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        base_rate_bps: u16,
        now: DateTime<Utc>,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;

            if !p.assets.contains(asset_id) {
                p.assets
                    .insert(AssetState::new(asset_id, base_rate_bps, now))?;
                tracing::info!(%asset_id, base_rate_bps, "asset enabled");
                p.events.record(AuditEvent::AssetEnabled {
                    asset_id,
                    base_rate_bps,
                });
                return Ok(());
            }

            let asset = p.asset_mut(asset_id)?;
            if asset.enabled {
                return Err(BallastError::Conflict(format!(
                    "{} is already enabled",
                    asset_id
                )));
            }
            let outcome = interest::accrue(asset, now);
            asset.base_rate_bps = base_rate_bps;
            asset.enabled = true;

            if outcome.index_changed() {
                p.events.record(AuditEvent::InterestAccrued {
                    asset_id,
                    old_index: outcome.old_index.to_string(),
                    new_index: outcome.new_index.to_string(),
                    elapsed_secs: outcome.elapsed_secs,
                });
            }
            tracing::info!(%asset_id, base_rate_bps, "asset re-enabled");
            p.events.record(AuditEvent::AssetEnabled {
                asset_id,
                base_rate_bps,
            });
            Ok(())
        })
    }

    /// Disable a pool asset. Halts new supply and borrows; repayments and
    /// withdrawals stay open.
    pub fn disable_asset(
        &mut self,
        caller: Address,
        asset_id: AssetId,
    ) -> Result<(), BallastError> {
        self.non_reentrant(|p| {
            p.require_authority(caller)?;
            let asset = p.asset_mut(asset_id)?;
            if !asset.enabled {
                return Err(BallastError::Conflict(format!(
                    "{} is already disabled",
                    asset_id
                )));
            }
            asset.enabled = false;
            tracing::info!(%asset_id, "asset disabled");
            p.events.record(AuditEvent::AssetDisabled { asset_id });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_authority() -> Address {
        Address([0xAA; 32])
    }

    fn make_protocol() -> Protocol {
        match Protocol::new(test_authority()) {
            Ok(p) => p,
            Err(e) => panic!("protocol construction failed: {}", e),
        }
    }

    #[test]
    fn test_non_authority_rejected_everywhere() {
        let mut protocol = make_protocol();
        let outsider = Address([1u8; 32]);
        let now = Utc::now();

        assert!(matches!(
            protocol.register_issuer(outsider, Address([2u8; 32]), "X", 50, now),
            Err(BallastError::Unauthorized(_))
        ));
        assert!(matches!(
            protocol.register_credential_type(outsider, CredentialTypeId(1), "KYC", 50, 30),
            Err(BallastError::Unauthorized(_))
        ));
        assert!(matches!(
            protocol.initialize_standard_tiers(outsider),
            Err(BallastError::Unauthorized(_))
        ));
        assert!(matches!(
            protocol.enable_asset(outsider, AssetId(1), 1_000, now),
            Err(BallastError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_initialize_tiers_once() {
        let mut protocol = make_protocol();
        protocol.initialize_standard_tiers(test_authority()).unwrap();

        let again = protocol.initialize_standard_tiers(test_authority());
        assert!(matches!(again, Err(BallastError::Conflict(_))));
    }

    #[test]
    fn test_enable_asset_twice_conflicts() {
        let mut protocol = make_protocol();
        let now = Utc::now();
        protocol
            .enable_asset(test_authority(), AssetId(1), 1_000, now)
            .unwrap();

        let again = protocol.enable_asset(test_authority(), AssetId(1), 1_000, now);
        assert!(matches!(again, Err(BallastError::Conflict(_))));
    }

    #[test]
    fn test_disable_then_reenable_with_new_rate() {
        let mut protocol = make_protocol();
        let now = Utc::now();
        protocol
            .enable_asset(test_authority(), AssetId(1), 1_000, now)
            .unwrap();
        protocol.disable_asset(test_authority(), AssetId(1)).unwrap();
        assert!(!protocol.asset(AssetId(1)).unwrap().enabled);

        protocol
            .enable_asset(test_authority(), AssetId(1), 2_000, now)
            .unwrap();
        let asset = protocol.asset(AssetId(1)).unwrap();
        assert!(asset.enabled);
        assert_eq!(asset.base_rate_bps, 2_000);
    }

    #[test]
    fn test_disable_twice_conflicts() {
        let mut protocol = make_protocol();
        let now = Utc::now();
        protocol
            .enable_asset(test_authority(), AssetId(1), 1_000, now)
            .unwrap();
        protocol.disable_asset(test_authority(), AssetId(1)).unwrap();

        let again = protocol.disable_asset(test_authority(), AssetId(1));
        assert!(matches!(again, Err(BallastError::Conflict(_))));
    }

    #[test]
    fn test_admin_operations_emit_events() {
        let mut protocol = make_protocol();
        let now = Utc::now();
        protocol
            .register_issuer(test_authority(), Address([2u8; 32]), "Acme", 80, now)
            .unwrap();
        protocol
            .register_credential_type(test_authority(), CredentialTypeId(1), "KYC", 50, 180)
            .unwrap();
        protocol.initialize_standard_tiers(test_authority()).unwrap();
        protocol
            .enable_asset(test_authority(), AssetId(1), 1_000, now)
            .unwrap();

        let events = protocol.take_events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], AuditEvent::IssuerRegistered { .. }));
        assert!(matches!(
            events[1],
            AuditEvent::CredentialTypeRegistered { .. }
        ));
        assert!(matches!(events[2], AuditEvent::TiersInitialized { .. }));
        assert!(matches!(events[3], AuditEvent::AssetEnabled { .. }));
    }

    #[test]
    fn test_failed_admin_call_records_nothing() {
        let mut protocol = make_protocol();
        let now = Utc::now();
        let _ = protocol.register_issuer(test_authority(), Address::zero(), "Zero", 50, now);
        assert!(protocol.events().is_empty());
        assert!(!protocol.is_issuer_registered(Address::zero()));
    }
}
