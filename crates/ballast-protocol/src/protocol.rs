// crates/ballast-protocol/src/protocol.rs
//
// The protocol facade.
//
// `Protocol` owns every store and is the single entry point for state
// changes. Operations follow a strict shape: validate everything first
// (checks), then apply writes that cannot fail (effects), then append
// audit events (interactions). `&mut self` makes each operation an atomic
// unit on its own; the reentrancy guard additionally rejects nested entry
// into any guarded operation.

use std::collections::HashMap;

use ballast_core::{Address, AssetId, AuditEvent, BallastError, EventLog};
use ballast_credential::{CredentialLedger, CredentialTypeRegistry, IssuerRegistry};
use ballast_pool::{AssetLedger, AssetState, PositionLedger};
use ballast_score::{ScoreSnapshot, TierTable};

use crate::config::ProtocolConfig;

/// Root state of a Ballast deployment.
pub struct Protocol {
    pub(crate) authority: Address,
    pub(crate) config: ProtocolConfig,
    pub(crate) issuers: IssuerRegistry,
    pub(crate) credential_types: CredentialTypeRegistry,
    pub(crate) credentials: CredentialLedger,
    pub(crate) tiers: Option<TierTable>,
    pub(crate) assets: AssetLedger,
    pub(crate) positions: PositionLedger,
    pub(crate) snapshots: HashMap<Address, ScoreSnapshot>,
    pub(crate) events: EventLog,
    pub(crate) entered: bool,
}

impl Protocol {
    /// Create a deployment with default configuration.
    pub fn new(authority: Address) -> Result<Self, BallastError> {
        Self::with_config(authority, ProtocolConfig::default())
    }

    /// Create a deployment with explicit configuration.
    ///
    /// # Errors
    /// `Validation` if the authority is the zero address.
    pub fn with_config(
        authority: Address,
        config: ProtocolConfig,
    ) -> Result<Self, BallastError> {
        if authority.is_zero() {
            return Err(BallastError::Validation(
                "Authority cannot be the zero address".to_string(),
            ));
        }
        let max_credentials = config.max_credentials_per_user as usize;
        Ok(Self {
            authority,
            config,
            issuers: IssuerRegistry::new(),
            credential_types: CredentialTypeRegistry::new(),
            credentials: CredentialLedger::new(max_credentials),
            tiers: None,
            assets: AssetLedger::new(),
            positions: PositionLedger::new(),
            snapshots: HashMap::new(),
            events: EventLog::new(),
            entered: false,
        })
    }

    pub fn authority(&self) -> Address {
        self.authority
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// All audit events recorded so far, oldest first.
    pub fn events(&self) -> &[AuditEvent] {
        self.events.events()
    }

    /// Drain the event log for exactly-once indexer consumption.
    pub fn take_events(&mut self) -> Vec<AuditEvent> {
        self.events.take()
    }

    pub(crate) fn require_authority(&self, caller: Address) -> Result<(), BallastError> {
        if caller != self.authority {
            return Err(BallastError::Unauthorized(
                "Caller is not the protocol authority".to_string(),
            ));
        }
        Ok(())
    }

    /// Run a state-changing operation under the reentrancy guard.
    ///
    /// The flag is cleared on success and on error alike, so a failed
    /// operation never wedges the protocol shut.
    pub(crate) fn non_reentrant<T>(
        &mut self,
        operation: impl FnOnce(&mut Self) -> Result<T, BallastError>,
    ) -> Result<T, BallastError> {
        if self.entered {
            return Err(BallastError::Reentrancy);
        }
        self.entered = true;
        let result = operation(self);
        self.entered = false;
        result
    }

    /// The tier table, or `NotFound` before it is initialized.
    pub(crate) fn tier_table(&self) -> Result<&TierTable, BallastError> {
        self.tiers.as_ref().ok_or_else(|| {
            BallastError::NotFound("Tier table has not been initialized".to_string())
        })
    }

    pub(crate) fn asset_ref(&self, id: AssetId) -> Result<&AssetState, BallastError> {
        self.assets
            .get(id)
            .ok_or_else(|| BallastError::NotFound(format!("{} is not registered", id)))
    }

    pub(crate) fn asset_mut(&mut self, id: AssetId) -> Result<&mut AssetState, BallastError> {
        self.assets
            .get_mut(id)
            .ok_or_else(|| BallastError::NotFound(format!("{} is not registered", id)))
    }
}
