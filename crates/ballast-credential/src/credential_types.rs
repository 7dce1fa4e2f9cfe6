// crates/ballast-credential/src/credential_types.rs
//
// Credential type registry for the Ballast Protocol.
//
// A credential type (KYC, proof of income, rental history, ...) carries the
// base weight a fresh credential contributes and the decay window over
// which that weight fades to zero. Types are registered by the authority
// and never deleted; deactivation stops new submissions of that type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ballast_core::{BallastError, CredentialTypeId};

/// Configuration of one credential type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialTypeConfig {
    pub id: CredentialTypeId,
    /// Human-readable name, non-empty.
    pub display_name: String,
    /// Weight a fresh credential of this type contributes before trust and
    /// recency scaling. Must be positive.
    pub base_weight: u32,
    /// Days over which the contribution decays linearly to zero, in [1, 255].
    pub decay_days: u8,
    /// Deactivated types reject new submissions; existing credentials of
    /// the type keep scoring.
    pub active: bool,
}

/// All registered credential types, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialTypeRegistry {
    types: HashMap<CredentialTypeId, CredentialTypeConfig>,
}

impl CredentialTypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register a new credential type.
    ///
    /// # Errors
    /// - `Validation` for an empty name, zero base weight, or zero decay window.
    /// - `Conflict` if the id is already registered.
    pub fn register(
        &mut self,
        id: CredentialTypeId,
        display_name: &str,
        base_weight: u32,
        decay_days: u8,
    ) -> Result<(), BallastError> {
        if display_name.trim().is_empty() {
            return Err(BallastError::Validation(
                "Credential type name cannot be empty".to_string(),
            ));
        }
        if base_weight == 0 {
            return Err(BallastError::Validation(
                "Base weight must be positive".to_string(),
            ));
        }
        if decay_days == 0 {
            return Err(BallastError::Validation(
                "Decay window must be at least one day".to_string(),
            ));
        }
        if self.types.contains_key(&id) {
            return Err(BallastError::Conflict(format!(
                "Credential {} is already registered",
                id
            )));
        }

        self.types.insert(
            id,
            CredentialTypeConfig {
                id,
                display_name: display_name.to_string(),
                base_weight,
                decay_days,
                active: true,
            },
        );
        Ok(())
    }

    /// Update a type's base weight, returning the previous value.
    ///
    /// Takes effect on the next score computation — scores are always
    /// recomputed from current configuration, never cached against it.
    ///
    /// # Errors
    /// - `NotFound` if the id is not registered.
    /// - `Validation` if the new weight is zero.
    pub fn update_weight(
        &mut self,
        id: CredentialTypeId,
        new_weight: u32,
    ) -> Result<u32, BallastError> {
        if new_weight == 0 {
            return Err(BallastError::Validation(
                "Base weight must be positive".to_string(),
            ));
        }
        let config = self.types.get_mut(&id).ok_or_else(|| {
            BallastError::NotFound(format!("Credential {} is not registered", id))
        })?;
        let old = config.base_weight;
        config.base_weight = new_weight;
        Ok(old)
    }

    /// Deactivate a credential type. Existing credentials keep scoring;
    /// new submissions of this type are rejected.
    ///
    /// # Errors
    /// - `NotFound` if the id is not registered.
    /// - `Conflict` if the type is already deactivated.
    pub fn deactivate(&mut self, id: CredentialTypeId) -> Result<(), BallastError> {
        let config = self.types.get_mut(&id).ok_or_else(|| {
            BallastError::NotFound(format!("Credential {} is not registered", id))
        })?;
        if !config.active {
            return Err(BallastError::Conflict(format!(
                "Credential {} is already deactivated",
                id
            )));
        }
        config.active = false;
        Ok(())
    }

    /// Look up a type configuration.
    pub fn get(&self, id: CredentialTypeId) -> Option<&CredentialTypeConfig> {
        self.types.get(&id)
    }

    pub fn is_registered(&self, id: CredentialTypeId) -> bool {
        self.types.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
