// crates/ballast-protocol/src/config.rs
//
// Runtime configuration for the Ballast Protocol.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

/// Protocol parameters fixed at construction time.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolConfig {
    /// Health-factor threshold in basis points. A position is liquidatable
    /// once `collateral * threshold < debt`.
    #[serde(default = "default_liquidation_threshold_bps")]
    pub liquidation_threshold_bps: u16,

    /// Bonus share of seized collateral awarded to liquidators, in basis
    /// points over the repaid debt.
    #[serde(default = "default_liquidation_bonus_bps")]
    pub liquidation_bonus_bps: u16,

    /// Per-user credential cap; bounds score recomputation cost.
    #[serde(default = "default_max_credentials_per_user")]
    pub max_credentials_per_user: u32,
}

fn default_liquidation_threshold_bps() -> u16 {
    8_000
}

fn default_liquidation_bonus_bps() -> u16 {
    500
}

fn default_max_credentials_per_user() -> u32 {
    20
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            liquidation_threshold_bps: default_liquidation_threshold_bps(),
            liquidation_bonus_bps: default_liquidation_bonus_bps(),
            max_credentials_per_user: default_max_credentials_per_user(),
        }
    }
}

impl ProtocolConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: ProtocolConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}
