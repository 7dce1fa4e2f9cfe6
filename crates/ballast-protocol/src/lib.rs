// crates/ballast-protocol/src/lib.rs
//
// ballast-protocol: The operation surface of the Ballast Protocol.
//
// The `Protocol` facade owns every store — issuer and type registries, the
// credential ledger, the tier table, pool assets, and user positions —
// and is the only place state changes happen. Each operation validates
// completely before its first write, runs under a reentrancy guard, and
// finishes by appending structured audit events, which are the sole
// contract for off-chain indexers.

pub mod config;
pub mod protocol;

mod admin;
mod credentials;
mod lending;

// Re-export key types for ergonomic access from downstream crates.

pub use config::ProtocolConfig;
pub use credentials::ScoreDetails;
pub use lending::AccountData;
pub use protocol::Protocol;
