// crates/ballast-core/src/lib.rs
//
// ballast-core: Core types, crypto primitives, and audit events for the
// Ballast Protocol.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines participant addresses, the integer unit system, the
// protocol-wide error type, ed25519/SHA-256 helpers, and the structured
// audit events that every state-changing operation emits.

pub mod crypto;
pub mod error;
pub mod events;
pub mod identity;
pub mod units;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use ballast_core::Address;`

// Identity types
pub use identity::{Address, AssetId, CredentialTypeId};

// Crypto helpers
pub use crypto::{hash_bytes, verify_signature, Keypair};

// Unit system
pub use units::{Amount, BPS_DENOMINATOR, INDEX_SCALE, SECONDS_PER_DAY, SECONDS_PER_YEAR};

// Audit events
pub use events::{AuditEvent, EventLog};

// Error type
pub use error::BallastError;
