// crates/ballast-credential/src/lib.rs
//
// ballast-credential: Issuer registry, credential types, and the signed
// credential ledger for the Ballast Protocol.
//
// Credentials are the raw material of the credit score: signed attestations
// from registered issuers, appended to a replay-protected per-subject
// ledger. This crate owns admission — who may issue, what kinds exist, and
// which submissions are accepted — but does no scoring itself.

pub mod credential_types;
pub mod issuers;
pub mod ledger;

// Re-export key types for ergonomic access from downstream crates.

pub use credential_types::{CredentialTypeConfig, CredentialTypeRegistry};
pub use issuers::{IssuerRecord, IssuerRegistry, MAX_TRUST_SCORE};
pub use ledger::{CredentialLedger, CredentialRecord, DEFAULT_MAX_CREDENTIALS_PER_USER};
