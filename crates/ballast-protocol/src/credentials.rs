// crates/ballast-protocol/src/credentials.rs
//
// Credential submission and score reads on the protocol facade.
//
// Scores are never stored authoritatively: every read recomputes from the
// ledger under the current registry configuration. The snapshot map only
// remembers the last explicit computation for display purposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ballast_core::{Address, AuditEvent, BallastError, CredentialTypeId};
use ballast_credential::{CredentialRecord, CredentialTypeConfig, IssuerRecord};
use ballast_score::{compute_breakdown, CreditContribution, ScoreSnapshot, Tier};

use crate::protocol::Protocol;

/// A subject's score together with its tier placement, the full
/// per-credential decomposition behind it, and the cached snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub subject: Address,
    pub score: u16,
    pub tier_name: String,
    pub collateral_factor_bps: u16,
    pub advisory_rate_bps: u16,
    pub weighted_sum: f64,
    pub diversity_bonus: f64,
    pub credentials_counted: u32,
    pub distinct_types: u32,
    pub contributions: Vec<CreditContribution>,
    /// Last explicitly computed score, absent until one has run.
    pub snapshot: Option<ScoreSnapshot>,
}

impl Protocol {
    /// Submit a credential on behalf of `subject` and fold it into the
    /// subject's score.
    ///
    /// `data` is the raw payload the issuer signed; only its SHA-256 hash
    /// is retained. Returns the subject's score after the submission.
    ///
    /// # Errors
    /// Propagates the ledger's precondition chain: `NotFound` /
    /// `Unauthorized` for unknown or deactivated issuers and types,
    /// `Expired` for a non-future expiry, `Crypto` for a bad signature,
    /// `Conflict` for a replayed payload, and `Validation` for a zero
    /// subject or a subject at the credential cap.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_credential(
        &mut self,
        subject: Address,
        issuer: Address,
        type_id: CredentialTypeId,
        data: &[u8],
        signature: &[u8],
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u16, BallastError> {
        self.non_reentrant(|p| {
            let old_score = compute_breakdown(
                subject,
                &p.credentials,
                &p.issuers,
                &p.credential_types,
                now,
            )
            .score;

            let record = p.credentials.submit(
                &mut p.issuers,
                &p.credential_types,
                subject,
                issuer,
                type_id,
                data,
                signature,
                expires_at,
                now,
            )?;

            let new_score = compute_breakdown(
                subject,
                &p.credentials,
                &p.issuers,
                &p.credential_types,
                now,
            )
            .score;
            p.snapshots.insert(
                subject,
                ScoreSnapshot {
                    last_score: new_score,
                    last_updated: now,
                    initialized: true,
                },
            );

            // A just-issued credential has recency 1.0.
            let effective_weight = match (p.credential_types.get(type_id), p.issuers.get(issuer))
            {
                (Some(type_config), Some(issuer_record)) => {
                    type_config.base_weight as f64 * (issuer_record.trust_score as f64 / 100.0)
                }
                _ => 0.0,
            };

            tracing::info!(%subject, %issuer, %type_id, old_score, new_score, "credential accepted");
            p.events.record(AuditEvent::CredentialSubmitted {
                subject,
                issuer,
                type_id,
                content_hash: record.content_hash_hex(),
                expires_at,
                old_score,
                new_score,
            });
            p.events.record(AuditEvent::CredentialScored {
                subject,
                issuer,
                type_id,
                effective_weight,
            });

            Ok(new_score)
        })
    }

    /// Recompute a subject's score, refresh the snapshot, and emit audit
    /// events: one `CredentialScored` per counted credential, at its
    /// current recency, then the `ScoreComputed` summary. Callable by
    /// anyone.
    pub fn compute_score(
        &mut self,
        subject: Address,
        now: DateTime<Utc>,
    ) -> Result<u16, BallastError> {
        self.non_reentrant(|p| {
            let breakdown = compute_breakdown(
                subject,
                &p.credentials,
                &p.issuers,
                &p.credential_types,
                now,
            );
            p.snapshots.insert(
                subject,
                ScoreSnapshot {
                    last_score: breakdown.score,
                    last_updated: now,
                    initialized: true,
                },
            );
            tracing::debug!(%subject, score = breakdown.score, "score recomputed");
            for contribution in &breakdown.contributions {
                p.events.record(AuditEvent::CredentialScored {
                    subject,
                    issuer: contribution.issuer,
                    type_id: contribution.type_id,
                    effective_weight: contribution.effective_weight,
                });
            }
            p.events.record(AuditEvent::ScoreComputed {
                subject,
                score: breakdown.score,
                credentials_counted: breakdown.credentials_counted,
                distinct_types: breakdown.distinct_types,
            });
            Ok(breakdown.score)
        })
    }

    /// A subject's current score, computed fresh. Pure read: no snapshot
    /// update, no event.
    pub fn credit_score(&self, subject: Address, now: DateTime<Utc>) -> u16 {
        compute_breakdown(
            subject,
            &self.credentials,
            &self.issuers,
            &self.credential_types,
            now,
        )
        .score
    }

    /// Score, tier placement, per-credential decomposition, and the
    /// cached snapshot for a subject. Requires the tier table.
    pub fn score_details(
        &self,
        subject: Address,
        now: DateTime<Utc>,
    ) -> Result<ScoreDetails, BallastError> {
        let breakdown = compute_breakdown(
            subject,
            &self.credentials,
            &self.issuers,
            &self.credential_types,
            now,
        );
        let tier = self.tier_table()?.tier_for(breakdown.score);

        Ok(ScoreDetails {
            subject,
            score: breakdown.score,
            tier_name: tier.name.clone(),
            collateral_factor_bps: tier.collateral_factor_bps,
            advisory_rate_bps: tier.advisory_rate_bps,
            weighted_sum: breakdown.weighted_sum,
            diversity_bonus: breakdown.diversity_bonus,
            credentials_counted: breakdown.credentials_counted,
            distinct_types: breakdown.distinct_types,
            contributions: breakdown.contributions,
            snapshot: self.score_snapshot(subject),
        })
    }

    /// The last explicitly computed score, if any computation has run.
    pub fn score_snapshot(&self, subject: Address) -> Option<ScoreSnapshot> {
        self.snapshots.get(&subject).copied()
    }

    pub fn is_issuer_registered(&self, issuer: Address) -> bool {
        self.issuers.is_registered(issuer)
    }

    pub fn issuer(&self, issuer: Address) -> Option<&IssuerRecord> {
        self.issuers.get(issuer)
    }

    pub fn credential_type(&self, type_id: CredentialTypeId) -> Option<&CredentialTypeConfig> {
        self.credential_types.get(type_id)
    }

    /// All credentials ever accepted for a subject, expired ones included.
    pub fn credentials_of(&self, subject: Address) -> &[CredentialRecord] {
        self.credentials.credentials_of(subject)
    }

    /// The tier a score falls into.
    pub fn tier_for_score(&self, score: u16) -> Result<&Tier, BallastError> {
        Ok(self.tier_table()?.tier_for(score))
    }

    /// Collateral factor for a score, in basis points.
    pub fn collateral_factor(&self, score: u16) -> Result<u16, BallastError> {
        Ok(self.tier_table()?.collateral_factor_bps(score))
    }

    /// Collateral factor for a subject's live score. Used by borrow and
    /// withdraw admission.
    pub(crate) fn live_collateral_factor(
        &self,
        subject: Address,
        now: DateTime<Utc>,
    ) -> Result<u16, BallastError> {
        let score = self.credit_score(subject, now);
        self.collateral_factor(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProtocolConfig;
    use ballast_core::{hash_bytes, Keypair};
    use chrono::Duration;

    struct Fixture {
        protocol: Protocol,
        issuer_keys: Keypair,
        subject: Address,
        now: DateTime<Utc>,
    }

    fn authority() -> Address {
        Address([0xAA; 32])
    }

    fn make_fixture() -> Fixture {
        let now = Utc::now();
        let mut protocol = Protocol::new(authority()).unwrap();
        let issuer_keys = Keypair::generate();

        protocol
            .register_issuer(authority(), issuer_keys.address(), "Acme Attestations", 80, now)
            .unwrap();
        protocol
            .register_credential_type(authority(), CredentialTypeId(1), "KYC", 50, 180)
            .unwrap();
        protocol.initialize_standard_tiers(authority()).unwrap();
        protocol.take_events();

        Fixture {
            protocol,
            issuer_keys,
            subject: Address([9u8; 32]),
            now,
        }
    }

    fn submit(fx: &mut Fixture, data: &[u8]) -> Result<u16, BallastError> {
        let signature = fx.issuer_keys.sign(&hash_bytes(data));
        fx.protocol.submit_credential(
            fx.subject,
            fx.issuer_keys.address(),
            CredentialTypeId(1),
            data,
            &signature,
            fx.now + Duration::days(365),
            fx.now,
        )
    }

    #[test]
    fn test_submit_updates_score_and_snapshot() {
        let mut fx = make_fixture();
        // 50 * 0.8 = 40; (500 + 40) * 1.05 = 567
        let score = submit(&mut fx, b"kyc payload").unwrap();
        assert_eq!(score, 567);

        let snapshot = fx.protocol.score_snapshot(fx.subject).unwrap();
        assert_eq!(snapshot.last_score, 567);
        assert!(snapshot.initialized);
        assert_eq!(fx.protocol.credentials_of(fx.subject).len(), 1);
    }

    #[test]
    fn test_submit_emits_events_with_score_delta() {
        let mut fx = make_fixture();
        submit(&mut fx, b"kyc payload").unwrap();

        let events = fx.protocol.take_events();
        assert_eq!(events.len(), 2);
        match &events[0] {
            AuditEvent::CredentialSubmitted {
                old_score,
                new_score,
                ..
            } => {
                assert_eq!(*old_score, 500);
                assert_eq!(*new_score, 567);
            }
            other => panic!("expected CredentialSubmitted, got {:?}", other),
        }
        match &events[1] {
            AuditEvent::CredentialScored {
                effective_weight, ..
            } => assert!((effective_weight - 40.0).abs() < 1e-9),
            other => panic!("expected CredentialScored, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_unknown_issuer_rejected() {
        let mut fx = make_fixture();
        let impostor = Keypair::generate();
        let data = b"payload";
        let signature = impostor.sign(&hash_bytes(data));

        let result = fx.protocol.submit_credential(
            fx.subject,
            impostor.address(),
            CredentialTypeId(1),
            data,
            &signature,
            fx.now + Duration::days(30),
            fx.now,
        );
        assert!(matches!(result, Err(BallastError::NotFound(_))));
        assert!(fx.protocol.events().is_empty());
    }

    #[test]
    fn test_submit_forged_signature_rejected() {
        let mut fx = make_fixture();
        let impostor = Keypair::generate();
        let data = b"payload";
        let signature = impostor.sign(&hash_bytes(data));

        let result = fx.protocol.submit_credential(
            fx.subject,
            fx.issuer_keys.address(),
            CredentialTypeId(1),
            data,
            &signature,
            fx.now + Duration::days(30),
            fx.now,
        );
        assert!(matches!(result, Err(BallastError::Crypto(_))));
        assert!(fx.protocol.credentials_of(fx.subject).is_empty());
    }

    #[test]
    fn test_submit_replay_rejected() {
        let mut fx = make_fixture();
        submit(&mut fx, b"same payload").unwrap();
        let result = submit(&mut fx, b"same payload");
        assert!(matches!(result, Err(BallastError::Conflict(_))));
        assert_eq!(fx.protocol.credentials_of(fx.subject).len(), 1);
    }

    #[test]
    fn test_credential_cap_from_config() {
        let config = ProtocolConfig {
            max_credentials_per_user: 2,
            ..ProtocolConfig::default()
        };
        let mut protocol = Protocol::with_config(authority(), config).unwrap();

        let now = Utc::now();
        let issuer_keys = Keypair::generate();
        protocol
            .register_issuer(authority(), issuer_keys.address(), "Acme", 80, now)
            .unwrap();
        protocol
            .register_credential_type(authority(), CredentialTypeId(1), "KYC", 50, 180)
            .unwrap();

        let subject = Address([9u8; 32]);
        for index in 0..2u8 {
            let data = [index; 8];
            let signature = issuer_keys.sign(&hash_bytes(&data));
            protocol
                .submit_credential(
                    subject,
                    issuer_keys.address(),
                    CredentialTypeId(1),
                    &data,
                    &signature,
                    now + Duration::days(30),
                    now,
                )
                .unwrap();
        }

        let data = [0xFF; 8];
        let signature = issuer_keys.sign(&hash_bytes(&data));
        let result = protocol.submit_credential(
            subject,
            issuer_keys.address(),
            CredentialTypeId(1),
            &data,
            &signature,
            now + Duration::days(30),
            now,
        );
        assert!(matches!(result, Err(BallastError::Validation(_))));
    }

    #[test]
    fn test_compute_score_snapshots_and_emits() {
        let mut fx = make_fixture();
        let score = fx.protocol.compute_score(fx.subject, fx.now).unwrap();
        assert_eq!(score, 500);

        let snapshot = fx.protocol.score_snapshot(fx.subject).unwrap();
        assert_eq!(snapshot.last_score, 500);
        assert_eq!(snapshot.last_updated, fx.now);

        // No credentials counted: only the summary event
        let events = fx.protocol.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AuditEvent::ScoreComputed { .. }));
    }

    #[test]
    fn test_compute_score_emits_per_credential_events() {
        let mut fx = make_fixture();
        fx.protocol
            .register_credential_type(authority(), CredentialTypeId(2), "Income", 50, 180)
            .unwrap();
        submit(&mut fx, b"kyc payload").unwrap();
        let data = b"income payload";
        let signature = fx.issuer_keys.sign(&hash_bytes(data));
        fx.protocol
            .submit_credential(
                fx.subject,
                fx.issuer_keys.address(),
                CredentialTypeId(2),
                data,
                &signature,
                fx.now + Duration::days(365),
                fx.now,
            )
            .unwrap();
        fx.protocol.take_events();

        // Two 40-weight contributions: (500 + 80) * 1.10 = 638
        let score = fx.protocol.compute_score(fx.subject, fx.now).unwrap();
        assert_eq!(score, 638);

        // One event per counted credential, then the summary
        let events = fx.protocol.take_events();
        assert_eq!(events.len(), 3);
        match &events[0] {
            AuditEvent::CredentialScored {
                type_id,
                effective_weight,
                ..
            } => {
                assert_eq!(*type_id, CredentialTypeId(1));
                assert!((effective_weight - 40.0).abs() < 1e-9);
            }
            other => panic!("expected CredentialScored, got {:?}", other),
        }
        assert!(matches!(
            events[1],
            AuditEvent::CredentialScored {
                type_id: CredentialTypeId(2),
                ..
            }
        ));
        match &events[2] {
            AuditEvent::ScoreComputed {
                score,
                credentials_counted,
                distinct_types,
                ..
            } => {
                assert_eq!(*score, 638);
                assert_eq!(*credentials_counted, 2);
                assert_eq!(*distinct_types, 2);
            }
            other => panic!("expected ScoreComputed, got {:?}", other),
        }
    }

    #[test]
    fn test_credit_score_is_pure() {
        let fx = make_fixture();
        let score = fx.protocol.credit_score(fx.subject, fx.now);
        assert_eq!(score, 500);
        assert!(fx.protocol.score_snapshot(fx.subject).is_none());
        assert!(fx.protocol.events().is_empty());
    }

    #[test]
    fn test_score_details_carries_tier_and_snapshot() {
        let mut fx = make_fixture();
        submit(&mut fx, b"kyc payload").unwrap();

        let details = fx.protocol.score_details(fx.subject, fx.now).unwrap();
        assert_eq!(details.score, 567);
        assert_eq!(details.tier_name, "Fair");
        assert_eq!(details.collateral_factor_bps, 10_000);
        assert_eq!(details.contributions.len(), 1);

        // The submission cached a snapshot; the details carry it along
        let snapshot = details.snapshot.unwrap();
        assert_eq!(snapshot.last_score, 567);
        assert!(snapshot.initialized);

        // A subject no computation has touched reads back without one
        let blank = fx.protocol.score_details(Address([8u8; 32]), fx.now).unwrap();
        assert_eq!(blank.score, 500);
        assert!(blank.snapshot.is_none());
    }

    #[test]
    fn test_score_details_without_tiers_fails() {
        let protocol = Protocol::new(authority()).unwrap();
        let result = protocol.score_details(Address([9u8; 32]), Utc::now());
        assert!(matches!(result, Err(BallastError::NotFound(_))));
    }

    #[test]
    fn test_live_collateral_factor_tracks_decay() {
        let mut fx = make_fixture();
        submit(&mut fx, b"kyc payload").unwrap();

        // 567 lands in Fair (10000 bps)
        let fresh = fx
            .protocol
            .live_collateral_factor(fx.subject, fx.now)
            .unwrap();
        assert_eq!(fresh, 10_000);

        // Half the decay window later: 50 * 0.8 * 0.5 = 20;
        // (500 + 20) * 1.05 = 546, still Fair
        let later = fx.now + Duration::days(90);
        let mid = fx
            .protocol
            .live_collateral_factor(fx.subject, later)
            .unwrap();
        assert_eq!(mid, 10_000);
    }
}
