//! Proposal status workflow.
//!
//! Proposal transitions are pure timestamp stamping: `Sent` stamps
//! `sent_at`, `Viewed` stamps `viewed_at`, `Accepted` and `Rejected` stamp
//! `responded_at`. Stamps are set-only and never cleared. Unlike orders,
//! milestones, and invoices, proposal transitions fan out no notifications;
//! preserving that asymmetry is deliberate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{ApiResult, Error};
use super::numbering::{DocumentKind, DocumentNumberService};
use super::ports::{ClientDirectory, ProposalRepository};
use super::proposals::{Proposal, ProposalDraft, ProposalStamps};
use super::status::ProposalStatus;

/// Compute the set-only stamps for a transition into `status`.
#[must_use]
pub fn stamps_for_transition(status: ProposalStatus, now: DateTime<Utc>) -> ProposalStamps {
    match status {
        ProposalStatus::Sent => ProposalStamps {
            sent_at: Some(now),
            ..ProposalStamps::default()
        },
        ProposalStatus::Viewed => ProposalStamps {
            viewed_at: Some(now),
            ..ProposalStamps::default()
        },
        ProposalStatus::Accepted | ProposalStatus::Rejected => ProposalStamps {
            responded_at: Some(now),
            ..ProposalStamps::default()
        },
        ProposalStatus::Draft | ProposalStatus::Expired => ProposalStamps::default(),
    }
}

/// Drives proposal creation and status transitions.
#[derive(Clone)]
pub struct ProposalWorkflowService {
    proposals: Arc<dyn ProposalRepository>,
    clients: Arc<dyn ClientDirectory>,
    numbering: DocumentNumberService,
}

impl ProposalWorkflowService {
    /// Create the service over its driven ports.
    pub fn new(
        proposals: Arc<dyn ProposalRepository>,
        clients: Arc<dyn ClientDirectory>,
        numbering: DocumentNumberService,
    ) -> Self {
        Self {
            proposals,
            clients,
            numbering,
        }
    }

    /// Create a draft proposal with a freshly allocated number.
    ///
    /// Proposals draw from the same atomic counter scheme as orders and
    /// invoices, so concurrent creations never mint duplicate numbers.
    pub async fn create(&self, draft: ProposalDraft) -> ApiResult<Proposal> {
        let client_exists = self
            .clients
            .find(draft.client_id)
            .await
            .map_err(|err| err.into_domain("client directory"))?
            .is_some();
        if !client_exists {
            return Err(Error::not_found(format!(
                "client {} not found",
                draft.client_id
            )));
        }

        let number = self.numbering.next_number(DocumentKind::Proposal).await?;
        let proposal = Proposal {
            id: Uuid::new_v4(),
            number,
            client_id: draft.client_id,
            status: ProposalStatus::Draft,
            sent_at: None,
            viewed_at: None,
            responded_at: None,
        };

        self.proposals
            .insert(&proposal)
            .await
            .map_err(|err| err.into_domain("proposal repository"))?;

        Ok(proposal)
    }

    /// Assign a new proposal status, stamping the matching timestamp.
    pub async fn set_status(&self, proposal_id: Uuid, status: ProposalStatus) -> ApiResult<()> {
        let exists = self
            .proposals
            .find(proposal_id)
            .await
            .map_err(|err| err.into_domain("proposal repository"))?
            .is_some();
        if !exists {
            return Err(Error::not_found(format!(
                "proposal {proposal_id} not found"
            )));
        }

        let stamps = stamps_for_transition(status, Utc::now());
        self.proposals
            .set_status(proposal_id, status, stamps)
            .await
            .map_err(|err| err.into_domain("proposal repository"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::proposals::Proposal;
    use crate::test_support::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> ProposalWorkflowService {
        ProposalWorkflowService::new(
            Arc::clone(store) as _,
            Arc::clone(store) as _,
            DocumentNumberService::new(Arc::clone(store) as _),
        )
    }

    fn seed_proposal(store: &InMemoryStore) -> Proposal {
        let proposal = Proposal {
            id: Uuid::new_v4(),
            number: "KP-2026-003".into(),
            client_id: Uuid::new_v4(),
            status: ProposalStatus::Draft,
            sent_at: None,
            viewed_at: None,
            responded_at: None,
        };
        store.insert_proposal(proposal.clone());
        proposal
    }

    #[rstest]
    #[case(ProposalStatus::Sent, true, false, false)]
    #[case(ProposalStatus::Viewed, false, true, false)]
    #[case(ProposalStatus::Accepted, false, false, true)]
    #[case(ProposalStatus::Rejected, false, false, true)]
    #[case(ProposalStatus::Draft, false, false, false)]
    #[case(ProposalStatus::Expired, false, false, false)]
    fn each_status_stamps_exactly_its_own_column(
        #[case] status: ProposalStatus,
        #[case] sent: bool,
        #[case] viewed: bool,
        #[case] responded: bool,
    ) {
        let stamps = stamps_for_transition(status, Utc::now());
        assert_eq!(stamps.sent_at.is_some(), sent);
        assert_eq!(stamps.viewed_at.is_some(), viewed);
        assert_eq!(stamps.responded_at.is_some(), responded);
    }

    #[tokio::test]
    async fn created_proposals_draw_from_the_atomic_counter() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        let client_id = Uuid::new_v4();
        store.insert_client(crate::domain::directory::Client {
            id: client_id,
            name: "Acme".into(),
            email: None,
            portal_token_digest: None,
        });

        let first = service
            .create(ProposalDraft { client_id })
            .await
            .expect("first proposal");
        let second = service
            .create(ProposalDraft { client_id })
            .await
            .expect("second proposal");

        assert!(first.number.starts_with("KP-"), "got {}", first.number);
        assert!(first.number.ends_with("-001"), "got {}", first.number);
        assert!(second.number.ends_with("-002"), "got {}", second.number);
        assert_eq!(first.status, ProposalStatus::Draft);
        assert_eq!(store.counters().next_proposal_number, 3);
    }

    #[tokio::test]
    async fn stamps_accumulate_across_the_lifecycle() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        let proposal = seed_proposal(&store);

        service
            .set_status(proposal.id, ProposalStatus::Sent)
            .await
            .expect("sent");
        service
            .set_status(proposal.id, ProposalStatus::Viewed)
            .await
            .expect("viewed");
        service
            .set_status(proposal.id, ProposalStatus::Accepted)
            .await
            .expect("accepted");

        let stored = store.proposal(proposal.id).expect("proposal");
        assert_eq!(stored.status, ProposalStatus::Accepted);
        assert!(stored.sent_at.is_some());
        assert!(stored.viewed_at.is_some());
        assert!(stored.responded_at.is_some());
    }

    #[tokio::test]
    async fn expiring_leaves_existing_stamps_untouched() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        let proposal = seed_proposal(&store);

        service
            .set_status(proposal.id, ProposalStatus::Sent)
            .await
            .expect("sent");
        let sent_at = store.proposal(proposal.id).expect("proposal").sent_at;

        service
            .set_status(proposal.id, ProposalStatus::Expired)
            .await
            .expect("expired");

        let stored = store.proposal(proposal.id).expect("proposal");
        assert_eq!(stored.status, ProposalStatus::Expired);
        assert_eq!(stored.sent_at, sent_at);
    }

    #[tokio::test]
    async fn proposal_transitions_create_no_notifications() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        let proposal = seed_proposal(&store);

        service
            .set_status(proposal.id, ProposalStatus::Sent)
            .await
            .expect("sent");

        assert!(store.notifications().is_empty());
    }

    #[tokio::test]
    async fn unknown_proposal_fails_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);

        let error = service
            .set_status(Uuid::new_v4(), ProposalStatus::Sent)
            .await
            .expect_err("missing proposal rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
