//! Proposal aggregate: commercial quotes sent to clients.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::ProposalStatus;

/// A commercial quote sent to a prospective or existing client.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Primary identifier.
    pub id: Uuid,
    /// Human-readable document number, e.g. `KP-2026-003`.
    pub number: String,
    /// Addressed client.
    pub client_id: Uuid,
    /// Current lifecycle state.
    pub status: ProposalStatus,
    /// Stamped when the proposal is first sent.
    pub sent_at: Option<DateTime<Utc>>,
    /// Stamped when the client first views it.
    pub viewed_at: Option<DateTime<Utc>>,
    /// Stamped when the client accepts or rejects it.
    pub responded_at: Option<DateTime<Utc>>,
}

/// Input for creating a proposal.
///
/// The number is assigned by the workflow; new proposals start as `Draft`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalDraft {
    /// Addressed client.
    pub client_id: Uuid,
}

/// Timestamp assignments accompanying a proposal status transition.
///
/// Proposal stamps are set-only: a `Some` value stamps the column, `None`
/// leaves it untouched. Nothing in the proposal lifecycle clears a stamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProposalStamps {
    /// Stamp for `sent_at`.
    pub sent_at: Option<DateTime<Utc>>,
    /// Stamp for `viewed_at`.
    pub viewed_at: Option<DateTime<Utc>>,
    /// Stamp for `responded_at`.
    pub responded_at: Option<DateTime<Utc>>,
}
