//! Domain core: entities, status workflows, and ports.
//!
//! This module is transport and storage agnostic. Workflow services talk to
//! the relational store and the outbound mailer exclusively through the
//! traits in [`ports`]; inbound adapters call the services and map
//! [`Error`] onto their own envelope.

pub mod billing;
pub mod billing_workflow;
pub mod deadline_sweep;
pub mod directory;
pub mod error;
pub mod messages;
pub mod milestone_workflow;
pub mod milestones;
pub mod notifications;
pub mod numbering;
pub mod order_workflow;
pub mod orders;
pub mod portal;
pub mod ports;
pub mod proposal_workflow;
pub mod proposals;
pub mod rate_limit;
pub mod recipients;
pub mod status;
pub mod tasks;
pub mod ticket_workflow;
pub mod tickets;
pub mod trace_id;

pub use self::error::{ApiResult, Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
