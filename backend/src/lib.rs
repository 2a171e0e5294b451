//! ITL OrderFlow backend library.
//!
//! A line-of-business workflow service for an IT services company: order,
//! milestone, invoice, proposal, and ticket status workflows with
//! notification fan-out, document numbering, and a client portal. The
//! crate is structured hexagonally: [`domain`] holds the workflow core and
//! its ports, [`outbound`] the PostgreSQL and SMTP adapters, [`inbound`]
//! the Actix Web surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
