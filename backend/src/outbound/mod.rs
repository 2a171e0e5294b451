//! Driven adapters: persistence and outbound email.

pub mod email;
pub mod persistence;
