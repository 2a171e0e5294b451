//! Driving adapters: inbound HTTP surface.

pub mod http;
