//! Inbound adapters
//!
//! Translate transport concerns into application use case calls.

pub mod http;
