//! Inbound adapters that turn external requests into domain port calls.

pub mod http;
