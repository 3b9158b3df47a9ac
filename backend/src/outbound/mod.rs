//! Outbound adapters implementing the domain's driven ports.

pub mod password;
pub mod persistence;
pub mod provider;
