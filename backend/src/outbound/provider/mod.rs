//! DNS provider adapters.
//!
//! Two implementations of the [`crate::domain::ports::DnsProvider`] port:
//! a latency-simulating stand-in for development, and a reqwest adapter for
//! a real zone-management REST API.

mod dto;
mod http_client;
mod simulated;

pub use http_client::HttpDnsProvider;
pub use simulated::SimulatedDnsProvider;
