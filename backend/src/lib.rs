//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Request tracing middleware re-exported at the crate root for app wiring.
pub use middleware::trace::Trace;
/// Request-scoped trace identifier.
pub use middleware::trace::TraceId;
