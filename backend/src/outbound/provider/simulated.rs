//! Latency-simulating DNS provider stand-in.
//!
//! Behaves like an eventually-consistent zone API that accepts everything:
//! each call waits a configurable artificial delay, mutations come back
//! `PENDING` with a fresh change id, and status polls report `INSYNC`.
//! Useful for development and demos; tests that need failures script a mock
//! instead.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    ChangeId, ChangeStatus, DnsProvider, DnsProviderError, ProviderChange,
    ProviderRecordDeletion, ProviderRecordRequest, ProviderRecordUpdate,
};

/// Default artificial latency per call.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(300);

/// Always-succeeding provider with artificial latency.
#[derive(Debug, Clone)]
pub struct SimulatedDnsProvider {
    latency: Duration,
}

impl Default for SimulatedDnsProvider {
    fn default() -> Self {
        Self {
            latency: DEFAULT_SIMULATED_LATENCY,
        }
    }
}

impl SimulatedDnsProvider {
    /// Create a provider with the default latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with an explicit latency.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_call(&self) -> ProviderChange {
        tokio::time::sleep(self.latency).await;
        ProviderChange {
            change_id: ChangeId::new(format!("sim-change-{}", Uuid::new_v4())),
            status: ChangeStatus::Pending,
        }
    }
}

#[async_trait]
impl DnsProvider for SimulatedDnsProvider {
    async fn create_record(
        &self,
        request: &ProviderRecordRequest,
    ) -> Result<ProviderChange, DnsProviderError> {
        debug!(
            zone_id = %request.zone_id,
            name = %request.name,
            record_type = %request.record.record_type,
            "simulated provider: creating record"
        );
        Ok(self.simulate_call().await)
    }

    async fn update_record(
        &self,
        update: &ProviderRecordUpdate,
    ) -> Result<ProviderChange, DnsProviderError> {
        debug!(
            zone_id = %update.request.zone_id,
            record_id = %update.record_id,
            "simulated provider: updating record"
        );
        Ok(self.simulate_call().await)
    }

    async fn delete_record(
        &self,
        deletion: &ProviderRecordDeletion,
    ) -> Result<ProviderChange, DnsProviderError> {
        debug!(
            zone_id = %deletion.zone_id,
            record_id = %deletion.record_id,
            "simulated provider: deleting record"
        );
        Ok(self.simulate_call().await)
    }

    async fn change_status(
        &self,
        change_id: &ChangeId,
    ) -> Result<ProviderChange, DnsProviderError> {
        tokio::time::sleep(self.latency).await;
        // Propagation is instantaneous in the simulation.
        Ok(ProviderChange {
            change_id: change_id.clone(),
            status: ChangeStatus::InSync,
        })
    }
}
