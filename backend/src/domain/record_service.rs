//! DNS record provisioning orchestrator.
//!
//! Composes ownership resolution, pure validation, the provider gateway, and
//! the record repository into the create/delete workflows. Ordering is the
//! point: nothing is persisted locally unless the provider accepted the
//! change, and nothing is deleted locally unless the provider accepted the
//! deletion.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::ports::{
    CreateRecordRequest, DnsProvider, DnsProviderError, DnsRecordRepository,
    DnsRecordRepositoryError, NewDnsRecord, ProviderRecordDeletion, ProviderRecordRequest,
    RecordCommand, RecordQuery, SubdomainRepository, SubdomainRepositoryError,
};
use crate::domain::records::validation::{validate_record, RecordValidationError};
use crate::domain::records::DnsRecord;
use crate::domain::user::UserId;

/// Default deadline for a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Record service implementing the record driving ports.
pub struct RecordService<R, S, P: ?Sized> {
    records: Arc<R>,
    subdomains: Arc<S>,
    provider: Arc<P>,
    provider_timeout: Duration,
}

impl<R, S, P: ?Sized> RecordService<R, S, P> {
    /// Create a new service with the default provider deadline.
    pub fn new(records: Arc<R>, subdomains: Arc<S>, provider: Arc<P>) -> Self {
        Self {
            records,
            subdomains,
            provider,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Override the provider call deadline.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }
}

fn validation_code(error: &RecordValidationError) -> &'static str {
    match error {
        RecordValidationError::InvalidIpv4Address { .. } => "invalid_ipv4",
        RecordValidationError::InvalidDomainName { .. } => "invalid_domain_name",
        RecordValidationError::MissingPriority => "missing_priority",
        RecordValidationError::PriorityOutOfRange { .. } => "priority_out_of_range",
        RecordValidationError::UnexpectedPriority => "unexpected_priority",
        RecordValidationError::TtlOutOfRange { .. } => "ttl_out_of_range",
    }
}

fn map_validation_error(error: &RecordValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": validation_code(error),
    }))
}

impl<R, S, P> RecordService<R, S, P>
where
    R: DnsRecordRepository,
    S: SubdomainRepository,
    P: DnsProvider + ?Sized,
{
    fn map_record_error(error: DnsRecordRepositoryError) -> Error {
        match error {
            DnsRecordRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("dns record repository unavailable: {message}"))
            }
            DnsRecordRepositoryError::Query { message } => {
                Error::internal(format!("dns record repository error: {message}"))
            }
        }
    }

    fn map_subdomain_error(error: SubdomainRepositoryError) -> Error {
        match error {
            SubdomainRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("subdomain repository unavailable: {message}"))
            }
            SubdomainRepositoryError::Query { message } => {
                Error::internal(format!("subdomain repository error: {message}"))
            }
            SubdomainRepositoryError::DuplicateLabel => {
                Error::internal("unexpected label conflict during record workflow")
            }
        }
    }

    fn map_provider_error(error: DnsProviderError) -> Error {
        Error::provider_failure(error.to_string())
    }

    fn subdomain_not_found() -> Error {
        Error::not_found("subdomain not found")
    }

    fn record_not_found() -> Error {
        Error::not_found("DNS record not found")
    }

    async fn call_provider<F, T>(&self, fut: F) -> Result<T, Error>
    where
        F: std::future::Future<Output = Result<T, DnsProviderError>>,
    {
        tokio::time::timeout(self.provider_timeout, fut)
            .await
            .map_err(|_| {
                Error::provider_failure(format!(
                    "provider call timed out after {:?}",
                    self.provider_timeout
                ))
            })?
            .map_err(Self::map_provider_error)
    }
}

#[async_trait]
impl<R, S, P> RecordCommand for RecordService<R, S, P>
where
    R: DnsRecordRepository,
    S: SubdomainRepository,
    P: DnsProvider + ?Sized,
{
    async fn create(&self, request: CreateRecordRequest) -> Result<DnsRecord, Error> {
        let owned = self
            .subdomains
            .find_owned(&request.user_id, request.subdomain_id)
            .await
            .map_err(Self::map_subdomain_error)?
            .ok_or_else(Self::subdomain_not_found)?;

        let spec = validate_record(&request.draft).map_err(|err| map_validation_error(&err))?;

        let change = self
            .call_provider(self.provider.create_record(&ProviderRecordRequest {
                zone_id: owned.domain.zone_id.clone(),
                name: owned.subdomain.full_domain.clone(),
                record: spec.clone(),
            }))
            .await?;

        let record = self
            .records
            .insert(NewDnsRecord {
                subdomain_id: request.subdomain_id,
                spec,
            })
            .await
            .map_err(Self::map_record_error)?;

        info!(
            record_id = %record.id,
            record_type = %record.record_type,
            change_id = %change.change_id,
            "dns record created"
        );
        Ok(record)
    }

    async fn delete(&self, user_id: &UserId, record_id: Uuid) -> Result<(), Error> {
        let owned = self
            .records
            .find_with_ownership(record_id)
            .await
            .map_err(Self::map_record_error)?
            .filter(|owned| owned.subdomain.user_id == *user_id)
            .ok_or_else(Self::record_not_found)?;

        // Provider success is a precondition for removing the local row.
        let change = self
            .call_provider(self.provider.delete_record(
                &ProviderRecordDeletion::for_local_record(owned.domain.zone_id.clone(), record_id),
            ))
            .await?;

        self.records
            .delete(record_id)
            .await
            .map_err(Self::map_record_error)?;

        info!(
            record_id = %record_id,
            change_id = %change.change_id,
            "dns record deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl<R, S, P> RecordQuery for RecordService<R, S, P>
where
    R: DnsRecordRepository,
    S: SubdomainRepository,
    P: DnsProvider + ?Sized,
{
    async fn list(&self, user_id: &UserId, subdomain_id: Uuid) -> Result<Vec<DnsRecord>, Error> {
        self.subdomains
            .find_owned(user_id, subdomain_id)
            .await
            .map_err(Self::map_subdomain_error)?
            .ok_or_else(Self::subdomain_not_found)?;

        self.records
            .list_for_subdomain(subdomain_id)
            .await
            .map_err(Self::map_record_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{
        ChangeId, ChangeStatus, MockDnsProvider, MockDnsRecordRepository, MockSubdomainRepository,
        OwnedRecord, ProviderChange, ProviderRecordUpdate,
    };
    use crate::domain::records::{RecordDraft, RecordType};
    use crate::domain::subdomain::{Subdomain, SubdomainLabel, SubdomainWithDomain};
    use crate::domain::zone::{DomainName, ParentDomain, ZoneId};
    use chrono::Utc;

    type Service = RecordService<MockDnsRecordRepository, MockSubdomainRepository, MockDnsProvider>;

    fn service(
        records: MockDnsRecordRepository,
        subdomains: MockSubdomainRepository,
        provider: MockDnsProvider,
    ) -> Service {
        RecordService::new(Arc::new(records), Arc::new(subdomains), Arc::new(provider))
    }

    fn parent_domain() -> ParentDomain {
        ParentDomain {
            id: Uuid::new_v4(),
            domain_name: DomainName::new("example.com").expect("valid name"),
            zone_id: ZoneId::new("Z1234567890ABC").expect("valid zone id"),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn owned_subdomain(user_id: UserId) -> SubdomainWithDomain {
        let domain = parent_domain();
        let now = Utc::now();
        let label = SubdomainLabel::new("foo").expect("valid label");
        SubdomainWithDomain {
            subdomain: Subdomain {
                id: Uuid::new_v4(),
                user_id,
                domain_id: domain.id,
                full_domain: label.full_domain(&domain.domain_name),
                label,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            domain,
        }
    }

    fn stored_record(subdomain_id: Uuid, record: NewDnsRecord) -> DnsRecord {
        let now = Utc::now();
        DnsRecord {
            id: Uuid::new_v4(),
            subdomain_id,
            record_type: record.spec.record_type,
            value: record.spec.value,
            priority: record.spec.priority,
            ttl: record.spec.ttl,
            created_at: now,
            updated_at: now,
        }
    }

    fn pending_change() -> ProviderChange {
        ProviderChange {
            change_id: ChangeId::new("mock-change-1"),
            status: ChangeStatus::Pending,
        }
    }

    fn mx_request(user_id: UserId, subdomain_id: Uuid) -> CreateRecordRequest {
        CreateRecordRequest {
            user_id,
            subdomain_id,
            draft: RecordDraft {
                record_type: RecordType::Mx,
                value: "mail.example.com".to_owned(),
                priority: Some(10),
                ttl: 3600,
            },
        }
    }

    #[tokio::test]
    async fn create_provisions_then_persists() {
        let user_id = UserId::random();
        let owned = owned_subdomain(user_id);
        let subdomain_id = owned.subdomain.id;

        let mut subdomains = MockSubdomainRepository::new();
        subdomains
            .expect_find_owned()
            .times(1)
            .return_once(move |_, _| Ok(Some(owned)));
        let mut provider = MockDnsProvider::new();
        provider
            .expect_create_record()
            .withf(|request: &ProviderRecordRequest| {
                request.name == "foo.example.com"
                    && request.zone_id.as_ref() == "Z1234567890ABC"
                    && request.record.priority == Some(10)
            })
            .times(1)
            .returning(|_| Ok(pending_change()));
        let mut records = MockDnsRecordRepository::new();
        records
            .expect_insert()
            .times(1)
            .return_once(move |new| Ok(stored_record(subdomain_id, new)));

        let service = service(records, subdomains, provider);
        let record = service
            .create(mx_request(user_id, subdomain_id))
            .await
            .expect("creation succeeds");
        assert_eq!(record.record_type, RecordType::Mx);
        assert_eq!(record.priority, Some(10));
        assert_eq!(record.value, "mail.example.com");
    }

    #[tokio::test]
    async fn create_for_foreign_subdomain_is_not_found_with_no_side_effects() {
        let mut subdomains = MockSubdomainRepository::new();
        subdomains
            .expect_find_owned()
            .times(1)
            .return_once(|_, _| Ok(None));
        let mut provider = MockDnsProvider::new();
        provider.expect_create_record().times(0);
        let mut records = MockDnsRecordRepository::new();
        records.expect_insert().times(0);

        let service = service(records, subdomains, provider);
        let err = service
            .create(mx_request(UserId::random(), Uuid::new_v4()))
            .await
            .expect_err("foreign subdomain hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft_before_any_side_effect() {
        let user_id = UserId::random();
        let owned = owned_subdomain(user_id);
        let subdomain_id = owned.subdomain.id;

        let mut subdomains = MockSubdomainRepository::new();
        subdomains
            .expect_find_owned()
            .times(1)
            .return_once(move |_, _| Ok(Some(owned)));
        let mut provider = MockDnsProvider::new();
        provider.expect_create_record().times(0);
        let mut records = MockDnsRecordRepository::new();
        records.expect_insert().times(0);

        let service = service(records, subdomains, provider);
        let request = CreateRecordRequest {
            user_id,
            subdomain_id,
            draft: RecordDraft {
                record_type: RecordType::A,
                value: "256.1.1.1".to_owned(),
                priority: None,
                ttl: 3600,
            },
        };
        let err = service.create(request).await.expect_err("invalid draft");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().and_then(|v| v.as_object()).expect("details");
        assert_eq!(
            details.get("field").and_then(|v| v.as_str()),
            Some("recordValue")
        );
    }

    #[tokio::test]
    async fn create_leaves_repository_unchanged_when_provider_fails() {
        let user_id = UserId::random();
        let owned = owned_subdomain(user_id);
        let subdomain_id = owned.subdomain.id;

        let mut subdomains = MockSubdomainRepository::new();
        subdomains
            .expect_find_owned()
            .times(1)
            .return_once(move |_, _| Ok(Some(owned)));
        let mut provider = MockDnsProvider::new();
        provider
            .expect_create_record()
            .times(1)
            .returning(|_| Err(DnsProviderError::rejected("zone is locked")));
        let mut records = MockDnsRecordRepository::new();
        records.expect_insert().times(0);

        let service = service(records, subdomains, provider);
        let err = service
            .create(mx_request(user_id, subdomain_id))
            .await
            .expect_err("provider failure aborts");
        assert_eq!(err.code(), ErrorCode::ProviderFailure);
    }

    #[tokio::test(start_paused = true)]
    async fn create_times_out_slow_provider_calls() {
        struct SlowProvider;

        #[async_trait]
        impl DnsProvider for SlowProvider {
            async fn create_record(
                &self,
                _request: &ProviderRecordRequest,
            ) -> Result<ProviderChange, DnsProviderError> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(pending_change())
            }

            async fn update_record(
                &self,
                _update: &ProviderRecordUpdate,
            ) -> Result<ProviderChange, DnsProviderError> {
                Ok(pending_change())
            }

            async fn delete_record(
                &self,
                _deletion: &ProviderRecordDeletion,
            ) -> Result<ProviderChange, DnsProviderError> {
                Ok(pending_change())
            }

            async fn change_status(
                &self,
                _change_id: &ChangeId,
            ) -> Result<ProviderChange, DnsProviderError> {
                Ok(pending_change())
            }
        }

        let user_id = UserId::random();
        let owned = owned_subdomain(user_id);
        let subdomain_id = owned.subdomain.id;

        let mut subdomains = MockSubdomainRepository::new();
        subdomains
            .expect_find_owned()
            .times(1)
            .return_once(move |_, _| Ok(Some(owned)));
        let mut records = MockDnsRecordRepository::new();
        records.expect_insert().times(0);

        let service = RecordService::new(
            Arc::new(records),
            Arc::new(subdomains),
            Arc::new(SlowProvider),
        );
        let err = service
            .create(mx_request(user_id, subdomain_id))
            .await
            .expect_err("timeout is a provider failure");
        assert_eq!(err.code(), ErrorCode::ProviderFailure);
        assert!(err.message().contains("timed out"));
    }

    #[tokio::test]
    async fn delete_requires_provider_success_before_local_removal() {
        let user_id = UserId::random();
        let owned = owned_subdomain(user_id);
        let record = stored_record(
            owned.subdomain.id,
            NewDnsRecord {
                subdomain_id: owned.subdomain.id,
                spec: crate::domain::records::RecordSpec {
                    record_type: RecordType::A,
                    value: "192.168.1.1".to_owned(),
                    priority: None,
                    ttl: 3600,
                },
            },
        );
        let record_id = record.id;

        let mut records = MockDnsRecordRepository::new();
        records
            .expect_find_with_ownership()
            .times(1)
            .return_once(move |_| {
                Ok(Some(OwnedRecord {
                    record,
                    subdomain: owned.subdomain,
                    domain: owned.domain,
                }))
            });
        records.expect_delete().times(0);
        let mut provider = MockDnsProvider::new();
        provider
            .expect_delete_record()
            .times(1)
            .returning(|_| Err(DnsProviderError::transport("connection reset")));

        let service = service(records, MockSubdomainRepository::new(), provider);
        let err = service
            .delete(&user_id, record_id)
            .await
            .expect_err("provider failure aborts local delete");
        assert_eq!(err.code(), ErrorCode::ProviderFailure);
    }

    #[tokio::test]
    async fn delete_of_record_owned_by_another_user_is_not_found() {
        let owner = UserId::random();
        let caller = UserId::random();
        let owned = owned_subdomain(owner);
        let record = stored_record(
            owned.subdomain.id,
            NewDnsRecord {
                subdomain_id: owned.subdomain.id,
                spec: crate::domain::records::RecordSpec {
                    record_type: RecordType::Cname,
                    value: "target.example.com".to_owned(),
                    priority: None,
                    ttl: 300,
                },
            },
        );
        let record_id = record.id;

        let mut records = MockDnsRecordRepository::new();
        records
            .expect_find_with_ownership()
            .times(1)
            .return_once(move |_| {
                Ok(Some(OwnedRecord {
                    record,
                    subdomain: owned.subdomain,
                    domain: owned.domain,
                }))
            });
        records.expect_delete().times(0);
        let mut provider = MockDnsProvider::new();
        provider.expect_delete_record().times(0);

        let service = service(records, MockSubdomainRepository::new(), provider);
        let err = service
            .delete(&caller, record_id)
            .await
            .expect_err("foreign record hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_resolves_ownership_first() {
        let mut subdomains = MockSubdomainRepository::new();
        subdomains
            .expect_find_owned()
            .times(1)
            .return_once(|_, _| Ok(None));
        let mut records = MockDnsRecordRepository::new();
        records.expect_list_for_subdomain().times(0);

        let service = service(records, subdomains, MockDnsProvider::new());
        let err = service
            .list(&UserId::random(), Uuid::new_v4())
            .await
            .expect_err("unowned subdomain hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
