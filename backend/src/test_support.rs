//! In-memory adapters for integration tests.
//!
//! Enabled with the `test-support` feature. A shared [`InMemoryStore`] holds
//! the four tables behind mutexes; thin adapter types implement the driven
//! ports over it, mirroring the relational behaviour the Diesel adapters get
//! from PostgreSQL (unique constraints, joins, cascading deletes). The
//! [`ScriptedDnsProvider`] records every call and can be told to fail, which
//! is how tests exercise the no-orphan guarantees.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{
    ChangeId, ChangeStatus, DnsProvider, DnsProviderError, DnsRecordRepository,
    DnsRecordRepositoryError, NewDnsRecord, NewParentDomain, NewSubdomain, NewUser, OwnedRecord,
    ParentDomainRepository, ParentDomainRepositoryError, ProviderChange, ProviderRecordDeletion,
    ProviderRecordRequest, ProviderRecordUpdate, SubdomainRepository, SubdomainRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    DnsRecord, EmailAddress, ParentDomain, Subdomain, SubdomainLabel, SubdomainWithDomain, User,
    UserId,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared in-memory tables.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    domains: Mutex<Vec<ParentDomain>>,
    subdomains: Mutex<Vec<Subdomain>>,
    records: Mutex<Vec<DnsRecord>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert a parent domain directly, returning its identifier.
    pub fn add_parent_domain(&self, domain: NewParentDomain) -> Uuid {
        let id = Uuid::new_v4();
        lock(&self.domains).push(ParentDomain {
            id,
            domain_name: domain.domain_name,
            zone_id: domain.zone_id,
            is_active: domain.is_active,
            created_at: Utc::now(),
        });
        id
    }

    /// Count stored DNS records, across all subdomains.
    pub fn record_count(&self) -> usize {
        lock(&self.records).len()
    }

    /// Count stored subdomains.
    pub fn subdomain_count(&self) -> usize {
        lock(&self.subdomains).len()
    }

    fn domain_by_id(&self, id: Uuid) -> Option<ParentDomain> {
        lock(&self.domains).iter().find(|d| d.id == id).cloned()
    }
}

/// In-memory `UserRepository`.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    /// Adapter over the shared store.
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let mut users = lock(&self.store.users);
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserRepositoryError::DuplicateEmail);
        }
        let now = Utc::now();
        let stored = User {
            id: UserId::random(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(lock(&self.store.users)
            .iter()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(lock(&self.store.users)
            .iter()
            .find(|user| user.id == *id)
            .cloned())
    }
}

/// In-memory `ParentDomainRepository`.
#[derive(Clone)]
pub struct InMemoryParentDomainRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryParentDomainRepository {
    /// Adapter over the shared store.
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ParentDomainRepository for InMemoryParentDomainRepository {
    async fn list_active(&self) -> Result<Vec<ParentDomain>, ParentDomainRepositoryError> {
        Ok(lock(&self.store.domains)
            .iter()
            .filter(|domain| domain.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ParentDomain>, ParentDomainRepositoryError> {
        Ok(self.store.domain_by_id(id))
    }

    async fn seed(
        &self,
        domains: Vec<NewParentDomain>,
    ) -> Result<usize, ParentDomainRepositoryError> {
        let mut table = lock(&self.store.domains);
        let mut inserted = 0;
        for domain in domains {
            if table.iter().any(|d| d.domain_name == domain.domain_name) {
                continue;
            }
            table.push(ParentDomain {
                id: Uuid::new_v4(),
                domain_name: domain.domain_name,
                zone_id: domain.zone_id,
                is_active: domain.is_active,
                created_at: Utc::now(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }
}

/// In-memory `SubdomainRepository`.
#[derive(Clone)]
pub struct InMemorySubdomainRepository {
    store: Arc<InMemoryStore>,
}

impl InMemorySubdomainRepository {
    /// Adapter over the shared store.
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    fn join(&self, subdomain: Subdomain) -> Result<SubdomainWithDomain, SubdomainRepositoryError> {
        let domain = self
            .store
            .domain_by_id(subdomain.domain_id)
            .ok_or_else(|| SubdomainRepositoryError::query("dangling domain reference"))?;
        Ok(SubdomainWithDomain { subdomain, domain })
    }
}

#[async_trait]
impl SubdomainRepository for InMemorySubdomainRepository {
    async fn insert(&self, subdomain: NewSubdomain) -> Result<Subdomain, SubdomainRepositoryError> {
        let mut table = lock(&self.store.subdomains);
        // The relational unique constraint, in miniature.
        if table
            .iter()
            .any(|s| s.label == subdomain.label && s.domain_id == subdomain.domain_id)
        {
            return Err(SubdomainRepositoryError::DuplicateLabel);
        }
        let now = Utc::now();
        let stored = Subdomain {
            id: Uuid::new_v4(),
            user_id: subdomain.user_id,
            domain_id: subdomain.domain_id,
            label: subdomain.label,
            full_domain: subdomain.full_domain,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        table.push(stored.clone());
        Ok(stored)
    }

    async fn find_owned(
        &self,
        user_id: &UserId,
        subdomain_id: Uuid,
    ) -> Result<Option<SubdomainWithDomain>, SubdomainRepositoryError> {
        let subdomain = lock(&self.store.subdomains)
            .iter()
            .find(|s| s.id == subdomain_id && s.user_id == *user_id)
            .cloned();
        subdomain.map(|s| self.join(s)).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SubdomainWithDomain>, SubdomainRepositoryError> {
        let subdomains: Vec<Subdomain> = lock(&self.store.subdomains)
            .iter()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect();
        subdomains.into_iter().map(|s| self.join(s)).collect()
    }

    async fn label_taken(
        &self,
        label: &SubdomainLabel,
        domain_id: Uuid,
    ) -> Result<bool, SubdomainRepositoryError> {
        Ok(lock(&self.store.subdomains)
            .iter()
            .any(|s| s.label == *label && s.domain_id == domain_id))
    }

    async fn delete(&self, subdomain_id: Uuid) -> Result<(), SubdomainRepositoryError> {
        lock(&self.store.subdomains).retain(|s| s.id != subdomain_id);
        // ON DELETE CASCADE.
        lock(&self.store.records).retain(|r| r.subdomain_id != subdomain_id);
        Ok(())
    }
}

/// In-memory `DnsRecordRepository`.
#[derive(Clone)]
pub struct InMemoryDnsRecordRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryDnsRecordRepository {
    /// Adapter over the shared store.
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DnsRecordRepository for InMemoryDnsRecordRepository {
    async fn insert(&self, record: NewDnsRecord) -> Result<DnsRecord, DnsRecordRepositoryError> {
        let now = Utc::now();
        let stored = DnsRecord {
            id: Uuid::new_v4(),
            subdomain_id: record.subdomain_id,
            record_type: record.spec.record_type,
            value: record.spec.value,
            priority: record.spec.priority,
            ttl: record.spec.ttl,
            created_at: now,
            updated_at: now,
        };
        lock(&self.store.records).push(stored.clone());
        Ok(stored)
    }

    async fn list_for_subdomain(
        &self,
        subdomain_id: Uuid,
    ) -> Result<Vec<DnsRecord>, DnsRecordRepositoryError> {
        Ok(lock(&self.store.records)
            .iter()
            .filter(|r| r.subdomain_id == subdomain_id)
            .cloned()
            .collect())
    }

    async fn find_with_ownership(
        &self,
        record_id: Uuid,
    ) -> Result<Option<OwnedRecord>, DnsRecordRepositoryError> {
        let record = match lock(&self.store.records)
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
        {
            Some(record) => record,
            None => return Ok(None),
        };
        let subdomain = lock(&self.store.subdomains)
            .iter()
            .find(|s| s.id == record.subdomain_id)
            .cloned()
            .ok_or_else(|| DnsRecordRepositoryError::query("dangling subdomain reference"))?;
        let domain = self
            .store
            .domain_by_id(subdomain.domain_id)
            .ok_or_else(|| DnsRecordRepositoryError::query("dangling domain reference"))?;
        Ok(Some(OwnedRecord {
            record,
            subdomain,
            domain,
        }))
    }

    async fn delete(&self, record_id: Uuid) -> Result<(), DnsRecordRepositoryError> {
        lock(&self.store.records).retain(|r| r.id != record_id);
        Ok(())
    }
}

/// One observed provider interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// `create_record` with `(zone_id, name, record_type)`.
    Create(String, String, String),
    /// `update_record` with `(zone_id, record_id)`.
    Update(String, String),
    /// `delete_record` with `(zone_id, record_id)`.
    Delete(String, String),
    /// `change_status` with the polled change id.
    Status(String),
}

/// Recording provider whose next calls can be scripted to fail.
#[derive(Debug, Default)]
pub struct ScriptedDnsProvider {
    calls: Mutex<Vec<ProviderCall>>,
    failure: Mutex<Option<DnsProviderError>>,
}

impl ScriptedDnsProvider {
    /// Provider that succeeds until told otherwise.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail every subsequent call with `error` until [`Self::succeed`].
    pub fn fail_with(&self, error: DnsProviderError) {
        *lock(&self.failure) = Some(error);
    }

    /// Clear a scripted failure.
    pub fn succeed(&self) {
        *lock(&self.failure) = None;
    }

    /// Snapshot of the observed calls.
    pub fn calls(&self) -> Vec<ProviderCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: ProviderCall) -> Result<ProviderChange, DnsProviderError> {
        lock(&self.calls).push(call);
        if let Some(error) = lock(&self.failure).clone() {
            return Err(error);
        }
        Ok(ProviderChange {
            change_id: ChangeId::new(format!("scripted-change-{}", Uuid::new_v4())),
            status: ChangeStatus::Pending,
        })
    }
}

#[async_trait]
impl DnsProvider for ScriptedDnsProvider {
    async fn create_record(
        &self,
        request: &ProviderRecordRequest,
    ) -> Result<ProviderChange, DnsProviderError> {
        self.record(ProviderCall::Create(
            request.zone_id.to_string(),
            request.name.clone(),
            request.record.record_type.to_string(),
        ))
    }

    async fn update_record(
        &self,
        update: &ProviderRecordUpdate,
    ) -> Result<ProviderChange, DnsProviderError> {
        self.record(ProviderCall::Update(
            update.request.zone_id.to_string(),
            update.record_id.clone(),
        ))
    }

    async fn delete_record(
        &self,
        deletion: &ProviderRecordDeletion,
    ) -> Result<ProviderChange, DnsProviderError> {
        self.record(ProviderCall::Delete(
            deletion.zone_id.to_string(),
            deletion.record_id.clone(),
        ))
    }

    async fn change_status(
        &self,
        change_id: &ChangeId,
    ) -> Result<ProviderChange, DnsProviderError> {
        self.record(ProviderCall::Status(change_id.to_string()))
    }
}
