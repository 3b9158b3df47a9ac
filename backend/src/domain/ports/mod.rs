//! Domain ports and supporting types for the hexagonal boundary.

mod account_command;
mod dns_provider;
mod login_service;
mod parent_domain_query;
mod parent_domain_repository;
mod password_hasher;
mod record_ports;
mod record_repository;
mod subdomain_ports;
mod subdomain_repository;
mod user_repository;

pub use account_command::{AccountCommand, FixtureAccountCommand, RegisterAccountRequest};
#[cfg(test)]
pub use dns_provider::MockDnsProvider;
pub use dns_provider::{
    ChangeId, ChangeStatus, DnsProvider, DnsProviderError, FixtureDnsProvider, ProviderChange,
    ProviderRecordDeletion, ProviderRecordRequest, ProviderRecordUpdate,
};
pub use login_service::{FixtureLoginService, LoginService};
pub use parent_domain_query::{FixtureParentDomainQuery, ParentDomainQuery};
#[cfg(test)]
pub use parent_domain_repository::MockParentDomainRepository;
pub use parent_domain_repository::{
    FixtureParentDomainRepository, NewParentDomain, ParentDomainRepository,
    ParentDomainRepositoryError,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
pub use record_ports::{
    CreateRecordRequest, FixtureRecordCommand, FixtureRecordQuery, RecordCommand, RecordQuery,
};
#[cfg(test)]
pub use record_repository::MockDnsRecordRepository;
pub use record_repository::{
    DnsRecordRepository, DnsRecordRepositoryError, FixtureDnsRecordRepository, NewDnsRecord,
    OwnedRecord,
};
pub use subdomain_ports::{
    FixtureSubdomainCommand, FixtureSubdomainQuery, RegisterSubdomainRequest, SubdomainCommand,
    SubdomainQuery,
};
#[cfg(test)]
pub use subdomain_repository::MockSubdomainRepository;
pub use subdomain_repository::{
    FixtureSubdomainRepository, NewSubdomain, SubdomainRepository, SubdomainRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, NewUser, UserRepository, UserRepositoryError};
