//! Startup seeding of the parent domain catalogue.

use backend::domain::ports::{NewParentDomain, ParentDomainRepository};
use backend::domain::{DomainName, ZoneId};
use backend::outbound::persistence::{DbPool, DieselParentDomainRepository};
use tracing::info;

use super::ServerError;

/// Initial registrable zones and their provider handles.
const SEED_DOMAINS: &[(&str, &str)] = &[
    ("example1.com", "Z1234567890ABC"),
    ("example2.com", "Z0987654321XYZ"),
    ("freesubdomain.net", "Z5555555555FFF"),
];

/// Idempotently insert the seed zones; names already present are skipped.
pub async fn seed_parent_domains(pool: &DbPool) -> Result<(), ServerError> {
    let repo = DieselParentDomainRepository::new(pool.clone());

    let mut domains = Vec::with_capacity(SEED_DOMAINS.len());
    for (name, zone) in SEED_DOMAINS {
        let domain_name = DomainName::new(*name)
            .map_err(|err| ServerError::Seed(format!("invalid seed domain {name}: {err}")))?;
        let zone_id = ZoneId::new(*zone)
            .map_err(|err| ServerError::Seed(format!("invalid seed zone id {zone}: {err}")))?;
        domains.push(NewParentDomain {
            domain_name,
            zone_id,
            is_active: true,
        });
    }

    let inserted = repo
        .seed(domains)
        .await
        .map_err(|err| ServerError::Seed(err.to_string()))?;
    info!(inserted, "parent domain seeding complete");
    Ok(())
}
