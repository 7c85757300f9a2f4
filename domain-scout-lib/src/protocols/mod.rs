//! Lookup strategies used to classify domains.
//!
//! Every strategy answers with a `LookupOutcome`; the checker runs them in
//! order and stops at the first one that does not error.

use crate::error::DomainScoutError;
use crate::types::{CheckMethod, LookupError, LookupErrorKind, LookupOutcome};
use async_trait::async_trait;

/// RDAP (Registration Data Access Protocol) lookups over HTTPS
pub mod rdap;

/// Built-in TLD -> RDAP endpoint table
pub mod registry;

/// WHOIS lookups through the system `whois` command
pub mod whois;

pub use rdap::{extract_domain_info, RdapClient};
pub use registry::get_rdap_registry_map;
pub use whois::{parse_whois_response, WhoisClient};

/// A single way of deciding whether a domain is registered.
///
/// Implementations must not panic on bad responses; anything they cannot
/// interpret is reported as `LookupOutcome::Error`.
#[async_trait]
pub trait LookupStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Method reported on results decided by this strategy.
    fn method(&self) -> CheckMethod;

    /// Look up one normalized domain.
    async fn lookup(&self, domain: &str) -> LookupOutcome;
}

impl From<DomainScoutError> for LookupError {
    fn from(err: DomainScoutError) -> Self {
        let kind = match &err {
            DomainScoutError::Timeout { .. } => LookupErrorKind::Timeout,
            DomainScoutError::RateLimited { .. } => LookupErrorKind::RateLimited,
            DomainScoutError::ParseError { .. } | DomainScoutError::WhoisError { .. } => {
                LookupErrorKind::Parse
            }
            DomainScoutError::InvalidDomain { .. } => LookupErrorKind::Unsupported,
            _ => LookupErrorKind::Network,
        };
        LookupError::new(kind, err.to_string())
    }
}
