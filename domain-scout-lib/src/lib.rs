//! # Domain Scout Library
//!
//! Batch domain availability checking with estimated prices and registrar
//! purchase links.
//!
//! Each domain is looked up over RDAP first, falling back to WHOIS, and
//! classified as available, registered or unknown. Results carry a price
//! estimate from a per-TLD table and links to registrar search pages, and
//! can be exported as CSV or JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_scout_lib::{parse_domain_text, DomainChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = DomainChecker::new()?;
//!     let entries = parse_domain_text("google.com\nsome-unregistered-name-4821.com");
//!
//!     let results = checker.check_domains(&entries).await;
//!     for result in &results {
//!         println!("{} {}", result.domain, result.status);
//!     }
//!
//!     domain_scout_lib::export::write_csv(&results, std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub use checker::{CancelFlag, DomainChecker};
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::DomainScoutError;
pub use export::ExportFormat;
pub use input::{
    collect_domains, extract_tld, normalize_domain, parse_domain_text, read_domains_from_file,
};
pub use links::{default_templates, LinkBuilder, LinkTemplate};
pub use pricing::{PriceTable, DEFAULT_PRICE};
pub use protocols::{LookupStrategy, RdapClient, WhoisClient};
pub use types::{
    Availability, CheckConfig, CheckMethod, CheckResult, DomainEntry, DomainInfo, LookupError,
    LookupErrorKind, LookupOutcome, RetryPolicy,
};

pub mod export;
pub mod protocols;

mod checker;
mod config;
mod error;
mod input;
mod links;
mod pricing;
mod types;

pub type Result<T> = std::result::Result<T, DomainScoutError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        features: get_enabled_features(),
    }
}

/// Information about the library build and features
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub features: Vec<&'static str>,
}

#[allow(clippy::vec_init_then_push)]
fn get_enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();

    #[cfg(feature = "rdap")]
    features.push("rdap");

    #[cfg(feature = "whois")]
    features.push("whois");

    features
}
