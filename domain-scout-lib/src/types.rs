//! Core data types for domain availability checking.
//!
//! This module defines the data flowing through a batch: the normalized
//! input entries, per-domain results with price and purchase links, the
//! tagged lookup outcome produced by each strategy, and checker settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A domain collected from user input.
///
/// Created once during input collection and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEntry {
    /// The text exactly as the user supplied it (one line or comma item)
    pub raw_input: String,

    /// Lowercased, trimmed domain name used for lookups
    pub normalized_name: String,
}

/// Availability classification of a single domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Availability {
    /// No registration record exists
    Available,

    /// A registration record was found
    Registered,

    /// Every lookup method failed (network, timeout, unparseable response)
    Unknown,
}

impl Availability {
    /// Canonical upper-case label used in CSV and tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "AVAILABLE",
            Availability::Registered => "REGISTERED",
            Availability::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Availability::Available),
            "REGISTERED" => Ok(Availability::Registered),
            "UNKNOWN" => Ok(Availability::Unknown),
            other => Err(format!("unknown availability status '{}'", other)),
        }
    }
}

/// Result of checking one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The normalized domain name that was checked
    pub domain: String,

    /// Availability classification
    pub status: Availability,

    /// Estimated registration price in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<Decimal>,

    /// Registrar name -> purchase/search URL
    pub purchase_links: BTreeMap<String, String>,

    /// Registration details for registered domains (only with detailed info enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<DomainInfo>,

    /// Which method produced the classification
    pub method_used: CheckMethod,

    /// How long the lookup chain took
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,

    /// Last lookup error when the status is unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Category of the last lookup error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<LookupErrorKind>,
}

/// Detailed information about a registered domain.
///
/// Filled from RDAP JSON or, more sparsely, from WHOIS text.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DomainInfo {
    /// The registrar that manages this domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    /// When the domain was first registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// When the domain registration expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Domain status codes (e.g., "clientTransferProhibited")
    pub status: Vec<String>,

    /// Last update date of the domain record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,

    /// Nameservers associated with the domain
    pub nameservers: Vec<String>,
}

/// Method used to classify a domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckMethod {
    #[serde(rename = "rdap")]
    Rdap,

    #[serde(rename = "whois")]
    Whois,

    /// No strategy produced an answer
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckMethod::Rdap => write!(f, "RDAP"),
            CheckMethod::Whois => write!(f, "WHOIS"),
            CheckMethod::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Category of a failed lookup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorKind {
    /// Connection failure, DNS failure, unexpected server status
    Network,
    /// The attempt ran past the per-lookup timeout
    Timeout,
    /// The server asked us to slow down
    RateLimited,
    /// The response could not be interpreted
    Parse,
    /// The method cannot handle this domain (e.g. no RDAP server for the TLD)
    Unsupported,
}

impl LookupErrorKind {
    /// Transient failures worth another attempt under a retry policy.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LookupErrorKind::Network | LookupErrorKind::Timeout | LookupErrorKind::RateLimited
        )
    }
}

/// A failed lookup attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub message: String,
}

impl LookupError {
    pub fn new<M: Into<String>>(kind: LookupErrorKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Outcome of one lookup strategy for one domain.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A registration record exists
    Found(DomainInfo),
    /// The registry reports no such domain
    NotFound,
    /// The lookup could not decide
    Error(LookupError),
}

/// Retry policy applied to every lookup attempt.
///
/// Only transient errors (network, timeout, rate limiting) are retried.
/// The wait before attempt `n + 1` is `backoff * n`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per strategy, at least 1
    pub max_attempts: u32,
    /// Base delay between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Up to `retries` extra attempts after the first one.
    pub fn with_retries(retries: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            backoff,
        }
    }

    /// Delay to wait after a failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Configuration options for domain checking operations.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Maximum number of concurrent domain checks
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Timeout for each individual lookup attempt
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Retry policy for transient lookup failures
    /// Default: single attempt
    pub retry: RetryPolicy,

    /// Whether RDAP is used as the primary lookup
    /// Default: true
    pub enable_rdap: bool,

    /// Whether to fall back to WHOIS when RDAP cannot decide
    /// Default: true
    pub enable_whois_fallback: bool,

    /// Whether to keep registration details on results
    /// Default: false
    pub detailed_info: bool,

    /// Extra TLD -> RDAP base URL entries layered over the built-in table
    pub rdap_endpoints: HashMap<String, String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::none(),
            enable_rdap: true,
            enable_whois_fallback: true,
            detailed_info: false,
            rdap_endpoints: HashMap::new(),
        }
    }
}

impl CheckConfig {
    /// Set concurrency, clamped to 1..=100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable RDAP.
    pub fn with_rdap(mut self, enabled: bool) -> Self {
        self.enable_rdap = enabled;
        self
    }

    /// Enable or disable WHOIS fallback.
    pub fn with_whois_fallback(mut self, enabled: bool) -> Self {
        self.enable_whois_fallback = enabled;
        self
    }

    /// Keep registration details on results.
    pub fn with_detailed_info(mut self, enabled: bool) -> Self {
        self.detailed_info = enabled;
        self
    }

    /// Add RDAP endpoints for TLDs missing from (or overriding) the built-in table.
    pub fn with_rdap_endpoints(mut self, endpoints: HashMap<String, String>) -> Self {
        self.rdap_endpoints.extend(endpoints);
        self
    }
}
