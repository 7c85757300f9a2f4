//! Configuration file parsing and management.
//!
//! Settings come from TOML files and `DS_*` environment variables. Files are
//! discovered in standard locations and merged, later files winning field by
//! field. The CLI layers its own flags on top (CLI > env > file > defaults).

use crate::error::DomainScoutError;
use crate::links::{LinkBuilder, LinkTemplate};
use crate::pricing::PriceTable;
use crate::types::{CheckConfig, RetryPolicy};
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "domain-scout.toml";

/// File name looked up in the home directory.
pub const GLOBAL_CONFIG_FILE: &str = ".domain-scout.toml";

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// concurrency = 20
/// timeout = "8s"
/// retries = 2
/// retry_backoff = "500ms"
///
/// [pricing]
/// com = "10.99"
///
/// [rdap_endpoints]
/// co = "https://rdap.nic.co/domain/"
///
/// [[registrars]]
/// name = "Gandi"
/// base_url = "https://shop.gandi.net/en/domain/suggest"
/// query_param = "search"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default values for checker and CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// TLD -> price overrides, as decimal strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<HashMap<String, String>>,

    /// TLD -> RDAP base URL additions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap_endpoints: Option<HashMap<String, String>>,

    /// Extra registrar link templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrars: Option<Vec<LinkTemplate>>,
}

/// Default values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Per-lookup timeout, e.g. "5s" or "2m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Extra attempts after a transient failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    /// Base delay between attempts, e.g. "500ms"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_backoff: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_fallback: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_info: Option<bool>,

    /// Grouped terminal output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

impl FileConfig {
    /// Apply file defaults on top of a checker configuration.
    ///
    /// Values were validated on load, so unparseable ones are simply skipped.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(defaults) = &self.defaults {
            if let Some(concurrency) = defaults.concurrency {
                config = config.with_concurrency(concurrency);
            }
            if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
                config = config.with_timeout(timeout);
            }
            if defaults.retries.is_some() || defaults.retry_backoff.is_some() {
                let retries = defaults
                    .retries
                    .unwrap_or_else(|| config.retry.max_attempts.saturating_sub(1));
                let backoff = defaults
                    .retry_backoff
                    .as_deref()
                    .and_then(parse_timeout_string)
                    .unwrap_or(config.retry.backoff);
                config = config.with_retry(RetryPolicy::with_retries(retries, backoff));
            }
            if let Some(rdap) = defaults.rdap {
                config = config.with_rdap(rdap);
            }
            if let Some(whois) = defaults.whois_fallback {
                config = config.with_whois_fallback(whois);
            }
            if let Some(detailed) = defaults.detailed_info {
                config = config.with_detailed_info(detailed);
            }
        }
        if let Some(endpoints) = &self.rdap_endpoints {
            config = config.with_rdap_endpoints(endpoints.clone());
        }
        config
    }

    /// Built-in price table with the `[pricing]` overrides applied.
    pub fn price_table(&self) -> Result<PriceTable> {
        let overrides = match &self.pricing {
            Some(pricing) => parse_price_overrides(pricing)?,
            None => HashMap::new(),
        };
        Ok(PriceTable::with_overrides(&overrides))
    }

    /// Default registrars plus the configured `[[registrars]]`.
    pub fn link_builder(&self) -> LinkBuilder {
        LinkBuilder::with_extra(self.registrars.clone().unwrap_or_default())
    }

    pub fn pretty(&self) -> Option<bool> {
        self.defaults.as_ref().and_then(|d| d.pretty)
    }
}

/// Configuration discovery and loading.
///
/// Search roots are injectable so discovery can be exercised against a
/// temporary directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
    working_dir: PathBuf,
}

impl ConfigManager {
    /// Manager using `$XDG_CONFIG_HOME`, `$HOME` and the current directory.
    pub fn from_env() -> Self {
        let home = env::var_os("HOME").map(PathBuf::from);
        let xdg_config_home = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|h| h.join(".config")));
        Self {
            xdg_config_home,
            home,
            working_dir: PathBuf::from("."),
        }
    }

    /// Manager with explicit search roots.
    pub fn with_roots(
        xdg_config_home: Option<PathBuf>,
        home: Option<PathBuf>,
        working_dir: PathBuf,
    ) -> Self {
        Self {
            xdg_config_home,
            home,
            working_dir,
        }
    }

    /// Load and validate one configuration file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScoutError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainScoutError::config(format!(
                "Failed to parse {}: {}",
                path.display(),
                e
            ))
        })?;

        validate_config(&config)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Existing config files in precedence order (lowest first).
    pub fn discover(&self) -> Vec<PathBuf> {
        let candidates = [
            self.xdg_config_home
                .as_ref()
                .map(|dir| dir.join("domain-scout").join("config.toml")),
            self.home.as_ref().map(|home| home.join(GLOBAL_CONFIG_FILE)),
            Some(self.working_dir.join(LOCAL_CONFIG_FILE)),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter(|path| path.is_file())
            .collect()
    }

    /// Load every discovered file and merge them, later files winning.
    ///
    /// # Errors
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn discover_and_load(&self) -> Result<FileConfig> {
        let mut merged = FileConfig::default();
        let paths = self.discover();

        for path in &paths {
            let config = self.load_file(path)?;
            merged = merge_configs(merged, config);
        }

        match paths.len() {
            0 => debug!("No configuration files found"),
            1 => info!("Using configuration file {}", paths[0].display()),
            _ => info!(
                "Merged configuration files (last wins): {}",
                paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }

        Ok(merged)
    }
}

/// Merge two configurations; values from `higher` win.
pub fn merge_configs(lower: FileConfig, higher: FileConfig) -> FileConfig {
    FileConfig {
        defaults: match (lower.defaults, higher.defaults) {
            (Some(lower), Some(higher)) => Some(DefaultsConfig {
                concurrency: higher.concurrency.or(lower.concurrency),
                timeout: higher.timeout.or(lower.timeout),
                retries: higher.retries.or(lower.retries),
                retry_backoff: higher.retry_backoff.or(lower.retry_backoff),
                rdap: higher.rdap.or(lower.rdap),
                whois_fallback: higher.whois_fallback.or(lower.whois_fallback),
                detailed_info: higher.detailed_info.or(lower.detailed_info),
                pretty: higher.pretty.or(lower.pretty),
            }),
            (lower, higher) => higher.or(lower),
        },
        pricing: merge_maps(lower.pricing, higher.pricing),
        rdap_endpoints: merge_maps(lower.rdap_endpoints, higher.rdap_endpoints),
        registrars: match (lower.registrars, higher.registrars) {
            (Some(mut lower), Some(higher)) => {
                for template in higher {
                    match lower.iter_mut().find(|t| t.name == template.name) {
                        Some(existing) => *existing = template,
                        None => lower.push(template),
                    }
                }
                Some(lower)
            }
            (lower, higher) => higher.or(lower),
        },
    }
}

fn merge_maps(
    lower: Option<HashMap<String, String>>,
    higher: Option<HashMap<String, String>>,
) -> Option<HashMap<String, String>> {
    match (lower, higher) {
        (Some(mut lower), Some(higher)) => {
            lower.extend(higher);
            Some(lower)
        }
        (lower, higher) => higher.or(lower),
    }
}

/// Reject configurations with out-of-range or unparseable values.
pub fn validate_config(config: &FileConfig) -> Result<()> {
    if let Some(defaults) = &config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            if concurrency == 0 || concurrency > 100 {
                return Err(DomainScoutError::config(
                    "Concurrency must be between 1 and 100",
                ));
            }
        }

        if let Some(timeout) = &defaults.timeout {
            match parse_timeout_string(timeout) {
                Some(d) if !d.is_zero() => {}
                _ => {
                    return Err(DomainScoutError::config(format!(
                        "Invalid timeout '{}'. Use a format like '5s', '500ms' or '2m'",
                        timeout
                    )))
                }
            }
        }

        if let Some(retries) = defaults.retries {
            if retries > 10 {
                return Err(DomainScoutError::config("Retries must be between 0 and 10"));
            }
        }

        if let Some(backoff) = &defaults.retry_backoff {
            if parse_timeout_string(backoff).is_none() {
                return Err(DomainScoutError::config(format!(
                    "Invalid retry_backoff '{}'",
                    backoff
                )));
            }
        }
    }

    if let Some(pricing) = &config.pricing {
        parse_price_overrides(pricing)?;
    }

    if let Some(endpoints) = &config.rdap_endpoints {
        for (tld, endpoint) in endpoints {
            if tld.trim().trim_start_matches('.').is_empty() {
                return Err(DomainScoutError::config("RDAP endpoint TLD cannot be empty"));
            }
            if url::Url::parse(endpoint).is_err() {
                return Err(DomainScoutError::config(format!(
                    "Invalid RDAP endpoint for '{}': '{}'",
                    tld, endpoint
                )));
            }
        }
    }

    if let Some(registrars) = &config.registrars {
        for registrar in registrars {
            if registrar.name.trim().is_empty() || registrar.query_param.trim().is_empty() {
                return Err(DomainScoutError::config(
                    "Registrar entries need a name and a query_param",
                ));
            }
            if url::Url::parse(&registrar.base_url).is_err() {
                return Err(DomainScoutError::config(format!(
                    "Invalid base_url for registrar '{}': '{}'",
                    registrar.name, registrar.base_url
                )));
            }
        }
    }

    Ok(())
}

/// Parse `[pricing]` values into decimals.
fn parse_price_overrides(pricing: &HashMap<String, String>) -> Result<HashMap<String, Decimal>> {
    pricing
        .iter()
        .map(|(tld, price)| {
            let value = Decimal::from_str(price.trim()).map_err(|_| {
                DomainScoutError::config(format!("Invalid price '{}' for '{}'", price, tld))
            })?;
            if value.is_sign_negative() {
                return Err(DomainScoutError::config(format!(
                    "Price for '{}' cannot be negative",
                    tld
                )));
            }
            Ok((tld.clone(), value))
        })
        .collect()
}

/// Settings taken from `DS_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
    pub rdap: Option<bool>,
    pub whois_fallback: Option<bool>,
    pub detailed_info: Option<bool>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Apply environment values on top of a checker configuration.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(retries) = self.retries {
            let backoff = config.retry.backoff;
            config = config.with_retry(RetryPolicy::with_retries(retries, backoff));
        }
        if let Some(rdap) = self.rdap {
            config = config.with_rdap(rdap);
        }
        if let Some(whois) = self.whois_fallback {
            config = config.with_whois_fallback(whois);
        }
        if let Some(detailed) = self.detailed_info {
            config = config.with_detailed_info(detailed);
        }
        config
    }
}

/// Read `DS_*` variables from the process environment.
///
/// Invalid values are logged and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Build an `EnvConfig` from any key lookup.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = lookup("DS_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(n) if (1..=100).contains(&n) => env_config.concurrency = Some(n),
            _ => warn!("Ignoring DS_CONCURRENCY='{}', must be 1-100", val),
        }
    }

    if let Some(val) = lookup("DS_TIMEOUT") {
        match parse_timeout_string(&val) {
            Some(d) if !d.is_zero() => env_config.timeout = Some(d),
            _ => warn!("Ignoring DS_TIMEOUT='{}', use a format like '5s'", val),
        }
    }

    if let Some(val) = lookup("DS_RETRIES") {
        match val.trim().parse::<u32>() {
            Ok(n) if n <= 10 => env_config.retries = Some(n),
            _ => warn!("Ignoring DS_RETRIES='{}', must be 0-10", val),
        }
    }

    let flag = |key: &str| {
        let val = lookup(key)?;
        let parsed = parse_bool(&val);
        if parsed.is_none() {
            warn!("Ignoring {}='{}', use true/false", key, val);
        }
        parsed
    };
    env_config.rdap = flag("DS_RDAP");
    env_config.whois_fallback = flag("DS_WHOIS_FALLBACK");
    env_config.detailed_info = flag("DS_DETAILED_INFO");

    if let Some(path) = lookup("DS_CONFIG") {
        if !path.trim().is_empty() {
            env_config.config = Some(path);
        }
    }

    env_config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a duration like "500ms", "5s", "2m", or bare seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let s = timeout_str.trim().to_lowercase();

    if let Some(ms) = s.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
