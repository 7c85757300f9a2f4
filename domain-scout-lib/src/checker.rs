//! Main domain checker implementation.
//!
//! `DomainChecker` runs an ordered chain of lookup strategies for each
//! domain, then annotates the classification with an estimated price and
//! registrar purchase links. Checking a domain never fails: anything the
//! chain cannot decide becomes `Availability::Unknown`.

use crate::input::normalize_domain;
use crate::links::LinkBuilder;
use crate::pricing::PriceTable;
use crate::protocols::{LookupStrategy, RdapClient, WhoisClient};
use crate::types::{
    Availability, CheckConfig, CheckMethod, CheckResult, DomainEntry, DomainInfo, LookupError,
    LookupErrorKind, LookupOutcome,
};
use crate::Result;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Shared cancellation signal for a running batch.
///
/// Once cancelled no new lookups are started; lookups already in flight
/// finish or time out.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Coordinates availability checks, pricing and link building.
///
/// # Example
///
/// ```rust,no_run
/// use domain_scout_lib::{CheckConfig, DomainChecker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = DomainChecker::with_config(CheckConfig::default().with_concurrency(20))?;
///     let result = checker.check_domain("example.com").await;
///     println!("{}: {}", result.domain, result.status);
///     Ok(())
/// }
/// ```
pub struct DomainChecker {
    config: CheckConfig,
    strategies: Vec<Arc<dyn LookupStrategy>>,
    prices: PriceTable,
    links: LinkBuilder,
}

impl DomainChecker {
    /// Checker with default configuration: RDAP first, WHOIS fallback.
    pub fn new() -> Result<Self> {
        Self::with_config(CheckConfig::default())
    }

    /// Checker whose strategy chain follows the configuration.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client for RDAP cannot be created.
    pub fn with_config(config: CheckConfig) -> Result<Self> {
        let mut strategies: Vec<Arc<dyn LookupStrategy>> = Vec::new();
        if config.enable_rdap && cfg!(feature = "rdap") {
            strategies.push(Arc::new(RdapClient::with_config(
                config.timeout,
                &config.rdap_endpoints,
            )?));
        }
        if config.enable_whois_fallback && cfg!(feature = "whois") {
            strategies.push(Arc::new(WhoisClient::new()));
        }
        Ok(Self::with_strategies(config, strategies))
    }

    /// Checker with an explicit strategy chain, tried in order.
    pub fn with_strategies(config: CheckConfig, strategies: Vec<Arc<dyn LookupStrategy>>) -> Self {
        Self {
            config,
            strategies,
            prices: PriceTable::builtin(),
            links: LinkBuilder::default(),
        }
    }

    /// Replace the price table.
    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    /// Replace the registrar link builder.
    pub fn with_links(mut self, links: LinkBuilder) -> Self {
        self.links = links;
        self
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Names of the strategies in the chain, in order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Check a single domain.
    ///
    /// The input is normalized first; a name that does not normalize is
    /// reported as unknown without any lookup.
    pub async fn check_domain(&self, domain: &str) -> CheckResult {
        let start = Instant::now();

        let Some(name) = normalize_domain(domain) else {
            return self.build_result(
                domain.trim().to_lowercase(),
                Availability::Unknown,
                None,
                CheckMethod::Unknown,
                Some(LookupError::new(
                    LookupErrorKind::Parse,
                    format!("'{}' is not a valid domain name", domain.trim()),
                )),
                start,
            );
        };

        let mut last_error: Option<LookupError> = None;

        for strategy in &self.strategies {
            match self.lookup_with_retry(strategy.as_ref(), &name).await {
                LookupOutcome::Found(info) => {
                    return self.build_result(
                        name,
                        Availability::Registered,
                        Some(info),
                        strategy.method(),
                        None,
                        start,
                    );
                }
                LookupOutcome::NotFound => {
                    return self.build_result(
                        name,
                        Availability::Available,
                        None,
                        strategy.method(),
                        None,
                        start,
                    );
                }
                LookupOutcome::Error(e) => {
                    debug!("{} could not decide {}: {}", strategy.name(), name, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(error) => self.build_result(
                name,
                Availability::Unknown,
                None,
                CheckMethod::Unknown,
                Some(error),
                start,
            ),
            None => {
                let mut result = self.build_result(
                    name,
                    Availability::Unknown,
                    None,
                    CheckMethod::Unknown,
                    None,
                    start,
                );
                result.error_message = Some("no lookup method enabled".to_string());
                result
            }
        }
    }

    /// Run one strategy under the per-lookup timeout and retry policy.
    async fn lookup_with_retry(&self, strategy: &dyn LookupStrategy, domain: &str) -> LookupOutcome {
        let policy = &self.config.retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match tokio::time::timeout(self.config.timeout, strategy.lookup(domain)).await
            {
                Ok(outcome) => outcome,
                Err(_) => LookupOutcome::Error(LookupError::new(
                    LookupErrorKind::Timeout,
                    format!(
                        "{} lookup timed out after {:?}",
                        strategy.name(),
                        self.config.timeout
                    ),
                )),
            };

            match outcome {
                LookupOutcome::Error(e) if e.kind.is_transient() && attempt < max_attempts => {
                    let delay = policy.delay_after(attempt);
                    debug!(
                        "{} attempt {}/{} for {} failed ({}), retrying in {:?}",
                        strategy.name(),
                        attempt,
                        max_attempts,
                        domain,
                        e,
                        delay
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn build_result(
        &self,
        domain: String,
        status: Availability,
        info: Option<DomainInfo>,
        method_used: CheckMethod,
        error: Option<LookupError>,
        start: Instant,
    ) -> CheckResult {
        let (error_kind, error_message) = match error {
            Some(e) => (Some(e.kind), Some(e.message)),
            None => (None, None),
        };
        CheckResult {
            estimated_price: Some(self.prices.estimate(&domain)),
            purchase_links: self.links.build(&domain),
            info: info.filter(|_| self.config.detailed_info),
            domain,
            status,
            method_used,
            check_duration: Some(start.elapsed()),
            error_message,
            error_kind,
        }
    }

    /// Check many domains with bounded concurrency.
    ///
    /// Results come back in input order, one per entry.
    pub async fn check_domains(&self, entries: &[DomainEntry]) -> Vec<CheckResult> {
        self.check_domains_with_cancel(entries, &CancelFlag::new())
            .await
    }

    /// Like `check_domains`, but stops issuing lookups once `cancel` is set.
    ///
    /// The returned results are the in-order prefix of entries that were
    /// started before cancellation.
    pub async fn check_domains_with_cancel(
        &self,
        entries: &[DomainEntry],
        cancel: &CancelFlag,
    ) -> Vec<CheckResult> {
        info!(
            "Checking {} domains (concurrency {})",
            entries.len(),
            self.config.concurrency
        );

        stream::iter(entries)
            .take_while(|_| futures::future::ready(!cancel.is_cancelled()))
            .map(|entry| self.check_domain(&entry.normalized_name))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await
    }

    /// Check many domains, yielding `(input index, result)` as each completes.
    ///
    /// Completion order is not input order; callers that need input order
    /// sort by the index.
    pub fn check_domains_stream<'a>(
        &'a self,
        entries: &'a [DomainEntry],
        cancel: CancelFlag,
    ) -> Pin<Box<dyn Stream<Item = (usize, CheckResult)> + Send + 'a>> {
        let stream = stream::iter(entries.iter().enumerate())
            .take_while(move |_| futures::future::ready(!cancel.is_cancelled()))
            .map(move |(index, entry)| async move {
                (index, self.check_domain(&entry.normalized_name).await)
            })
            .buffer_unordered(self.config.concurrency.max(1));

        Box::pin(stream)
    }
}
