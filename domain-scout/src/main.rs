//! Domain Scout CLI Application
//!
//! Checks a batch of domains for availability (RDAP with WHOIS fallback),
//! shows an estimated price and registrar purchase links for each, and
//! exports the results as CSV or JSON.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_scout_lib::export::{self, ExportFormat};
use domain_scout_lib::{
    collect_domains, load_env_config, parse_timeout_string, read_domains_from_file, Availability,
    CancelFlag, CheckConfig, CheckResult, ConfigManager, DomainChecker, DomainEntry, EnvConfig,
    FileConfig, LinkBuilder, LookupErrorKind, PriceTable, RetryPolicy,
};
use futures::StreamExt;
use std::process;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Backoff used when retries are requested but no backoff is configured.
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// CLI arguments for domain-scout
#[derive(Parser, Debug)]
#[command(name = "domain-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Check a batch of domains for availability, price and purchase links")]
#[command(
    long_about = "Check a batch of domains for availability using RDAP with automatic WHOIS fallback.\n\nEach domain gets an estimated registration price and links to registrar search pages. Results can be exported as CSV or JSON."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain names to check (comma-separated lists are accepted)
    #[arg(value_name = "DOMAINS", help_heading = "Input")]
    pub domains: Vec<String>,

    /// Input file with domains (one per line or comma-separated, # comments)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Input"
    )]
    pub file: Option<String>,

    /// Read domains from standard input
    #[arg(long = "stdin", help_heading = "Input")]
    pub stdin: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output results in CSV format
    #[arg(long = "csv", help_heading = "Output Format")]
    pub csv: bool,

    /// Export results to a file (.json for JSON, anything else for CSV)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output Format"
    )]
    pub output: Option<String>,

    /// Group results by status with section headers
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Show registration details for registered domains
    #[arg(short = 'i', long = "info", help_heading = "Output Format")]
    pub info: bool,

    /// Max concurrent domain checks (default: 10, max: 100)
    #[arg(short = 'c', long = "concurrency", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Timeout per lookup attempt, e.g. 5s, 1500ms, 1m
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Extra attempts after a network error, timeout or rate limit
    #[arg(long = "retries", value_name = "N", help_heading = "Performance")]
    pub retries: Option<u32>,

    /// Skip RDAP and use WHOIS only
    #[arg(long = "no-rdap", help_heading = "Protocol")]
    pub no_rdap: bool,

    /// Disable automatic WHOIS fallback
    #[arg(long = "no-whois", help_heading = "Protocol")]
    pub no_whois: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show timings, lookup methods and raw error messages
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Everything a run needs after config files, environment and flags are merged.
struct Settings {
    config: CheckConfig,
    prices: PriceTable,
    links: LinkBuilder,
    pretty: bool,
}

/// Category of an unknown result, derived from its error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCategory {
    Timeout,
    RateLimited,
    Network,
    Parsing,
    Unsupported,
    Other,
}

impl ErrorCategory {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Timeout => "(timeout)",
            ErrorCategory::RateLimited => "(rate limited)",
            ErrorCategory::Network => "(network error)",
            ErrorCategory::Parsing => "(parsing error)",
            ErrorCategory::Unsupported => "(unsupported TLD)",
            ErrorCategory::Other => "(error)",
        }
    }
}

/// Error statistics for aggregated reporting
#[derive(Debug, Default)]
pub(crate) struct ErrorStats {
    pub(crate) timeouts: Vec<String>,
    pub(crate) rate_limited: Vec<String>,
    pub(crate) network_errors: Vec<String>,
    pub(crate) parsing_errors: Vec<String>,
    pub(crate) unsupported: Vec<String>,
    pub(crate) other_errors: Vec<String>,
}

impl ErrorStats {
    /// Category for the kind of the last lookup error.
    pub(crate) fn category(kind: Option<LookupErrorKind>) -> ErrorCategory {
        match kind {
            Some(LookupErrorKind::Timeout) => ErrorCategory::Timeout,
            Some(LookupErrorKind::RateLimited) => ErrorCategory::RateLimited,
            Some(LookupErrorKind::Network) => ErrorCategory::Network,
            Some(LookupErrorKind::Parse) => ErrorCategory::Parsing,
            Some(LookupErrorKind::Unsupported) => ErrorCategory::Unsupported,
            None => ErrorCategory::Other,
        }
    }

    fn add(&mut self, result: &CheckResult) {
        if result.status != Availability::Unknown {
            return;
        }
        let domain = result.domain.clone();
        match Self::category(result.error_kind) {
            ErrorCategory::Timeout => self.timeouts.push(domain),
            ErrorCategory::RateLimited => self.rate_limited.push(domain),
            ErrorCategory::Network => self.network_errors.push(domain),
            ErrorCategory::Parsing => self.parsing_errors.push(domain),
            ErrorCategory::Unsupported => self.unsupported.push(domain),
            ErrorCategory::Other => self.other_errors.push(domain),
        }
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.timeouts.is_empty()
            || !self.rate_limited.is_empty()
            || !self.network_errors.is_empty()
            || !self.parsing_errors.is_empty()
            || !self.unsupported.is_empty()
            || !self.other_errors.is_empty()
    }

    /// One line per non-empty category, at most five domains each.
    pub(crate) fn summary_lines(&self) -> Vec<String> {
        let format_list = |domains: &[String], max_show: usize| -> String {
            if domains.len() <= max_show {
                domains.join(", ")
            } else {
                let shown = &domains[..max_show];
                let remaining = domains.len() - max_show;
                format!("{}, ... and {} more", shown.join(", "), remaining)
            }
        };

        [
            (&self.timeouts, "timeout", "timeouts"),
            (&self.rate_limited, "rate limited", "rate limited"),
            (&self.network_errors, "network error", "network errors"),
            (&self.parsing_errors, "parsing error", "parsing errors"),
            (&self.unsupported, "unsupported TLD", "unsupported TLDs"),
            (&self.other_errors, "other error", "other errors"),
        ]
        .into_iter()
        .filter(|(domains, _, _)| !domains.is_empty())
        .map(|(domains, one, many)| {
            format!(
                "{} {}: {}",
                domains.len(),
                if domains.len() == 1 { one } else { many },
                format_list(domains, 5)
            )
        })
        .collect()
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(&args);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.domains.is_empty() && args.file.is_none() && !args.stdin {
        return Err(
            "You must specify domain names, a file with --file, or --stdin".to_string(),
        );
    }

    if args.json && args.csv {
        return Err("Cannot specify multiple output formats (--json, --csv)".to_string());
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(timeout) = &args.timeout {
        match parse_timeout_string(timeout) {
            Some(d) if !d.is_zero() => {}
            _ => {
                return Err(format!(
                    "Invalid timeout '{}'. Use a format like '5s', '1500ms' or '1m'",
                    timeout
                ));
            }
        }
    }

    if let Some(retries) = args.retries {
        if retries > 10 {
            return Err("Retries must be between 0 and 10".to_string());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(args: &Args) {
    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main domain checking logic
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let file_config = load_file_config(&args, &env_config)?;
    let settings = build_settings(&args, &file_config, &env_config)?;

    let entries = collect_input(&args).await?;
    if entries.is_empty() {
        return Err("No valid domain names found in input".into());
    }

    let checker = DomainChecker::with_config(settings.config.clone())?
        .with_prices(settings.prices)
        .with_links(settings.links);
    debug!(
        "Lookup chain: [{}], concurrency {}",
        checker.strategy_names().join(", "),
        checker.config().concurrency
    );

    let cancel = CancelFlag::new();
    watch_ctrl_c(cancel.clone());

    let start_time = Instant::now();
    let results = if args.json || args.csv {
        run_batch_check(&checker, &entries, &cancel).await
    } else {
        run_streaming_check(&checker, &entries, &args, settings.pretty, &cancel).await
    };
    let duration = start_time.elapsed();

    if cancel.is_cancelled() {
        eprintln!(
            "Interrupted: checked {} of {} domains",
            results.len(),
            entries.len()
        );
    }

    if args.json {
        println!("{}", export::to_json(&results)?);
    } else if args.csv {
        export::write_csv(&results, std::io::stdout().lock())?;
    } else {
        display_text_summary(&results, &args, settings.pretty, duration);
    }

    if let Some(path) = &args.output {
        let format = ExportFormat::from_path(path);
        export::export_to_file(&results, path, format)?;
        if !args.json && !args.csv {
            println!("Exported {} results to {}", results.len(), path);
        }
    }

    Ok(())
}

/// Cancel the batch on the first Ctrl-C. A second one kills the process as usual.
fn watch_ctrl_c(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight lookups");
            cancel.cancel();
        }
    });
}

/// Load the config file layer.
///
/// `--config` wins over `DS_CONFIG`; without either, standard locations are
/// discovered and merged.
fn load_file_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let manager = ConfigManager::from_env();

    let explicit = args
        .config
        .as_deref()
        .map(|p| (p, "--config"))
        .or_else(|| env_config.config.as_deref().map(|p| (p, "DS_CONFIG")));

    match explicit {
        Some((path, source)) => {
            info!("Using config file from {}: {}", source, path);
            let config = manager
                .load_file(path)
                .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?;
            Ok(config)
        }
        None => Ok(manager.discover_and_load()?),
    }
}

/// Merge configuration layers.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (DS_*)
/// 3. Config files (local > global > XDG)
/// 4. Built-in defaults
fn build_settings(
    args: &Args,
    file_config: &FileConfig,
    env_config: &EnvConfig,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut config = file_config.apply_to(CheckConfig::default());
    config = env_config.apply_to(config);
    config = apply_cli_args_to_config(config, args);

    Ok(Settings {
        config,
        prices: file_config.price_table()?,
        links: file_config.link_builder(),
        pretty: args.pretty || file_config.pretty().unwrap_or(false),
    })
}

/// Apply CLI arguments (highest precedence). Values were checked by `validate_args`.
fn apply_cli_args_to_config(mut config: CheckConfig, args: &Args) -> CheckConfig {
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout) = args.timeout.as_deref().and_then(parse_timeout_string) {
        config = config.with_timeout(timeout);
    }
    if let Some(retries) = args.retries {
        let backoff = if config.retry.backoff.is_zero() {
            DEFAULT_RETRY_BACKOFF
        } else {
            config.retry.backoff
        };
        config = config.with_retry(RetryPolicy::with_retries(retries, backoff));
    }
    if args.no_rdap {
        config = config.with_rdap(false);
    }
    if args.no_whois {
        config = config.with_whois_fallback(false);
    }
    if args.info {
        config = config.with_detailed_info(true);
    }
    config
}

/// Gather domains from arguments, `--file` and `--stdin`, deduplicated in that order.
async fn collect_input(args: &Args) -> Result<Vec<DomainEntry>, Box<dyn std::error::Error>> {
    let mut sources: Vec<String> = args.domains.clone();

    if let Some(path) = &args.file {
        let from_file = read_domains_from_file(path).await?;
        info!("Read {} domains from {}", from_file.len(), path);
        sources.extend(from_file.into_iter().map(|e| e.raw_input));
    }

    if args.stdin {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        sources.push(text);
    }

    Ok(collect_domains(sources))
}

/// Check in input order without live output (structured formats).
async fn run_batch_check(
    checker: &DomainChecker,
    entries: &[DomainEntry],
    cancel: &CancelFlag,
) -> Vec<CheckResult> {
    let spinner = if entries.len() > 1 {
        ui::Spinner::start(format!("Checking {} domains...", entries.len()))
    } else {
        None
    };

    let results = checker.check_domains_with_cancel(entries, cancel).await;

    if let Some(s) = spinner {
        s.stop().await;
    }
    results
}

/// Check with live output, then return results in input order.
async fn run_streaming_check(
    checker: &DomainChecker,
    entries: &[DomainEntry],
    args: &Args,
    pretty: bool,
    cancel: &CancelFlag,
) -> Vec<CheckResult> {
    let total = entries.len();

    // Pretty mode prints grouped results at the end, behind a spinner
    let spinner = if pretty {
        ui::print_header(
            total,
            checker.config().concurrency,
            &checker.strategy_names(),
        );
        ui::Spinner::start(format!("Checking {} domains...", total))
    } else {
        ui::print_table_header();
        None
    };

    let mut indexed = Vec::with_capacity(total);
    let mut stream = checker.check_domains_stream(entries, cancel.clone());
    while let Some((index, result)) = stream.next().await {
        if !pretty {
            let counter = (total > 1).then_some((indexed.len() + 1, total));
            ui::print_row(&result, args.info, args.debug, counter);
        }
        indexed.push((index, result));
    }

    if let Some(s) = spinner {
        s.stop().await;
    }

    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, result)| result).collect()
}

/// Grouped output (pretty mode), summary and error breakdown.
fn display_text_summary(results: &[CheckResult], args: &Args, pretty: bool, duration: Duration) {
    if pretty {
        ui::print_grouped_results(results, args.info, args.debug);
    }

    let count = |status: Availability| results.iter().filter(|r| r.status == status).count();

    if results.len() > 1 || pretty {
        println!();
        ui::print_summary(
            results.len(),
            count(Availability::Available),
            count(Availability::Registered),
            count(Availability::Unknown),
            duration,
        );
    }

    let mut error_stats = ErrorStats::default();
    for result in results {
        error_stats.add(result);
    }
    if error_stats.has_errors() {
        println!();
        ui::print_error_summary(&error_stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_scout_lib::{CheckMethod, DefaultsConfig};
    use std::collections::{BTreeMap, HashMap};
    use std::io::Write;

    fn create_test_args() -> Args {
        Args {
            domains: vec!["example.com".to_string()],
            file: None,
            stdin: false,
            json: false,
            csv: false,
            output: None,
            pretty: false,
            info: false,
            concurrency: None,
            timeout: None,
            retries: None,
            no_rdap: false,
            no_whois: false,
            config: None,
            debug: false,
            verbose: false,
        }
    }

    fn unknown(domain: &str, kind: Option<LookupErrorKind>, message: &str) -> CheckResult {
        CheckResult {
            domain: domain.to_string(),
            status: Availability::Unknown,
            estimated_price: None,
            purchase_links: BTreeMap::new(),
            info: None,
            method_used: CheckMethod::Unknown,
            check_duration: None,
            error_message: Some(message.to_string()),
            error_kind: kind,
        }
    }

    #[test]
    fn test_args_parse_from_command_line() {
        let args = Args::parse_from([
            "domain-scout",
            "a.com",
            "b.io",
            "--csv",
            "-o",
            "out.csv",
            "-c",
            "25",
            "--timeout",
            "3s",
            "--retries",
            "2",
            "--no-whois",
        ]);
        assert_eq!(args.domains, vec!["a.com", "b.io"]);
        assert!(args.csv);
        assert_eq!(args.output.as_deref(), Some("out.csv"));
        assert_eq!(args.concurrency, Some(25));
        assert_eq!(args.timeout.as_deref(), Some("3s"));
        assert_eq!(args.retries, Some(2));
        assert!(args.no_whois);
        assert!(!args.no_rdap);
    }

    #[test]
    fn test_validate_args_requires_input() {
        let mut args = create_test_args();
        args.domains.clear();
        assert!(validate_args(&args).is_err());

        args.stdin = true;
        assert!(validate_args(&args).is_ok());

        args.stdin = false;
        args.file = Some("domains.txt".to_string());
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_conflicting_formats() {
        let mut args = create_test_args();
        args.json = true;
        args.csv = true;
        let err = validate_args(&args).unwrap_err();
        assert!(err.contains("multiple output formats"));
    }

    #[test]
    fn test_validate_args_ranges() {
        let mut args = create_test_args();
        args.concurrency = Some(0);
        assert!(validate_args(&args).is_err());
        args.concurrency = Some(101);
        assert!(validate_args(&args).is_err());
        args.concurrency = Some(100);
        assert!(validate_args(&args).is_ok());

        args.timeout = Some("soon".to_string());
        assert!(validate_args(&args).is_err());
        args.timeout = Some("0s".to_string());
        assert!(validate_args(&args).is_err());
        args.timeout = Some("1500ms".to_string());
        assert!(validate_args(&args).is_ok());

        args.retries = Some(11);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_cli_overrides_env_and_file() {
        let file = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(30),
                timeout: Some("8s".to_string()),
                retries: Some(1),
                retry_backoff: Some("200ms".to_string()),
                pretty: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let env = EnvConfig {
            concurrency: Some(40),
            ..Default::default()
        };

        let mut args = create_test_args();
        let settings = build_settings(&args, &file, &env).unwrap();
        assert_eq!(settings.config.concurrency, 40);
        assert_eq!(settings.config.timeout, Duration::from_secs(8));
        assert_eq!(settings.config.retry.max_attempts, 2);
        assert!(settings.pretty);

        args.concurrency = Some(5);
        args.timeout = Some("2s".to_string());
        args.retries = Some(3);
        args.no_rdap = true;
        args.info = true;
        let settings = build_settings(&args, &file, &env).unwrap();
        assert_eq!(settings.config.concurrency, 5);
        assert_eq!(settings.config.timeout, Duration::from_secs(2));
        assert_eq!(
            settings.config.retry,
            RetryPolicy::with_retries(3, Duration::from_millis(200))
        );
        assert!(!settings.config.enable_rdap);
        assert!(settings.config.enable_whois_fallback);
        assert!(settings.config.detailed_info);
    }

    #[test]
    fn test_cli_retries_get_default_backoff() {
        let mut args = create_test_args();
        args.retries = Some(2);
        let config = apply_cli_args_to_config(CheckConfig::default(), &args);
        assert_eq!(
            config.retry,
            RetryPolicy::with_retries(2, DEFAULT_RETRY_BACKOFF)
        );
    }

    #[test]
    fn test_file_pricing_reaches_price_table() {
        let file = FileConfig {
            pricing: Some(HashMap::from([("com".to_string(), "7.50".to_string())])),
            ..Default::default()
        };
        let settings =
            build_settings(&create_test_args(), &file, &EnvConfig::default()).unwrap();
        assert_eq!(settings.prices.estimate("shop.com").to_string(), "7.50");
    }

    #[tokio::test]
    async fn test_collect_input_merges_sources_in_order() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "# shortlist").unwrap();
        writeln!(tmp, "from-file.dev").unwrap();
        writeln!(tmp, "Example.COM").unwrap();
        writeln!(tmp, "not a domain").unwrap();

        let mut args = create_test_args();
        args.domains = vec!["example.com,second.io".to_string()];
        args.file = Some(tmp.path().to_string_lossy().to_string());

        let entries = collect_input(&args).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.normalized_name.as_str()).collect();
        assert_eq!(names, vec!["example.com", "second.io", "from-file.dev"]);
    }

    #[tokio::test]
    async fn test_collect_input_keeps_raw_file_text() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "  https://www.Launch-Pad.dev/pricing  ").unwrap();
        writeln!(tmp, "Second.IO").unwrap();

        let mut args = create_test_args();
        args.domains.clear();
        args.file = Some(tmp.path().to_string_lossy().to_string());

        let entries = collect_input(&args).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].normalized_name, "launch-pad.dev");
        assert_eq!(entries[0].raw_input, "https://www.Launch-Pad.dev/pricing");
        assert_eq!(entries[1].normalized_name, "second.io");
        assert_eq!(entries[1].raw_input, "Second.IO");
    }

    #[tokio::test]
    async fn test_collect_input_missing_file_is_error() {
        let mut args = create_test_args();
        args.file = Some("/definitely/not/here/domains.txt".to_string());
        assert!(collect_input(&args).await.is_err());
    }

    #[test]
    fn test_error_category_from_kind() {
        assert_eq!(
            ErrorStats::category(Some(LookupErrorKind::Timeout)),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorStats::category(Some(LookupErrorKind::RateLimited)),
            ErrorCategory::RateLimited
        );
        assert_eq!(
            ErrorStats::category(Some(LookupErrorKind::Unsupported)),
            ErrorCategory::Unsupported
        );
        assert_eq!(
            ErrorStats::category(Some(LookupErrorKind::Parse)),
            ErrorCategory::Parsing
        );
        assert_eq!(
            ErrorStats::category(Some(LookupErrorKind::Network)),
            ErrorCategory::Network
        );
        assert_eq!(ErrorStats::category(None), ErrorCategory::Other);
    }

    #[test]
    fn test_error_stats_use_kind_over_message_wording() {
        let mut stats = ErrorStats::default();
        stats.add(&unknown(
            "a.com",
            Some(LookupErrorKind::Network),
            "whois: connection timed out",
        ));
        stats.add(&unknown(
            "b.com",
            Some(LookupErrorKind::Parse),
            "network returned garbage",
        ));
        assert_eq!(stats.network_errors, vec!["a.com"]);
        assert_eq!(stats.parsing_errors, vec!["b.com"]);
        assert!(stats.timeouts.is_empty());
    }

    #[test]
    fn test_error_stats_aggregation_and_truncation() {
        let mut stats = ErrorStats::default();
        assert!(!stats.has_errors());
        assert!(stats.summary_lines().is_empty());

        for i in 0..8 {
            stats.add(&unknown(
                &format!("domain{}.com", i),
                Some(LookupErrorKind::Timeout),
                "timed out",
            ));
        }
        stats.add(&unknown(
            "x.zz",
            Some(LookupErrorKind::Unsupported),
            "no RDAP endpoint for x.zz",
        ));

        let lines = stats.summary_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("8 timeouts: domain0.com"));
        assert!(lines[0].ends_with("... and 3 more"));
        assert_eq!(lines[1], "1 unsupported TLD: x.zz");
    }

    #[test]
    fn test_error_stats_ignore_decided_results() {
        let mut stats = ErrorStats::default();
        let mut result = unknown("a.com", Some(LookupErrorKind::Timeout), "timed out");
        result.status = Availability::Available;
        stats.add(&result);
        assert!(!stats.has_errors());
    }
}
