//! Terminal rendering for domain-scout.
//!
//! Table rows (domain, status, price, purchase links), the grouped
//! `--pretty` layout, spinner, summaries and the error breakdown. Everything
//! goes through the `console` crate so colors switch off on non-TTY output.

use console::{pad_str, style, Alignment, Term};
use domain_scout_lib::{Availability, CheckResult, DomainInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::ErrorStats;

const DOMAIN_WIDTH: usize = 30;
const STATUS_WIDTH: usize = 10;
const PRICE_WIDTH: usize = 9;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner with the given message, or `None` when stderr is not a terminal.
    pub fn start(message: String) -> Option<Self> {
        if !Term::stderr().is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a pretty run.
pub fn print_header(domain_count: usize, concurrency: usize, methods: &[&str]) {
    println!(
        "{} {} {}",
        style("domain-scout").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "Checking {} domain{}",
            domain_count,
            plural(domain_count)
        ))
        .dim(),
    );

    let lookup = if methods.is_empty() {
        "none".to_string()
    } else {
        methods.join(" → ")
    };
    println!(
        "{}",
        style(format!("Lookup: {} | Concurrency: {}", lookup, concurrency)).dim()
    );
    println!();
}

// ── Table ────────────────────────────────────────────────────────────────────

/// Print the column titles of the result table.
pub fn print_table_header() {
    println!(
        "  {}  {}  {}  {}",
        style(pad_str("DOMAIN", DOMAIN_WIDTH, Alignment::Left, None)).bold(),
        style(pad_str("STATUS", STATUS_WIDTH, Alignment::Left, None)).bold(),
        style(pad_str("PRICE", PRICE_WIDTH, Alignment::Right, None)).bold(),
        style("LINKS").bold(),
    );
}

/// Print one table row.
///
/// The first purchase link shares the row; further links follow on
/// continuation lines under the links column. If `counter` is
/// `Some((current, total))`, a `[3/8]` progress prefix is shown.
pub fn print_row(
    result: &CheckResult,
    show_info: bool,
    debug: bool,
    counter: Option<(usize, usize)>,
) {
    let prefix = match counter {
        Some((cur, total)) => format!("{} ", style(format!("[{}/{}]", cur, total)).dim()),
        None => String::new(),
    };

    let links = format_links(result);
    let mut link_lines = links.iter();

    println!(
        "  {}{}  {}  {}  {}",
        prefix,
        style(pad_str(&result.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."))).white(),
        status_cell(result.status),
        pad_str(&format_price(result), PRICE_WIDTH, Alignment::Right, None),
        style(link_lines.next().map(String::as_str).unwrap_or("-")).dim(),
    );

    let links_column =
        2 + console::measure_text_width(&prefix) + DOMAIN_WIDTH + STATUS_WIDTH + PRICE_WIDTH + 6;
    let indent = " ".repeat(links_column);
    for line in link_lines {
        println!("{}{}", indent, style(line).dim());
    }

    print_details(result, show_info, debug, "    ");
}

/// Status column text, padded then colored.
fn status_cell(status: Availability) -> String {
    let padded = pad_str(status.as_str(), STATUS_WIDTH, Alignment::Left, None).into_owned();
    match status {
        Availability::Available => style(padded).green().bold().to_string(),
        Availability::Registered => style(padded).red().bold().to_string(),
        Availability::Unknown => style(padded).yellow().to_string(),
    }
}

// ── Grouped batch output ─────────────────────────────────────────────────────

/// Print results grouped by status: Available, Registered, Unknown.
/// Empty sections are omitted entirely.
pub fn print_grouped_results(results: &[CheckResult], show_info: bool, debug: bool) {
    let group = |status: Availability| -> Vec<&CheckResult> {
        results.iter().filter(|r| r.status == status).collect()
    };

    let available = group(Availability::Available);
    let registered = group(Availability::Registered);
    let unknown = group(Availability::Unknown);

    if !available.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Available ({}) ", available.len()))
                .green()
                .bold(),
            style("─".repeat(40)).green().dim(),
        );
        for r in &available {
            println!(
                "    {}  {}",
                style(pad_str(&r.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."))).white(),
                style(format_price(r)).cyan(),
            );
            for link in format_links(r) {
                println!("      {}", style(link).dim());
            }
            print_details(r, show_info, debug, "      ");
        }
        println!();
    }

    if !registered.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Registered ({}) ", registered.len()))
                .red()
                .bold(),
            style("─".repeat(39)).red().dim(),
        );
        for r in &registered {
            println!(
                "    {}",
                style(pad_str(&r.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."))).white()
            );
            print_details(r, show_info, debug, "      ");
        }
        println!();
    }

    if !unknown.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Unknown ({}) ", unknown.len()))
                .yellow()
                .bold(),
            style("─".repeat(42)).yellow().dim(),
        );
        for r in &unknown {
            println!(
                "    {}  {}",
                style(pad_str(&r.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."))).white(),
                style(brief_error(r)).dim(),
            );
            print_details(r, false, debug, "      ");
        }
        println!();
    }
}

/// Registration details (`-i`) and timing (`-d`) under a row.
fn print_details(result: &CheckResult, show_info: bool, debug: bool, indent: &str) {
    if show_info {
        if let Some(info) = &result.info {
            println!("{}{}", indent, style(format_domain_info(info)).dim());
        }
    }

    if debug {
        if let Some(duration) = result.check_duration {
            println!(
                "{}{} Checked in {}ms via {}",
                indent,
                style("└─").dim(),
                duration.as_millis(),
                result.method_used,
            );
        }
        if let Some(message) = &result.error_message {
            println!("{}{} {}", indent, style("└─").dim(), style(message).dim());
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(
    total: usize,
    available: usize,
    registered: usize,
    unknown: usize,
    duration: Duration,
) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        plural(total),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} registered", registered)).red(),
        style("|").dim(),
        style(format!("{} unknown", unknown)).yellow(),
    );
}

// ── Error summary ────────────────────────────────────────────────────────────

/// Print a categorized error summary using colors.
pub fn print_error_summary(error_stats: &ErrorStats) {
    if !error_stats.has_errors() {
        return;
    }

    println!(
        "  {}",
        style("Some domains could not be checked:").yellow()
    );
    for line in error_stats.summary_lines() {
        println!("  {} {}", style("•").dim(), line);
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Price as `$12.99`, or `-` when no estimate exists.
pub fn format_price(result: &CheckResult) -> String {
    match result.estimated_price {
        Some(price) => format!("${:.2}", price),
        None => "-".to_string(),
    }
}

/// `Registrar: url` lines in registrar name order.
pub fn format_links(result: &CheckResult) -> Vec<String> {
    result
        .purchase_links
        .iter()
        .map(|(name, url)| format!("{}: {}", name, url))
        .collect()
}

/// Format domain info (registrar, dates) into a concise string.
pub fn format_domain_info(info: &DomainInfo) -> String {
    let mut parts = Vec::new();
    if let Some(registrar) = &info.registrar {
        parts.push(format!("Registrar: {}", registrar));
    }
    if let Some(created) = &info.creation_date {
        parts.push(format!("Created: {}", created));
    }
    if let Some(expires) = &info.expiration_date {
        parts.push(format!("Expires: {}", expires));
    }
    if parts.is_empty() {
        "No info available".to_string()
    } else {
        parts.join(", ")
    }
}

/// Short reason shown next to an unknown result.
pub(crate) fn brief_error(result: &CheckResult) -> &'static str {
    match (result.error_kind, &result.error_message) {
        (None, None) => "(unknown status)",
        (kind, _) => ErrorStats::category(kind).label(),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
