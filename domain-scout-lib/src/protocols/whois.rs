//! WHOIS fallback through the system `whois` command.
//!
//! WHOIS answers are free text whose layout varies by registry, so the
//! classification is pattern based. Ambiguous answers are reported as parse
//! errors rather than guessed.

use crate::protocols::LookupStrategy;
use crate::types::{CheckMethod, DomainInfo, LookupError, LookupErrorKind, LookupOutcome};
use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

const INVALID_TLD_PATTERNS: &[&str] = &[
    "no whois server is known",
    "no whois server",
    "invalid tld",
    "unknown tld",
    "tld not found",
    "no such tld",
    "invalid domain extension",
];

const AVAILABLE_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "domain available",
    "status: available",
    "status: free",
    "no information available",
    "not registered",
    "no matching record",
    "no object found",
    "the queried object does not exist",
    "object does not exist",
    "no matching entry",
    "this domain name has not been registered",
];

const TAKEN_PATTERNS: &[&str] = &[
    "domain status:",
    "registrar:",
    "creation date:",
    "created:",
    "registry domain id:",
    "registrant:",
    "name server:",
    "nserver:",
    "nameservers:",
    "expiry date:",
    "expires:",
    "last updated:",
];

const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit exceeded",
    "too many requests",
    "try again later",
    "quota exceeded",
    "limit exceeded",
    "throttled",
    "rate-limited",
];

lazy_static::lazy_static! {
    static ref REGISTRAR_RE: Regex =
        Regex::new(r"(?im)^\s*registrar(?: name)?:\s*(\S.*?)\s*$").unwrap();
    static ref CREATED_RE: Regex = Regex::new(
        r"(?im)^\s*(?:creation date|created(?: on)?|registered on|registration time):\s*(\S.*?)\s*$"
    )
    .unwrap();
    static ref EXPIRES_RE: Regex = Regex::new(
        r"(?im)^\s*(?:registry expiry date|registrar registration expiration date|expiry date|expiration date|expires(?: on)?|paid-till):\s*(\S.*?)\s*$"
    )
    .unwrap();
    static ref UPDATED_RE: Regex = Regex::new(
        r"(?im)^\s*(?:updated date|last updated|last modified|changed):\s*(\S.*?)\s*$"
    )
    .unwrap();
    static ref NAMESERVER_RE: Regex =
        Regex::new(r"(?im)^\s*(?:name server|nserver):\s*(\S+)").unwrap();
    static ref STATUS_RE: Regex =
        Regex::new(r"(?im)^\s*(?:domain )?status:\s*(\S+)").unwrap();
}

/// WHOIS client backed by an external `whois` executable.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    program: String,
}

impl WhoisClient {
    pub fn new() -> Self {
        Self::with_program("whois")
    }

    /// Use a different executable (for a non-standard install path).
    pub fn with_program<P: Into<String>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, domain: &str) -> Result<String, LookupError> {
        let output = Command::new(&self.program)
            .arg(domain)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                LookupError::new(
                    LookupErrorKind::Unsupported,
                    format!("failed to run '{}': {} (is whois installed?)", self.program, e),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LookupError::new(
                LookupErrorKind::Network,
                format!("whois exited with {}: {}", output.status, stderr.trim()),
            ));
        }
        Ok(stdout)
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupStrategy for WhoisClient {
    fn name(&self) -> &str {
        "whois"
    }

    fn method(&self) -> CheckMethod {
        CheckMethod::Whois
    }

    async fn lookup(&self, domain: &str) -> LookupOutcome {
        match self.run(domain).await {
            Ok(text) => {
                let outcome = parse_whois_response(&text);
                debug!("WHOIS for {}: {:?}", domain, outcome);
                outcome
            }
            Err(e) => LookupOutcome::Error(e),
        }
    }
}

/// Classify raw WHOIS text.
///
/// A response with three or more registration markers is registered even if
/// boilerplate elsewhere mentions "not found". Otherwise rate-limit notices,
/// then "no match" style markers, then two registration markers decide.
/// Very short non-empty answers count as available.
pub fn parse_whois_response(text: &str) -> LookupOutcome {
    let lower = text.to_lowercase();
    let trimmed = lower.trim();

    if INVALID_TLD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return LookupOutcome::Error(LookupError::new(
            LookupErrorKind::Unsupported,
            "no WHOIS server for this TLD",
        ));
    }

    let taken_markers = TAKEN_PATTERNS.iter().filter(|p| lower.contains(*p)).count();
    if taken_markers >= 3 {
        return LookupOutcome::Found(extract_whois_info(text));
    }

    if RATE_LIMIT_PATTERNS.iter().any(|p| lower.contains(p)) {
        return LookupOutcome::Error(LookupError::new(
            LookupErrorKind::RateLimited,
            "WHOIS server is rate limiting",
        ));
    }

    if AVAILABLE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return LookupOutcome::NotFound;
    }

    if taken_markers == 2 {
        return LookupOutcome::Found(extract_whois_info(text));
    }

    if trimmed.is_empty() {
        return LookupOutcome::Error(LookupError::new(
            LookupErrorKind::Parse,
            "empty WHOIS response",
        ));
    }

    if trimmed.len() < 50 {
        return LookupOutcome::NotFound;
    }

    LookupOutcome::Error(LookupError::new(
        LookupErrorKind::Parse,
        "unable to determine domain status from WHOIS response",
    ))
}

/// Best-effort registration details from WHOIS text.
fn extract_whois_info(text: &str) -> DomainInfo {
    let first = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    let mut nameservers: Vec<String> = Vec::new();
    for cap in NAMESERVER_RE.captures_iter(text) {
        let ns = cap[1].to_lowercase();
        if !nameservers.contains(&ns) {
            nameservers.push(ns);
        }
    }

    let mut status: Vec<String> = Vec::new();
    for cap in STATUS_RE.captures_iter(text) {
        let code = cap[1].to_string();
        if !status.contains(&code) {
            status.push(code);
        }
    }

    DomainInfo {
        registrar: first(&REGISTRAR_RE),
        creation_date: first(&CREATED_RE),
        expiration_date: first(&EXPIRES_RE),
        updated_date: first(&UPDATED_RE),
        status,
        nameservers,
    }
}
