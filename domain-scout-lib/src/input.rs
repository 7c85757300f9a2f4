//! Input collection and normalization.
//!
//! Domains arrive as free text (an uploaded list or manual entry) with one
//! domain per line or several separated by commas. Each item is normalized
//! and validated; anything that is not a plausible domain name is skipped
//! without failing the batch. Duplicates keep their first position.

use crate::error::DomainScoutError;
use crate::types::DomainEntry;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Normalize a raw domain string.
///
/// Lowercases and trims, strips an `http://`/`https://` scheme, anything
/// after the host (path, query, port) and one trailing dot, then reduces the
/// host to its registrable domain using the public suffix list
/// (`www.example.co.uk` -> `example.co.uk`). Returns `None` when the result
/// is not a valid fully qualified domain name or is a bare public suffix.
///
/// Normalization is idempotent: feeding a normalized name back in returns
/// the same name.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let mut domain = raw.trim().to_lowercase();

    for scheme in ["https://", "http://"] {
        if let Some(rest) = domain.strip_prefix(scheme) {
            domain = rest.to_string();
            break;
        }
    }

    if let Some(end) = domain.find(['/', '?', '#', ':']) {
        domain.truncate(end);
    }

    let domain = domain.trim().strip_suffix('.').unwrap_or(domain.trim());

    if !is_valid_fqdn(domain) {
        return None;
    }

    let registrable = psl::domain_str(domain)?;
    if registrable != domain {
        debug!("Reduced '{}' to registrable domain '{}'", domain, registrable);
    }
    Some(registrable.to_string())
}

/// Split free text into normalized, deduplicated entries in input order.
///
/// Items are separated by newlines or commas. Text after `#` on a line is a
/// comment. Blank and malformed items produce no entry.
pub fn parse_domain_text(text: &str) -> Vec<DomainEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for line in text.lines() {
        let content = line.split('#').next().unwrap_or("");

        for item in content.split(',') {
            let raw = item.trim();
            if raw.is_empty() {
                continue;
            }

            match normalize_domain(raw) {
                Some(normalized) => {
                    if seen.insert(normalized.clone()) {
                        entries.push(DomainEntry {
                            raw_input: raw.to_string(),
                            normalized_name: normalized,
                        });
                    } else {
                        debug!("Skipping duplicate domain '{}'", raw);
                    }
                }
                None => debug!("Skipping malformed domain input '{}'", raw),
            }
        }
    }

    entries
}

/// Collect entries from several text sources, deduplicating across all of them.
pub fn collect_domains<I, S>(sources: I) -> Vec<DomainEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = sources
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    parse_domain_text(&joined)
}

/// Read a domain list file and parse it.
///
/// # Errors
///
/// Returns `DomainScoutError::FileError` if the file is missing or unreadable,
/// or is not valid UTF-8.
pub async fn read_domains_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<DomainEntry>, DomainScoutError> {
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainScoutError::file_error(
            path.to_string_lossy(),
            format!("Failed to read domain list: {}", e),
        )
    })?;

    let entries = parse_domain_text(&content);
    debug!(
        "Read {} domains from {}",
        entries.len(),
        path.to_string_lossy()
    );
    Ok(entries)
}

/// Extract the suffix (text after the last dot) of a domain, lowercased.
pub fn extract_tld(domain: &str) -> Option<String> {
    let (_, tld) = domain.rsplit_once('.')?;
    if tld.is_empty() {
        None
    } else {
        Some(tld.to_lowercase())
    }
}

/// Validate that an FQDN has basic valid structure.
fn is_valid_fqdn(domain: &str) -> bool {
    if domain.len() < 4 || domain.len() > 253 {
        return false;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    for part in &parts {
        if part.is_empty() || part.len() > 63 {
            return false;
        }

        if part.starts_with('-') || part.ends_with('-') {
            return false;
        }

        if !part.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return false;
        }
    }

    // The TLD itself is never numeric ("10.0.0.1" is not a domain)
    parts
        .last()
        .is_some_and(|tld| !tld.chars().all(|c| c.is_ascii_digit()))
}
