//! CSV and JSON export of check results.
//!
//! The CSV layout is `domain,status,estimated_price` followed by one column
//! per registrar (the sorted union of registrar names across all results).
//! Rows keep input order.

use crate::error::DomainScoutError;
use crate::types::{Availability, CheckMethod, CheckResult};
use crate::Result;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const FIXED_COLUMNS: [&str; 3] = ["domain", "status", "estimated_price"];

/// Output format for exported results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Sorted union of registrar names across results.
pub fn registrar_columns(results: &[CheckResult]) -> Vec<String> {
    results
        .iter()
        .flat_map(|r| r.purchase_links.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Write results as CSV with a header row.
pub fn write_csv<W: io::Write>(results: &[CheckResult], writer: W) -> Result<()> {
    let registrars = registrar_columns(results);
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = FIXED_COLUMNS.to_vec();
    header.extend(registrars.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for result in results {
        let price = result
            .estimated_price
            .map(|p| p.to_string())
            .unwrap_or_default();
        let mut record = vec![
            result.domain.clone(),
            result.status.to_string(),
            price,
        ];
        record.extend(registrars.iter().map(|name| {
            result
                .purchase_links
                .get(name)
                .cloned()
                .unwrap_or_default()
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    debug!("Wrote {} CSV rows", results.len());
    Ok(())
}

/// Serialize results to CSV bytes.
pub fn to_csv_bytes(results: &[CheckResult]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(results, &mut buffer)?;
    Ok(buffer)
}

/// Parse a CSV produced by `write_csv` back into results.
///
/// Only domain, status, price and links survive the round trip; the method
/// is reported as unknown and timing/details are empty.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<CheckResult>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let fixed_ok = headers.len() >= FIXED_COLUMNS.len()
        && FIXED_COLUMNS
            .iter()
            .zip(headers.iter())
            .all(|(expected, actual)| expected.eq_ignore_ascii_case(actual.trim()));
    if !fixed_ok {
        return Err(DomainScoutError::ParseError {
            message: format!(
                "unexpected CSV header '{}', expected it to start with '{}'",
                headers.iter().collect::<Vec<_>>().join(","),
                FIXED_COLUMNS.join(",")
            ),
        });
    }
    let registrars: Vec<String> = headers
        .iter()
        .skip(FIXED_COLUMNS.len())
        .map(String::from)
        .collect();

    let mut results = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let status = Availability::from_str(field(1)).map_err(|e| DomainScoutError::ParseError {
            message: format!("row {}: {}", row + 1, e),
        })?;

        let estimated_price = match field(2) {
            "" => None,
            text => Some(Decimal::from_str(text).map_err(|e| DomainScoutError::ParseError {
                message: format!("row {}: invalid price '{}': {}", row + 1, text, e),
            })?),
        };

        let purchase_links: BTreeMap<String, String> = registrars
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let url = field(FIXED_COLUMNS.len() + i);
                (!url.is_empty()).then(|| (name.clone(), url.to_string()))
            })
            .collect();

        results.push(CheckResult {
            domain: field(0).to_string(),
            status,
            estimated_price,
            purchase_links,
            info: None,
            method_used: CheckMethod::Unknown,
            check_duration: None,
            error_message: None,
            error_kind: None,
        });
    }

    Ok(results)
}

/// Serialize results as a pretty-printed JSON array.
pub fn to_json(results: &[CheckResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Write results to a file.
///
/// The whole document is serialized in memory before the file is touched.
///
/// # Errors
///
/// Returns `ExportError` when `results` is empty (no file is created) and
/// `FileError` when the file cannot be written.
pub fn export_to_file<P: AsRef<Path>>(
    results: &[CheckResult],
    path: P,
    format: ExportFormat,
) -> Result<()> {
    let path = path.as_ref();
    if results.is_empty() {
        return Err(DomainScoutError::export("no results to export"));
    }

    let bytes = match format {
        ExportFormat::Csv => to_csv_bytes(results)?,
        ExportFormat::Json => to_json(results)?.into_bytes(),
    };

    std::fs::write(path, bytes).map_err(|e| {
        DomainScoutError::file_error(path.to_string_lossy(), format!("Failed to write: {}", e))
    })?;

    info!(
        "Exported {} results as {:?} to {}",
        results.len(),
        format,
        path.display()
    );
    Ok(())
}
