//! Error handling for domain checking operations.
//!
//! Lookup failures never surface as `DomainScoutError` from a batch check:
//! they are folded into an `UNKNOWN` result. This type covers what can
//! still go wrong around the checks (configuration, files, export).

use std::time::Duration;
use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Clone, Error)]
pub enum DomainScoutError {
    /// Invalid domain name format
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// Network-related errors (connection, DNS, unexpected HTTP status)
    #[error("Network error: {message}{}", detail_suffix(.detail))]
    NetworkError {
        message: String,
        detail: Option<String>,
    },

    /// RDAP protocol specific errors
    #[error("RDAP error for '{domain}'{}: {message}", status_suffix(.status_code))]
    RdapError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// WHOIS protocol specific errors
    #[error("WHOIS error for '{domain}': {message}")]
    WhoisError { domain: String, message: String },

    /// Response could not be interpreted
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Invalid settings in a config file, environment or arguments
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File I/O errors when reading domain lists or config
    #[error("File error at '{path}': {message}")]
    FileError { path: String, message: String },

    /// An operation ran past its deadline
    #[error("Timeout after {duration:?} during: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Server rejected the request because of rate limiting
    #[error("Rate limited by {service}: {message}")]
    RateLimited { service: String, message: String },

    /// Export could not be produced (e.g. nothing to export)
    #[error("Export error: {message}")]
    ExportError { message: String },

    /// Generic internal errors that don't fit other categories
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|s| format!(" ({})", s))
        .unwrap_or_default()
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|c| format!(" (HTTP {})", c)).unwrap_or_default()
}

impl DomainScoutError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            detail: None,
        }
    }

    /// Create a new network error with the underlying cause attached.
    pub fn network_with_detail<M: Into<String>, S: Into<String>>(message: M, detail: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Create a new RDAP error with HTTP status code.
    pub fn rdap_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::WhoisError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new export error.
    pub fn export<M: Into<String>>(message: M) -> Self {
        Self::ExportError {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DomainScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<csv::Error> for DomainScoutError {
    fn from(err: csv::Error) -> Self {
        Self::ExportError {
            message: format!("CSV error: {}", err),
        }
    }
}

impl From<std::io::Error> for DomainScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
