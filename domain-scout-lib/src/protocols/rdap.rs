//! RDAP (Registration Data Access Protocol) lookups.
//!
//! RDAP is the JSON-over-HTTPS successor to WHOIS. A registry answers 200
//! with the registration record when the domain exists and 404 when it does
//! not, which makes it the primary lookup method.

use crate::error::DomainScoutError;
use crate::input::extract_tld;
use crate::protocols::registry::get_rdap_registry_map;
use crate::protocols::LookupStrategy;
use crate::types::{CheckMethod, DomainInfo, LookupError, LookupErrorKind, LookupOutcome};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, trace};

/// RDAP client with a fixed TLD -> endpoint table.
#[derive(Clone)]
pub struct RdapClient {
    http_client: reqwest::Client,
    endpoints: HashMap<String, String>,
    timeout: Duration,
}

impl RdapClient {
    /// Client with the built-in endpoint table and a 5 second HTTP timeout.
    pub fn new() -> Result<Self, DomainScoutError> {
        Self::with_config(Duration::from_secs(5), &HashMap::new())
    }

    /// Client with a custom HTTP timeout and extra endpoints.
    ///
    /// Extra endpoints override built-in ones for the same TLD.
    pub fn with_config(
        timeout: Duration,
        extra_endpoints: &HashMap<String, String>,
    ) -> Result<Self, DomainScoutError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("domain-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainScoutError::network_with_detail(
                    "Failed to create RDAP HTTP client",
                    e.to_string(),
                )
            })?;

        let mut endpoints: HashMap<String, String> = get_rdap_registry_map()
            .into_iter()
            .map(|(tld, url)| (tld.to_string(), url.to_string()))
            .collect();

        for (tld, url) in extra_endpoints {
            let tld = tld.trim().trim_start_matches('.').to_lowercase();
            let mut url = url.trim().to_string();
            if !url.ends_with('/') {
                url.push('/');
            }
            endpoints.insert(tld, url);
        }

        Ok(Self {
            http_client,
            endpoints,
            timeout,
        })
    }

    /// RDAP base URL serving the domain's TLD, if any.
    pub fn endpoint_for(&self, domain: &str) -> Option<&str> {
        let tld = extract_tld(domain)?;
        self.endpoints.get(&tld).map(String::as_str)
    }

    /// Query the registry for a domain.
    ///
    /// Returns `Ok(Some(info))` when the domain is registered and `Ok(None)`
    /// when the registry reports it unknown (HTTP 404).
    ///
    /// # Errors
    ///
    /// - `InvalidDomain` when no endpoint serves the TLD
    /// - `Timeout` or `NetworkError` when the request fails
    /// - `RateLimited` on HTTP 429
    /// - `RdapError` on any other HTTP status
    /// - `ParseError` when a 200 body is not JSON
    pub async fn query(&self, domain: &str) -> Result<Option<DomainInfo>, DomainScoutError> {
        let endpoint = self.endpoint_for(domain).ok_or_else(|| {
            DomainScoutError::invalid_domain(domain, "no RDAP endpoint for this TLD")
        })?;
        let rdap_url = format!("{}{}", endpoint, domain);
        debug!("RDAP request: {}", rdap_url);

        let response = self
            .http_client
            .get(&rdap_url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainScoutError::timeout("RDAP request", self.timeout)
                } else {
                    DomainScoutError::network_with_detail(
                        format!("RDAP request for {} failed", domain),
                        e.to_string(),
                    )
                }
            })?;

        let status = response.status();
        debug!("RDAP response for {}: {}", domain, status);

        match status {
            StatusCode::OK => {
                let body = response.text().await.map_err(|e| {
                    DomainScoutError::network_with_detail(
                        format!("Failed to read RDAP body for {}", domain),
                        e.to_string(),
                    )
                })?;
                let json: serde_json::Value = serde_json::from_str(&body)?;
                trace!("RDAP body for {}: {}", domain, json);
                Ok(Some(extract_domain_info(&json)))
            }
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::TOO_MANY_REQUESTS => Err(DomainScoutError::RateLimited {
                service: "RDAP".to_string(),
                message: format!("HTTP 429 from {}", endpoint),
            }),
            code => Err(DomainScoutError::rdap_with_status(
                domain,
                "unexpected RDAP server response",
                code.as_u16(),
            )),
        }
    }
}

#[async_trait]
impl LookupStrategy for RdapClient {
    fn name(&self) -> &str {
        "rdap"
    }

    fn method(&self) -> CheckMethod {
        CheckMethod::Rdap
    }

    async fn lookup(&self, domain: &str) -> LookupOutcome {
        if self.endpoint_for(domain).is_none() {
            return LookupOutcome::Error(LookupError::new(
                LookupErrorKind::Unsupported,
                format!("no RDAP endpoint for {}", domain),
            ));
        }

        match self.query(domain).await {
            Ok(Some(info)) => LookupOutcome::Found(info),
            Ok(None) => LookupOutcome::NotFound,
            Err(e) => LookupOutcome::Error(e.into()),
        }
    }
}

/// Extract registration details from an RDAP domain object.
pub fn extract_domain_info(json: &serde_json::Value) -> DomainInfo {
    let mut info = DomainInfo::default();

    if let Some(entities) = json.get("entities").and_then(|e| e.as_array()) {
        info.registrar = entities
            .iter()
            .filter(|entity| {
                entity
                    .get("roles")
                    .and_then(|r| r.as_array())
                    .is_some_and(|roles| roles.iter().any(|r| r.as_str() == Some("registrar")))
            })
            .find_map(|entity| extract_vcard_name(entity).or_else(|| extract_entity_identifier(entity)));
    }

    if let Some(events) = json.get("events").and_then(|e| e.as_array()) {
        for event in events {
            let action = event.get("eventAction").and_then(|a| a.as_str());
            let date = event.get("eventDate").and_then(|d| d.as_str());
            if let (Some(action), Some(date)) = (action, date) {
                match action {
                    "registration" => info.creation_date = Some(date.to_string()),
                    "expiration" => info.expiration_date = Some(date.to_string()),
                    "last changed" => info.updated_date = Some(date.to_string()),
                    _ => {}
                }
            }
        }
    }

    if let Some(statuses) = json.get("status").and_then(|s| s.as_array()) {
        info.status = statuses
            .iter()
            .filter_map(|s| s.as_str().map(String::from))
            .collect();
    }

    if let Some(nameservers) = json.get("nameservers").and_then(|ns| ns.as_array()) {
        info.nameservers = nameservers
            .iter()
            .filter_map(|ns| ns.get("ldhName").and_then(|n| n.as_str()))
            .map(|n| n.to_lowercase())
            .collect();
    }

    info
}

/// Formatted name ("fn") from an entity's jCard.
fn extract_vcard_name(entity: &serde_json::Value) -> Option<String> {
    let items = entity.get("vcardArray")?.get(1)?.as_array()?;
    items.iter().find_map(|item| {
        let item = item.as_array()?;
        if item.first()?.as_str()? == "fn" {
            item.get(3)?.as_str().map(String::from)
        } else {
            None
        }
    })
}

/// First public id, else handle, else name.
fn extract_entity_identifier(entity: &serde_json::Value) -> Option<String> {
    entity
        .get("publicIds")
        .and_then(|p| p.as_array())
        .and_then(|ids| ids.first())
        .and_then(|id| id.get("identifier"))
        .or_else(|| entity.get("handle"))
        .or_else(|| entity.get("name"))
        .and_then(|v| v.as_str())
        .map(String::from)
}
