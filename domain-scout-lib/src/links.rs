//! Registrar purchase links.
//!
//! Each registrar is a fixed search/checkout URL with the domain passed as a
//! query parameter. Nothing here touches the network.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use url::Url;

/// One registrar URL template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplate {
    /// Display name, used as the map key and CSV column name
    pub name: String,
    /// Base URL without the domain parameter
    pub base_url: String,
    /// Query parameter that carries the domain
    pub query_param: String,
}

impl LinkTemplate {
    pub fn new(name: &str, base_url: &str, query_param: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            query_param: query_param.to_string(),
        }
    }

    /// Build the URL for a domain, or `None` when the base URL is unusable.
    pub fn url_for(&self, domain: &str) -> Option<String> {
        match Url::parse_with_params(&self.base_url, &[(self.query_param.as_str(), domain)]) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!(
                    "Skipping registrar '{}': invalid base URL '{}': {}",
                    self.name, self.base_url, e
                );
                None
            }
        }
    }
}

/// Registrars linked by default.
pub fn default_templates() -> Vec<LinkTemplate> {
    vec![
        LinkTemplate::new(
            "Namecheap",
            "https://www.namecheap.com/domains/registration/results/",
            "domain",
        ),
        LinkTemplate::new(
            "GoDaddy",
            "https://www.godaddy.com/domainsearch/find",
            "domainToCheck",
        ),
        LinkTemplate::new("Porkbun", "https://porkbun.com/checkout/search", "q"),
        LinkTemplate::new("Dynadot", "https://www.dynadot.com/domain/search", "domain"),
    ]
}

/// Builds the registrar -> URL map for a domain.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    templates: Vec<LinkTemplate>,
}

impl LinkBuilder {
    pub fn new(templates: Vec<LinkTemplate>) -> Self {
        Self { templates }
    }

    /// Default registrars plus extra templates. An extra template with the
    /// same name as a default one replaces it.
    pub fn with_extra(extra: Vec<LinkTemplate>) -> Self {
        let mut templates = default_templates();
        for template in extra {
            match templates.iter_mut().find(|t| t.name == template.name) {
                Some(existing) => *existing = template,
                None => templates.push(template),
            }
        }
        Self { templates }
    }

    pub fn templates(&self) -> &[LinkTemplate] {
        &self.templates
    }

    /// Purchase links for a domain keyed by registrar name.
    pub fn build(&self, domain: &str) -> BTreeMap<String, String> {
        self.templates
            .iter()
            .filter_map(|t| t.url_for(domain).map(|url| (t.name.clone(), url)))
            .collect()
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new(default_templates())
    }
}
