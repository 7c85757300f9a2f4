//! Integration tests for domain-scout-lib: batch checking, fallback,
//! timeouts, retries, cancellation and export.

use async_trait::async_trait;
use domain_scout_lib::export::{read_csv, to_csv_bytes};
use domain_scout_lib::{
    parse_domain_text, Availability, CancelFlag, CheckConfig, CheckMethod, DomainChecker,
    DomainInfo, LookupError, LookupErrorKind, LookupOutcome, LookupStrategy, RetryPolicy,
};
use futures::StreamExt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory registry standing in for RDAP/WHOIS.
#[derive(Default)]
struct MockRegistry {
    registered: HashSet<String>,
    delays: HashMap<String, Duration>,
    failures_before_success: HashMap<String, u32>,
    calls: Mutex<HashMap<String, u32>>,
}

impl MockRegistry {
    fn new(registered: &[&str]) -> Self {
        Self {
            registered: registered.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    fn with_delay(mut self, domain: &str, delay: Duration) -> Self {
        self.delays.insert(domain.to_string(), delay);
        self
    }

    fn with_failures(mut self, domain: &str, failures: u32) -> Self {
        self.failures_before_success
            .insert(domain.to_string(), failures);
        self
    }

    fn calls(&self, domain: &str) -> u32 {
        self.calls
            .lock()
            .unwrap()
            .get(domain)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl LookupStrategy for MockRegistry {
    fn name(&self) -> &str {
        "mock"
    }

    fn method(&self) -> CheckMethod {
        CheckMethod::Rdap
    }

    async fn lookup(&self, domain: &str) -> LookupOutcome {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(domain.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if let Some(delay) = self.delays.get(domain) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(failures) = self.failures_before_success.get(domain) {
            if call <= *failures {
                return LookupOutcome::Error(LookupError::new(
                    LookupErrorKind::Network,
                    "connection reset",
                ));
            }
        }

        if self.registered.contains(domain) {
            LookupOutcome::Found(DomainInfo::default())
        } else {
            LookupOutcome::NotFound
        }
    }
}

fn checker(registry: Arc<MockRegistry>, config: CheckConfig) -> DomainChecker {
    DomainChecker::with_strategies(config, vec![registry as Arc<dyn LookupStrategy>])
}

#[tokio::test]
async fn test_results_follow_input_order() {
    let registry = Arc::new(
        MockRegistry::new(&["google.com"])
            .with_delay("first.com", Duration::from_millis(150))
            .with_delay("second.io", Duration::from_millis(50)),
    );
    let checker = checker(registry, CheckConfig::default().with_concurrency(4));

    let entries = parse_domain_text("first.com\nsecond.io\ngoogle.com\nlast.dev");
    let results = checker.check_domains(&entries).await;

    let domains: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, vec!["first.com", "second.io", "google.com", "last.dev"]);
    assert_eq!(results[2].status, Availability::Registered);
    assert_eq!(results[3].status, Availability::Available);
}

#[tokio::test]
async fn test_subdomain_urls_are_checked_as_registrable_domains() {
    let registry = Arc::new(MockRegistry::new(&["google.com", "example.co.uk"]));
    let checker = checker(registry.clone(), CheckConfig::default());

    let entries = parse_domain_text("https://www.google.com/search?q=x\nshop.example.co.uk");
    assert_eq!(entries[0].raw_input, "https://www.google.com/search?q=x");

    let results = checker.check_domains(&entries).await;
    assert_eq!(results[0].domain, "google.com");
    assert_eq!(results[0].status, Availability::Registered);
    assert_eq!(results[1].domain, "example.co.uk");
    assert_eq!(results[1].status, Availability::Registered);
    assert_eq!(registry.calls("google.com"), 1);
    assert_eq!(registry.calls("www.google.com"), 0);
}

#[tokio::test]
async fn test_timeout_yields_unknown_while_others_succeed() {
    let registry = Arc::new(
        MockRegistry::new(&["taken.com"]).with_delay("slow.com", Duration::from_secs(10)),
    );
    let config = CheckConfig::default().with_timeout(Duration::from_millis(100));
    let checker = checker(registry, config);

    let entries = parse_domain_text("taken.com, slow.com, free.net");
    let results = checker.check_domains(&entries).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].status, Availability::Registered);
    assert_eq!(results[1].status, Availability::Unknown);
    assert!(results[1]
        .error_message
        .as_deref()
        .unwrap()
        .contains("timed out"));
    assert_eq!(results[1].error_kind, Some(LookupErrorKind::Timeout));
    assert_eq!(results[2].status, Availability::Available);
}

#[tokio::test]
async fn test_every_result_is_priced_and_linked() {
    let registry = Arc::new(MockRegistry::new(&[]));
    let checker = checker(registry, CheckConfig::default());

    let entries = parse_domain_text("startup.io\nexample.unknowntld");
    for result in checker.check_domains(&entries).await {
        assert!(result.estimated_price.is_some(), "{}", result.domain);
        assert!(result.purchase_links.contains_key("Namecheap"));
        assert!(result.purchase_links["Porkbun"].ends_with(&result.domain));
    }
}

#[test]
fn test_blank_lines_produce_no_results() {
    let registry = Arc::new(MockRegistry::new(&[]));
    let checker = checker(registry, CheckConfig::default());

    let entries = parse_domain_text("\n\n   \nalpha.com\n\n\nbeta.com\n   \n");
    let results = tokio_test::block_on(checker.check_domains(&entries));

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.domain.is_empty()));
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let registry = Arc::new(MockRegistry::new(&["flaky.com"]).with_failures("flaky.com", 2));

    let no_retry = checker(registry.clone(), CheckConfig::default());
    let result = no_retry.check_domain("flaky.com").await;
    assert_eq!(result.status, Availability::Unknown);
    assert_eq!(registry.calls("flaky.com"), 1);

    let registry = Arc::new(MockRegistry::new(&["flaky.com"]).with_failures("flaky.com", 2));
    let config = CheckConfig::default()
        .with_retry(RetryPolicy::with_retries(2, Duration::from_millis(10)));
    let with_retry = checker(registry.clone(), config);
    let result = with_retry.check_domain("flaky.com").await;
    assert_eq!(result.status, Availability::Registered);
    assert_eq!(registry.calls("flaky.com"), 3);
}

#[tokio::test]
async fn test_cancelled_batch_issues_no_lookups() {
    let registry = Arc::new(MockRegistry::new(&[]));
    let checker = checker(registry.clone(), CheckConfig::default());

    let cancel = CancelFlag::new();
    cancel.cancel();

    let entries = parse_domain_text("a1.com\nb2.com\nc3.com");
    let results = checker.check_domains_with_cancel(&entries, &cancel).await;
    assert!(results.is_empty());
    assert_eq!(registry.calls("a1.com"), 0);
}

#[tokio::test]
async fn test_stream_stops_after_cancel() {
    let registry = Arc::new(MockRegistry::new(&[]));
    let checker = checker(registry.clone(), CheckConfig::default().with_concurrency(1));

    let entries = parse_domain_text("a1.com\nb2.com\nc3.com\nd4.com");
    let cancel = CancelFlag::new();
    let mut stream = checker.check_domains_stream(&entries, cancel.clone());

    let mut seen = Vec::new();
    while let Some((index, result)) = stream.next().await {
        seen.push((index, result.domain));
        cancel.cancel();
    }

    assert_eq!(seen, vec![(0, "a1.com".to_string())]);
    assert_eq!(registry.calls("b2.com"), 0);
}

#[tokio::test]
async fn test_stream_yields_every_index_once() {
    let registry = Arc::new(
        MockRegistry::new(&["b2.com"]).with_delay("a1.com", Duration::from_millis(100)),
    );
    let checker = checker(registry, CheckConfig::default().with_concurrency(3));
    let entries = parse_domain_text("a1.com\nb2.com\nc3.com");

    let mut results: Vec<_> = checker
        .check_domains_stream(&entries, CancelFlag::new())
        .collect()
        .await;
    assert_eq!(results.len(), 3);
    assert_ne!(results[0].0, 0, "slow domain should not finish first");

    results.sort_by_key(|(index, _)| *index);
    let domains: Vec<&str> = results.iter().map(|(_, r)| r.domain.as_str()).collect();
    assert_eq!(domains, vec!["a1.com", "b2.com", "c3.com"]);
}

#[tokio::test]
async fn test_csv_export_round_trip() {
    let registry = Arc::new(MockRegistry::new(&["google.com"]));
    let checker = checker(registry, CheckConfig::default());
    let entries = parse_domain_text("google.com\nfresh-idea-3391.io\nexample.museum");
    let results = checker.check_domains(&entries).await;

    let bytes = to_csv_bytes(&results).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert_eq!(text.lines().count(), results.len() + 1);
    assert!(text.starts_with("domain,status,estimated_price,Dynadot,GoDaddy,Namecheap,Porkbun"));

    let parsed = read_csv(bytes.as_slice()).unwrap();
    let pairs: Vec<(String, Availability)> =
        parsed.into_iter().map(|r| (r.domain, r.status)).collect();
    assert_eq!(
        pairs,
        vec![
            ("google.com".to_string(), Availability::Registered),
            ("fresh-idea-3391.io".to_string(), Availability::Available),
            ("example.museum".to_string(), Availability::Available),
        ]
    );
}

mod rdap_chain {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_checker_against_mock_rdap_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rdap/domain/taken.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "objectClassName": "domain",
                "events": [{"eventAction": "registration", "eventDate": "2001-01-01T00:00:00Z"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rdap/domain/free.com"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = CheckConfig::default()
            .with_whois_fallback(false)
            .with_detailed_info(true)
            .with_rdap_endpoints(HashMap::from([(
                "com".to_string(),
                format!("{}/rdap/domain/", server.uri()),
            )]));
        let checker = DomainChecker::with_config(config).unwrap();

        let entries = parse_domain_text("taken.com\nfree.com\nnowhere.unknowntld");
        let results = checker.check_domains(&entries).await;

        assert_eq!(results[0].status, Availability::Registered);
        assert_eq!(results[0].method_used, CheckMethod::Rdap);
        assert_eq!(
            results[0]
                .info
                .as_ref()
                .and_then(|i| i.creation_date.as_deref()),
            Some("2001-01-01T00:00:00Z")
        );
        assert_eq!(results[1].status, Availability::Available);
        assert_eq!(results[2].status, Availability::Unknown);
    }
}

/// Hits real registries, so it only runs with `--ignored`.
#[tokio::test]
#[ignore]
async fn test_live_registered_and_unregistered_domains() {
    let checker = DomainChecker::new().unwrap();
    let entries = parse_domain_text("google.com\nzzzqqqunregistered12345.com");
    let results = checker.check_domains(&entries).await;

    assert_eq!(results[0].status, Availability::Registered);
    assert_eq!(results[1].status, Availability::Available);
}
