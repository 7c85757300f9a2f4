// domain-scout/tests/cli_integration.rs
//
// Most tests run with both lookup methods disabled so they never touch the
// network: every domain comes back UNKNOWN but is still priced and linked.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CSV_HEADER: &str = "domain,status,estimated_price,Dynadot,GoDaddy,Namecheap,Porkbun";

/// Command isolated from the user's config files and `DS_*` variables.
fn scout(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-scout").unwrap();
    cmd.current_dir(workdir.path())
        .env("HOME", workdir.path())
        .env("XDG_CONFIG_HOME", workdir.path().join("xdg"))
        .env_remove("RUST_LOG");
    for key in [
        "DS_CONCURRENCY",
        "DS_TIMEOUT",
        "DS_RETRIES",
        "DS_RDAP",
        "DS_WHOIS_FALLBACK",
        "DS_DETAILED_INFO",
        "DS_CONFIG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

/// Offline command: no RDAP, no WHOIS.
fn offline(workdir: &TempDir) -> Command {
    let mut cmd = scout(workdir);
    cmd.args(["--no-rdap", "--no-whois"]);
    cmd
}

#[test]
fn test_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--stdin"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--no-whois"))
        .stdout(predicate::str::contains("--retries"));
}

#[test]
fn test_no_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("You must specify domain names"));
}

#[test]
fn test_conflicting_output_formats() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["example.com", "--json", "--csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple output formats"));
}

#[test]
fn test_invalid_concurrency_and_timeout() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["example.com", "-c", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be between 1 and 100"));

    scout(&dir)
        .args(["example.com", "--timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout"));
}

#[test]
fn test_only_malformed_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["not a domain", "also..bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid domain names"));
}

#[test]
fn test_csv_output_offline() {
    let dir = TempDir::new().unwrap();
    let output = offline(&dir)
        .args(["--csv", "Example.COM", "startup.io"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].starts_with("example.com,UNKNOWN,12.99,https://"));
    assert!(lines[2].starts_with("startup.io,UNKNOWN,39.99,"));
    assert!(lines[2].contains("porkbun.com"));
}

#[test]
fn test_json_output_offline() {
    let dir = TempDir::new().unwrap();
    let output = offline(&dir)
        .args(["--json", "a.com,b.dev"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["domain"], "a.com");
    assert_eq!(items[0]["status"], "UNKNOWN");
    assert!(items[1]["purchase_links"]["Namecheap"]
        .as_str()
        .unwrap()
        .contains("b.dev"));
}

#[test]
fn test_text_output_shows_table_and_summary() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["alpha.com", "beta.net"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DOMAIN"))
        .stdout(predicate::str::contains("alpha.com"))
        .stdout(predicate::str::contains("UNKNOWN"))
        .stdout(predicate::str::contains("$12.99"))
        .stdout(predicate::str::contains("2 domains"))
        .stdout(predicate::str::contains("2 unknown"));
}

#[test]
fn test_pretty_output_groups_results() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["--pretty", "alpha.com", "beta.net"])
        .assert()
        .success()
        .stdout(predicate::str::contains("── Unknown (2)"));
}

#[test]
fn test_file_input_and_csv_export() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("domains.txt");
    fs::write(
        &list,
        "# candidates\nfirst-pick.com\n\n  second-pick.io  \nnot a domain\nfirst-pick.com\n",
    )
    .unwrap();
    let out = dir.path().join("results.csv");

    offline(&dir)
        .arg("--file")
        .arg(&list)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 results"));

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].starts_with("first-pick.com,UNKNOWN,"));
    assert!(lines[2].starts_with("second-pick.io,UNKNOWN,"));
}

#[test]
fn test_json_export_by_extension() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("results.json");

    offline(&dir)
        .args(["--csv", "one.com"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(CSV_HEADER));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value[0]["domain"], "one.com");
}

#[test]
fn test_missing_input_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["--file", "no-such-list.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-list.txt"));
}

#[test]
fn test_stdin_input() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["--stdin", "--csv"])
        .write_stdin("from-stdin.com\nanother.org, third.net\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("from-stdin.com,UNKNOWN"))
        .stdout(predicate::str::contains("another.org,UNKNOWN"))
        .stdout(predicate::str::contains("third.net,UNKNOWN"));
}

#[test]
fn test_local_config_file_prices_and_registrars() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("domain-scout.toml"),
        r#"
[pricing]
com = "7.50"

[[registrars]]
name = "Gandi"
base_url = "https://shop.gandi.net/en/domain/suggest"
query_param = "search"
"#,
    )
    .unwrap();

    offline(&dir)
        .args(["--csv", "cheap.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "domain,status,estimated_price,Dynadot,Gandi,GoDaddy,Namecheap,Porkbun",
        ))
        .stdout(predicate::str::contains("cheap.com,UNKNOWN,7.50,"));
}

#[test]
fn test_explicit_config_file_via_env() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[pricing]\nio = \"11.00\"\n").unwrap();

    offline(&dir)
        .env("DS_CONFIG", &config)
        .args(["--csv", "tool.io"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tool.io,UNKNOWN,11.00,"));
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("domain-scout.toml"),
        "[defaults]\nconcurrency = 0\n",
    )
    .unwrap();

    offline(&dir)
        .args(["--csv", "x.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    offline(&dir)
        .args(["--config", "missing.toml", "x.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_invalid_env_values_are_ignored() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .env("DS_CONCURRENCY", "lots")
        .args(["--csv", "ok.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok.com,UNKNOWN"))
        .stderr(predicate::str::contains("DS_CONCURRENCY"));
}

/// Hits real registries, so it only runs with `--ignored`.
#[test]
#[ignore]
fn test_live_check_google_and_invented_domain() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["--csv", "google.com", "zzzqqqunregistered12345.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("google.com,REGISTERED"))
        .stdout(predicate::str::contains(
            "zzzqqqunregistered12345.com,AVAILABLE",
        ));
}
