use assert_cmd::Command;
use tempfile::TempDir;

/// A command isolated from the developer's real config, session, and
/// environment. The temp dir stands in for HOME/XDG so nothing on the host
/// machine leaks into assertions.
fn isolated(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splicectl").unwrap();
    cmd.env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env_remove("SPLICECTL_API_SERVER")
        .env_remove("SPLICECTL_CA_CERT")
        .env_remove("SPLICECTL_API_VERSION")
        .env_remove("SPLICECTL_TOKEN_BEARER")
        .env_remove("SPLICECTL_SESSION_ID");
    cmd
}

#[test]
fn help_exits_zero() {
    Command::cargo_bin("splicectl")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn get_help_lists_targets() {
    Command::cargo_bin("splicectl")
        .unwrap()
        .args(["get", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("accounts"))
        .stdout(predicates::str::contains("default-cr"))
        .stdout(predicates::str::contains("vault-key"));
}

#[test]
fn no_args_shows_usage_and_fails() {
    Command::cargo_bin("splicectl").unwrap().assert().failure();
}

#[test]
fn unknown_output_format_is_rejected() {
    Command::cargo_bin("splicectl")
        .unwrap()
        .args(["get", "accounts", "-o", "xml"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid value"));
}

#[test]
fn rollback_requires_version_flag() {
    Command::cargo_bin("splicectl")
        .unwrap()
        .args(["rollback", "default-cr"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("--version"));
}

#[test]
fn missing_configuration_is_a_startup_error() {
    let tmp = TempDir::new().unwrap();
    isolated(&tmp)
        .args(["get", "accounts"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("no API server configured"));
}

#[test]
fn missing_session_is_a_startup_error() {
    let tmp = TempDir::new().unwrap();
    isolated(&tmp)
        .args(["--server", "https://cluster.example.invalid", "get", "accounts"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("no session found"));
}

#[test]
fn unreadable_ca_bundle_is_a_startup_error() {
    let tmp = TempDir::new().unwrap();
    isolated(&tmp)
        .env("SPLICECTL_TOKEN_BEARER", "tb")
        .env("SPLICECTL_SESSION_ID", "sid")
        .args([
            "--server",
            "https://cluster.example.invalid",
            "--ca-cert",
            "/nonexistent/ca.pem",
            "get",
            "accounts",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read CA bundle"));
}

#[test]
fn alias_preference_notice_names_the_winner() {
    // With credentials and a pinned api version the command gets as far as
    // the transport, which then fails on the unresolvable host — but the
    // flag-preference notice must already be on stderr.
    let tmp = TempDir::new().unwrap();
    isolated(&tmp)
        .env("SPLICECTL_TOKEN_BEARER", "tb")
        .env("SPLICECTL_SESSION_ID", "sid")
        .env("SPLICECTL_API_VERSION", "0.1.8")
        .args([
            "--server",
            "https://cluster.example.invalid",
            "restart",
            "workspace",
            "--database-name",
            "primary",
            "--database",
            "other",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("using --database-name primary"));
}

#[test]
fn invalid_api_version_override_is_fatal() {
    let tmp = TempDir::new().unwrap();
    isolated(&tmp)
        .env("SPLICECTL_TOKEN_BEARER", "tb")
        .env("SPLICECTL_SESSION_ID", "sid")
        .env("SPLICECTL_API_VERSION", "not-a-version")
        .args(["--server", "https://cluster.example.invalid", "get", "accounts"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid api_version override"));
}
