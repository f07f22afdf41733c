//! Integration tests for the `shopfront` CLI binary.
//!
//! Offline commands run against temp config files; network commands run
//! against a wiremock back office.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `shopfront` binary with env isolation.
///
/// Clears all `SHOPFRONT_*` env vars and points the config file into
/// `dir` so tests never touch the user's real configuration.
fn shopfront_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shopfront");
    cmd.env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("SHOPFRONT_CONFIG", dir.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("SHOPFRONT_PROFILE")
        .env_remove("SHOPFRONT_API_URL")
        .env_remove("SHOPFRONT_OUTPUT")
        .env_remove("SHOPFRONT_TIMEOUT")
        .env_remove("SHOPFRONT_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, contents).unwrap();
    p
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let output = shopfront_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = String::from_utf8_lossy(&output.stderr);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("reservations")
                .and(predicate::str::contains("products"))
                .and(predicate::str::contains("normalize")),
        );
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shopfront"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Status vocabulary ───────────────────────────────────────────────

#[test]
fn test_canonicalize_plain() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args([
            "status",
            "canonicalize",
            "READY_FOR_PICKUP",
            "canceled",
            "  ",
            "on_hold",
            "-o",
            "plain",
        ])
        .assert()
        .success()
        .stdout("ready_for_pickup\ncancelled\nunknown\nunrecognized\n");
}

#[test]
fn test_canonicalize_labels_follow_locale() {
    let dir = TempDir::new().unwrap();
    let output = shopfront_cmd(dir.path())
        .args(["status", "canonicalize", "ready", "-o", "json", "--locale", "en"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body = stdout_json(&output);
    assert_eq!(body[0]["label"], "Ready for pickup");
    assert_eq!(body[0]["status"]["kind"], "ready_for_pickup");
}

#[test]
fn test_config_override_rebinds_status() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "config.toml",
        "[statuses.reservation]\nCONFIRMED = \"picked_up\"\n",
    );
    shopfront_cmd(dir.path())
        .args(["status", "canonicalize", "CONFIRMED", "confirmed", "-o", "plain"])
        .assert()
        .success()
        .stdout("picked_up\npicked_up\n");
}

#[test]
fn test_bad_override_is_usage_error() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "config.toml",
        "[statuses.sale]\nVOIDED = \"gone\"\n",
    );
    shopfront_cmd(dir.path())
        .args(["status", "table", "-e", "sale"])
        .assert()
        .code(2);
}

#[test]
fn test_status_options_in_lifecycle_order() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args(["status", "options", "-o", "plain"])
        .assert()
        .success()
        .stdout("pending\naccepted\nconfirmed\nready_for_pickup\npicked_up\ncancelled\n");
}

// ── Offline normalization ───────────────────────────────────────────

#[test]
fn test_normalize_bare_array_slices_client_side() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "bare.json", r#"[{"id":1},{"id":2},{"id":3},{"id":4},{"id":5}]"#);

    let output = shopfront_cmd(dir.path())
        .arg("normalize")
        .arg(&file)
        .args(["--page", "2", "--page-size", "2", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page = stdout_json(&output);
    assert_eq!(page["totalItems"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["items"], json!([{ "id": 3 }, { "id": 4 }]));
}

#[test]
fn test_normalize_reads_stdin() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args(["normalize", "-", "-o", "table"])
        .write_stdin(r#"{"data":[{"id":"a"}],"meta":{"page":1,"pageSize":20}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total pages:  1"));
}

#[test]
fn test_normalize_malformed_count_exits_9() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "bad.json",
        r#"{"items":[],"totalItems":"NaN","page":1,"pageSize":10}"#,
    );
    shopfront_cmd(dir.path())
        .arg("normalize")
        .arg(&file)
        .assert()
        .code(9)
        .stderr(predicate::str::contains("totalItems"));
}

#[test]
fn test_normalize_reservations_reconciles_items() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "reservations.json",
        r#"{"items":[
            {"id":"r1","code":"RSV-1","status":"CANCELED","customerFirstName":"Ana","customerLastName":"Pérez"},
            {"id":"r2","code":"RSV-2","status":"READY"}
        ],"totalItems":2,"page":1,"pageSize":10}"#,
    );
    let output = shopfront_cmd(dir.path())
        .arg("normalize")
        .arg(&file)
        .args(["-e", "reservations", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page = stdout_json(&output);
    assert_eq!(page["items"][0]["status"]["kind"], "cancelled");
    assert_eq!(page["items"][0]["customer_name"], "Ana Pérez");
    assert_eq!(page["items"][1]["status"]["kind"], "ready_for_pickup");
}

// ── Config management ───────────────────────────────────────────────

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args([
            "config",
            "init",
            "--name",
            "shop",
            "--url",
            "http://shop.local:8080",
            "--token-env",
            "SHOP_TOKEN",
        ])
        .assert()
        .success();

    shopfront_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("default_profile = \"shop\"")
                .and(predicate::str::contains("token_env = \"SHOP_TOKEN\"")),
        );

    // A second init refuses to overwrite
    shopfront_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_config_init_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args(["config", "init", "--url", "not a url"])
        .assert()
        .code(2);
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args(["--profile", "staging", "reservations", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("staging"));
}

// ── Against a mock back office ──────────────────────────────────────

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(dir: &Path, args: Vec<String>) -> std::process::Output {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || shopfront_cmd(&dir).args(args).output().unwrap())
        .await
        .unwrap()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reservations_list_normalizes_server_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations"))
        .and(query_param("pageSize", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "r1", "code": "RSV-1", "status": "PENDING" },
                { "id": "r2", "code": "RSV-2", "status": "PICKED_UP" }
            ],
            "totalItems": 3,
            "page": 1,
            "pageSize": 2
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_blocking(
        dir.path(),
        args(&["-u", &server.uri(), "reservations", "list", "-l", "2", "-o", "json"]),
    )
    .await;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let page = stdout_json(&output);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["items"][1]["status"]["kind"], "picked_up");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_reservation_exits_4() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Reservation not found" })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_blocking(dir.path(), args(&["-u", &server.uri(), "reservations", "get", "nope"])).await;
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_accept_prints_updated_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations/r1/accept"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1", "code": "RSV-1", "status": "ACCEPTED"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_blocking(
        dir.path(),
        args(&["-u", &server.uri(), "reservations", "accept", "r1", "-o", "plain"]),
    )
    .await;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "r1");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Aceptada"));
}

#[test]
fn test_unreachable_api_exits_7() {
    let dir = TempDir::new().unwrap();
    shopfront_cmd(dir.path())
        .args(["-u", "http://127.0.0.1:9", "--timeout", "5", "products", "list"])
        .assert()
        .code(7);
}
