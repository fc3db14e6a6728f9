use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bleau() -> Command {
    let mut cmd = Command::cargo_bin("bleau").expect("binary exists");
    cmd.env_remove("TABLEAU_PAT_SECRET").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    bleau()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("workbooks"))
        .stdout(predicate::str::contains("metadata"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_missing_server_fails_with_hint() {
    let dir = tempdir().unwrap();
    bleau()
        .args(["--config-dir", dir.path().to_str().unwrap(), "auth", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("server_url"))
        .stderr(predicate::str::contains("Hint"));
}

#[test]
fn test_invalid_server_url_fails() {
    let dir = tempdir().unwrap();
    bleau()
        .args([
            "--config-dir",
            dir.path().to_str().unwrap(),
            "--server",
            "tableau.example.test",
            "--token-name",
            "ci-token",
            "--token-secret",
            "s3cr3t",
            "auth",
            "check",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tableau.example.test"));
}

#[test]
fn test_config_set_then_show() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().to_str().unwrap();

    bleau()
        .args([
            "--config-dir",
            config_dir,
            "--profile",
            "prod",
            "--server",
            "https://tableau.example.test",
            "--token-name",
            "ci-token",
            "config",
            "set",
            "--api-version",
            "3.21",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'prod' updated"));

    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("https://tableau.example.test"));
    assert!(!saved.contains("secret"));

    bleau()
        .args(["--config-dir", config_dir, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("3.21"));
}

#[test]
fn test_metadata_query_rejects_bad_variables_before_sign_in() {
    let dir = tempdir().unwrap();
    bleau()
        .args([
            "--config-dir",
            dir.path().to_str().unwrap(),
            "metadata",
            "query",
            "{ workbooks { name } }",
            "--variables",
            "[1]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("variables"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_workbooks_list_signs_in_and_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/3.19/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {"token": "tok", "site": {"id": "site-1", "contentUrl": ""}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3.19/sites/site-1/workbooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workbooks": {"workbook": [{"id": "wb-1", "name": "Quarterly Sales"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3.19/auth/signout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let uri = server.uri();
    let config_dir = dir.path().to_str().unwrap().to_string();
    let output = tokio::task::spawn_blocking(move || {
        bleau()
            .env("TABLEAU_PAT_SECRET", "s3cr3t")
            .args([
                "--config-dir",
                &config_dir,
                "--server",
                &uri,
                "--token-name",
                "ci-token",
                "workbooks",
                "list",
                "--json",
            ])
            .output()
            .expect("run bleau")
    })
    .await
    .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Quarterly Sales"));
}
