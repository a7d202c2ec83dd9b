//! Integration tests for the session lifecycle through the binary.

use std::path::Path;

use assert_cmd::Command;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Unsigned JWT with the given `exp` claim.
fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
    format!("{header}.{payload}.sig")
}

fn fresh_jwt() -> String {
    jwt_with_exp(chrono::Utc::now().timestamp() + 3600)
}

fn expired_jwt() -> String {
    jwt_with_exp(chrono::Utc::now().timestamp() - 60)
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u-1",
        "email": "ana@example.com",
        "username": "ana",
        "roles": ["USER"],
        "isActive": true,
        "isVerified": true
    })
}

fn grant_body(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "success": true,
        "message": "ok",
        "data": {
            "accessToken": access,
            "refreshToken": refresh,
            "tokenType": "Bearer",
            "expiresIn": 900,
            "user": user_json()
        },
        "timestamp": "2024-05-01T12:00:00Z"
    })
}

/// Writes config.toml pointing both services at the given URLs.
fn write_config(home: &Path, app_url: &str, auth_url: &str) {
    std::fs::create_dir_all(home).unwrap();
    std::fs::write(
        home.join("config.toml"),
        format!("app_base_url = \"{app_url}\"\nauth_base_url = \"{auth_url}\"\n"),
    )
    .unwrap();
}

/// Seeds a stored session directly.
fn seed_session(home: &Path, access: &str, refresh: &str) {
    std::fs::create_dir_all(home).unwrap();
    let session = json!({
        "accessToken": access,
        "refreshToken": refresh,
        "user": user_json()
    });
    std::fs::write(
        home.join("session.json"),
        serde_json::to_string_pretty(&session).unwrap(),
    )
    .unwrap();
}

fn vortex(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vortex").unwrap();
    cmd.env("VORTEX_HOME", home);
    cmd
}

/// Test: status with no stored session.
#[test]
fn test_status_not_signed_in() {
    let temp = tempdir().unwrap();

    vortex(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

/// Test: login stores the session and status reads it back.
#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_status() {
    let server = MockServer::start().await;
    let temp = tempdir().unwrap();
    write_config(temp.path(), &server.uri(), &server.uri());

    let access = fresh_jwt();
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(
            json!({"identifier": "ana@example.com", "password": "secret"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_body(&access, "refresh-1")))
        .expect(1)
        .mount(&server)
        .await;

    let home = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        vortex(&home)
            .args(["login", "ana@example.com", "-p", "secret"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Signed in as ana"));

        let stored = std::fs::read_to_string(home.join("session.json")).unwrap();
        assert!(stored.contains("refresh-1"));

        // No network needed while the access token is still fresh
        vortex(&home)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Signed in as ana"))
            .stdout(predicate::str::contains("Roles: USER"));
    })
    .await
    .unwrap();
}

/// Test: bad credentials surface the server's message.
#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    let temp = tempdir().unwrap();
    write_config(temp.path(), &server.uri(), &server.uri());

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials",
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let home = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        vortex(&home)
            .args(["login", "ana@example.com", "-p", "wrong"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid credentials"));

        assert!(!home.join("session.json").exists());
    })
    .await
    .unwrap();
}

/// Test: protected commands refuse to run without a session and point at
/// the sign-in page.
#[test]
fn test_guarded_command_requires_session() {
    let temp = tempdir().unwrap();

    vortex(temp.path())
        .args(["products", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"))
        .stderr(predicate::str::contains("http://localhost:3001/login"));

    // The attempted destination was recorded for the return trip
    let return_url = std::fs::read_to_string(temp.path().join("return_url")).unwrap();
    assert_eq!(return_url, "http://localhost:8080/products");
}

/// Test: a stored session lets protected commands through.
#[tokio::test(flavor = "multi_thread")]
async fn test_products_list_with_session() {
    let server = MockServer::start().await;
    let temp = tempdir().unwrap();
    write_config(temp.path(), &server.uri(), &server.uri());
    seed_session(temp.path(), &fresh_jwt(), "refresh-1");

    Mock::given(method("GET"))
        .and(path("/api/produtos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "descricao": "Notebook",
            "valorFornecedor": 3500.0,
            "quantidadeEmEstoque": 12,
            "tipoProdutoId": 2
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let home = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        vortex(&home)
            .args(["products", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Notebook"));
    })
    .await
    .unwrap();
}

/// Test: an expired access token is refreshed transparently and the new
/// token is persisted.
#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_refreshed_before_request() {
    let server = MockServer::start().await;
    let temp = tempdir().unwrap();
    write_config(temp.path(), &server.uri(), &server.uri());
    seed_session(temp.path(), &expired_jwt(), "refresh-1");

    let new_access = fresh_jwt();
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_partial_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(grant_body(&new_access, "refresh-2")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tipos-produto"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "nome": "Eletrônico"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        vortex(&home)
            .args(["product-types", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Eletrônico"));

        let stored = std::fs::read_to_string(home.join("session.json")).unwrap();
        assert!(stored.contains(&new_access));
        assert!(stored.contains("refresh-2"));
    })
    .await
    .unwrap();
}

/// Test: a rejected refresh clears the session and the command fails with
/// the sign-in pointer.
#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_refresh_signs_out() {
    let server = MockServer::start().await;
    let temp = tempdir().unwrap();
    write_config(temp.path(), &server.uri(), &server.uri());
    seed_session(temp.path(), &expired_jwt(), "refresh-dead");

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Refresh token revoked",
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        vortex(&home)
            .args(["products", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not signed in"));

        assert!(!home.join("session.json").exists());
    })
    .await
    .unwrap();
}

/// Test: logout invalidates server-side and removes the stored session.
#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    let temp = tempdir().unwrap();
    write_config(temp.path(), &server.uri(), &server.uri());
    seed_session(temp.path(), &fresh_jwt(), "refresh-1");

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(body_partial_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "logged out",
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        vortex(&home)
            .arg("logout")
            .assert()
            .success()
            .stdout(predicate::str::contains("Signed out"));

        assert!(!home.join("session.json").exists());
    })
    .await
    .unwrap();
}

/// Test: a session exported from one home can be imported into another
/// through the handoff URL, which comes back cleaned.
#[test]
fn test_handoff_export_import() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    seed_session(source.path(), &fresh_jwt(), "refresh-1");

    let output = vortex(source.path())
        .args(["handoff", "export", "http://localhost:8080/products?page=2"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let url = String::from_utf8(output).unwrap().trim().to_string();
    assert!(url.contains("authData="));

    vortex(dest.path())
        .args(["handoff", "import", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as ana"))
        .stdout(predicate::str::contains(
            "Continue at http://localhost:8080/products?page=2",
        ));

    assert!(dest.path().join("session.json").exists());

    // A URL without a payload is rejected
    vortex(dest.path())
        .args(["handoff", "import", "http://localhost:8080/products"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no session payload"));
}

/// Test: export without a stored session fails with guidance.
#[test]
fn test_handoff_export_requires_session() {
    let temp = tempdir().unwrap();

    vortex(temp.path())
        .args(["handoff", "export", "http://localhost:8080/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sign in first"));
}
