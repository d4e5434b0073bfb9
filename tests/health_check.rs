use std::net::TcpListener;
use std::sync::Arc;

use async_trait::async_trait;
use authsvc::configuration::{ApplicationSettings, JwtSettings, TokenDef};
use authsvc::email_client::Mailer;
use authsvc::error::EmailError;
use authsvc::session_store::InMemorySessionStore;
use authsvc::startup::{run, AppState};
use authsvc::user_store::InMemoryAuthStore;

struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_content: &str,
    ) -> Result<(), EmailError> {
        Ok(())
    }
}

fn jwt_settings() -> JwtSettings {
    JwtSettings {
        access: TokenDef {
            secret: "access-secret-at-least-32-characters-long".to_string(),
            expiry_seconds: 900,
        },
        refresh: TokenDef {
            secret: "refresh-secret-at-least-32-characters-long".to_string(),
            expiry_seconds: 604800,
        },
    }
}

async fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let users = Arc::new(InMemoryAuthStore::new());
    let state = AppState::new(
        users.clone(),
        users.clone(),
        users,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(NoopMailer),
        jwt_settings(),
        ApplicationSettings {
            name: "authsvc".to_string(),
            host: "127.0.0.1".to_string(),
            port,
        },
    );

    let server = run(listener, state).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    address
}

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/health_check", &address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn home_page_renders_service_information() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/", &address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("authsvc"));
}
