mod common;

use std::env;

use axum::http::{header, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{location, Client};
use orca::{
    build_router,
    config::{session::session_layer, AppConfig, ConfigError, Environment, DEFAULT_DATABASE_URL},
    models::user::Role,
    test_utils::test_helpers,
    AppState,
};
use serial_test::serial;
use tower_sessions::{
    cookie::{Cookie, SameSite},
    MemoryStore,
};

const KEYS: [&str; 8] = [
    "ENVIRONMENT",
    "FORCE_HTTPS",
    "SECRET_KEY",
    "DATABASE_URL",
    "HOST",
    "PORT",
    "ADMIN_EMAIL",
    "ADMIN_PASSWORD",
];

/// Clears every variable `AppConfig` reads, applies `vars`, and restores the
/// previous process environment on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn apply(vars: &[(&'static str, &str)]) -> Self {
        let saved = KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        EnvGuard { saved }
    }

    fn production(secret: &str) -> Self {
        Self::apply(&[
            ("ENVIRONMENT", "production"),
            ("FORCE_HTTPS", "true"),
            ("SECRET_KEY", secret),
        ])
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

fn strong_secret(byte: u8) -> String {
    STANDARD.encode([byte; 64])
}

fn session_cookie(response: &axum::response::Response) -> Cookie<'static> {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie issued")
        .to_str()
        .unwrap()
        .to_string();
    Cookie::parse(raw).unwrap()
}

#[test]
#[serial]
fn development_defaults() {
    let _env = EnvGuard::apply(&[]);

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
    assert!(config.secret_key.is_none());
    assert!(config.admin_seed.is_none());
}

#[test]
#[serial]
fn invalid_port_is_rejected() {
    let _env = EnvGuard::apply(&[("PORT", "oitenta")]);

    let result = AppConfig::from_env();
    assert!(matches!(result, Err(ConfigError::InvalidPort(p)) if p == "oitenta"));
}

#[test]
#[serial]
fn production_without_https_is_rejected() {
    let secret = strong_secret(42);
    let _env = EnvGuard::apply(&[
        ("ENVIRONMENT", "production"),
        ("SECRET_KEY", secret.as_str()),
    ]);

    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::HttpsRequired)
    ));
}

#[test]
#[serial]
fn production_without_secret_is_rejected() {
    let _env = EnvGuard::apply(&[("ENVIRONMENT", "production"), ("FORCE_HTTPS", "true")]);

    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::MissingSecretKey)
    ));
}

#[test]
#[serial]
fn production_rejects_weak_secrets() {
    {
        let _env = EnvGuard::production("curta-demais");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::ShortSecretKey(12))
        ));
    }

    let placeholder = format!("chave-secreta-{}", "x".repeat(64));
    let _env = EnvGuard::production(&placeholder);
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::PlaceholderSecretKey)
    ));
}

#[tokio::test]
#[serial]
async fn production_login_page_issues_hardened_cookie() {
    let secret = strong_secret(42);
    let _env = EnvGuard::production(&secret);
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Production);

    let pool = test_helpers::create_test_db().await.unwrap();
    let router = build_router(AppState::new(pool))
        .layer(session_layer(MemoryStore::default(), &config));

    let response = Client::new(router).get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response);
    assert_eq!(cookie.name(), "__Host-session");
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.path(), Some("/"));
}

#[tokio::test]
#[serial]
async fn development_login_page_issues_lax_cookie() {
    let _env = EnvGuard::apply(&[]);
    let config = AppConfig::from_env().unwrap();

    let pool = test_helpers::create_test_db().await.unwrap();
    let router = build_router(AppState::new(pool))
        .layer(session_layer(MemoryStore::default(), &config));

    let response = Client::new(router).get("/login").await;
    let cookie = session_cookie(&response);
    assert_eq!(cookie.name(), "session");
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_ne!(cookie.secure(), Some(true));
}

#[tokio::test]
#[serial]
async fn login_survives_restart_only_with_the_same_secret() {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::insert_test_user(&pool, "Ana", "ana@example.com", "pw", Role::Viewer, true)
        .await
        .unwrap();
    let state = AppState::new(pool);
    let store = MemoryStore::default();

    let secret = strong_secret(1);
    let config = {
        let _env = EnvGuard::apply(&[("SECRET_KEY", secret.as_str())]);
        AppConfig::from_env().unwrap()
    };
    let other_config = {
        let other = strong_secret(2);
        let _env = EnvGuard::apply(&[("SECRET_KEY", other.as_str())]);
        AppConfig::from_env().unwrap()
    };

    let first_process = build_router(state.clone()).layer(session_layer(store.clone(), &config));
    let restarted = build_router(state.clone()).layer(session_layer(store.clone(), &config));
    let rekeyed = build_router(state).layer(session_layer(store, &other_config));

    let mut browser = Client::new(first_process);
    let response = browser.login("ana@example.com", "pw").await;
    assert_eq!(location(&response).as_deref(), Some("/"));

    let response = browser.against(restarted).get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = browser.against(rekeyed).get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}
