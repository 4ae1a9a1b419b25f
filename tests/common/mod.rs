#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use once_cell::sync::Lazy;
use orca::{build_router, models::user::Role, test_utils::test_helpers, AppState};
use regex::Regex;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

static CSRF_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="csrf_token" value="([^"]+)""#).unwrap());

/// Router over a fresh in-memory database with an in-memory session store.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let pool = test_helpers::create_test_db().await.unwrap();
        let state = AppState::new(pool.clone());
        let router = build_router(state.clone())
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false));

        Self {
            router,
            pool,
            state,
        }
    }

    /// A browser with its own cookie jar.
    pub fn client(&self) -> Client {
        Client::new(self.router.clone())
    }

    pub async fn user(&self, name: &str, email: &str, password: &str, role: Role) -> i64 {
        test_helpers::insert_test_user(&self.pool, name, email, password, role, true)
            .await
            .unwrap()
    }

    pub async fn is_active(&self, user_id: i64) -> bool {
        sqlx::query_scalar::<_, bool>("SELECT active FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
        }
    }

    /// The same cookie jar pointed at another router.
    pub fn against(&self, router: Router) -> Self {
        Self {
            router,
            cookie: self.cookie.clone(),
        }
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let cookie = tower_sessions::cookie::Cookie::parse(raw.to_string()).unwrap();
            if cookie.max_age() == Some(time::Duration::ZERO) || cookie.value().is_empty() {
                self.cookie = None;
            } else {
                self.cookie = Some(format!("{}={}", cookie.name(), cookie.value()));
            }
        }

        response
    }

    pub async fn get(&mut self, path: &str) -> Response<Body> {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Loads `page` and returns the form token it carries.
    pub async fn csrf_token(&mut self, page: &str) -> String {
        let response = self.get(page).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {page}");
        let html = body_text(response).await;
        CSRF_FIELD
            .captures(&html)
            .map(|c| c[1].to_string())
            .expect("page carries a csrf token")
    }

    /// Submits a form found on `page` with a fresh token.
    pub async fn submit(
        &mut self,
        page: &str,
        action: &str,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        let token = self.csrf_token(page).await;
        let mut all = fields.to_vec();
        all.push(("csrf_token", token.as_str()));
        self.post_form(action, &all).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Response<Body> {
        self.submit("/login", "/login", &[("email", email), ("senha", password)])
            .await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
