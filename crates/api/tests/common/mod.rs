//! Shared harness for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use carelink_api::auth::jwt::{generate_access_token, JwtConfig};
use carelink_api::config::ServerConfig;
use carelink_api::router::build_app_router;
use carelink_api::state::AppState;
use carelink_db::models::ledger::{balance_kinds, reference_types};
use carelink_db::models::user::{CreateUser, User};
use carelink_db::models::wallet::wallet_types;
use carelink_db::repositories::{LedgerRepo, UserRepo, WalletRepo};
use carelink_events::EventBus;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// Uses the production [`build_app_router`] so tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// as the real binary.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

/// Bearer token for `user`, signed with the test secret.
pub fn bearer_for(user: &User) -> String {
    let token = generate_access_token(user.id, &user.role, &user.trust_level, &test_config().jwt)
        .expect("token generation");
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("build request");
    app.oneshot(request).await.expect("send request")
}

pub async fn get_auth(app: Router, path: &str, bearer: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("authorization", bearer)
        .body(Body::empty())
        .expect("build request");
    app.oneshot(request).await.expect("send request")
}

pub async fn post_json(
    app: Router,
    path: &str,
    bearer: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("authorization", bearer)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");
    app.oneshot(request).await.expect("send request")
}

/// POST with no body (transition endpoints accept an empty body).
pub async fn post_auth(app: Router, path: &str, bearer: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("authorization", bearer)
        .body(Body::empty())
        .expect("build request");
    app.oneshot(request).await.expect("send request")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("valid JSON body")
}

// ---------------------------------------------------------------------------
// Database fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            role: role.to_string(),
            display_name: Some("Test User".into()),
            bio: Some("Experienced test fixture".into()),
            experience_years: Some(3),
        },
    )
    .await
    .expect("create user")
}

/// A hirer with a funded wallet.
pub async fn create_funded_hirer(pool: &PgPool, email: &str, funds: i64) -> User {
    let user = create_user(pool, email, "hirer").await;
    let wallet = WalletRepo::create_for_user(pool, user.id, wallet_types::HIRER)
        .await
        .expect("create hirer wallet");
    if funds > 0 {
        let mut tx = pool.begin().await.expect("begin");
        let applied = WalletRepo::adjust_available(tx.as_mut(), wallet.id, funds)
            .await
            .expect("adjust");
        assert!(applied);
        LedgerRepo::append(
            tx.as_mut(),
            wallet.id,
            funds,
            balance_kinds::AVAILABLE,
            reference_types::DEPOSIT,
            None,
            Some("test deposit"),
        )
        .await
        .expect("ledger append");
        tx.commit().await.expect("commit");
    }
    user
}

/// A phone-verified caregiver at trust level L1, with an empty wallet.
pub async fn create_caregiver(pool: &PgPool, email: &str) -> User {
    let user = create_user(pool, email, "caregiver").await;
    sqlx::query("UPDATE users SET phone_verified_at = NOW(), trust_level = 'L1' WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await
        .expect("verify caregiver");
    WalletRepo::create_for_user(pool, user.id, wallet_types::CAREGIVER)
        .await
        .expect("create caregiver wallet");
    UserRepo::find_by_id(pool, user.id)
        .await
        .expect("refetch caregiver")
        .expect("caregiver exists")
}

pub async fn create_admin(pool: &PgPool, email: &str) -> User {
    create_user(pool, email, "admin").await
}

/// JSON body for `POST /api/v1/jobs`: a 2-hour job starting 24h out.
pub fn job_body(total_cents: i64, fee_cents: i64) -> serde_json::Value {
    let start = chrono::Utc::now() + chrono::Duration::hours(24);
    let end = start + chrono::Duration::hours(2);
    serde_json::json!({
        "scheduled_start_at": start.to_rfc3339(),
        "scheduled_end_at": end.to_rfc3339(),
        "hourly_rate_cents": total_cents / 2,
        "total_amount_cents": total_cents,
        "platform_fee_cents": fee_cents,
    })
}
