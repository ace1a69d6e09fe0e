pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /jobs                             create (POST), list own (GET)
/// /jobs/feed                        posted jobs for caregivers (GET)
/// /jobs/{id}                        get (GET)
/// /jobs/{id}/publish                draft -> posted (POST)
/// /jobs/{id}/accept                 posted -> assigned (POST)
/// /jobs/{id}/check-in               assigned -> in_progress (POST)
/// /jobs/{id}/check-out              in_progress -> completed (POST)
/// /jobs/{id}/cancel                 -> cancelled (POST)
///
/// /wallet                           own balances (GET)
/// /wallet/ledger                    own ledger entries (GET)
///
/// /admin/jobs/{id}/expire           posted -> expired (POST, admin)
/// /admin/trust/run                  full trust sweep (POST, admin)
/// /admin/trust/users/{id}           recompute one user (POST, admin)
/// /admin/trust/users/{id}/history   score history (GET, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // --- Jobs ---
        .route(
            "/jobs",
            post(handlers::jobs::create_job).get(handlers::jobs::list_jobs),
        )
        .route("/jobs/feed", get(handlers::jobs::list_feed))
        .route("/jobs/{id}", get(handlers::jobs::get_job))
        .route("/jobs/{id}/publish", post(handlers::jobs::publish_job))
        .route("/jobs/{id}/accept", post(handlers::jobs::accept_job))
        .route("/jobs/{id}/check-in", post(handlers::jobs::check_in))
        .route("/jobs/{id}/check-out", post(handlers::jobs::check_out))
        .route("/jobs/{id}/cancel", post(handlers::jobs::cancel_job))
        // --- Wallet ---
        .route("/wallet", get(handlers::wallets::get_wallet))
        .route("/wallet/ledger", get(handlers::wallets::get_ledger))
        // --- Admin ---
        .route("/admin/jobs/{id}/expire", post(handlers::jobs::expire_job))
        .route("/admin/trust/run", post(handlers::trust::run_sweep))
        .route(
            "/admin/trust/users/{id}",
            post(handlers::trust::update_user),
        )
        .route(
            "/admin/trust/users/{id}/history",
            get(handlers::trust::user_history),
        )
}
