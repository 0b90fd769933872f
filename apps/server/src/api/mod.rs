//! HTTP routing.
//!
//! Each resource module exposes `router() -> Router<Arc<AppState>>`;
//! `app_router` nests them under `/api` and applies the shared tower layers.
//! Authentication is enforced per-handler by the `AuthUser` extractor, not
//! by router-level middleware, so the principal is always an explicit
//! argument.

pub mod auth;
pub mod charges;
pub mod goals;
pub mod health;
pub mod insights;
pub mod jars;
pub mod onboarding;
pub mod transactions;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::main_lib::AppState;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let mut auth_routes = auth::router();
    if let Some(limit) = &config.auth_rate_limit {
        let governor = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .per_second(limit.per_second)
                .burst_size(limit.burst)
                .finish()
                .expect("valid rate-limit configuration"),
        );
        auth_routes = auth_routes.layer(GovernorLayer::new(governor));
    }

    let api = Router::new()
        .merge(auth_routes)
        .merge(users::router())
        .merge(transactions::router())
        .merge(goals::router())
        .merge(jars::router())
        .merge(charges::router())
        .merge(onboarding::router())
        .merge(insights::router())
        .merge(health::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}
