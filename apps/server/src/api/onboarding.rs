use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::OnboardingResponse;
use moneta_core::onboarding::OnboardingSubmission;

async fn submit(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<OnboardingSubmission>,
) -> ApiResult<Json<OnboardingResponse>> {
    let now = Utc::now().naive_utc();
    let profile = state
        .onboarding_service
        .submit(&user.email, body, now)
        .await?;
    Ok(Json(OnboardingResponse {
        message: "Onboarding completed successfully!".to_string(),
        user: profile,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/onboarding/submit", post(submit))
}
