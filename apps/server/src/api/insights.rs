use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use moneta_core::insights::Insight;

async fn get_insights(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Insight>>> {
    let now = Utc::now().naive_utc();
    let insights = state.insight_service.get_insights(&user.email, now).await?;
    Ok(Json(insights))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/insights/all", get(get_insights))
}
