use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use moneta_core::users::{
    NewIncomeSource, NewRecurringExpense, ProfileUpdate, UserProfile,
};

async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UserProfile>> {
    // Profile access is the trigger point for the lazy monthly sync.
    let now = Utc::now().naive_utc();
    state.recurring_service.ensure_synced(&user.email, now).await?;

    let profile = state.user_service.get_profile(&user.email).await?;
    Ok(Json(profile))
}

async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state.user_service.update_profile(&user.email, update).await?;
    Ok(Json(profile))
}

async fn add_income_source(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(source): Json<NewIncomeSource>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state
        .user_service
        .add_income_source(&user.email, source)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_income_source(
    user: AuthUser,
    Path(source_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(source): Json<NewIncomeSource>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .user_service
        .update_income_source(&user.email, &source_id, source)
        .await?;
    Ok(Json(profile))
}

async fn delete_income_source(
    user: AuthUser,
    Path(source_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .user_service
        .delete_income_source(&user.email, &source_id)
        .await?;
    Ok(Json(profile))
}

async fn add_recurring_expense(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(expense): Json<NewRecurringExpense>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state
        .user_service
        .add_recurring_expense(&user.email, expense)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_recurring_expense(
    user: AuthUser,
    Path(expense_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(expense): Json<NewRecurringExpense>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .user_service
        .update_recurring_expense(&user.email, &expense_id, expense)
        .await?;
    Ok(Json(profile))
}

async fn delete_recurring_expense(
    user: AuthUser,
    Path(expense_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .user_service
        .delete_recurring_expense(&user.email, &expense_id)
        .await?;
    Ok(Json(profile))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/profile", get(get_profile).put(update_profile))
        .route("/users/profile/income-sources", post(add_income_source))
        .route(
            "/users/profile/income-sources/{id}",
            put(update_income_source).delete(delete_income_source),
        )
        .route(
            "/users/profile/recurring-expenses",
            post(add_recurring_expense),
        )
        .route(
            "/users/profile/recurring-expenses/{id}",
            put(update_recurring_expense).delete(delete_recurring_expense),
        )
}
