use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::{ChargeListQuery, MessageResponse};
use moneta_core::charges::{ChargeUpdate, NewCharge, UpcomingCharge};

async fn create_charge(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCharge>,
) -> ApiResult<(StatusCode, Json<UpcomingCharge>)> {
    let charge = state.charge_service.create(&user.email, body).await?;
    Ok((StatusCode::CREATED, Json(charge)))
}

async fn list_charges(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChargeListQuery>,
) -> ApiResult<Json<Vec<UpcomingCharge>>> {
    let now = Utc::now().naive_utc();
    let charges = state
        .charge_service
        .list(&user.email, query.status, now)
        .await?;
    Ok(Json(charges))
}

async fn list_dues(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UpcomingCharge>>> {
    let now = Utc::now().naive_utc();
    let dues = state.charge_service.dues(&user.email, now).await?;
    Ok(Json(dues))
}

async fn update_charge(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<ChargeUpdate>,
) -> ApiResult<Json<UpcomingCharge>> {
    let charge = state
        .charge_service
        .update(&user.email, &id, update)
        .await?;
    Ok(Json(charge))
}

async fn mark_paid(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UpcomingCharge>> {
    let now = Utc::now().naive_utc();
    let charge = state.charge_service.mark_paid(&user.email, &id, now).await?;
    Ok(Json(charge))
}

async fn mark_not_paid(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UpcomingCharge>> {
    let now = Utc::now().naive_utc();
    let charge = state
        .charge_service
        .mark_not_paid(&user.email, &id, now)
        .await?;
    Ok(Json(charge))
}

async fn delete_charge(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state.charge_service.delete(&user.email, &id).await?;
    Ok(Json(MessageResponse::new("Charge deleted successfully.")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/charges", get(list_charges).post(create_charge))
        .route("/charges/dues", get(list_dues))
        .route("/charges/{id}", put(update_charge).delete(delete_charge))
        .route("/charges/{id}/mark-paid", patch(mark_paid))
        .route("/charges/{id}/mark-not-paid", patch(mark_not_paid))
}
