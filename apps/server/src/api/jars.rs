use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::{AmountRequest, MessageResponse};
use moneta_core::jars::{Jar, JarUpdate, NewJar};

async fn create_jar(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewJar>,
) -> ApiResult<(StatusCode, Json<Jar>)> {
    let jar = state.jar_service.create(&user.email, body).await?;
    Ok((StatusCode::CREATED, Json(jar)))
}

async fn list_jars(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Jar>>> {
    let jars = state.jar_service.list(&user.email).await?;
    Ok(Json(jars))
}

async fn update_jar(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<JarUpdate>,
) -> ApiResult<Json<Jar>> {
    let jar = state.jar_service.update(&user.email, &id, update).await?;
    Ok(Json(jar))
}

async fn deposit(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AmountRequest>,
) -> ApiResult<Json<Jar>> {
    let jar = state
        .jar_service
        .deposit(&user.email, &id, body.amount)
        .await?;
    Ok(Json(jar))
}

async fn withdraw(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AmountRequest>,
) -> ApiResult<Json<Jar>> {
    let jar = state
        .jar_service
        .withdraw(&user.email, &id, body.amount)
        .await?;
    Ok(Json(jar))
}

async fn delete_jar(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state.jar_service.delete(&user.email, &id).await?;
    Ok(Json(MessageResponse::new("Jar deleted successfully.")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jars", get(list_jars).post(create_jar))
        .route("/jars/{id}", put(update_jar).delete(delete_jar))
        .route("/jars/{id}/deposit", post(deposit))
        .route("/jars/{id}/withdraw", post(withdraw))
}
