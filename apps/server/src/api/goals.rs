use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::{AmountRequest, MessageResponse};
use moneta_core::goals::{Goal, GoalUpdate, NewGoal};

async fn create_goal(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let goal = state.goal_service.create(&user.email, body).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn list_goals(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.list(&user.email).await?;
    Ok(Json(goals))
}

async fn get_goal(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Goal>> {
    let goal = state.goal_service.get(&user.email, &id).await?;
    Ok(Json(goal))
}

async fn update_goal(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<GoalUpdate>,
) -> ApiResult<Json<Goal>> {
    let goal = state.goal_service.update(&user.email, &id, update).await?;
    Ok(Json(goal))
}

async fn contribute(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AmountRequest>,
) -> ApiResult<Json<Goal>> {
    let goal = state
        .goal_service
        .contribute(&user.email, &id, body.amount)
        .await?;
    Ok(Json(goal))
}

async fn delete_goal(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state.goal_service.delete(&user.email, &id).await?;
    Ok(Json(MessageResponse::new("Goal deleted successfully.")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/{id}/contribute", post(contribute))
}
