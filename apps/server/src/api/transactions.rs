use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::{MessageResponse, SummaryQuery, TransactionListQuery};
use moneta_core::constants::DEFAULT_PAGE_SIZE;
use moneta_core::transactions::{
    NewTransaction, SpendingPoint, Transaction, TransactionPage, TransactionSummary,
    TransactionUpdate,
};

async fn create_transaction(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let created = state
        .transaction_service
        .create(&user.email, body)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_transactions(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransactionListQuery>,
) -> ApiResult<Json<TransactionPage>> {
    let page = state
        .transaction_service
        .list(
            &user.email,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            query.type_filter,
            query.month,
            query.year,
        )
        .await?;
    Ok(Json(page))
}

async fn transaction_summary(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<TransactionSummary>> {
    let now = Utc::now().naive_utc();
    let summary = state
        .transaction_service
        .summary(&user.email, query.month, query.year, now)
        .await?;
    Ok(Json(summary))
}

async fn spending_trend(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SpendingPoint>>> {
    let now = Utc::now().naive_utc();
    let trend = state.transaction_service.spending_trend(&user.email, now)?;
    Ok(Json(trend))
}

async fn get_transaction(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Transaction>> {
    let transaction = state.transaction_service.get(&user.email, &id)?;
    Ok(Json(transaction))
}

async fn update_transaction(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    let updated = state
        .transaction_service
        .update(&user.email, &id, update)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state.transaction_service.delete(&user.email, &id).await?;
    Ok(Json(MessageResponse::new(
        "Transaction deleted successfully.",
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/summary", get(transaction_summary))
        .route("/transactions/spending-trend", get(spending_trend))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
