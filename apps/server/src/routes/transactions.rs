//! Transaction handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taller_core::{NewTransaction, Transaction, TransactionWithItems};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_transactions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TransactionWithItems>>> {
    let history = state.db.transactions().list_with_items().await?;
    Ok(Json(history))
}

/// Responds with the created header; items are visible through the list endpoint.
pub async fn create_transaction(
    State(state): State<AppState>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(request) = body?;
    let created = state.engine.create_transaction(&request).await?;
    Ok((StatusCode::CREATED, Json(created.transaction)))
}
