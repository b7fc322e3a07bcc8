//! HTTP transport adapter
//!
//! Thin mapping between the JSON API and ledger operations: requests
//! carry money as decimal strings, responses format balances to exactly
//! two decimal places, and every ledger error becomes a structured
//! `{"error": {code, message, type}}` body. No ledger logic lives here.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::types::{format_amount, AccountId};

/// Build the API router
pub fn router(ledger: Arc<Ledger>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/accounts", post(create_account))
        .route("/api/v1/balance", post(query_balance))
        .route("/api/v1/transfers", post(transfer))
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    id: String,
    credential: String,
    initial_balance: Decimal,
}

#[derive(Debug, Deserialize)]
struct BalanceRequest {
    id: String,
    credential: String,
}

#[derive(Debug, Deserialize)]
struct TransferRequest {
    sender_id: String,
    receiver_id: String,
    amount: Decimal,
    credential: String,
}

#[derive(Debug, Serialize)]
struct AccountResponse {
    id: String,
    balance: String,
}

#[derive(Debug, Serialize)]
struct TransferResponse {
    sender_id: String,
    receiver_id: String,
    amount: String,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn create_account(
    State(ledger): State<Arc<Ledger>>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), LedgerError> {
    let id = AccountId::new(request.id);
    ledger.create_account(id.clone(), &request.credential, request.initial_balance)?;
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            id: id.to_string(),
            balance: format_amount(request.initial_balance),
        }),
    ))
}

async fn query_balance(
    State(ledger): State<Arc<Ledger>>,
    Json(request): Json<BalanceRequest>,
) -> Result<Json<AccountResponse>, LedgerError> {
    let id = AccountId::new(request.id);
    let balance = ledger.query_balance(&id, &request.credential)?;
    Ok(Json(AccountResponse {
        id: id.to_string(),
        balance: format_amount(balance),
    }))
}

async fn transfer(
    State(ledger): State<Arc<Ledger>>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, LedgerError> {
    let sender_id = AccountId::new(request.sender_id);
    let receiver_id = AccountId::new(request.receiver_id);
    ledger.transfer(&sender_id, &receiver_id, request.amount, &request.credential)?;
    Ok(Json(TransferResponse {
        sender_id: sender_id.to_string(),
        receiver_id: receiver_id.to_string(),
        amount: format_amount(request.amount),
    }))
}

fn status_code(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::NotFound(_)
        | LedgerError::SenderNotFound(_)
        | LedgerError::ReceiverNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::AlreadyExists(_) => StatusCode::CONFLICT,
        LedgerError::Unauthorized => StatusCode::UNAUTHORIZED,
        LedgerError::InvalidAccountId(_)
        | LedgerError::InvalidAmount(_)
        | LedgerError::InvalidBalance(_)
        | LedgerError::InvalidCredential(_)
        | LedgerError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
        LedgerError::BalanceOverflow
        | LedgerError::TransferFailed { .. }
        | LedgerError::MalformedRecord { .. }
        | LedgerError::StorageUnavailable(_)
        | LedgerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let body = Json(serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
                "type": self.category(),
            }
        }));
        (status, body).into_response()
    }
}
