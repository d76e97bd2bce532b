//! Accounts API endpoints

use api_types::account::{AccountCreated, AccountNew, AccountView, BalanceView};
use api_types::transaction::TransactionListResponse;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, transactions::transaction_view};

pub(crate) fn parse_account_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| ServerError::Generic(format!("invalid account id: {raw}")))
}

pub async fn account_new(
    State(state): State<ServerState>,
    payload: Result<Json<AccountNew>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountCreated>), ServerError> {
    let Json(payload) = payload?;
    let account = state.engine.open_account(&payload.document_number).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountCreated {
            account_id: account.id,
            document_number: account.document,
            created_at: account.created_at,
        }),
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountView>, ServerError> {
    let account_id = parse_account_id(&account_id)?;
    let account = state.engine.account(account_id).await?;

    Ok(Json(AccountView {
        account_id: account.id,
        document_number: account.document,
    }))
}

pub async fn balance(
    State(state): State<ServerState>,
    Path(account_id): Path<String>,
) -> Result<Json<BalanceView>, ServerError> {
    let account_id = parse_account_id(&account_id)?;
    let balance = state.engine.balance(account_id).await?;

    Ok(Json(BalanceView {
        account_id: balance.account_id,
        balance: engine::from_minor_units(balance.balance),
    }))
}

pub async fn transactions(
    State(state): State<ServerState>,
    Path(account_id): Path<String>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let account_id = parse_account_id(&account_id)?;
    // Distinguish "no such account" from "no postings yet".
    state.engine.account(account_id).await?;
    let transactions = state
        .engine
        .transactions_for_account(account_id)
        .await?
        .into_iter()
        .map(transaction_view)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}
