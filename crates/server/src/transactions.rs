//! Transactions API endpoints

use api_types::transaction::{OperationType as ApiOperation, TransactionNew, TransactionView};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use rust_decimal::Decimal;

use crate::{ServerError, server::ServerState};

fn map_operation(operation: ApiOperation) -> engine::OperationType {
    match operation {
        ApiOperation::NormalPurchase => engine::OperationType::NormalPurchase,
        ApiOperation::InstallmentPurchase => engine::OperationType::InstallmentPurchase,
        ApiOperation::Withdrawal => engine::OperationType::Withdrawal,
        ApiOperation::CreditVoucher => engine::OperationType::CreditVoucher,
    }
}

fn map_operation_back(operation: engine::OperationType) -> ApiOperation {
    match operation {
        engine::OperationType::NormalPurchase => ApiOperation::NormalPurchase,
        engine::OperationType::InstallmentPurchase => ApiOperation::InstallmentPurchase,
        engine::OperationType::Withdrawal => ApiOperation::Withdrawal,
        engine::OperationType::CreditVoucher => ApiOperation::CreditVoucher,
    }
}

pub(crate) fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        operation_type: map_operation_back(tx.operation),
        amount: engine::from_minor_units(tx.amount),
        idempotency_key: tx.idempotency_key,
        created_at: tx.created_at,
    }
}

pub async fn transaction_new(
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Json(payload) = payload?;

    if payload.amount <= Decimal::ZERO {
        return Err(ServerError::Generic(
            "amount must be greater than 0".to_string(),
        ));
    }

    let mut cmd = engine::PostTransactionCmd::new(
        payload.account_id,
        map_operation(payload.operation_type),
        payload.amount,
    );
    if let Some(key) = payload.idempotency_key {
        cmd = cmd.idempotency_key(key);
    }

    let tx = state.engine.post_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}
