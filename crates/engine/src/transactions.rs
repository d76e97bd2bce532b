//! Transaction primitives.
//!
//! A `Transaction` is the immutable record of one accepted posting. Its
//! amount is already signed: debits are stored negative.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, OperationType, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub operation: OperationType,
    /// Signed amount in cents.
    pub amount: MoneyCents,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn new(
        account_id: Uuid,
        operation: OperationType,
        amount: MoneyCents,
        idempotency_key: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            operation,
            amount,
            idempotency_key,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub operation_type: String,
    pub amount_minor: i64,
    #[sea_orm(unique)]
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            operation_type: ActiveValue::Set(tx.operation.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            idempotency_key: ActiveValue::Set(tx.idempotency_key.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            account_id: parse_uuid(&model.account_id, "account")?,
            operation: OperationType::try_from(model.operation_type.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            idempotency_key: model.idempotency_key,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(operation_type: &str) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4().to_string(),
            account_id: Uuid::new_v4().to_string(),
            operation_type: operation_type.to_string(),
            amount_minor: -5000,
            idempotency_key: Some("K".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn decodes_stored_row() {
        let tx = Transaction::try_from(model("normal_purchase")).unwrap();
        assert_eq!(tx.operation, OperationType::NormalPurchase);
        assert_eq!(tx.amount.cents(), -5000);
        assert_eq!(tx.idempotency_key.as_deref(), Some("K"));
    }

    #[test]
    fn unknown_operation_in_storage_is_unsupported() {
        let err = Transaction::try_from(model("chargeback")).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnsupportedOperation("chargeback".to_string())
        );
    }
}
