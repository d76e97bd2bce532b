use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, SqlErr, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, transactions};

use super::Engine;

pub(super) fn duplicate_key(key: &str) -> EngineError {
    EngineError::Conflict(format!(
        "transaction already created with idempotency key \"{key}\""
    ))
}

impl Engine {
    /// Looks up the transaction carrying `key`, if any.
    ///
    /// Callers must not pass blank keys: a blank key means no idempotency was
    /// requested and is never stored.
    pub async fn transaction_by_idempotency_key(
        &self,
        key: &str,
    ) -> ResultEngine<Option<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::IdempotencyKey.eq(key.to_string()))
            .one(&self.database)
            .await?
            .map(Transaction::try_from)
            .transpose()
    }

    /// All transactions of an account, oldest first.
    pub async fn transactions_for_account(&self, account_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.to_string()))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Appends `tx` to the log.
    ///
    /// The unique index on the idempotency key is the last line of defence
    /// against two concurrent postings with the same key: losing that race
    /// surfaces as [`EngineError::Conflict`], like a pre-check hit.
    pub(crate) async fn insert_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        if let Err(err) = transactions::ActiveModel::from(tx).insert(db_tx).await {
            if let Some(key) = tx.idempotency_key.as_deref()
                && matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            {
                return Err(duplicate_key(key));
            }
            return Err(err.into());
        }
        Ok(())
    }
}
