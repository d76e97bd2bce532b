//! The posting path: apply one signed operation to an account balance.

use rust_decimal::Decimal;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::{
    EngineError, OperationType, PostTransactionCmd, ResultEngine, Transaction, apply_sign,
    to_minor_units, util::normalize_optional_text,
};

use super::{Engine, transactions::duplicate_key, with_tx};

impl Engine {
    /// Posts a monetary operation against an account and returns the stored
    /// transaction.
    ///
    /// Protocol:
    /// 1. a non-blank idempotency key that is already in the log fails with
    ///    [`EngineError::Conflict`];
    /// 2. an unknown account fails with [`EngineError::KeyNotFound`];
    /// 3. inside one DB transaction: lock the balance row, convert the amount
    ///    to signed cents, check funds for debits, insert the transaction and
    ///    write the new balance.
    ///
    /// Step 3 commits as a whole or not at all. Dropping the returned future
    /// drops the open DB transaction, which rolls it back and releases the
    /// balance lock.
    ///
    /// The funds check compares the unsigned amount of a debit with the
    /// balance before the posting; credits are never checked.
    pub async fn post_transaction(&self, cmd: PostTransactionCmd) -> ResultEngine<Transaction> {
        let PostTransactionCmd {
            account_id,
            operation,
            amount,
            idempotency_key,
        } = cmd;
        let idempotency_key = normalize_optional_text(idempotency_key.as_deref());

        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be > 0, got {amount}"
            )));
        }

        if let Some(key) = idempotency_key.as_deref()
            && self.transaction_by_idempotency_key(key).await?.is_some()
        {
            tracing::warn!(%account_id, idempotency_key = key, "duplicate posting rejected");
            return Err(duplicate_key(key));
        }

        self.require_account(account_id).await?;

        let result = with_tx!(self, |db_tx| {
            self.apply_posting(
                &db_tx,
                account_id,
                operation,
                amount,
                idempotency_key.clone(),
            )
            .await
        });

        match &result {
            Ok(tx) => tracing::debug!(
                %account_id,
                transaction_id = %tx.id,
                operation = %operation,
                amount = %tx.amount,
                "transaction posted"
            ),
            Err(err) if err.is_internal() => tracing::error!(
                %account_id,
                idempotency_key = idempotency_key.as_deref().unwrap_or_default(),
                %amount,
                "failed to post transaction: {err}"
            ),
            Err(err) => tracing::warn!(
                %account_id,
                idempotency_key = idempotency_key.as_deref().unwrap_or_default(),
                %amount,
                "transaction rejected: {err}"
            ),
        }
        result
    }

    /// Steps run under the balance lock. Every error leaves `db_tx` to be
    /// rolled back by the caller.
    async fn apply_posting(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
        operation: OperationType,
        amount: Decimal,
        idempotency_key: Option<String>,
    ) -> ResultEngine<Transaction> {
        let current = self.balance_for_update(db_tx, account_id).await?;

        let amount_minor = to_minor_units(amount)?;
        let signed_amount = apply_sign(amount_minor, operation);

        if !operation.is_credit() && amount_minor > current.balance {
            return Err(EngineError::InsufficientFunds(format!(
                "{operation} of {amount_minor} exceeds balance {}",
                current.balance
            )));
        }

        let tx = Transaction::new(account_id, operation, signed_amount, idempotency_key);
        self.insert_transaction(db_tx, &tx).await?;

        let new_balance = current
            .balance
            .checked_add(signed_amount)
            .ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))?;
        self.update_balance(db_tx, account_id, new_balance).await?;

        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use rust_decimal_macros::dec;
    use sea_orm::Database;

    use super::*;
    use crate::MoneyCents;

    async fn engine() -> Engine {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    /// Runs the locked steps directly, skipping the idempotency pre-check.
    async fn post_in_scope(
        engine: &Engine,
        account_id: Uuid,
        key: Option<&str>,
    ) -> ResultEngine<Transaction> {
        with_tx!(engine, |db_tx| {
            engine
                .apply_posting(
                    &db_tx,
                    account_id,
                    OperationType::CreditVoucher,
                    dec!(200.00),
                    key.map(str::to_string),
                )
                .await
        })
    }

    #[tokio::test]
    async fn duplicate_key_inside_scope_is_conflict_and_rolls_back() {
        let engine = engine().await;
        let account = engine.open_account("52998224725").await.unwrap();

        post_in_scope(&engine, account.id, Some("K")).await.unwrap();
        let second = post_in_scope(&engine, account.id, Some("K")).await;
        assert_eq!(second, Err(duplicate_key("K")));

        let balance = engine.balance(account.id).await.unwrap();
        assert_eq!(balance.balance, MoneyCents::new(20000));
        let txs = engine.transactions_for_account(account.id).await.unwrap();
        assert_eq!(txs.len(), 1);
    }

    #[tokio::test]
    async fn missing_balance_row_is_not_found() {
        let engine = engine().await;

        let result = post_in_scope(&engine, Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(EngineError::KeyNotFound(_))));
    }
}
