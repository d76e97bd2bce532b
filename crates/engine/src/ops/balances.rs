use chrono::Utc;
use sea_orm::{
    ConnectionTrait, DatabaseTransaction, DbBackend, QueryFilter, QuerySelect, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{Balance, EngineError, MoneyCents, ResultEngine, balances};

use super::Engine;

fn balance_not_found(account_id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("balance for account {account_id}"))
}

impl Engine {
    /// Current balance of an account, without taking any lock.
    pub async fn balance(&self, account_id: Uuid) -> ResultEngine<Balance> {
        let model = balances::Entity::find()
            .filter(balances::Column::AccountId.eq(account_id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| balance_not_found(account_id))?;
        Balance::try_from(model)
    }

    /// Reads the balance row and takes the per-account exclusive lock.
    ///
    /// The lock is held until `db_tx` commits or rolls back; any other
    /// `balance_for_update` on the same account blocks until then.
    ///
    /// SQLite has no row locks (`FOR UPDATE` is not part of its dialect), so
    /// there the row is touched first with a no-op update, which takes the
    /// database write lock for the rest of the transaction.
    pub(crate) async fn balance_for_update(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
    ) -> ResultEngine<Balance> {
        let account_key = account_id.to_string();
        let select = balances::Entity::find()
            .filter(balances::Column::AccountId.eq(account_key.clone()));

        let model = match db_tx.get_database_backend() {
            DbBackend::Sqlite => {
                let touched = balances::Entity::update_many()
                    .col_expr(
                        balances::Column::UpdatedAt,
                        Expr::col(balances::Column::UpdatedAt).into(),
                    )
                    .filter(balances::Column::AccountId.eq(account_key))
                    .exec(db_tx)
                    .await?;
                if touched.rows_affected == 0 {
                    return Err(balance_not_found(account_id));
                }
                select.one(db_tx).await?
            }
            _ => select.lock_exclusive().one(db_tx).await?,
        };

        let model = model.ok_or_else(|| balance_not_found(account_id))?;
        Balance::try_from(model)
    }

    /// Overwrites the balance of an account.
    ///
    /// Must only be called while holding the lock taken by
    /// [`Engine::balance_for_update`] in the same `db_tx`.
    pub(crate) async fn update_balance(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
        new_balance: MoneyCents,
    ) -> ResultEngine<()> {
        let result = balances::Entity::update_many()
            .col_expr(balances::Column::Balance, Expr::value(new_balance.cents()))
            .col_expr(balances::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(balances::Column::AccountId.eq(account_id.to_string()))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(balance_not_found(account_id));
        }
        Ok(())
    }

    /// Inserts the zero balance row of a newly opened account.
    pub(crate) async fn create_balance(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
    ) -> ResultEngine<Balance> {
        let model = balances::ActiveModel::zero(account_id, Utc::now())
            .insert(db_tx)
            .await?;
        Balance::try_from(model)
    }
}
