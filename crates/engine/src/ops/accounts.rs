use chrono::Utc;
use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Account, EngineError, ResultEngine, accounts, customers, document};

use super::{Engine, with_tx};

fn account_not_found(account_id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("account {account_id}"))
}

impl Engine {
    /// Opens an account for the customer identified by `document`.
    ///
    /// The customer, the account and its zero balance row are created in one
    /// DB transaction, so an account is never visible without a balance.
    pub async fn open_account(&self, document: &str) -> ResultEngine<Account> {
        let document = document.trim();
        if !document::is_valid_document(document) {
            return Err(EngineError::InvalidDocument(document.to_string()));
        }

        let account = with_tx!(self, |db_tx| {
            self.insert_account(&db_tx, document).await
        })?;

        tracing::info!(account_id = %account.id, "account opened");
        Ok(account)
    }

    async fn insert_account(
        &self,
        db_tx: &DatabaseTransaction,
        document: &str,
    ) -> ResultEngine<Account> {
        let now = Utc::now();
        let customer_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();

        let customer = customers::ActiveModel::new(customer_id, document, now)
            .insert(db_tx)
            .await?;
        let account = accounts::ActiveModel::new(account_id, customer_id, now)
            .insert(db_tx)
            .await?;
        self.create_balance(db_tx, account_id).await?;

        Account::try_from((account, customer))
    }

    /// Looks up an account together with its customer's document.
    pub async fn account(&self, account_id: Uuid) -> ResultEngine<Account> {
        let (account, customer) = accounts::Entity::find_by_id(account_id.to_string())
            .find_also_related(customers::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| account_not_found(account_id))?;
        let customer = customer.ok_or_else(|| {
            EngineError::KeyNotFound(format!("customer of account {account_id}"))
        })?;
        Account::try_from((account, customer))
    }

    /// Fails with [`EngineError::KeyNotFound`] unless the account exists.
    pub(crate) async fn require_account(&self, account_id: Uuid) -> ResultEngine<()> {
        let exists = accounts::Entity::find_by_id(account_id.to_string())
            .one(&self.database)
            .await?
            .is_some();
        if !exists {
            return Err(account_not_found(account_id));
        }
        Ok(())
    }
}
