//! The module contains the `Account` struct and its table.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ResultEngine, customers, util::parse_uuid};

/// An account a customer posts operations against.
///
/// The running balance lives in its own row (see [`crate::Balance`]) so that
/// it can be locked independently of the account metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Tax document of the owning customer.
    pub document: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new(id: Uuid, customer_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::Set(id.to_string()),
            customer_id: ActiveValue::Set(customer_id.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

impl TryFrom<(Model, customers::Model)> for Account {
    type Error = crate::EngineError;

    fn try_from((account, customer): (Model, customers::Model)) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&account.id, "account")?,
            customer_id: parse_uuid(&account.customer_id, "customer")?,
            document: customer.document,
            created_at: account.created_at,
        })
    }
}
