use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contact_id: i32,
    pub message: String,
    pub message_timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Messages of one contact, most recent first; equal timestamps fall back to insertion order.
pub async fn list_for_contact(db: &DatabaseConnection, contact_id: i32) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::ContactId.eq(contact_id))
        .order_by_desc(Column::MessageTimestamp)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// Insert with a server-assigned timestamp.
pub async fn create(db: &DatabaseConnection, contact_id: i32, message: Option<String>) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        contact_id: Set(contact_id),
        message: message.map(Set).unwrap_or(NotSet),
        message_timestamp: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
