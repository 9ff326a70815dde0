use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Credential row. The column is literally named `user`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "user")]
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}
