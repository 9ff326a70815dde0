use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub contact_name: String,
    pub phone_number: String,
    pub message: String,
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// All rows in primary-key order.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find_by_name(db: &DatabaseConnection, contact_name: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::ContactName.eq(contact_name))
        .order_by_asc(Column::Id)
        .one(db)
        .await?)
}

/// Insert a row. Absent text fields are left unset so the store's NOT NULL rules decide.
pub async fn create(
    db: &DatabaseConnection,
    contact_name: Option<String>,
    phone_number: Option<String>,
    message: Option<String>,
    image_url: Option<String>,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        contact_name: contact_name.map(Set).unwrap_or(NotSet),
        phone_number: phone_number.map(Set).unwrap_or(NotSet),
        message: message.map(Set).unwrap_or(NotSet),
        image_url: Set(image_url),
    };
    Ok(am.insert(db).await?)
}

/// Overwrite the text columns; returns the number of rows touched.
pub async fn update_text_fields(
    db: &DatabaseConnection,
    id: i32,
    contact_name: Option<String>,
    phone_number: Option<String>,
    message: Option<String>,
) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::ContactName, Expr::value(contact_name))
        .col_expr(Column::PhoneNumber, Expr::value(phone_number))
        .col_expr(Column::Message, Expr::value(message))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Case-insensitive substring match on `contact_name`.
pub async fn search_by_name(db: &DatabaseConnection, fragment: &str) -> Result<Vec<Model>, ModelError> {
    let pattern = format!("%{}%", escape_like(&fragment.to_lowercase()));
    Ok(Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((Entity, Column::ContactName))))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// `Some(image_url)` when the contact exists, `None` when no row matches.
pub async fn find_image_url(db: &DatabaseConnection, contact_name: &str) -> Result<Option<Option<String>>, ModelError> {
    Ok(find_by_name(db, contact_name).await?.map(|c| c.image_url))
}

pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
