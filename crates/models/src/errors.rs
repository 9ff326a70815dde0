use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate value: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        // 唯一约束冲突单独区分，供上层映射为 Conflict
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ModelError::Duplicate(detail),
            _ => ModelError::Db(e.to_string()),
        }
    }
}
