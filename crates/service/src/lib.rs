//! Service layer providing the contact book's business operations on top of models.
//! - Separates business logic from data access (repository traits per module).
//! - Each repository has a SeaORM implementation and an in-memory mock.
//! - Every failure is converted to [`errors::ServiceError`] at the operation boundary.

pub mod errors;
pub mod auth;
pub mod contact;
pub mod message;
pub mod runtime;
pub mod storage;
#[cfg(test)]
pub mod test_support;
