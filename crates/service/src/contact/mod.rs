//! Contact directory: domain types, repository seam and the business service.
//!
//! The service owns the uniqueness rule for `contact_name` and the association of
//! uploaded images with contact rows.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ContactService;
