//! Auth check module: three-layer architecture (domain, repository, service).
//!
//! Verifies a username/password pair and hands back the stored role. No session or
//! token is issued.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::AuthCheckService;
