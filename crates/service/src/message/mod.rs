//! Per-contact message threads.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::MessageService;
