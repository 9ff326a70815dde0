//! Storage abstractions for service layer
//!
//! Holds the blob store used for uploaded contact images.

pub mod blob_store;
