//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the upload directory exists; warn when the public assets directory is missing.
pub async fn ensure_env(public_dir: &str, upload_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(public_dir, upload_dir).await
}
