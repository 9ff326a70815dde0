//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the upload directory exists (creating it when missing) and warn when the
/// optional public assets directory is absent.
pub async fn ensure_env(public_dir: &str, upload_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(public_dir).await.is_err() {
        warn!(%public_dir, "public assets directory not found; static assets may 404");
    }
    if tokio::fs::metadata(upload_dir).await.is_err() {
        tokio::fs::create_dir_all(upload_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {upload_dir}: {e}"))?;
        info!(%upload_dir, "created upload folder");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_upload_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("contact_book_env_{}", uuid::Uuid::new_v4()));
        let uploads = root.join("uploads");
        let uploads = uploads.to_string_lossy().to_string();

        ensure_env("/nonexistent-public-dir", &uploads).await?;
        assert!(tokio::fs::metadata(&uploads).await?.is_dir());

        // 第二次调用保持幂等
        ensure_env("/nonexistent-public-dir", &uploads).await?;
        tokio::fs::remove_dir_all(&root).await?;
        Ok(())
    }
}
