//! Error handling for Aura
//!
//! - `thiserror` for typed errors raised by the storage layer
//! - `anyhow` for results that collect context on the way up
//!
//! None of these reach the animation core at runtime: the settings store
//! logs storage failures and keeps running on in-memory state.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuraError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage backend unavailable or rejected the write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Settings that cannot be used, even after clamping
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for Aura operations
pub type AuraResult<T> = anyhow::Result<T>;

/// Extension trait for adding Aura-specific context to errors
pub trait ResultExt<T> {
    /// Add settings storage context to an error
    fn with_storage_context(self, operation: &str) -> AuraResult<T>;

    /// Add file operation context to an error
    fn with_file_context(self, path: &str) -> AuraResult<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for Result<T, E> {
    fn with_storage_context(self, operation: &str) -> AuraResult<T> {
        use anyhow::Context;
        self.map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Settings storage failed: {}", operation))
    }

    fn with_file_context(self, path: &str) -> AuraResult<T> {
        use anyhow::Context;
        self.map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("File operation failed: {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AuraError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn context_is_attached() {
        let res: Result<(), AuraError> = Err(AuraError::Storage("disk full".into()));
        let err = res.with_storage_context("save").unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(rendered.contains("Settings storage failed: save"));
        assert!(rendered.contains("disk full"));
    }
}
