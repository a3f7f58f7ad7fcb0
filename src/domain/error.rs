/// Failure reported by a persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // ---
    /// A record with the same natural key already exists.
    #[error("record already exists")]
    Conflict,

    /// The record to update is not present.
    #[error("record not found")]
    Missing,

    /// Connectivity, serialization or any other backend failure.
    #[error("storage backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    // ---
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}
