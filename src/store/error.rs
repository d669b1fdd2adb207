use thiserror::Error;

#[derive(Debug, Clone, Error)]
/// Errors returned while listing enrollment candidates.
pub enum StoreError {
    /// Could not reach the document store.
    #[error("failed to connect to document store at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The store answered with a non-success status.
    #[error("failed to query collection '{collection}': {message}")]
    QueryFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// The store answered with a body we could not parse.
    #[error("invalid document store response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}
