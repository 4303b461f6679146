use thiserror::Error;

use crate::table::ParseError;

/// An error from a [`crate::BlobStorageProvider`].
/// A blob that does not exist is not an error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("request failed")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Why [`crate::ObjectFetcher::fetch`] did not return a table
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("'{key}' not found in '{container}'")]
    NotFound { container: String, key: String },
    #[error("access to '{key}' in '{container}' denied")]
    AccessDenied { container: String, key: String },
    #[error("storage request failed")]
    Storage(#[source] StorageError),
    #[error("malformed CSV")]
    Parse(#[from] ParseError),
}

/// Renders `error` followed by its chain of sources
pub(crate) fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }
    message
}
