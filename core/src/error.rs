//! Error type for store operations.
//!
//! # Design
//! Only two things can go wrong inside the store: the caller supplied text
//! that is blank after trimming, or the caller referenced an id that is not
//! in the collection. Everything else is a transport concern and lives in
//! the server crate.

use thiserror::Error;

/// Errors returned by `TodoStore` mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The input failed validation. The message is safe to show to clients.
    #[error("{0}")]
    Validation(String),

    /// No todo with this id exists (or it was deleted).
    #[error("todo {0} not found")]
    NotFound(u64),
}

impl StoreError {
    pub(crate) fn text_required() -> Self {
        StoreError::Validation("Todo text is required".to_string())
    }
}
