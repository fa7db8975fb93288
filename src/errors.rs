//! Unified error types for the shopping list core.
//!
//! Validation variants are returned before any state is touched. Storage
//! variants wrap the underlying engine errors so callers only ever match on
//! [`Error`].

use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// No entry in an edit batch had both a positive quantity and a positive price.
    #[error("No valid items: provide quantity and price for at least one item")]
    NoValidEntries,

    /// A list name was blank after trimming.
    #[error("List name cannot be empty")]
    EmptyListName,

    /// Creating another list would exceed the list cap.
    #[error("List limit reached: at most {cap} lists can exist")]
    ListCapReached {
        /// The maximum number of lists.
        cap: usize,
    },

    /// No list has the given id.
    #[error("List not found: {id}")]
    ListNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// No flat item has the given id.
    #[error("Item not found: {id}")]
    ItemNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// Price text that is not a usable number.
    #[error("Invalid price: {input:?}")]
    InvalidPrice {
        /// The text as the user entered it.
        input: String,
    },

    /// Export was requested for a list without products.
    #[error("List '{name}' has no items to export")]
    EmptyExport {
        /// Name of the empty list.
        name: String,
    },

    /// The document renderer failed.
    #[error("Document rendering failed: {message}")]
    Render {
        /// Renderer-provided description.
        message: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong, including the path where known.
        message: String,
    },

    /// Storage engine failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A collection could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for failures caused by user input rather than by storage or rendering.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoValidEntries
                | Self::EmptyListName
                | Self::ListCapReached { .. }
                | Self::InvalidPrice { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
