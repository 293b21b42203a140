//! Error types for panel and item collection operations

use thiserror::Error;

use crate::widget::{ExpandoId, ItemId};

/// Errors raised synchronously by collection mutators.
///
/// A failed call never leaves a collection partially modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplorerBarError {
    /// An argument was rejected (for example a duplicate item)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The item is not owned by the panel
    #[error("Item not found: {0:?}")]
    ItemNotFound(ItemId),

    /// The panel is not owned by the task pane
    #[error("Expando not found: {0:?}")]
    ExpandoNotFound(ExpandoId),
}

pub type Result<T> = std::result::Result<T, ExplorerBarError>;
