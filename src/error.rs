use thiserror::Error;

use crate::api::ApiError;
use crate::form::import::ImportError;

/// Crate-level error for operations that cross layers.
///
/// Nothing here is fatal: screens degrade every variant to a visible
/// message and leave (or revert) local state.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column is not toggleable: {0}")]
    ColumnNotToggleable(String),
}
