//! Error types shared by the drop core and its collaborators.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    #[error("not enough coins to drop")]
    InsufficientBalance,
    #[error("a drop is already in progress")]
    DropAlreadyInProgress,
    #[error("game is paused")]
    Paused,
    #[error("slot index {index} out of range for {count} slots")]
    InvalidSlotIndex { index: usize, count: usize },
}

impl DropError {
    /// Caller-side precondition failures: the host should have disabled the
    /// drop affordance, so these are ignored rather than reported.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DropError::InsufficientBalance | DropError::DropAlreadyInProgress | DropError::Paused
        )
    }
}

pub type DropResult<T> = Result<T, DropError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("collectible catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("stored game state is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("failed to write game state: {0}")]
    Write(String),
}
