use std::fmt;

use splitcord_domain::Silver;

/// Which log level a failure deserves. User mistakes are routine and must
/// not raise alarms; storage trouble and bugs must.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    UserInput,
    Storage,
    InternalBug,
}

/// Opaque persistence failure. The cause is captured as text at the
/// boundary so upper layers stay free of driver types; the transaction it
/// interrupted has already been rolled back.
#[derive(Clone, Debug, thiserror::Error)]
#[error("storage failure: {0}")]
pub struct StorageError(String);

impl StorageError {
    pub fn new(cause: impl fmt::Display) -> Self {
        Self(cause.to_string())
    }
}

/// Failure talking to the interactive surface (message edits, prompts).
#[derive(Clone, Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to present prompt: {0}")]
    Present(String),
    #[error("failed to update surface: {0}")]
    Update(String),
}

impl SurfaceError {
    pub fn present(cause: impl fmt::Display) -> Self {
        Self::Present(cause.to_string())
    }

    pub fn update(cause: impl fmt::Display) -> Self {
        Self::Update(cause.to_string())
    }
}

/// Everything a ledger command can report back. The first five are the
/// user's problem and are rendered inline; `Storage` is ours.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("the amount must be positive")]
    NonPositiveAmount,
    #[error("a balance cannot be negative")]
    NegativeBalance,
    #[error("source and destination are the same member")]
    SelfTransfer,
    #[error("bots cannot hold silver")]
    BotRecipient,
    #[error("insufficient funds, {balance} available")]
    InsufficientFunds { balance: Silver },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TransferError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Storage(_) => FailureKind::Storage,
            _ => FailureKind::UserInput,
        }
    }
}

/// Failure inside one split panel action. Caught at the controller loop
/// so the session outlives it.
#[derive(Debug, thiserror::Error)]
pub enum PanelActionError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
