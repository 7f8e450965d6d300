#![warn(clippy::uninlined_format_args)]

pub mod confirmation;
pub mod error;
pub mod model;
pub mod panel;
pub mod ports;
pub mod transfer;

#[cfg(test)]
mod test_utils;

pub use confirmation::{
    ConfirmationOutcome, ConfirmationWorkflow, ADMIN_CONFIRM_TIMEOUT, TRANSFER_CONFIRM_TIMEOUT,
};
pub use error::{FailureKind, PanelActionError, StorageError, SurfaceError, TransferError};
pub use model::{
    ConfirmationRequest, ConfirmationVerdict, CorrelationId, DebitOutcome, Decision, MemberKind,
    PayoutReceipt, PayoutRequest, SessionId, SetBalanceRequest, TransferOutcome, TransferReceipt,
    TransferRequest,
};
pub use panel::{
    InputField, PanelAction, PanelClosed, PanelCommand, PanelRejection, PanelRetire, PanelView,
    SplitPanelController, SplitPanelHandle, INPUT_TIMEOUT, PANEL_IDLE_TIMEOUT,
};
pub use ports::{ConfirmationSurface, LedgerStore, PanelSurface};
pub use transfer::TransferCoordinator;
