#![warn(clippy::uninlined_format_args)]

pub mod error_presenter;
pub mod panel_presenter;
pub mod receipt_presenter;

pub use error_presenter::{split_rejection, transfer_notice};
pub use panel_presenter::SplitPanelPresenter;
pub use receipt_presenter::{
    balance_line, payout_receipt, set_balance_receipt, transfer_receipt,
};
