#![warn(clippy::uninlined_format_args)]

pub mod db;
pub mod ledger;

pub use db::Database;
pub use ledger::PgLedgerStore;
