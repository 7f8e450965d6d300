#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod split;

pub use model::{GuildId, MemberId, Silver};
pub use split::{SplitDetails, SplitSession, SplitValidationError};
