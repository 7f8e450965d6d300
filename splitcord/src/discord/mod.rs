//! Serenity-facing implementations of the application ports.

pub mod confirm;
pub mod panel_surface;
