#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod commands;
mod discord;
mod handler;
mod registry;
#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() {
    bootstrap::run().await;
}
