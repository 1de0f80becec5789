pub mod commands;
pub mod router;
pub mod tui;

pub mod cmd {
    pub use super::commands::Cli;
}
