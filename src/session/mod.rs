pub mod commands;
pub mod controller;
pub mod state;

pub use commands::{apply_command, CommandEffect, UiCommand};
pub use controller::SessionController;
pub use state::{LabelingSession, SessionSnapshot};
