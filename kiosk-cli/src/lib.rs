//! Command-line launchers for the kiosk assistant.
//!
//! The `kiosk-index` binary builds a vector store from a document directory;
//! `kiosk-chat` answers questions against it in a terminal loop. This library
//! holds what the two share.

pub mod console;
pub mod credentials;
pub mod telemetry;

pub use console::{
    failure_message, format_sources, is_exit_command, preview, run_console, wants_sources,
};
pub use credentials::{MISSING_KEY_HELP, prompt_api_key, resolve_api_key, resolve_api_key_with};
pub use telemetry::init_logging;
