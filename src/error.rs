//! Application error type.
//!
//! Every fallible operation returns `AppError`, which carries the process exit
//! code alongside the message printed by `main`.

use std::fmt::Display;

/// Exit code for invalid arguments or configuration.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when the data source is unavailable or malformed.
pub const EXIT_DATA: u8 = 3;
/// Exit code for rendering, export, or terminal failures.
pub const EXIT_OUTPUT: u8 = 4;

/// The one message users see when loading or rendering fails.
///
/// The concrete cause is only written to the log.
pub const LOAD_FAILURE_MESSAGE: &str =
    "Failed to load or render data. Re-run with RUST_LOG=debug for details.";

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Invalid flags, environment values, or year ranges.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    /// The data source could not be read or does not look like temperature data.
    pub fn data_unavailable(cause: impl Display) -> Self {
        tracing::error!(%cause, "data source unavailable or malformed");
        Self::new(EXIT_DATA, LOAD_FAILURE_MESSAGE)
    }

    /// Drawing or writing an output failed.
    pub fn render_failed(cause: impl Display) -> Self {
        tracing::error!(%cause, "rendering failed");
        Self::new(EXIT_OUTPUT, LOAD_FAILURE_MESSAGE)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_and_render_failures_share_the_generic_message() {
        let data = AppError::data_unavailable("connection refused");
        let render = AppError::render_failed("disk full");

        assert_eq!(data.exit_code(), EXIT_DATA);
        assert_eq!(render.exit_code(), EXIT_OUTPUT);
        assert_eq!(data.to_string(), LOAD_FAILURE_MESSAGE);
        assert_eq!(render.to_string(), LOAD_FAILURE_MESSAGE);
    }
}
