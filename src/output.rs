//! # Output
//!
//! This module provides the IO sink the pipeline reports progress to, plus
//! the color configuration used by the console implementation.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust
//! use resource_locator::output::{BufferIo, Io};
//!
//! let io = BufferIo::new();
//! io.info("Generating resource locator");
//! assert_eq!(io.messages(), vec!["Generating resource locator"]);
//! ```

use std::cell::RefCell;
use std::env;

/// Sink for user-facing messages
pub trait Io {
    /// Write a plain message
    fn write(&self, message: &str);

    /// Write an informational message; highlighted when the sink supports it
    fn info(&self, message: &str) {
        self.write(message);
    }
}

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stderr is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stderr().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Writes messages to stderr
#[derive(Debug, Clone)]
pub struct ConsoleIo {
    config: OutputConfig,
    quiet: bool,
}

impl ConsoleIo {
    pub fn new(config: OutputConfig, quiet: bool) -> Self {
        Self { config, quiet }
    }

    /// Render an info message the way it is printed
    pub fn format_info(&self, message: &str) -> String {
        if self.config.use_color {
            console::style(message).green().force_styling(true).to_string()
        } else {
            message.to_string()
        }
    }
}

impl Io for ConsoleIo {
    fn write(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", self.format_info(message));
        }
    }
}

/// Collects messages in memory
#[derive(Debug, Default)]
pub struct BufferIo {
    messages: RefCell<Vec<String>>,
}

impl BufferIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages written so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Io for BufferIo {
    fn write(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
