//! # Output Configuration
//!
//! Controls how the CLI decorates its output. Colors and emoji are used
//! only when the user and the terminal both allow it.
//!
//! The following are honored, in this order:
//! - `--color=always|never` on the command line
//! - `NO_COLOR` (any value, including empty) disables colors
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even when stdout is not a TTY
//! - `TERM=dumb` disables colors
//!
//! ```rust,ignore
//! use workspace_sync::output::{emoji, OutputConfig};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Syncing...", emoji(&out, "🔄", "[SYNC]"));
//! ```

use std::env;
use std::fmt::Display;

use console::{Color, Style};

#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Builds the configuration from the `--color` flag value (`always`,
    /// `never` or `auto`) and, for `auto`, the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
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
        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Renders `value` in `color`, or unchanged when colors are off.
    pub fn paint<D: Display>(&self, value: D, color: Color) -> String {
        Style::new()
            .fg(color)
            .force_styling(self.use_color)
            .apply_to(value)
            .to_string()
    }

    /// Renders `value` dimmed, or unchanged when colors are off.
    pub fn dim<D: Display>(&self, value: D) -> String {
        Style::new()
            .dim()
            .force_styling(self.use_color)
            .apply_to(value)
            .to_string()
    }

    pub fn bold<D: Display>(&self, value: D) -> String {
        Style::new()
            .bold()
            .force_styling(self.use_color)
            .apply_to(value)
            .to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colors are enabled and `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
