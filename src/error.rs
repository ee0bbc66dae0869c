//! Error types for dial configuration.
//!
//! Runtime paths in this crate are total: gestures, ticks and frames can never
//! fail. The only fallible step is turning a user-supplied [`Config`] into a
//! widget, which is where arithmetic preconditions such as a non-zero dial span
//! are enforced.
//!
//! [`Config`]: crate::config::Config

use thiserror::Error;

/// Reasons a [`Config`](crate::config::Config) is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The dial span is empty.
    #[error("max_time_ms must be greater than zero")]
    ZeroMaxTime,
    /// The dial span is not a whole number of minutes.
    #[error("max_time_ms must be a whole number of minutes, got {0}ms")]
    PartialMinute(u64),
    /// The default duration does not fit on the dial.
    #[error("default_timeout_ms {timeout}ms is outside (0, {max}ms]")]
    TimeoutOutOfRange {
        /// The rejected default duration.
        timeout: u64,
        /// The dial span.
        max: u64,
    },
    /// Countdown ticks would never advance.
    #[error("tick_interval_ms must be greater than zero")]
    ZeroTickInterval,
    /// A scale factor is zero, negative, NaN or infinite.
    #[error("{name} must be finite and positive, got {value}")]
    InvalidFactor {
        /// Field name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The terminal ruler has no room for its labels.
    #[error("ruler_width must be at least {min} columns, got {width}")]
    RulerTooNarrow {
        /// The rejected width.
        width: u16,
        /// Smallest accepted width.
        min: u16,
    },
    /// A color is not a `#RRGGBB` string.
    #[error("{name} must be a #RRGGBB color, got {value:?}")]
    InvalidColor {
        /// Field name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Result alias used by configuration entry points.
pub type Result<T> = std::result::Result<T, ConfigError>;
