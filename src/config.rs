//! Dial configuration.
//!
//! [`Config`] holds every tunable constant of the widget: the dial span, the
//! countdown tick rate, gesture sensitivity, animation timing and colors. It can be
//! built in code, deserialized with serde (missing fields take their defaults),
//! or adjusted through the [`DialOption`] helpers accepted by
//! [`dial::new`](crate::dial::new).
//!
//! ```rust
//! use carousel_timer::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.max_time_ms, 3_600_000);
//! assert!(config.validate().is_ok());
//! ```

use crate::draw::{Palette, Rgba};
use crate::error::{ConfigError, Result};
use serde::Deserialize;

/// Default dial span: sixty minutes.
pub const DEFAULT_MAX_TIME_MS: u64 = 3_600_000;
/// Default selected duration: fifteen minutes.
pub const DEFAULT_TIMEOUT_MS: u64 = 900_000;
/// Countdown tick period.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 40;
/// Milliseconds added to the duration per pixel of horizontal drag.
pub const DEFAULT_DRAG_MS_PER_PX: f64 = 2_000.0;
/// Release velocity (px/s) above which a release counts as a fling.
pub const DEFAULT_MIN_FLING_VELOCITY: f64 = 80.0;
/// Window of pointer history used for the release velocity estimate.
pub const DEFAULT_VELOCITY_WINDOW_MS: u64 = 250;
/// Base snap-back animation length.
pub const DEFAULT_BASE_TRANSITION_MS: u64 = 250;
/// Default width of the terminal ruler strip.
pub const DEFAULT_RULER_WIDTH: u16 = 60;

const MIN_RULER_WIDTH: u16 = 9;

/// Tunable constants for a dial.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Full span of the dial. Durations are kept in `(0, max_time_ms]`.
    pub max_time_ms: u64,
    /// Duration selected when the widget is created or reset.
    pub default_timeout_ms: u64,
    /// Interval between countdown ticks.
    pub tick_interval_ms: u64,
    /// Duration change per pixel of drag. Moving left increases the duration.
    pub drag_ms_per_px: f64,
    /// Minimum absolute release velocity, in px/s, for a fling.
    pub min_fling_velocity: f64,
    /// How much pointer history feeds the velocity estimate.
    pub velocity_window_ms: u64,
    /// Snap-back animation length, and the quantum for fling animations.
    pub base_transition_ms: u64,
    /// Pixel width of one terminal cell when pointer input comes from crossterm.
    pub cell_width_px: f64,
    /// Columns used by the terminal ruler strip and progress bar.
    pub ruler_width: u16,
    /// Progress arc, bar fill and major ticks, as `#RRGGBB`.
    pub accent_color: String,
    /// Minor ticks and the progress track, as `#RRGGBB`.
    pub muted_color: String,
    /// Labels, as `#RRGGBB`.
    pub text_color: String,
    /// Surface color used to flatten faded ticks in a terminal, as `#RRGGBB`.
    pub background_color: String,
}

impl Default for Config {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            max_time_ms: DEFAULT_MAX_TIME_MS,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            drag_ms_per_px: DEFAULT_DRAG_MS_PER_PX,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW_MS,
            base_transition_ms: DEFAULT_BASE_TRANSITION_MS,
            cell_width_px: 1.0,
            ruler_width: DEFAULT_RULER_WIDTH,
            accent_color: palette.accent.to_hex(),
            muted_color: palette.muted.to_hex(),
            text_color: palette.text.to_hex(),
            background_color: palette.background.to_hex(),
        }
    }
}

impl Config {
    /// Checks the invariants the duration arithmetic relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_time_ms == 0 {
            return Err(ConfigError::ZeroMaxTime);
        }
        if self.max_time_ms % 60_000 != 0 {
            return Err(ConfigError::PartialMinute(self.max_time_ms));
        }
        if self.default_timeout_ms == 0 || self.default_timeout_ms > self.max_time_ms {
            return Err(ConfigError::TimeoutOutOfRange {
                timeout: self.default_timeout_ms,
                max: self.max_time_ms,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        check_factor("drag_ms_per_px", self.drag_ms_per_px)?;
        check_factor("min_fling_velocity", self.min_fling_velocity)?;
        check_factor("cell_width_px", self.cell_width_px)?;
        if self.ruler_width < MIN_RULER_WIDTH {
            return Err(ConfigError::RulerTooNarrow {
                width: self.ruler_width,
                min: MIN_RULER_WIDTH,
            });
        }
        check_color("accent_color", &self.accent_color)?;
        check_color("muted_color", &self.muted_color)?;
        check_color("text_color", &self.text_color)?;
        check_color("background_color", &self.background_color)?;
        Ok(())
    }

    /// Number of whole minutes on the dial.
    pub fn max_minutes(&self) -> u64 {
        self.max_time_ms / 60_000
    }

    /// The configured colors. A color that does not parse keeps its default.
    pub fn palette(&self) -> Palette {
        let defaults = Palette::default();
        let parse = |hex: &str, fallback: Rgba| Rgba::from_hex(hex).unwrap_or(fallback);
        Palette {
            accent: parse(&self.accent_color, defaults.accent),
            muted: parse(&self.muted_color, defaults.muted),
            text: parse(&self.text_color, defaults.text),
            background: parse(&self.background_color, defaults.background),
        }
    }
}

fn check_color(name: &'static str, value: &str) -> Result<()> {
    match Rgba::from_hex(value) {
        Some(_) => Ok(()),
        None => Err(ConfigError::InvalidColor {
            name,
            value: value.to_string(),
        }),
    }
}

fn check_factor(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFactor { name, value })
    }
}

/// Construction-time adjustments for [`dial::new`](crate::dial::new).
#[derive(Debug, Clone)]
pub enum DialOption {
    /// Sets [`Config::max_time_ms`].
    WithMaxTime(u64),
    /// Sets [`Config::default_timeout_ms`].
    WithDefaultTimeout(u64),
    /// Sets [`Config::tick_interval_ms`].
    WithTickInterval(u64),
    /// Sets [`Config::drag_ms_per_px`].
    WithDragSensitivity(f64),
    /// Sets [`Config::min_fling_velocity`].
    WithMinFlingVelocity(f64),
    /// Sets [`Config::base_transition_ms`].
    WithTransition(u64),
    /// Sets [`Config::cell_width_px`].
    WithCellWidth(f64),
    /// Sets [`Config::ruler_width`].
    WithRulerWidth(u16),
    /// Sets [`Config::accent_color`].
    WithAccentColor(String),
}

impl DialOption {
    pub(crate) fn apply(&self, c: &mut Config) {
        match self {
            DialOption::WithMaxTime(ms) => c.max_time_ms = *ms,
            DialOption::WithDefaultTimeout(ms) => c.default_timeout_ms = *ms,
            DialOption::WithTickInterval(ms) => c.tick_interval_ms = *ms,
            DialOption::WithDragSensitivity(ms_per_px) => c.drag_ms_per_px = *ms_per_px,
            DialOption::WithMinFlingVelocity(v) => c.min_fling_velocity = *v,
            DialOption::WithTransition(ms) => c.base_transition_ms = *ms,
            DialOption::WithCellWidth(px) => c.cell_width_px = *px,
            DialOption::WithRulerWidth(w) => c.ruler_width = *w,
            DialOption::WithAccentColor(hex) => c.accent_color = hex.clone(),
        }
    }
}

/// Sets the dial span.
pub fn with_max_time(ms: u64) -> DialOption {
    DialOption::WithMaxTime(ms)
}

/// Sets the duration selected at start-up and on reset.
pub fn with_default_timeout(ms: u64) -> DialOption {
    DialOption::WithDefaultTimeout(ms)
}

/// Sets the countdown tick period.
pub fn with_tick_interval(ms: u64) -> DialOption {
    DialOption::WithTickInterval(ms)
}

/// Sets how many milliseconds one pixel of drag is worth.
pub fn with_drag_sensitivity(ms_per_px: f64) -> DialOption {
    DialOption::WithDragSensitivity(ms_per_px)
}

/// Sets the fling threshold in px/s.
pub fn with_min_fling_velocity(velocity: f64) -> DialOption {
    DialOption::WithMinFlingVelocity(velocity)
}

/// Sets the base snap-back animation length.
pub fn with_transition(ms: u64) -> DialOption {
    DialOption::WithTransition(ms)
}

/// Sets the pixel width of a terminal cell for crossterm pointer input.
pub fn with_cell_width(px: f64) -> DialOption {
    DialOption::WithCellWidth(px)
}

/// Sets the terminal ruler width in columns.
pub fn with_ruler_width(width: u16) -> DialOption {
    DialOption::WithRulerWidth(width)
}

/// Sets the accent color from a `#RRGGBB` string.
pub fn with_accent_color(hex: impl Into<String>) -> DialOption {
    DialOption::WithAccentColor(hex.into())
}
