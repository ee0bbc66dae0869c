//! Progress circle rendering.
//!
//! The remaining time is shown as an arc starting at 12 o'clock whose sweep is
//! the fraction of the selected duration still left, with a `MM:SS.mmm` label
//! in the middle. Terminal hosts get a horizontal bar instead of the arc.
//!
//! # Basic Usage
//!
//! ```rust
//! use carousel_timer::progress::{label, sweep_angle};
//!
//! assert_eq!(sweep_angle(450_000, 900_000), 180.0);
//! assert_eq!(sweep_angle(3_600_000, 3_600_000), 360.0);
//! assert_eq!(label(61_234), "01:01.234");
//! ```

use crate::draw::{DrawCommand, Palette, Point, TextAlign};
use crate::duration::format_clock;
use lipgloss_extras::lipgloss::{self, Color, Style};

const DEFAULT_WIDTH: i32 = 40;

/// Arc start: 12 o'clock in canvas degrees.
pub const START_DEGREES: f64 = -90.0;

/// Fraction of `timeout_ms` left in `current_ms`, clamped to `[0, 1]`.
///
/// A zero timeout yields 0.
pub fn fraction(current_ms: u64, timeout_ms: u64) -> f64 {
    if timeout_ms == 0 {
        return 0.0;
    }
    (current_ms as f64 / timeout_ms as f64).clamp(0.0, 1.0)
}

/// Arc sweep in degrees for the remaining time. `current == timeout` is a
/// full circle.
pub fn sweep_angle(current_ms: u64, timeout_ms: u64) -> f64 {
    360.0 * fraction(current_ms, timeout_ms)
}

/// Center label for the remaining time.
pub fn label(current_ms: u64) -> String {
    format_clock(current_ms)
}

/// Placement of the progress circle on the host surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Circle center.
    pub center: Point,
    /// Circle radius.
    pub radius: f64,
    /// Width of the track and the arc.
    pub stroke_width: f64,
    /// Font size of the clock label.
    pub label_size: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            center: Point::new(180.0, 180.0),
            radius: 140.0,
            stroke_width: 12.0,
            label_size: 36.0,
        }
    }
}

/// Canvas commands: the track circle, the remaining-time arc and the label.
pub fn draw(
    fraction: f64,
    current_ms: u64,
    geometry: &Geometry,
    palette: &Palette,
) -> Vec<DrawCommand> {
    vec![
        DrawCommand::Circle {
            center: geometry.center,
            radius: geometry.radius,
            stroke_width: geometry.stroke_width,
            color: palette.muted,
        },
        DrawCommand::Arc {
            center: geometry.center,
            radius: geometry.radius,
            start_degrees: START_DEGREES,
            sweep_degrees: 360.0 * fraction.clamp(0.0, 1.0),
            stroke_width: geometry.stroke_width,
            color: palette.accent,
        },
        DrawCommand::Text {
            content: label(current_ms),
            position: geometry.center,
            align: TextAlign::Center,
            size: geometry.label_size,
            color: palette.text,
        },
    ]
}

/// Construction options for the terminal progress bar.
pub enum ProgressOption {
    /// Color of the filled cells.
    WithSolidFill(String),
    /// Color of the empty cells.
    WithTrackColor(String),
    /// Total width including the label.
    WithWidth(i32),
}

impl ProgressOption {
    fn apply(&self, m: &mut Model) {
        match self {
            ProgressOption::WithSolidFill(color) => m.full_color = color.clone(),
            ProgressOption::WithTrackColor(color) => m.empty_color = color.clone(),
            ProgressOption::WithWidth(width) => m.width = *width,
        }
    }
}

/// Fills the remaining fraction with `color` (`#RRGGBB`).
pub fn with_solid_fill(color: String) -> ProgressOption {
    ProgressOption::WithSolidFill(color)
}

/// Draws the spent fraction in `color` (`#RRGGBB`).
pub fn with_track_color(color: String) -> ProgressOption {
    ProgressOption::WithTrackColor(color)
}

/// Sets the total width in columns.
pub fn with_width(w: i32) -> ProgressOption {
    ProgressOption::WithWidth(w)
}

/// Terminal progress bar: filled cells for the remaining fraction followed by
/// the clock label.
#[derive(Debug, Clone)]
pub struct Model {
    /// Total width including the label.
    pub width: i32,
    /// Glyph for remaining time.
    pub full: char,
    /// Hex color of `full`.
    pub full_color: String,
    /// Glyph for spent time.
    pub empty: char,
    /// Hex color of `empty`.
    pub empty_color: String,
    /// Whether the clock label follows the bar.
    pub show_label: bool,
    /// Style applied to the label.
    pub label_style: Style,
}

/// Creates a progress bar with the default palette and width.
pub fn new(opts: &[ProgressOption]) -> Model {
    let palette = Palette::default();
    let mut m = Model {
        width: DEFAULT_WIDTH,
        full: '█',
        full_color: palette.accent.to_hex(),
        empty: '░',
        empty_color: palette.muted.to_hex(),
        show_label: true,
        label_style: Style::new(),
    };

    for opt in opts {
        opt.apply(&mut m);
    }

    m
}

impl Model {
    /// Renders the bar for `fraction` with the label for `current_ms`.
    pub fn view_as(&self, fraction: f64, current_ms: u64) -> String {
        let label_view = self.label_view(current_ms);
        let label_width = lipgloss::width_visible(&label_view) as i32;
        let bar_view = self.bar_view(fraction, label_width);

        format!("{}{}", bar_view, label_view)
    }

    fn bar_view(&self, fraction: f64, text_width: i32) -> String {
        let tw = std::cmp::max(0, self.width - text_width); // total width
        let fw = std::cmp::max(
            0,
            std::cmp::min(tw, ((tw as f64) * fraction.clamp(0.0, 1.0)).round() as i32),
        ); // filled width

        let full = Style::new()
            .foreground(Color::from(self.full_color.as_str()))
            .render(&self.full.to_string());
        let empty = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.empty.to_string());

        let mut result = full.repeat(fw as usize);
        result.push_str(&empty.repeat((tw - fw) as usize));
        result
    }

    fn label_view(&self, current_ms: u64) -> String {
        if !self.show_label {
            return String::new();
        }
        self.label_style.render(&format!(" {}", label(current_ms)))
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipgloss_extras::lipgloss::strip_ansi;

    #[test]
    fn test_sweep_angle() {
        assert_eq!(sweep_angle(900_000, 900_000), 360.0);
        assert_eq!(sweep_angle(450_000, 900_000), 180.0);
        assert_eq!(sweep_angle(0, 900_000), 0.0);
    }

    #[test]
    fn test_full_dial_is_full_circle() {
        assert_eq!(sweep_angle(3_600_000, 3_600_000), 360.0);
    }

    #[test]
    fn test_sweep_clamped() {
        assert_eq!(sweep_angle(1_000_000, 900_000), 360.0);
        assert_eq!(sweep_angle(5, 0), 0.0);
    }

    #[test]
    fn test_label() {
        assert_eq!(label(900_000), "15:00.000");
        assert_eq!(label(0), "00:00.000");
    }

    #[test]
    fn test_draw_commands() {
        let commands = draw(0.5, 450_000, &Geometry::default(), &Palette::default());
        assert_eq!(commands.len(), 3);
        match &commands[1] {
            DrawCommand::Arc {
                start_degrees,
                sweep_degrees,
                ..
            } => {
                assert_eq!(*start_degrees, -90.0);
                assert_eq!(*sweep_degrees, 180.0);
            }
            other => panic!("expected arc, got {:?}", other),
        }
        assert!(matches!(
            &commands[2],
            DrawCommand::Text { content, .. } if content == "07:30.000"
        ));
    }

    #[test]
    fn test_new_defaults() {
        let progress = new(&[]);
        assert_eq!(progress.width, DEFAULT_WIDTH);
        assert_eq!(progress.full, '█');
        assert_eq!(progress.empty, '░');
        assert_eq!(progress.full_color, "#7571F9");
        assert_eq!(progress.empty_color, "#606060");
        assert!(progress.show_label);
    }

    #[test]
    fn test_options() {
        let progress = new(&[
            with_width(30),
            with_solid_fill("#FF0000".to_string()),
            with_track_color("#222222".to_string()),
        ]);
        assert_eq!(progress.width, 30);
        assert_eq!(progress.full_color, "#FF0000");
        assert_eq!(progress.empty_color, "#222222");
        assert!(progress.show_label);
    }

    #[test]
    fn test_view_widths() {
        let mut progress = new(&[with_width(20)]);
        progress.show_label = false;
        for fraction in [0.0, 0.5, 1.0] {
            let plain = strip_ansi(&progress.view_as(fraction, 0));
            assert_eq!(plain.chars().count(), 20);
        }
        let full = strip_ansi(&progress.view_as(1.0, 0));
        assert!(full.chars().all(|c| c == '█'));
        let empty = strip_ansi(&progress.view_as(0.0, 0));
        assert!(empty.chars().all(|c| c == '░'));
    }

    #[test]
    fn test_view_with_label() {
        let progress = new(&[with_width(30)]);
        let plain = strip_ansi(&progress.view_as(0.5, 450_000));
        assert!(plain.ends_with(" 07:30.000"));
        assert_eq!(plain.chars().count(), 30);
        let filled = plain.chars().filter(|&c| c == '█').count();
        let empty = plain.chars().filter(|&c| c == '░').count();
        assert_eq!(filled + empty, 20);
        assert_eq!(filled, 10);
    }
}
