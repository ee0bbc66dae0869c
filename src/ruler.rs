//! Carousel ruler rendering.
//!
//! The ruler is a drum of sixty minute ticks seen edge-on: each tick sits at an
//! angle on a virtual circle, its horizontal position is the cosine of that
//! angle and its depth the sine. Ticks on the far side of the drum (depth below
//! a ninth of the radius) are hidden, and visible ticks fade in with depth.
//! The drum is rotated so the selected minute faces the viewer at the center.
//!
//! [`ticks`] is the pure projection; [`draw`] and [`view`] turn it into canvas
//! commands or a terminal strip.

use crate::draw::{DrawCommand, Palette, Point, TextAlign};
use lipgloss_extras::lipgloss::{Color, Style};

/// Ticks on the drum, one per minute slot.
pub const TICK_COUNT: usize = 60;

/// Every n-th tick is major: taller and labeled.
pub const MAJOR_EVERY: usize = 5;

const DEGREES_PER_TICK: f64 = 360.0 / TICK_COUNT as f64;

/// Placement of the ruler on the host surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// X coordinate of the selected minute.
    pub center_x: f64,
    /// Y coordinate of the tick bases.
    pub baseline_y: f64,
    /// Drum radius; the ruler spans twice this.
    pub radius: f64,
    /// Height of minor ticks.
    pub minor_height: f64,
    /// Height of major ticks.
    pub major_height: f64,
    /// Distance below the baseline for major labels.
    pub label_offset: f64,
    /// Font size of major labels.
    pub label_size: f64,
    /// Tick stroke width.
    pub stroke_width: f64,
}

impl Geometry {
    /// A ruler spanning `width` pixels with its baseline at `baseline_y`.
    pub fn for_width(width: f64, baseline_y: f64) -> Self {
        let radius = width / 2.0;
        Self {
            center_x: radius,
            baseline_y,
            radius,
            minor_height: radius / 12.0,
            major_height: radius / 6.0,
            label_offset: radius / 10.0,
            label_size: radius / 12.0,
            stroke_width: (radius / 120.0).max(1.0),
        }
    }

    /// Depth below which ticks are behind the drum.
    pub fn cutoff(&self) -> f64 {
        self.radius / 9.0
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::for_width(360.0, 120.0)
    }
}

/// One projected tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Slot index, 0..60.
    pub minute: usize,
    /// Angle on the drum in `[0, 360)`; 90 faces the viewer.
    pub angle_degrees: f64,
    /// Horizontal position on the host surface.
    pub screen_x: f64,
    /// Depth toward the viewer; negative on the far side.
    pub screen_z: f64,
    /// 0 when hidden, rising to 1 at the front of the drum.
    pub opacity: f64,
    /// Every fifth tick.
    pub is_major: bool,
    /// Minute number for major ticks.
    pub label: Option<String>,
}

impl Tick {
    /// Whether the tick is drawn at all.
    pub fn visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Drum rotation that brings `displayed_ms` to the front.
pub fn rotation_offset(displayed_ms: u64, max_minutes: u64) -> f64 {
    let seconds = displayed_ms as f64 / 1000.0;
    seconds * (360.0 / max_minutes.max(1) as f64) / 60.0 + 90.0
}

/// Projects all sixty ticks for a displayed duration.
pub fn ticks(displayed_ms: u64, max_minutes: u64, geometry: &Geometry) -> Vec<Tick> {
    let offset = rotation_offset(displayed_ms, max_minutes);
    let cutoff = geometry.cutoff();
    let depth_span = geometry.radius - cutoff;
    let minutes_per_tick = max_minutes.max(1) as f64 / TICK_COUNT as f64;

    (0..TICK_COUNT)
        .map(|minute| {
            let angle = (offset - minute as f64 * DEGREES_PER_TICK).rem_euclid(360.0);
            let radians = angle.to_radians();
            let screen_x = radians.cos() * geometry.radius + geometry.center_x;
            let screen_z = radians.sin() * geometry.radius;
            let opacity = if screen_z < cutoff || depth_span <= 0.0 {
                0.0
            } else {
                ((screen_z - cutoff) / depth_span).clamp(0.0, 1.0)
            };
            let is_major = minute % MAJOR_EVERY == 0;
            let label = is_major
                .then(|| format!("{}", (minute as f64 * minutes_per_tick).round() as u64));

            Tick {
                minute,
                angle_degrees: angle,
                screen_x,
                screen_z,
                opacity,
                is_major,
                label,
            }
        })
        .collect()
}

/// Canvas commands for the visible ticks plus the center indicator.
pub fn draw(ticks: &[Tick], geometry: &Geometry, palette: &Palette) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    let base = geometry.baseline_y;

    for tick in ticks.iter().filter(|t| t.visible()) {
        let (height, color) = if tick.is_major {
            (geometry.major_height, palette.accent)
        } else {
            (geometry.minor_height, palette.muted)
        };
        commands.push(DrawCommand::Line {
            start: Point::new(tick.screen_x, base),
            end: Point::new(tick.screen_x, base - height),
            width: geometry.stroke_width,
            color: color.with_opacity(tick.opacity),
        });
        if let Some(label) = &tick.label {
            commands.push(DrawCommand::Text {
                content: label.clone(),
                position: Point::new(tick.screen_x, base + geometry.label_offset),
                align: TextAlign::Center,
                size: geometry.label_size,
                color: palette.text.with_opacity(tick.opacity),
            });
        }
    }

    commands.push(DrawCommand::Line {
        start: Point::new(geometry.center_x, base + geometry.label_offset / 2.0),
        end: Point::new(geometry.center_x, base - geometry.major_height * 1.5),
        width: geometry.stroke_width * 2.0,
        color: palette.accent,
    });

    commands
}

/// Terminal rendering: an indicator row, a tick row and a label row.
pub fn view(displayed_ms: u64, max_minutes: u64, width: u16, palette: &Palette) -> String {
    let width = usize::from(width.max(1));
    let span = (width - 1) as f64;
    let geometry = Geometry::for_width(span, 0.0);
    let projected = ticks(displayed_ms, max_minutes, &geometry);

    let mut tick_row: Vec<Option<(char, f64, bool)>> = vec![None; width];
    let mut label_row: Vec<Option<(char, f64)>> = vec![None; width];

    // Nearer ticks win a shared column.
    let mut visible: Vec<&Tick> = projected.iter().filter(|t| t.visible()).collect();
    visible.sort_by(|a, b| a.screen_z.total_cmp(&b.screen_z));

    for tick in visible {
        let col = tick.screen_x.round().clamp(0.0, span) as usize;
        let glyph = match (tick.is_major, tick.opacity > 0.5) {
            (true, true) => '┃',
            (true, false) => '│',
            (false, true) => '╵',
            (false, false) => '·',
        };
        tick_row[col] = Some((glyph, tick.opacity, tick.is_major));

        if let Some(label) = &tick.label {
            let len = label.chars().count();
            let start = col.saturating_sub(len / 2);
            if start + len <= width {
                for (i, c) in label.chars().enumerate() {
                    label_row[start + i] = Some((c, tick.opacity));
                }
            }
        }
    }

    let paint = |glyph: char, color: crate::draw::Rgba, opacity: f64| {
        let hex = color.with_opacity(opacity).flatten_over(palette.background).to_hex();
        Style::new()
            .foreground(Color::from(hex.as_str()))
            .render(&glyph.to_string())
    };

    let center = width / 2;
    let mut indicator = " ".repeat(center);
    indicator.push_str(&paint('▼', palette.accent, 1.0));
    indicator.push_str(&" ".repeat(width - center - 1));

    let ticks_line: String = tick_row
        .iter()
        .map(|cell| match cell {
            Some((glyph, opacity, true)) => paint(*glyph, palette.accent, *opacity),
            Some((glyph, opacity, false)) => paint(*glyph, palette.muted, *opacity),
            None => " ".to_string(),
        })
        .collect();

    let labels_line: String = label_row
        .iter()
        .map(|cell| match cell {
            Some((c, opacity)) => paint(*c, palette.text, *opacity),
            None => " ".to_string(),
        })
        .collect();

    format!("{}\n{}\n{}", indicator, ticks_line, labels_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipgloss_extras::lipgloss::strip_ansi;

    const MAX_MINUTES: u64 = 60;

    #[test]
    fn test_sixty_ticks_twelve_major() {
        let geometry = Geometry::default();
        for ms in (1..=3_600_000u64).step_by(123_457) {
            let projected = ticks(ms, MAX_MINUTES, &geometry);
            assert_eq!(projected.len(), 60);
            assert_eq!(projected.iter().filter(|t| t.is_major).count(), 12);
            assert!(projected
                .iter()
                .all(|t| t.is_major == t.label.is_some()));
        }
    }

    #[test]
    fn test_selected_minute_is_centered() {
        let geometry = Geometry::default();
        let projected = ticks(900_000, MAX_MINUTES, &geometry);
        let front = &projected[15];
        assert!((front.angle_degrees - 90.0).abs() < 1e-9);
        assert!((front.screen_x - geometry.center_x).abs() < 1e-9);
        assert!((front.opacity - 1.0).abs() < 1e-9);
        assert_eq!(front.label.as_deref(), Some("15"));
    }

    #[test]
    fn test_rotation_offset() {
        assert_eq!(rotation_offset(0, 60), 90.0);
        assert_eq!(rotation_offset(900_000, 60), 180.0);
        assert_eq!(rotation_offset(3_600_000, 60), 450.0);
    }

    #[test]
    fn test_far_side_hidden() {
        let geometry = Geometry::default();
        let projected = ticks(900_000, MAX_MINUTES, &geometry);
        // The tick opposite the front is at 270 degrees.
        let back = &projected[45];
        assert!(back.screen_z < 0.0);
        assert_eq!(back.opacity, 0.0);
        assert!(!back.visible());

        for tick in &projected {
            if tick.screen_z < geometry.cutoff() {
                assert_eq!(tick.opacity, 0.0);
            } else {
                assert!(tick.opacity >= 0.0 && tick.opacity <= 1.0);
            }
        }
    }

    #[test]
    fn test_opacity_fades_with_depth() {
        let geometry = Geometry::default();
        let projected = ticks(900_000, MAX_MINUTES, &geometry);
        assert!(projected[15].opacity > projected[18].opacity);
        assert!(projected[18].opacity > projected[21].opacity);
        assert!((projected[12].opacity - projected[18].opacity).abs() < 1e-9);
    }

    #[test]
    fn test_larger_duration_moves_ticks_left() {
        let geometry = Geometry::default();
        let before = ticks(900_000, MAX_MINUTES, &geometry);
        let after = ticks(920_000, MAX_MINUTES, &geometry);
        assert!(after[15].screen_x < before[15].screen_x);
    }

    #[test]
    fn test_full_dial_matches_empty_rotation() {
        let geometry = Geometry::default();
        let full = ticks(3_600_000, MAX_MINUTES, &geometry);
        let zero = ticks(0, MAX_MINUTES, &geometry);
        for (a, b) in full.iter().zip(zero.iter()) {
            assert!((a.screen_x - b.screen_x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_draw_commands() {
        let geometry = Geometry::default();
        let projected = ticks(900_000, MAX_MINUTES, &geometry);
        let commands = draw(&projected, &geometry, &Palette::default());

        let visible = projected.iter().filter(|t| t.visible()).count();
        let labels = projected
            .iter()
            .filter(|t| t.visible() && t.is_major)
            .count();
        assert_eq!(commands.len(), visible + labels + 1);
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { content, .. } if content == "15"
        )));
    }

    #[test]
    fn test_terminal_view_shape() {
        let out = view(900_000, MAX_MINUTES, 41, &Palette::default());
        let plain = strip_ansi(&out);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(line.chars().count(), 41);
        }
        assert_eq!(lines[0].chars().nth(20), Some('▼'));
        assert_eq!(lines[1].chars().nth(20), Some('┃'));
        assert!(lines[2].contains("15"));
    }
}
