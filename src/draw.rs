//! Render commands produced for the host surface.
//!
//! Hosts with a real canvas consume [`DrawCommand`]s from
//! [`Dial::draw`](crate::dial::Model::draw). Coordinates are in the host's
//! pixel space; angles are in degrees, clockwise from 3 o'clock, which matches
//! most 2D canvas APIs. Opacity travels in the color's alpha channel.

/// A point in host pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate, growing rightward.
    pub x: f64,
    /// Vertical coordinate, growing downward.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An sRGB color with alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity: 0 is invisible, 1 is opaque.
    pub a: f64,
}

impl Rgba {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses `#RRGGBB` (either case). Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats as uppercase `#RRGGBB`, dropping alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// The same color with alpha set to `opacity`, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.a = opacity.clamp(0.0, 1.0);
        self
    }

    /// Blends toward `background` by the alpha channel, for surfaces without
    /// transparency such as terminals.
    pub fn flatten_over(&self, background: Rgba) -> Rgba {
        let mix = |fg: u8, bg: u8| {
            (f64::from(fg) * self.a + f64::from(bg) * (1.0 - self.a)).round() as u8
        };
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// Horizontal anchoring of text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at the position.
    Left,
    /// Text is centered on the position.
    Center,
    /// Text ends at the position.
    Right,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A straight segment.
    Line {
        /// First end point.
        start: Point,
        /// Second end point.
        end: Point,
        /// Stroke width.
        width: f64,
        /// Stroke color and opacity.
        color: Rgba,
    },
    /// A stroked arc of a circle.
    Arc {
        /// Circle center.
        center: Point,
        /// Circle radius.
        radius: f64,
        /// Where the arc begins.
        start_degrees: f64,
        /// Clockwise extent, in `[0, 360]`.
        sweep_degrees: f64,
        /// Stroke width.
        stroke_width: f64,
        /// Stroke color and opacity.
        color: Rgba,
    },
    /// A circle outline.
    Circle {
        /// Circle center.
        center: Point,
        /// Circle radius.
        radius: f64,
        /// Stroke width.
        stroke_width: f64,
        /// Stroke color and opacity.
        color: Rgba,
    },
    /// A run of text.
    Text {
        /// The text itself.
        content: String,
        /// Anchor point; see `align`.
        position: Point,
        /// Horizontal placement relative to `position`.
        align: TextAlign,
        /// Font size in pixels.
        size: f64,
        /// Fill color and opacity.
        color: Rgba,
    },
}

/// Colors shared by the canvas and terminal renderings.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Progress arc and major ticks.
    pub accent: Rgba,
    /// Minor ticks and the progress track.
    pub muted: Rgba,
    /// Labels.
    pub text: Rgba,
    /// Surface color used when flattening opacity.
    pub background: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: Rgba::rgb(0x75, 0x71, 0xF9),
            muted: Rgba::rgb(0x60, 0x60, 0x60),
            text: Rgba::rgb(0xEE, 0xEE, 0xEE),
            background: Rgba::rgb(0x00, 0x00, 0x00),
        }
    }
}
