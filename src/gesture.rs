//! Pointer gesture resolution for the carousel ruler.
//!
//! A [`Resolver`] turns a stream of [`PointerEvent`]s into drag deltas while the
//! pointer is down, and into a [`Release`] once it comes up. Releases faster
//! than the fling threshold become [`Release::Fling`]; slower ones become
//! [`Release::Snap`].
//!
//! Horizontal motion maps to duration: moving the pointer left increases the
//! selected duration, moving it right decreases it.
//!
//! ```rust
//! use carousel_timer::gesture::{GestureOutcome, PointerEvent, Resolver};
//!
//! let mut resolver = Resolver::new(2_000.0, 80.0, 250);
//! assert_eq!(resolver.handle(&PointerEvent::down(100.0, 0)), GestureOutcome::Started);
//! assert_eq!(
//!     resolver.handle(&PointerEvent::moved(90.0, 16)),
//!     GestureOutcome::Drag { delta_ms: 20_000 }
//! );
//! ```

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Ring buffer size for velocity samples.
const HISTORY_SIZE: usize = 20;

/// A gap this long with almost no movement means the pointer had stopped.
const ASSUME_STOPPED_MS: i64 = 40;

/// Movement below this many pixels over [`ASSUME_STOPPED_MS`] counts as still.
const MIN_MOVEMENT_PX: f64 = 2.0;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// The pointer touched the ruler.
    Down,
    /// The pointer moved while down.
    Move,
    /// The pointer lifted.
    Up,
}

/// A pointer event delivered by the host, in pixels and milliseconds.
///
/// This is also the message type the dial accepts through `update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Down, Move or Up.
    pub kind: PointerKind,
    /// Horizontal position in pixels.
    pub x: f64,
    /// Host clock in milliseconds. Only differences matter.
    pub timestamp_ms: i64,
}

impl PointerEvent {
    /// A Down event at `x`.
    pub fn down(x: f64, timestamp_ms: i64) -> Self {
        Self {
            kind: PointerKind::Down,
            x,
            timestamp_ms,
        }
    }

    /// A Move event at `x`.
    pub fn moved(x: f64, timestamp_ms: i64) -> Self {
        Self {
            kind: PointerKind::Move,
            x,
            timestamp_ms,
        }
    }

    /// An Up event at `x`.
    pub fn up(x: f64, timestamp_ms: i64) -> Self {
        Self {
            kind: PointerKind::Up,
            x,
            timestamp_ms,
        }
    }

    /// Converts a crossterm left-button mouse event.
    ///
    /// Terminals report cells rather than pixels, so the column is scaled by
    /// `cell_width_px`. crossterm events carry no timestamp; the caller
    /// supplies one from its own clock. Other buttons, plain motion and wheel
    /// events return `None`.
    pub fn from_mouse(event: &MouseEvent, timestamp_ms: i64, cell_width_px: f64) -> Option<Self> {
        let x = f64::from(event.column) * cell_width_px;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Self::down(x, timestamp_ms)),
            MouseEventKind::Drag(MouseButton::Left) => Some(Self::moved(x, timestamp_ms)),
            MouseEventKind::Up(MouseButton::Left) => Some(Self::up(x, timestamp_ms)),
            _ => None,
        }
    }
}

/// One buffered pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    /// Horizontal position in pixels.
    pub position_x: f64,
    /// When the position was observed.
    pub timestamp_ms: i64,
}

/// Horizontal release velocity. Always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityEstimate {
    /// Positive when moving right.
    pub pixels_per_second_x: f64,
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Released above the fling threshold; the dial projects a landing minute.
    Fling(VelocityEstimate),
    /// Released slowly; the dial snaps to the minute under it.
    Snap(VelocityEstimate),
}

impl Release {
    /// Release velocity in px/s.
    pub fn velocity(&self) -> f64 {
        match self {
            Release::Fling(v) | Release::Snap(v) => v.pixels_per_second_x,
        }
    }
}

/// What a single pointer event resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// A drag began. Any running countdown or animation must stop.
    Started,
    /// Add `delta_ms` to the current duration.
    Drag {
        /// Positive when the pointer moved left.
        delta_ms: i64,
    },
    /// The drag ended.
    Released(Release),
    /// Move or Up without a preceding Down.
    Ignored,
}

/// Least-squares velocity over a sliding time window.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: [Option<GestureSample>; HISTORY_SIZE],
    index: usize,
    window_ms: i64,
}

impl VelocityTracker {
    /// An empty tracker that considers the last `window_ms` of samples.
    pub fn new(window_ms: u64) -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
            window_ms: window_ms as i64,
        }
    }

    /// Records a sample, evicting the oldest once the buffer is full.
    pub fn add(&mut self, sample: GestureSample) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(sample);
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    /// Velocity in px/s over the samples inside the window.
    ///
    /// Returns 0.0 with fewer than two samples, when the pointer had come to
    /// rest, or when the estimate would not be finite.
    pub fn velocity(&self) -> f64 {
        let newest = match self.samples[self.index] {
            Some(s) => s,
            None => return 0.0,
        };

        let mut points = [(0.0f64, 0.0f64); HISTORY_SIZE];
        let mut count = 0;
        let mut oldest = newest;
        let mut cursor = self.index;

        while count < HISTORY_SIZE {
            let sample = match self.samples[cursor] {
                Some(s) => s,
                None => break,
            };
            let age = newest.timestamp_ms - sample.timestamp_ms;
            if age > self.window_ms || age < 0 {
                break;
            }
            oldest = sample;
            points[count] = (-(age as f64), sample.position_x);
            count += 1;
            cursor = (cursor + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return 0.0;
        }

        let span_ms = newest.timestamp_ms - oldest.timestamp_ms;
        if span_ms > ASSUME_STOPPED_MS
            && (newest.position_x - oldest.position_x).abs() < MIN_MOVEMENT_PX
        {
            return 0.0;
        }

        let per_ms = weighted_slope(&points[..count]);
        let velocity = per_ms * 1000.0;
        if velocity.is_finite() {
            velocity
        } else {
            0.0
        }
    }
}

/// Slope of `x = a + b*t`, with recent samples (lower index) weighted more.
fn weighted_slope(points: &[(f64, f64)]) -> f64 {
    let decay = 0.95f64;
    let (mut sw, mut st, mut sx, mut stt, mut stx) = (0.0, 0.0, 0.0, 0.0, 0.0);

    for (i, &(t, x)) in points.iter().enumerate() {
        let w = decay.powi(i as i32);
        sw += w;
        st += w * t;
        sx += w * x;
        stt += w * t * t;
        stx += w * t * x;
    }

    let denom = sw * stt - st * st;
    if denom.abs() < f64::EPSILON {
        return 0.0;
    }
    (sw * stx - st * sx) / denom
}

/// Converts pointer events into drag deltas and release decisions.
///
/// The sample buffer belongs to one gesture: it is cleared on every Down and
/// after every Up.
#[derive(Debug, Clone)]
pub struct Resolver {
    tracker: VelocityTracker,
    previous_x: Option<f64>,
    start_x: f64,
    ms_per_px: f64,
    min_velocity: f64,
}

impl Resolver {
    /// A resolver converting pixels at `ms_per_px` and flinging above
    /// `min_velocity` px/s.
    pub fn new(ms_per_px: f64, min_velocity: f64, window_ms: u64) -> Self {
        Self {
            tracker: VelocityTracker::new(window_ms),
            previous_x: None,
            start_x: 0.0,
            ms_per_px,
            min_velocity,
        }
    }

    /// Whether a pointer is currently down on the ruler.
    pub fn dragging(&self) -> bool {
        self.previous_x.is_some()
    }

    /// Net horizontal travel of the current gesture.
    pub fn travel(&self) -> f64 {
        self.previous_x.map_or(0.0, |x| x - self.start_x)
    }

    /// Resolves one pointer event.
    pub fn handle(&mut self, event: &PointerEvent) -> GestureOutcome {
        let sample = GestureSample {
            position_x: event.x,
            timestamp_ms: event.timestamp_ms,
        };

        match event.kind {
            PointerKind::Down => {
                self.tracker.reset();
                self.tracker.add(sample);
                self.start_x = event.x;
                self.previous_x = Some(event.x);
                GestureOutcome::Started
            }
            PointerKind::Move => {
                let Some(previous) = self.previous_x else {
                    return GestureOutcome::Ignored;
                };
                self.tracker.add(sample);
                self.previous_x = Some(event.x);
                let delta_ms = ((previous - event.x) * self.ms_per_px).round() as i64;
                GestureOutcome::Drag { delta_ms }
            }
            PointerKind::Up => {
                if self.previous_x.is_none() {
                    return GestureOutcome::Ignored;
                }
                self.tracker.add(sample);
                let estimate = VelocityEstimate {
                    pixels_per_second_x: self.tracker.velocity(),
                };
                self.tracker.reset();
                self.previous_x = None;

                if estimate.pixels_per_second_x.abs() > self.min_velocity {
                    GestureOutcome::Released(Release::Fling(estimate))
                } else {
                    GestureOutcome::Released(Release::Snap(estimate))
                }
            }
        }
    }
}
