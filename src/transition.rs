//! Timed interpolation between two values.
//!
//! A [`Transition`] animates a scalar from one value to another over a fixed
//! window, advancing one frame per [`FrameMsg`]. The dial uses one for the
//! ruler's snap-back (values in milliseconds) and one for the progress circle's
//! catch-up (values as a sweep fraction).
//!
//! Like the countdown ticker, frames carry an instance id and a generation tag
//! so a canceled or restarted transition ignores frames already in flight.
//! Completion is reported as [`FrameOutcome::Settled`], separate from any
//! countdown expiry.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management for transition instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

const FPS: u64 = 60;

/// Easing curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingFunction {
    /// Constant speed
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    #[default]
    EaseOut,
    /// Slow at both ends
    EaseInOut,
}

impl TimingFunction {
    /// Maps progress `t` in `[0, 1]` onto the curve.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingFunction::Linear => t,
            TimingFunction::EaseIn => t * t,
            TimingFunction::EaseOut => t * (2.0 - t),
            TimingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Where a transition is within its window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimPhase {
    /// Inside the window.
    Running {
        /// Linear progress in `[0, 1)`, before easing.
        progress: f64,
    },
    /// Idle, or the window has elapsed.
    Completed,
}

/// Animation frame for a specific transition generation.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    /// Instance that scheduled the frame.
    pub id: i64,
    tag: i64,
}

/// Result of a frame accepted by the current generation.
pub enum FrameOutcome {
    /// Interpolated value for this frame, with the command for the next one.
    Frame {
        /// Eased value for this frame.
        value: f64,
        /// Schedules the following frame.
        next: Cmd,
    },
    /// The window has elapsed and the value rests on its target.
    Settled {
        /// The target value.
        value: f64,
    },
}

/// A cancelable interpolation from `from` to `to`.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Easing applied to every frame.
    pub timing: TimingFunction,
    id: i64,
    tag: i64,
    from: f64,
    to: f64,
    window: Duration,
    elapsed: Duration,
    active: bool,
}

impl Transition {
    /// An idle transition using `timing`.
    pub fn new(timing: TimingFunction) -> Self {
        Self {
            timing,
            id: next_id(),
            tag: 0,
            from: 0.0,
            to: 0.0,
            window: Duration::ZERO,
            elapsed: Duration::ZERO,
            active: false,
        }
    }

    /// Unique instance id carried by this transition's frames.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current generation. Changes on every start, cancel and settle.
    pub fn generation(&self) -> i64 {
        self.tag
    }

    /// Whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.active
    }

    /// Value the current or last transition heads for.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Length of the current or last transition.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Begins a new transition, replacing any in flight, and schedules its
    /// first frame.
    ///
    /// A zero window settles on the first frame.
    pub fn start(&mut self, from: f64, to: f64, window_ms: u64) -> Cmd {
        self.begin(from, to, window_ms);
        self.next_frame()
    }

    /// Like [`start`](Self::start) but schedules nothing. The caller steps
    /// the transition with [`advance`](Self::advance), e.g. on another
    /// transition's frames.
    pub fn begin(&mut self, from: f64, to: f64, window_ms: u64) {
        self.from = from;
        self.to = to;
        self.window = Duration::from_millis(window_ms);
        self.elapsed = Duration::ZERO;
        self.active = true;
        self.tag += 1;
        log::debug!(
            "transition {} started: {} -> {} over {}ms",
            self.id,
            from,
            to,
            window_ms
        );
    }

    /// Stops the transition where it is. Calling it again has no effect.
    pub fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.from = self.value();
        self.active = false;
        self.tag += 1;
        log::debug!("transition {} canceled at {}", self.id, self.from);
    }

    /// Where the transition is within its window.
    pub fn phase(&self) -> AnimPhase {
        if !self.active || self.elapsed >= self.window {
            AnimPhase::Completed
        } else {
            let progress = self.elapsed.as_secs_f64() / self.window.as_secs_f64();
            AnimPhase::Running {
                progress: progress.clamp(0.0, 1.0),
            }
        }
    }

    /// The interpolated value for the current frame.
    ///
    /// An idle transition reports where it last came to rest.
    pub fn value(&self) -> f64 {
        if !self.active {
            return self.from;
        }
        match self.phase() {
            AnimPhase::Running { progress } => {
                self.from + (self.to - self.from) * self.timing.evaluate(progress)
            }
            AnimPhase::Completed => self.to,
        }
    }

    /// A frame message for the current generation.
    pub fn frame_msg(&self) -> FrameMsg {
        FrameMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    fn frame_duration() -> Duration {
        Duration::from_nanos(1_000_000_000 / FPS)
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(Self::frame_duration(), move |_| {
            Box::new(FrameMsg { id, tag }) as Msg
        })
    }

    /// Advances one frame.
    ///
    /// Returns `None` for frames from another transition, from an earlier
    /// generation, or arriving while idle.
    pub fn update(&mut self, msg: &FrameMsg) -> Option<FrameOutcome> {
        if msg.id != self.id || msg.tag != self.tag || !self.active {
            return None;
        }

        if self.advance() {
            Some(FrameOutcome::Frame {
                value: self.value(),
                next: self.next_frame(),
            })
        } else {
            Some(FrameOutcome::Settled { value: self.to })
        }
    }

    /// Steps one frame. Returns `true` while the transition is still running
    /// afterwards; settling or an idle transition returns `false`.
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(Self::frame_duration());

        if self.elapsed >= self.window {
            self.active = false;
            self.from = self.to;
            self.tag += 1;
            log::debug!("transition {} settled at {}", self.id, self.to);
            return false;
        }

        log::trace!("transition {} frame: {}", self.id, self.value());
        true
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(TimingFunction::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(t: &mut Transition) -> (usize, f64) {
        let mut frames = 0;
        loop {
            let msg = t.frame_msg();
            match t.update(&msg) {
                Some(FrameOutcome::Frame { .. }) => frames += 1,
                Some(FrameOutcome::Settled { value }) => return (frames, value),
                None => panic!("live frame rejected"),
            }
        }
    }

    #[test]
    fn test_timing_functions() {
        for timing in [
            TimingFunction::Linear,
            TimingFunction::EaseIn,
            TimingFunction::EaseOut,
            TimingFunction::EaseInOut,
        ] {
            assert_eq!(timing.evaluate(0.0), 0.0);
            assert!((timing.evaluate(1.0) - 1.0).abs() < 1e-12);
        }
        assert!(TimingFunction::EaseIn.evaluate(0.5) < 0.5);
        assert!(TimingFunction::EaseOut.evaluate(0.5) > 0.5);
        assert_eq!(TimingFunction::Linear.evaluate(0.25), 0.25);
    }

    #[test]
    fn test_idle_transition() {
        let t = Transition::default();
        assert!(!t.is_animating());
        assert_eq!(t.phase(), AnimPhase::Completed);
        assert_eq!(t.timing, TimingFunction::EaseOut);
    }

    #[test]
    fn test_runs_to_target() {
        let mut t = Transition::new(TimingFunction::Linear);
        let _ = t.start(920_000.0, 660_000.0, 250);
        assert!(t.is_animating());
        assert_eq!(t.value(), 920_000.0);

        let msg = t.frame_msg();
        match t.update(&msg) {
            Some(FrameOutcome::Frame { value, .. }) => {
                assert!(value < 920_000.0 && value > 660_000.0);
            }
            _ => panic!("expected a frame"),
        }

        let (_, settled) = run_to_end(&mut t);
        assert_eq!(settled, 660_000.0);
        assert!(!t.is_animating());
        assert_eq!(t.value(), 660_000.0);
    }

    #[test]
    fn test_frame_count_matches_window() {
        let mut t = Transition::new(TimingFunction::Linear);
        let _ = t.start(0.0, 1.0, 250);
        let (frames, _) = run_to_end(&mut t);
        // 60 fps over 250ms.
        assert_eq!(frames, 15);
    }

    #[test]
    fn test_zero_window_settles_on_first_frame() {
        let mut t = Transition::default();
        let _ = t.start(5.0, 10.0, 0);
        let (frames, value) = run_to_end(&mut t);
        assert_eq!(frames, 0);
        assert_eq!(value, 10.0);
    }

    #[test]
    fn test_cancel_drops_in_flight_frames() {
        let mut t = Transition::new(TimingFunction::Linear);
        let _ = t.start(0.0, 100.0, 1_000);
        let msg = t.frame_msg();
        t.update(&msg);
        let in_flight = t.frame_msg();
        let resting = t.value();

        t.cancel();
        assert!(t.update(&in_flight).is_none());
        assert_eq!(t.value(), resting);

        let generation = t.generation();
        t.cancel();
        assert_eq!(t.generation(), generation);
    }

    #[test]
    fn test_begin_and_advance_without_messages() {
        let mut t = Transition::new(TimingFunction::Linear);
        t.begin(0.0, 1.0, 250);
        assert!(t.is_animating());

        let mut steps = 0;
        while t.advance() {
            steps += 1;
            assert!(t.value() > 0.0 && t.value() < 1.0);
        }
        assert_eq!(steps, 15);
        assert_eq!(t.value(), 1.0);
        assert!(!t.is_animating());
        assert!(!t.advance());
    }

    #[test]
    fn test_restart_drops_old_generation() {
        let mut t = Transition::default();
        let _ = t.start(0.0, 100.0, 1_000);
        let old = t.frame_msg();
        let _ = t.start(50.0, 60.0, 1_000);
        assert!(t.update(&old).is_none());
        assert_eq!(t.target(), 60.0);
    }

    #[test]
    fn test_foreign_frame_dropped() {
        let mut a = Transition::default();
        let mut b = Transition::default();
        let _ = a.start(0.0, 1.0, 100);
        let _ = b.start(0.0, 1.0, 100);
        let from_b = b.frame_msg();
        assert!(a.update(&from_b).is_none());
    }
}
