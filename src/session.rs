//! Countdown session state and transitions.
//!
//! [`TimerSession`] is the single mutable root of a dial: remaining time,
//! selected duration, countdown state and the length of the transition in
//! flight. It is only changed through the transition methods below. Each
//! returns the [`Effect`]s the owner has to carry out (start or cancel the
//! ticker, run or stop the snap-back), so the session itself never touches a
//! timer and can be tested without one.
//!
//! ```text
//!              play                     tick budget spent
//!   Idle ─────────────────▶ Playing ─────────────────────▶ Stopped
//!    ▲                        │  play again / pointer down    │
//!    │      release           ▼                               │
//!    └──────────────────── Stopped ◀───── pointer down ───────┘
//! ```

use crate::duration::{
    fling_target, nearest_minute, normalize, to_seconds, transition_duration,
};
use crate::gesture::Release;

/// Countdown phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownState {
    /// A duration is selected but no countdown has run since.
    #[default]
    Idle,
    /// Reserved for an interrupted countdown that keeps its remaining time.
    /// No built-in transition enters it.
    Paused,
    /// The ticking service is running.
    Playing,
    /// The countdown ran out, or was stopped by a tap or a touch on the dial.
    Stopped,
}

/// Side effects requested by a session transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the ticker with this budget.
    StartTicking {
        /// Budget to count down.
        duration_ms: u64,
    },
    /// Stop the ticker and drop its in-flight ticks.
    CancelTicking,
    /// Run the ruler from `from_ms` to `to_ms` and the progress circle from
    /// `from_fraction` to full. `to_ms` is not normalized, so the ruler takes
    /// the short way across the dial's zero point.
    Animate {
        /// Ruler start value.
        from_ms: i64,
        /// Ruler end value, possibly outside `(0, max]`.
        to_ms: i64,
        /// Progress circle start fraction.
        from_fraction: f64,
        /// Animation length.
        window_ms: u64,
    },
    /// Stop both animations and drop their in-flight frames.
    CancelAnimation,
}

/// Release timing inputs, taken from the dial's configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseTiming {
    /// Snap-back length and fling animation quantum.
    pub base_transition_ms: u64,
}

/// The mutable root of one dial.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSession {
    current_ms: u64,
    timeout_ms: u64,
    state: CountdownState,
    animation_window_ms: u64,
    max_time_ms: u64,
}

impl TimerSession {
    /// A session showing `timeout_ms`, idle.
    ///
    /// `max_time_ms` must be non-zero; the dial validates its configuration
    /// before creating a session.
    pub fn new(timeout_ms: u64, max_time_ms: u64) -> Self {
        let timeout_ms = normalize(timeout_ms as i64, max_time_ms);
        Self {
            current_ms: timeout_ms,
            timeout_ms,
            state: CountdownState::Idle,
            animation_window_ms: 0,
            max_time_ms,
        }
    }

    /// Remaining time.
    pub fn current_ms(&self) -> u64 {
        self.current_ms
    }

    /// Selected duration.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Countdown phase.
    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Length of the transition in flight; 0 when settled.
    pub fn animation_window_ms(&self) -> u64 {
        self.animation_window_ms
    }

    /// Dial span.
    pub fn max_time_ms(&self) -> u64 {
        self.max_time_ms
    }

    /// Whether the countdown is running.
    pub fn is_playing(&self) -> bool {
        self.state == CountdownState::Playing
    }

    /// Pointer down on the ruler. Interrupts any countdown; its remaining time
    /// is dropped because touching the dial means choosing a new time.
    pub fn begin_drag(&mut self) -> Vec<Effect> {
        log::debug!("drag started in {:?} at {}ms", self.state, self.current_ms);
        self.state = CountdownState::Stopped;
        self.animation_window_ms = 0;
        vec![Effect::CancelTicking, Effect::CancelAnimation]
    }

    /// Adds a drag delta to the remaining time, wrapping around the dial.
    pub fn drag_by(&mut self, delta_ms: i64) {
        let raw = (self.current_ms as i64).saturating_add(delta_ms);
        self.current_ms = normalize(raw, self.max_time_ms);
    }

    /// Pointer up: settles on a minute boundary and selects it.
    ///
    /// A fling projects its landing minute from the release velocity and
    /// animates for a time scaled by that velocity; a snap settles on the
    /// minute under the pointer in one base transition. A countdown started
    /// during the drag is stopped, since the release selects a new time.
    pub fn resolve_release(&mut self, release: Release, timing: ReleaseTiming) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state == CountdownState::Playing {
            effects.push(Effect::CancelTicking);
        }

        let from_ms = self.current_ms as i64;
        let from_fraction = crate::progress::fraction(self.current_ms, self.timeout_ms);
        let seconds = to_seconds(self.current_ms);

        let (target_seconds, window_ms) = match release {
            Release::Fling(v) => (
                fling_target(seconds, v.pixels_per_second_x),
                transition_duration(timing.base_transition_ms, v.pixels_per_second_x),
            ),
            Release::Snap(_) => (nearest_minute(seconds), timing.base_transition_ms),
        };

        // Far flings cannot be scaled to milliseconds; land on the same
        // minute of the dial instead.
        let to_ms = target_seconds.checked_mul(1000).unwrap_or_else(|| {
            let span_seconds = (self.max_time_ms / 1000).max(1) as i64;
            target_seconds.rem_euclid(span_seconds) * 1000
        });
        self.select(to_ms, window_ms);
        log::debug!(
            "released ({:?}): {}ms -> {}ms over {}ms",
            release,
            from_ms,
            self.timeout_ms,
            window_ms
        );

        effects.push(Effect::Animate {
            from_ms,
            to_ms,
            from_fraction,
            window_ms,
        });
        effects
    }

    /// Moves the selection by `delta_ms`, then snaps like a slow release.
    ///
    /// Used by keyboard nudges and reset, which have no pointer to track.
    pub fn nudge(&mut self, delta_ms: i64, timing: ReleaseTiming) -> Vec<Effect> {
        let mut effects = self.begin_drag();
        self.drag_by(delta_ms);
        effects.extend(self.resolve_release(
            Release::Snap(crate::gesture::VelocityEstimate {
                pixels_per_second_x: 0.0,
            }),
            timing,
        ));
        effects
    }

    fn select(&mut self, raw_ms: i64, window_ms: u64) {
        let selected = normalize(raw_ms, self.max_time_ms);
        self.current_ms = selected;
        self.timeout_ms = selected;
        self.state = CountdownState::Idle;
        self.animation_window_ms = window_ms;
    }

    /// Play control tapped. Starts the countdown unless it is running, in
    /// which case it stops it. Starting cuts any snap-back short; the selected
    /// value is already final.
    ///
    /// A countdown that already ran out restarts from the selected duration.
    pub fn toggle_play(&mut self) -> Vec<Effect> {
        if self.state == CountdownState::Playing {
            log::debug!("countdown stopped by user at {}ms", self.current_ms);
            self.state = CountdownState::Stopped;
            return vec![Effect::CancelTicking];
        }

        if self.current_ms == 0 {
            self.current_ms = self.timeout_ms;
        }
        self.state = CountdownState::Playing;
        self.animation_window_ms = 0;
        log::debug!("countdown started from {}ms", self.current_ms);
        vec![
            Effect::CancelAnimation,
            Effect::StartTicking {
                duration_ms: self.current_ms,
            },
        ]
    }

    /// A live tick reported the remaining time.
    pub fn on_tick(&mut self, remaining_ms: u64) {
        if self.state != CountdownState::Playing {
            return;
        }
        self.current_ms = remaining_ms;
    }

    /// The ticking service spent its budget.
    pub fn on_countdown_expired(&mut self) -> Vec<Effect> {
        if self.state != CountdownState::Playing {
            return Vec::new();
        }
        log::debug!("countdown expired");
        self.current_ms = 0;
        self.state = CountdownState::Stopped;
        vec![Effect::CancelTicking]
    }

    /// The ruler's snap-back reached `value_ms`.
    ///
    /// Only applies while idle: a drag or countdown that started in the
    /// meantime owns the value now.
    pub fn on_animation_settled(&mut self, value_ms: f64) {
        self.animation_window_ms = 0;
        if self.state != CountdownState::Idle {
            return;
        }
        let settled = normalize(value_ms.round() as i64, self.max_time_ms);
        self.current_ms = settled;
        self.timeout_ms = settled;
    }
}
