//! The countdown dial widget.
//!
//! A dial pairs a progress circle with a carousel ruler. Dragging the ruler
//! picks a duration, releasing it settles on a whole minute, and the play
//! control starts or stops the countdown.
//!
//! The dial follows the Elm architecture: feed every message to
//! [`Model::update`] and render with [`Model::view`] (terminal) or
//! [`Model::draw`] (canvas commands). Pointer input arrives as
//! [`PointerEvent`] messages; terminal hosts can forward crossterm mouse
//! events through [`Model::handle_mouse`].
//!
//! # Basic Usage
//!
//! ```rust
//! use carousel_timer::dial::new;
//! use carousel_timer::gesture::PointerEvent;
//!
//! let mut dial = new(&[]);
//! assert_eq!(dial.current_ms(), 900_000);
//!
//! // Drag ten pixels to the left: two seconds per pixel.
//! dial.update(Box::new(PointerEvent::down(100.0, 0)));
//! dial.update(Box::new(PointerEvent::moved(90.0, 16)));
//! assert_eq!(dial.current_ms(), 920_000);
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use carousel_timer::prelude::*;
//!
//! struct App {
//!     dial: Dial,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut dial = dial_new(&[with_default_timeout(300_000)]);
//!         let cmd = dial.focus();
//!         (Self { dial }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.dial.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.dial.view()
//!     }
//! }
//! ```

use crate::config::{Config, DialOption};
use crate::draw::{DrawCommand, Palette};
use crate::duration::normalize;
use crate::error::Result;
use crate::gesture::{GestureOutcome, PointerEvent, Resolver};
use crate::key::KeyMap;
use crate::progress;
use crate::ruler;
use crate::session::{CountdownState, Effect, ReleaseTiming, TimerSession};
use crate::timer::{TickMsg, TickOutcome, Ticker};
use crate::transition::{FrameMsg, FrameOutcome, TimingFunction, Transition};
use crate::Component;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::MouseEvent;
use lipgloss_extras::lipgloss::{Color, Style};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management for dial instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// A tap on the play/pause control.
///
/// An `id` of 0 addresses every dial; otherwise only the dial with that id
/// reacts.
#[derive(Debug, Clone)]
pub struct PlayPauseMsg {
    /// Target dial, or 0 for all.
    pub id: i64,
}

/// A countdown dial.
#[derive(Debug, Clone)]
pub struct Model {
    /// Keyboard bindings, active while focused.
    pub keymap: KeyMap,
    /// Colors for both renderings.
    pub palette: Palette,
    /// Canvas placement of the ruler.
    pub ruler_geometry: ruler::Geometry,
    /// Canvas placement of the progress circle.
    pub progress_geometry: progress::Geometry,
    config: Config,
    session: TimerSession,
    resolver: Resolver,
    ticker: Ticker,
    ruler_transition: Transition,
    progress_transition: Transition,
    progress_bar: progress::Model,
    focused: bool,
    id: i64,
}

/// Creates a dial from options applied over [`Config::default`].
///
/// If the options produce an invalid configuration the default configuration
/// is used instead and a warning is logged. Use [`try_new`] to get the error.
pub fn new(opts: &[DialOption]) -> Model {
    let mut config = Config::default();
    for opt in opts {
        opt.apply(&mut config);
    }
    match config.validate() {
        Ok(()) => Model::from_config(config),
        Err(err) => {
            log::warn!("invalid dial options ({}), using defaults", err);
            Model::from_config(Config::default())
        }
    }
}

/// Creates a dial from a full configuration, rejecting invalid ones.
pub fn try_new(config: Config) -> Result<Model> {
    config.validate()?;
    Ok(Model::from_config(config))
}

impl Model {
    fn from_config(config: Config) -> Self {
        let palette = config.palette();
        let progress_bar = progress::new(&[
            progress::with_width(i32::from(config.ruler_width)),
            progress::with_solid_fill(palette.accent.to_hex()),
            progress::with_track_color(palette.muted.to_hex()),
        ]);
        Self {
            keymap: KeyMap::default(),
            palette,
            ruler_geometry: ruler::Geometry::for_width(360.0, 400.0),
            progress_geometry: progress::Geometry::default(),
            session: TimerSession::new(config.default_timeout_ms, config.max_time_ms),
            resolver: Resolver::new(
                config.drag_ms_per_px,
                config.min_fling_velocity,
                config.velocity_window_ms,
            ),
            ticker: Ticker::new(config.tick_interval_ms),
            ruler_transition: Transition::new(TimingFunction::EaseOut),
            progress_transition: Transition::new(TimingFunction::EaseOut),
            progress_bar,
            config,
            focused: false,
            id: next_id(),
        }
    }

    /// Unique instance id, as used by [`PlayPauseMsg`].
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The validated configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the session.
    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    /// Countdown phase.
    pub fn state(&self) -> CountdownState {
        self.session.state()
    }

    /// Remaining time.
    pub fn current_ms(&self) -> u64 {
        self.session.current_ms()
    }

    /// Selected duration.
    pub fn timeout_ms(&self) -> u64 {
        self.session.timeout_ms()
    }

    /// Whether a snap-back is in flight.
    pub fn is_animating(&self) -> bool {
        self.ruler_transition.is_animating()
    }

    /// The duration the ruler shows: the animated value during a snap-back,
    /// otherwise the remaining time. Always in `(0, max_time_ms]`.
    pub fn displayed_ms(&self) -> u64 {
        let raw = if self.ruler_transition.is_animating() {
            self.ruler_transition.value().round() as i64
        } else {
            self.session.current_ms() as i64
        };
        normalize(raw, self.config.max_time_ms)
    }

    /// The fraction the progress circle shows, including its catch-up.
    pub fn displayed_fraction(&self) -> f64 {
        if self.progress_transition.is_animating() {
            self.progress_transition.value().clamp(0.0, 1.0)
        } else {
            progress::fraction(self.session.current_ms(), self.session.timeout_ms())
        }
    }

    /// A command that taps this dial's play control.
    pub fn play_pause(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(PlayPauseMsg { id }) as Msg
        })
    }

    fn timing(&self) -> ReleaseTiming {
        ReleaseTiming {
            base_transition_ms: self.config.base_transition_ms,
        }
    }

    /// Starts the countdown, or stops it if running.
    pub fn toggle(&mut self) -> Option<Cmd> {
        let effects = self.session.toggle_play();
        self.apply(effects)
    }

    /// Feeds one pointer event through the gesture resolver.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Cmd> {
        match self.resolver.handle(event) {
            GestureOutcome::Started => {
                let effects = self.session.begin_drag();
                self.apply(effects)
            }
            GestureOutcome::Drag { delta_ms } => {
                self.session.drag_by(delta_ms);
                None
            }
            GestureOutcome::Released(release) => {
                let timing = self.timing();
                let effects = self.session.resolve_release(release, timing);
                self.apply(effects)
            }
            GestureOutcome::Ignored => None,
        }
    }

    /// Forwards a crossterm mouse event, stamped with the caller's clock.
    pub fn handle_mouse(&mut self, event: &MouseEvent, timestamp_ms: i64) -> Option<Cmd> {
        let pointer = PointerEvent::from_mouse(event, timestamp_ms, self.config.cell_width_px)?;
        self.handle_pointer(&pointer)
    }

    fn handle_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if !self.focused {
            return None;
        }
        if self.keymap.toggle.matches(key_msg) {
            return self.toggle();
        }
        let delta_ms = if self.keymap.increase.matches(key_msg) {
            60_000
        } else if self.keymap.decrease.matches(key_msg) {
            -60_000
        } else if self.keymap.reset.matches(key_msg) {
            self.config.default_timeout_ms as i64 - self.session.current_ms() as i64
        } else {
            return None;
        };
        let timing = self.timing();
        let effects = self.session.nudge(delta_ms, timing);
        self.apply(effects)
    }

    fn on_tick(&mut self, tick_msg: &TickMsg) -> Option<Cmd> {
        match self.ticker.update(tick_msg)? {
            TickOutcome::Tick { remaining_ms, next } => {
                self.session.on_tick(remaining_ms);
                Some(next)
            }
            TickOutcome::Expired => {
                let effects = self.session.on_countdown_expired();
                self.apply(effects)
            }
        }
    }

    fn on_frame(&mut self, frame_msg: &FrameMsg) -> Option<Cmd> {
        let outcome = self.ruler_transition.update(frame_msg)?;

        // The progress catch-up runs on the ruler's frame clock.
        self.progress_transition.advance();

        match outcome {
            FrameOutcome::Frame { next, .. } => Some(next),
            FrameOutcome::Settled { value } => {
                self.progress_transition.cancel();
                self.session.on_animation_settled(value);
                None
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Option<Cmd> {
        let mut cmd = None;
        for effect in effects {
            match effect {
                Effect::StartTicking { duration_ms } => {
                    cmd = self.ticker.start(duration_ms);
                }
                Effect::CancelTicking => self.ticker.cancel(),
                Effect::Animate {
                    from_ms,
                    to_ms,
                    from_fraction,
                    window_ms,
                } => {
                    // Frames for the progress catch-up come from the ruler.
                    self.progress_transition.begin(from_fraction, 1.0, window_ms);
                    cmd = Some(
                        self.ruler_transition
                            .start(from_ms as f64, to_ms as f64, window_ms),
                    );
                }
                Effect::CancelAnimation => {
                    self.ruler_transition.cancel();
                    self.progress_transition.cancel();
                }
            }
        }
        cmd
    }

    /// Routes a message to the dial.
    ///
    /// Handles [`PointerEvent`], [`PlayPauseMsg`], key messages while focused,
    /// and the dial's own tick and frame messages. Everything else, including
    /// ticks and frames from other dials or earlier generations, is ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(pointer) = msg.downcast_ref::<PointerEvent>() {
            return self.handle_pointer(pointer);
        }

        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            return self.on_tick(tick_msg);
        }

        if let Some(frame_msg) = msg.downcast_ref::<FrameMsg>() {
            return self.on_frame(frame_msg);
        }

        if let Some(play_msg) = msg.downcast_ref::<PlayPauseMsg>() {
            if play_msg.id != 0 && play_msg.id != self.id {
                return None;
            }
            return self.toggle();
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg);
        }

        None
    }

    /// Canvas commands for the whole widget: progress circle, then ruler.
    pub fn draw(&self) -> Vec<DrawCommand> {
        let mut commands = progress::draw(
            self.displayed_fraction(),
            self.session.current_ms(),
            &self.progress_geometry,
            &self.palette,
        );
        let ticks = ruler::ticks(
            self.displayed_ms(),
            self.config.max_minutes(),
            &self.ruler_geometry,
        );
        commands.extend(ruler::draw(&ticks, &self.ruler_geometry, &self.palette));
        commands
    }

    fn state_badge(&self) -> String {
        let (glyph, name) = match self.session.state() {
            CountdownState::Idle => ('●', "ready"),
            CountdownState::Paused => ('‖', "paused"),
            CountdownState::Playing => ('▶', "running"),
            CountdownState::Stopped => ('■', "stopped"),
        };
        Style::new()
            .foreground(Color::from(self.palette.accent.to_hex().as_str()))
            .render(&format!("{} {}", glyph, name))
    }

    /// Terminal rendering: state, progress bar with clock, ruler and help.
    pub fn view(&self) -> String {
        let help = Style::new()
            .foreground(Color::from(self.palette.muted.to_hex().as_str()))
            .render(&self.keymap.short_help());

        format!(
            "{}\n{}\n{}\n{}",
            self.state_badge(),
            self.progress_bar
                .view_as(self.displayed_fraction(), self.session.current_ms()),
            ruler::view(
                self.displayed_ms(),
                self.config.max_minutes(),
                self.config.ruler_width,
                &self.palette,
            ),
            help
        )
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = new(&[]);
        let cmd = model.focus();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}
