#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/carousel-timer/")]

//! # carousel-timer
//!
//! A countdown timer widget for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications. The duration is picked on a carousel ruler: a drum of sixty
//! minute ticks that rotates under the pointer, snaps to whole minutes on
//! release and projects flings forward by their velocity. A progress circle
//! shows the time left.
//!
//! ## Overview
//!
//! The widget follows the Elm Architecture like every bubbletea-rs component:
//! messages go into `update()`, which may return a command, and the current
//! state renders through `view()`. Hosts with a canvas can render through
//! `draw()`, which returns plain drawing commands instead of terminal text.
//!
//! The pieces are usable on their own:
//!
//! - [`duration`]: wrapping, minute snapping and fling projection
//! - [`gesture`]: pointer tracking and velocity estimation
//! - [`session`]: the countdown state machine
//! - [`timer`] and [`transition`]: generation-tagged tick and frame loops
//! - [`ruler`] and [`progress`]: pure renderers
//! - [`dial`]: the widget that ties them together
//!
//! ## Focus Management
//!
//! The dial implements the [`Component`] trait; keyboard bindings only apply
//! while it is focused:
//!
//! ```rust
//! use carousel_timer::prelude::*;
//!
//! let mut dial = dial_new(&[]);
//! assert!(!dial.focused());
//! dial.focus();
//! assert!(dial.focused());
//! dial.blur();
//! assert!(!dial.focused());
//! ```
//!
//! ## Configuration
//!
//! Dials are configured with option functions, or from a deserialized
//! [`Config`]:
//!
//! ```rust
//! use carousel_timer::prelude::*;
//!
//! let dial = dial_new(&[with_max_time(1_800_000), with_default_timeout(300_000)]);
//! assert_eq!(dial.current_ms(), 300_000);
//!
//! let bad = Config { max_time_ms: 0, ..Config::default() };
//! assert!(dial_try_new(bad).is_err());
//! ```

pub mod config;
pub mod dial;
pub mod draw;
pub mod duration;
pub mod error;
pub mod gesture;
pub mod key;
pub mod progress;
pub mod ruler;
pub mod session;
pub mod timer;
pub mod transition;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// Focused components react to keyboard input; blurred ones ignore it but
/// still handle pointer, tick and frame messages.
///
/// ```rust
/// use carousel_timer::prelude::*;
/// use bubbletea_rs::Cmd;
///
/// fn handle_focus<T: Component>(component: &mut T) {
///     let _cmd: Option<Cmd> = component.focus();
///     assert!(component.focused());
///     component.blur();
///     assert!(!component.focused());
/// }
///
/// let mut dial = dial_new(&[]);
/// handle_focus(&mut dial);
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// May return a command for the bubbletea runtime.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns `true` if the component is focused.
    fn focused(&self) -> bool;
}

pub use config::{
    with_accent_color, with_cell_width, with_default_timeout, with_drag_sensitivity,
    with_max_time, with_min_fling_velocity, with_ruler_width, with_tick_interval,
    with_transition, Config, DialOption,
};
pub use dial::{new as dial_new, try_new as dial_try_new, Model as Dial, PlayPauseMsg};
pub use draw::{DrawCommand, Palette, Point, Rgba, TextAlign};
pub use error::{ConfigError, Result};
pub use gesture::{PointerEvent, PointerKind, Release, VelocityEstimate};
pub use key::{Binding, KeyMap};
pub use progress::Model as Progress;
pub use session::{CountdownState, TimerSession};
pub use timer::{TickMsg as TimerTickMsg, Ticker};
pub use transition::{FrameMsg as TransitionFrameMsg, TimingFunction, Transition};

/// Prelude module for convenient imports.
///
/// ```rust
/// use carousel_timer::prelude::*;
///
/// let dial: Dial = dial_new(&[with_transition(300)]);
/// assert_eq!(dial.state(), CountdownState::Idle);
/// ```
pub mod prelude {
    pub use crate::Component;

    pub use crate::config::{
        with_accent_color, with_cell_width, with_default_timeout, with_drag_sensitivity,
        with_max_time, with_min_fling_velocity, with_ruler_width, with_tick_interval,
        with_transition, Config, DialOption,
    };
    pub use crate::dial::{new as dial_new, try_new as dial_try_new, Model as Dial, PlayPauseMsg};
    pub use crate::draw::{DrawCommand, Palette};
    pub use crate::error::ConfigError;
    pub use crate::gesture::{PointerEvent, PointerKind};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::session::CountdownState;
}
