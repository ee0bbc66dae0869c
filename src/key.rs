//! Keyboard bindings for the dial.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A set of keys that trigger one action, with help text.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Keys that trigger the action.
    pub keys: Vec<KeyCode>,
    /// Short key label for help, e.g. `space`.
    pub help: String,
    /// What the action does, e.g. `start/stop`.
    pub description: String,
}

impl Binding {
    /// A binding for `keys` with empty help.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
        }
    }

    /// Sets the help label and description.
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// Whether the key message is one of this binding's keys.
    pub fn matches(&self, key_msg: &KeyMsg) -> bool {
        self.keys.contains(&key_msg.key)
    }
}

/// Key bindings for a dial.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Start or stop the countdown.
    pub toggle: Binding,
    /// Select one more minute.
    pub increase: Binding,
    /// Select one minute less.
    pub decrease: Binding,
    /// Return to the default duration.
    pub reset: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Enter])
                .with_help("space", "start/stop"),
            increase: Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/l", "+1 minute"),
            decrease: Binding::new(vec![KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h", "-1 minute"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
        }
    }
}

impl KeyMap {
    /// Bindings in display order.
    pub fn bindings(&self) -> [&Binding; 4] {
        [&self.toggle, &self.decrease, &self.increase, &self.reset]
    }

    /// One-line help, e.g. `space start/stop • ←/h -1 minute`.
    pub fn short_help(&self) -> String {
        self.bindings()
            .iter()
            .map(|b| format!("{} {}", b.help, b.description))
            .collect::<Vec<_>>()
            .join(" • ")
    }
}
