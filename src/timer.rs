//! Countdown ticking service.
//!
//! A [`Ticker`] owns a millisecond budget and spends one interval of it per
//! [`TickMsg`]. Tick messages are scheduled with `bubbletea_rs::tick`, so they
//! arrive on the same queue as every other message and no locking is needed.
//!
//! Cancellation cannot recall a tick that is already scheduled. Instead every
//! message carries the ticker's instance id and a generation tag; `start` and
//! `cancel` bump the tag, and messages with an old tag are dropped. From the
//! caller's point of view, nothing is observed after `cancel` returns.
//!
//! ```rust
//! use carousel_timer::timer::{Ticker, TickOutcome};
//!
//! let mut ticker = Ticker::new(40);
//! let _first = ticker.start(80).expect("idle ticker starts");
//! assert!(ticker.start(80).is_none()); // already running
//!
//! let msg = ticker.tick_msg();
//! assert!(matches!(ticker.update(&msg), Some(TickOutcome::Tick { remaining_ms: 40, .. })));
//! let msg = ticker.tick_msg();
//! assert!(matches!(ticker.update(&msg), Some(TickOutcome::Expired)));
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management for ticker instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Scheduled tick for a specific ticker generation.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Instance that scheduled the tick.
    pub id: i64,
    tag: i64,
}

/// Result of a tick accepted by the current generation.
pub enum TickOutcome {
    /// Budget left after this tick, with the command for the next one.
    Tick {
        /// Milliseconds left.
        remaining_ms: u64,
        /// Schedules the following tick.
        next: Cmd,
    },
    /// The budget is spent. The ticker has stopped itself.
    Expired,
}

/// A cancelable fixed-interval countdown.
#[derive(Debug, Clone)]
pub struct Ticker {
    /// Time between ticks.
    pub interval: Duration,
    id: i64,
    tag: i64,
    remaining_ms: u64,
    running: bool,
}

impl Ticker {
    /// An idle ticker firing every `interval_ms`.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            id: next_id(),
            tag: 0,
            remaining_ms: 0,
            running: false,
        }
    }

    /// Unique instance id carried by this ticker's messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current generation. Changes on every start and cancel.
    pub fn generation(&self) -> i64 {
        self.tag
    }

    /// Whether a countdown is in progress.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Budget left in the current or last countdown.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Starts counting down `duration_ms`.
    ///
    /// Returns `None` while already running: a second tick stream would spend
    /// the budget twice as fast.
    pub fn start(&mut self, duration_ms: u64) -> Option<Cmd> {
        if self.running {
            log::trace!("ticker {} already running, start ignored", self.id);
            return None;
        }
        self.remaining_ms = duration_ms;
        self.running = true;
        self.tag += 1;
        log::debug!(
            "ticker {} started: {}ms every {:?} (generation {})",
            self.id,
            duration_ms,
            self.interval,
            self.tag
        );
        Some(self.tick())
    }

    /// Stops the countdown. Calling it again has no effect.
    pub fn cancel(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.tag += 1;
        log::debug!("ticker {} canceled (generation {})", self.id, self.tag);
    }

    /// A tick message for the current generation, as the scheduled command
    /// would deliver it.
    pub fn tick_msg(&self) -> TickMsg {
        TickMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    /// Spends one interval of budget.
    ///
    /// Returns `None` for ticks from another ticker, from an earlier
    /// generation, or arriving while stopped.
    pub fn update(&mut self, msg: &TickMsg) -> Option<TickOutcome> {
        if msg.id != self.id || msg.tag != self.tag || !self.running {
            return None;
        }

        let step = self.interval.as_millis() as u64;
        self.remaining_ms = self.remaining_ms.saturating_sub(step);

        if self.remaining_ms == 0 {
            self.running = false;
            self.tag += 1;
            log::debug!("ticker {} expired", self.id);
            return Some(TickOutcome::Expired);
        }

        log::trace!("ticker {} tick: {}ms left", self.id, self.remaining_ms);
        Some(TickOutcome::Tick {
            remaining_ms: self.remaining_ms,
            next: self.tick(),
        })
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TICK_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remaining(outcome: Option<TickOutcome>) -> Option<u64> {
        match outcome {
            Some(TickOutcome::Tick { remaining_ms, .. }) => Some(remaining_ms),
            _ => None,
        }
    }

    #[test]
    fn test_new_is_idle() {
        let ticker = Ticker::new(40);
        assert!(!ticker.running());
        assert_eq!(ticker.interval, Duration::from_millis(40));
        assert_eq!(ticker.remaining_ms(), 0);
        assert!(ticker.id() > 0);
    }

    #[test]
    fn test_unique_ids() {
        let a = Ticker::new(40);
        let b = Ticker::new(40);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_tick_decrements_by_interval() {
        let mut ticker = Ticker::new(40);
        assert!(ticker.start(1_000).is_some());
        let msg = ticker.tick_msg();
        assert_eq!(remaining(ticker.update(&msg)), Some(960));
        let msg = ticker.tick_msg();
        assert_eq!(remaining(ticker.update(&msg)), Some(920));
    }

    #[test]
    fn test_duplicate_start_is_noop() {
        let mut ticker = Ticker::new(40);
        assert!(ticker.start(1_000).is_some());
        let generation = ticker.generation();
        assert!(ticker.start(5_000).is_none());
        assert_eq!(ticker.generation(), generation);
        assert_eq!(ticker.remaining_ms(), 1_000);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut ticker = Ticker::new(40);
        ticker.start(1_000);
        ticker.cancel();
        let generation = ticker.generation();
        let remaining = ticker.remaining_ms();

        ticker.cancel();
        assert_eq!(ticker.generation(), generation);
        assert_eq!(ticker.remaining_ms(), remaining);
        assert!(!ticker.running());
    }

    #[test]
    fn test_stale_tick_after_cancel_dropped() {
        let mut ticker = Ticker::new(40);
        ticker.start(1_000);
        let in_flight = ticker.tick_msg();
        ticker.cancel();
        assert!(ticker.update(&in_flight).is_none());
        assert_eq!(ticker.remaining_ms(), 1_000);
    }

    #[test]
    fn test_stale_tick_after_restart_dropped() {
        let mut ticker = Ticker::new(40);
        ticker.start(1_000);
        let old = ticker.tick_msg();
        ticker.cancel();
        ticker.start(2_000);
        assert!(ticker.update(&old).is_none());
        assert_eq!(ticker.remaining_ms(), 2_000);
    }

    #[test]
    fn test_foreign_tick_dropped() {
        let mut a = Ticker::new(40);
        let mut b = Ticker::new(40);
        a.start(1_000);
        b.start(1_000);
        let from_b = b.tick_msg();
        assert!(a.update(&from_b).is_none());
        assert_eq!(a.remaining_ms(), 1_000);
    }

    #[test]
    fn test_full_countdown_expires_once() {
        let mut ticker = Ticker::new(40);
        ticker.start(600_000);
        let mut ticks = 0;
        loop {
            let msg = ticker.tick_msg();
            match ticker.update(&msg) {
                Some(TickOutcome::Tick { .. }) => ticks += 1,
                Some(TickOutcome::Expired) => break,
                None => panic!("live tick rejected after {} ticks", ticks),
            }
        }
        assert_eq!(ticks, 14_999);
        assert!(!ticker.running());
        assert_eq!(ticker.remaining_ms(), 0);

        let late = ticker.tick_msg();
        assert!(ticker.update(&late).is_none());
    }

    #[test]
    fn test_uneven_budget_saturates() {
        let mut ticker = Ticker::new(40);
        ticker.start(50);
        let msg = ticker.tick_msg();
        assert_eq!(remaining(ticker.update(&msg)), Some(10));
        let msg = ticker.tick_msg();
        assert!(matches!(ticker.update(&msg), Some(TickOutcome::Expired)));
    }

    #[tokio::test]
    async fn test_scheduled_tick_arrives_for_current_generation() {
        let mut ticker = Ticker::new(5);
        let cmd = ticker.start(10).expect("idle ticker starts");
        let msg = cmd.await.expect("tick command yields a message");
        let tick = msg.downcast_ref::<TickMsg>().expect("a TickMsg");
        assert_eq!(tick.id, ticker.id());
        assert_eq!(remaining(ticker.update(tick)), Some(5));
    }

    #[tokio::test]
    async fn test_scheduled_tick_dropped_after_cancel() {
        let mut ticker = Ticker::new(5);
        let cmd = ticker.start(100).expect("idle ticker starts");
        ticker.cancel();
        let msg = cmd.await.expect("tick command yields a message");
        let tick = msg.downcast_ref::<TickMsg>().expect("a TickMsg");
        assert!(ticker.update(tick).is_none());
        assert_eq!(ticker.remaining_ms(), 100);
    }
}
