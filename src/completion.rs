//! Delayed completion notifications tied to a widget's lifetime.
//!
//! A [`CompletionTimer`] schedules a single [`CompleteMsg`] after a delay.
//! Scheduling again supersedes the pending notification and [`cancel`]
//! releases it, so a delivery that arrives after either is ignored.
//!
//! [`cancel`]: CompletionTimer::cancel

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::time::Duration;

use crate::next_id;

/// How often the completion callback may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Fire every time the committed progress reaches the maximum.
    #[default]
    EveryTime,
    /// Fire at most once for the lifetime of the widget.
    Once,
}

/// Message delivered when a scheduled completion delay has elapsed.
#[derive(Debug, Clone)]
pub struct CompleteMsg {
    /// ID of the timer that scheduled this message.
    pub id: i64,
    tag: i64,
}

/// One-shot, cancellable completion timer.
#[derive(Debug, Clone)]
pub struct CompletionTimer {
    id: i64,
    tag: i64,
    pending: Option<Duration>,
}

impl CompletionTimer {
    /// Creates an idle timer.
    pub fn new() -> Self {
        Self {
            id: next_id(),
            tag: 0,
            pending: None,
        }
    }

    /// Unique identifier used to route [`CompleteMsg`]s.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether a notification is scheduled and not yet delivered or cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Delay the pending notification was scheduled with.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending
    }

    /// Schedules a notification after `delay`, superseding any pending one.
    pub fn schedule(&mut self, delay: Duration) -> Cmd {
        self.tag += 1;
        self.pending = Some(delay);
        log::debug!("completion {}: scheduled in {:?}", self.id, delay);

        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(delay, move |_| Box::new(CompleteMsg { id, tag }) as Msg)
    }

    /// Releases the pending notification, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.tag += 1;
            log::debug!("completion {}: cancelled", self.id);
        }
    }

    /// The message the pending notification will deliver.
    pub fn complete_msg(&self) -> CompleteMsg {
        CompleteMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Returns `true` when `msg` delivers the pending notification.
    ///
    /// The timer is idle afterwards; repeated or stale deliveries return `false`.
    pub fn update(&mut self, msg: &Msg) -> bool {
        let Some(complete) = msg.downcast_ref::<CompleteMsg>() else {
            return false;
        };
        if !self.is_pending() || complete.id != self.id || complete.tag != self.tag {
            return false;
        }

        self.pending = None;
        true
    }
}

impl Default for CompletionTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let timer = CompletionTimer::new();
        assert!(!timer.is_pending());
        assert!(timer.id() > 0);
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(CompletionTimer::new().id(), CompletionTimer::new().id());
    }

    #[test]
    fn test_delivery_fires_once() {
        let mut timer = CompletionTimer::new();
        std::mem::drop(timer.schedule(Duration::from_millis(500)));
        assert!(timer.is_pending());

        let msg: Msg = Box::new(timer.complete_msg());
        assert!(timer.update(&msg));
        assert!(!timer.is_pending());
        assert!(!timer.update(&msg));
    }

    #[test]
    fn test_pending_delay_tracks_schedule() {
        let mut timer = CompletionTimer::new();
        assert_eq!(timer.pending_delay(), None);

        std::mem::drop(timer.schedule(Duration::from_millis(500)));
        assert_eq!(timer.pending_delay(), Some(Duration::from_millis(500)));
        std::mem::drop(timer.schedule(Duration::from_millis(80)));
        assert_eq!(timer.pending_delay(), Some(Duration::from_millis(80)));

        timer.cancel();
        assert_eq!(timer.pending_delay(), None);
    }

    #[test]
    fn test_cancel_drops_delivery() {
        let mut timer = CompletionTimer::new();
        std::mem::drop(timer.schedule(Duration::from_millis(500)));
        let msg: Msg = Box::new(timer.complete_msg());

        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.update(&msg));
    }

    #[test]
    fn test_reschedule_supersedes_pending() {
        let mut timer = CompletionTimer::new();
        std::mem::drop(timer.schedule(Duration::from_millis(500)));
        let stale: Msg = Box::new(timer.complete_msg());

        std::mem::drop(timer.schedule(Duration::from_millis(500)));
        assert!(!timer.update(&stale));
        assert!(timer.is_pending());

        let current: Msg = Box::new(timer.complete_msg());
        assert!(timer.update(&current));
    }

    #[test]
    fn test_rejects_other_timers_and_messages() {
        let mut timer = CompletionTimer::new();
        let mut other = CompletionTimer::new();
        std::mem::drop(timer.schedule(Duration::from_millis(500)));
        std::mem::drop(other.schedule(Duration::from_millis(500)));

        let foreign: Msg = Box::new(other.complete_msg());
        assert!(!timer.update(&foreign));

        let unrelated: Msg = Box::new(42_u8);
        assert!(!timer.update(&unrelated));
        assert!(timer.is_pending());
    }

    #[test]
    fn test_default_policy_fires_every_time() {
        assert_eq!(CompletionPolicy::default(), CompletionPolicy::EveryTime);
    }

    #[tokio::test]
    async fn test_schedule_delivers_after_delay() {
        let mut timer = CompletionTimer::new();
        let started = std::time::Instant::now();
        let cmd = timer.schedule(Duration::from_millis(20));

        let msg = cmd.await.expect("tick yields a message");
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(timer.update(&msg));
    }
}
