//! Time-based animated scalars.
//!
//! An [`AnimatedValue`] holds a single `f64` that a timing animation moves
//! toward a target, one frame at a time. Frames are scheduled as bubbletea-rs
//! commands and come back as [`FrameMsg`] values that must be routed to
//! [`AnimatedValue::update`].
//!
//! Starting a new animation on a scalar supersedes and cancels whatever
//! animation was in flight on it: the new timing starts from the current
//! value, and frames scheduled by the old one are ignored.
//!
//! ```rust
//! use bubbletea_progressbar::animation::{AnimatedValue, Driver};
//! use bubbletea_progressbar::easing::Easing;
//! use std::time::Duration;
//!
//! let mut width = AnimatedValue::new(0.0, Driver::Layout);
//! let cmd = width.animate_to(98.0, Duration::from_millis(500), Easing::Linear);
//! assert!(cmd.is_some());
//! assert!(width.is_animating());
//! assert_eq!(width.target(), 98.0);
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::time::Duration;

use crate::easing::{ease_in_out, Easing};
use crate::next_id;

const FPS: u32 = 60;

/// Time between two animation frames.
pub fn frame_interval() -> Duration {
    Duration::from_nanos(1_000_000_000 / FPS as u64)
}

/// What an animated scalar drives in the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// The value changes layout (sizes), so every frame needs a full re-render.
    Layout,
    /// The value only changes paint (colors); layout is untouched.
    Compositor,
}

/// Timing curve of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// One of the configurable easing curves.
    Eased(Easing),
    /// The host default, see [`ease_in_out`].
    EaseInOut,
}

impl Curve {
    /// Maps normalized time to animation progress.
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Curve::Eased(easing) => easing.apply(t),
            Curve::EaseInOut => ease_in_out(t),
        }
    }
}

impl From<Easing> for Curve {
    fn from(easing: Easing) -> Self {
        Curve::Eased(easing)
    }
}

/// Message advancing an animated value by one frame.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    /// ID of the animated value this frame belongs to.
    pub id: i64,
    tag: i64,
}

#[derive(Debug, Clone)]
struct Timing {
    from: f64,
    to: f64,
    duration: Duration,
    curve: Curve,
    elapsed: Duration,
}

/// A scalar driven by timing animations.
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    id: i64,
    // Bumped whenever the in-flight timing changes so stale frames are dropped.
    tag: i64,
    value: f64,
    driver: Driver,
    timing: Option<Timing>,
}

impl AnimatedValue {
    /// Creates a resting scalar.
    pub fn new(value: f64, driver: Driver) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            value,
            driver,
            timing: None,
        }
    }

    /// Unique identifier used to route [`FrameMsg`]s.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The live value, as it should be rendered right now.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// What this scalar drives.
    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// Value the scalar is moving toward, or the current value at rest.
    pub fn target(&self) -> f64 {
        self.timing.as_ref().map_or(self.value, |timing| timing.to)
    }

    /// Whether a timing animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.timing.is_some()
    }

    /// Starts a timing animation from the current value to `to`.
    ///
    /// Any in-flight animation on this scalar is cancelled. A zero duration
    /// moves the value immediately and schedules nothing.
    pub fn animate_to(
        &mut self,
        to: f64,
        duration: Duration,
        curve: impl Into<Curve>,
    ) -> Option<Cmd> {
        self.tag += 1;
        if let Some(previous) = self.timing.take() {
            log::debug!(
                "animation {}: superseding timing toward {} with {}",
                self.id,
                previous.to,
                to
            );
        }

        if duration.is_zero() {
            self.value = to;
            return None;
        }

        log::debug!(
            "animation {}: {} -> {} over {:?}",
            self.id,
            self.value,
            to,
            duration
        );
        self.timing = Some(Timing {
            from: self.value,
            to,
            duration,
            curve: curve.into(),
            elapsed: Duration::ZERO,
        });
        Some(self.next_frame())
    }

    /// Cancels the in-flight animation, leaving the value where it is.
    pub fn stop(&mut self) {
        if self.timing.take().is_some() {
            self.tag += 1;
        }
    }

    /// The frame message this scalar currently accepts.
    pub fn frame_msg(&self) -> FrameMsg {
        FrameMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Advances the animation if `msg` is a current frame for this scalar.
    ///
    /// Returns the command for the next frame while the animation runs.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let frame = msg.downcast_ref::<FrameMsg>()?;
        if frame.id != self.id || frame.tag != self.tag {
            return None;
        }

        self.step();
        if self.timing.is_some() {
            Some(self.next_frame())
        } else {
            None
        }
    }

    fn step(&mut self) {
        let Some(timing) = self.timing.as_mut() else {
            return;
        };

        timing.elapsed += frame_interval();
        if timing.elapsed >= timing.duration {
            self.value = timing.to;
            self.timing = None;
            log::trace!("animation {}: settled at {}", self.id, self.value);
        } else {
            let t = timing.elapsed.as_secs_f64() / timing.duration.as_secs_f64();
            self.value = timing.from + timing.curve.apply(t) * (timing.to - timing.from);
            log::trace!("animation {}: frame at {}", self.id, self.value);
        }
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(frame_interval(), move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }
}
