#![warn(missing_docs)]

//! # bubbletea-progressbar
//!
//! An animated progress bar widget for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications.
//!
//! The bar is a bordered track with an inner fill whose width is proportional
//! to the current value. Width changes are animated with a configurable
//! easing curve, and when a completion color is configured the fill fades to
//! it once the value reaches the maximum. An optional callback fires shortly
//! after completion, once the width animation has had time to finish.
//!
//! ## Overview
//!
//! Like every bubbletea-rs component, the bar follows the Elm Architecture:
//!
//! - `init()` starts the initial animation,
//! - `set_value()` and `update()` return commands that keep animations running,
//! - `view()` renders the current frame.
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use bubbletea_progressbar::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     bar: Progress,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut bar = progress_new(40.0, &[with_height(3.0), with_value(10.0)]);
//!         let cmd = bar.init();
//!         (Self { bar }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.bar.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.bar.view()
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`progress`] | The progress bar widget and its options |
//! | [`animation`] | Animated scalars driven by frame messages |
//! | [`completion`] | Cancellable, delayed completion notifications |
//! | [`easing`] | The closed set of easing curves |
//! | [`style`] | Layout description and terminal rendering |

use std::sync::atomic::{AtomicI64, Ordering};

pub mod animation;
pub mod completion;
pub mod easing;
pub mod progress;
pub mod style;

pub use animation::{AnimatedValue, Curve, Driver, FrameMsg};
pub use completion::{CompleteMsg, CompletionPolicy, CompletionTimer};
pub use easing::{Easing, ParseEasingError};
pub use progress::{new as progress_new, BarOption, Model as Progress, OnComplete};
pub use style::{Fill, FillColor, Layout, Track, WidthScale};

// Internal ID management, shared by every component that routes messages
static LAST_ID: AtomicI64 = AtomicI64::new(0);

pub(crate) fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_progressbar::prelude::*;
///
/// let bar = progress_new(20.0, &[with_bar_easing(Easing::Quad)]);
/// assert_eq!(bar.bar_easing, Easing::Quad);
/// ```
pub mod prelude {
    pub use crate::completion::CompletionPolicy;
    pub use crate::easing::Easing;
    pub use crate::progress::{
        new as progress_new, with_background_animation_duration, with_background_color,
        with_background_color_on_complete, with_bar_animation_duration, with_bar_easing,
        with_border_color, with_border_radius, with_border_width, with_completion_policy,
        with_height, with_max_value, with_on_complete, with_underlying_color, with_value,
        with_width_scale, BarOption, Model as Progress,
    };
    pub use crate::style::WidthScale;
}
