//! Animated progress bar component for Bubble Tea applications.
//!
//! The bar is a bordered track whose fill grows in proportion to `value`.
//! Width changes animate over time with a configurable easing curve, and the
//! fill can fade to a completion color once the value reaches the maximum.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_progressbar::progress::{new, with_height, with_value};
//!
//! // A 40 column track, three rows tall, starting at 25%
//! let mut bar = new(40.0, &[with_height(3.0), with_value(25.0)]);
//! let _cmd = bar.init();
//! assert!(bar.is_animating());
//! ```
//!
//! # Updating and Completion
//!
//! ```rust
//! use bubbletea_progressbar::progress::{new, with_background_color_on_complete, with_on_complete};
//!
//! let mut bar = new(40.0, &[
//!     with_background_color_on_complete("#00FF00".to_string()),
//!     with_on_complete(|| println!("done")),
//! ]);
//!
//! // Reaching the maximum fades the fill color and schedules the callback
//! let _cmd = bar.set_value(100.0);
//! assert!(bar.completion_pending());
//! ```

use bubbletea_rs::{batch as bubbletea_batch, Cmd, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::animation::{AnimatedValue, Curve, Driver};
use crate::completion::{CompletionPolicy, CompletionTimer};
use crate::easing::Easing;
use crate::style::{Fill, FillColor, Layout, Track, WidthScale};

const DEFAULT_WIDTH: f64 = 40.0;
const DEFAULT_MAX_VALUE: f64 = 100.0;
const DEFAULT_HEIGHT: f64 = 15.0;
const DEFAULT_BORDER_WIDTH: f64 = 1.0;
const DEFAULT_BORDER_RADIUS: f64 = 6.0;
const DEFAULT_BACKGROUND_COLOR: &str = "#148cF0";
const DEFAULT_BORDER_COLOR: &str = "#C8CCCE";
const DEFAULT_BAR_ANIMATION_DURATION: Duration = Duration::from_millis(500);
const DEFAULT_BACKGROUND_ANIMATION_DURATION: Duration = Duration::from_millis(2500);

/// Callback invoked when the bar completes.
pub type OnComplete = Arc<dyn Fn() + Send + Sync>;

/// Configuration options for a progress bar.
///
/// Options are applied in order by [`new`], after the defaults, so a later
/// option overrides an earlier one. Each variant has a `with_*` constructor.
#[derive(Clone)]
pub enum BarOption {
    /// Initial value.
    WithValue(f64),
    /// Value at which the bar is complete.
    WithMaxValue(f64),
    /// Track height in rows.
    WithHeight(f64),
    /// Border thickness.
    WithBorderWidth(f64),
    /// Border color.
    WithBorderColor(String),
    /// Corner radius of the track and fill.
    WithBorderRadius(f64),
    /// Fill color before completion.
    WithBackgroundColor(String),
    /// Track color behind the fill.
    WithUnderlyingColor(String),
    /// Fill color after completion; enables the completion fade.
    WithBackgroundColorOnComplete(String),
    /// Easing curve of the width animation.
    WithBarEasing(Easing),
    /// Duration of the width animation, also the completion callback delay.
    WithBarAnimationDuration(Duration),
    /// Duration of the completion color fade.
    WithBackgroundAnimationDuration(Duration),
    /// Completion callback.
    WithOnComplete(OnComplete),
    /// How the value maps to the fill width.
    WithWidthScale(WidthScale),
    /// How often the completion callback may fire.
    WithCompletionPolicy(CompletionPolicy),
}

impl BarOption {
    fn apply(&self, m: &mut Model) {
        match self {
            BarOption::WithValue(value) => m.value = *value,
            BarOption::WithMaxValue(max_value) => m.max_value = *max_value,
            BarOption::WithHeight(height) => m.height = *height,
            BarOption::WithBorderWidth(border_width) => m.border_width = *border_width,
            BarOption::WithBorderColor(color) => m.border_color = color.clone(),
            BarOption::WithBorderRadius(radius) => m.border_radius = *radius,
            BarOption::WithBackgroundColor(color) => m.background_color = color.clone(),
            BarOption::WithUnderlyingColor(color) => m.underlying_color = Some(color.clone()),
            BarOption::WithBackgroundColorOnComplete(color) => {
                m.background_color_on_complete = Some(color.clone());
            }
            BarOption::WithBarEasing(easing) => m.bar_easing = *easing,
            BarOption::WithBarAnimationDuration(duration) => m.bar_animation_duration = *duration,
            BarOption::WithBackgroundAnimationDuration(duration) => {
                m.background_animation_duration = *duration;
            }
            BarOption::WithOnComplete(callback) => m.on_complete = Some(callback.clone()),
            BarOption::WithWidthScale(scale) => m.width_scale = *scale,
            BarOption::WithCompletionPolicy(policy) => m.completion_policy = *policy,
        }
    }
}

/// Sets the initial value (default 0).
///
/// The initial value is committed as the bar's progress. A positive value
/// makes [`Model::init`] animate the fill toward it.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_value};
///
/// let mut bar = new(200.0, &[with_value(25.0)]);
/// assert_eq!(bar.progress(), 25.0);
/// assert_eq!(bar.current_width(), 0.0);
///
/// let _cmd = bar.init();
/// assert_eq!(bar.target_width(), 48.0);
/// ```
pub fn with_value(value: f64) -> BarOption {
    BarOption::WithValue(value)
}

/// Sets the value at which the bar is complete (default 100).
///
/// Values above the maximum are never committed as progress.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_max_value};
///
/// let mut bar = new(200.0, &[with_max_value(10.0)]);
/// let _cmd = bar.set_value(12.0);
/// assert_eq!(bar.progress(), 0.0);
/// let _cmd = bar.set_value(10.0);
/// assert_eq!(bar.progress(), 10.0);
/// ```
pub fn with_max_value(max_value: f64) -> BarOption {
    BarOption::WithMaxValue(max_value)
}

/// Sets the track height in rows (default 15).
pub fn with_height(height: f64) -> BarOption {
    BarOption::WithHeight(height)
}

/// Sets the border thickness (default 1).
///
/// The fill is narrowed by twice the thickness. Any thickness of half a
/// cell or more draws a one-cell frame.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_border_width};
///
/// let mut bar = new(100.0, &[with_border_width(0.0)]);
/// let _cmd = bar.set_value(50.0);
/// assert_eq!(bar.target_width(), 50.0);
/// assert!(!bar.layout().framed());
/// ```
pub fn with_border_width(border_width: f64) -> BarOption {
    BarOption::WithBorderWidth(border_width)
}

/// Sets the border color (default `#C8CCCE`).
pub fn with_border_color(color: String) -> BarOption {
    BarOption::WithBorderColor(color)
}

/// Sets the corner radius (default 6). Zero draws square corners.
pub fn with_border_radius(radius: f64) -> BarOption {
    BarOption::WithBorderRadius(radius)
}

/// Sets the fill color (default `#148cF0`).
pub fn with_background_color(color: String) -> BarOption {
    BarOption::WithBackgroundColor(color)
}

/// Sets the track color shown behind the fill (default: none).
pub fn with_underlying_color(color: String) -> BarOption {
    BarOption::WithUnderlyingColor(color)
}

/// Sets the fill color the bar fades to once it completes (default: none).
///
/// Without it the fill is always drawn in the flat background color.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_background_color_on_complete};
///
/// let mut bar = new(40.0, &[with_background_color_on_complete("#00FF00".to_string())]);
/// assert!(bar.layout().fill.color.is_blended());
///
/// let _cmd = bar.set_value(100.0);
/// assert!(bar.is_animating());
/// assert_eq!(bar.background_fraction(), 0.0);
/// ```
pub fn with_background_color_on_complete(color: String) -> BarOption {
    BarOption::WithBackgroundColorOnComplete(color)
}

/// Sets the width animation's easing curve (default linear).
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::easing::Easing;
/// use bubbletea_progressbar::progress::{new, with_bar_easing};
///
/// let easing: Easing = "bounce".parse().unwrap();
/// let bar = new(40.0, &[with_bar_easing(easing)]);
/// assert_eq!(bar.bar_easing, Easing::Bounce);
/// ```
pub fn with_bar_easing(easing: Easing) -> BarOption {
    BarOption::WithBarEasing(easing)
}

/// Sets the width animation duration (default 500ms).
///
/// The completion callback is delayed by the same duration. A zero
/// duration moves the fill immediately.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_bar_animation_duration};
/// use std::time::Duration;
///
/// let mut bar = new(200.0, &[with_bar_animation_duration(Duration::ZERO)]);
/// assert!(bar.set_value(50.0).is_none());
/// assert_eq!(bar.current_width(), 98.0);
/// ```
pub fn with_bar_animation_duration(duration: Duration) -> BarOption {
    BarOption::WithBarAnimationDuration(duration)
}

/// Sets the completion color fade duration (default 2500ms).
pub fn with_background_animation_duration(duration: Duration) -> BarOption {
    BarOption::WithBackgroundAnimationDuration(duration)
}

/// Sets the callback invoked after the bar reaches its maximum.
///
/// The callback runs inside [`Model::update`] once the bar animation
/// duration has elapsed after the maximum was committed.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_on_complete};
/// use std::time::Duration;
///
/// let mut bar = new(40.0, &[with_on_complete(|| println!("done"))]);
/// let _cmd = bar.set_value(100.0);
/// assert_eq!(bar.completion_delay(), Some(Duration::from_millis(500)));
/// ```
pub fn with_on_complete<F>(callback: F) -> BarOption
where
    F: Fn() + Send + Sync + 'static,
{
    BarOption::WithOnComplete(Arc::new(callback))
}

/// Sets how the value maps to the fill width (default [`WidthScale::Percent`]).
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_max_value, with_width_scale};
/// use bubbletea_progressbar::style::WidthScale;
///
/// let mut bar = new(100.0, &[with_max_value(200.0), with_width_scale(WidthScale::MaxValue)]);
/// let _cmd = bar.set_value(100.0);
/// assert_eq!(bar.target_width(), 48.0);
/// ```
pub fn with_width_scale(scale: WidthScale) -> BarOption {
    BarOption::WithWidthScale(scale)
}

/// Sets how often the completion callback may fire
/// (default [`CompletionPolicy::EveryTime`]).
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::completion::CompletionPolicy;
/// use bubbletea_progressbar::progress::{new, with_completion_policy};
///
/// let bar = new(40.0, &[with_completion_policy(CompletionPolicy::Once)]);
/// assert_eq!(bar.completion_policy, CompletionPolicy::Once);
/// ```
pub fn with_completion_policy(policy: CompletionPolicy) -> BarOption {
    BarOption::WithCompletionPolicy(policy)
}

/// Animated progress bar.
///
/// The owner feeds new values through [`Model::set_value`] and routes every
/// message to [`Model::update`]; the returned commands keep the animations
/// running. Styling fields are public and are read on every render.
#[derive(Clone)]
pub struct Model {
    /// Track width in columns.
    pub width: f64,
    /// Track height in rows.
    pub height: f64,
    /// Border thickness.
    pub border_width: f64,
    /// Border color.
    pub border_color: String,
    /// Corner radius of the track and fill.
    pub border_radius: f64,
    /// Fill color before completion.
    pub background_color: String,
    /// Fill color after completion. Enables the completion fade when set.
    pub background_color_on_complete: Option<String>,
    /// Track color behind the fill.
    pub underlying_color: Option<String>,
    /// Easing curve of the width animation.
    pub bar_easing: Easing,
    /// Width animation duration; the completion callback waits this long too.
    pub bar_animation_duration: Duration,
    /// Completion color fade duration.
    pub background_animation_duration: Duration,
    /// How the value maps to the fill width.
    pub width_scale: WidthScale,
    /// How often the completion callback may fire.
    pub completion_policy: CompletionPolicy,

    value: f64,
    max_value: f64,
    progress: f64, // last committed value
    on_complete: Option<OnComplete>,

    width_animation: AnimatedValue,
    background_animation: AnimatedValue,
    completion: CompletionTimer,
    completion_fired: bool,
    disposed: bool,
}

/// Creates a progress bar `width` columns wide.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progressbar::progress::{new, with_height, with_max_value};
///
/// let bar = new(200.0, &[with_height(5.0), with_max_value(50.0)]);
/// assert_eq!(bar.width, 200.0);
/// assert_eq!(bar.max_value(), 50.0);
/// assert_eq!(bar.progress(), 0.0);
/// ```
pub fn new(width: f64, opts: &[BarOption]) -> Model {
    let mut m = Model {
        width,
        height: DEFAULT_HEIGHT,
        border_width: DEFAULT_BORDER_WIDTH,
        border_color: DEFAULT_BORDER_COLOR.to_string(),
        border_radius: DEFAULT_BORDER_RADIUS,
        background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        background_color_on_complete: None,
        underlying_color: None,
        bar_easing: Easing::default(),
        bar_animation_duration: DEFAULT_BAR_ANIMATION_DURATION,
        background_animation_duration: DEFAULT_BACKGROUND_ANIMATION_DURATION,
        width_scale: WidthScale::default(),
        completion_policy: CompletionPolicy::default(),
        value: 0.0,
        max_value: DEFAULT_MAX_VALUE,
        progress: 0.0,
        on_complete: None,
        width_animation: AnimatedValue::new(0.0, Driver::Layout),
        background_animation: AnimatedValue::new(0.0, Driver::Compositor),
        completion: CompletionTimer::new(),
        completion_fired: false,
        disposed: false,
    };

    for opt in opts {
        opt.apply(&mut m);
    }
    m.progress = m.value;

    m
}

impl Model {
    /// Starts the width animation toward the initial value, if it is positive.
    ///
    /// Reaching the maximum at construction does not schedule the completion
    /// callback.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_progressbar::progress::{new, with_value};
    ///
    /// let mut idle = new(40.0, &[]);
    /// assert!(idle.init().is_none());
    ///
    /// let mut started = new(40.0, &[with_value(50.0)]);
    /// assert!(started.init().is_some());
    /// assert!(started.is_animating());
    /// ```
    pub fn init(&mut self) -> Option<Cmd> {
        if self.disposed || !(self.progress > 0.0) {
            return None;
        }
        self.animate_width(self.progress)
    }

    /// The value most recently supplied by the owner.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value at which the bar is complete.
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Changes the maximum used by later updates.
    ///
    /// The committed progress and the fill width are left as they are.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_progressbar::progress::new;
    ///
    /// let mut bar = new(200.0, &[]);
    /// bar.set_max_value(50.0);
    /// let _cmd = bar.set_value(50.0);
    /// assert_eq!(bar.max_value(), 50.0);
    /// assert_eq!(bar.progress(), 50.0);
    /// ```
    pub fn set_max_value(&mut self, max_value: f64) {
        self.max_value = max_value;
    }

    /// The last value committed to rendering.
    ///
    /// Values outside `[0, max_value]` are never committed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_progressbar::progress::new;
    ///
    /// let mut bar = new(40.0, &[]);
    /// let _cmd = bar.set_value(30.0);
    /// let _cmd = bar.set_value(250.0);
    /// assert_eq!(bar.value(), 250.0);
    /// assert_eq!(bar.progress(), 30.0);
    /// ```
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Replaces the completion callback.
    pub fn set_on_complete<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(callback));
    }

    /// Removes the completion callback and releases any pending notification.
    pub fn clear_on_complete(&mut self) {
        self.on_complete = None;
        self.completion.cancel();
    }

    /// Delay of the pending completion callback, if one is scheduled.
    ///
    /// Always the bar animation duration in effect when the maximum was
    /// committed, so the callback fires once the fill has visually settled.
    pub fn completion_delay(&self) -> Option<Duration> {
        self.completion.pending_delay()
    }

    /// Width the fill is animating toward, or resting at.
    pub fn target_width(&self) -> f64 {
        self.width_animation.target()
    }

    /// Live width of the fill.
    pub fn current_width(&self) -> f64 {
        self.width_animation.value()
    }

    /// Live position of the completion color fade, from 0 to 1.
    ///
    /// The fade never runs backwards: once the fill has reached the
    /// completion color it keeps it.
    pub fn background_fraction(&self) -> f64 {
        self.background_animation.value()
    }

    /// Whether either animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.width_animation.is_animating() || self.background_animation.is_animating()
    }

    /// Whether the completion callback is scheduled and has not fired yet.
    pub fn completion_pending(&self) -> bool {
        self.completion.is_pending()
    }

    /// Whether [`Model::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Supplies a new value.
    ///
    /// When the value changes, the fill animates toward its new width, and,
    /// if a completion color is configured and the value equals the maximum,
    /// the fill starts fading to that color. An in-range value different from
    /// the committed progress is committed; committing the maximum schedules
    /// the completion callback after [`Model::bar_animation_duration`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_progressbar::progress::new;
    ///
    /// let mut bar = new(200.0, &[]);
    /// let _cmd = bar.set_value(50.0);
    /// assert_eq!(bar.progress(), 50.0);
    /// assert_eq!(bar.target_width(), 98.0);
    ///
    /// // Out of range: the fill still animates, but nothing is committed
    /// let _cmd = bar.set_value(-5.0);
    /// assert_eq!(bar.progress(), 50.0);
    /// assert_eq!(bar.target_width(), 0.0);
    /// ```
    pub fn set_value(&mut self, value: f64) -> Option<Cmd> {
        if self.disposed {
            return None;
        }

        let previous = self.value;
        self.value = value;

        let mut cmds = Vec::new();
        if value != previous {
            cmds.extend(self.animate_width(value));
            if self.background_color_on_complete.is_some() && value == self.max_value {
                cmds.extend(self.animate_background());
            }
        }
        cmds.extend(self.commit(value));

        batch(cmds)
    }

    /// Handles animation frames and the completion notification.
    ///
    /// Fires the completion callback when its delay has elapsed. Messages
    /// meant for other components are ignored, as is everything after
    /// [`Model::dispose`].
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if self.disposed {
            return None;
        }

        if let Some(cmd) = self.width_animation.update(&msg) {
            return Some(cmd);
        }
        if let Some(cmd) = self.background_animation.update(&msg) {
            return Some(cmd);
        }
        if self.completion.update(&msg) {
            self.fire_completion();
        }

        None
    }

    /// Tears the bar down.
    ///
    /// Stops both animations and releases the pending completion callback.
    /// The bar ignores all messages and updates afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_progressbar::progress::{new, with_on_complete};
    ///
    /// let mut bar = new(40.0, &[with_on_complete(|| unreachable!())]);
    /// let _cmd = bar.set_value(100.0);
    /// assert!(bar.completion_pending());
    ///
    /// bar.dispose();
    /// assert!(!bar.completion_pending());
    /// assert!(!bar.is_animating());
    /// assert!(bar.set_value(50.0).is_none());
    /// ```
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.width_animation.stop();
        self.background_animation.stop();
        self.completion.cancel();
        self.disposed = true;
        log::debug!("progress bar disposed at {}", self.progress);
    }

    /// Describes the current frame: the track and the live fill.
    pub fn layout(&self) -> Layout {
        Layout {
            track: Track {
                width: self.width,
                height: self.height,
                border_width: self.border_width,
                border_color: self.border_color.clone(),
                border_radius: self.border_radius,
                underlying_color: self.underlying_color.clone(),
            },
            fill: Fill {
                width: self.width_animation.value(),
                height: self.height - self.border_width * 2.0,
                color: self.fill_color(),
                border_radius: self.border_radius,
            },
        }
    }

    /// Renders the bar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_progressbar::progress::{new, with_height};
    ///
    /// let bar = new(20.0, &[with_height(3.0)]);
    /// let view = bar.view();
    /// assert_eq!(view.lines().count(), 3);
    /// ```
    pub fn view(&self) -> String {
        self.layout().render()
    }

    fn fill_color(&self) -> FillColor {
        match &self.background_color_on_complete {
            Some(on_complete) => FillColor::Blend {
                from: self.background_color.clone(),
                to: on_complete.clone(),
                amount: self.background_animation.value(),
            },
            None => FillColor::Solid(self.background_color.clone()),
        }
    }

    fn animate_width(&mut self, value: f64) -> Option<Cmd> {
        let target = self.width_scale.fill_width(
            value,
            self.max_value,
            self.width,
            self.border_width,
        );
        self.width_animation
            .animate_to(target, self.bar_animation_duration, self.bar_easing)
    }

    fn animate_background(&mut self) -> Option<Cmd> {
        self.background_animation.animate_to(
            1.0,
            self.background_animation_duration,
            Curve::EaseInOut,
        )
    }

    fn commit(&mut self, value: f64) -> Option<Cmd> {
        if value == self.progress {
            return None;
        }
        if !(0.0..=self.max_value).contains(&value) {
            log::debug!(
                "value {} outside [0, {}], keeping progress at {}",
                value,
                self.max_value,
                self.progress
            );
            return None;
        }

        self.progress = value;
        if value != self.max_value {
            self.completion.cancel();
            return None;
        }

        if self.on_complete.is_none() {
            return None;
        }
        if self.completion_policy == CompletionPolicy::Once && self.completion_fired {
            return None;
        }
        Some(self.completion.schedule(self.bar_animation_duration))
    }

    fn fire_completion(&mut self) {
        if let Some(callback) = &self.on_complete {
            log::debug!("progress bar complete at {}", self.progress);
            self.completion_fired = true;
            callback();
        }
    }
}

fn batch(mut cmds: Vec<Cmd>) -> Option<Cmd> {
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(bubbletea_batch(cmds)),
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("value", &self.value)
            .field("max_value", &self.max_value)
            .field("progress", &self.progress)
            .field("bar_easing", &self.bar_easing)
            .field("width_animation", &self.width_animation)
            .field("background_animation", &self.background_animation)
            .field("completion", &self.completion)
            .field("on_complete", &self.on_complete.is_some())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Model::default();
        let cmd = model.init();
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
        new(DEFAULT_WIDTH, &[])
    }
}
