//! Easing curves for the progress bar's width animation.
//!
//! The set of curves is closed: a bar picks one of the [`Easing`] variants,
//! either directly or by parsing one of the lowercase names
//! (`"bounce"`, `"cubic"`, `"ease"`, `"sin"`, `"linear"`, `"quad"`).
//!
//! ```rust
//! use bubbletea_progressbar::easing::Easing;
//!
//! let easing: Easing = "quad".parse().unwrap();
//! assert_eq!(easing, Easing::Quad);
//! assert_eq!(easing.apply(0.5), 0.25);
//! ```

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when an easing name is not one of the supported curves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown easing `{name}`, expected one of: bounce, cubic, ease, sin, linear, quad")]
pub struct ParseEasingError {
    name: String,
}

impl ParseEasingError {
    /// The name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Timing curve applied to the width animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Bouncing settle at the end of the animation.
    Bounce,
    /// Cubic acceleration, `t³`.
    Cubic,
    /// Inertial start, `cubic-bezier(0.42, 0, 1, 1)`.
    Ease,
    /// Sinusoidal acceleration.
    Sin,
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic acceleration, `t²`.
    Quad,
}

impl Easing {
    /// Every supported curve, in declaration order.
    pub const ALL: [Easing; 6] = [
        Easing::Bounce,
        Easing::Cubic,
        Easing::Ease,
        Easing::Sin,
        Easing::Linear,
        Easing::Quad,
    ];

    /// Maps normalized time to animation progress.
    ///
    /// `t` is clamped to `[0, 1]`. Every curve starts at 0 and ends at 1.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Quad => t * t,
            Easing::Cubic => t * t * t,
            Easing::Sin => 1.0 - (t * FRAC_PI_2).cos(),
            Easing::Ease => EASE.solve(t),
            Easing::Bounce => bounce(t),
        }
    }

    /// The lowercase name used when parsing.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Bounce => "bounce",
            Easing::Cubic => "cubic",
            Easing::Ease => "ease",
            Easing::Sin => "sin",
            Easing::Linear => "linear",
            Easing::Quad => "quad",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .into_iter()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| ParseEasingError {
                name: s.to_string(),
            })
    }
}

/// Default timing curve of the host toolkit, `inOut(ease)`.
///
/// Used for animations that have no configured easing, such as the
/// completion color fade.
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        EASE.solve(t * 2.0) / 2.0
    } else {
        1.0 - EASE.solve((1.0 - t) * 2.0) / 2.0
    }
}

const EASE: CubicBezier = CubicBezier::new(0.42, 0.0, 1.0, 1.0);

fn bounce(t: f64) -> f64 {
    const K: f64 = 7.5625;
    if t < 1.0 / 2.75 {
        K * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        K * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        K * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        K * t * t + 0.984375
    }
}

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 1e-7;
const SUBDIVISION_MAX_ITERATIONS: usize = 20;

/// Cubic bezier timing curve through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    /// Creates a curve from its two control points.
    ///
    /// `x1` and `x2` should lie in `[0, 1]` so the curve is a function of time.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns the curve's y for the given x (normalized time).
    pub fn solve(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        if self.x1 == self.y1 && self.x2 == self.y2 {
            return x;
        }
        sample(self.y1, self.y2, self.t_for_x(x))
    }

    fn t_for_x(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let slope = slope(self.x1, self.x2, t);
            if slope.abs() < NEWTON_MIN_SLOPE {
                return self.subdivide(x);
            }
            let err = sample(self.x1, self.x2, t) - x;
            if err.abs() < SUBDIVISION_PRECISION {
                return t;
            }
            t -= err / slope;
        }
        if (sample(self.x1, self.x2, t) - x).abs() < SUBDIVISION_PRECISION {
            t
        } else {
            self.subdivide(x)
        }
    }

    fn subdivide(&self, x: f64) -> f64 {
        let (mut lo, mut hi) = (0.0, 1.0);
        let mut t = x;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            t = lo + (hi - lo) / 2.0;
            let err = sample(self.x1, self.x2, t) - x;
            if err.abs() < SUBDIVISION_PRECISION {
                break;
            }
            if err > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
        }
        t
    }
}

// Bernstein form with fixed endpoints 0 and 1.
fn sample(p1: f64, p2: f64, t: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

fn slope(p1: f64, p2: f64, t: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    3.0 * a * t * t + 2.0 * b * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < EPS, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{easing} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.0), easing.apply(1.0));
        }
    }

    #[test]
    fn test_polynomial_curves() {
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
        assert_eq!(Easing::Quad.apply(0.5), 0.25);
        assert_eq!(Easing::Cubic.apply(0.5), 0.125);
    }

    #[test]
    fn test_sin_curve() {
        let expected = 1.0 - (0.5 * FRAC_PI_2).cos();
        assert!((Easing::Sin.apply(0.5) - expected).abs() < EPS);
    }

    #[test]
    fn test_bounce_segments() {
        // Touches 1.0 between bounces, bottoms out at each segment's vertex.
        assert!((Easing::Bounce.apply(1.0 / 2.75) - 1.0).abs() < EPS);
        assert!((Easing::Bounce.apply(2.0 / 2.75) - 1.0).abs() < EPS);
        assert!((Easing::Bounce.apply(1.5 / 2.75) - 0.75).abs() < EPS);
        assert!((Easing::Bounce.apply(2.25 / 2.75) - 0.9375).abs() < EPS);
        assert!((Easing::Bounce.apply(2.625 / 2.75) - 0.984375).abs() < EPS);
    }

    #[test]
    fn test_ease_is_monotonic_and_slow_to_start() {
        let mut previous = 0.0;
        for i in 1..=100 {
            let t = i as f64 / 100.0;
            let v = Easing::Ease.apply(t);
            assert!(v >= previous - EPS, "ease decreased at t={t}");
            previous = v;
        }
        assert!(Easing::Ease.apply(0.25) < 0.25);
    }

    #[test]
    fn test_bezier_inverts_x() {
        let curve = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
        for i in 1..10 {
            let x = i as f64 / 10.0;
            let t = curve.t_for_x(x);
            assert!((sample(curve.x1, curve.x2, t) - x).abs() < 1e-5);
        }
    }

    #[test]
    fn test_linear_bezier_shortcut() {
        let curve = CubicBezier::new(0.3, 0.3, 0.7, 0.7);
        assert_eq!(curve.solve(0.42), 0.42);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        assert!((ease_in_out(0.5) - 0.5).abs() < EPS);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!((ease_in_out(t) + ease_in_out(1.0 - t) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_parse_names() {
        for easing in Easing::ALL {
            assert_eq!(easing.name().parse::<Easing>(), Ok(easing));
            assert_eq!(easing.to_string(), easing.name());
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "elastic".parse::<Easing>().unwrap_err();
        assert_eq!(err.name(), "elastic");
        assert!(err.to_string().contains("elastic"));
        assert!("Linear".parse::<Easing>().is_err());
    }

    #[test]
    fn test_default_is_linear() {
        assert_eq!(Easing::default(), Easing::Linear);
    }
}
