//! Geometry, colors and rendering of the progress bar.
//!
//! A [`Layout`] describes one rendered frame of the bar: the outer bordered
//! [`Track`] and the inner [`Fill`]. Geometry is measured in terminal cells
//! and only rounded when the layout is rendered to a string.

use lipgloss_extras::lipgloss;
use lipgloss_extras::lipgloss::blending::blend_1d;
use lipgloss_extras::prelude::*;

// Resolution of the completion color fade.
const BLEND_STEPS: usize = 101;

/// Divisor applied to the value when computing the fill width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthScale {
    /// Treat the value as a percentage of the track, whatever the maximum is.
    #[default]
    Percent,
    /// Scale the value by the configured maximum.
    MaxValue,
}

impl WidthScale {
    /// Width the fill rests at for `value`, never below zero.
    ///
    /// ```rust
    /// use bubbletea_progressbar::style::WidthScale;
    ///
    /// assert_eq!(WidthScale::Percent.fill_width(50.0, 100.0, 200.0, 1.0), 98.0);
    /// assert_eq!(WidthScale::MaxValue.fill_width(100.0, 200.0, 100.0, 1.0), 48.0);
    /// assert_eq!(WidthScale::Percent.fill_width(-5.0, 100.0, 200.0, 1.0), 0.0);
    /// ```
    pub fn fill_width(self, value: f64, max_value: f64, width: f64, border_width: f64) -> f64 {
        let scale = match self {
            WidthScale::Percent => 100.0,
            WidthScale::MaxValue => max_value,
        };
        if !(scale > 0.0) {
            return 0.0;
        }

        let fill = value / scale * width - border_width * 2.0;
        if fill > 0.0 {
            fill
        } else {
            0.0
        }
    }
}

/// Color of the fill.
#[derive(Debug, Clone, PartialEq)]
pub enum FillColor {
    /// A flat color.
    Solid(String),
    /// A point on the fade from `from` to `to`; `amount` is in `[0, 1]`.
    Blend {
        /// Color at amount 0.
        from: String,
        /// Color at amount 1.
        to: String,
        /// Position along the fade.
        amount: f64,
    },
}

impl FillColor {
    /// Whether this color is interpolated.
    pub fn is_blended(&self) -> bool {
        matches!(self, FillColor::Blend { .. })
    }

    /// Converts to a lipgloss color, blending perceptually for [`FillColor::Blend`].
    pub fn resolve(&self) -> Color {
        match self {
            FillColor::Solid(color) => Color::from(color.as_str()),
            FillColor::Blend { from, to, amount } => {
                if !(*amount > 0.0) {
                    return Color::from(from.as_str());
                }
                if *amount >= 1.0 {
                    return Color::from(to.as_str());
                }
                let ramp = blend_1d(
                    BLEND_STEPS,
                    vec![Color::from(from.as_str()), Color::from(to.as_str())],
                );
                let idx = (amount * (BLEND_STEPS - 1) as f64).round() as usize;
                ramp[idx.min(ramp.len() - 1)].clone()
            }
        }
    }
}

/// The outer, bordered box.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Columns, border included.
    pub width: f64,
    /// Rows, border included.
    pub height: f64,
    /// Border thickness; anything from half a cell up draws a one-cell frame.
    ///
    /// The thickness still narrows and shortens the fill, so rows and columns
    /// inside a thick frame that the fill does not reach show the track.
    pub border_width: f64,
    /// Border color.
    pub border_color: String,
    /// Corner radius; a positive radius rounds the frame's corners.
    pub border_radius: f64,
    /// Color shown behind the fill.
    pub underlying_color: Option<String>,
}

/// The inner, animated box.
///
/// Terminal cells have no sub-cell corners, so `border_radius` only affects
/// the track's frame when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    /// Live width of the fill.
    pub width: f64,
    /// Height of the fill, the track height minus both borders.
    pub height: f64,
    /// Live color of the fill.
    pub color: FillColor,
    /// Corner radius.
    pub border_radius: f64,
}

/// One rendered frame of the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Outer box.
    pub track: Track,
    /// Inner box.
    pub fill: Fill,
}

impl Layout {
    /// Whether the track draws a border frame.
    pub fn framed(&self) -> bool {
        self.track.border_width >= 0.5 && cells(self.track.width) >= 2 && cells(self.track.height) >= 2
    }

    /// Number of filled columns inside the frame.
    pub fn fill_cells(&self) -> usize {
        let (inner_cols, _) = self.inner_cells();
        cells(self.fill.width).min(inner_cols)
    }

    /// Number of filled rows inside the frame.
    pub fn fill_rows(&self) -> usize {
        let (_, inner_rows) = self.inner_cells();
        cells(self.fill.height).min(inner_rows)
    }

    /// Renders the layout as a styled terminal string.
    pub fn render(&self) -> String {
        let (inner_cols, inner_rows) = self.inner_cells();
        let fill_cols = self.fill_cells();
        let fill_rows = self.fill_rows();

        let fill_style = Style::new().background(self.fill.color.resolve());
        let mut rest_style = Style::new();
        if let Some(color) = &self.track.underlying_color {
            rest_style = rest_style.background(Color::from(color.as_str()));
        }

        let mut filled = String::new();
        if fill_cols > 0 {
            filled.push_str(&fill_style.render(&" ".repeat(fill_cols)));
        }
        if inner_cols > fill_cols {
            filled.push_str(&rest_style.render(&" ".repeat(inner_cols - fill_cols)));
        }
        let empty = if inner_cols > 0 {
            rest_style.render(&" ".repeat(inner_cols))
        } else {
            String::new()
        };

        let mut lines = vec![filled; fill_rows];
        lines.resize(inner_rows, empty);
        let body = lines.join("\n");

        if !self.framed() {
            return body;
        }

        let border = if self.track.border_radius > 0.0 {
            lipgloss::rounded_border()
        } else {
            lipgloss::normal_border()
        };
        Style::new()
            .border_style(border)
            .border_top(true)
            .border_right(true)
            .border_bottom(true)
            .border_left(true)
            .border_foreground(Color::from(self.track.border_color.as_str()))
            .render(&body)
    }

    fn inner_cells(&self) -> (usize, usize) {
        let cols = cells(self.track.width);
        let rows = cells(self.track.height);
        if self.framed() {
            (cols - 2, rows - 2)
        } else {
            (cols, rows)
        }
    }
}

// Largest extent a terminal reports, in cells.
const MAX_CELLS: f64 = u16::MAX as f64;

// NaN and negative sizes render as nothing.
fn cells(size: f64) -> usize {
    if size.is_finite() && size > 0.0 {
        size.round().min(MAX_CELLS) as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: f64, height: f64, border_width: f64, fill: f64) -> Layout {
        Layout {
            track: Track {
                width,
                height,
                border_width,
                border_color: "#C8CCCE".to_string(),
                border_radius: 6.0,
                underlying_color: None,
            },
            fill: Fill {
                width: fill,
                height: height - border_width * 2.0,
                color: FillColor::Solid("#148cF0".to_string()),
                border_radius: 6.0,
            },
        }
    }

    #[test]
    fn test_percent_scale_ignores_max_value() {
        assert_eq!(WidthScale::Percent.fill_width(50.0, 100.0, 200.0, 1.0), 98.0);
        assert_eq!(WidthScale::Percent.fill_width(50.0, 400.0, 200.0, 1.0), 98.0);
        assert_eq!(WidthScale::Percent.fill_width(150.0, 200.0, 200.0, 1.0), 298.0);
    }

    #[test]
    fn test_max_value_scale() {
        assert_eq!(WidthScale::MaxValue.fill_width(50.0, 200.0, 200.0, 1.0), 48.0);
        assert_eq!(WidthScale::MaxValue.fill_width(200.0, 200.0, 200.0, 1.0), 198.0);
        assert_eq!(WidthScale::MaxValue.fill_width(10.0, 0.0, 200.0, 1.0), 0.0);
    }

    #[test]
    fn test_fill_width_clamps_at_zero() {
        assert_eq!(WidthScale::Percent.fill_width(0.0, 100.0, 200.0, 1.0), 0.0);
        assert_eq!(WidthScale::Percent.fill_width(0.5, 100.0, 200.0, 1.0), 0.0);
        assert_eq!(WidthScale::Percent.fill_width(f64::NAN, 100.0, 200.0, 1.0), 0.0);
    }

    #[test]
    fn test_fill_color_endpoints() {
        let solid = FillColor::Solid("#148cF0".to_string());
        assert!(!solid.is_blended());

        let start = FillColor::Blend {
            from: "#148cF0".to_string(),
            to: "#00FF00".to_string(),
            amount: 0.0,
        };
        let end = FillColor::Blend {
            from: "#148cF0".to_string(),
            to: "#00FF00".to_string(),
            amount: 1.0,
        };
        assert!(start.is_blended());

        let render = |color: Color| Style::new().background(color).render(" ");
        assert_eq!(render(start.resolve()), render(Color::from("#148cF0")));
        assert_eq!(render(end.resolve()), render(Color::from("#00FF00")));
    }

    #[test]
    fn test_fill_cells_are_bounded_by_frame() {
        let layout = layout(20.0, 3.0, 1.0, 500.0);
        assert!(layout.framed());
        assert_eq!(layout.fill_cells(), 18);
    }

    #[test]
    fn test_fill_cells_round() {
        assert_eq!(layout(20.0, 3.0, 1.0, 8.4).fill_cells(), 8);
        assert_eq!(layout(20.0, 3.0, 1.0, 8.6).fill_cells(), 9);
        assert_eq!(layout(20.0, 3.0, 1.0, -4.0).fill_cells(), 0);
    }

    #[test]
    fn test_render_framed_track() {
        let view = layout(12.0, 3.0, 1.0, 5.0).render();
        let plain = lipgloss::strip_ansi(&view);
        let lines: Vec<&str> = plain.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(plain.starts_with('╭'));
        assert_eq!(lipgloss::width_visible(lines[1]), 12);
    }

    #[test]
    fn test_render_square_corners_without_radius() {
        let mut layout = layout(12.0, 3.0, 1.0, 5.0);
        layout.track.border_radius = 0.0;
        let plain = lipgloss::strip_ansi(&layout.render());
        assert!(plain.starts_with('┌'));
    }

    #[test]
    fn test_render_without_border() {
        let layout = layout(10.0, 2.0, 0.0, 4.0);
        assert!(!layout.framed());

        let plain = lipgloss::strip_ansi(&layout.render());
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.chars().all(|c| c == ' ')));
        assert_eq!(lipgloss::width_visible(lines[0]), 10);
    }

    #[test]
    fn test_render_degenerate_geometry() {
        let layout = layout(-10.0, f64::NAN, 1.0, 3.0);
        assert!(!layout.framed());
        assert_eq!(layout.fill_cells(), 0);
        assert!(layout.render().is_empty());
    }

    #[test]
    fn test_render_huge_geometry() {
        let layout = layout(1e20, 3.0, 1.0, 1e20);
        assert!(layout.framed());
        assert_eq!(layout.fill_cells(), u16::MAX as usize - 2);

        let plain = lipgloss::strip_ansi(&layout.render());
        assert_eq!(plain.lines().count(), 3);
    }

    #[test]
    fn test_render_thick_border_shortens_fill() {
        let layout = layout(12.0, 10.0, 3.0, 4.0);
        assert_eq!(layout.fill.height, 4.0);
        assert_eq!(layout.fill_rows(), 4);

        let view = layout.render();
        let plain = lipgloss::strip_ansi(&view);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|line| lipgloss::width_visible(line) == 12));

        // Rows below the fill carry no fill color.
        let fill_row = view.lines().nth(1).unwrap_or("");
        let track_row = view.lines().nth(6).unwrap_or("");
        assert_eq!(track_row, view.lines().nth(8).unwrap_or(""));
        if view != plain {
            assert_ne!(fill_row, track_row);
        }
    }

    #[test]
    fn test_fill_rows_bounded_by_frame() {
        let mut layout = layout(12.0, 5.0, 1.0, 4.0);
        assert_eq!(layout.fill_rows(), 3);
        layout.fill.height = 40.0;
        assert_eq!(layout.fill_rows(), 3);
        layout.fill.height = -1.0;
        assert_eq!(layout.fill_rows(), 0);
    }
}
