use crate::animation::PULSE_FRACTION;
use crate::geometry::{Point, Rect, Size};
use crate::settings::Dimensions;
use crate::target::{Shape, TargetSpec};
use std::fmt;

/// The drawable area. Boundaries default to the top and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub top_boundary: Option<f64>,
    pub bottom_boundary: Option<f64>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            top_boundary: None,
            bottom_boundary: None,
        }
    }

    pub fn with_boundaries(mut self, top: Option<f64>, bottom: Option<f64>) -> Self {
        self.top_boundary = top;
        self.bottom_boundary = bottom;
        self
    }

    pub fn top(&self) -> f64 {
        self.top_boundary.unwrap_or(0.0)
    }

    pub fn bottom(&self) -> f64 {
        self.bottom_boundary.unwrap_or(self.height)
    }

    /// Region drawing is clipped to, if any boundary is set.
    pub fn clip(&self) -> Option<Rect> {
        if self.top_boundary.is_none() && self.bottom_boundary.is_none() {
            return None;
        }
        Some(Rect::new(0.0, self.top(), self.width, self.bottom()))
    }

    pub fn text_width(&self, dims: &Dimensions) -> f64 {
        (self.width - 2.0 * dims.text_padding).max(0.0)
    }
}

pub trait TextMeasurer: fmt::Debug {
    fn measure(&self, text: &str, font_size: f64, max_width: f64) -> Size;
}

/// Fixed-advance approximation with greedy word wrapping. Good enough for
/// tests and for hosts without a font engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.2,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font_size: f64, max_width: f64) -> Size {
        let advance = self.advance * font_size;
        let mut widest = 0.0_f64;
        let mut lines = 0;

        for paragraph in text.lines() {
            lines += 1;
            let mut line = 0.0_f64;
            for word in paragraph.split_whitespace() {
                let width = word.chars().count() as f64 * advance;
                if line == 0.0 {
                    line = width;
                } else if line + advance + width > max_width {
                    widest = widest.max(line);
                    lines += 1;
                    line = width;
                } else {
                    line += advance + width;
                }
            }
            widest = widest.max(line);
        }

        Size::new(
            widest.min(max_width.max(0.0)),
            lines as f64 * self.line_height * font_size,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub title: Size,
    pub description: Option<Size>,
}

impl TextMetrics {
    pub fn measure(spec: &TargetSpec, measurer: &dyn TextMeasurer, max_width: f64) -> Self {
        let style = spec.style();
        Self {
            title: measurer.measure(spec.title(), style.title_text_size, max_width),
            description: spec
                .description()
                .map(|text| measurer.measure(text, style.description_text_size, max_width)),
        }
    }

    pub fn total_height(&self, spacing: f64) -> f64 {
        self.title.height + spacing + self.description.map_or(0.0, |d| d.height)
    }

    pub fn total_width(&self) -> f64 {
        self.description
            .map_or(self.title.width, |d| d.width.max(self.title.width))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGeometry {
    pub bounds: Rect,
    pub radius: f64,
    pub padding: f64,
}

impl TargetGeometry {
    /// An explicit radius wins. Otherwise ovals use half their height and
    /// circles the default radius.
    pub fn new(spec: &TargetSpec, bounds: Rect, dims: &Dimensions) -> Self {
        let radius = spec.target_radius().unwrap_or(match spec.shape() {
            Shape::Circle => dims.target_radius,
            Shape::Oval => bounds.height() / 2.0,
        });
        Self {
            bounds,
            radius,
            padding: spec.padding().unwrap_or(dims.target_padding),
        }
    }

    /// How far the outer circle must reach past the target rectangle to also
    /// cover the pulsing target circle and its padding.
    pub fn expansion(&self) -> f64 {
        (self.radius * (1.0 + PULSE_FRACTION)).max(self.radius + self.padding)
    }

    fn text_fits_above(&self, text_height: f64, viewport: &Viewport) -> bool {
        self.bounds.center().y - self.radius - self.padding - text_height > viewport.top()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    pub outer_center: Point,
    pub outer_radius: f64,
    pub text_rect: Rect,
    pub target: TargetGeometry,
    pub metrics: TextMetrics,
}

impl LayoutResult {
    pub fn target_bounds(&self) -> Rect {
        self.target.bounds
    }
}

/// Too close to the top or bottom boundary to offset the halo toward the text.
pub fn in_gutter(y: f64, viewport: &Viewport, dims: &Dimensions) -> bool {
    y < viewport.top() + dims.gutter || y > viewport.bottom() - dims.gutter
}

pub fn compute_text_rect(
    target: &TargetGeometry,
    metrics: &TextMetrics,
    viewport: &Viewport,
    dims: &Dimensions,
) -> Rect {
    let height = metrics.total_height(dims.text_spacing);
    let width = metrics.total_width();
    let center = target.bounds.center();

    let top = if target.text_fits_above(height, viewport) {
        center.y - target.radius - target.padding - height
    } else {
        center.y + target.radius + target.padding
    };

    let half = viewport.width / 2.0;
    let bias = if center.x < half {
        dims.text_bias
    } else if center.x > half {
        -dims.text_bias
    } else {
        0.0
    };
    let left = (center.x - width / 2.0 + bias)
        .min(viewport.width - dims.text_padding - width)
        .max(dims.text_padding);

    Rect::from_origin_size(Point::new(left, top), Size::new(width, height))
}

pub fn compute_outer_circle(
    target: &TargetGeometry,
    text_rect: &Rect,
    metrics: &TextMetrics,
    viewport: &Viewport,
    dims: &Dimensions,
) -> (Point, f64) {
    let target_center = target.bounds.center();

    let center = if in_gutter(target_center.y, viewport, dims) {
        target_center
    } else {
        let reach = target.bounds.width().max(target.bounds.height()) / 2.0 + target.padding;
        let left = text_rect.left.min(target.bounds.left - reach);
        let right = text_rect.right.max(target.bounds.right + reach);

        let height = metrics.total_height(dims.text_spacing);
        let title = metrics.title.height;
        let y = if target.text_fits_above(height, viewport) {
            target_center.y - target.radius - target.padding - height + title
        } else {
            target_center.y + target.radius + target.padding + title
        };
        Point::new((left + right) / 2.0, y)
    };

    let expanded = target.bounds.expand(target.expansion());
    let radius = text_rect
        .max_corner_distance(center)
        .max(expanded.max_corner_distance(center))
        + dims.circle_padding;

    (center, radius)
}

pub fn layout(
    target: TargetGeometry,
    metrics: TextMetrics,
    viewport: &Viewport,
    dims: &Dimensions,
) -> LayoutResult {
    let text_rect = compute_text_rect(&target, &metrics, viewport, dims);
    let (outer_center, outer_radius) =
        compute_outer_circle(&target, &text_rect, &metrics, viewport, dims);

    LayoutResult {
        outer_center,
        outer_radius,
        text_rect,
        target,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> TextMetrics {
        TextMetrics {
            title: Size::new(100.0, 20.0),
            description: Some(Size::new(200.0, 40.0)),
        }
    }

    fn target_at(x: f64, y: f64) -> TargetGeometry {
        TargetGeometry {
            bounds: Rect::new(x - 20.0, y - 20.0, x + 20.0, y + 20.0),
            radius: 44.0,
            padding: 20.0,
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(400.0, 800.0)
    }

    #[test]
    fn test_text_metrics_totals() {
        let metrics = metrics();
        assert_eq!(metrics.total_height(8.0), 68.0);
        assert_eq!(metrics.total_width(), 200.0);

        let title_only = TextMetrics {
            title: Size::new(100.0, 20.0),
            description: None,
        };
        assert_eq!(title_only.total_height(8.0), 28.0);
        assert_eq!(title_only.total_width(), 100.0);
    }

    #[test]
    fn test_text_above_target_when_room() {
        let dims = Dimensions::default();
        let rect = compute_text_rect(&target_at(200.0, 520.0), &metrics(), &viewport(), &dims);
        assert_eq!(rect, Rect::new(100.0, 388.0, 300.0, 456.0));
    }

    #[test]
    fn test_text_below_target_near_top() {
        let dims = Dimensions::default();
        let rect = compute_text_rect(&target_at(200.0, 100.0), &metrics(), &viewport(), &dims);
        assert_eq!(rect.top, 164.0);
        assert_eq!(rect.height(), 68.0);

        // a top boundary pushes the text below as well
        let bounded = viewport().with_boundaries(Some(400.0), None);
        let rect = compute_text_rect(&target_at(200.0, 520.0), &metrics(), &bounded, &dims);
        assert_eq!(rect.top, 584.0);
    }

    #[test]
    fn test_text_is_biased_and_clamped() {
        let dims = Dimensions::default();
        let left_side = compute_text_rect(&target_at(150.0, 520.0), &metrics(), &viewport(), &dims);
        assert_eq!(left_side.left, 70.0);

        let right_edge = compute_text_rect(&target_at(380.0, 520.0), &metrics(), &viewport(), &dims);
        assert_eq!(right_edge.right, 360.0);

        let wide = TextMetrics {
            title: Size::new(350.0, 20.0),
            description: None,
        };
        let pinned = compute_text_rect(&target_at(300.0, 520.0), &wide, &viewport(), &dims);
        assert_eq!(pinned.left, dims.text_padding);
    }

    #[test]
    fn test_gutter_centers_on_target() {
        let dims = Dimensions::default();
        let target = target_at(300.0, 50.0);
        let result = layout(target, metrics(), &viewport(), &dims);
        assert_eq!(result.outer_center, Point::new(300.0, 50.0));

        let target = target_at(100.0, 760.0);
        let result = layout(target, metrics(), &viewport(), &dims);
        assert_eq!(result.outer_center, Point::new(100.0, 760.0));
    }

    #[test]
    fn test_outer_circle_offsets_toward_text() {
        let dims = Dimensions::default();
        let result = layout(target_at(200.0, 520.0), metrics(), &viewport(), &dims);
        assert_eq!(result.outer_center.y, 520.0 - 44.0 - 20.0 - 68.0 + 20.0);
        assert_eq!(result.outer_center.x, 200.0);
    }

    #[test]
    fn test_outer_circle_covers_target_and_text() {
        let dims = Dimensions::default();
        let vp = viewport();
        for radius in [0.0, 10.0, 44.0, 80.0] {
            for padding in [0.0, 8.0, 20.0, 40.0] {
                for y in [0.0, 30.0, 120.0, 300.0, 520.0, 700.0, 790.0, 800.0] {
                    for x in [0.0, 60.0, 200.0, 340.0, 400.0] {
                        let target = TargetGeometry {
                            radius,
                            padding,
                            ..target_at(x, y)
                        };
                        let result = layout(target, metrics(), &vp, &dims);
                        let center = result.outer_center;
                        let needed = result
                            .text_rect
                            .corners()
                            .into_iter()
                            .chain(target.bounds.expand(radius + padding).corners())
                            .map(|corner| center.distance(corner))
                            .fold(0.0, f64::max)
                            + dims.circle_padding;
                        assert!(
                            result.outer_radius >= needed - 1e-9,
                            "radius {radius}, padding {padding}, target at ({x}, {y})"
                        );

                        let pulse = center.distance(target.bounds.center())
                            + radius * (1.0 + PULSE_FRACTION);
                        assert!(result.outer_radius >= pulse - 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_degenerate_inputs_stay_finite() {
        let dims = Dimensions::default();
        let point = TargetGeometry {
            bounds: Rect::new(200.0, 400.0, 200.0, 400.0),
            radius: 0.0,
            padding: 0.0,
        };
        let empty = TextMetrics::default();
        let result = layout(point, empty, &viewport(), &dims);
        assert!(result.outer_radius.is_finite());
        assert!(result.outer_radius >= dims.circle_padding);
        assert!(result.outer_center.x.is_finite() && result.outer_center.y.is_finite());
    }

    #[test]
    fn test_monospace_measurer_wraps_words() {
        let measurer = MonospaceMeasurer::default();
        assert_eq!(measurer.measure("abcd", 10.0, 100.0), Size::new(20.0, 12.0));

        // "aaaa bbbb" is 45 wide; at 30 it breaks into two lines
        let wrapped = measurer.measure("aaaa bbbb", 10.0, 30.0);
        assert_eq!(wrapped, Size::new(20.0, 24.0));

        let paragraphs = measurer.measure("one\ntwo", 10.0, 100.0);
        assert_eq!(paragraphs.height, 24.0);
    }

    #[test]
    fn test_oval_radius_follows_height() {
        let dims = Dimensions::default();
        let bounds = Rect::new(0.0, 0.0, 120.0, 30.0);
        let spec = TargetSpec::builder()
            .title("Oval")
            .fixed_bounds(bounds)
            .shape(Shape::Oval)
            .build()
            .unwrap();
        assert_eq!(TargetGeometry::new(&spec, bounds, &dims).radius, 15.0);

        let spec = TargetSpec::for_bounds(bounds, "Circle").unwrap();
        assert_eq!(TargetGeometry::new(&spec, bounds, &dims).radius, 44.0);
    }

    #[test]
    fn test_viewport_clip() {
        assert_eq!(viewport().clip(), None);
        let bounded = viewport().with_boundaries(Some(56.0), None);
        assert_eq!(bounded.clip(), Some(Rect::new(0.0, 56.0, 400.0, 800.0)));
        assert_eq!(bounded.text_width(&Dimensions::default()), 320.0);
    }
}
