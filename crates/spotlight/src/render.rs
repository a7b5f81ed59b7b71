use crate::animation::{AnimationState, Phase};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{LayoutResult, Viewport};
use crate::settings::Dimensions;
use crate::target::{Icon, Shape, TargetSpec};
use crate::theme::ResolvedColors;
use palette::{Srgb, Srgba, WithAlpha};

const SHADOW_ALPHA: f64 = 0.2;

pub trait RenderSurface {
    fn draw(&mut self, frame: &Frame<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: Point,
    pub radius: f64,
    pub color: Srgba<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    pub shape: Shape,
    pub center: Point,
    pub radius: f64,
    /// Semi-axes of the drawn shape; both equal `radius` for circles.
    pub half_extent: Size,
    pub color: Srgba<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlock<'a> {
    pub text: &'a str,
    pub origin: Point,
    pub size: Size,
    pub font_size: f64,
    pub color: Srgba<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconFrame<'a> {
    pub icon: &'a Icon,
    pub center: Point,
    pub alpha: f64,
    pub tint: Option<Srgb<f64>>,
}

/// Wireframe of the layout, drawn when debugging is enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugGeometry {
    pub text_rect: Rect,
    pub target_rect: Rect,
    pub outer_center: Point,
    /// Outer radius without the circle padding.
    pub content_radius: f64,
    /// Target radius plus padding.
    pub target_ring: f64,
}

/// Drawn in field order. Text is clipped to the outer circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub phase: Phase,
    pub clip: Option<Rect>,
    pub dim: Option<Srgba<f64>>,
    pub shadow: Option<Disc>,
    pub outer_circle: Disc,
    pub pulse: Option<Disc>,
    pub target: Mark,
    /// Punch the target shape out of the overlay instead of filling it.
    pub transparent_target: bool,
    pub title: TextBlock<'a>,
    pub description: Option<TextBlock<'a>>,
    pub icon: Option<IconFrame<'a>>,
    pub debug: Option<DebugGeometry>,
}

impl<'a> Frame<'a> {
    pub(crate) fn compose(
        spec: &'a TargetSpec,
        layout: &LayoutResult,
        state: &AnimationState,
        colors: &ResolvedColors,
        viewport: &Viewport,
        dims: &Dimensions,
        debug: bool,
    ) -> Self {
        let params = &state.params;
        let style = spec.style();
        let target_center = layout.target.bounds.center();

        let outer_circle = Disc {
            center: layout.outer_center,
            radius: params.outer_radius,
            color: colors.outer_circle.with_alpha(params.outer_alpha),
        };

        let shadow = spec.draw_shadow().then(|| Disc {
            center: layout.outer_center.offset(0.0, dims.shadow),
            radius: params.outer_radius,
            color: Srgb::new(0.0, 0.0, 0.0).with_alpha(SHADOW_ALPHA * params.outer_alpha),
        });

        let pulse = (params.pulse_alpha > 0.0).then(|| Disc {
            center: target_center,
            radius: params.pulse_radius,
            color: colors.target_circle.with_alpha(params.pulse_alpha),
        });

        let scale = if layout.target.radius > 0.0 {
            params.target_radius / layout.target.radius
        } else {
            1.0
        };
        let half_extent = match spec.shape() {
            Shape::Circle => Size::new(params.target_radius, params.target_radius),
            Shape::Oval => Size::new(
                layout.target.bounds.width() / 2.0 * scale,
                layout.target.bounds.height() / 2.0 * scale,
            ),
        };
        let target = Mark {
            shape: spec.shape(),
            center: target_center,
            radius: params.target_radius,
            half_extent,
            color: colors.target_circle.with_alpha(params.target_alpha),
        };

        let text_rect = layout.text_rect;
        let title = TextBlock {
            text: spec.title(),
            origin: text_rect.origin(),
            size: Size::new(text_rect.width(), layout.metrics.title.height),
            font_size: style.title_text_size,
            color: colors.title.with_alpha(params.text_alpha),
        };
        let description = spec
            .description()
            .zip(layout.metrics.description)
            .map(|(text, size)| TextBlock {
                text,
                origin: text_rect
                    .origin()
                    .offset(0.0, layout.metrics.title.height + dims.text_spacing),
                size: Size::new(text_rect.width(), size.height),
                font_size: style.description_text_size,
                color: colors
                    .description
                    .with_alpha(style.description_text_alpha * params.text_alpha),
            });

        let icon = spec.icon().map(|icon| IconFrame {
            icon,
            center: target_center,
            alpha: params.target_alpha,
            tint: spec.tint_target().then_some(colors.outer_circle),
        });

        let debug = debug.then(|| DebugGeometry {
            text_rect,
            target_rect: layout.target.bounds,
            outer_center: layout.outer_center,
            content_radius: layout.outer_radius - dims.circle_padding,
            target_ring: layout.target.radius + layout.target.padding,
        });

        Self {
            phase: state.phase,
            clip: viewport.clip(),
            dim: colors.dim,
            shadow,
            outer_circle,
            pulse,
            target,
            transparent_target: spec.transparent_target(),
            title,
            description,
            icon,
            debug,
        }
    }
}
