use crate::bounds::{BoundsResolver, FixedBoundsResolver};
use crate::error::ConfigurationError;
use crate::geometry::Rect;
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde_with::DeserializeFromStr;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use strum::{Display as StrumDisplay, EnumString};

/// Caller-chosen identifier, used by [`Sequence::start_with`](crate::Sequence::start_with).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From)]
pub enum TargetId {
    #[display("{_0}")]
    Name(String),
    #[display("#{_0}")]
    Index(i64),
}

impl From<&str> for TargetId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumString,
    DeserializeFromStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Shape {
    #[default]
    Circle,
    Oval,
}

/// Image drawn on top of the target circle. Loading it is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, From, Into, AsRef)]
pub struct Icon(PathBuf);

impl Icon {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

/// Colors, alphas and text sizes. Unset colors are filled in by the
/// [`ThemeResolver`](crate::ThemeResolver) when the overlay is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStyle {
    pub outer_circle_color: Option<Srgb<f64>>,
    pub outer_circle_alpha: f64,
    pub target_circle_color: Option<Srgb<f64>>,
    pub dim_color: Option<Srgb<f64>>,
    pub title_text_color: Option<Srgb<f64>>,
    pub description_text_color: Option<Srgb<f64>>,
    pub title_text_size: f64,
    pub description_text_size: f64,
    pub description_text_alpha: f64,
}

impl Default for TargetStyle {
    fn default() -> Self {
        Self {
            outer_circle_color: None,
            outer_circle_alpha: 0.96,
            target_circle_color: None,
            dim_color: None,
            title_text_color: None,
            description_text_color: None,
            title_text_size: 20.0,
            description_text_size: 18.0,
            description_text_alpha: 0.54,
        }
    }
}

/// One highlight target. Immutable once built; share it with `Rc`.
pub struct TargetSpec {
    title: String,
    description: Option<String>,
    bounds: Rc<dyn BoundsResolver>,
    icon: Option<Icon>,
    target_radius: Option<f64>,
    padding: Option<f64>,
    shape: Shape,
    id: Option<TargetId>,
    style: TargetStyle,
    cancelable: bool,
    tint_target: bool,
    draw_shadow: bool,
    transparent_target: bool,
}

impl TargetSpec {
    pub fn builder() -> TargetSpecBuilder {
        TargetSpecBuilder::default()
    }

    pub fn for_bounds(
        rect: Rect,
        title: impl Into<String>,
    ) -> Result<TargetSpec, ConfigurationError> {
        Self::builder().title(title).fixed_bounds(rect).build()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn bounds(&self) -> &dyn BoundsResolver {
        self.bounds.as_ref()
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    pub fn target_radius(&self) -> Option<f64> {
        self.target_radius
    }

    pub fn padding(&self) -> Option<f64> {
        self.padding
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn id(&self) -> Option<&TargetId> {
        self.id.as_ref()
    }

    pub fn style(&self) -> &TargetStyle {
        &self.style
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn tint_target(&self) -> bool {
        self.tint_target
    }

    pub fn draw_shadow(&self) -> bool {
        self.draw_shadow
    }

    pub fn transparent_target(&self) -> bool {
        self.transparent_target
    }
}

impl fmt::Debug for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSpec")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("bounds", &self.bounds)
            .field("shape", &self.shape)
            .field("cancelable", &self.cancelable)
            .finish_non_exhaustive()
    }
}

pub struct TargetSpecBuilder {
    title: Option<String>,
    description: Option<String>,
    bounds: Option<Rc<dyn BoundsResolver>>,
    icon: Option<Icon>,
    target_radius: Option<f64>,
    padding: Option<f64>,
    shape: Shape,
    id: Option<TargetId>,
    style: TargetStyle,
    cancelable: bool,
    tint_target: bool,
    draw_shadow: bool,
    transparent_target: bool,
}

impl Default for TargetSpecBuilder {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            bounds: None,
            icon: None,
            target_radius: None,
            padding: None,
            shape: Shape::default(),
            id: None,
            style: TargetStyle::default(),
            cancelable: true,
            tint_target: true,
            draw_shadow: false,
            transparent_target: false,
        }
    }
}

impl TargetSpecBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn bounds(mut self, resolver: Rc<dyn BoundsResolver>) -> Self {
        self.bounds = Some(resolver);
        self
    }

    pub fn fixed_bounds(self, rect: Rect) -> Self {
        self.bounds(Rc::new(FixedBoundsResolver::new(rect)))
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn target_radius(mut self, radius: f64) -> Self {
        self.target_radius = Some(radius);
        self
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn id(mut self, id: impl Into<TargetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn style(mut self, style: TargetStyle) -> Self {
        self.style = style;
        self
    }

    pub fn outer_circle_color(mut self, color: Srgb<f64>) -> Self {
        self.style.outer_circle_color = Some(color);
        self
    }

    pub fn outer_circle_alpha(mut self, alpha: f64) -> Self {
        self.style.outer_circle_alpha = alpha;
        self
    }

    pub fn target_circle_color(mut self, color: Srgb<f64>) -> Self {
        self.style.target_circle_color = Some(color);
        self
    }

    /// The color is drawn at 30% opacity over the whole viewport.
    pub fn dim_color(mut self, color: Srgb<f64>) -> Self {
        self.style.dim_color = Some(color);
        self
    }

    pub fn text_color(mut self, color: Srgb<f64>) -> Self {
        self.style.title_text_color = Some(color);
        self.style.description_text_color = Some(color);
        self
    }

    pub fn title_text_color(mut self, color: Srgb<f64>) -> Self {
        self.style.title_text_color = Some(color);
        self
    }

    pub fn description_text_color(mut self, color: Srgb<f64>) -> Self {
        self.style.description_text_color = Some(color);
        self
    }

    pub fn title_text_size(mut self, size: f64) -> Self {
        self.style.title_text_size = size;
        self
    }

    pub fn description_text_size(mut self, size: f64) -> Self {
        self.style.description_text_size = size;
        self
    }

    pub fn description_text_alpha(mut self, alpha: f64) -> Self {
        self.style.description_text_alpha = alpha;
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Tint the icon with the outer circle's color.
    pub fn tint_target(mut self, tint: bool) -> Self {
        self.tint_target = tint;
        self
    }

    pub fn draw_shadow(mut self, draw: bool) -> Self {
        self.draw_shadow = draw;
        self
    }

    /// Punch the target circle through the overlay instead of filling it.
    pub fn transparent_target(mut self, transparent: bool) -> Self {
        self.transparent_target = transparent;
        self
    }

    pub fn build(self) -> Result<TargetSpec, ConfigurationError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigurationError::MissingTitle)?;
        let bounds = self.bounds.ok_or(ConfigurationError::MissingBounds)?;

        check_alpha("outer circle", self.style.outer_circle_alpha)?;
        check_alpha("description text", self.style.description_text_alpha)?;
        check_text_size("title", self.style.title_text_size)?;
        check_text_size("description", self.style.description_text_size)?;
        if let Some(radius) = self.target_radius {
            check_dimension("target radius", radius)?;
        }
        if let Some(padding) = self.padding {
            check_dimension("padding", padding)?;
        }

        Ok(TargetSpec {
            title,
            description: self.description,
            bounds,
            icon: self.icon,
            target_radius: self.target_radius,
            padding: self.padding,
            shape: self.shape,
            id: self.id,
            style: self.style,
            cancelable: self.cancelable,
            tint_target: self.tint_target,
            draw_shadow: self.draw_shadow,
            transparent_target: self.transparent_target,
        })
    }
}

fn check_alpha(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidAlpha { name, value })
    }
}

fn check_text_size(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NegativeTextSize { name, value })
    }
}

fn check_dimension(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NegativeDimension { name, value })
    }
}
