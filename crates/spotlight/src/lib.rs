//! Feature-discovery spotlight overlays. The host draws, measures text and
//! drives the clock; see [`Stage::display`] and [`Sequence`].

pub mod animation;
pub mod bounds;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod sequence;
pub mod settings;
pub mod target;
pub mod theme;

pub use animation::{AnimationController, AnimationState, Curve, Phase, RenderParams, Tween};
pub use bounds::{
    BoundsResolver, ChromeElement, ChromeLocator, FixedBoundsResolver, NamedChromeElementResolver,
    TrackedElementResolver,
};
pub use error::{ConfigurationError, Position, SequenceError};
pub use geometry::{Point, Rect, Size};
pub use hit::{Hit, HitGeometry};
pub use layout::{LayoutResult, MonospaceMeasurer, TextMeasurer, TextMetrics, Viewport};
pub use overlay::{Listener, Overlay, OverlayEvent, OverlayHandle, Stage};
pub use render::{Frame, RenderSurface};
pub use sequence::{Sequence, SequenceListener, SequenceState};
pub use settings::{Dimensions, Timings};
pub use target::{Icon, Shape, TargetId, TargetSpec, TargetSpecBuilder, TargetStyle};
pub use theme::{DefaultTheme, ResolvedColors, ThemeResolver};
