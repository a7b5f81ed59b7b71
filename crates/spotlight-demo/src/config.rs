use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use palette::rgb::FromHexError;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use spotlight::{
    BoundsResolver, ChromeElement, ConfigurationError, Dimensions, Icon, Point, Rect, Shape, Size,
    TargetSpec, Timings,
};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, DeserializeFromStr)]
pub struct HexColor(Srgb<f64>);

impl FromStr for HexColor {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color: Srgb<u8> = s.trim().parse()?;
        Ok(Self(color.into_format()))
    }
}

/// Where a tour target is on screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BoundsConfig {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// A widget in the demo window, found by its widget name.
    Widget { name: String },
    Navigation,
    Overflow,
    MenuItem { id: String },
}

/// How the host finds a target's bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor<'a> {
    Fixed(Rect),
    Widget(&'a str),
    Chrome(ChromeElement),
}

impl BoundsConfig {
    pub fn anchor(&self) -> Anchor<'_> {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => Anchor::Fixed(Rect::from_origin_size(
                Point::new(*x, *y),
                Size::new(*width, *height),
            )),
            Self::Widget { name } => Anchor::Widget(name),
            Self::Navigation => Anchor::Chrome(ChromeElement::Navigation),
            Self::Overflow => Anchor::Chrome(ChromeElement::Overflow),
            Self::MenuItem { id } => Anchor::Chrome(ChromeElement::MenuItem(id.clone())),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetConfig {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub bounds: BoundsConfig,
    #[serde(default)]
    pub shape: Shape,
    pub radius: Option<f64>,
    pub padding: Option<f64>,
    pub icon: Option<PathBuf>,
    pub outer_color: Option<HexColor>,
    pub outer_alpha: Option<f64>,
    pub target_color: Option<HexColor>,
    pub dim_color: Option<HexColor>,
    pub text_color: Option<HexColor>,
    pub description_color: Option<HexColor>,
    #[serde(default = "default_true")]
    pub cancelable: bool,
    #[serde(default = "default_true")]
    pub tint: bool,
    #[serde(default)]
    pub shadow: bool,
    #[serde(default)]
    pub transparent: bool,
}

impl TargetConfig {
    pub fn build(&self, bounds: Rc<dyn BoundsResolver>) -> Result<TargetSpec, ConfigurationError> {
        let mut builder = TargetSpec::builder()
            .title(self.title.as_str())
            .bounds(bounds)
            .shape(self.shape)
            .cancelable(self.cancelable)
            .tint_target(self.tint)
            .draw_shadow(self.shadow)
            .transparent_target(self.transparent);

        if let Some(id) = &self.id {
            builder = builder.id(id.as_str());
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.as_str());
        }
        if let Some(radius) = self.radius {
            builder = builder.target_radius(radius);
        }
        if let Some(padding) = self.padding {
            builder = builder.padding(padding);
        }
        if let Some(icon) = &self.icon {
            builder = builder.icon(Icon::new(icon));
        }
        if let Some(color) = self.outer_color {
            builder = builder.outer_circle_color(*color);
        }
        if let Some(alpha) = self.outer_alpha {
            builder = builder.outer_circle_alpha(alpha);
        }
        if let Some(color) = self.target_color {
            builder = builder.target_circle_color(*color);
        }
        if let Some(color) = self.dim_color {
            builder = builder.dim_color(*color);
        }
        if let Some(color) = self.text_color {
            builder = builder.text_color(*color);
        }
        if let Some(color) = self.description_color {
            builder = builder.description_text_color(*color);
        }

        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct TourConfig {
    #[serde(default)]
    pub continue_on_cancel: bool,
    #[serde(default)]
    pub consider_outer_circle_canceled: bool,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid target: {0}")]
    Target(#[from] ConfigurationError),
    #[error("No widget named '{0}' in the window")]
    WidgetNotFound(String),
}

/// The tour file: `explicit` if given, else `tour.toml` in the config dir.
/// Always absolute, so the watcher has a directory to watch.
pub fn get_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(std::path::absolute(path)?);
    }
    let proj_dirs = ProjectDirs::from("org", "spotlight", "spotlight-demo")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("tour.toml"))
}

pub fn load_config(path: &Path) -> Result<TourConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("SPOTLIGHT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

fn parse_default() -> Result<TourConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the tour, writing the default one on first run.
pub fn load_or_setup(path: &Path) -> TourConfig {
    if !path.exists()
        && let Err(e) = write_default_config(path)
    {
        log::error!("Failed to write default tour to {}: {}", path.display(), e);
    }

    load_config(path)
        .or_else(|e| {
            log::error!("Failed to load tour, using the built-in one: {}", e);
            parse_default()
        })
        .unwrap_or_else(|e| {
            log::error!("Built-in tour is invalid: {}", e);
            TourConfig::default()
        })
}

pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", ConfigError::from(e));
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> TourConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_hex_color_parsing() {
        let cases = vec![
            ("#ff0000", Srgb::new(1.0, 0.0, 0.0)),
            ("00ff00", Srgb::new(0.0, 1.0, 0.0)),
            (" #fff ", Srgb::new(1.0, 1.0, 1.0)),
        ];

        for (input, expected) in cases {
            let color: HexColor = input.parse().unwrap();
            assert_eq!(*color, expected, "{input}");
        }
        assert!("#12345".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_tour_deserialization() {
        let tour = parse(
            r##"
            continue_on_cancel = true

            [timings]
            expand = 400
            curve = "linear"

            [[targets]]
            id = "search"
            title = "Search"
            description = "Find anything"
            bounds = { kind = "widget", name = "search" }
            outer_color = "#3f51b5"
            shape = "Oval"

            [[targets]]
            title = "Menu"
            bounds = { kind = "overflow" }
            cancelable = false

            [[targets]]
            title = "Somewhere"
            bounds = { kind = "rect", x = 10, y = 20, width = 40, height = 40.5 }
            "##,
        );

        assert!(tour.continue_on_cancel);
        assert_eq!(tour.timings.expand, std::time::Duration::from_millis(400));
        assert_eq!(tour.dimensions, Dimensions::default());
        assert_eq!(tour.targets.len(), 3);

        let search = &tour.targets[0];
        assert_eq!(search.shape, Shape::Oval);
        assert_eq!(search.bounds.anchor(), Anchor::Widget("search"));
        assert!(search.outer_color.is_some());
        assert!(search.cancelable);

        let menu = &tour.targets[1];
        assert_eq!(menu.bounds.anchor(), Anchor::Chrome(ChromeElement::Overflow));
        assert!(!menu.cancelable);

        assert_eq!(
            tour.targets[2].bounds.anchor(),
            Anchor::Fixed(Rect::new(10.0, 20.0, 50.0, 60.5))
        );
    }

    #[test]
    fn test_target_config_builds_spec() {
        let tour = parse(
            r##"
            [[targets]]
            id = "compose"
            title = "Compose"
            bounds = { kind = "rect", x = 0, y = 0, width = 10, height = 10 }
            text_color = "#000000"
            outer_alpha = 0.5
            "##,
        );
        let target = &tour.targets[0];
        let Anchor::Fixed(rect) = target.bounds.anchor() else {
            panic!("expected a fixed rectangle");
        };
        let spec = target
            .build(Rc::new(spotlight::FixedBoundsResolver::new(rect)))
            .unwrap();

        assert_eq!(spec.title(), "Compose");
        assert_eq!(spec.id().map(|id| id.to_string()), Some("compose".to_string()));
        assert_eq!(spec.style().outer_circle_alpha, 0.5);
        assert_eq!(spec.style().description_text_color, Some(Srgb::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_invalid_target_is_reported() {
        let tour = parse(
            r##"
            [[targets]]
            title = "Too bright"
            bounds = { kind = "navigation" }
            outer_alpha = 2.0
            "##,
        );
        let target = &tour.targets[0];
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        let err = target
            .build(Rc::new(spotlight::FixedBoundsResolver::new(rect)))
            .unwrap_err();
        assert!(ConfigError::from(err).to_string().starts_with("Invalid target"));
    }

    #[test]
    fn test_explicit_config_path_is_absolute() {
        let path = get_config_path(Some(PathBuf::from("tour.toml"))).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("tour.toml"));
        assert!(path.parent().is_some_and(|dir| !dir.as_os_str().is_empty()));
    }

    #[test]
    fn test_default_tour_parses() {
        let tour = parse_default().unwrap();
        assert!(!tour.targets.is_empty());
    }
}
