use crate::config::{Anchor, ConfigError, TourConfig};
use crate::gui::chrome::{self, HeaderChrome};
use crate::gui::text::CairoMeasurer;
use crate::gui::theme::GtkTheme;
use gtk::prelude::*;
use gtk4 as gtk;
use spotlight::{
    BoundsResolver, ChromeLocator, FixedBoundsResolver, Hit, NamedChromeElementResolver, Point,
    RenderSurface, Sequence, SequenceError, SequenceListener, SequenceState, Stage, TargetId,
    TargetSpec, TrackedElementResolver, Viewport,
};
use std::rc::Rc;
use std::time::Duration;

/// A running [`Sequence`] plus the resolvers that keep its targets' bounds
/// in sync with the widget tree.
#[derive(Debug)]
pub struct Tour {
    sequence: Sequence,
    tracked: Vec<(gtk::Widget, Rc<TrackedElementResolver>)>,
    chrome: Vec<Rc<NamedChromeElementResolver>>,
    canvas: gtk::Widget,
    viewport: Viewport,
}

fn canvas_viewport(canvas: &gtk::Widget) -> Viewport {
    Viewport::new(canvas.width() as f64, canvas.height() as f64)
}

fn logging_listener() -> SequenceListener {
    SequenceListener::new()
        .on_sequence_step(|spec, clicked| {
            log::info!(
                "Tour step '{}' {}",
                spec.title(),
                if clicked { "clicked" } else { "skipped" }
            );
        })
        .on_sequence_finish(|| log::info!("Tour finished"))
        .on_sequence_canceled(|spec| log::info!("Tour canceled at '{}'", spec.title()))
}

impl Tour {
    /// Resolves every target of `config` against the window. `root` is
    /// searched for named widgets, `header` for chrome elements.
    pub fn build(
        config: &TourConfig,
        root: &gtk::Widget,
        header: &gtk::Widget,
        canvas: &gtk::Widget,
        debug: bool,
    ) -> Result<Tour, ConfigError> {
        let viewport = canvas_viewport(canvas);
        let stage = Stage::new(viewport)
            .with_dimensions(config.dimensions)
            .with_timings(config.timings)
            .with_measurer(Rc::new(CairoMeasurer::new()))
            .with_theme(Rc::new(GtkTheme::from_widget(root)));

        let locator: Rc<dyn ChromeLocator> = Rc::new(HeaderChrome::new(header, canvas));
        let mut tracked = Vec::new();
        let mut chrome = Vec::new();
        let mut targets = Vec::with_capacity(config.targets.len());

        for target in &config.targets {
            let resolver: Rc<dyn BoundsResolver> = match target.bounds.anchor() {
                Anchor::Fixed(rect) => Rc::new(FixedBoundsResolver::new(rect)),
                Anchor::Widget(name) => {
                    let widget = chrome::find_named(root, name)
                        .ok_or_else(|| ConfigError::WidgetNotFound(name.to_string()))?;
                    let resolver = Rc::new(TrackedElementResolver::new());
                    tracked.push((widget, resolver.clone()));
                    resolver
                }
                Anchor::Chrome(element) => {
                    let resolver =
                        Rc::new(NamedChromeElementResolver::new(element, locator.clone()));
                    chrome.push(resolver.clone());
                    resolver
                }
            };
            targets.push(Rc::new(target.build(resolver)?));
        }

        let mut sequence = Sequence::new(stage)
            .targets(targets)
            .continue_on_cancel(config.continue_on_cancel)
            .consider_outer_circle_canceled(config.consider_outer_circle_canceled)
            .listener(logging_listener());
        sequence.set_debug(debug);

        log::debug!(
            "Built tour with {} targets ({} tracked widgets, {} chrome elements)",
            sequence.remaining(),
            tracked.len(),
            chrome.len()
        );

        Ok(Tour {
            sequence,
            tracked,
            chrome,
            canvas: canvas.clone(),
            viewport,
        })
    }

    pub fn start(&mut self) {
        self.refresh_bounds();
        self.sequence.start();
    }

    /// Starts at the target with `id`.
    pub fn start_with(&mut self, id: &TargetId) -> Result<(), SequenceError> {
        self.refresh_bounds();
        self.sequence.start_with(id)
    }

    /// Publishes the current widget allocations, then lets the visible
    /// overlay pick them up.
    pub fn refresh_bounds(&mut self) {
        for (widget, resolver) in &self.tracked {
            match chrome::bounds_in(widget, &self.canvas) {
                Some(rect) => resolver.update(rect),
                None => resolver.clear(),
            }
        }
        for resolver in &self.chrome {
            resolver.refresh();
        }
        self.sequence.layout_pass();
    }

    /// Follows the canvas size. Returns whether it changed.
    pub fn sync_viewport(&mut self) -> bool {
        let viewport = canvas_viewport(&self.canvas);
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.sequence.set_viewport(viewport);
        true
    }

    pub fn is_active(&self) -> bool {
        self.sequence.state() == SequenceState::Active
    }

    pub fn current(&self) -> Option<&TargetSpec> {
        self.sequence.current().map(|overlay| overlay.spec().as_ref())
    }

    pub fn tick(&mut self, dt: Duration) {
        self.sequence.tick(dt);
    }

    pub fn tap(&mut self, point: Point) -> Option<Hit> {
        self.sequence.tap(point)
    }

    pub fn long_press(&mut self, point: Point) -> bool {
        self.sequence.long_press(point)
    }

    pub fn back_pressed(&mut self) -> bool {
        self.sequence.back_pressed()
    }

    pub fn back_released(&mut self) -> bool {
        self.sequence.back_released(false)
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.sequence.set_debug(debug);
    }

    pub fn detach(&mut self) {
        self.sequence.detach();
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        self.sequence.render(surface);
    }
}
