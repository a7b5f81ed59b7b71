use crate::animation::{AnimationController, AnimationState, Phase};
use crate::bounds::PendingBounds;
use crate::geometry::{Point, Rect};
use crate::hit::{Hit, HitGeometry, classify};
use crate::layout::{
    LayoutResult, MonospaceMeasurer, TargetGeometry, TextMeasurer, TextMetrics, Viewport, layout,
};
use crate::render::{Frame, RenderSurface};
use crate::settings::{Dimensions, Timings};
use crate::target::TargetSpec;
use crate::theme::{DefaultTheme, ResolvedColors, ThemeResolver};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Stage {
    pub dimensions: Dimensions,
    pub timings: Timings,
    pub viewport: Viewport,
    pub measurer: Rc<dyn TextMeasurer>,
    pub theme: Rc<dyn ThemeResolver>,
}

impl Stage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            dimensions: Dimensions::default(),
            timings: Timings::default(),
            viewport,
            measurer: Rc::new(MonospaceMeasurer::default()),
            theme: Rc::new(DefaultTheme::default()),
        }
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_measurer(mut self, measurer: Rc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_theme(mut self, theme: Rc<dyn ThemeResolver>) -> Self {
        self.theme = theme;
        self
    }

    pub fn display(&self, spec: Rc<TargetSpec>, listener: Listener) -> OverlayHandle {
        OverlayHandle {
            overlay: Overlay::new(spec, self),
            listener,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayEvent {
    TargetClick,
    TargetLongClick,
    TargetCancel,
    OuterCircleClick,
    TargetDismissed { user_initiated: bool },
}

pub struct Overlay {
    spec: Rc<TargetSpec>,
    stage: Stage,
    pending: PendingBounds,
    layout: Option<LayoutResult>,
    animation: Option<AnimationController>,
    colors: ResolvedColors,
    events: VecDeque<OverlayEvent>,
    dismissed: bool,
    canceled: bool,
    back_armed: bool,
    debug: bool,
}

impl Overlay {
    /// Starts expanding right away if the target's bounds are already known,
    /// otherwise on the first layout pass after they are published.
    pub fn new(spec: Rc<TargetSpec>, stage: &Stage) -> Self {
        let pending = PendingBounds::subscribe(spec.bounds());
        let colors = ResolvedColors::resolve(spec.style(), stage.theme.as_ref());

        let mut overlay = Self {
            spec,
            stage: stage.clone(),
            pending,
            layout: None,
            animation: None,
            colors,
            events: VecDeque::new(),
            dismissed: false,
            canceled: false,
            back_armed: false,
            debug: false,
        };

        match overlay.spec.bounds().current_bounds() {
            Some(bounds) => overlay.apply_bounds(bounds),
            None => log::debug!("Waiting for bounds of '{}'", overlay.spec.title()),
        }
        overlay
    }

    pub fn spec(&self) -> &Rc<TargetSpec> {
        &self.spec
    }

    pub fn layout_pass(&mut self) {
        if let Some(bounds) = self.pending.take() {
            self.apply_bounds(bounds);
        } else if self.layout.is_none()
            && let Some(bounds) = self.spec.bounds().current_bounds()
        {
            self.apply_bounds(bounds);
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.stage.viewport = viewport;
        if let Some(current) = self.layout {
            self.relayout(current.target);
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn apply_bounds(&mut self, bounds: Rect) {
        if self.dismissed {
            return;
        }
        let corners = [bounds.left, bounds.top, bounds.right, bounds.bottom];
        if corners.iter().any(|c| !c.is_finite()) {
            log::warn!("Ignoring unusable bounds {bounds:?} for '{}'", self.spec.title());
            return;
        }
        let target = TargetGeometry::new(&self.spec, bounds, &self.stage.dimensions);
        self.relayout(target);
    }

    fn relayout(&mut self, target: TargetGeometry) {
        let dims = &self.stage.dimensions;
        let viewport = &self.stage.viewport;
        let metrics = TextMetrics::measure(
            &self.spec,
            self.stage.measurer.as_ref(),
            viewport.text_width(dims),
        );
        let result = layout(target, metrics, viewport, dims);

        match &mut self.animation {
            Some(animation) => animation.set_outer_radius(result.outer_radius),
            None => {
                log::debug!("Displaying '{}'", self.spec.title());
                self.animation = Some(AnimationController::new(
                    result.outer_radius,
                    target.radius,
                    self.spec.style().outer_circle_alpha,
                    self.stage.timings,
                ));
            }
        }
        self.layout = Some(result);
    }

    pub fn tick(&mut self, dt: Duration) {
        self.layout_pass();
        let Some(animation) = &mut self.animation else {
            return;
        };
        if animation.tick(dt) == Some(Phase::Dismissed) {
            self.finish_dismissal(true);
        }
    }

    /// Plays the confirm or cancel dismissal. Returns false if the session is
    /// already on its way out.
    pub fn dismiss(&mut self, confirmed: bool) -> bool {
        if self.dismissed {
            return false;
        }
        if self.animation.is_none() {
            // nothing was ever drawn
            log::debug!("Dismissing '{}' before layout", self.spec.title());
            self.finish_dismissal(true);
            return true;
        }

        let started = self
            .animation
            .as_mut()
            .is_some_and(|animation| animation.dismiss(confirmed));
        if !started {
            log::debug!("'{}' is already dismissing", self.spec.title());
        }
        started
    }

    /// The host removed the overlay without a dismissal animation.
    pub fn detach(&mut self) {
        if let Some(animation) = &mut self.animation {
            animation.finish();
        }
        self.finish_dismissal(false);
    }

    fn finish_dismissal(&mut self, user_initiated: bool) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        log::debug!("Dismissed '{}' (user initiated: {user_initiated})", self.spec.title());
        self.events
            .push_back(OverlayEvent::TargetDismissed { user_initiated });
    }

    fn accepts_input(&self) -> bool {
        self.is_visible() && self.is_interactable()
    }

    pub fn tap(&mut self, point: Point) -> Option<Hit> {
        if !self.accepts_input() {
            log::trace!("Ignoring tap at {point:?}");
            return None;
        }
        let hit = classify(point, &self.hit_geometry()?);
        match hit {
            Hit::Target => self.events.push_back(OverlayEvent::TargetClick),
            Hit::OuterCircle => self.events.push_back(OverlayEvent::OuterCircleClick),
            Hit::Outside => {
                self.cancel();
            }
        }
        Some(hit)
    }

    /// Long presses only count on the target itself.
    pub fn long_press(&mut self, point: Point) -> bool {
        if !self.accepts_input() {
            log::trace!("Ignoring long press at {point:?}");
            return false;
        }
        let on_target = self
            .hit_geometry()
            .is_some_and(|geometry| classify(point, &geometry) == Hit::Target);
        if on_target {
            self.events.push_back(OverlayEvent::TargetLongClick);
        }
        on_target
    }

    pub fn back_pressed(&mut self) -> bool {
        if self.is_visible() && self.spec.is_cancelable() {
            self.back_armed = true;
        }
        self.back_armed
    }

    /// Confirms an armed back gesture unless the key event was canceled.
    pub fn back_released(&mut self, key_canceled: bool) -> bool {
        let armed = std::mem::take(&mut self.back_armed);
        if !armed || key_canceled || !self.accepts_input() {
            log::trace!("Ignoring back release (armed: {armed}, canceled: {key_canceled})");
            return false;
        }
        self.cancel()
    }

    fn cancel(&mut self) -> bool {
        if !self.spec.is_cancelable() || self.canceled {
            return false;
        }
        self.canceled = true;
        self.events.push_back(OverlayEvent::TargetCancel);
        true
    }

    pub fn next_event(&mut self) -> Option<OverlayEvent> {
        self.events.pop_front()
    }

    pub fn is_visible(&self) -> bool {
        self.layout.is_some() && !self.dismissed
    }

    pub fn is_interactable(&self) -> bool {
        !self.dismissed
            && self
                .animation
                .as_ref()
                .is_some_and(AnimationController::is_interactable)
    }

    /// `None` until the first layout.
    pub fn phase(&self) -> Option<Phase> {
        self.animation.as_ref().map(AnimationController::phase)
    }

    pub fn state(&self) -> Option<&AnimationState> {
        self.animation.as_ref().map(AnimationController::state)
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.layout.as_ref()
    }

    pub fn hit_geometry(&self) -> Option<HitGeometry> {
        let layout = self.layout.as_ref()?;
        let params = self.animation.as_ref()?.params();
        Some(HitGeometry {
            target_bounds: layout.target.bounds,
            shape: self.spec.shape(),
            target_radius: params.target_radius,
            base_target_radius: layout.target.radius,
            outer_center: layout.outer_center,
            outer_radius: params.outer_radius,
        })
    }

    pub fn frame(&self) -> Option<Frame<'_>> {
        if !self.is_visible() {
            return None;
        }
        let layout = self.layout.as_ref()?;
        let animation = self.animation.as_ref()?;
        Some(Frame::compose(
            &self.spec,
            layout,
            animation.state(),
            &self.colors,
            &self.stage.viewport,
            &self.stage.dimensions,
            self.debug,
        ))
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        if let Some(frame) = self.frame() {
            surface.draw(&frame);
        }
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("target", &self.spec.title())
            .field("phase", &self.phase())
            .field("dismissed", &self.dismissed)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

pub type OverlayCallback = Box<dyn FnMut(&mut Overlay)>;
pub type DismissedCallback = Box<dyn FnMut(&Overlay, bool)>;

/// Reactions to a session's events. Unset callbacks fall back to the
/// defaults: a click confirms, a long click acts like a click, a cancel
/// dismisses without confirming and the rest do nothing.
#[derive(Default)]
pub struct Listener {
    on_target_click: Option<OverlayCallback>,
    on_target_long_click: Option<OverlayCallback>,
    on_target_cancel: Option<OverlayCallback>,
    on_outer_circle_click: Option<OverlayCallback>,
    on_target_dismissed: Option<DismissedCallback>,
}

impl Listener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_target_click(mut self, callback: impl FnMut(&mut Overlay) + 'static) -> Self {
        self.on_target_click = Some(Box::new(callback));
        self
    }

    pub fn on_target_long_click(mut self, callback: impl FnMut(&mut Overlay) + 'static) -> Self {
        self.on_target_long_click = Some(Box::new(callback));
        self
    }

    pub fn on_target_cancel(mut self, callback: impl FnMut(&mut Overlay) + 'static) -> Self {
        self.on_target_cancel = Some(Box::new(callback));
        self
    }

    pub fn on_outer_circle_click(mut self, callback: impl FnMut(&mut Overlay) + 'static) -> Self {
        self.on_outer_circle_click = Some(Box::new(callback));
        self
    }

    /// Called with `true` after a dismissal animation and `false` on detach.
    pub fn on_target_dismissed(mut self, callback: impl FnMut(&Overlay, bool) + 'static) -> Self {
        self.on_target_dismissed = Some(Box::new(callback));
        self
    }

    pub fn dispatch(&mut self, overlay: &mut Overlay, event: OverlayEvent) {
        match event {
            OverlayEvent::TargetClick => match self.on_target_click.as_mut() {
                Some(callback) => callback(overlay),
                None => {
                    overlay.dismiss(true);
                }
            },
            OverlayEvent::TargetLongClick => match self.on_target_long_click.as_mut() {
                Some(callback) => callback(overlay),
                None => self.dispatch(overlay, OverlayEvent::TargetClick),
            },
            OverlayEvent::TargetCancel => match self.on_target_cancel.as_mut() {
                Some(callback) => callback(overlay),
                None => {
                    overlay.dismiss(false);
                }
            },
            OverlayEvent::OuterCircleClick => {
                if let Some(callback) = self.on_outer_circle_click.as_mut() {
                    callback(overlay);
                }
            }
            OverlayEvent::TargetDismissed { user_initiated } => {
                if let Some(callback) = self.on_target_dismissed.as_mut() {
                    callback(overlay, user_initiated);
                }
            }
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("on_target_click", &self.on_target_click.is_some())
            .field("on_target_long_click", &self.on_target_long_click.is_some())
            .field("on_target_cancel", &self.on_target_cancel.is_some())
            .field("on_outer_circle_click", &self.on_outer_circle_click.is_some())
            .field("on_target_dismissed", &self.on_target_dismissed.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct OverlayHandle {
    overlay: Overlay,
    listener: Listener,
}

impl OverlayHandle {
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    fn dispatch(&mut self) {
        while let Some(event) = self.overlay.next_event() {
            self.listener.dispatch(&mut self.overlay, event);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.overlay.tick(dt);
        self.dispatch();
    }

    pub fn layout_pass(&mut self) {
        self.overlay.layout_pass();
    }

    pub fn tap(&mut self, point: Point) -> Option<Hit> {
        let hit = self.overlay.tap(point);
        self.dispatch();
        hit
    }

    pub fn long_press(&mut self, point: Point) -> bool {
        let handled = self.overlay.long_press(point);
        self.dispatch();
        handled
    }

    pub fn back_pressed(&mut self) -> bool {
        self.overlay.back_pressed()
    }

    pub fn back_released(&mut self, key_canceled: bool) -> bool {
        let handled = self.overlay.back_released(key_canceled);
        self.dispatch();
        handled
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.overlay.set_viewport(viewport);
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.overlay.set_debug(debug);
    }

    pub fn dismiss(&mut self, confirmed: bool) -> bool {
        let started = self.overlay.dismiss(confirmed);
        self.dispatch();
        started
    }

    pub fn detach(&mut self) {
        self.overlay.detach();
        self.dispatch();
    }

    pub fn is_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        self.overlay.render(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::TrackedElementResolver;
    use std::cell::RefCell;

    const FRAME: Duration = Duration::from_millis(16);

    fn stage() -> Stage {
        Stage::new(Viewport::new(400.0, 800.0))
    }

    fn spec(cancelable: bool) -> Rc<TargetSpec> {
        let spec = TargetSpec::builder()
            .title("Hello, world!")
            .fixed_bounds(Rect::new(100.0, 100.0, 150.0, 150.0))
            .cancelable(cancelable)
            .build()
            .unwrap();
        Rc::new(spec)
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, Listener) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (click, dismissed, cancel) = (log.clone(), log.clone(), log.clone());
        let listener = Listener::new()
            .on_target_click(move |overlay| {
                click.borrow_mut().push("click".to_string());
                overlay.dismiss(true);
            })
            .on_target_cancel(move |overlay| {
                cancel.borrow_mut().push("cancel".to_string());
                overlay.dismiss(false);
            })
            .on_target_dismissed(move |_, user_initiated| {
                dismissed
                    .borrow_mut()
                    .push(format!("dismissed({user_initiated})"));
            });
        (log, listener)
    }

    fn advance(handle: &mut OverlayHandle, duration: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            handle.tick(FRAME);
            elapsed += FRAME;
        }
    }

    fn settle(handle: &mut OverlayHandle) {
        advance(handle, Duration::from_millis(600));
        assert_eq!(handle.overlay().phase(), Some(Phase::Pulsing));
    }

    #[test]
    fn test_tap_on_target_confirms() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(false), listener);
        settle(&mut handle);

        assert_eq!(handle.tap(Point::new(125.0, 125.0)), Some(Hit::Target));
        assert_eq!(handle.overlay().phase(), Some(Phase::DismissingConfirm));
        advance(&mut handle, Duration::from_millis(600));
        handle.dismiss(true);

        assert_eq!(*log.borrow(), vec!["click", "dismissed(true)"]);
        assert!(!handle.is_visible());
    }

    #[test]
    fn test_taps_before_pulsing_are_ignored() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(true), listener);
        advance(&mut handle, Duration::from_millis(300));

        assert!(handle.is_visible());
        assert_eq!(handle.tap(Point::new(125.0, 125.0)), None);
        assert_eq!(handle.tap(Point::new(399.0, 799.0)), None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_outside_tap_cancels_once() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(true), listener);
        settle(&mut handle);

        assert_eq!(handle.tap(Point::new(399.0, 799.0)), Some(Hit::Outside));
        assert_eq!(handle.overlay().phase(), Some(Phase::DismissingCancel));
        // no longer interactable while dismissing
        assert_eq!(handle.tap(Point::new(399.0, 799.0)), None);
        advance(&mut handle, Duration::from_millis(300));

        assert_eq!(*log.borrow(), vec!["cancel", "dismissed(true)"]);
    }

    #[test]
    fn test_outside_tap_on_non_cancelable_target_does_nothing() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(false), listener);
        settle(&mut handle);

        assert_eq!(handle.tap(Point::new(399.0, 799.0)), Some(Hit::Outside));
        assert_eq!(handle.overlay().phase(), Some(Phase::Pulsing));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_outer_circle_click_does_not_dismiss() {
        let clicks = Rc::new(RefCell::new(0));
        let counter = clicks.clone();
        let listener = Listener::new().on_outer_circle_click(move |_| *counter.borrow_mut() += 1);
        let mut handle = stage().display(spec(true), listener);
        settle(&mut handle);

        let layout = *handle.overlay().layout().unwrap();
        let near_edge = layout.outer_center.offset(0.0, layout.outer_radius - 1.0);
        assert_eq!(handle.tap(near_edge), Some(Hit::OuterCircle));
        assert_eq!(*clicks.borrow(), 1);
        assert_eq!(handle.overlay().phase(), Some(Phase::Pulsing));
    }

    #[test]
    fn test_long_press_defaults_to_click() {
        let mut handle = stage().display(spec(true), Listener::new());
        settle(&mut handle);

        assert!(!handle.long_press(Point::new(399.0, 799.0)));
        assert!(handle.long_press(Point::new(125.0, 125.0)));
        assert_eq!(handle.overlay().phase(), Some(Phase::DismissingConfirm));
    }

    #[test]
    fn test_double_dismiss_fires_once() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(true), listener);
        settle(&mut handle);

        assert!(handle.dismiss(true));
        assert!(!handle.dismiss(true));
        advance(&mut handle, Duration::from_millis(400));
        assert!(!handle.dismiss(true));

        assert_eq!(*log.borrow(), vec!["dismissed(true)"]);
    }

    #[test]
    fn test_back_gesture_needs_arm_and_confirm() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(true), listener);
        settle(&mut handle);

        assert!(!handle.back_released(false));
        assert!(handle.back_pressed());
        assert!(!handle.back_released(true));
        assert!(log.borrow().is_empty());

        assert!(handle.back_pressed());
        assert!(handle.back_released(false));
        assert_eq!(*log.borrow(), vec!["cancel"]);

        let mut handle = stage().display(spec(false), Listener::new());
        settle(&mut handle);
        assert!(!handle.back_pressed());
    }

    #[test]
    fn test_back_release_before_interactable_is_ignored() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(true), listener);
        advance(&mut handle, Duration::from_millis(100));
        assert_eq!(handle.overlay().phase(), Some(Phase::Expanding));

        assert!(handle.back_pressed());
        assert!(!handle.back_released(false));
        settle(&mut handle);

        // the earlier press does not carry over
        assert!(!handle.back_released(false));
        assert!(log.borrow().is_empty());
        assert_eq!(handle.overlay().phase(), Some(Phase::Pulsing));
    }

    #[test]
    fn test_detach_reports_not_user_initiated() {
        let (log, listener) = recorder();
        let mut handle = stage().display(spec(true), listener);
        settle(&mut handle);

        handle.detach();
        handle.detach();
        advance(&mut handle, Duration::from_millis(300));

        assert_eq!(*log.borrow(), vec!["dismissed(false)"]);
        assert_eq!(handle.overlay().phase(), Some(Phase::Dismissed));
        assert!(handle.overlay().frame().is_none());
    }

    #[test]
    fn test_waits_for_tracked_bounds() {
        let resolver = Rc::new(TrackedElementResolver::new());
        let spec = TargetSpec::builder()
            .title("Later")
            .bounds(resolver.clone())
            .build()
            .unwrap();
        let mut overlay = Overlay::new(Rc::new(spec), &stage());

        overlay.tick(FRAME);
        assert!(!overlay.is_visible());
        assert_eq!(overlay.phase(), None);

        let rect = Rect::new(200.0, 400.0, 240.0, 440.0);
        resolver.update(rect);
        overlay.layout_pass();
        assert!(overlay.is_visible());
        assert_eq!(overlay.phase(), Some(Phase::Expanding));
        assert_eq!(overlay.layout().unwrap().target_bounds(), rect);

        let moved = rect.offset(0.0, 100.0);
        resolver.update(moved);
        overlay.tick(FRAME);
        assert_eq!(overlay.layout().unwrap().target_bounds(), moved);
    }

    #[test]
    fn test_dismiss_before_layout_short_circuits() {
        let resolver = Rc::new(TrackedElementResolver::new());
        let spec = TargetSpec::builder()
            .title("Never shown")
            .bounds(resolver.clone())
            .build()
            .unwrap();
        let mut overlay = Overlay::new(Rc::new(spec), &stage());

        assert!(overlay.dismiss(true));
        assert_eq!(
            overlay.next_event(),
            Some(OverlayEvent::TargetDismissed {
                user_initiated: true
            })
        );
        assert_eq!(overlay.next_event(), None);

        resolver.update(Rect::new(0.0, 0.0, 10.0, 10.0));
        overlay.layout_pass();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.phase(), None);
    }

    #[test]
    fn test_viewport_change_relayouts() {
        let mut handle = stage().display(spec(true), Listener::new());
        settle(&mut handle);
        let before = *handle.overlay().layout().unwrap();

        handle.set_viewport(Viewport::new(200.0, 800.0));
        let after = *handle.overlay().layout().unwrap();
        assert_ne!(before.text_rect, after.text_rect);
        assert_eq!(
            handle.overlay().state().unwrap().params.outer_radius,
            after.outer_radius
        );
    }

    #[test]
    fn test_frame_carries_debug_geometry() {
        let mut handle = stage().display(spec(true), Listener::new());
        settle(&mut handle);
        assert!(handle.overlay().frame().unwrap().debug.is_none());

        handle.set_debug(true);
        let frame = handle.overlay().frame().unwrap();
        assert_eq!(frame.phase, Phase::Pulsing);
        assert!(frame.debug.is_some());
    }
}
