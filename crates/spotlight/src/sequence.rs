use crate::error::{Position, SequenceError};
use crate::geometry::Point;
use crate::hit::Hit;
use crate::layout::Viewport;
use crate::overlay::{Overlay, OverlayEvent, Stage};
use crate::render::RenderSurface;
use crate::target::{TargetId, TargetSpec};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SequenceState {
    NotStarted,
    Active,
    Finished,
    Canceled,
}

pub type FinishCallback = Box<dyn FnMut()>;
pub type StepCallback = Box<dyn FnMut(&TargetSpec, bool)>;
pub type CanceledCallback = Box<dyn FnMut(&TargetSpec)>;

#[derive(Default)]
pub struct SequenceListener {
    on_sequence_finish: Option<FinishCallback>,
    on_sequence_step: Option<StepCallback>,
    on_sequence_canceled: Option<CanceledCallback>,
}

impl SequenceListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sequence_finish(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_sequence_finish = Some(Box::new(callback));
        self
    }

    /// Called with the finished target and whether it was clicked rather
    /// than canceled.
    pub fn on_sequence_step(mut self, callback: impl FnMut(&TargetSpec, bool) + 'static) -> Self {
        self.on_sequence_step = Some(Box::new(callback));
        self
    }

    pub fn on_sequence_canceled(mut self, callback: impl FnMut(&TargetSpec) + 'static) -> Self {
        self.on_sequence_canceled = Some(Box::new(callback));
        self
    }

    fn finish(&mut self) {
        if let Some(callback) = self.on_sequence_finish.as_mut() {
            callback();
        }
    }

    fn step(&mut self, target: &TargetSpec, clicked: bool) {
        if let Some(callback) = self.on_sequence_step.as_mut() {
            callback(target, clicked);
        }
    }

    fn canceled(&mut self, target: &TargetSpec) {
        if let Some(callback) = self.on_sequence_canceled.as_mut() {
            callback(target);
        }
    }
}

impl fmt::Debug for SequenceListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceListener")
            .field("on_sequence_finish", &self.on_sequence_finish.is_some())
            .field("on_sequence_step", &self.on_sequence_step.is_some())
            .field("on_sequence_canceled", &self.on_sequence_canceled.is_some())
            .finish()
    }
}

/// Shows queued targets one at a time. The next session is only created once
/// the previous one has finished its dismissal.
#[derive(Debug)]
pub struct Sequence {
    stage: Stage,
    queue: VecDeque<Rc<TargetSpec>>,
    state: SequenceState,
    listener: SequenceListener,
    continue_on_cancel: bool,
    consider_outer_circle_canceled: bool,
    current: Option<Overlay>,
    /// The current target was already reported through `on_sequence_step`.
    stepped: bool,
    debug: bool,
}

impl Sequence {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            queue: VecDeque::new(),
            state: SequenceState::NotStarted,
            listener: SequenceListener::default(),
            continue_on_cancel: false,
            consider_outer_circle_canceled: false,
            current: None,
            stepped: false,
            debug: false,
        }
    }

    pub fn targets(mut self, targets: impl IntoIterator<Item = Rc<TargetSpec>>) -> Self {
        self.queue.extend(targets);
        self
    }

    pub fn target(mut self, target: Rc<TargetSpec>) -> Self {
        self.queue.push_back(target);
        self
    }

    pub fn continue_on_cancel(mut self, status: bool) -> Self {
        self.continue_on_cancel = status;
        self
    }

    pub fn consider_outer_circle_canceled(mut self, status: bool) -> Self {
        self.consider_outer_circle_canceled = status;
        self
    }

    pub fn listener(mut self, listener: SequenceListener) -> Self {
        self.listener = listener;
        self
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn current(&self) -> Option<&Overlay> {
        self.current.as_ref()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn start(&mut self) {
        if self.state == SequenceState::Active {
            log::debug!("Sequence already active");
            return;
        }
        if self.queue.is_empty() {
            log::debug!("Nothing to show");
            return;
        }
        self.state = SequenceState::Active;
        self.show_next();
        self.dispatch();
    }

    pub fn start_with(&mut self, id: &TargetId) -> Result<(), SequenceError> {
        if self.state == SequenceState::Active {
            return Ok(());
        }
        let index = self
            .queue
            .iter()
            .position(|target| target.id() == Some(id))
            .ok_or_else(|| SequenceError::InvalidSequencePosition(Position::Id(id.clone())))?;
        self.skip(index);
        Ok(())
    }

    pub fn start_at(&mut self, index: usize) -> Result<(), SequenceError> {
        if self.state == SequenceState::Active {
            return Ok(());
        }
        if index >= self.queue.len() {
            return Err(SequenceError::InvalidSequencePosition(Position::Index(index)));
        }
        self.skip(index);
        Ok(())
    }

    fn skip(&mut self, count: usize) {
        self.queue.drain(..count);
        self.start();
    }

    /// Ends the tour from outside. Refused when nothing is showing or the
    /// target being canceled is not cancelable. Once the current target has
    /// stepped, the cancel applies to the next one in line.
    pub fn cancel(&mut self) -> bool {
        if self.state != SequenceState::Active {
            return false;
        }
        let target = if self.stepped {
            self.queue.front().cloned()
        } else {
            self.current.as_ref().map(|overlay| overlay.spec().clone())
        };
        let Some(target) = target else {
            return false;
        };
        if !target.is_cancelable() {
            log::debug!("'{}' is not cancelable", target.title());
            return false;
        }

        if !self.stepped {
            self.dismiss_current(false);
        }
        self.abort(&target);
        self.dispatch();
        true
    }

    fn abort(&mut self, target: &TargetSpec) {
        log::debug!(
            "Sequence canceled at '{}', dropping {} targets",
            target.title(),
            self.queue.len()
        );
        self.state = SequenceState::Canceled;
        self.queue.clear();
        self.listener.canceled(target);
    }

    fn show_next(&mut self) {
        match self.queue.pop_front() {
            Some(target) => {
                log::debug!("Showing '{}', {} left", target.title(), self.queue.len());
                let mut overlay = Overlay::new(target, &self.stage);
                overlay.set_debug(self.debug);
                self.current = Some(overlay);
                self.stepped = false;
            }
            None => {
                log::debug!("Sequence finished");
                self.state = SequenceState::Finished;
                self.listener.finish();
            }
        }
    }

    fn dismiss_current(&mut self, confirmed: bool) {
        if let Some(overlay) = self.current.as_mut() {
            overlay.dismiss(confirmed);
        }
    }

    fn dispatch(&mut self) {
        while let Some(event) = self.current.as_mut().and_then(Overlay::next_event) {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: OverlayEvent) {
        let Some(target) = self.current.as_ref().map(|overlay| overlay.spec().clone()) else {
            return;
        };

        match event {
            OverlayEvent::TargetClick | OverlayEvent::TargetLongClick => {
                self.listener.step(&target, true);
                self.stepped = true;
                self.dismiss_current(true);
            }
            OverlayEvent::OuterCircleClick => {
                if self.consider_outer_circle_canceled {
                    self.target_canceled(&target);
                }
            }
            OverlayEvent::TargetCancel => self.target_canceled(&target),
            OverlayEvent::TargetDismissed { .. } => {
                self.current = None;
                if self.state == SequenceState::Active {
                    self.show_next();
                }
            }
        }
    }

    fn target_canceled(&mut self, target: &TargetSpec) {
        if self.continue_on_cancel {
            self.listener.step(target, false);
            self.stepped = true;
        } else {
            self.abort(target);
        }
        self.dismiss_current(false);
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(overlay) = self.current.as_mut() {
            overlay.tick(dt);
        }
        self.dispatch();
    }

    pub fn layout_pass(&mut self) {
        if let Some(overlay) = self.current.as_mut() {
            overlay.layout_pass();
        }
    }

    pub fn tap(&mut self, point: Point) -> Option<Hit> {
        let hit = self.current.as_mut().and_then(|overlay| overlay.tap(point));
        self.dispatch();
        hit
    }

    pub fn long_press(&mut self, point: Point) -> bool {
        let handled = self
            .current
            .as_mut()
            .is_some_and(|overlay| overlay.long_press(point));
        self.dispatch();
        handled
    }

    pub fn back_pressed(&mut self) -> bool {
        self.current.as_mut().is_some_and(Overlay::back_pressed)
    }

    pub fn back_released(&mut self, key_canceled: bool) -> bool {
        let handled = self
            .current
            .as_mut()
            .is_some_and(|overlay| overlay.back_released(key_canceled));
        self.dispatch();
        handled
    }

    /// Also applies to targets shown later.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.stage.viewport = viewport;
        if let Some(overlay) = self.current.as_mut() {
            overlay.set_viewport(viewport);
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
        if let Some(overlay) = self.current.as_mut() {
            overlay.set_debug(debug);
        }
    }

    /// The host tore the tour down. An active sequence ends as canceled.
    pub fn detach(&mut self) {
        let Some(mut overlay) = self.current.take() else {
            return;
        };
        overlay.detach();
        if self.state != SequenceState::Active {
            return;
        }
        if !self.stepped {
            self.abort(overlay.spec());
        } else if let Some(next) = self.queue.front().cloned() {
            self.abort(&next);
        } else {
            self.show_next();
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        if let Some(overlay) = self.current.as_ref() {
            overlay.render(surface);
        }
    }
}
