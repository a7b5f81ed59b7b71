use crate::geometry::Rect;
use derive_more::Display;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Invoked with the new bounds. Returning `false` unsubscribes.
pub type BoundsCallback = Box<dyn FnMut(Rect) -> bool>;

pub trait BoundsResolver: fmt::Debug {
    fn current_bounds(&self) -> Option<Rect>;

    fn on_bounds_changed(&self, callback: BoundsCallback);
}

#[derive(Default)]
struct Subscribers(RefCell<Vec<BoundsCallback>>);

impl Subscribers {
    fn push(&self, callback: BoundsCallback) {
        self.0.borrow_mut().push(callback);
    }

    fn notify(&self, rect: Rect) {
        // callbacks may subscribe again, so run them outside the borrow
        let mut callbacks = self.0.take();
        callbacks.retain_mut(|callback| callback(rect));
        let mut slot = self.0.borrow_mut();
        callbacks.append(&mut slot);
        *slot = callbacks;
    }

    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBoundsResolver(Rect);

impl FixedBoundsResolver {
    pub fn new(rect: Rect) -> Self {
        Self(rect)
    }
}

impl BoundsResolver for FixedBoundsResolver {
    fn current_bounds(&self) -> Option<Rect> {
        Some(self.0)
    }

    fn on_bounds_changed(&self, _callback: BoundsCallback) {}
}

/// Bounds of a live element that the host keeps up to date after each of
/// its layout passes.
#[derive(Debug, Default)]
pub struct TrackedElementResolver {
    bounds: Cell<Option<Rect>>,
    subscribers: Subscribers,
}

impl TrackedElementResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes the element's bounds. Subscribers only hear about changes.
    pub fn update(&self, rect: Rect) {
        if self.bounds.replace(Some(rect)) != Some(rect) {
            self.subscribers.notify(rect);
        }
    }

    pub fn clear(&self) {
        self.bounds.set(None);
    }
}

impl BoundsResolver for TrackedElementResolver {
    fn current_bounds(&self) -> Option<Rect> {
        self.bounds.get()
    }

    fn on_bounds_changed(&self, callback: BoundsCallback) {
        self.subscribers.push(callback);
    }
}

/// A piece of window chrome that has no handle of its own in the host's API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum ChromeElement {
    #[display("navigation")]
    Navigation,
    #[display("overflow")]
    Overflow,
    #[display("menu-item:{_0}")]
    MenuItem(String),
}

/// Host-side lookup of chrome elements. How the element is found is entirely
/// up to the host.
pub trait ChromeLocator: fmt::Debug {
    fn locate(&self, element: &ChromeElement) -> Option<Rect>;
}

#[derive(Debug)]
pub struct NamedChromeElementResolver {
    element: ChromeElement,
    locator: Rc<dyn ChromeLocator>,
    last: Cell<Option<Rect>>,
    subscribers: Subscribers,
}

impl NamedChromeElementResolver {
    pub fn new(element: ChromeElement, locator: Rc<dyn ChromeLocator>) -> Self {
        Self {
            element,
            locator,
            last: Cell::new(None),
            subscribers: Subscribers::default(),
        }
    }

    pub fn element(&self) -> &ChromeElement {
        &self.element
    }

    /// Re-runs the lookup; the host calls this after its layout pass.
    pub fn refresh(&self) {
        let located = self.locator.locate(&self.element);
        if self.last.replace(located) != located
            && let Some(rect) = located
        {
            self.subscribers.notify(rect);
        }
    }
}

impl BoundsResolver for NamedChromeElementResolver {
    fn current_bounds(&self) -> Option<Rect> {
        let located = self.locator.locate(&self.element);
        self.last.set(located);
        located
    }

    fn on_bounds_changed(&self, callback: BoundsCallback) {
        self.subscribers.push(callback);
    }
}

/// Latest bounds published to one overlay session, consumed on its next
/// layout pass. Holds only a weak link so a dropped session unsubscribes.
#[derive(Debug)]
pub(crate) struct PendingBounds(Rc<Cell<Option<Rect>>>);

impl PendingBounds {
    pub(crate) fn subscribe(resolver: &dyn BoundsResolver) -> Self {
        let slot = Rc::new(Cell::new(None));
        let weak = Rc::downgrade(&slot);
        resolver.on_bounds_changed(Box::new(move |rect| match weak.upgrade() {
            Some(slot) => {
                slot.set(Some(rect));
                true
            }
            None => false,
        }));
        Self(slot)
    }

    pub(crate) fn take(&self) -> Option<Rect> {
        self.0.take()
    }
}
