use gtk::prelude::*;
use gtk4 as gtk;
use spotlight::{ChromeElement, ChromeLocator, Point, Rect, Size};

/// Depth-first search for a widget by its widget name.
pub fn find_named(root: &gtk::Widget, name: &str) -> Option<gtk::Widget> {
    if root.widget_name() == name {
        return Some(root.clone());
    }

    let mut child = root.first_child();
    while let Some(widget) = child {
        if let Some(found) = find_named(&widget, name) {
            return Some(found);
        }
        child = widget.next_sibling();
    }
    None
}

/// `widget`'s allocation in `canvas` coordinates, or `None` while it is not
/// on screen.
pub fn bounds_in(widget: &gtk::Widget, canvas: &gtk::Widget) -> Option<Rect> {
    if !widget.is_mapped() {
        return None;
    }
    let bounds = widget.compute_bounds(canvas)?;
    Some(Rect::from_origin_size(
        Point::new(bounds.x() as f64, bounds.y() as f64),
        Size::new(bounds.width() as f64, bounds.height() as f64),
    ))
}

/// Finds header bar elements by widget name. Menu items use their id as the
/// name.
#[derive(Debug, Clone)]
pub struct HeaderChrome {
    header: gtk::Widget,
    canvas: gtk::Widget,
}

impl HeaderChrome {
    pub const NAVIGATION: &'static str = "navigation";
    pub const OVERFLOW: &'static str = "overflow";

    pub fn new(header: &impl IsA<gtk::Widget>, canvas: &impl IsA<gtk::Widget>) -> Self {
        Self {
            header: header.as_ref().clone(),
            canvas: canvas.as_ref().clone(),
        }
    }

    fn widget_name(element: &ChromeElement) -> &str {
        match element {
            ChromeElement::Navigation => Self::NAVIGATION,
            ChromeElement::Overflow => Self::OVERFLOW,
            ChromeElement::MenuItem(id) => id,
        }
    }
}

impl ChromeLocator for HeaderChrome {
    fn locate(&self, element: &ChromeElement) -> Option<Rect> {
        let widget = find_named(&self.header, Self::widget_name(element))?;
        bounds_in(&widget, &self.canvas)
    }
}
