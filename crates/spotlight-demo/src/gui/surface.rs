use crate::gui::text::{self, LINE_HEIGHT};
use cairo::{Context, Operator};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::{Srgba, WithAlpha};
use spotlight::render::{DebugGeometry, Disc, IconFrame, Mark, TextBlock};
use spotlight::{Frame, Icon, Point, Rect, RenderSurface};
use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::PathBuf;

pub const ICON_SIZE: i32 = 48;
const DEBUG_COLOR: Srgba<f64> = Srgba::new(1.0, 0.0, 0.0, 1.0);

/// Icons decoded on first use. Failed loads are remembered so a bad path is
/// only reported once.
#[derive(Debug, Default)]
pub struct IconCache {
    pixbufs: RefCell<HashMap<PathBuf, Option<Pixbuf>>>,
}

impl IconCache {
    pub fn get(&self, icon: &Icon) -> Option<Pixbuf> {
        self.pixbufs
            .borrow_mut()
            .entry(icon.to_path_buf())
            .or_insert_with(|| {
                Pixbuf::from_file_at_size(icon.as_path(), ICON_SIZE, ICON_SIZE)
                    .map_err(|e| log::warn!("Failed to load icon {}: {}", icon.display(), e))
                    .ok()
            })
            .clone()
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn fill_disc(cr: &Context, disc: &Disc) -> Result<(), cairo::Error> {
    set_color(cr, disc.color);
    cr.new_path();
    cr.arc(disc.center.x, disc.center.y, disc.radius.max(0.0), 0.0, 2.0 * PI);
    cr.fill()
}

fn mark_path(cr: &Context, mark: &Mark) -> Result<(), cairo::Error> {
    let (rx, ry) = (mark.half_extent.width, mark.half_extent.height);
    cr.new_path();
    if rx <= 0.0 || ry <= 0.0 {
        return Ok(());
    }
    cr.save()?;
    cr.translate(mark.center.x, mark.center.y);
    cr.scale(rx, ry);
    cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
    cr.restore()
}

/// Draws [`Frame`]s onto a cairo context. The first drawing error is kept
/// and returned by [`CairoSurface::finish`].
pub struct CairoSurface<'a> {
    cr: &'a Context,
    icons: &'a IconCache,
    result: Result<(), cairo::Error>,
}

impl<'a> CairoSurface<'a> {
    pub fn new(cr: &'a Context, icons: &'a IconCache) -> Self {
        Self {
            cr,
            icons,
            result: Ok(()),
        }
    }

    pub fn finish(self) -> Result<(), cairo::Error> {
        self.result
    }

    fn paint(&self, frame: &Frame<'_>) -> Result<(), cairo::Error> {
        let cr = self.cr;
        cr.save()?;

        if let Some(clip) = frame.clip {
            cr.rectangle(clip.left, clip.top, clip.width(), clip.height());
            cr.clip();
        }

        if let Some(dim) = frame.dim {
            set_color(cr, dim);
            cr.paint()?;
        }
        if let Some(shadow) = &frame.shadow {
            fill_disc(cr, shadow)?;
        }
        fill_disc(cr, &frame.outer_circle)?;
        if let Some(pulse) = &frame.pulse {
            fill_disc(cr, pulse)?;
        }

        self.draw_target(frame)?;
        self.draw_text(frame)?;
        if let Some(icon) = &frame.icon {
            self.draw_icon(icon, frame.target.radius)?;
        }
        if let Some(debug) = &frame.debug {
            self.draw_debug(debug)?;
        }

        cr.restore()
    }

    fn draw_target(&self, frame: &Frame<'_>) -> Result<(), cairo::Error> {
        let cr = self.cr;
        mark_path(cr, &frame.target)?;
        if frame.transparent_target {
            cr.save()?;
            cr.set_operator(Operator::Clear);
            cr.fill()?;
            cr.restore()
        } else {
            set_color(cr, frame.target.color);
            cr.fill()
        }
    }

    fn draw_text(&self, frame: &Frame<'_>) -> Result<(), cairo::Error> {
        let cr = self.cr;
        let outer = &frame.outer_circle;

        cr.save()?;
        cr.new_path();
        cr.arc(outer.center.x, outer.center.y, outer.radius.max(0.0), 0.0, 2.0 * PI);
        cr.clip();

        self.draw_block(&frame.title)?;
        if let Some(description) = &frame.description {
            self.draw_block(description)?;
        }

        cr.restore()
    }

    fn draw_block(&self, block: &TextBlock<'_>) -> Result<(), cairo::Error> {
        let cr = self.cr;
        text::set_font(cr, block.font_size);
        set_color(cr, block.color);

        // the block width is the widest measured line; allow for rounding
        let lines = text::wrap_lines(cr, block.text, block.size.width + 0.5)?;
        let line_height = block.font_size * LINE_HEIGHT;
        let ascent = cr.font_extents()?.ascent();

        for (i, line) in lines.iter().enumerate() {
            cr.move_to(
                block.origin.x,
                block.origin.y + i as f64 * line_height + ascent,
            );
            cr.show_text(line)?;
        }
        Ok(())
    }

    fn draw_icon(&self, icon: &IconFrame<'_>, target_radius: f64) -> Result<(), cairo::Error> {
        let Some(pixbuf) = self.icons.get(icon.icon) else {
            return Ok(());
        };
        let cr = self.cr;

        // shrink with the target circle while it animates
        let scale = (target_radius * 2.0 * 0.6 / ICON_SIZE as f64).min(1.0);
        let (iw, ih) = (
            pixbuf.width() as f64 * scale,
            pixbuf.height() as f64 * scale,
        );
        let origin = Point::new(icon.center.x - iw / 2.0, icon.center.y - ih / 2.0);

        cr.save()?;
        cr.translate(origin.x, origin.y);
        cr.scale(scale, scale);

        match icon.tint {
            Some(tint) => {
                cr.push_group();
                cr.set_source_pixbuf(&pixbuf, 0.0, 0.0);
                cr.paint()?;
                let mask = cr.pop_group()?;
                set_color(cr, tint.with_alpha(icon.alpha));
                cr.mask(&mask)?;
            }
            None => {
                cr.set_source_pixbuf(&pixbuf, 0.0, 0.0);
                cr.paint_with_alpha(icon.alpha)?;
            }
        }
        cr.restore()
    }

    fn draw_debug(&self, debug: &DebugGeometry) -> Result<(), cairo::Error> {
        let cr = self.cr;
        set_color(cr, DEBUG_COLOR);
        cr.set_line_width(1.0);

        for rect in [debug.text_rect, debug.target_rect] {
            stroke_rect(cr, rect)?;
        }

        cr.new_path();
        cr.arc(
            debug.outer_center.x,
            debug.outer_center.y,
            debug.content_radius.max(0.0),
            0.0,
            2.0 * PI,
        );
        cr.stroke()?;

        let target_center = debug.target_rect.center();
        cr.new_path();
        cr.arc(
            target_center.x,
            target_center.y,
            debug.target_ring.max(0.0),
            0.0,
            2.0 * PI,
        );
        cr.stroke()
    }
}

fn stroke_rect(cr: &Context, rect: Rect) -> Result<(), cairo::Error> {
    cr.rectangle(rect.left, rect.top, rect.width(), rect.height());
    cr.stroke()
}

impl RenderSurface for CairoSurface<'_> {
    fn draw(&mut self, frame: &Frame<'_>) {
        if self.result.is_err() {
            return;
        }
        self.result = self.paint(frame);
    }
}
