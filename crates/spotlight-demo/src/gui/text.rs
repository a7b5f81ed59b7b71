use cairo::{Context, Format, ImageSurface};
use spotlight::{MonospaceMeasurer, Size, TextMeasurer};
use std::fmt;

pub const FONT_FAMILY: &str = "Sans";
/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

pub fn set_font(cr: &Context, font_size: f64) {
    cr.select_font_face(FONT_FAMILY, cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(font_size);
}

/// Greedy word wrap using the context's current font. Explicit newlines
/// always break.
pub fn wrap_lines(cr: &Context, text: &str, max_width: f64) -> Result<Vec<String>, cairo::Error> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if cr.text_extents(&candidate)?.x_advance() > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }

    Ok(lines)
}

/// Measures with cairo's toy font API, the same one [`CairoSurface`] draws
/// with, so wrapped lines match what ends up on screen.
///
/// [`CairoSurface`]: crate::gui::surface::CairoSurface
pub struct CairoMeasurer {
    context: Option<Context>,
    fallback: MonospaceMeasurer,
}

impl CairoMeasurer {
    pub fn new() -> Self {
        let context = ImageSurface::create(Format::ARgb32, 1, 1)
            .and_then(|surface| Context::new(&surface))
            .map_err(|e| log::warn!("No cairo context for text metrics, estimating: {}", e))
            .ok();

        Self {
            context,
            fallback: MonospaceMeasurer::default(),
        }
    }

    fn measure_with(
        cr: &Context,
        text: &str,
        font_size: f64,
        max_width: f64,
    ) -> Result<Size, cairo::Error> {
        set_font(cr, font_size);
        let lines = wrap_lines(cr, text, max_width)?;

        let mut widest = 0.0_f64;
        for line in &lines {
            widest = widest.max(cr.text_extents(line)?.x_advance());
        }

        Ok(Size::new(
            widest.min(max_width.max(0.0)),
            lines.len() as f64 * LINE_HEIGHT * font_size,
        ))
    }
}

impl Default for CairoMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CairoMeasurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CairoMeasurer")
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

impl TextMeasurer for CairoMeasurer {
    fn measure(&self, text: &str, font_size: f64, max_width: f64) -> Size {
        self.context
            .as_ref()
            .and_then(|cr| Self::measure_with(cr, text, font_size, max_width).ok())
            .unwrap_or_else(|| self.fallback.measure(text, font_size, max_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width_and_newlines() {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1).unwrap();
        let cr = Context::new(&surface).unwrap();
        set_font(&cr, 20.0);

        let lines = wrap_lines(&cr, "one two three four five six", 1.0).unwrap();
        assert_eq!(lines.len(), 6);

        let lines = wrap_lines(&cr, "first\nsecond", 10_000.0).unwrap();
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_measure_height_follows_line_count() {
        let measurer = CairoMeasurer::new();
        let single = measurer.measure("Search", 20.0, 10_000.0);
        assert_eq!(single.height, 20.0 * LINE_HEIGHT);
        assert!(single.width > 0.0);

        let wrapped = measurer.measure("Search for anything", 20.0, 1.0);
        assert_eq!(wrapped.height, 3.0 * 20.0 * LINE_HEIGHT);
    }
}
