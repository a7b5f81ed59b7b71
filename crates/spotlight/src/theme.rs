use crate::target::TargetStyle;
use palette::{Srgb, Srgba, WithAlpha};
use std::fmt;

const WHITE: Srgb<f64> = Srgb::new(1.0, 1.0, 1.0);
const BLACK: Srgb<f64> = Srgb::new(0.0, 0.0, 0.0);
const DIM_ALPHA: f64 = 0.3;

/// The host's color scheme, consulted for colors a target leaves unset.
pub trait ThemeResolver: fmt::Debug {
    fn primary(&self) -> Option<Srgb<f64>>;

    fn is_dark(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefaultTheme {
    pub dark: bool,
}

impl ThemeResolver for DefaultTheme {
    fn primary(&self) -> Option<Srgb<f64>> {
        None
    }

    fn is_dark(&self) -> bool {
        self.dark
    }
}

/// Colors of one session. Outer, target and text colors are opaque; the
/// animation supplies their alpha each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedColors {
    pub outer_circle: Srgb<f64>,
    pub target_circle: Srgb<f64>,
    pub title: Srgb<f64>,
    pub description: Srgb<f64>,
    pub dim: Option<Srgba<f64>>,
}

impl ResolvedColors {
    pub fn resolve(style: &TargetStyle, theme: &dyn ThemeResolver) -> Self {
        let contrast = if theme.is_dark() { BLACK } else { WHITE };
        let title = style.title_text_color.unwrap_or(contrast);

        Self {
            outer_circle: style
                .outer_circle_color
                .or_else(|| theme.primary())
                .unwrap_or(WHITE),
            target_circle: style.target_circle_color.unwrap_or(contrast),
            title,
            description: style.description_text_color.unwrap_or(title),
            dim: style.dim_color.map(|color| color.with_alpha(DIM_ALPHA)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Branded;

    impl ThemeResolver for Branded {
        fn primary(&self) -> Option<Srgb<f64>> {
            Some(Srgb::new(0.2, 0.4, 0.8))
        }

        fn is_dark(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_defaults_follow_theme() {
        let colors = ResolvedColors::resolve(&TargetStyle::default(), &DefaultTheme::default());
        assert_eq!(colors.outer_circle, WHITE);
        assert_eq!(colors.target_circle, WHITE);
        assert_eq!(colors.title, WHITE);
        assert_eq!(colors.description, WHITE);
        assert_eq!(colors.dim, None);

        let colors = ResolvedColors::resolve(&TargetStyle::default(), &Branded);
        assert_eq!(colors.outer_circle, Srgb::new(0.2, 0.4, 0.8));
        assert_eq!(colors.target_circle, BLACK);
        assert_eq!(colors.title, BLACK);
    }

    #[test]
    fn test_explicit_colors_win() {
        let red = Srgb::new(1.0, 0.0, 0.0);
        let green = Srgb::new(0.0, 1.0, 0.0);
        let style = TargetStyle {
            outer_circle_color: Some(red),
            title_text_color: Some(green),
            dim_color: Some(BLACK),
            ..TargetStyle::default()
        };

        let colors = ResolvedColors::resolve(&style, &Branded);
        assert_eq!(colors.outer_circle, red);
        assert_eq!(colors.title, green);
        // description follows the title unless set
        assert_eq!(colors.description, green);
        assert_eq!(colors.dim, Some(Srgba::new(0.0, 0.0, 0.0, 0.3)));
    }
}
