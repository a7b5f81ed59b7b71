use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgb;
use spotlight::ThemeResolver;

/// Snapshot of the window's GTK theme, taken when a tour is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GtkTheme {
    primary: Option<Srgb<f64>>,
    dark: bool,
}

impl GtkTheme {
    pub fn from_widget(widget: &impl IsA<gtk::Widget>) -> Self {
        #[allow(deprecated)]
        let context = widget.as_ref().style_context();
        let primary = ["accent_bg_color", "theme_selected_bg_color"]
            .into_iter()
            .find_map(|name| Self::lookup_color(&context, name));

        let dark = gtk::Settings::default()
            .map(|settings| settings.is_gtk_application_prefer_dark_theme())
            .unwrap_or(false);

        Self { primary, dark }
    }

    #[allow(deprecated)]
    fn lookup_color(context: &gtk::StyleContext, name: &str) -> Option<Srgb<f64>> {
        context
            .lookup_color(name)
            .map(|c| Srgb::new(c.red() as f64, c.green() as f64, c.blue() as f64))
    }
}

impl ThemeResolver for GtkTheme {
    fn primary(&self) -> Option<Srgb<f64>> {
        self.primary
    }

    fn is_dark(&self) -> bool {
        self.dark
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.spotlight-canvas {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
