use crate::config::{self, TourConfig};
use crate::events::AppEvent;
use crate::gui::surface::{CairoSurface, IconCache};
use crate::gui::theme;
use crate::gui::tour::Tour;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::RelmWidgetExt;
use relm4::prelude::*;
use spotlight::{Point, TargetId};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// Longest frame step fed to the animations, in seconds.
const MAX_FRAME_STEP: f64 = 0.1;

pub struct AppInit {
    pub config: TourConfig,
    pub config_path: PathBuf,
    pub debug: bool,
    pub start_at: Option<TargetId>,
    pub rx: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    tour: Rc<RefCell<Option<Tour>>>,
    config: TourConfig,
    config_path: PathBuf,
    debug: bool,
    start_at: Option<TargetId>,
    /// Start as soon as the canvas has been allocated.
    pending_start: bool,
    active: bool,
    /// The click that ends a long press is not a tap.
    suppress_tap: bool,
    last_frame: Option<i64>,
    root: gtk::ApplicationWindow,
    header: gtk::HeaderBar,
    canvas: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    /// Frame clock time in microseconds.
    Tick(i64),
    Tap(Point),
    LongPress(Point),
    BackPressed,
    BackReleased,
    StartTour,
    ToggleDebug,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Spotlight"),
            set_default_width: 420,
            set_default_height: 640,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Escape => {
                            sender.input(AppMsg::BackPressed);
                            glib::Propagation::Stop
                        }
                        gtk::gdk::Key::F12 => {
                            sender.input(AppMsg::ToggleDebug);
                            glib::Propagation::Stop
                        }
                        _ => glib::Propagation::Proceed,
                    }
                },
                connect_key_released[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::BackReleased);
                    }
                }
            },

            gtk::Overlay {
                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,

                    #[name = "header"]
                    gtk::HeaderBar {
                        pack_start = &gtk::Button {
                            set_widget_name: "navigation",
                            set_icon_name: "sidebar-show-symbolic",
                        },

                        pack_end = &gtk::MenuButton {
                            set_widget_name: "overflow",
                            set_icon_name: "view-more-symbolic",
                        },

                        pack_end = &gtk::Button {
                            set_widget_name: "start-tour",
                            set_label: "Tour",
                            connect_clicked => AppMsg::StartTour,
                        },
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 24,
                        set_margin_all: 24,
                        set_vexpand: true,

                        gtk::SearchEntry {
                            set_widget_name: "search",
                            set_placeholder_text: Some("Search"),
                        },

                        gtk::Label {
                            set_wrap: true,
                            set_xalign: 0.0,
                            set_label: "Press Tour to walk through this window. Escape backs out of a step, F12 toggles the layout wireframe.",
                        },

                        gtk::Box {
                            set_orientation: gtk::Orientation::Horizontal,
                            set_spacing: 12,
                            set_halign: gtk::Align::Center,

                            gtk::Button {
                                set_widget_name: "share",
                                set_icon_name: "emblem-shared-symbolic",
                            },

                            gtk::Button {
                                set_widget_name: "favorite",
                                set_icon_name: "starred-symbolic",
                            },
                        },

                        gtk::Box {
                            set_vexpand: true,
                        },

                        gtk::Button {
                            set_widget_name: "compose",
                            set_label: "Compose",
                            set_halign: gtk::Align::End,
                        },
                    },
                },

                #[name = "canvas"]
                add_overlay = &gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "spotlight-canvas",
                    #[watch]
                    set_can_target: model.active,

                    add_controller = gtk::GestureClick {
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Tap(Point::new(x, y)));
                        }
                    },

                    add_controller = gtk::GestureLongPress {
                        connect_pressed[sender] => move |_, x, y| {
                            sender.input(AppMsg::LongPress(Point::new(x, y)));
                        }
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            config_path,
            debug,
            start_at,
            rx,
        } = init;

        theme::load_css();

        let model = AppModel {
            tour: Rc::new(RefCell::new(None)),
            config,
            config_path,
            debug,
            start_at,
            pending_start: true,
            active: false,
            suppress_tap: false,
            last_frame: None,
            root: root.clone(),
            header: gtk::HeaderBar::default(),
            canvas: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.header = widgets.header.clone();
        model.canvas = widgets.canvas.clone();

        let tour_draw = model.tour.clone();
        let icons = IconCache::default();
        widgets.canvas.set_draw_func(move |_, cr, _, _| {
            let tour = tour_draw.borrow();
            let Some(tour) = tour.as_ref() else {
                return;
            };
            let mut surface = CairoSurface::new(cr, &icons);
            tour.render(&mut surface);
            if let Err(e) = surface.finish() {
                log::error!("Drawing error: {}", e);
            }
        });

        let tick_sender = sender.clone();
        widgets.canvas.add_tick_callback(move |_, clock| {
            tick_sender.input(AppMsg::Tick(clock.frame_time()));
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Tick(frame_time) => {
                let dt = self
                    .last_frame
                    .map(|last| (frame_time - last) as f64 / 1_000_000.0)
                    .unwrap_or(0.0)
                    .clamp(0.0, MAX_FRAME_STEP);
                self.last_frame = Some(frame_time);

                if self.pending_start && self.canvas.width() > 0 && self.canvas.height() > 0 {
                    self.pending_start = false;
                    self.start_tour();
                }

                if let Some(tour) = self.tour.borrow_mut().as_mut() {
                    tour.sync_viewport();
                    tour.refresh_bounds();
                    tour.tick(Duration::from_secs_f64(dt));
                    self.active = tour.is_active();
                }
                self.canvas.queue_draw();
            }
            AppMsg::Tap(point) => {
                if std::mem::take(&mut self.suppress_tap) {
                    return;
                }
                if let Some(tour) = self.tour.borrow_mut().as_mut()
                    && let Some(hit) = tour.tap(point)
                {
                    log::debug!("Tap at ({:.0}, {:.0}): {}", point.x, point.y, hit);
                }
            }
            AppMsg::LongPress(point) => {
                if let Some(tour) = self.tour.borrow_mut().as_mut() {
                    self.suppress_tap = tour.long_press(point);
                }
            }
            AppMsg::BackPressed => {
                if let Some(tour) = self.tour.borrow_mut().as_mut() {
                    tour.back_pressed();
                }
            }
            AppMsg::BackReleased => {
                if let Some(tour) = self.tour.borrow_mut().as_mut() {
                    tour.back_released();
                }
            }
            AppMsg::StartTour => {
                self.pending_start = true;
            }
            AppMsg::ToggleDebug => {
                self.debug = !self.debug;
                if let Some(tour) = self.tour.borrow_mut().as_mut() {
                    tour.set_debug(self.debug);
                }
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    self.config = new_config;
                    if self.active {
                        self.pending_start = true;
                    }
                    log::info!("Tour reloaded");
                }
                Err(e) => log::error!("Failed to reload tour: {}", e),
            },
        }
    }
}

impl AppModel {
    fn start_tour(&mut self) {
        if let Some(mut old) = self.tour.borrow_mut().take() {
            old.detach();
        }

        let built = Tour::build(
            &self.config,
            self.root.upcast_ref(),
            self.header.upcast_ref(),
            self.canvas.upcast_ref(),
            self.debug,
        );
        let mut tour = match built {
            Ok(tour) => tour,
            Err(e) => {
                log::error!("Failed to build tour: {}", e);
                return;
            }
        };

        match self.start_at.take() {
            Some(id) => {
                if let Err(e) = tour.start_with(&id) {
                    log::warn!("{}, starting from the beginning", e);
                    tour.start();
                }
            }
            None => tour.start(),
        }
        if let Some(spec) = tour.current() {
            log::info!("Tour started at '{}'", spec.title());
        }

        self.active = tour.is_active();
        *self.tour.borrow_mut() = Some(tour);
    }
}
