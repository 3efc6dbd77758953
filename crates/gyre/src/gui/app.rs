use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::menu::{
    self, Engine, Icon, MenuRequest, REFERENCE_HEIGHT, TargetAssets, TouchEvent, TouchPhase,
};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use appdex::desktop::{AppId, AppInfo};
use appdex::wm::{self, Point};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub engine: Rc<RefCell<Engine>>,
    pub config: Config,
    pub visible: bool,
    pub scale_factor: f64,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    EnterEdit,
    AddIcon(AppInfo),
    AppsIndexed(Vec<AppInfo>),
    ConfigReload,
    Escape,
    Resize(i32, i32),
    Touch(TouchPhase, Point, u64),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::EnterEdit => AppMsg::EnterEdit,
            AppEvent::AddIcon(app) => AppMsg::AddIcon(app),
            AppEvent::AppsIndexed(apps) => AppMsg::AppsIndexed(apps),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Gyre"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "gyre-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Escape);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "gyre-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |gesture, x, y| {
                        sender.input(AppMsg::Touch(
                            TouchPhase::Down,
                            Point::new(x, y),
                            u64::from(gesture.current_event_time()),
                        ));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Touch(
                                TouchPhase::Move,
                                Point::new(x + dx, y + dy),
                                u64::from(gesture.current_event_time()),
                            ));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Touch(
                                TouchPhase::Up,
                                Point::new(x + dx, y + dy),
                                u64::from(gesture.current_event_time()),
                            ));
                        }
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::Touch(TouchPhase::Cancel, Point::default(), 0));
                    },
                },

                add_controller = gtk::GestureLongPress {
                    connect_pressed[sender] => move |_, _, _| {
                        sender.input(AppMsg::EnterEdit);
                    }
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let assets = Rc::new(TargetAssets::load());
        let engine = Rc::new(RefCell::new(Engine::new(&config, assets.sizes())));

        let model = AppModel {
            engine: engine.clone(),
            config,
            visible: false,
            scale_factor: 1.0,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let engine_draw = engine.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) =
                    menu::draw(cr, &mut engine_draw.borrow_mut(), &colors, &assets)
                {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                if let Some(name) = wm::get_active_monitor() {
                    window::set_window_monitor(&self.root, &name);
                    if let Some(monitor) = window::get_monitor_by_name(&name) {
                        self.scale_factor = monitor.geometry().height() as f64 / REFERENCE_HEIGHT;
                    }
                }
                self.visible = true;
                self.refresh_viewport();
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                self.visible = false;
            }
            AppMsg::EnterEdit => {
                if !self.visible {
                    return;
                }
                self.engine.borrow_mut().enter_edit();
                self.drawing_area.queue_draw();
            }
            AppMsg::AddIcon(app) => {
                self.visible = true;
                self.refresh_viewport();
                let icon = Icon::new(app);
                let from = Point::new(
                    self.drawing_area.width() as f64 * 0.5,
                    self.drawing_area.height() as f64 * 0.5,
                );
                self.engine.borrow_mut().add_interactive(icon, from);
                self.drawing_area.queue_draw();
            }
            AppMsg::AppsIndexed(apps) => {
                let icons = apps.into_iter().map(Icon::new).collect();
                self.engine.borrow_mut().set_icons(icons);
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.engine.borrow_mut().apply_config(&new_config);
                    self.config = new_config;
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Escape => {
                let editing = self.engine.borrow().is_edit_mode();
                if editing {
                    let order = self.engine.borrow_mut().end_edit();
                    self.persist(order);
                    self.drawing_area.queue_draw();
                } else {
                    self.visible = false;
                }
            }
            AppMsg::Resize(width, height) => {
                if width > 0 && height > 0 {
                    self.engine.borrow_mut().set_viewport(
                        width as f64,
                        height as f64,
                        self.scale_factor,
                    );
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Touch(phase, point, time_ms) => {
                if !self.visible {
                    return;
                }
                let outcome = self.engine.borrow_mut().handle(TouchEvent {
                    phase,
                    point,
                    time_ms,
                });
                if let Some(request) = outcome.request {
                    self.handle_request(request);
                }
                if outcome.redraw {
                    self.drawing_area.queue_draw();
                }
            }
        }
    }
}

impl AppModel {
    fn refresh_viewport(&self) {
        let (width, height) = (self.drawing_area.width(), self.drawing_area.height());
        if width > 0 && height > 0 {
            self.engine
                .borrow_mut()
                .set_viewport(width as f64, height as f64, self.scale_factor);
        }
    }

    fn handle_request(&mut self, request: MenuRequest) {
        match request {
            MenuRequest::Launch(app) => {
                if let Err(e) = wm::launch(&app) {
                    log::error!("Failed to launch '{}': {}", app.name, e);
                }
                self.visible = false;
            }
            MenuRequest::OpenList => {
                match &self.config.list_exec {
                    Some(cmd) => {
                        if let Err(e) = wm::spawn_shell(cmd) {
                            log::error!("Failed to open application list: {}", e);
                        }
                    }
                    None => log::info!("No list_exec configured; ignoring tap"),
                }
                self.visible = false;
            }
            MenuRequest::OpenAppInfo(id) => {
                appdex::desktop::open_app_info(&id, self.config.info_exec.as_ref());
            }
            MenuRequest::Persist(order) => self.persist(order),
            MenuRequest::Close => {
                let editing = self.engine.borrow().is_edit_mode();
                if editing {
                    let order = self.engine.borrow_mut().end_edit();
                    self.persist(order);
                    self.drawing_area.queue_draw();
                }
            }
        }
    }

    fn persist(&self, order: Vec<AppId>) {
        relm4::spawn_blocking(move || {
            if let Err(e) = appdex::store::save_order(&order) {
                log::error!("Failed to persist menu order: {}", e);
            }
        });
    }
}
