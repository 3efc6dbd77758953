use crate::config::{Config, TargetEdge};
use crate::gui::menu::{ICON_VIEW_SHARE, MAX_ICON_SIZE, model};
use crate::gui::menu::model::{Icon, Menu};
use crate::gui::menu::targets::{TargetKind, TouchTargets};
use appdex::desktop::{AppId, AppInfo};
use appdex::wm::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub point: Point,
    pub time_ms: u64,
}

/// An effect the host must carry out on the engine's behalf.
#[derive(Debug, Clone)]
pub enum MenuRequest {
    Launch(AppInfo),
    OpenList,
    OpenAppInfo(AppId),
    Persist(Vec<AppId>),
    Close,
}

#[derive(Debug, Default)]
pub struct EventOutcome {
    pub redraw: bool,
    pub request: Option<MenuRequest>,
}

/// Backup taken when an icon is grabbed; `ungrabbed` is the order without the
/// grabbed icon, the base every reorder inserts into.
struct EditSession {
    backup: Vec<Icon>,
    ungrabbed: Vec<Icon>,
    grabbed: Option<Icon>,
}

enum GestureState {
    Idle,
    Tracking { down: Point, down_at: u64 },
    Edit(EditSession),
}

fn menu_radius(width: f64, height: f64, scale: f64) -> f64 {
    let mut min = width.min(height);
    let max_icon = MAX_ICON_SIZE * scale;
    if min * ICON_VIEW_SHARE > max_icon {
        min = max_icon / ICON_VIEW_SHARE;
    }
    min * 0.5
}

/// The gesture state machine. All touch input enters through `handle`; the
/// host queues a frame when the outcome says so and carries out any request.
pub struct Engine {
    pub menu: Menu,
    targets: TouchTargets,
    target_sizes: [(f64, f64); 4],
    state: GestureState,
    touch: Option<Point>,
    last_drawn: Option<Point>,
    dirty: bool,
    viewport: (f64, f64),
    radius: f64,
    scale: f64,
    tap_timeout_ms: u64,
    touch_slop_sq: f64,
    target_edge: TargetEdge,
}

impl Engine {
    pub fn new(config: &Config, target_sizes: [(f64, f64); 4]) -> Self {
        Self {
            menu: Menu::new(),
            targets: TouchTargets::new(),
            target_sizes,
            state: GestureState::Idle,
            touch: None,
            last_drawn: None,
            dirty: true,
            viewport: (0.0, 0.0),
            radius: 0.0,
            scale: 1.0,
            tap_timeout_ms: config.tap_timeout_ms,
            touch_slop_sq: config.touch_slop * config.touch_slop,
            target_edge: config.targets,
        }
    }

    pub fn apply_config(&mut self, config: &Config) {
        self.tap_timeout_ms = config.tap_timeout_ms;
        self.touch_slop_sq = config.touch_slop * config.touch_slop;
        self.target_edge = config.targets;
        self.layout_targets();
        self.invalidate();
    }

    pub fn set_viewport(&mut self, width: f64, height: f64, scale: f64) {
        self.viewport = (width, height);
        self.scale = scale;
        self.radius = menu_radius(width, height, scale);
        self.menu.set_scale(scale);
        self.layout_targets();
        // keep the circle in bounds after a resize or rotation
        self.menu.set_center(self.menu.center(), self.radius, self.viewport);
        self.menu.calculate(self.menu.center());
        self.invalidate();
    }

    fn layout_targets(&mut self) {
        self.targets.layout(self.viewport, &self.target_sizes, self.scale, self.target_edge);
    }

    pub fn set_icons(&mut self, icons: Vec<Icon>) {
        self.menu.icons = icons;
        self.menu.calculate(self.menu.center());
        self.invalidate();
    }

    pub fn targets(&self) -> &TouchTargets {
        &self.targets
    }

    pub fn touch(&self) -> Option<Point> {
        self.touch
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.state, GestureState::Edit(_))
    }

    pub fn has_grab(&self) -> bool {
        matches!(&self.state, GestureState::Edit(session) if session.grabbed.is_some())
    }

    pub fn menu_visible(&self) -> bool {
        self.touch.is_some() || self.is_edit_mode()
    }

    /// Render dedup: a frame is due only when the touch point moved since the
    /// last one, or something invalidated the view.
    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.touch != self.last_drawn
    }

    pub fn mark_drawn(&mut self) {
        self.last_drawn = self.touch;
        self.dirty = false;
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Enters edit mode with nothing grabbed, backing up the current order.
    pub fn enter_edit(&mut self) {
        if self.is_edit_mode() {
            return;
        }
        self.state = GestureState::Edit(EditSession {
            backup: self.menu.icons.clone(),
            ungrabbed: self.menu.icons.clone(),
            grabbed: None,
        });
        self.menu.calculate(self.menu.center());
        self.invalidate();
    }

    /// Drag-in entry point: starts an edit session with `icon` already
    /// grabbed at `from`, the menu centered in the viewport. Rolling back
    /// discards the addition.
    pub fn add_interactive(&mut self, icon: Icon, from: Point) {
        self.state = GestureState::Edit(EditSession {
            backup: self.menu.icons.clone(),
            ungrabbed: self.menu.icons.clone(),
            grabbed: Some(icon),
        });
        self.touch = Some(from);
        let center = Point::new(self.viewport.0 * 0.5, self.viewport.1 * 0.5);
        self.menu.set_center(center, self.radius, self.viewport);
        self.reorder_to(from);
        self.invalidate();
    }

    /// Leaves edit mode, returning the order to persist.
    pub fn end_edit(&mut self) -> Vec<AppId> {
        self.state = GestureState::Idle;
        self.menu.calculate(self.menu.center());
        self.invalidate();
        self.menu.icons.iter().map(|icon| icon.app.id.clone()).collect()
    }

    pub fn handle(&mut self, event: TouchEvent) -> EventOutcome {
        match event.phase {
            TouchPhase::Down => self.on_down(event.point, event.time_ms),
            TouchPhase::Move => self.on_move(event.point),
            TouchPhase::Up => self.on_up(event.point, event.time_ms),
            TouchPhase::Cancel => self.on_cancel(),
        }
    }

    fn outcome(&self, request: Option<MenuRequest>) -> EventOutcome {
        EventOutcome {
            redraw: self.needs_redraw(),
            request,
        }
    }

    fn on_down(&mut self, point: Point, at: u64) -> EventOutcome {
        self.touch = Some(point);
        if self.is_edit_mode() {
            self.grab_at(point);
            if self.has_grab() {
                self.reorder_to(point);
            }
        } else {
            self.state = GestureState::Tracking {
                down: point,
                down_at: at,
            };
            self.menu.set_center(point, self.radius, self.viewport);
            self.menu.calculate(point);
        }
        self.outcome(None)
    }

    fn on_move(&mut self, point: Point) -> EventOutcome {
        self.touch = Some(point);
        if self.has_grab() {
            self.reorder_to(point);
        } else if matches!(self.state, GestureState::Tracking { .. }) {
            self.menu.calculate(point);
        }
        self.outcome(None)
    }

    fn on_up(&mut self, point: Point, at: u64) -> EventOutcome {
        self.touch = Some(point);
        let request = if self.is_edit_mode() {
            self.edit_up(point)
        } else {
            self.tracking_up(point, at)
        };
        // menu hides until the next touch
        self.touch = None;
        self.outcome(request)
    }

    fn on_cancel(&mut self) -> EventOutcome {
        self.touch = None;
        if let GestureState::Edit(session) = &mut self.state {
            session.grabbed = None;
        } else {
            self.state = GestureState::Idle;
        }
        self.outcome(None)
    }

    fn tracking_up(&mut self, point: Point, at: u64) -> Option<MenuRequest> {
        let GestureState::Tracking { down, down_at } = self.state else {
            self.state = GestureState::Idle;
            return None;
        };
        self.state = GestureState::Idle;

        if at.saturating_sub(down_at) <= self.tap_timeout_ms
            && model::dist_sq(down, point) <= self.touch_slop_sq
        {
            return Some(MenuRequest::OpenList);
        }
        self.menu.calculate(point);
        self.menu
            .selected_icon()
            .map(|icon| MenuRequest::Launch(icon.app.clone()))
    }

    fn edit_up(&mut self, point: Point) -> Option<MenuRequest> {
        let hit = self.targets.hit(point);
        let (grabbed, backup) = {
            let GestureState::Edit(session) = &mut self.state else {
                return None;
            };
            (session.grabbed.take(), session.backup.clone())
        };

        let mut request = None;
        match (hit, grabbed) {
            (Some(TargetKind::Add), Some(_)) => {
                self.menu.icons = backup;
                self.invalidate();
            }
            (Some(TargetKind::Add), None) => request = Some(MenuRequest::Close),
            (Some(TargetKind::Remove), Some(grabbed)) => {
                self.menu.icons.retain(|icon| icon.app.id != grabbed.app.id);
                self.invalidate();
            }
            (Some(TargetKind::Info), Some(grabbed)) => {
                self.menu.icons = backup;
                self.invalidate();
                request = Some(MenuRequest::OpenAppInfo(grabbed.app.id.clone()));
            }
            (Some(TargetKind::Done), Some(_)) => {
                self.menu.icons = backup;
                self.invalidate();
            }
            (Some(TargetKind::Done), None) => {
                request = Some(MenuRequest::Persist(self.end_edit()));
            }
            _ => {}
        }

        // icons settle back on the static circle
        let center = self.menu.center();
        self.menu.calculate(center);
        request
    }

    /// Grabs the icon under `point`, if any. The hit area is the circle of
    /// radius `size / 2` around the icon's center.
    fn grab_at(&mut self, point: Point) {
        let hit = self.menu.icons.iter().position(|icon| {
            let half = icon.size * 0.5;
            model::dist_sq(point, icon.center()) < half * half
        });
        let Some(index) = hit else { return };

        let backup = self.menu.icons.clone();
        let grabbed = self.menu.icons.remove(index);
        let ungrabbed = self.menu.icons.clone();
        self.state = GestureState::Edit(EditSession {
            backup,
            ungrabbed,
            grabbed: Some(grabbed),
        });
        self.invalidate();
    }

    /// Rebuilds the order with the grabbed icon inserted at the angular gap
    /// under `point`, and pins its drawn position to the touch.
    fn reorder_to(&mut self, point: Point) {
        let GestureState::Edit(session) = &self.state else {
            return;
        };
        let Some(grabbed) = session.grabbed.clone() else {
            return;
        };
        let index = model::insertion_index(point, self.menu.center(), session.ungrabbed.len());
        let mut icons = session.ungrabbed.clone();
        icons.insert(index, grabbed);
        self.menu.icons = icons;
        self.menu.calculate(point);
        if let Some(icon) = self.menu.icons.get_mut(index) {
            icon.x = point.x;
            icon.y = point.y;
        }
    }
}
