use crate::gui::menu::{
    DEAD_ZONE, ICON_ARC_SHARE, ICON_LOAD_SIZE, MAX_ICON_SIZE, MIN_ICON_SIZE, TAU,
};
use appdex::desktop::AppInfo;
use appdex::wm::Point;
use gdk_pixbuf::Pixbuf;
use std::f64::consts::PI;

/// One menu entry. Position and size are live layout output, recomputed by
/// `Menu::calculate` on every pass.
#[derive(Clone)]
pub struct Icon {
    pub app: AppInfo,
    pub pixbuf: Option<Pixbuf>,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Icon {
    pub fn new(app: AppInfo) -> Self {
        let pixbuf = Self::load_pixbuf(&app);
        Self {
            app,
            pixbuf,
            x: 0.0,
            y: 0.0,
            size: 0.0,
        }
    }

    fn load_pixbuf(app: &AppInfo) -> Option<Pixbuf> {
        (!app.icon.as_os_str().is_empty())
            .then(|| Pixbuf::from_file_at_scale(&app.icon, ICON_LOAD_SIZE, ICON_LOAD_SIZE, true).ok())?
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

pub fn positive_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

pub fn dist_sq(a: Point, b: Point) -> f64 {
    let (dx, dy) = (a.x - b.x, a.y - b.y);
    dx * dx + dy * dy
}

pub fn angle_difference(a: f64, b: f64) -> f64 {
    // normalize to [-PI, PI] to find the shortest path around the circle
    ((a - b + PI).rem_euclid(TAU) - PI).abs()
}

/// Which gap of the ungrabbed order a drag at `touch` falls into. Buckets are
/// centered on their slot via the half-step offset, so the result is the gap
/// whose center angle is nearest.
pub fn insertion_index(touch: Point, center: Point, ungrabbed_count: usize) -> usize {
    let step = TAU / (ungrabbed_count + 1) as f64;
    let angle = positive_angle((touch.y - center.y).atan2(touch.x - center.x) + step * 0.5);
    ((angle / step) as usize).min(ungrabbed_count)
}

fn icon_size(radius: f64, count: usize, scale: f64) -> f64 {
    let arc = TAU * radius / count as f64;
    (arc * ICON_ARC_SHARE).clamp(MIN_ICON_SIZE * scale, MAX_ICON_SIZE * scale)
}

/// The live menu model: the ordered icon ring, its center and radius. Order
/// is significant; it defines angular placement and insertion tie-breaks.
pub struct Menu {
    pub icons: Vec<Icon>,
    center: Point,
    radius: f64,
    scale: f64,
    selected: Option<usize>,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            icons: Vec::new(),
            center: Point::default(),
            radius: 0.0,
            scale: 1.0,
            selected: None,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Moves the menu, keeping the full circle inside the viewport.
    pub fn set_center(&mut self, point: Point, radius: f64, bounds: (f64, f64)) {
        self.radius = radius;
        self.center = Point::new(
            point.x.clamp(radius, (bounds.0 - radius).max(radius)),
            point.y.clamp(radius, (bounds.1 - radius).max(radius)),
        );
    }

    /// Lays the icons out evenly around the circle and picks the selection
    /// nearest to `focus`. With no icons this is a no-op.
    pub fn calculate(&mut self, focus: Point) {
        let count = self.icons.len();
        if count == 0 {
            self.selected = None;
            return;
        }
        let step = TAU / count as f64;
        let size = icon_size(self.radius, count, self.scale);
        for (i, icon) in self.icons.iter_mut().enumerate() {
            let angle = step * i as f64;
            icon.x = self.center.x + self.radius * angle.cos();
            icon.y = self.center.y + self.radius * angle.sin();
            icon.size = size;
        }
        self.selected = self.select_at(focus);
    }

    fn select_at(&self, focus: Point) -> Option<usize> {
        let dead_zone = DEAD_ZONE * self.scale;
        if dist_sq(focus, self.center) <= dead_zone * dead_zone {
            return None;
        }
        let focus_angle = (focus.y - self.center.y).atan2(focus.x - self.center.x);
        let step = TAU / self.icons.len() as f64;
        (0..self.icons.len()).min_by(|&a, &b| {
            angle_difference(focus_angle, step * a as f64)
                .total_cmp(&angle_difference(focus_angle, step * b as f64))
        })
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_icon(&self) -> Option<&Icon> {
        self.selected.and_then(|i| self.icons.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appdex::desktop::{AppId, AppName};
    use appdex::wm::{ShellCommand, WindowClass};
    use std::path::PathBuf;

    fn icon(id: &str) -> Icon {
        Icon {
            app: AppInfo {
                id: AppId::new(id),
                name: AppName::new(id),
                icon: PathBuf::new(),
                class: WindowClass::new(id),
                exec: ShellCommand::new(id),
                entry_path: PathBuf::new(),
            },
            pixbuf: None,
            x: 0.0,
            y: 0.0,
            size: 0.0,
        }
    }

    fn menu(count: usize, center: Point, radius: f64) -> Menu {
        let mut menu = Menu::new();
        menu.icons = (0..count).map(|i| icon(&format!("app{i}"))).collect();
        menu.set_center(center, radius, (10_000.0, 10_000.0));
        menu
    }

    fn deg(d: f64) -> f64 {
        d * PI / 180.0
    }

    #[test]
    fn test_icons_lie_on_circle_evenly_spaced() {
        for count in 1..=12 {
            let mut menu = menu(count, Point::new(500.0, 500.0), 200.0);
            menu.calculate(menu.center());

            let step = TAU / count as f64;
            for (i, icon) in menu.icons.iter().enumerate() {
                let dist = dist_sq(icon.center(), menu.center()).sqrt();
                assert!((dist - 200.0).abs() < 1e-9, "count={count} i={i}");

                let angle =
                    positive_angle((icon.y - menu.center().y).atan2(icon.x - menu.center().x));
                assert!(
                    angle_difference(angle, step * i as f64) < 1e-9,
                    "count={count} i={i}"
                );
            }
        }
    }

    #[test]
    fn test_five_icon_portrait_placement() {
        let mut menu = menu(5, Point::new(540.0, 960.0), 300.0);
        menu.set_center(Point::new(540.0, 960.0), 300.0, (1080.0, 1920.0));
        menu.calculate(menu.center());

        for (i, icon) in menu.icons.iter().enumerate() {
            let angle = deg(72.0 * i as f64);
            assert!((icon.x - (540.0 + 300.0 * angle.cos())).abs() < 1e-9);
            assert!((icon.y - (960.0 + 300.0 * angle.sin())).abs() < 1e-9);
        }
    }

    #[test]
    fn test_center_clamped_to_viewport() {
        let mut menu = menu(1, Point::default(), 0.0);
        menu.set_center(Point::new(10.0, 5000.0), 300.0, (1080.0, 1920.0));
        assert_eq!(menu.center(), Point::new(300.0, 1620.0));
    }

    #[test]
    fn test_insertion_index_at_200_degrees() {
        // 3 ungrabbed icons, touch at 200 degrees: step is 90, so
        // floor((200 + 45) / 90) = 2
        let center = Point::default();
        let touch = Point::new(100.0 * deg(200.0).cos(), 100.0 * deg(200.0).sin());
        assert_eq!(insertion_index(touch, center, 3), 2);
    }

    #[test]
    fn test_insertion_index_bucket_centers_and_boundaries() {
        let center = Point::default();
        let at = |d: f64| Point::new(100.0 * deg(d).cos(), 100.0 * deg(d).sin());

        // 4 ungrabbed icons: 5 slots, 72 degree step
        for k in 0..=4 {
            assert_eq!(insertion_index(at(72.0 * k as f64), center, 4), k);
        }
        // bucket edges sit half a step off the slot angles
        assert_eq!(insertion_index(at(35.9), center, 4), 0);
        assert_eq!(insertion_index(at(36.1), center, 4), 1);
        // the zeroth bucket wraps around the reference angle
        assert_eq!(insertion_index(at(350.0), center, 4), 0);
    }

    #[test]
    fn test_insertion_index_sweep_is_monotonic() {
        let center = Point::default();
        let mut visited = Vec::new();
        for tenth in 0..3600 {
            let angle = deg(tenth as f64 / 10.0);
            let touch = Point::new(100.0 * angle.cos(), 100.0 * angle.sin());
            let index = insertion_index(touch, center, 4);
            if visited.last() != Some(&index) {
                visited.push(index);
            }
        }
        // every index once, in order, with bucket zero split across the wrap
        assert_eq!(visited, vec![0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_icon_size_clamps() {
        assert_eq!(icon_size(200.0, 100, 1.0), MIN_ICON_SIZE);
        assert_eq!(icon_size(1000.0, 4, 1.0), MAX_ICON_SIZE);
        assert_eq!(icon_size(1000.0, 4, 2.0), MAX_ICON_SIZE * 2.0);

        let mid = icon_size(100.0, 12, 1.0);
        assert!((mid - TAU * 100.0 / 12.0 * ICON_ARC_SHARE).abs() < 1e-9);
    }

    #[test]
    fn test_positive_angle() {
        assert!((positive_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!((positive_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_selection_follows_focus_with_dead_zone() {
        let mut menu = menu(4, Point::new(500.0, 500.0), 200.0);

        menu.calculate(Point::new(700.0, 500.0));
        assert_eq!(menu.selected_index(), Some(0));

        menu.calculate(Point::new(500.0, 700.0));
        assert_eq!(menu.selected_index(), Some(1));

        // inside the dead zone nothing is selected
        menu.calculate(Point::new(500.0, 510.0));
        assert_eq!(menu.selected_index(), None);
    }

    #[test]
    fn test_empty_menu_is_inert() {
        let mut menu = Menu::new();
        menu.set_center(Point::new(500.0, 500.0), 200.0, (1000.0, 1000.0));
        menu.calculate(Point::new(700.0, 500.0));
        assert_eq!(menu.selected_index(), None);
        assert!(menu.icons.is_empty());
    }
}
