use crate::config::TargetEdge;
use crate::gui::menu::TARGET_PADDING;
use appdex::wm::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-size rects contain nothing.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// The four auxiliary edit-mode actions, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Add,
    Remove,
    Info,
    Done,
}

impl TargetKind {
    pub const ALL: [TargetKind; 4] = [
        TargetKind::Add,
        TargetKind::Remove,
        TargetKind::Info,
        TargetKind::Done,
    ];
}

/// Screen rectangles of the four action icons. Portrait viewports get a row
/// along the bottom edge, landscape a column along the right edge; free space
/// is split into `count + 1` even steps with each icon offset by the ones
/// before it.
#[derive(Debug, Default)]
pub struct TouchTargets {
    rects: [Rect; 4],
}

impl TouchTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(
        &mut self,
        viewport: (f64, f64),
        sizes: &[(f64, f64); 4],
        scale: f64,
        edge: TargetEdge,
    ) {
        let (width, height) = viewport;
        let bottom_row = match edge {
            TargetEdge::Auto => height > width,
            TargetEdge::Bottom => true,
            TargetEdge::Right => false,
        };
        let count = sizes.len() as f64;
        let padding = TARGET_PADDING * scale;

        if bottom_row {
            let total: f64 = sizes.iter().map(|s| s.0).sum();
            let largest = sizes.iter().map(|s| s.1).fold(0.0, f64::max);
            let step = (width - total) / (count + 1.0);
            let mut x = step;
            let y = height - largest - padding;
            for (rect, &(w, h)) in self.rects.iter_mut().zip(sizes) {
                *rect = Rect::new(x, y, w, h);
                x += step + w;
            }
        } else {
            let total: f64 = sizes.iter().map(|s| s.1).sum();
            let largest = sizes.iter().map(|s| s.0).fold(0.0, f64::max);
            let step = (height - total) / (count + 1.0);
            let x = width - largest - padding;
            let mut y = step;
            for (rect, &(w, h)) in self.rects.iter_mut().zip(sizes) {
                *rect = Rect::new(x, y, w, h);
                y += step + h;
            }
        }
    }

    pub fn rect(&self, kind: TargetKind) -> Rect {
        self.rects[kind as usize]
    }

    pub fn hit(&self, p: Point) -> Option<TargetKind> {
        TargetKind::ALL
            .into_iter()
            .find(|&kind| self.rect(kind).contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: [(f64, f64); 4] = [(96.0, 96.0); 4];

    #[test]
    fn test_portrait_lays_row_along_bottom() {
        let mut targets = TouchTargets::new();
        targets.layout((1080.0, 1920.0), &SIZES, 1.0, TargetEdge::Auto);

        let step = (1080.0 - 4.0 * 96.0) / 5.0;
        let y = 1920.0 - 96.0 - TARGET_PADDING;
        for (i, kind) in TargetKind::ALL.into_iter().enumerate() {
            let rect = targets.rect(kind);
            let expected_x = step * (i + 1) as f64 + 96.0 * i as f64;
            assert!((rect.x - expected_x).abs() < 1e-9, "{kind:?}");
            assert_eq!(rect.y, y);
        }
    }

    #[test]
    fn test_landscape_lays_column_along_right() {
        let mut targets = TouchTargets::new();
        targets.layout((1920.0, 1080.0), &SIZES, 1.0, TargetEdge::Auto);

        let step = (1080.0 - 4.0 * 96.0) / 5.0;
        let x = 1920.0 - 96.0 - TARGET_PADDING;
        for (i, kind) in TargetKind::ALL.into_iter().enumerate() {
            let rect = targets.rect(kind);
            let expected_y = step * (i + 1) as f64 + 96.0 * i as f64;
            assert!((rect.y - expected_y).abs() < 1e-9, "{kind:?}");
            assert_eq!(rect.x, x);
        }
    }

    #[test]
    fn test_edge_override_beats_orientation() {
        let mut targets = TouchTargets::new();
        targets.layout((1920.0, 1080.0), &SIZES, 1.0, TargetEdge::Bottom);
        // a row despite the landscape viewport
        let y = targets.rect(TargetKind::Add).y;
        assert!(TargetKind::ALL.into_iter().all(|k| targets.rect(k).y == y));

        targets.layout((1080.0, 1920.0), &SIZES, 1.0, TargetEdge::Right);
        let x = targets.rect(TargetKind::Add).x;
        assert!(TargetKind::ALL.into_iter().all(|k| targets.rect(k).x == x));
    }

    #[test]
    fn test_padding_scales_with_density() {
        let mut targets = TouchTargets::new();
        targets.layout((1080.0, 1920.0), &SIZES, 2.0, TargetEdge::Auto);
        assert_eq!(
            targets.rect(TargetKind::Add).y,
            1920.0 - 96.0 - TARGET_PADDING * 2.0
        );
    }

    #[test]
    fn test_hit_testing() {
        let mut targets = TouchTargets::new();
        targets.layout((1080.0, 1920.0), &SIZES, 1.0, TargetEdge::Auto);

        let inside = targets.rect(TargetKind::Info).center();
        assert_eq!(targets.hit(inside), Some(TargetKind::Info));
        assert_eq!(targets.hit(Point::new(540.0, 100.0)), None);
    }

    #[test]
    fn test_zero_size_rects_never_hit() {
        let targets = TouchTargets::new();
        assert_eq!(targets.hit(Point::default()), None);
    }
}
