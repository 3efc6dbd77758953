use std::f64::consts::PI;

pub mod gesture;
pub mod model;
pub mod targets;
pub mod view;

pub use gesture::{Engine, EventOutcome, MenuRequest, TouchEvent, TouchPhase};
pub use model::{Icon, Menu};
pub use targets::{Rect, TargetKind, TouchTargets};
pub use view::{TargetAssets, draw};

pub const TAU: f64 = 2.0 * PI;
pub const REFERENCE_HEIGHT: f64 = 1440.0; // density scale reference
pub const ICON_LOAD_SIZE: i32 = 256; // pixbuf decode size
pub const ICON_VIEW_SHARE: f64 = 0.28; // icon diameter share of the smaller viewport dim
pub const MAX_ICON_SIZE: f64 = 96.0;
pub const MIN_ICON_SIZE: f64 = 40.0;
pub const ICON_ARC_SHARE: f64 = 0.5; // share of its arc an icon may fill
pub const DEAD_ZONE: f64 = 48.0; // no selection this close to the center
pub const TARGET_ICON_SIZE: i32 = 48;
pub const TARGET_PADDING: f64 = 80.0; // keeps the action strip off the screen edge
pub const ICON_INACTIVE_ALPHA: f64 = 0.4;
pub const HIGHLIGHT_RADIUS_FACTOR: f64 = 0.65; // selection ring relative to icon size
