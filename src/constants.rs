//! Global constants for the zonemark editor

/// Maximum distance (in surface pixels) between a click and the first vertex
/// for the click to close a polygon.
pub const POLYGON_CLOSE_THRESHOLD: f32 = 5.0;

/// Minimum length (in surface pixels) of a valid direction arrow.
pub const MIN_ARROW_LENGTH: f32 = 5.0;

/// Default number of polygon vertices per group
pub const DEFAULT_SIDES: usize = 4;

/// Default number of annotation groups
pub const DEFAULT_GROUPS: usize = 2;

/// Smallest polygon the editor accepts as a `sides` setting
pub const MIN_SIDES: usize = 3;

/// Number of points in a committed direction arrow (start, end)
pub const ARROW_POINTS: usize = 2;
