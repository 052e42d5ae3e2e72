//! Global constants for the polygon editor

/// Minimum number of vertices for a polygon to be committed.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Default hit radius for path point handles (in shape-space units).
pub const DEFAULT_HIT_RADIUS: f64 = 3.0;

/// Default minimum shoelace area for a committed polygon.
pub const DEFAULT_MIN_AREA: f64 = 1e-4;

/// Threshold of the legacy `|dx| * |dy|` close heuristic.
pub const AREA_PRODUCT_CLOSE_THRESHOLD: f64 = 10.0;

/// Default radius for the distance-based close policy.
pub const DEFAULT_CLOSE_RADIUS: f64 = 15.0;

/// Maximum number of document versions kept in the undo history.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Handle index of the whole-shape affordance (move).
pub const WHOLE_SHAPE_HANDLE: usize = 0;
