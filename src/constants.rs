//! Global pixel-space constants for the annotation engine.

/// Fallback canvas width when no base image has been loaded.
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;

/// Fallback canvas height when no base image has been loaded.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// Minimum number of boundary points required to commit a centroid.
pub const MIN_BOUNDARY_POINTS: usize = 3;

/// Number of compass sectors.
pub const COMPASS_SECTORS: usize = 16;

/// Fraction of the canvas width used for a newly placed area.
pub const NEW_AREA_WIDTH_FRACTION: f32 = 0.15;

/// Fraction of the canvas height used for a newly placed area.
pub const NEW_AREA_HEIGHT_FRACTION: f32 = 0.12;

/// Minimum width of a newly placed area.
pub const NEW_AREA_MIN_WIDTH: f32 = 60.0;

/// Minimum height of a newly placed area.
pub const NEW_AREA_MIN_HEIGHT: f32 = 40.0;

/// Minimum area width enforced when resizing.
pub const MIN_AREA_WIDTH: f32 = 30.0;

/// Minimum area height enforced when resizing.
pub const MIN_AREA_HEIGHT: f32 = 20.0;

/// Hit tolerance (Chebyshev distance) for corner resize handles.
pub const RESIZE_HANDLE_SIZE: f32 = 8.0;

/// Radius of a boundary point dot.
pub const BOUNDARY_DOT_RADIUS: f32 = 4.0;

/// Radius of the centroid marker dot.
pub const CENTROID_MARKER_RADIUS: f32 = 6.0;

/// Radius of the north anchor dot.
pub const NORTH_MARKER_RADIUS: f32 = 6.0;

/// Padding kept between compass labels and the canvas edge.
pub const COMPASS_LABEL_PADDING: f32 = 20.0;

/// Minimum distance of a compass label from the compass center.
pub const COMPASS_LABEL_MIN_DIST: f32 = 30.0;

/// Compass labels sit no further out than this fraction of the short canvas side.
pub const COMPASS_LABEL_MAX_FRACTION: f32 = 0.35;

/// Default free-hand brush color (#e11d48).
pub const DEFAULT_BRUSH_COLOR: [u8; 4] = [0xe1, 0x1d, 0x48, 0xff];

/// Default free-hand brush stroke width.
pub const DEFAULT_BRUSH_SIZE: f32 = 6.0;

/// Smallest selectable brush stroke width.
pub const BRUSH_SIZE_MIN: f32 = 2.0;

/// Largest selectable brush stroke width.
pub const BRUSH_SIZE_MAX: f32 = 24.0;

/// Default cap on the undo history depth.
pub const DEFAULT_UNDO_DEPTH: usize = 100;
