//! VASTUMARK — floor-plan compass annotation engine.
//!
//! Annotate a floor-plan raster image with a wall boundary, derive a compass
//! reference frame from its centroid and a user-placed north vector, place
//! typed room/fixture areas, and resolve each area's compass direction into
//! guidance records from an externally loaded table.

pub mod brush;
pub mod compass;
pub mod config;
pub mod constants;
pub mod export;
pub mod geometry;
pub mod guidance;
pub mod model;
pub mod overlay;
pub mod resolve;
pub mod session;

pub use compass::{CompassLabel, angle_to_compass_label};
pub use geometry::{Corner, Point, Rect};
pub use guidance::{GuidanceEntry, GuidanceError, GuidanceTable};
pub use model::{Area, AreaRegistry, AreaType};
pub use resolve::{ReportRecord, SessionReport, build_report};
pub use session::{AnnotationSession, Command, ProgressStage, Snapshot, ToolStage};
