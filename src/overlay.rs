//! Derivation of the overlay draw description.
//!
//! The composer turns session state into a list of [`Mark`]s — what must be
//! drawn, not how. Renderers (on-screen or the raster export) consume the
//! marks; styling beyond the information carried here is theirs.

use std::f64::consts::TAU;

use crate::compass::{CompassLabel, sector_step};
use crate::constants::{
    BOUNDARY_DOT_RADIUS, CENTROID_MARKER_RADIUS, COMPASS_LABEL_MAX_FRACTION,
    COMPASS_LABEL_MIN_DIST, COMPASS_LABEL_PADDING, NORTH_MARKER_RADIUS,
};
use crate::geometry::{Point, Rect};
use crate::session::AnnotationSession;

/// One element of the overlay draw description.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// A clicked wall boundary vertex.
    BoundaryDot { at: Point, radius: f32 },
    /// The committed centroid marker.
    Centroid { at: Point, radius: f32 },
    /// The north vector anchor dot.
    North {
        at: Point,
        radius: f32,
        fixed: bool,
    },
    /// Anchor for the lone "N" hint shown before the compass is revealed.
    NorthHint { at: Point },
    /// One of the 16 compass rays.
    CompassRay {
        label: CompassLabel,
        from: Point,
        to: Point,
    },
    /// Anchor for a compass sector label.
    CompassText { label: CompassLabel, at: Point },
    /// A placed area rectangle with its canvas label.
    Area {
        key: String,
        rect: Rect,
        fill: [u8; 4],
        label: String,
        label_at: Point,
        active: bool,
        /// Created in an earlier tool stage; renders de-emphasized.
        dimmed: bool,
    },
}

/// Derive the draw description for the current session state.
///
/// Marks are emitted in paint order: compass reference first, boundary dots
/// above it, areas on top of everything.
pub fn compose(session: &AnnotationSession) -> Vec<Mark> {
    let mut marks = Vec::new();
    let (width, height) = session.canvas_size();
    let (w, h) = (width as f32, height as f32);
    let center = session.compass_center();

    if session.show_center() {
        marks.push(Mark::Centroid {
            at: center,
            radius: CENTROID_MARKER_RADIUS,
        });
    }

    if let Some(north) = session.north() {
        let north_angle = f64::from(north.y - center.y).atan2(f64::from(north.x - center.x));
        if session.directions_shown() {
            let rotation = f64::from(session.rotation_offset_deg()).to_radians();
            for (i, label) in CompassLabel::all().iter().enumerate() {
                // The rotation offset turns every ray, the nominal north
                // ray included; the vector itself stays put.
                let ang = north_angle + i as f64 * sector_step() - rotation;
                marks.push(Mark::CompassRay {
                    label: *label,
                    from: center,
                    to: ray_end(center, ang, w, h),
                });
                marks.push(Mark::CompassText {
                    label: *label,
                    at: label_anchor(center, ang + sector_step() / 2.0, w, h),
                });
            }
        } else {
            marks.push(Mark::North {
                at: north,
                radius: NORTH_MARKER_RADIUS,
                fixed: session.north_fixed(),
            });
            marks.push(Mark::NorthHint {
                at: label_anchor(center, north_angle + sector_step() / 2.0, w, h),
            });
        }
    }

    for point in session.wall_points() {
        marks.push(Mark::BoundaryDot {
            at: *point,
            radius: BOUNDARY_DOT_RADIUS,
        });
    }

    let current_stage = session.tool_stage().index();
    let active = session.areas().active();
    for area in session.areas().iter() {
        marks.push(Mark::Area {
            key: area.key.clone(),
            rect: area.rect,
            fill: area.area_type.fill_color(),
            label: area.label(),
            label_at: area.rect.center(),
            active: active == Some(area.key.as_str()),
            dimmed: area.stage_index < current_stage,
        });
    }

    marks
}

/// Endpoint of a compass ray: far past the canvas edge, clipped by the
/// renderer.
fn ray_end(center: Point, angle: f64, width: f32, height: f32) -> Point {
    let radius = f64::from(width.max(height)) * 2.0;
    Point::new(
        center.x + (angle.cos() * radius) as f32,
        center.y + (angle.sin() * radius) as f32,
    )
}

/// Anchor for a sector label along the bisector between two adjacent rays,
/// clamped inside the canvas.
fn label_anchor(center: Point, angle: f64, width: f32, height: f32) -> Point {
    let angle = angle.rem_euclid(TAU);
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let padding = f64::from(COMPASS_LABEL_PADDING);
    let dx_max = if cos_a > 0.0 {
        (f64::from(width) - padding - f64::from(center.x)) / cos_a
    } else {
        (padding - f64::from(center.x)) / cos_a
    };
    let dy_max = if sin_a > 0.0 {
        (f64::from(height) - padding - f64::from(center.y)) / sin_a
    } else {
        (padding - f64::from(center.y)) / sin_a
    };
    let d_max = dx_max.abs().min(dy_max.abs());
    let cap = f64::from(width.min(height)) * f64::from(COMPASS_LABEL_MAX_FRACTION);
    let dist = f64::from(COMPASS_LABEL_MIN_DIST).max((d_max - 10.0).min(cap));
    Point::new(
        center.x + (cos_a * dist) as f32,
        center.y + (sin_a * dist) as f32,
    )
}

// ============================================================================
// Tests
// ============================================================================
