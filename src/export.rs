//! Flattened raster export: base image plus all overlay marks.
//!
//! Produces one composited `RgbaImage`; encoding it (PNG or otherwise) is
//! the caller's concern. Geometric marks are rasterized here; text marks
//! (`NorthHint`, `CompassText`) carry their anchor and string for the
//! consuming renderer and are not rasterized, since glyph layout stays out
//! of the engine.

use image::RgbaImage;
use thiserror::Error;

use crate::brush;
use crate::geometry::{Point, Rect};
use crate::overlay::{self, Mark};
use crate::session::AnnotationSession;

/// Marker and outline color (near-black).
const MARK_DARK: [u8; 4] = [17, 24, 39, 255];

/// Centroid marker color.
const CENTROID_COLOR: [u8; 4] = [225, 29, 72, 255];

/// Halo color behind markers.
const HALO_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Boundary dot color.
const BOUNDARY_BLACK: [u8; 4] = [0, 0, 0, 255];

/// Errors that can occur while flattening a session for export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No base image has been loaded into the session
    #[error("no base image loaded")]
    NoImage,

    /// The supplied bitmap does not match the session's image dimensions
    #[error("base image is {found_width}×{found_height}, session expects {expected_width}×{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },
}

/// Composite the base image, the free-hand overlay and all geometric marks
/// into one bitmap.
pub fn flatten(base: &RgbaImage, session: &AnnotationSession) -> Result<RgbaImage, ExportError> {
    let Some((width, height)) = session.image_size() else {
        return Err(ExportError::NoImage);
    };
    let (found_width, found_height) = base.dimensions();
    if (found_width, found_height) != (width, height) {
        return Err(ExportError::DimensionMismatch {
            expected_width: width,
            expected_height: height,
            found_width,
            found_height,
        });
    }

    let mut out = base.clone();
    blend_bitmap(&mut out, session.overlay());

    for mark in overlay::compose(session) {
        match mark {
            Mark::BoundaryDot { at, radius } => {
                brush::stamp_disc(&mut out, at, radius, BOUNDARY_BLACK);
            }
            Mark::Centroid { at, radius } => {
                brush::stamp_disc(&mut out, at, radius + 2.0, HALO_WHITE);
                brush::stamp_disc(&mut out, at, radius, CENTROID_COLOR);
            }
            Mark::North { at, radius, .. } => {
                brush::stamp_disc(&mut out, at, radius, MARK_DARK);
            }
            Mark::CompassRay { from, to, .. } => {
                brush::stroke_segment(&mut out, from, to, MARK_DARK, 2.0);
            }
            Mark::Area {
                rect, fill, active, ..
            } => {
                fill_rect(&mut out, &rect, fill);
                let border = if active { 3.0 } else { 1.5 };
                stroke_rect(&mut out, &rect, MARK_DARK, border);
            }
            // Text marks keep their anchors for renderers with a font.
            Mark::NorthHint { .. } | Mark::CompassText { .. } => {}
        }
    }
    Ok(out)
}

/// Alpha-blend a same-sized bitmap over the output.
fn blend_bitmap(out: &mut RgbaImage, layer: &RgbaImage) {
    if out.dimensions() != layer.dimensions() {
        return;
    }
    for (x, y, pixel) in layer.enumerate_pixels() {
        if pixel.0[3] > 0 {
            blend_pixel(out, x, y, pixel.0);
        }
    }
}

/// Alpha-blend a translucent rectangle fill.
fn fill_rect(out: &mut RgbaImage, rect: &Rect, color: [u8; 4]) {
    let (w, h) = out.dimensions();
    let x0 = rect.x.max(0.0) as u32;
    let y0 = rect.y.max(0.0) as u32;
    let x1 = ((rect.x + rect.width).max(0.0) as u32).min(w.saturating_sub(1));
    let y1 = ((rect.y + rect.height).max(0.0) as u32).min(h.saturating_sub(1));
    if rect.x + rect.width < 0.0 || rect.y + rect.height < 0.0 {
        return;
    }
    for y in y0..=y1 {
        for x in x0..=x1 {
            blend_pixel(out, x, y, color);
        }
    }
}

/// Stroke a rectangle border with round-capped segments.
fn stroke_rect(out: &mut RgbaImage, rect: &Rect, color: [u8; 4], width: f32) {
    let tl = Point::new(rect.x, rect.y);
    let tr = Point::new(rect.x + rect.width, rect.y);
    let br = Point::new(rect.x + rect.width, rect.y + rect.height);
    let bl = Point::new(rect.x, rect.y + rect.height);
    brush::stroke_segment(out, tl, tr, color, width);
    brush::stroke_segment(out, tr, br, color, width);
    brush::stroke_segment(out, br, bl, color, width);
    brush::stroke_segment(out, bl, tl, color, width);
}

/// Standard alpha-over blend of one pixel.
fn blend_pixel(out: &mut RgbaImage, x: u32, y: u32, color: [u8; 4]) {
    let (w, h) = out.dimensions();
    if x >= w || y >= h {
        return;
    }
    let dst = out.get_pixel_mut(x, y);
    let alpha = f32::from(color[3]) / 255.0;
    for i in 0..3 {
        let over = f32::from(color[i]) * alpha + f32::from(dst.0[i]) * (1.0 - alpha);
        dst.0[i] = over.round() as u8;
    }
    dst.0[3] = dst.0[3].max(color[3]);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AreaType;
    use crate::session::Command;

    fn white_base(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]))
    }

    fn scenario_session() -> AnnotationSession {
        let mut session = AnnotationSession::new();
        session.apply(Command::LoadImage {
            width: 800,
            height: 600,
        });
        session.apply(Command::BeginWallSelection);
        for (x, y) in [(100.0, 100.0), (700.0, 100.0), (700.0, 500.0), (100.0, 500.0)] {
            session.apply(Command::AddBoundaryPoint(Point::new(x, y)));
        }
        session.apply(Command::CommitCenter);
        session
    }

    #[test]
    fn test_flatten_requires_matching_dimensions() {
        let session = AnnotationSession::new();
        assert!(matches!(
            flatten(&white_base(10, 10), &session),
            Err(ExportError::NoImage)
        ));

        let session = scenario_session();
        assert!(matches!(
            flatten(&white_base(640, 480), &session),
            Err(ExportError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_flatten_draws_markers() {
        let session = scenario_session();
        let out = flatten(&white_base(800, 600), &session).unwrap();
        // Centroid marker at (400,300).
        assert_eq!(out.get_pixel(400, 300).0, CENTROID_COLOR);
        // Boundary dot at each clicked corner.
        assert_eq!(out.get_pixel(100, 100).0, BOUNDARY_BLACK);
        // Untouched pixels keep the base.
        assert_eq!(out.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_flatten_composites_brush_overlay() {
        let mut session = scenario_session();
        session.apply(Command::SetBrushEnabled(true));
        session.pointer_down(Point::new(50.0, 50.0));
        session.pointer_move(Point::new(60.0, 50.0));
        session.pointer_up();

        let out = flatten(&white_base(800, 600), &session).unwrap();
        assert_eq!(out.get_pixel(55, 50).0, [225, 29, 72, 255]);
    }

    #[test]
    fn test_flatten_tints_area_fill() {
        let mut session = scenario_session();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        let center = session.areas().get("Bedroom-1").unwrap().center();

        let out = flatten(&white_base(800, 600), &session).unwrap();
        let tinted = out.get_pixel(center.x as u32, center.y as u32).0;
        // Translucent indigo over white darkens the blue-adjacent channels.
        assert_ne!(tinted, [255, 255, 255, 255]);
        assert_eq!(tinted[3], 255);
    }
}
