//! Free-hand brush strokes on the session overlay bitmap.
//!
//! Strokes are round-capped: each pointer-move segment is stamped as a run
//! of filled discs at roughly one-pixel spacing. The bitmap is RGBA at the
//! base image's native resolution; untouched pixels stay fully transparent.

use image::{Rgba, RgbaImage};

use crate::geometry::Point;

/// Create a transparent overlay bitmap matching the base image.
pub fn new_overlay(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width, height)
}

/// Stamp a filled disc. Pixels outside the bitmap are ignored.
pub fn stamp_disc(overlay: &mut RgbaImage, center: Point, radius: f32, color: [u8; 4]) {
    let (w, h) = overlay.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let r = radius.max(0.5);
    let x0 = (center.x - r).floor().max(0.0) as u32;
    let y0 = (center.y - r).floor().max(0.0) as u32;
    let x1 = ((center.x + r).ceil().max(0.0) as u32).min(w - 1);
    let y1 = ((center.y + r).ceil().max(0.0) as u32).min(h - 1);
    if x0 > x1 || y0 > y1 {
        return;
    }
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dx * dx + dy * dy <= r * r {
                overlay.put_pixel(x, y, Rgba(color));
            }
        }
    }
}

/// Stamp one stroke segment from `from` to `to` with the given stroke width.
pub fn stroke_segment(overlay: &mut RgbaImage, from: Point, to: Point, color: [u8; 4], size: f32) {
    let radius = (size / 2.0).max(0.5);
    let dist = from.distance_to(&to);
    let steps = dist.ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let at = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        stamp_disc(overlay, at, radius, color);
    }
}

// ============================================================================
// Tests
// ============================================================================
