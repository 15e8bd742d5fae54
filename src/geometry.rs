//! Pure geometry: polygon centroids, clockwise ordering, and hit tests.
//!
//! Everything here is stateless and works in base-image pixel coordinates.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_BOUNDARY_POINTS;

// ============================================================================
// Core Types
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to whole pixels.
    pub fn rounded(&self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle (bounds inclusive).
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Get the top-left corner.
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the position of the given corner.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::Nw => Point::new(self.x, self.y),
            Corner::Ne => Point::new(self.x + self.width, self.y),
            Corner::Sw => Point::new(self.x, self.y + self.height),
            Corner::Se => Point::new(self.x + self.width, self.y + self.height),
        }
    }
}

/// A corner of a rectangle, used for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    /// All corners in hit-test priority order.
    pub fn all() -> &'static [Corner] {
        &[Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se]
    }

    /// The diagonally opposite corner (the anchor during a resize).
    pub fn opposite(&self) -> Corner {
        match self {
            Corner::Nw => Corner::Se,
            Corner::Ne => Corner::Sw,
            Corner::Sw => Corner::Ne,
            Corner::Se => Corner::Nw,
        }
    }
}

// ============================================================================
// Polygon Centroid
// ============================================================================

/// Signed-area (shoelace) polygon centroid, rounded to whole pixels.
///
/// Returns `None` if fewer than 3 points are given or the doubled signed
/// area is exactly zero (degenerate polygon); callers fall back to
/// [`mean_point`] in that case.
pub fn compute_centroid(points: &[Point]) -> Option<Point> {
    if points.len() < MIN_BOUNDARY_POINTS {
        return None;
    }
    let mut area_twice = 0.0f64;
    let mut cx_sum = 0.0f64;
    let mut cy_sum = 0.0f64;
    for i in 0..points.len() {
        let p0 = points[i];
        let p1 = points[(i + 1) % points.len()];
        let cross = f64::from(p0.x) * f64::from(p1.y) - f64::from(p1.x) * f64::from(p0.y);
        area_twice += cross;
        cx_sum += (f64::from(p0.x) + f64::from(p1.x)) * cross;
        cy_sum += (f64::from(p0.y) + f64::from(p1.y)) * cross;
    }
    if area_twice == 0.0 {
        return None;
    }
    let cx = cx_sum / (3.0 * area_twice);
    let cy = cy_sum / (3.0 * area_twice);
    Some(Point::new(cx as f32, cy as f32).rounded())
}

/// Arithmetic mean of a set of points; `None` when empty.
pub fn mean_point(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let sx: f32 = points.iter().map(|p| p.x).sum();
    let sy: f32 = points.iter().map(|p| p.y).sum();
    Some(Point::new(sx / n, sy / n))
}

/// Polygon centroid with mean-point fallback for degenerate polygons.
///
/// The result is rounded to whole pixels either way. `None` only when fewer
/// than 3 points are given.
pub fn centroid_or_mean(points: &[Point]) -> Option<Point> {
    if points.len() < MIN_BOUNDARY_POINTS {
        return None;
    }
    compute_centroid(points).or_else(|| mean_point(points).map(|p| p.rounded()))
}

/// Sort points clockwise by polar angle around their arithmetic mean.
///
/// Sequences of 2 or fewer points are returned unchanged. In screen
/// coordinates (y down) increasing `atan2` angle sweeps clockwise.
pub fn order_clockwise(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let Some(center) = mean_point(points) else {
        return points.to_vec();
    };
    let mut ordered = points.to_vec();
    ordered.sort_by(|a, b| {
        let aa = (a.y - center.y).atan2(a.x - center.x);
        let ab = (b.y - center.y).atan2(b.x - center.x);
        aa.total_cmp(&ab)
    });
    ordered
}

// ============================================================================
// Hit Tests
// ============================================================================

/// Inclusive-bounds containment test.
pub fn hit_test_rect(point: &Point, rect: &Rect) -> bool {
    rect.contains(point)
}

/// Test the four corner handles of a rectangle, in `nw, ne, sw, se` priority
/// order. A handle matches when the point is within `handle_size` of the
/// corner on both axes.
pub fn hit_test_resize_handle(point: &Point, rect: &Rect, handle_size: f32) -> Option<Corner> {
    Corner::all().iter().copied().find(|&corner| {
        let at = rect.corner(corner);
        (point.x - at.x).abs() <= handle_size && (point.y - at.y).abs() <= handle_size
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_square_centroid_is_geometric_center() {
        let square = [
            Point::new(100.0, 100.0),
            Point::new(700.0, 100.0),
            Point::new(700.0, 500.0),
            Point::new(100.0, 500.0),
        ];
        assert_eq!(compute_centroid(&square), Some(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_triangle_centroid() {
        let tri = [
            Point::new(0.0, 0.0),
            Point::new(90.0, 0.0),
            Point::new(0.0, 90.0),
        ];
        assert_eq!(compute_centroid(&tri), Some(Point::new(30.0, 30.0)));
    }

    #[test]
    fn test_centroid_inside_convex_hull() {
        let pts = [
            Point::new(10.0, 10.0),
            Point::new(200.0, 30.0),
            Point::new(180.0, 220.0),
            Point::new(20.0, 190.0),
        ];
        let c = compute_centroid(&pts).unwrap();
        let min_x = pts.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = pts.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = pts.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = pts.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        assert!(c.x > min_x && c.x < max_x);
        assert!(c.y > min_y && c.y < max_y);
    }

    #[test]
    fn test_too_few_points_has_no_centroid() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert_eq!(compute_centroid(&pts), None);
        assert_eq!(centroid_or_mean(&pts), None);
    }

    #[test]
    fn test_degenerate_polygon_falls_back_to_mean() {
        // Collinear points: doubled signed area is exactly zero.
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ];
        assert_eq!(compute_centroid(&pts), None);
        assert_eq!(centroid_or_mean(&pts), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_order_clockwise_square() {
        // Deliberately scrambled square corners.
        let pts = [
            Point::new(700.0, 500.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 500.0),
            Point::new(700.0, 100.0),
        ];
        let ordered = order_clockwise(&pts);
        // Clockwise in screen coordinates starting from the smallest angle
        // (-3π/4 at the top-left corner).
        assert_eq!(
            ordered,
            vec![
                Point::new(100.0, 100.0),
                Point::new(700.0, 100.0),
                Point::new(700.0, 500.0),
                Point::new(100.0, 500.0),
            ]
        );
    }

    #[test]
    fn test_order_clockwise_passes_through_small_inputs() {
        let pts = [Point::new(5.0, 5.0), Point::new(1.0, 1.0)];
        assert_eq!(order_clockwise(&pts), pts.to_vec());
    }

    #[test]
    fn test_hit_test_rect_inclusive() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert!(hit_test_rect(&Point::new(50.0, 50.0), &rect));
        assert!(hit_test_rect(&Point::new(10.0, 10.0), &rect));
        assert!(hit_test_rect(&Point::new(110.0, 110.0), &rect));
        assert!(!hit_test_rect(&Point::new(5.0, 50.0), &rect));
    }

    #[test]
    fn test_resize_handle_hits_and_priority() {
        let rect = Rect::new(100.0, 100.0, 50.0, 50.0);
        assert_eq!(
            hit_test_resize_handle(&Point::new(101.0, 99.0), &rect, 8.0),
            Some(Corner::Nw)
        );
        assert_eq!(
            hit_test_resize_handle(&Point::new(150.0, 150.0), &rect, 8.0),
            Some(Corner::Se)
        );
        assert_eq!(
            hit_test_resize_handle(&Point::new(125.0, 125.0), &rect, 8.0),
            None
        );
        // A degenerate rectangle puts all corners in range; nw wins.
        let tiny = Rect::new(100.0, 100.0, 4.0, 4.0);
        assert_eq!(
            hit_test_resize_handle(&Point::new(102.0, 102.0), &tiny, 8.0),
            Some(Corner::Nw)
        );
    }

    #[test]
    fn test_corner_opposite() {
        assert_eq!(Corner::Nw.opposite(), Corner::Se);
        assert_eq!(Corner::Se.opposite(), Corner::Nw);
        assert_eq!(Corner::Ne.opposite(), Corner::Sw);
        assert_eq!(Corner::Sw.opposite(), Corner::Ne);
    }
}
