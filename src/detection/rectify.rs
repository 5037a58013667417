//! Quadrilateral filtering and perspective rectification.
//!
//! Each raw contour is simplified with Douglas-Peucker at 1% of its perimeter.
//! Only four-vertex results enclosing at least [`MIN_QUAD_AREA`] survive, and
//! those are warped into the 250x350 canonical card frame.

use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

use crate::models::{Contour, Quad};

pub const CANONICAL_WIDTH: u32 = 250;
pub const CANONICAL_HEIGHT: u32 = 350;

/// Quads enclosing less than this are noise; exactly this much passes
pub const MIN_QUAD_AREA: f64 = 5000.0;

/// Douglas-Peucker tolerance as a fraction of the contour perimeter
pub const APPROX_EPSILON_RATIO: f64 = 0.01;

/// Canonical destination corners in slot order: top-left, bottom-left,
/// bottom-right, top-right
pub const CANONICAL_CORNERS: [(f32, f32); 4] = [
    (0.0, 0.0),
    (0.0, (CANONICAL_HEIGHT - 1) as f32),
    ((CANONICAL_WIDTH - 1) as f32, (CANONICAL_HEIGHT - 1) as f32),
    ((CANONICAL_WIDTH - 1) as f32, 0.0),
];

/// Assigns the four quad corners to the canonical destination slots.
///
/// Slot order follows [`CANONICAL_CORNERS`].
pub trait CornerOrdering: Send + Sync {
    fn order(&self, quad: &Quad) -> [(f32, f32); 4];

    /// Human-readable name (used in log output)
    fn name(&self) -> &str;
}

/// Assigns roles from the sign of `centroid - corner`.
///
/// Assumes a roughly axis-aligned card. Near 45 degrees two corners can land
/// in the same slot; the later one wins and the empty slot stays at (0, 0).
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidOffsetOrdering;

impl CornerOrdering for CentroidOffsetOrdering {
    fn order(&self, quad: &Quad) -> [(f32, f32); 4] {
        let mid = quad.centroid();
        let mut src = [(0.0f32, 0.0f32); 4];

        for p in quad.corners() {
            let (px, py) = (p.x as f32, p.y as f32);
            let dx = mid.x - px;
            let dy = mid.y - py;

            let slot = if dx > 0.0 && dy > 0.0 {
                0 // top left
            } else if dx < 0.0 && dy > 0.0 {
                3 // top right
            } else if dx > 0.0 && dy < 0.0 {
                1 // bottom left
            } else {
                2 // bottom right
            };
            src[slot] = (px, py);
        }

        src
    }

    fn name(&self) -> &str {
        "Centroid Offset"
    }
}

/// A card outline warped into the canonical frame, not yet classified
#[derive(Debug, Clone)]
pub struct RectifiedCard {
    pub canonical: GrayImage,
    pub midpoint: Point<f32>,
    pub quad: Quad,
}

fn distance_sq(a: Point<i32>, b: Point<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

fn farthest_from(points: &[Point<i32>], origin: Point<i32>) -> usize {
    let mut best = 0;
    let mut best_d = -1;
    for (i, p) in points.iter().enumerate() {
        let d = distance_sq(*p, origin);
        if d > best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// Douglas-Peucker over a closed curve.
///
/// The curve is cut at two mutually distant vertices and each half is
/// simplified as an open polyline, so the result never repeats its first vertex.
pub fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let a = farthest_from(points, points[0]);
    let b = farthest_from(points, points[a]);
    if distance_sq(points[a], points[b]) == 0 {
        return vec![points[0]];
    }

    let (start, end) = if a < b { (a, b) } else { (b, a) };
    let first_half = &points[start..=end];
    let second_half: Vec<Point<i32>> = points[end..]
        .iter()
        .chain(points[..=start].iter())
        .copied()
        .collect();

    let mut polygon = approximate_polygon_dp(first_half, epsilon, false);
    polygon.pop();
    let mut rest = approximate_polygon_dp(&second_half, epsilon, false);
    rest.pop();
    polygon.append(&mut rest);
    polygon
}

/// Apply both quad gates: four vertices and at least [`MIN_QUAD_AREA`]
pub fn approximate_quad(contour: &Contour) -> Option<Quad> {
    let perimeter = contour.perimeter();
    if contour.len() < 4 || perimeter <= 0.0 {
        return None;
    }

    let approx = approximate_closed_polygon(contour.points(), APPROX_EPSILON_RATIO * perimeter);
    let corners: [Point<i32>; 4] = approx.try_into().ok()?;
    let quad = Quad::new(corners);

    if quad.area() < MIN_QUAD_AREA {
        return None;
    }
    Some(quad)
}

/// Warp the quad region of `gray` into a fresh canonical image.
///
/// Returns `None` when the ordered corners admit no projective transform.
pub fn rectify(gray: &GrayImage, quad: Quad, ordering: &dyn CornerOrdering) -> Option<RectifiedCard> {
    let src = ordering.order(&quad);
    let projection = match Projection::from_control_points(src, CANONICAL_CORNERS) {
        Some(p) => p,
        None => {
            tracing::warn!(
                ordering = ordering.name(),
                ?src,
                "Failed to compute projective transform; skipping quad"
            );
            return None;
        }
    };

    let mut canonical = GrayImage::new(CANONICAL_WIDTH, CANONICAL_HEIGHT);
    warp_into(gray, &projection, Interpolation::Bilinear, Luma([0u8]), &mut canonical);

    Some(RectifiedCard {
        canonical,
        midpoint: quad.centroid(),
        quad,
    })
}

/// Run both gates and the warp over every raw contour, in contour order
pub fn extract_cards(
    gray: &GrayImage,
    contours: &[Contour],
    ordering: &dyn CornerOrdering,
) -> Vec<RectifiedCard> {
    contours
        .iter()
        .filter_map(approximate_quad)
        .filter_map(|quad| rectify(gray, quad, ordering))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_contour(x0: i32, y0: i32, x1: i32, y1: i32) -> Contour {
        let mut pts = Vec::new();
        for x in x0..x1 {
            pts.push(Point::new(x, y0));
        }
        for y in y0..y1 {
            pts.push(Point::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            pts.push(Point::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            pts.push(Point::new(x0, y));
        }
        Contour::new(pts)
    }

    #[test]
    fn test_closed_polygon_of_rectangle() {
        let contour = rect_contour(0, 0, 100, 60);
        let approx = approximate_closed_polygon(contour.points(), 3.2);
        assert_eq!(approx.len(), 4);
        for corner in [
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 60),
            Point::new(0, 60),
        ] {
            assert!(approx.contains(&corner));
        }
    }

    #[test]
    fn test_small_quad_rejected() {
        // 60 x 60 = 3600 < 5000
        assert!(approximate_quad(&rect_contour(0, 0, 60, 60)).is_none());
        assert!(approximate_quad(&rect_contour(0, 0, 100, 100)).is_some());
    }

    #[test]
    fn test_area_threshold_is_inclusive() {
        // 100 x 50 = 5000 exactly passes
        let quad = approximate_quad(&rect_contour(0, 0, 100, 50));
        assert_eq!(quad.map(|q| q.area()), Some(5000.0));

        // 99 x 50 = 4950 is rejected
        assert!(approximate_quad(&rect_contour(0, 0, 99, 50)).is_none());
    }

    #[test]
    fn test_triangle_rejected() {
        let mut pts = Vec::new();
        for i in 0..200 {
            pts.push(Point::new(i, 0));
        }
        for i in 0..200 {
            pts.push(Point::new(200 - i, i));
        }
        for i in 0..200 {
            pts.push(Point::new(0, 200 - i));
        }
        assert!(approximate_quad(&Contour::new(pts)).is_none());
    }

    #[test]
    fn test_centroid_ordering_axis_aligned() {
        let quad = Quad::new([
            Point::new(110, 10),
            Point::new(10, 10),
            Point::new(10, 210),
            Point::new(110, 210),
        ]);
        let src = CentroidOffsetOrdering.order(&quad);
        assert_eq!(src, [(10.0, 10.0), (10.0, 210.0), (110.0, 210.0), (110.0, 10.0)]);
    }

    #[test]
    fn test_centroid_ordering_diamond_is_ambiguous() {
        // A card rotated 45 degrees: corners sit on the centroid axes, so the
        // zero offsets all fall through to bottom-right
        let quad = Quad::new([
            Point::new(100, 0),
            Point::new(200, 100),
            Point::new(100, 200),
            Point::new(0, 100),
        ]);
        let src = CentroidOffsetOrdering.order(&quad);
        assert_eq!(src[0], (0.0, 0.0));
        assert_eq!(src[1], (0.0, 0.0));
        assert_eq!(src[3], (0.0, 0.0));
        assert_eq!(src[2], (0.0, 100.0));
    }

    #[test]
    fn test_identity_rectification() {
        let gray = GrayImage::from_fn(300, 400, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]));
        let quad = Quad::new([
            Point::new(0, 0),
            Point::new(0, 349),
            Point::new(249, 349),
            Point::new(249, 0),
        ]);

        let card = rectify(&gray, quad, &CentroidOffsetOrdering).expect("identity transform");
        assert_eq!(card.canonical.dimensions(), (CANONICAL_WIDTH, CANONICAL_HEIGHT));
        assert_eq!(card.midpoint, Point::new(124.5, 174.5));

        // Skip the outermost ring where bilinear sampling may fall off the edge
        for (x, y, p) in card.canonical.enumerate_pixels() {
            if x == 0 || y == 0 || x == CANONICAL_WIDTH - 1 || y == CANONICAL_HEIGHT - 1 {
                continue;
            }
            let expected = gray.get_pixel(x, y)[0] as i32;
            assert!(
                (p[0] as i32 - expected).abs() <= 1,
                "pixel ({x}, {y}) = {} expected {expected}",
                p[0]
            );
        }
    }
}
