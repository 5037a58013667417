use image::GrayImage;
use imageproc::contours::{find_contours as trace_contours, BorderType};
use imageproc::point::Point;

use crate::config::{ApproximationMode, ContourParameters, RetrievalMode};
use crate::models::Contour;

/// Find contours in a binary image (any non-zero pixel is foreground).
///
/// Output keeps the tracer's discovery order.
pub fn find_contours(binary: &GrayImage, params: &ContourParameters) -> Vec<Contour> {
    trace_contours::<i32>(binary)
        .into_iter()
        .filter(|c| match params.retrieval {
            RetrievalMode::External => c.border_type == BorderType::Outer && c.parent.is_none(),
            RetrievalMode::List => true,
        })
        .map(|c| match params.approximation {
            ApproximationMode::None => Contour::new(c.points),
            ApproximationMode::Simple => Contour::new(compress_chain(&c.points)),
        })
        .collect()
}

fn step(from: Point<i32>, to: Point<i32>) -> (i32, i32) {
    ((to.x - from.x).signum(), (to.y - from.y).signum())
}

/// Drop every point lying inside a straight horizontal, vertical or diagonal run
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        points.to_vec()
    } else {
        kept
    }
}
