use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::detection::regions::{RANK_REGION, SUIT_REGION};
use crate::models::{BoundingBox, Contour, Quad};

pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Closed polyline, `thickness` pixels wide
pub fn draw_polygon_outline(canvas: &mut RgbImage, points: &[Point<i32>], color: Rgb<u8>, thickness: u32) {
    if points.is_empty() {
        return;
    }

    let half = (thickness as i32 - 1) / 2;
    let spread = thickness.max(1) as i32;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        for oy in -half..spread - half {
            for ox in -half..spread - half {
                draw_line_segment_mut(
                    canvas,
                    ((a.x + ox) as f32, (a.y + oy) as f32),
                    ((b.x + ox) as f32, (b.y + oy) as f32),
                    color,
                );
            }
        }
    }
}

fn to_rect(bb: BoundingBox) -> Rect {
    Rect::at(bb.x as i32, bb.y as i32).of_size(bb.width, bb.height)
}

/// Grayscale base with every contour drawn in blue
pub fn draw_contours(base: &GrayImage, contours: &[Contour]) -> DynamicImage {
    let mut canvas = DynamicImage::ImageLuma8(base.clone()).to_rgb8();
    for c in contours {
        draw_polygon_outline(&mut canvas, c.points(), BLUE, 1);
    }
    DynamicImage::ImageRgb8(canvas)
}

/// Every raw contour over the colour source
pub fn contour_overlay(source: &RgbImage, contours: &[Contour]) -> DynamicImage {
    let mut canvas = source.clone();
    for c in contours {
        draw_polygon_outline(&mut canvas, c.points(), RED, 4);
    }
    DynamicImage::ImageRgb8(canvas)
}

/// Accepted quads over the colour source
pub fn quad_overlay(source: &RgbImage, quads: &[Quad]) -> RgbImage {
    let mut canvas = source.clone();
    for q in quads {
        draw_polygon_outline(&mut canvas, q.corners(), RED, 2);
    }
    canvas
}

/// Accepted quads plus a marker at each card midpoint
pub fn output_overlay(source: &RgbImage, quads: &[Quad], midpoints: &[Point<f32>]) -> DynamicImage {
    let mut canvas = quad_overlay(source, quads);
    for mid in midpoints {
        let (x, y) = (mid.x.round() as i32, mid.y.round() as i32);
        for d in -1..=1 {
            draw_cross_mut(&mut canvas, BLUE, x + d, y);
            draw_cross_mut(&mut canvas, BLUE, x, y + d);
        }
    }
    DynamicImage::ImageRgb8(canvas)
}

/// Canonical card with the rank region boxed in blue and the suit region in green
pub fn annotate_regions(canonical: &GrayImage) -> DynamicImage {
    let mut canvas = DynamicImage::ImageLuma8(canonical.clone()).to_rgb8();
    draw_hollow_rect_mut(&mut canvas, to_rect(RANK_REGION), BLUE);
    draw_hollow_rect_mut(&mut canvas, to_rect(SUIT_REGION), GREEN);
    DynamicImage::ImageRgb8(canvas)
}
