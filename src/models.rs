use image::{DynamicImage, GrayImage};
use imageproc::geometry::arc_length;
use imageproc::point::Point;

use crate::detection::matching::MatchResult;

/// Names of the captured intermediate images
pub mod stages {
    pub const SOURCE: &str = "Source";
    pub const BLURRED: &str = "Blurred";
    pub const EQUALIZED: &str = "Equalized";
    pub const EDGES: &str = "Edges";
    pub const CONTOURS: &str = "Contours";
    pub const RECTANGLE_CONTOURS: &str = "Rectangle Contours";
    pub const OUTPUT: &str = "Output";

    pub const WARPED: &str = "Warped";
    pub const RANK: &str = "Rank";
    pub const RANK_THRESHOLD: &str = "Rank Threshold";
    pub const RANK_DILATED: &str = "Rank Dilated";
    pub const RANK_CONTOURS: &str = "Rank Contours";
    pub const RANK_BOUNDED: &str = "Rank Bounded";
    pub const SUIT: &str = "Suit";
    pub const SUIT_THRESHOLD: &str = "Suit Threshold";
    pub const SUIT_DILATED: &str = "Suit Dilated";
    pub const SUIT_ERODED: &str = "Suit Eroded";
    pub const SUIT_CONTOURS: &str = "Suit Contours";
    pub const SUIT_BOUNDED: &str = "Suit Bounded";
}

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Shoelace area of a closed polygon
pub(crate) fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let twice: i64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum();

    twice.abs() as f64 / 2.0
}

/// Traced boundary, immutable once produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed-curve perimeter
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&self.points, true)
    }

    /// Enclosed polygon area of the points (not the pixel count)
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Smallest box containing every point, inclusive of the end pixels
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(BoundingBox::new(
            min_x.max(0) as u32,
            min_y.max(0) as u32,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        ))
    }
}

/// Contour reduced to exactly four vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad {
    corners: [Point<i32>; 4],
}

impl Quad {
    pub fn new(corners: [Point<i32>; 4]) -> Self {
        Self { corners }
    }

    pub fn corners(&self) -> &[Point<i32>; 4] {
        &self.corners
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.corners)
    }

    /// Arithmetic mean of the four corners
    pub fn centroid(&self) -> Point<f32> {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x as f32, sy + p.y as f32));
        Point::new(sx / 4.0, sy / 4.0)
    }
}

/// Named intermediate images in capture order
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    images: Vec<(String, DynamicImage)>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an image, replacing any earlier one with the same name
    pub fn insert(&mut self, name: impl Into<String>, image: DynamicImage) {
        let name = name.into();
        match self.images.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = image,
            None => self.images.push((name, image)),
        }
    }

    pub fn insert_gray(&mut self, name: impl Into<String>, image: &GrayImage) {
        self.insert(name, DynamicImage::ImageLuma8(image.clone()));
    }

    pub fn get(&self, name: &str) -> Option<&DynamicImage> {
        self.images.iter().find(|(n, _)| n == name).map(|(_, img)| img)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynamicImage)> {
        self.images.iter().map(|(n, img)| (n.as_str(), img))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// One card found in a frame
#[derive(Debug, Clone)]
pub struct DetectedCard {
    /// 250x350 single-channel rectified card
    pub canonical: GrayImage,
    /// Centroid of the quad in source coordinates
    pub midpoint: Point<f32>,
    pub quad: Quad,
    pub rank: MatchResult,
    pub suit: MatchResult,
    pub diagnostics: Diagnostics,
}

impl DetectedCard {
    pub fn rank_guess(&self) -> &str {
        &self.rank.label
    }

    pub fn suit_guess(&self) -> &str {
        &self.suit.label
    }
}

/// Everything produced for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameResult {
    pub cards: Vec<DetectedCard>,
    pub diagnostics: Diagnostics,
}
