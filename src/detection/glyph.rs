//! Glyph isolation inside a rank or suit region.
//!
//! The region is binarised with Otsu, inverted so the glyph is white, cleaned
//! with a cross-shaped dilation (plus an erosion for suits), and cropped to
//! the bounding box of the largest contour. The crop is inverted back so it
//! shares the templates' dark-on-light polarity.

use image::imageops::{crop_imm, invert};
use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::map::map_colors;
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

use crate::config::{ApproximationMode, ContourParameters, RetrievalMode};
use crate::detection::contours::find_contours;
use crate::detection::overlay::draw_contours;
use crate::models::{BoundingBox, Contour, Diagnostics, stages};

/// Which glyph a region holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    Rank,
    Suit,
}

impl GlyphKind {
    pub fn label(&self) -> &'static str {
        match self {
            GlyphKind::Rank => "rank",
            GlyphKind::Suit => "suit",
        }
    }

    fn stage_names(&self) -> StageNames {
        match self {
            GlyphKind::Rank => StageNames {
                region: stages::RANK,
                threshold: stages::RANK_THRESHOLD,
                dilated: stages::RANK_DILATED,
                eroded: None,
                contours: stages::RANK_CONTOURS,
                bounded: stages::RANK_BOUNDED,
            },
            GlyphKind::Suit => StageNames {
                region: stages::SUIT,
                threshold: stages::SUIT_THRESHOLD,
                dilated: stages::SUIT_DILATED,
                eroded: Some(stages::SUIT_ERODED),
                contours: stages::SUIT_CONTOURS,
                bounded: stages::SUIT_BOUNDED,
            },
        }
    }
}

struct StageNames {
    region: &'static str,
    threshold: &'static str,
    dilated: &'static str,
    eroded: Option<&'static str>,
    contours: &'static str,
    bounded: &'static str,
}

/// What stands in for the glyph when no contour encloses any area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFallback {
    /// Plain white image the size of the region
    BlankRegion,
    /// The whole cleaned mask, inverted back to template polarity
    WholeMask,
}

/// Cleanup applied to one kind of region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphProfile {
    pub kind: GlyphKind,
    /// Cross structuring element width
    pub kernel_width: u32,
    /// Cross structuring element height
    pub kernel_height: u32,
    /// Erode after dilating (a closing), for club and spade stems
    pub close: bool,
    pub fallback: EmptyFallback,
}

pub const RANK_PROFILE: GlyphProfile = GlyphProfile {
    kind: GlyphKind::Rank,
    kernel_width: 4,
    kernel_height: 4,
    close: false,
    fallback: EmptyFallback::BlankRegion,
};

pub const SUIT_PROFILE: GlyphProfile = GlyphProfile {
    kind: GlyphKind::Suit,
    kernel_width: 1,
    kernel_height: 1,
    close: true,
    fallback: EmptyFallback::WholeMask,
};

/// Result of isolating one glyph
#[derive(Debug, Clone)]
pub struct IsolatedGlyph {
    /// Glyph crop in template polarity, or the profile's fallback image
    pub image: GrayImage,
    /// Crop rectangle within the region; `None` when the fallback was used
    pub bounds: Option<BoundingBox>,
}

impl IsolatedGlyph {
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }
}

/// Cross-shaped structuring element anchored at (w/2, h/2)
pub fn cross_mask(width: u32, height: u32) -> Mask {
    let (ax, ay) = (width / 2, height / 2);
    let shape = GrayImage::from_fn(width, height, |x, y| {
        if x == ax || y == ay {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    Mask::from_image(&shape, ax as u8, ay as u8)
}

fn inverted(img: &GrayImage) -> GrayImage {
    let mut out = img.clone();
    invert(&mut out);
    out
}

/// Binary threshold: strictly above `level` becomes white
pub fn binarize(img: &GrayImage, level: u8) -> GrayImage {
    map_colors(img, |p| if p[0] > level { Luma([255u8]) } else { Luma([0u8]) })
}

/// Contour with the largest enclosed area; zero-area contours never qualify
pub fn largest_contour(contours: &[Contour]) -> Option<&Contour> {
    let mut best = None;
    let mut max_area = 0.0;
    for c in contours {
        let area = c.area();
        if area > max_area {
            max_area = area;
            best = Some(c);
        }
    }
    best
}

/// Isolate the glyph in a rank or suit region.
///
/// When `diagnostics` is given every intermediate image is recorded under the
/// stage names of the profile's kind.
pub fn isolate_glyph(
    region: &GrayImage,
    profile: &GlyphProfile,
    mut diagnostics: Option<&mut Diagnostics>,
) -> IsolatedGlyph {
    let names = profile.kind.stage_names();
    let mut capture = |name: &str, img: &GrayImage| {
        if let Some(diag) = diagnostics.as_deref_mut() {
            diag.insert_gray(name, img);
        }
    };

    capture(names.region, region);

    let level = otsu_level(region);
    let thresholded = binarize(region, level);
    capture(names.threshold, &thresholded);

    let mask = cross_mask(profile.kernel_width, profile.kernel_height);
    let dilated = grayscale_dilate(&inverted(&thresholded), &mask);
    capture(names.dilated, &inverted(&dilated));

    let cleaned = if profile.close {
        let eroded = grayscale_erode(&dilated, &mask);
        if let Some(name) = names.eroded {
            capture(name, &inverted(&eroded));
        }
        eroded
    } else {
        dilated
    };

    let contours = find_contours(
        &cleaned,
        &ContourParameters {
            retrieval: RetrievalMode::List,
            approximation: ApproximationMode::Simple,
        },
    );
    let bounds = largest_contour(&contours).and_then(Contour::bounding_box);

    if let Some(diag) = diagnostics.as_deref_mut() {
        diag.insert(names.contours, draw_contours(&inverted(&cleaned), &contours));
    }

    let image = match bounds {
        Some(bb) => inverted(&crop_imm(&cleaned, bb.x, bb.y, bb.width, bb.height).to_image()),
        None => match profile.fallback {
            EmptyFallback::BlankRegion => GrayImage::from_pixel(region.width(), region.height(), Luma([255u8])),
            EmptyFallback::WholeMask => inverted(&cleaned),
        },
    };

    if let Some(diag) = diagnostics.as_deref_mut() {
        diag.insert_gray(names.bounded, &image);
    }

    tracing::trace!(
        kind = profile.kind.label(),
        level,
        contours = contours.len(),
        ?bounds,
        "Glyph isolated"
    );

    IsolatedGlyph { image, bounds }
}
