use image::GrayImage;
use image::imageops::crop_imm;

use crate::detection::rectify::{CANONICAL_HEIGHT, CANONICAL_WIDTH};
use crate::error::{CardError, Result};
use crate::models::BoundingBox;

/// Rank glyph area in the canonical frame
pub const RANK_REGION: BoundingBox = BoundingBox::new(0, 0, 35, 55);

/// Suit glyph area, directly below the rank
pub const SUIT_REGION: BoundingBox = BoundingBox::new(0, 55, 35, 45);

/// Rank and suit crops of one canonical card
#[derive(Debug, Clone)]
pub struct CardRegions {
    pub rank: GrayImage,
    pub suit: GrayImage,
}

fn crop(img: &GrayImage, region: BoundingBox) -> GrayImage {
    crop_imm(img, region.x, region.y, region.width, region.height).to_image()
}

/// Cut the fixed rank and suit regions out of a canonical card image
pub fn extract_regions(canonical: &GrayImage) -> Result<CardRegions> {
    let (width, height) = canonical.dimensions();
    if (width, height) != (CANONICAL_WIDTH, CANONICAL_HEIGHT) {
        return Err(CardError::InvalidCanonicalSize { width, height });
    }

    Ok(CardRegions {
        rank: crop(canonical, RANK_REGION),
        suit: crop(canonical, SUIT_REGION),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_region_sizes_and_offsets() {
        let card = GrayImage::from_fn(CANONICAL_WIDTH, CANONICAL_HEIGHT, |_, y| Luma([y as u8]));
        let regions = extract_regions(&card).unwrap();

        assert_eq!(regions.rank.dimensions(), (35, 55));
        assert_eq!(regions.suit.dimensions(), (35, 45));
        assert_eq!(regions.rank.get_pixel(0, 0)[0], 0);
        assert_eq!(regions.suit.get_pixel(0, 0)[0], 55);
        assert_eq!(regions.suit.get_pixel(34, 44)[0], 99);
    }

    #[test]
    fn test_wrong_frame_size_rejected() {
        let card = GrayImage::new(100, 100);
        assert!(matches!(
            extract_regions(&card),
            Err(CardError::InvalidCanonicalSize {
                width: 100,
                height: 100
            })
        ));
    }
}
