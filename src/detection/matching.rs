use image::GrayImage;

use crate::detection::glyph::GlyphKind;
use crate::detection::preprocessing::resize_bilinear;
use crate::error::{CardError, Result};
use crate::templates::TemplateEntry;

/// Best template for a glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub label: String,
    /// Summed absolute difference divided by 255; lower is better
    pub score: u64,
}

/// Difference score between a glyph and one template.
///
/// The template is resized to the glyph, never the other way round. An empty
/// glyph scores 0 against everything.
pub fn difference_score(glyph: &GrayImage, template: &GrayImage) -> u64 {
    let (w, h) = glyph.dimensions();
    if w == 0 || h == 0 {
        return 0;
    }

    let resized;
    let template = if template.dimensions() == (w, h) {
        template
    } else {
        resized = resize_bilinear(template, w, h);
        &resized
    };

    let sum: u64 = glyph
        .pixels()
        .zip(template.pixels())
        .map(|(a, b)| a[0].abs_diff(b[0]) as u64)
        .sum();

    sum / 255
}

/// Nearest-template classifier over one class of templates
pub struct TemplateMatcher<'a> {
    kind: GlyphKind,
    templates: &'a [TemplateEntry],
}

impl<'a> TemplateMatcher<'a> {
    pub fn new(kind: GlyphKind, templates: &'a [TemplateEntry]) -> Self {
        Self { kind, templates }
    }

    /// Lowest-scoring template label.
    ///
    /// Ties go to the template listed first. Always answers when at least one
    /// template exists, however poor the glyph.
    pub fn classify(&self, glyph: &GrayImage) -> Result<MatchResult> {
        let mut best: Option<MatchResult> = None;

        for entry in self.templates {
            let score = difference_score(glyph, &entry.image);
            tracing::trace!(kind = self.kind.label(), label = %entry.label, score, "Template scored");

            if best.as_ref().is_none_or(|b| score < b.score) {
                best = Some(MatchResult {
                    label: entry.label.clone(),
                    score,
                });
            }
        }

        best.ok_or(CardError::EmptyTemplateSet(self.kind.label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn entry(label: &str, img: GrayImage) -> TemplateEntry {
        TemplateEntry {
            label: label.to_string(),
            image: img,
        }
    }

    #[test]
    fn test_score_is_sum_over_255() {
        let glyph = GrayImage::from_pixel(10, 10, Luma([255u8]));
        let template = GrayImage::from_pixel(10, 10, Luma([0u8]));
        assert_eq!(difference_score(&glyph, &template), 100);
        assert_eq!(difference_score(&glyph, &glyph), 0);
    }

    #[test]
    fn test_score_truncates() {
        let glyph = GrayImage::from_pixel(2, 1, Luma([200u8]));
        let template = GrayImage::from_pixel(2, 1, Luma([0u8]));
        // 400 / 255 = 1.56
        assert_eq!(difference_score(&glyph, &template), 1);
    }

    #[test]
    fn test_template_resized_to_glyph() {
        let glyph = GrayImage::from_pixel(7, 11, Luma([0u8]));
        let template = GrayImage::from_pixel(30, 45, Luma([255u8]));
        assert_eq!(difference_score(&glyph, &template), 77);
    }

    #[test]
    fn test_empty_glyph_scores_zero() {
        let glyph = GrayImage::new(0, 0);
        let template = GrayImage::from_pixel(30, 45, Luma([255u8]));
        assert_eq!(difference_score(&glyph, &template), 0);
    }

    #[test]
    fn test_picks_lowest_score() {
        let glyph = GrayImage::from_pixel(10, 10, Luma([0u8]));
        let templates = vec![
            entry("White", GrayImage::from_pixel(10, 10, Luma([255u8]))),
            entry("Black", GrayImage::from_pixel(10, 10, Luma([0u8]))),
            entry("Gray", GrayImage::from_pixel(10, 10, Luma([128u8]))),
        ];

        let result = TemplateMatcher::new(GlyphKind::Rank, &templates)
            .classify(&glyph)
            .unwrap();
        assert_eq!(result.label, "Black");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let glyph = GrayImage::from_pixel(4, 4, Luma([128u8]));
        let templates = vec![
            entry("Hearts", GrayImage::from_pixel(4, 4, Luma([0u8]))),
            entry("Clubs", GrayImage::from_pixel(4, 4, Luma([0u8]))),
        ];

        let matcher = TemplateMatcher::new(GlyphKind::Suit, &templates);
        let first = matcher.classify(&glyph).unwrap();
        assert_eq!(first.label, "Hearts");

        // Deterministic across calls
        assert_eq!(matcher.classify(&glyph).unwrap(), first);
    }

    #[test]
    fn test_empty_template_set_fails() {
        let glyph = GrayImage::from_pixel(4, 4, Luma([0u8]));
        let result = TemplateMatcher::new(GlyphKind::Suit, &[]).classify(&glyph);
        assert!(matches!(result, Err(CardError::EmptyTemplateSet("suit"))));
    }
}
