use std::sync::Arc;

use image::{DynamicImage, GrayImage};

use crate::config::PipelineConfig;
use crate::detection::glyph::{GlyphKind, RANK_PROFILE, SUIT_PROFILE, isolate_glyph};
use crate::detection::matching::TemplateMatcher;
use crate::detection::overlay;
use crate::detection::rectify::{CentroidOffsetOrdering, CornerOrdering, RectifiedCard, extract_cards};
use crate::detection::regions::extract_regions;
use crate::detection::{contours, preprocessing};
use crate::error::{CardError, Result};
use crate::models::{DetectedCard, Diagnostics, FrameResult, Quad, stages};
use crate::templates::TemplateSet;

/// Frame-level card detection and classification.
///
/// Holds only immutable state, so one pipeline can serve any number of frames
/// (and threads) without carrying anything between them.
#[derive(Clone)]
pub struct CardPipeline {
    config: PipelineConfig,
    templates: Arc<TemplateSet>,
    ordering: Arc<dyn CornerOrdering>,
}

impl CardPipeline {
    /// Validate the configuration and build a pipeline around a shared template set
    pub fn new(config: PipelineConfig, templates: Arc<TemplateSet>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            templates,
            ordering: Arc::new(CentroidOffsetOrdering),
        })
    }

    /// Swap the corner role assignment used before warping
    pub fn with_corner_ordering(mut self, ordering: Arc<dyn CornerOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Stop after rectification: canonical card images without classification
    pub fn extract(&self, input: &DynamicImage) -> Result<Vec<RectifiedCard>> {
        let gray = grayscale_input(input)?;
        let pre = preprocessing::preprocess(&gray, &self.config.gaussian, &self.config.canny);
        let raw = contours::find_contours(&pre.edges, &self.config.contours);
        Ok(extract_cards(&gray, &raw, self.ordering.as_ref()))
    }

    /// Run every stage over one frame
    pub fn run(&self, input: &DynamicImage) -> Result<FrameResult> {
        let gray = grayscale_input(input)?;
        let capture = self.config.capture_diagnostics;

        tracing::debug!(width = gray.width(), height = gray.height(), "Preprocessing frame");
        let pre = preprocessing::preprocess(&gray, &self.config.gaussian, &self.config.canny);

        let raw = contours::find_contours(&pre.edges, &self.config.contours);
        tracing::debug!(contours = raw.len(), "Found contours");

        let rectified = extract_cards(&gray, &raw, self.ordering.as_ref());
        tracing::debug!(
            cards = rectified.len(),
            ordering = self.ordering.name(),
            "Rectified card candidates"
        );

        let cards = self.classify_all(rectified)?;

        let mut diagnostics = Diagnostics::new();
        if capture {
            let color = input.to_rgb8();
            let quads: Vec<Quad> = cards.iter().map(|c| c.quad).collect();
            let midpoints: Vec<_> = cards.iter().map(|c| c.midpoint).collect();

            diagnostics.insert_gray(stages::SOURCE, &gray);
            diagnostics.insert_gray(stages::BLURRED, &pre.blurred);
            diagnostics.insert_gray(stages::EQUALIZED, &pre.equalized);
            diagnostics.insert_gray(stages::EDGES, &pre.edges);
            diagnostics.insert(stages::CONTOURS, overlay::contour_overlay(&color, &raw));
            diagnostics.insert(
                stages::RECTANGLE_CONTOURS,
                DynamicImage::ImageRgb8(overlay::quad_overlay(&color, &quads)),
            );
            diagnostics.insert(stages::OUTPUT, overlay::output_overlay(&color, &quads, &midpoints));
        }

        for (i, card) in cards.iter().enumerate() {
            tracing::debug!(
                card = i,
                x = card.midpoint.x,
                y = card.midpoint.y,
                rank = %card.rank.label,
                suit = %card.suit.label,
                "Card classified"
            );
        }

        Ok(FrameResult { cards, diagnostics })
    }

    #[cfg(not(feature = "parallel"))]
    fn classify_all(&self, rectified: Vec<RectifiedCard>) -> Result<Vec<DetectedCard>> {
        rectified.into_iter().map(|card| self.classify(card)).collect()
    }

    /// Cards are independent; the indexed collect keeps rectifier order
    #[cfg(feature = "parallel")]
    fn classify_all(&self, rectified: Vec<RectifiedCard>) -> Result<Vec<DetectedCard>> {
        use rayon::prelude::*;

        rectified
            .into_par_iter()
            .map(|card| self.classify(card))
            .collect()
    }

    /// Region extraction, glyph isolation and matching for one card
    pub fn classify(&self, card: RectifiedCard) -> Result<DetectedCard> {
        let mut diagnostics = Diagnostics::new();
        let capture = self.config.capture_diagnostics;

        if capture {
            diagnostics.insert(stages::WARPED, overlay::annotate_regions(&card.canonical));
        }

        let regions = extract_regions(&card.canonical)?;

        let rank_glyph = isolate_glyph(&regions.rank, &RANK_PROFILE, capture.then_some(&mut diagnostics));
        let rank = TemplateMatcher::new(GlyphKind::Rank, self.templates.ranks()).classify(&rank_glyph.image)?;

        let suit_glyph = isolate_glyph(&regions.suit, &SUIT_PROFILE, capture.then_some(&mut diagnostics));
        let suit = TemplateMatcher::new(GlyphKind::Suit, self.templates.suits()).classify(&suit_glyph.image)?;

        Ok(DetectedCard {
            canonical: card.canonical,
            midpoint: card.midpoint,
            quad: card.quad,
            rank,
            suit,
            diagnostics,
        })
    }
}

fn grayscale_input(input: &DynamicImage) -> Result<GrayImage> {
    let (width, height) = (input.width(), input.height());
    if width == 0 || height == 0 {
        return Err(CardError::EmptyImage { width, height });
    }
    Ok(preprocessing::to_grayscale(input))
}
