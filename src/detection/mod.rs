//! Per-stage image operations of the card pipeline, in dependency order.

pub mod preprocessing;
pub mod contours;
pub mod rectify;
pub mod regions;
pub mod glyph;
pub mod matching;
pub mod overlay;

pub use glyph::{EmptyFallback, GlyphKind, GlyphProfile, IsolatedGlyph, RANK_PROFILE, SUIT_PROFILE};
pub use matching::{MatchResult, TemplateMatcher};
pub use rectify::{CentroidOffsetOrdering, CornerOrdering, RectifiedCard};
pub use regions::CardRegions;
