//! Reference glyph templates.
//!
//! A [`TemplateSet`] is built once, then shared read-only (usually behind an
//! `Arc`) by every frame. Entry order is the classification tie-break order.

use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::detection::preprocessing::resize_bilinear;
use crate::error::{CardError, Result};

pub const RANK_NAMES: [&str; 13] = [
    "Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Jack",
    "Queen", "King",
];

pub const SUIT_NAMES: [&str; 4] = ["Hearts", "Clubs", "Spades", "Diamonds"];

/// Rank template size applied at load time
pub const DEFAULT_RANK_SIZE: (u32, u32) = (30, 45);

/// One labelled reference glyph
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub label: String,
    pub image: GrayImage,
}

impl TemplateEntry {
    pub fn new(label: impl Into<String>, image: GrayImage) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }
}

/// Anything that can hand out a named single-channel template image
pub trait TemplateSource {
    fn load(&self, name: &str) -> Result<GrayImage>;
}

/// Reads `<folder>/<name>.<extension>` as grayscale
#[derive(Debug, Clone)]
pub struct DirectorySource {
    folder: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(folder: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            extension: extension.into(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.folder.join(format!("{}.{}", name, self.extension))
    }
}

impl TemplateSource for DirectorySource {
    fn load(&self, name: &str) -> Result<GrayImage> {
        let path = self.path_for(name);
        let img = image::open(&path).map_err(|source| CardError::TemplateLoad {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        Ok(img.to_luma8())
    }
}

/// Rank and suit reference glyphs in declaration order
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    ranks: Vec<TemplateEntry>,
    suits: Vec<TemplateEntry>,
}

impl TemplateSet {
    /// Build from explicit entries, kept in the given order
    pub fn new(ranks: Vec<TemplateEntry>, suits: Vec<TemplateEntry>) -> Self {
        Self { ranks, suits }
    }

    /// Load all 13 ranks and 4 suits; any missing file fails the whole set.
    ///
    /// Ranks are resized to `rank_size`, suits keep their native size.
    pub fn load<S: TemplateSource>(source: &S, rank_size: (u32, u32)) -> Result<Self> {
        let (rank_w, rank_h) = rank_size;

        let ranks = RANK_NAMES
            .iter()
            .map(|name| {
                let img = load_non_empty(source, name)?;
                Ok(TemplateEntry::new(
                    *name,
                    resize_bilinear(&img, rank_w, rank_h),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let suits = SUIT_NAMES
            .iter()
            .map(|name| Ok(TemplateEntry::new(*name, load_non_empty(source, name)?)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(ranks = ranks.len(), suits = suits.len(), "Template set loaded");
        Ok(Self { ranks, suits })
    }

    /// Load from `<folder>/<Name>.<extension>` files
    pub fn from_dir<P: AsRef<Path>>(folder: P, extension: &str, rank_size: (u32, u32)) -> Result<Self> {
        Self::load(&DirectorySource::new(folder.as_ref(), extension), rank_size)
    }

    pub fn ranks(&self) -> &[TemplateEntry] {
        &self.ranks
    }

    pub fn suits(&self) -> &[TemplateEntry] {
        &self.suits
    }
}

fn load_non_empty<S: TemplateSource>(source: &S, name: &str) -> Result<GrayImage> {
    let img = source.load(name)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(CardError::EmptyTemplate(name.to_string()));
    }
    Ok(img)
}
