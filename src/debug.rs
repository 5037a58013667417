//! Writing captured diagnostic images to disk.
//!
//! Presentation-side helper: the pipeline never calls this itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{Diagnostics, FrameResult};

/// Turn a stage name into a file stem, e.g. "Rank Threshold" -> "rank_threshold"
pub fn stage_file_stem(index: usize, stage: &str) -> String {
    format!("{:02}_{}", index, stage.to_lowercase().replace(' ', "_"))
}

/// Accept an empty or missing directory, creating it if needed
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        let entries = std::fs::read_dir(output_dir)
            .with_context(|| format!("Failed to read debug directory: {}", output_dir.display()))?;
        if entries.count() > 0 {
            return Err(anyhow::anyhow!(
                "Debug directory is not empty: {}",
                output_dir.display()
            ));
        }
    } else {
        std::fs::create_dir_all(output_dir)?;
    }
    Ok(())
}

fn save_all(diagnostics: &Diagnostics, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::new();
    for (idx, (stage, image)) in diagnostics.iter().enumerate() {
        // PNG cannot hold a zero-sized image
        if image.width() == 0 || image.height() == 0 {
            tracing::debug!(stage, "Skipping empty diagnostic image");
            continue;
        }
        let path = dir.join(format!("{}.png", stage_file_stem(idx, stage)));
        image
            .save(&path)
            .with_context(|| format!("Failed to save debug image: {}", path.display()))?;
        saved.push(path);
    }
    Ok(saved)
}

/// Save every frame and card diagnostic image under `output_dir`.
///
/// Frame images land in `output_dir/NN_<stage>.png`, card images in
/// `output_dir/card_NN/NN_<stage>.png`. Returns the written paths.
pub fn save_frame_diagnostics(result: &FrameResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
    prepare_output_dir(output_dir)?;

    let mut saved = save_all(&result.diagnostics, output_dir)?;

    for (idx, card) in result.cards.iter().enumerate() {
        if card.diagnostics.is_empty() {
            continue;
        }
        let card_dir = output_dir.join(format!("card_{:02}", idx + 1));
        std::fs::create_dir_all(&card_dir)?;
        saved.extend(save_all(&card.diagnostics, &card_dir)?);
    }

    tracing::info!(images = saved.len(), dir = %output_dir.display(), "Saved diagnostic images");
    Ok(saved)
}
