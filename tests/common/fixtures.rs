use std::path::Path;
use std::sync::Arc;

use cardscan::templates::{RANK_NAMES, SUIT_NAMES};
use cardscan::{CardPipeline, PipelineConfig, TemplateEntry, TemplateSet};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

/// Creates a black frame with one filled white axis-aligned rectangle
pub fn card_scene(
    frame: (u32, u32),
    origin: (i32, i32),
    size: (u32, u32),
) -> DynamicImage {
    let mut img = GrayImage::new(frame.0, frame.1);
    draw_filled_rect_mut(
        &mut img,
        Rect::at(origin.0, origin.1).of_size(size.0, size.1),
        Luma([255u8]),
    );
    DynamicImage::ImageLuma8(img)
}

/// Creates the reference scene: a 100x100 white square (area 10000) on a 300x300 black frame
pub fn single_card_scene() -> DynamicImage {
    card_scene((300, 300), (100, 100), (100, 100))
}

/// Creates two well-separated white rectangles, left one first in raster order
pub fn two_card_scene() -> DynamicImage {
    let mut img = GrayImage::new(500, 300);
    draw_filled_rect_mut(&mut img, Rect::at(40, 60).of_size(120, 160), Luma([255u8]));
    draw_filled_rect_mut(&mut img, Rect::at(300, 80).of_size(120, 160), Luma([255u8]));
    DynamicImage::ImageLuma8(img)
}

/// Creates a frame of scattered specks and one large disc, none card-shaped
pub fn clutter_scene() -> DynamicImage {
    let mut img = GrayImage::new(320, 240);
    for y in (10..100).step_by(18) {
        for x in (10..300).step_by(18) {
            draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(3, 3), Luma([255u8]));
        }
    }
    draw_filled_circle_mut(&mut img, (160, 170), 55, Luma([255u8]));
    DynamicImage::ImageLuma8(img)
}

/// Creates a set with a single all-white rank ("Two") and suit ("Hearts")
pub fn white_template_set() -> TemplateSet {
    TemplateSet::new(
        vec![TemplateEntry::new("Two", GrayImage::from_pixel(30, 45, Luma([255u8])))],
        vec![TemplateEntry::new("Hearts", GrayImage::from_pixel(35, 45, Luma([255u8])))],
    )
}

/// Creates a pipeline around `templates` with default tuning
pub fn make_pipeline(templates: TemplateSet, capture_diagnostics: bool) -> CardPipeline {
    let config = PipelineConfig {
        capture_diagnostics,
        ..Default::default()
    };
    CardPipeline::new(config, Arc::new(templates)).expect("default config is valid")
}

/// Writes a full 13 rank + 4 suit template directory, each file a flat gray image
pub fn write_template_dir(dir: &Path, extension: &str) {
    for name in RANK_NAMES.iter().chain(SUIT_NAMES.iter()) {
        let img = GrayImage::from_pixel(70, 100, Luma([180u8]));
        img.save(dir.join(format!("{}.{}", name, extension)))
            .expect("Failed to save template image");
    }
}

/// Creates a 200x280 white card on a 400x400 black frame with a dark bar in
/// the rank corner and a smaller dark block in the suit corner
pub fn marked_card_scene() -> DynamicImage {
    let mut img = GrayImage::new(400, 400);
    draw_filled_rect_mut(&mut img, Rect::at(100, 40).of_size(200, 280), Luma([255u8]));
    draw_filled_rect_mut(&mut img, Rect::at(106, 48).of_size(16, 32), Luma([0u8]));
    draw_filled_rect_mut(&mut img, Rect::at(108, 92).of_size(12, 18), Luma([0u8]));
    DynamicImage::ImageLuma8(img)
}

/// Creates rank and suit sets whose entries differ in how much of the glyph is dark.
///
/// The solid-dark entries ("Ace", "Spades") are listed last so a wrong
/// first-entry answer cannot pass for them.
pub fn shaped_template_set() -> TemplateSet {
    let white = |w, h| GrayImage::from_pixel(w, h, Luma([255u8]));
    let black = |w, h| GrayImage::from_pixel(w, h, Luma([0u8]));
    let left_half = GrayImage::from_fn(30, 45, |x, _| if x < 15 { Luma([0u8]) } else { Luma([255u8]) });
    let top_half = GrayImage::from_fn(35, 45, |_, y| if y < 22 { Luma([0u8]) } else { Luma([255u8]) });

    TemplateSet::new(
        vec![
            TemplateEntry::new("Two", white(30, 45)),
            TemplateEntry::new("Seven", left_half),
            TemplateEntry::new("Ace", black(30, 45)),
        ],
        vec![
            TemplateEntry::new("Hearts", white(35, 45)),
            TemplateEntry::new("Clubs", top_half),
            TemplateEntry::new("Spades", black(35, 45)),
        ],
    )
}
