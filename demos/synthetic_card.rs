//! Renders a synthetic frame with one card-shaped rectangle, runs the
//! pipeline over it and prints what was found.
//!
//! Run with `cargo run --example synthetic_card`.

use std::sync::Arc;

use cardscan::{CardPipeline, PipelineConfig, TemplateEntry, TemplateSet};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("cardscan=debug").init();

    // A white card with a dark stroke in its top-left corner
    let mut frame = GrayImage::new(400, 400);
    draw_filled_rect_mut(&mut frame, Rect::at(100, 40).of_size(200, 280), Luma([255u8]));
    for dx in 0..3 {
        let x = 110.0 + dx as f32;
        draw_line_segment_mut(&mut frame, (x, 50.0), (x, 75.0), Luma([0u8]));
    }

    let bar = GrayImage::from_fn(30, 45, |x, _| {
        if (12..18).contains(&x) { Luma([0u8]) } else { Luma([255u8]) }
    });
    let blank = GrayImage::from_pixel(30, 45, Luma([255u8]));
    let templates = TemplateSet::new(
        vec![
            TemplateEntry::new("Ace", bar),
            TemplateEntry::new("Two", blank.clone()),
        ],
        vec![TemplateEntry::new("Spades", blank)],
    );

    let pipeline = CardPipeline::new(PipelineConfig::default(), Arc::new(templates))?;
    let result = pipeline.run(&DynamicImage::ImageLuma8(frame))?;

    println!("Cards found: {}", result.cards.len());
    for (i, card) in result.cards.iter().enumerate() {
        println!(
            "Card {} at ({:.0}, {:.0}): {} of {} (rank score {}, suit score {})",
            i + 1,
            card.midpoint.x,
            card.midpoint.y,
            card.rank_guess(),
            card.suit_guess(),
            card.rank.score,
            card.suit.score
        );
    }

    Ok(())
}
