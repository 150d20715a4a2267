//! Headless walkthrough of the engine: a batch of animated sprites and an
//! optional label, stepped at a fixed frame delta.
//!
//! Usage: `tessel-demo [path/to/font.ttf]`

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use tessel_engine::coords::{ColorRgba, Vec2};
use tessel_engine::logging::{init_logging, LoggingConfig};
use tessel_engine::render::SpriteVertex;
use tessel_engine::sprite::{Quad, SpriteBatch, TextureAtlas};
use tessel_engine::text::{AtlasConfig, FontdueAtlas, Label, TextAlignment};
use tessel_engine::time::Ticker;
use tessel_engine::transition::Ease;

const FRAMES: u32 = 120;
const FRAME_MS: u32 = 16;
const CHARSET: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut atlas = TextureAtlas::new(256, 256);
    let ship = atlas.add_region(0, 0, 32, 32)?;
    let rock = atlas.add_region(32, 0, 16, 16)?;

    let mut batch = SpriteBatch::with_capacity(8);
    let rebinds = Rc::new(Cell::new(0u32));
    {
        let rebinds = Rc::clone(&rebinds);
        batch.on_rebind(move |_| rebinds.set(rebinds.get() + 1));
    }

    let mut ids = Vec::new();
    for i in 0..6u32 {
        let mut quad = Quad::new(32, 32);
        quad.set_pivot(0.5, 0.5);
        quad.set_position_xy(i as f32 * 40.0, 0.0);
        quad.set_texture(&atlas, if i % 2 == 0 { ship } else { rock })?;
        quad.set_color_all(ColorRgba::from_rgba_u32(0x40_80_ff_ff));
        ids.push(batch.add(quad));
    }

    for (i, &id) in ids.iter().enumerate() {
        let Some(mut sprite) = batch.sprite_mut(id) else { continue };
        let ease = Ease::ALL[i % Ease::ALL.len()];
        sprite.move_to(Vec2::new(i as f32 * 40.0, 200.0), 1000, Ease::Linear, ease);
        sprite.rotate_to(std::f32::consts::PI, 1500, Ease::InOutCubic);
    }

    // Flip the first sprite every quarter second.
    let flips = Rc::new(Cell::new(0u32));
    let mut flipper = {
        let flips = Rc::clone(&flips);
        Ticker::new(250, move || flips.set(flips.get() + 1))
    };

    let mut label = match std::env::args().nth(1) {
        Some(path) => {
            let bytes = std::fs::read(&path).with_context(|| format!("reading font {path}"))?;
            let font = FontdueAtlas::load(&bytes, CHARSET, AtlasConfig::default())
                .with_context(|| format!("loading font {path}"))?;
            log::info!("font atlas: {} glyphs from {path}", font.len());

            let mut label = Label::new(Rc::new(font));
            label.set_text("tessel\nengine");
            label.set_alignment(TextAlignment::Center);
            label.set_position(Vec2::new(120.0, 300.0));
            Some(label)
        }
        None => {
            log::info!("no font given; skipping label");
            None
        }
    };

    let mut sprite_sink: Vec<SpriteVertex> = Vec::new();
    let mut text_sink: Vec<SpriteVertex> = Vec::new();
    let started = Instant::now();

    for frame in 0..FRAMES {
        let fired = flipper.update(FRAME_MS);
        if let Some(mut first) = batch.sprite_mut(ids[0]) {
            for _ in 0..fired {
                first.mirror();
            }
        }

        batch.update(FRAME_MS);
        batch.upload(&mut sprite_sink);

        if let Some(label) = label.as_mut() {
            if frame % 30 == 0 {
                label.set_rotation(frame as f32 * 0.01);
            }
            if label.update() {
                label.upload(&mut text_sink);
            }
        }
    }

    if let Some(id) = ids.pop() {
        batch.remove(id);
    }

    let elapsed = started.elapsed();
    let still_animating = ids
        .iter()
        .filter_map(|&id| batch.get(id))
        .filter(|q| q.is_animating())
        .count();

    log::info!(
        "{FRAMES} frames in {:.2} ms: {} sprites, {} sprite vertices, {} label vertices",
        elapsed.as_secs_f64() * 1000.0,
        batch.len(),
        sprite_sink.len(),
        text_sink.len(),
    );
    log::info!(
        "ticker fired {} times, {} rebinds, {still_animating} sprites still animating",
        flips.get(),
        rebinds.get(),
    );

    Ok(())
}
