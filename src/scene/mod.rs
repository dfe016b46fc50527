//! Everything drawn around the scroller: parallax mountains, the wobbling
//! logo, glyph tiles and the software compositor that puts a frame together.

pub mod canvas;
pub mod font;
pub mod logo;
pub mod parallax;

use crate::scroll::{PositionedGlyph, ScrollEngine};
use canvas::Canvas;
use font::GlyphAtlas;
use logo::Logo;
use parallax::Parallax;

/// Low-res playfield the logo and scroller are drawn on.
pub const CANVAS_W: usize = 320;
pub const CANVAS_H: usize = 200;
/// Double-resolution stage holding the mountains and the scaled playfield.
pub const STAGE_W: usize = CANVAS_W * 2;
pub const STAGE_H: usize = CANVAS_H * 2;

pub struct Demo {
    engine: ScrollEngine,
    atlas: GlyphAtlas,
    parallax: Parallax,
    logo: Logo,
    raster: Vec<[u8; 3]>,
    stage: Canvas,
    paper: Canvas,
    scroll: Canvas,
    out: Vec<u8>,
    frames: u64,
}

impl Demo {
    pub fn new(engine: ScrollEngine) -> Self {
        let atlas = GlyphAtlas::classic();
        let logo = Logo::new(&atlas);
        Self {
            engine,
            atlas,
            parallax: Parallax::new(),
            logo,
            raster: raster_gradient(CANVAS_H),
            stage: Canvas::new(STAGE_W, STAGE_H),
            paper: Canvas::new(CANVAS_W, CANVAS_H),
            scroll: Canvas::new(CANVAS_W, CANVAS_H),
            out: Vec::new(),
            frames: 0,
        }
    }

    /// Advances every layer by one frame and rebuilds the scroller draw list.
    pub fn tick(&mut self) {
        self.parallax.tick();
        self.logo.tick();
        self.engine.build_frame();
        self.frames += 1;
    }

    /// Composites the current state and resamples it to `w`x`h` RGBA.
    pub fn render(&mut self, w: usize, h: usize) -> &[u8] {
        self.compose();
        self.stage.upscale_into(&mut self.out, w, h);
        &self.out
    }

    /// The full-resolution composite of the current state.
    pub fn compose(&mut self) -> &Canvas {
        self.stage.fill([0, 0, 0]);
        self.parallax.draw(&mut self.stage);

        self.paper.clear();
        self.logo.draw(&mut self.paper);

        self.scroll.clear();
        draw_glyphs(&mut self.scroll, &self.atlas, self.engine.frame());
        self.scroll.raster_atop(&self.raster);
        self.paper.blit(&self.scroll, 0, 0);

        self.stage.blit_scaled(
            &self.paper,
            STAGE_W as f32 * 0.5,
            STAGE_H as f32 * 0.5,
            2.0,
            2.0,
        );
        &self.stage
    }

    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ScrollEngine {
        &mut self.engine
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    pub fn logo(&self) -> &Logo {
        &self.logo
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Paints a back-to-front draw list. Glyphs at or behind the focal plane
/// are skipped.
pub fn draw_glyphs(canvas: &mut Canvas, atlas: &GlyphAtlas, glyphs: &[PositionedGlyph]) {
    for g in glyphs.iter().filter(|g| g.is_renderable()) {
        canvas.blit_tile(
            atlas.tile(g.glyph),
            g.screen_x,
            g.screen_y,
            g.depth_scale,
            [255, 255, 255],
        );
    }
}

/// Copper-style colour bands used to tint the scroller.
pub fn raster_gradient(rows: usize) -> Vec<[u8; 3]> {
    (0..rows)
        .map(|y| {
            let t = y as f32 / rows.max(1) as f32 * std::f32::consts::TAU * 3.0;
            let band = |phase: f32| (((t + phase).sin() * 0.5 + 0.5) * 205.0 + 50.0) as u8;
            [band(0.0), band(2.1), band(4.2)]
        })
        .collect()
}
