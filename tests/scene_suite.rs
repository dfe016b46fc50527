use tcb_scroller::scene::canvas::Canvas;
use tcb_scroller::scene::font::{GlyphAtlas, TILE_H, TILE_W};
use tcb_scroller::scene::logo::{logo_sine_table, Logo, LOGO_ROWS};
use tcb_scroller::scene::parallax::{Parallax, LAYERS};
use tcb_scroller::scene::{draw_glyphs, raster_gradient, Demo, CANVAS_H, CANVAS_W};
use tcb_scroller::scroll::{PositionedGlyph, ScrollEngine, WaveIndex};

fn glyph(ch: char, x: f32, y: f32, scale: f32) -> PositionedGlyph {
    PositionedGlyph {
        glyph: ch,
        key: 0,
        slot: 0,
        wave: WaveIndex::default(),
        depth: 0.0,
        vertical: 0.0,
        screen_x: x,
        screen_y: y,
        depth_scale: scale,
    }
}

fn painted(c: &Canvas) -> usize {
    (0..c.height())
        .flat_map(|y| (0..c.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| c.is_painted(x, y))
        .count()
}

// ── Glyph atlas ─────────────────────────────────────────────────────────────

#[test]
fn atlas_folds_case_and_blanks_unknowns() {
    let atlas = GlyphAtlas::classic();
    assert_eq!(atlas.tile('a'), atlas.tile('A'));
    assert!(atlas.tile('~').is_blank());
    assert!(atlas.tile(' ').is_blank());
    assert!(!atlas.tile('!').is_blank());
    for ch in 'A'..='Z' {
        assert!(atlas.contains(ch), "missing {ch}");
        let t = atlas.tile(ch);
        assert_eq!((t.width(), t.height()), (TILE_W, TILE_H));
    }
}

// ── Glyph drawing ───────────────────────────────────────────────────────────

#[test]
fn draw_glyphs_skips_focal_plane_and_behind() {
    let atlas = GlyphAtlas::classic();
    let mut c = Canvas::new(CANVAS_W, CANVAS_H);
    draw_glyphs(
        &mut c,
        &atlas,
        &[glyph('A', 100.0, 100.0, 0.0), glyph('B', 200.0, 100.0, -0.7)],
    );
    assert_eq!(painted(&c), 0);

    draw_glyphs(&mut c, &atlas, &[glyph('A', 100.0, 100.0, 1.0)]);
    assert!(painted(&c) > 0);
}

#[test]
fn nearer_glyphs_paint_larger() {
    let atlas = GlyphAtlas::classic();
    let mut small = Canvas::new(CANVAS_W, CANVAS_H);
    let mut big = Canvas::new(CANVAS_W, CANVAS_H);
    draw_glyphs(&mut small, &atlas, &[glyph('W', 160.0, 100.0, 0.5)]);
    draw_glyphs(&mut big, &atlas, &[glyph('W', 160.0, 100.0, 1.5)]);
    assert!(painted(&big) > painted(&small) * 4);
}

#[test]
fn raster_recolours_only_painted_pixels() {
    let atlas = GlyphAtlas::classic();
    let mut c = Canvas::new(CANVAS_W, CANVAS_H);
    draw_glyphs(&mut c, &atlas, &[glyph('H', 160.0, 100.0, 1.0)]);
    let before = painted(&c);
    c.raster_atop(&raster_gradient(CANVAS_H));
    assert_eq!(painted(&c), before);
    assert!(!c.is_painted(0, 0));
}

// ── Parallax ────────────────────────────────────────────────────────────────

#[test]
fn parallax_positions_stay_in_one_period() {
    let mut p = Parallax::new();
    for frame in 0..1000 {
        p.tick();
        for (i, &pos) in p.positions().iter().enumerate() {
            assert!(pos <= 0.0 && pos > -256.0, "layer {i} at {pos} on frame {frame}");
        }
    }
    assert_eq!(p.positions().len(), LAYERS);
}

#[test]
fn slow_layers_lag_fast_ones() {
    let mut p = Parallax::new();
    for _ in 0..10 {
        p.tick();
    }
    assert_eq!(p.positions()[0], -80.0);
    assert_eq!(p.positions()[15], -5.0);
    assert_eq!(p.positions()[16], p.positions()[0]);
}

// ── Logo ────────────────────────────────────────────────────────────────────

#[test]
fn logo_table_and_wobble() {
    let table = logo_sine_table();
    assert_eq!(table.len(), 1814);
    let mut logo = Logo::new(&GlyphAtlas::classic());
    // The first 40 entries are still.
    assert!((0..LOGO_ROWS).all(|r| logo.row_offset(r) == 0.0));
    for _ in 0..100 {
        logo.tick();
    }
    assert_eq!(logo.counter(), 100);
    assert!((0..LOGO_ROWS).any(|r| logo.row_offset(r) != 0.0));
}

// ── Demo ────────────────────────────────────────────────────────────────────

#[test]
fn demo_frame_is_not_black_and_has_requested_size() {
    let mut demo = Demo::new(ScrollEngine::classic());
    for _ in 0..30 {
        demo.tick();
    }
    assert_eq!(demo.frames(), 30);
    let px = demo.render(200, 120);
    assert_eq!(px.len(), 200 * 120 * 4);
    assert!(px.chunks_exact(4).all(|p| p[3] == 255));
    let lit = px
        .chunks_exact(4)
        .filter(|p| p[0] != 0 || p[1] != 0 || p[2] != 0)
        .count();
    assert!(lit > 200 * 120 / 10, "only {lit} lit pixels");
}

#[test]
fn demo_tick_drives_the_scroller() {
    let mut demo = Demo::new(ScrollEngine::classic());
    assert!(demo.engine().frame().is_empty());
    demo.tick();
    assert_eq!(demo.engine().frame().len(), 30);
    assert_eq!(demo.engine().cursor().fractional_offset(), 4.0);

    demo.engine_mut().force_wave(WaveIndex::new(4).unwrap());
    assert_eq!(demo.engine().active_wave().get(), 4);
}

#[test]
fn classic_text_reaches_the_screen() {
    let mut demo = Demo::new(ScrollEngine::classic());
    // The classic text opens with a screen of blanks.
    for _ in 0..400 {
        demo.tick();
    }
    let atlas = GlyphAtlas::classic();
    let mut bare = Canvas::new(CANVAS_W, CANVAS_H);
    draw_glyphs(&mut bare, &atlas, demo.engine().frame());
    assert!(painted(&bare) > 0);

    let stage = demo.compose();
    assert_eq!((stage.width(), stage.height()), (CANVAS_W * 2, CANVAS_H * 2));
}
