use super::canvas::Canvas;
use super::font::GlyphAtlas;

pub const LOGO_W: usize = 303;
pub const LOGO_ROWS: usize = 32;
const TITLE_W: usize = 80;
const TITLE_H: usize = 16;
/// Rows read past the counter each frame, plus slack.
const COUNTER_MARGIN: usize = 80;

/// Per-row sine wobble of the logo and the flipping title bar above it.
pub struct Logo {
    sine: Vec<f32>,
    counter: usize,
    rot_pos: f32,
    rot_add: f32,
    flipped: bool,
    body: Canvas,
    title: Canvas,
}

impl Logo {
    pub fn new(atlas: &GlyphAtlas) -> Self {
        Self {
            sine: logo_sine_table(),
            counter: 0,
            rot_pos: 0.0,
            rot_add: 1.0,
            flipped: false,
            body: logo_body(atlas),
            title: title_bar(atlas),
        }
    }

    pub fn tick(&mut self) {
        self.counter += 1;
        if self.counter > self.sine.len() - COUNTER_MARGIN {
            self.counter = 0;
        }

        self.rot_pos += self.rot_add * 0.08;
        if self.rot_pos > 1.0 {
            self.rot_pos = -1.0;
            self.flipped = !self.flipped;
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn rot_pos(&self) -> f32 {
        self.rot_pos
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    pub fn sine_table(&self) -> &[f32] {
        &self.sine
    }

    /// Horizontal offset of logo row `row` this frame.
    pub fn row_offset(&self, row: usize) -> f32 {
        self.sine.get(self.counter + row).copied().unwrap_or(0.0)
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        for row in 0..LOGO_ROWS {
            let x = (8.0 + self.row_offset(row)).round() as i32;
            canvas.blit_rows(&self.body, row, 1, x, 96 + row as i32);
        }

        let sy = if self.flipped { -self.rot_pos } else { self.rot_pos };
        canvas.blit_scaled(&self.title, 160.0, 88.0, 1.0, sy);
    }
}

/// 40 still rows, a slow swing, a fast shiver, then 160 still rows.
pub fn logo_sine_table() -> Vec<f32> {
    let mut v = Vec::with_capacity(40 + 804 + 810 + 160);
    v.extend(std::iter::repeat(0.0).take(40));
    v.extend((0..160 * 5 + 4).map(|i| 8.0 * (i as f32 * 0.05 - 2.0).sin()));
    v.extend((0..160 * 5 + 10).map(|i| 8.0 * (i as f32 * 0.15).sin()));
    v.extend(std::iter::repeat(0.0).take(160));
    v
}

fn logo_body(atlas: &GlyphAtlas) -> Canvas {
    let mut body = Canvas::new(LOGO_W, LOGO_ROWS);
    for y in 0..LOGO_ROWS {
        // Chrome bar: bright centre line fading to the edges.
        let d = (y as f32 - LOGO_ROWS as f32 * 0.5).abs() / (LOGO_ROWS as f32 * 0.5);
        let l = 1.0 - d * 0.7;
        let rgb = [(90.0 * l) as u8, (140.0 * l) as u8, (230.0 * l) as u8];
        for x in 0..LOGO_W {
            body.put(x as i32, y as i32, rgb);
        }
    }
    let label = "THE CAREBEARS";
    let scale = 0.6;
    let step = 32.0 * scale;
    let start = (LOGO_W as f32 - step * label.len() as f32) * 0.5 + step * 0.5;
    for (i, ch) in label.chars().enumerate() {
        body.blit_tile(
            atlas.tile(ch),
            start + i as f32 * step,
            LOGO_ROWS as f32 * 0.5,
            scale,
            [255, 240, 160],
        );
    }
    body
}

fn title_bar(atlas: &GlyphAtlas) -> Canvas {
    let mut title = Canvas::new(TITLE_W, TITLE_H);
    let scale = 0.45;
    let step = 32.0 * scale;
    let start = TITLE_W as f32 * 0.5 - step;
    for (i, ch) in "TCB".chars().enumerate() {
        title.blit_tile(
            atlas.tile(ch),
            start + i as f32 * step,
            TITLE_H as f32 * 0.5,
            scale,
            [255, 120, 60],
        );
    }
    title
}
