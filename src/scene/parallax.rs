use super::canvas::Canvas;
use std::f32::consts::TAU;

pub const LAYERS: usize = 32;
pub const STRIP_H: usize = 10;
/// Horizontal period of every strip, in stage pixels.
pub const STRIP_PERIOD: usize = 512;
const WRAP: f32 = 256.0;

const SPEEDS: [f32; 16] = [
    8.0, 7.5, 7.0, 6.5, 6.0, 5.5, 5.0, 4.5, 4.0, 3.5, 3.0, 2.5, 2.0, 1.5, 1.0, 0.5,
];

/// Two banks of 16 mountain strips scrolling at staggered speeds.
pub struct Parallax {
    speed: [f32; LAYERS],
    pos: [f32; LAYERS],
    strips: Vec<Canvas>,
}

impl Parallax {
    pub fn new() -> Self {
        let mut speed = [0.0f32; LAYERS];
        speed[..16].copy_from_slice(&SPEEDS);
        speed[16..].copy_from_slice(&SPEEDS);
        Self {
            speed,
            pos: [0.0; LAYERS],
            strips: (0..LAYERS).map(|i| mountain_strip(i, speed[i])).collect(),
        }
    }

    /// Moves every layer left by its speed. Positions stay in (-256, 0].
    pub fn tick(&mut self) {
        for (p, s) in self.pos.iter_mut().zip(self.speed.iter()) {
            *p = (*p - *s) % WRAP;
        }
    }

    pub fn positions(&self) -> &[f32; LAYERS] {
        &self.pos
    }

    pub fn speeds(&self) -> &[f32; LAYERS] {
        &self.speed
    }

    /// Stage row of a layer: the upper bank from the top, the lower bank
    /// after an 84 pixel gap.
    pub fn layer_y(layer: usize) -> i32 {
        if layer < 16 {
            (layer * STRIP_H) as i32
        } else {
            (layer * STRIP_H + 84) as i32
        }
    }

    pub fn draw(&self, stage: &mut Canvas) {
        let stage_w = stage.width() as i32;
        for (layer, strip) in self.strips.iter().enumerate() {
            let y = Self::layer_y(layer);
            let mut x = self.pos[layer] as i32 * 2;
            while x < stage_w {
                stage.blit(strip, x, y);
                x += STRIP_PERIOD as i32;
            }
        }
    }
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new()
    }
}

fn mountain_strip(layer: usize, speed: f32) -> Canvas {
    let mut strip = Canvas::new(STRIP_PERIOD, STRIP_H);
    let upper = layer < 16;
    // Faster layers are nearer: brighter and warmer.
    let near = speed / 8.0;
    let base = [
        (30.0 + near * 120.0) as u8,
        (20.0 + near * 60.0) as u8,
        (70.0 + near * 150.0) as u8,
    ];
    let k1 = 2.0 + (layer % 5) as f32;
    let k2 = 7.0 + (layer % 3) as f32;
    let phase = layer as f32 * 0.7;

    for x in 0..STRIP_PERIOD {
        let u = x as f32 / STRIP_PERIOD as f32;
        let h = 5.0 + 3.0 * (TAU * k1 * u + phase).sin() + 1.8 * (TAU * k2 * u - phase).sin();
        let h = h.clamp(1.0, STRIP_H as f32) as usize;
        for d in 0..h {
            let y = if upper { d } else { STRIP_H - 1 - d };
            let shade = 1.0 - d as f32 / (STRIP_H as f32 * 1.6);
            strip.put(
                x as i32,
                y as i32,
                [
                    (base[0] as f32 * shade) as u8,
                    (base[1] as f32 * shade) as u8,
                    (base[2] as f32 * shade) as u8,
                ],
            );
        }
    }
    strip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speeds_repeat_per_bank() {
        let p = Parallax::new();
        assert_eq!(p.speeds()[0], 8.0);
        assert_eq!(p.speeds()[15], 0.5);
        assert_eq!(p.speeds()[16], 8.0);
        assert_eq!(p.speeds()[31], 0.5);
    }

    #[test]
    fn positions_wrap_keeping_sign() {
        let mut p = Parallax::new();
        for _ in 0..33 {
            p.tick();
        }
        // 33 * 8 = 264, wrapped by 256.
        assert_eq!(p.positions()[0], -8.0);
        assert_eq!(p.positions()[15], -16.5);
        assert!(p.positions().iter().all(|&v| v <= 0.0 && v > -256.0));
    }

    #[test]
    fn banks_leave_a_gap() {
        assert_eq!(Parallax::layer_y(0), 0);
        assert_eq!(Parallax::layer_y(15), 150);
        assert_eq!(Parallax::layer_y(16), 244);
        assert_eq!(Parallax::layer_y(31), 394);
    }

    #[test]
    fn strips_cover_the_stage_width() {
        let mut p = Parallax::new();
        for _ in 0..40 {
            p.tick();
        }
        let mut stage = Canvas::new(640, 400);
        p.draw(&mut stage);
        // Every strip has at least one painted row per column.
        for layer in [0usize, 15, 16, 20] {
            let y0 = Parallax::layer_y(layer) as usize;
            for x in (0..640).step_by(37) {
                assert!(
                    (y0..y0 + STRIP_H).any(|y| stage.is_painted(x, y)),
                    "layer {layer} has a hole at x={x}"
                );
            }
        }
    }
}
