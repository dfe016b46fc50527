use super::font::Tile;

/// RGBA8 software canvas. Alpha is coverage only: 0 empty, 255 painted.
#[derive(Clone, Debug)]
pub struct Canvas {
    w: usize,
    h: usize,
    rgba: Vec<u8>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            rgba: vec![0; w.saturating_mul(h).saturating_mul(4)],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    pub fn clear(&mut self) {
        self.rgba.fill(0);
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.rgba.chunks_exact_mut(4) {
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
            px[3] = 255;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        if x >= self.w || y >= self.h {
            return [0; 4];
        }
        let i = (y * self.w + x) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    pub fn put(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return;
        }
        let i = (y as usize * self.w + x as usize) * 4;
        self.rgba[i] = rgb[0];
        self.rgba[i + 1] = rgb[1];
        self.rgba[i + 2] = rgb[2];
        self.rgba[i + 3] = 255;
    }

    pub fn is_painted(&self, x: usize, y: usize) -> bool {
        self.get(x, y)[3] != 0
    }

    /// Draws `rows` rows of `src` starting at `src_y` with their top-left
    /// corner at (`dst_x`, `dst_y`). Empty source pixels are skipped.
    pub fn blit_rows(&mut self, src: &Canvas, src_y: usize, rows: usize, dst_x: i32, dst_y: i32) {
        let end = (src_y + rows).min(src.h);
        for sy in src_y..end {
            let y = dst_y + (sy - src_y) as i32;
            if y < 0 || y as usize >= self.h {
                continue;
            }
            for sx in 0..src.w {
                let px = src.get(sx, sy);
                if px[3] == 0 {
                    continue;
                }
                self.put(dst_x + sx as i32, y, [px[0], px[1], px[2]]);
            }
        }
    }

    pub fn blit(&mut self, src: &Canvas, dst_x: i32, dst_y: i32) {
        self.blit_rows(src, 0, src.h, dst_x, dst_y);
    }

    /// Nearest-neighbour blit of the whole of `src`, centred on (`cx`, `cy`)
    /// and scaled by (`sx`, `sy`). A negative scale mirrors that axis.
    pub fn blit_scaled(&mut self, src: &Canvas, cx: f32, cy: f32, sx: f32, sy: f32) {
        if sx == 0.0 || sy == 0.0 || !sx.is_finite() || !sy.is_finite() {
            return;
        }
        let half_w = src.w as f32 * 0.5;
        let half_h = src.h as f32 * 0.5;
        self.map_rect(cx, cy, half_w * sx.abs(), half_h * sy.abs(), |fx, fy| {
            let u = (fx - cx) / sx + half_w;
            let v = (fy - cy) / sy + half_h;
            if u < 0.0 || v < 0.0 {
                return None;
            }
            let px = src.get(u as usize, v as usize);
            (px[3] != 0).then_some([px[0], px[1], px[2]])
        });
    }

    /// Draws a glyph tile centred on (`cx`, `cy`) at `scale`, shaded with
    /// `tint`. Non-positive scales draw nothing.
    pub fn blit_tile(&mut self, tile: &Tile, cx: f32, cy: f32, scale: f32, tint: [u8; 3]) {
        if scale <= 0.0 || !scale.is_finite() {
            return;
        }
        let half_w = tile.width() as f32 * 0.5;
        let half_h = tile.height() as f32 * 0.5;
        self.map_rect(cx, cy, half_w * scale, half_h * scale, |fx, fy| {
            let u = (fx - cx) / scale + half_w;
            let v = (fy - cy) / scale + half_h;
            if u < 0.0 || v < 0.0 {
                return None;
            }
            let s = tile.texel(u as usize, v as usize) as u16;
            (s != 0).then(|| {
                [
                    (tint[0] as u16 * s / 255) as u8,
                    (tint[1] as u16 * s / 255) as u8,
                    (tint[2] as u16 * s / 255) as u8,
                ]
            })
        });
    }

    /// Recolours painted pixels with the per-row `gradient`, keeping their
    /// brightness; empty pixels stay empty (source-atop).
    pub fn raster_atop(&mut self, gradient: &[[u8; 3]]) {
        if gradient.is_empty() {
            return;
        }
        for y in 0..self.h {
            let g = gradient[y * gradient.len() / self.h.max(1)];
            let row = &mut self.rgba[y * self.w * 4..(y + 1) * self.w * 4];
            for px in row.chunks_exact_mut(4) {
                if px[3] == 0 {
                    continue;
                }
                let l = px[0].max(px[1]).max(px[2]) as u16;
                px[0] = (g[0] as u16 * l / 255) as u8;
                px[1] = (g[1] as u16 * l / 255) as u8;
                px[2] = (g[2] as u16 * l / 255) as u8;
            }
        }
    }

    /// Nearest-neighbour resample into an opaque `w`x`h` RGBA buffer.
    pub fn upscale_into(&self, out: &mut Vec<u8>, w: usize, h: usize) {
        out.resize(w.saturating_mul(h).saturating_mul(4), 0);
        if w == 0 || h == 0 || self.w == 0 || self.h == 0 {
            return;
        }
        for y in 0..h {
            let sy = y * self.h / h;
            for x in 0..w {
                let sx = x * self.w / w;
                let si = (sy * self.w + sx) * 4;
                let di = (y * w + x) * 4;
                out[di..di + 3].copy_from_slice(&self.rgba[si..si + 3]);
                out[di + 3] = 255;
            }
        }
    }

    fn map_rect(
        &mut self,
        cx: f32,
        cy: f32,
        half_w: f32,
        half_h: f32,
        mut sample: impl FnMut(f32, f32) -> Option<[u8; 3]>,
    ) {
        let x0 = (cx - half_w).floor().max(0.0) as usize;
        let y0 = (cy - half_h).floor().max(0.0) as usize;
        let x1 = ((cx + half_w).ceil().max(0.0) as usize).min(self.w);
        let y1 = ((cy + half_h).ceil().max(0.0) as usize).min(self.h);
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(rgb) = sample(x as f32 + 0.5, y as f32 + 0.5) {
                    self.put(x as i32, y as i32, rgb);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::font::GlyphAtlas;

    #[test]
    fn put_clips_out_of_bounds() {
        let mut c = Canvas::new(4, 4);
        c.put(-1, 0, [9, 9, 9]);
        c.put(4, 0, [9, 9, 9]);
        c.put(1, 2, [9, 8, 7]);
        assert_eq!(c.get(1, 2), [9, 8, 7, 255]);
        assert_eq!(c.pixels().iter().filter(|&&b| b == 255).count(), 1);
    }

    #[test]
    fn tile_blit_scales_around_centre() {
        let atlas = GlyphAtlas::classic();
        let mut c = Canvas::new(64, 64);
        c.blit_tile(atlas.tile('H'), 32.0, 32.0, 0.5, [255, 255, 255]);
        // Half-size H spans roughly 16x16 pixels around the centre.
        let painted: Vec<(usize, usize)> = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| c.is_painted(x, y))
            .collect();
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|&(x, y)| (16..48).contains(&x) && (15..49).contains(&y)));
    }

    #[test]
    fn tile_blit_skips_non_positive_scale() {
        let atlas = GlyphAtlas::classic();
        let mut c = Canvas::new(32, 32);
        c.blit_tile(atlas.tile('A'), 16.0, 16.0, 0.0, [255, 255, 255]);
        c.blit_tile(atlas.tile('A'), 16.0, 16.0, -1.0, [255, 255, 255]);
        assert!(c.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn raster_only_touches_painted_pixels() {
        let mut c = Canvas::new(2, 2);
        c.put(0, 0, [255, 255, 255]);
        c.raster_atop(&[[10, 20, 30], [40, 50, 60]]);
        assert_eq!(c.get(0, 0), [10, 20, 30, 255]);
        assert_eq!(c.get(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn negative_vertical_scale_mirrors() {
        let mut src = Canvas::new(2, 2);
        src.put(0, 0, [1, 1, 1]);
        let mut dst = Canvas::new(2, 2);
        dst.blit_scaled(&src, 1.0, 1.0, 1.0, -1.0);
        assert!(dst.is_painted(0, 1));
        assert!(!dst.is_painted(0, 0));
    }

    #[test]
    fn upscale_repeats_pixels() {
        let mut c = Canvas::new(2, 1);
        c.put(1, 0, [7, 7, 7]);
        let mut out = Vec::new();
        c.upscale_into(&mut out, 4, 2);
        assert_eq!(out.len(), 4 * 2 * 4);
        assert_eq!(&out[8..12], &[7, 7, 7, 255]);
        assert_eq!(&out[0..4], &[0, 0, 0, 255]);
    }
}
