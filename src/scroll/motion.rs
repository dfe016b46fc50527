use super::waveform::WaveformPreset;

/// Synthetic 3D offset of one character before projection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WavePoint {
    pub depth: f32,
    pub vertical: f32,
}

/// Screen placement after perspective projection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub point: WavePoint,
    pub screen_x: f32,
    pub screen_y: f32,
    pub depth_scale: f32,
}

/// Camera and lay-out constants for the scroller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub field_of_view: f32,
    pub depth_baseline: f32,
    pub vertical_baseline: f32,
    pub x_center_offset: f32,
    pub y_center_offset: f32,
    pub canvas_half_width: f32,
    pub canvas_half_height: f32,
    pub left_margin: f32,
    pub advance_width: f32,
}

impl Projection {
    /// Geometry of the 320x200 demo screen with 32 pixel characters.
    pub const fn classic() -> Self {
        Self {
            field_of_view: 250.0,
            depth_baseline: 150.0,
            vertical_baseline: -4.0,
            x_center_offset: 16.0,
            y_center_offset: 14.0,
            canvas_half_width: 160.0,
            canvas_half_height: 100.0,
            left_margin: -450.0,
            advance_width: 32.0,
        }
    }

    /// Depth and height of the character with ring index `key` at phase `t`.
    ///
    /// Only the stable key enters the phase, so the wave stays put in world
    /// space while the text scrolls through it.
    pub fn wave(&self, preset: &WaveformPreset, key: usize, t: f32) -> WavePoint {
        let k = key as f32;
        let depth = preset.depth_amplitude
            * (preset.depth_phase_offset + k * preset.depth_phase_scale * 0.01 + t * preset.depth_speed)
                .sin()
            + self.depth_baseline;
        let vertical = preset.vert_amplitude
            * (1.5 + k * preset.vert_phase_scale * 0.01 + t * preset.vert_speed).cos()
            + self.vertical_baseline;
        WavePoint { depth, vertical }
    }

    /// Unprojected x of a window slot, shifted left by the sub-character scroll.
    pub fn local_x(&self, slot: usize, fractional_offset: f32) -> f32 {
        self.left_margin + slot as f32 * self.advance_width - fractional_offset
    }

    /// Perspective factor for a depth. Zero at the focal plane, negative
    /// behind the camera.
    pub fn depth_scale(&self, depth: f32) -> f32 {
        let denom = self.field_of_view + depth;
        if denom == 0.0 {
            0.0
        } else {
            self.field_of_view / denom
        }
    }

    pub fn project(&self, point: WavePoint, local_x: f32) -> Placement {
        let scale = self.depth_scale(point.depth);
        Placement {
            point,
            screen_x: (local_x - self.x_center_offset) * scale + self.canvas_half_width,
            screen_y: (point.vertical - self.y_center_offset) * scale + self.canvas_half_height,
            depth_scale: scale,
        }
    }

    pub fn place(
        &self,
        preset: &WaveformPreset,
        key: usize,
        slot: usize,
        fractional_offset: f32,
        t: f32,
    ) -> Placement {
        let point = self.wave(preset, key, t);
        self.project(point, self.local_x(slot, fractional_offset))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_preset_sits_on_the_baseline() {
        let p = Projection::classic();
        let w = p.wave(&WaveformPreset::flat(), 17, 3.0);
        assert_eq!(w.depth, 150.0);
        assert_eq!(w.vertical, -4.0);
        // fov / (fov + 150)
        assert!((p.depth_scale(w.depth) - 0.625).abs() < 1e-6);
    }

    #[test]
    fn slot_layout_is_linear_in_slot_and_offset() {
        let p = Projection::classic();
        assert_eq!(p.local_x(0, 0.0), -450.0);
        assert_eq!(p.local_x(3, 8.0), -450.0 + 96.0 - 8.0);
    }

    #[test]
    fn projection_centres_on_the_canvas() {
        let p = Projection::classic();
        let placed = p.project(
            WavePoint {
                depth: 0.0,
                vertical: 14.0,
            },
            16.0,
        );
        assert_eq!(placed.depth_scale, 1.0);
        assert_eq!(placed.screen_x, 160.0);
        assert_eq!(placed.screen_y, 100.0);
    }

    #[test]
    fn behind_the_camera_gives_non_positive_scale() {
        let p = Projection::classic();
        assert_eq!(p.depth_scale(-250.0), 0.0);
        assert!(p.depth_scale(-400.0) < 0.0);
    }

    #[test]
    fn phase_depends_on_key_not_slot() {
        let p = Projection::classic();
        let preset = WaveformPreset::new(200.0, 40.0, -4.0, 5.0, -70.0, 40.0, -4.0);
        let a = p.place(&preset, 42, 3, 0.0, 1.5);
        let b = p.place(&preset, 42, 9, 12.0, 1.5);
        assert_eq!(a.point, b.point);
        assert_ne!(a.screen_x, b.screen_x);
    }
}
