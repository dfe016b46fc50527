use super::waveform::WaveIndex;
use std::num::NonZeroUsize;

/// Horizontal scroll position over the text ring plus the carried waveform.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollCursor {
    ring_len: NonZeroUsize,
    advance_width: f32,
    fractional_offset: f32,
    lead_index: usize,
    active: WaveIndex,
}

impl ScrollCursor {
    pub fn new(ring_len: NonZeroUsize, advance_width: f32) -> Self {
        Self {
            ring_len,
            advance_width: if advance_width.is_finite() && advance_width > 0.0 {
                advance_width
            } else {
                1.0
            },
            fractional_offset: 0.0,
            lead_index: 0,
            active: WaveIndex::default(),
        }
    }

    pub fn ring_len(&self) -> usize {
        self.ring_len.get()
    }

    pub fn advance_width(&self) -> f32 {
        self.advance_width
    }

    pub fn fractional_offset(&self) -> f32 {
        self.fractional_offset
    }

    pub fn lead_index(&self) -> usize {
        self.lead_index
    }

    pub fn active(&self) -> WaveIndex {
        self.active
    }

    pub fn set_active(&mut self, wave: WaveIndex) {
        self.active = wave;
    }

    pub fn set_lead(&mut self, idx: usize) {
        self.lead_index = idx % self.ring_len.get();
    }

    /// Scrolls by `speed` pixels and returns how many whole characters the
    /// lead index moved.
    ///
    /// Speeds wider than one character step several characters at once; the
    /// remainder stays in `[0, advance_width)`.
    pub fn advance(&mut self, speed: f32) -> usize {
        if !speed.is_finite() || speed <= 0.0 {
            return 0;
        }
        let width = self.advance_width;
        self.fractional_offset += speed;
        if self.fractional_offset < width {
            return 0;
        }

        let whole = (self.fractional_offset / width).floor();
        self.fractional_offset -= whole * width;
        let mut steps = whole as usize;
        // Rounding can leave the remainder a hair outside the range.
        while self.fractional_offset >= width {
            self.fractional_offset -= width;
            steps += 1;
        }
        if self.fractional_offset < 0.0 {
            self.fractional_offset += width;
            steps = steps.saturating_sub(1);
        }

        let len = self.ring_len.get();
        self.lead_index = (self.lead_index + steps % len) % len;
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(len: usize) -> ScrollCursor {
        ScrollCursor::new(NonZeroUsize::new(len).unwrap(), 32.0)
    }

    #[test]
    fn sub_character_speed_only_moves_offset() {
        let mut c = cursor(5);
        assert_eq!(c.advance(4.0), 0);
        assert_eq!(c.fractional_offset(), 4.0);
        assert_eq!(c.lead_index(), 0);
    }

    #[test]
    fn crossing_one_width_steps_the_lead() {
        let mut c = cursor(5);
        for _ in 0..8 {
            c.advance(4.0);
        }
        assert_eq!(c.lead_index(), 1);
        assert_eq!(c.fractional_offset(), 0.0);
    }

    #[test]
    fn lead_wraps_at_ring_length() {
        let mut c = cursor(3);
        c.set_lead(2);
        assert_eq!(c.advance(32.0), 1);
        assert_eq!(c.lead_index(), 0);
    }

    #[test]
    fn non_positive_speed_is_ignored() {
        let mut c = cursor(3);
        assert_eq!(c.advance(-8.0), 0);
        assert_eq!(c.advance(f32::NAN), 0);
        assert_eq!(c.advance(0.0), 0);
        assert_eq!(c.fractional_offset(), 0.0);
    }

    #[test]
    fn huge_speed_stays_bounded() {
        let mut c = cursor(7);
        let steps = c.advance(32.0 * 1_000_003.0);
        assert_eq!(steps, 1_000_003);
        assert_eq!(c.lead_index(), 1_000_003 % 7);
        assert!(c.fractional_offset() >= 0.0 && c.fractional_offset() < 32.0);
    }
}
