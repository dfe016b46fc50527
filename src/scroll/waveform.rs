use std::fmt;

/// Oscillation parameters for one scroll waveform.
///
/// The depth term drives perspective (and draw order), the vertical term
/// swings the line up and down. Phase scales are in hundredths of a radian
/// per ring character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveformPreset {
    pub depth_amplitude: f32,
    pub depth_phase_scale: f32,
    pub depth_speed: f32,
    pub depth_phase_offset: f32,
    pub vert_amplitude: f32,
    pub vert_phase_scale: f32,
    pub vert_speed: f32,
}

impl WaveformPreset {
    pub const fn new(
        depth_amplitude: f32,
        depth_phase_scale: f32,
        depth_speed: f32,
        depth_phase_offset: f32,
        vert_amplitude: f32,
        vert_phase_scale: f32,
        vert_speed: f32,
    ) -> Self {
        Self {
            depth_amplitude,
            depth_phase_scale,
            depth_speed,
            depth_phase_offset,
            vert_amplitude,
            vert_phase_scale,
            vert_speed,
        }
    }

    /// A preset with no motion at all: constant depth, constant height.
    pub const fn flat() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

/// Index of one of the eight waveforms.
///
/// Only values 0..=7 can be constructed, so indexing a [`WaveformTable`]
/// never goes out of bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaveIndex(u8);

impl WaveIndex {
    pub const COUNT: usize = 8;

    pub const fn new(idx: u8) -> Option<Self> {
        if (idx as usize) < Self::COUNT {
            Some(Self(idx))
        } else {
            None
        }
    }

    /// Marker digits are '0'..='7'; anything else is not a waveform switch.
    pub const fn from_digit(ch: char) -> Option<Self> {
        match ch {
            '0'..='7' => Some(Self(ch as u8 - b'0')),
            _ => None,
        }
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl fmt::Display for WaveIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveformTable {
    presets: [WaveformPreset; WaveIndex::COUNT],
}

impl WaveformTable {
    pub const fn new(presets: [WaveformPreset; WaveIndex::COUNT]) -> Self {
        Self { presets }
    }

    /// The eight waveforms of the TCB demo screen.
    pub const fn classic() -> Self {
        Self::new([
            WaveformPreset::new(0.0, 0.0, 0.0, 0.0, 55.0, 0.0, 0.0),
            WaveformPreset::new(0.0, 0.0, 0.0, 0.0, 55.0, 0.0, 2.0),
            WaveformPreset::new(0.0, 0.0, 0.0, 0.0, 55.0, 20.0, 2.0),
            WaveformPreset::new(200.0, 0.0, 0.0, 5.0, 55.0, 20.0, 2.0),
            WaveformPreset::new(200.0, 0.0, 4.0, 5.0, 55.0, 20.0, 2.0),
            WaveformPreset::new(200.0, -30.0, 4.0, 0.0, 55.0, 30.0, 2.0),
            WaveformPreset::new(200.0, 40.0, -4.0, 5.0, -70.0, 40.0, -4.0),
            WaveformPreset::new(150.0, 20.0, -3.0, 5.0, 55.0, 20.0, 2.0),
        ])
    }

    pub fn get(&self, idx: WaveIndex) -> &WaveformPreset {
        &self.presets[idx.get()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (WaveIndex, &WaveformPreset)> {
        WaveIndex::all().zip(self.presets.iter())
    }
}

impl Default for WaveformTable {
    fn default() -> Self {
        Self::classic()
    }
}
