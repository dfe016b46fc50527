//! Wave-form scrolltext engine.
//!
//! Each [`ScrollEngine::build_frame`] resolves the visible window of the
//! marker-annotated text, bends every glyph through the active waveform,
//! projects it and returns the glyphs sorted back to front.

mod cursor;
mod marker;
mod motion;
mod text;
mod waveform;

pub use cursor::ScrollCursor;
pub use marker::{MarkerParser, MarkerStyle, ResolvedGlyph};
pub use motion::{Placement, Projection, WavePoint};
pub use text::{ScrollText, DEFAULT_ESCAPE};
pub use waveform::{WaveIndex, WaveformPreset, WaveformTable};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollError {
    EmptySource,
    NoVisibleGlyphs,
    EmptyWindow,
    InvalidSpeed(f32),
    InvalidPhaseStep(f32),
    Io(String),
}

impl fmt::Display for ScrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => write!(f, "scroll text is empty"),
            Self::NoVisibleGlyphs => {
                write!(f, "scroll text holds only waveform markers, nothing to display")
            }
            Self::EmptyWindow => write!(f, "visible window must hold at least one glyph"),
            Self::InvalidSpeed(v) => write!(f, "scroll speed must be finite and >= 0, got {v}"),
            Self::InvalidPhaseStep(v) => write!(f, "phase step must be finite, got {v}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for ScrollError {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Glyph slots resolved per frame.
    pub window: usize,
    /// Pixels scrolled per frame.
    pub speed: f32,
    /// Phase accumulator increment per frame.
    pub phase_step: f32,
    pub style: MarkerStyle,
    pub projection: Projection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: 30,
            speed: 4.0,
            phase_step: 0.02,
            style: MarkerStyle::Hidden,
            projection: Projection::classic(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ScrollError> {
        if self.window == 0 {
            return Err(ScrollError::EmptyWindow);
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ScrollError::InvalidSpeed(self.speed));
        }
        if !self.phase_step.is_finite() {
            return Err(ScrollError::InvalidPhaseStep(self.phase_step));
        }
        Ok(())
    }
}

/// A glyph ready to draw: identity, projected centre and perspective scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    pub glyph: char,
    pub key: usize,
    pub slot: usize,
    pub wave: WaveIndex,
    pub depth: f32,
    pub vertical: f32,
    pub screen_x: f32,
    pub screen_y: f32,
    pub depth_scale: f32,
}

impl PositionedGlyph {
    /// Glyphs at or behind the focal plane stay in the list but are not drawn.
    pub fn is_renderable(&self) -> bool {
        self.depth_scale > 0.0 && self.depth_scale.is_finite()
    }
}

pub struct ScrollEngine {
    text: ScrollText,
    table: WaveformTable,
    config: EngineConfig,
    cursor: ScrollCursor,
    phase: f32,
    resolved: Vec<ResolvedGlyph>,
    frame: Vec<PositionedGlyph>,
}

impl ScrollEngine {
    pub fn new(
        text: ScrollText,
        table: WaveformTable,
        config: EngineConfig,
    ) -> Result<Self, ScrollError> {
        config.validate()?;
        if config.style == MarkerStyle::Hidden && text.visible_count() == 0 {
            return Err(ScrollError::NoVisibleGlyphs);
        }
        Ok(Self::assemble(text, table, config))
    }

    /// The TCB demo screen: its text, its waveforms, default settings.
    pub fn classic() -> Self {
        Self::assemble(
            ScrollText::classic(),
            WaveformTable::classic(),
            EngineConfig::default(),
        )
    }

    fn assemble(text: ScrollText, table: WaveformTable, config: EngineConfig) -> Self {
        let cursor = ScrollCursor::new(text.ring_len(), config.projection.advance_width);
        tracing::info!(
            ring_len = text.len(),
            window = config.window,
            speed = config.speed,
            style = config.style.label(),
            "scroll engine ready"
        );
        Self {
            text,
            table,
            cursor,
            phase: 0.0,
            resolved: Vec::with_capacity(config.window),
            frame: Vec::with_capacity(config.window),
            config,
        }
    }

    /// Builds this frame's draw list, then scrolls and advances the phase.
    ///
    /// Positions use the cursor and phase from before the advance. The
    /// returned slice is sorted by ascending depth scale (farthest first);
    /// glyphs with equal scale keep their left-to-right order.
    pub fn build_frame(&mut self) -> &[PositionedGlyph] {
        MarkerParser::resolve(
            &self.text,
            &mut self.cursor,
            self.config.window,
            self.config.style,
            &mut self.resolved,
        );

        let projection = &self.config.projection;
        let offset = self.cursor.fractional_offset();
        let t = self.phase;
        self.frame.clear();
        for r in &self.resolved {
            let preset = self.table.get(r.wave);
            let placed = projection.place(preset, r.key, r.slot, offset, t);
            self.frame.push(PositionedGlyph {
                glyph: r.glyph,
                key: r.key,
                slot: r.slot,
                wave: r.wave,
                depth: placed.point.depth,
                vertical: placed.point.vertical,
                screen_x: placed.screen_x,
                screen_y: placed.screen_y,
                depth_scale: placed.depth_scale,
            });
        }
        // `sort_by` is stable: equal scales keep slot order.
        self.frame
            .sort_by(|a, b| a.depth_scale.total_cmp(&b.depth_scale));

        let lead = self.cursor.lead_index();
        let steps = self.cursor.advance(self.config.speed);
        if self.config.style == MarkerStyle::Hidden {
            // Markers take no slot, so the lead moves in visible characters
            // and never rests on a marker.
            let lead = MarkerParser::step_visible(&self.text, &mut self.cursor, lead, steps);
            self.cursor.set_lead(lead);
        }
        self.phase += self.config.phase_step;

        &self.frame
    }

    /// The draw list of the last [`build_frame`](Self::build_frame) call.
    pub fn frame(&self) -> &[PositionedGlyph] {
        &self.frame
    }

    pub fn active_wave(&self) -> WaveIndex {
        self.cursor.active()
    }

    /// Overrides the carried waveform until the scan meets the next marker.
    pub fn force_wave(&mut self, wave: WaveIndex) {
        tracing::debug!(wave = %wave, "waveform forced");
        self.cursor.set_active(wave);
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), ScrollError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(ScrollError::InvalidSpeed(speed));
        }
        self.config.speed = speed;
        Ok(())
    }

    pub fn cursor(&self) -> &ScrollCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut ScrollCursor {
        &mut self.cursor
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase;
    }

    pub fn text(&self) -> &ScrollText {
        &self.text
    }

    pub fn table(&self) -> &WaveformTable {
        &self.table
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
