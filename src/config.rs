use crate::scroll::{
    EngineConfig, MarkerStyle, ScrollEngine, ScrollError, ScrollText, WaveIndex, WaveformTable,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tcb-scroller",
    version,
    about = "TCB super-multi-plane 3D wave scroller for the terminal"
)]
pub struct Config {
    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Pixels scrolled per frame.
    #[arg(long, default_value_t = 4.0)]
    pub speed: f32,

    /// Glyph slots resolved per frame.
    #[arg(long, default_value_t = 30)]
    pub window: usize,

    #[arg(long, default_value_t = 0.02, allow_negative_numbers = true)]
    pub phase_step: f32,

    #[arg(long, value_enum, default_value_t = MarkerStyleArg::Hidden)]
    pub marker_style: MarkerStyleArg,

    /// Scroll text to load instead of the built-in one. Lines are joined with spaces.
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Character introducing a waveform marker in `--text-file`.
    #[arg(long, default_value_t = '^')]
    pub escape: char,

    /// Waveform active before the first marker.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..8))]
    pub wave: u8,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    /// Write tracing output to this file (filter with RUST_LOG).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub list_waves: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    #[value(alias = "hires", alias = "dots")]
    Braille,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkerStyleArg {
    #[value(alias = "skip")]
    Hidden,
    #[value(alias = "classic", alias = "original")]
    Echo,
}

impl From<MarkerStyleArg> for MarkerStyle {
    fn from(v: MarkerStyleArg) -> Self {
        match v {
            MarkerStyleArg::Hidden => MarkerStyle::Hidden,
            MarkerStyleArg::Echo => MarkerStyle::Echo,
        }
    }
}

impl Config {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            window: self.window,
            speed: self.speed,
            phase_step: self.phase_step,
            style: self.marker_style.into(),
            ..EngineConfig::default()
        }
    }

    pub fn initial_wave(&self) -> WaveIndex {
        WaveIndex::new(self.wave).unwrap_or_default()
    }

    pub fn scroll_text(&self) -> Result<ScrollText, ScrollError> {
        match &self.text_file {
            Some(path) => ScrollText::load(path, self.escape),
            None => Ok(ScrollText::classic()),
        }
    }

    /// Engine with the configured text, style and starting waveform.
    pub fn build_engine(&self) -> Result<ScrollEngine, ScrollError> {
        let mut engine = ScrollEngine::new(
            self.scroll_text()?,
            WaveformTable::classic(),
            self.engine_config(),
        )?;
        engine.force_wave(self.initial_wave());
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_demo() {
        let cfg = Config::parse_from(["tcb-scroller"]);
        assert_eq!(cfg.renderer, RendererMode::HalfBlock);
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.engine_config(), EngineConfig::default());
        assert_eq!(cfg.initial_wave(), WaveIndex::default());
        assert!(cfg.sync_updates);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn aliases_and_style() {
        let cfg = Config::parse_from([
            "tcb-scroller",
            "--renderer",
            "dots",
            "--marker-style",
            "classic",
            "--wave",
            "5",
        ]);
        assert_eq!(cfg.renderer, RendererMode::Braille);
        assert_eq!(cfg.engine_config().style, MarkerStyle::Echo);
        assert_eq!(cfg.initial_wave().get(), 5);
    }

    #[test]
    fn wave_out_of_range_is_rejected() {
        assert!(Config::try_parse_from(["tcb-scroller", "--wave", "8"]).is_err());
    }

    #[test]
    fn build_engine_starts_on_requested_wave() {
        let cfg = Config::parse_from(["tcb-scroller", "--wave", "3"]);
        let engine = cfg.build_engine().unwrap();
        assert_eq!(engine.active_wave().get(), 3);
    }

    #[test]
    fn zero_window_fails_at_build() {
        let cfg = Config::parse_from(["tcb-scroller", "--window", "0"]);
        assert_eq!(cfg.build_engine().err(), Some(ScrollError::EmptyWindow));
    }
}
