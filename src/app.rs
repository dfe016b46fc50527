use crate::config::{Config, RendererMode};
use crate::render::{BrailleRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::scene::Demo;
use crate::scroll::{ScrollEngine, WaveIndex, WaveformTable};
use crate::terminal::{TerminalGuard, Viewport};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

/// Frames the HUD keeps flashing the waveform label after a switch.
const WAVE_FLASH_FRAMES: u32 = 60;
const SPEED_STEP: f32 = 1.0;
const MAX_SPEED: f32 = 32.0;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let engine = cfg.build_engine().context("build scroll engine")?;
    let mut demo = Demo::new(engine);

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Braille => Box::new(BrailleRenderer::new()),
    };
    let cell = renderer.cell_pixels();

    let mut last_size = TerminalGuard::size()?;
    tracing::info!(
        cols = last_size.0,
        rows = last_size.1,
        renderer = renderer.name(),
        fps = cfg.fps,
        "demo start"
    );

    let mut ui = UiState::new();
    let mut fps = FpsCounter::new();
    let mut last_wave = demo.engine().active_wave();
    let mut flash = 0u32;
    let mut last_render_ms = 0.0f32;

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if handle_key(k.code, k.modifiers, demo.engine_mut(), &mut ui) {
                        tracing::info!(frames = demo.frames(), "demo quit");
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => {
                    tracing::debug!(cols = c, rows = r, "resize");
                    last_size = (c, r);
                }
                _ => {}
            }
        }

        // Size check once per frame (resize events can be missed in some terminals).
        let sz = TerminalGuard::size()?;
        if sz != last_size {
            tracing::debug!(cols = sz.0, rows = sz.1, "resize (polled)");
            last_size = sz;
        }

        if !ui.paused {
            demo.tick();
        }

        let wave = demo.engine().active_wave();
        if wave != last_wave {
            last_wave = wave;
            flash = WAVE_FLASH_FRAMES;
        }
        flash = flash.saturating_sub(1);

        let wave_label = format!("Wave {}", wave);
        let hud = if ui.show_hud {
            build_wrapped_hud(
                last_size.0 as usize,
                demo.engine(),
                &wave_label,
                ui.paused,
                ui.show_help,
                fps.fps(),
                last_render_ms,
                renderer.name(),
            )
        } else {
            String::new()
        };

        let hud_lines = u16::try_from(hud.lines().count()).unwrap_or(u16::MAX);
        let view = Viewport::fit(last_size, hud_lines, cell);

        let pixels = demo.render(view.pixel_width, view.pixel_height);
        let frame = Frame {
            term_cols: view.cols,
            term_rows: view.rows,
            visual_rows: view.visual_rows,
            pixel_width: view.pixel_width,
            pixel_height: view.pixel_height,
            pixels_rgba: pixels,
            hud: &hud,
            hud_rows: view.hud_rows,
            hud_highlight: (flash > 0).then_some(wave_label.as_str()),
            hud_highlight_phase: (flash / 8) % 2 == 0,
            overlay: ui.show_help.then(help_popup_text),
            sync_updates: cfg.sync_updates,
        };

        let render_start = Instant::now();
        renderer.render(&frame, &mut out)?;
        last_render_ms = render_start.elapsed().as_secs_f32() * 1000.0;
        fps.tick();

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

struct UiState {
    paused: bool,
    show_hud: bool,
    show_help: bool,
}

impl UiState {
    fn new() -> Self {
        Self {
            paused: false,
            show_hud: true,
            show_help: false,
        }
    }
}

/// Returns true when the demo should quit.
fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    engine: &mut ScrollEngine,
    ui: &mut UiState,
) -> bool {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return true;
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char(' ') => {
            ui.paused = !ui.paused;
            false
        }
        KeyCode::Char(c @ '0'..='7') => {
            if let Some(wave) = WaveIndex::from_digit(c) {
                engine.force_wave(wave);
            }
            false
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            nudge_speed(engine, SPEED_STEP);
            false
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            nudge_speed(engine, -SPEED_STEP);
            false
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            ui.show_hud = !ui.show_hud;
            false
        }
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') | KeyCode::F(1) => {
            ui.show_help = !ui.show_help;
            false
        }
        _ => false,
    }
}

fn nudge_speed(engine: &mut ScrollEngine, delta: f32) {
    let speed = (engine.config().speed + delta).clamp(0.0, MAX_SPEED);
    if let Err(e) = engine.set_speed(speed) {
        tracing::warn!(error = %e, "speed change rejected");
    } else {
        tracing::debug!(speed, "scroll speed");
    }
}

#[allow(clippy::too_many_arguments)]
fn build_wrapped_hud(
    cols: usize,
    engine: &ScrollEngine,
    wave_label: &str,
    paused: bool,
    help_on: bool,
    fps: f32,
    render_ms: f32,
    renderer_name: &str,
) -> String {
    let cursor = engine.cursor();
    let cfg = engine.config();
    let logical_lines = vec![
        format!(
            "{} | Lead: {}/{} | Speed: {:>4.1} | Markers: {} | Phase: {:>6.2} | {}FPS: {:>4.1}",
            wave_label,
            cursor.lead_index(),
            cursor.ring_len(),
            cfg.speed,
            cfg.style.label(),
            engine.phase(),
            if paused { "PAUSED | " } else { "" },
            fps,
        ),
        format!(
            "Renderer: {} | ms(R): {:>4.1} | Help: {}",
            renderer_name,
            render_ms,
            if help_on { "on" } else { "off" }
        ),
        "Keys: 0-7 wave | +/- speed | space pause | i HUD | ?/h/F1 help | q quit".to_string(),
    ];

    wrap_hud_lines(cols, &logical_lines).join("\n")
}

fn wrap_hud_lines(cols: usize, lines: &[String]) -> Vec<String> {
    let width = cols.max(1);
    let mut out = Vec::new();
    for line in lines {
        out.extend(hard_wrap_line(line, width));
    }
    out
}

fn hard_wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn help_popup_text() -> &'static str {
    "TCB Scroller Hotkeys\n\
0-7  force waveform (until the next marker)\n\
+ / -  scroll speed up / down\n\
space  pause / resume\n\
i  show/hide HUD\n\
? or h or F1  toggle this help\n\
q or esc  quit"
}

/// Writes the waveform table, one preset per line.
pub fn print_waves(out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(
        out,
        "wave  depth(amp scale speed offset)        vertical(amp scale speed)"
    )?;
    for (idx, p) in WaveformTable::classic().iter() {
        writeln!(
            out,
            "{:>4}  {:>6.1} {:>6.2} {:>6.2} {:>8.1}        {:>6.1} {:>6.2} {:>6.2}",
            idx,
            p.depth_amplitude,
            p.depth_phase_scale,
            p.depth_speed,
            p.depth_phase_offset,
            p.vert_amplitude,
            p.vert_phase_scale,
            p.vert_speed,
        )?;
    }
    out.flush()?;
    Ok(())
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_wrap_splits_on_width() {
        assert_eq!(hard_wrap_line("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(hard_wrap_line("", 4), vec![String::new()]);
    }

    #[test]
    fn hud_mentions_wave_and_lead() {
        let engine = ScrollEngine::classic();
        let hud = build_wrapped_hud(400, &engine, "Wave 0", true, false, 60.0, 1.0, "halfblock");
        assert!(hud.contains("Wave 0"));
        assert!(hud.contains("Lead: 0/"));
        assert!(hud.contains("PAUSED"));
    }

    #[test]
    fn digit_keys_force_wave_and_speed_keys_clamp() {
        let mut engine = ScrollEngine::classic();
        let mut ui = UiState::new();
        assert!(!handle_key(KeyCode::Char('6'), KeyModifiers::NONE, &mut engine, &mut ui));
        assert_eq!(engine.active_wave().get(), 6);
        // '8' is not a waveform.
        handle_key(KeyCode::Char('8'), KeyModifiers::NONE, &mut engine, &mut ui);
        assert_eq!(engine.active_wave().get(), 6);

        for _ in 0..10 {
            handle_key(KeyCode::Char('-'), KeyModifiers::NONE, &mut engine, &mut ui);
        }
        assert_eq!(engine.config().speed, 0.0);
        handle_key(KeyCode::Char('+'), KeyModifiers::NONE, &mut engine, &mut ui);
        assert_eq!(engine.config().speed, 1.0);
    }

    #[test]
    fn quit_and_toggles() {
        let mut engine = ScrollEngine::classic();
        let mut ui = UiState::new();
        assert!(handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL, &mut engine, &mut ui));
        assert!(handle_key(KeyCode::Esc, KeyModifiers::NONE, &mut engine, &mut ui));
        handle_key(KeyCode::Char(' '), KeyModifiers::NONE, &mut engine, &mut ui);
        handle_key(KeyCode::F(1), KeyModifiers::NONE, &mut engine, &mut ui);
        assert!(ui.paused);
        assert!(ui.show_help);
    }

    #[test]
    fn wave_listing_has_eight_rows() {
        let mut buf = Vec::new();
        print_waves(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1 + WaveIndex::COUNT);
    }
}
