use anyhow::Context;
use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Stdout, Write};

/// Smallest terminal the scroller will draw into, in cells.
pub const MIN_COLS: u16 = 4;
pub const MIN_ROWS: u16 = 2;

/// Raw mode plus alternate screen for the lifetime of the demo.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        let size = Self::size()?;
        check_size(size)?;

        terminal::enable_raw_mode().context("enable raw mode")?;
        // From here on Drop leaves raw mode even if a later step fails.
        let guard = Self { _private: () };

        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;

        tracing::info!(cols = size.0, rows = size.1, "terminal: raw mode, alternate screen");
        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }

    /// Current size in cells as (cols, rows).
    pub fn size() -> anyhow::Result<(u16, u16)> {
        terminal::size().context("query terminal size")
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        // Renderers leave sync output on and autowrap off mid-frame.
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        tracing::info!("terminal restored");
    }
}

pub fn check_size((cols, rows): (u16, u16)) -> anyhow::Result<()> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        anyhow::bail!(
            "terminal too small (need at least {MIN_COLS}x{MIN_ROWS}, got {cols}x{rows})"
        );
    }
    Ok(())
}

/// How one terminal frame is split: picture rows on top, HUD rows below,
/// and the pixel size the demo is resampled to for the active renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub visual_rows: u16,
    pub hud_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
}

impl Viewport {
    /// Fits `wanted_hud_rows` of HUD under the picture, always keeping at
    /// least one picture row. `cell` is the renderer's pixels per cell.
    pub fn fit((cols, rows): (u16, u16), wanted_hud_rows: u16, cell: (usize, usize)) -> Self {
        let hud_rows = wanted_hud_rows.min(rows.saturating_sub(1));
        let visual_rows = rows.saturating_sub(hud_rows).max(1);
        Self {
            cols,
            rows,
            visual_rows,
            hud_rows,
            pixel_width: (cols as usize).saturating_mul(cell.0),
            pixel_height: (visual_rows as usize).saturating_mul(cell.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_check_rejects_tiny_terminals() {
        assert!(check_size((80, 24)).is_ok());
        assert!(check_size((MIN_COLS, MIN_ROWS)).is_ok());
        let err = check_size((3, 24)).unwrap_err();
        assert!(err.to_string().contains("got 3x24"));
        assert!(check_size((80, 1)).is_err());
    }

    #[test]
    fn hud_never_takes_the_last_picture_row() {
        let v = Viewport::fit((40, 3), 4, (1, 2));
        assert_eq!(v.hud_rows, 2);
        assert_eq!(v.visual_rows, 1);
        assert_eq!((v.pixel_width, v.pixel_height), (40, 2));
    }

    #[test]
    fn pixel_size_follows_the_renderer_cell() {
        let half = Viewport::fit((100, 30), 3, (1, 2));
        assert_eq!(half.visual_rows, 27);
        assert_eq!((half.pixel_width, half.pixel_height), (100, 54));

        let braille = Viewport::fit((100, 30), 0, (2, 4));
        assert_eq!(braille.hud_rows, 0);
        assert_eq!((braille.pixel_width, braille.pixel_height), (200, 120));
    }
}
