use super::cursor::ScrollCursor;
use super::text::ScrollText;
use super::waveform::WaveIndex;

/// How waveform markers show up in the visible window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Markers occupy no slot; the window skips over them.
    #[default]
    Hidden,
    /// One slot per ring character, as the TCB screen did it: the
    /// escape and the digit each repeat the character in front of the marker.
    Echo,
}

impl MarkerStyle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Echo => "echo",
        }
    }
}

/// One window slot after marker resolution, before any geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedGlyph {
    pub glyph: char,
    /// Ring index the wave phase is keyed on.
    pub key: usize,
    /// Position in the visible window, drives horizontal lay-out only.
    pub slot: usize,
    pub wave: WaveIndex,
}

pub struct MarkerParser;

impl MarkerParser {
    /// Resolves `window` slots starting at the cursor's lead index into `out`.
    ///
    /// The cursor's active waveform is switched in place as markers are met,
    /// so every glyph carries the waveform in effect at its point in the scan.
    /// In `Hidden` style the text must contain at least one visible character.
    pub fn resolve(
        text: &ScrollText,
        cursor: &mut ScrollCursor,
        window: usize,
        style: MarkerStyle,
        out: &mut Vec<ResolvedGlyph>,
    ) {
        out.clear();
        match style {
            MarkerStyle::Hidden => resolve_hidden(text, cursor, window, out),
            MarkerStyle::Echo => resolve_echo(text, cursor, window, out),
        }
    }

    /// Index `steps` visible characters past `lead`. Markers passed on the
    /// way switch the cursor's waveform, as if they had been scanned.
    ///
    /// Runs of more than a ring are cut to the last full turn, which passes
    /// every marker and ends on the same character.
    pub fn step_visible(
        text: &ScrollText,
        cursor: &mut ScrollCursor,
        lead: usize,
        steps: usize,
    ) -> usize {
        let Some(mut idx) = settle(text, cursor, lead) else {
            return text.wrap(lead);
        };
        let mut steps = steps;
        if steps > text.len() {
            let visible = text.visible_count().max(1);
            steps = steps % visible + visible;
        }
        for _ in 0..steps {
            match settle(text, cursor, text.next(idx)) {
                Some(next) => idx = next,
                None => break,
            }
        }
        idx
    }
}

fn switch(cursor: &mut ScrollCursor, wave: WaveIndex, at: usize) {
    if cursor.active() != wave {
        tracing::debug!(from = %cursor.active(), to = %wave, ring_index = at, "waveform switch");
    }
    cursor.set_active(wave);
}

fn resolve_hidden(
    text: &ScrollText,
    cursor: &mut ScrollCursor,
    window: usize,
    out: &mut Vec<ResolvedGlyph>,
) {
    let mut idx = cursor.lead_index();
    for slot in 0..window {
        let (at, glyph) = match settle(text, cursor, idx) {
            Some(at) => (at, text.at(at)),
            // A marker-only ring yields blanks.
            None => (idx, ' '),
        };
        out.push(ResolvedGlyph {
            glyph,
            key: at,
            slot,
            wave: cursor.active(),
        });
        idx = text.next(at);
    }
}

/// First visible index at or after `idx`, switching the cursor's waveform
/// for every marker stepped over. `None` when the ring holds only markers.
fn settle(text: &ScrollText, cursor: &mut ScrollCursor, mut idx: usize) -> Option<usize> {
    for _ in 0..=text.len() {
        if let Some(wave) = text.marker_at(idx) {
            switch(cursor, wave, idx);
            idx = text.wrap(idx + 2);
        } else if text.is_marker_digit(idx) {
            idx = text.next(idx);
        } else {
            return Some(idx);
        }
    }
    None
}

fn resolve_echo(
    text: &ScrollText,
    cursor: &mut ScrollCursor,
    window: usize,
    out: &mut Vec<ResolvedGlyph>,
) {
    let lead = cursor.lead_index();
    for slot in 0..window {
        let idx = text.wrap(lead + slot);
        let glyph = if let Some(wave) = text.marker_at(idx) {
            switch(cursor, wave, idx);
            echo_of(text, text.prev(idx))
        } else if text.is_marker_digit(idx) {
            echo_of(text, text.prev(text.prev(idx)))
        } else {
            text.at(idx)
        };
        out.push(ResolvedGlyph {
            glyph,
            key: idx,
            slot,
            wave: cursor.active(),
        });
    }
}

/// The character a marker repeats. Marker characters themselves (short rings,
/// back-to-back markers) show as blank instead of leaking a digit or escape.
fn echo_of(text: &ScrollText, idx: usize) -> char {
    if text.is_marker_part(idx) {
        ' '
    } else {
        text.at(idx)
    }
}
