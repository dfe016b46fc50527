use super::waveform::WaveIndex;
use super::ScrollError;
use std::num::NonZeroUsize;
use std::path::Path;

pub const DEFAULT_ESCAPE: char = '^';

/// Marker-annotated scroll text, treated as a ring.
///
/// A marker is the escape character followed by a digit 0-7. Every index
/// helper wraps modulo the ring length, so a marker may straddle the end of
/// the text (escape last, digit first).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollText {
    chars: Vec<char>,
    escape: char,
}

impl ScrollText {
    pub fn new(text: &str) -> Result<Self, ScrollError> {
        Self::with_escape(text, DEFAULT_ESCAPE)
    }

    pub fn with_escape(text: &str, escape: char) -> Result<Self, ScrollError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Err(ScrollError::EmptySource);
        }
        Ok(Self { chars, escape })
    }

    /// Reads a scroll text file. Line breaks become spaces; the scroller has
    /// a single line.
    pub fn load(path: impl AsRef<Path>, escape: char) -> Result<Self, ScrollError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ScrollError::Io(format!("{}: {e}", path.display())))?;
        let joined = raw
            .trim_end_matches(['\r', '\n'])
            .lines()
            .collect::<Vec<_>>()
            .join(" ");
        Self::with_escape(&joined, escape)
    }

    /// The scroll text of the TCB demo screen.
    pub fn classic() -> Self {
        Self {
            chars: classic_text().chars().collect(),
            escape: DEFAULT_ESCAPE,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn ring_len(&self) -> NonZeroUsize {
        // Construction rejects empty texts.
        NonZeroUsize::new(self.chars.len()).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn escape(&self) -> char {
        self.escape
    }

    pub fn wrap(&self, idx: usize) -> usize {
        idx % self.chars.len()
    }

    pub fn at(&self, idx: usize) -> char {
        self.chars[self.wrap(idx)]
    }

    /// Index one step back around the ring.
    pub fn prev(&self, idx: usize) -> usize {
        let len = self.chars.len();
        (self.wrap(idx) + len - 1) % len
    }

    pub fn next(&self, idx: usize) -> usize {
        self.wrap(idx + 1)
    }

    /// Waveform selected by a marker starting at `idx`, if one does.
    pub fn marker_at(&self, idx: usize) -> Option<WaveIndex> {
        if self.chars.len() < 2 || self.at(idx) != self.escape {
            return None;
        }
        WaveIndex::from_digit(self.at(self.next(idx)))
    }

    /// True when `idx` holds the digit half of a marker.
    pub fn is_marker_digit(&self, idx: usize) -> bool {
        self.marker_at(self.prev(idx)).is_some()
    }

    pub fn is_marker_part(&self, idx: usize) -> bool {
        self.marker_at(idx).is_some() || self.is_marker_digit(idx)
    }

    /// Number of characters that are not part of any marker.
    pub fn visible_count(&self) -> usize {
        (0..self.chars.len())
            .filter(|&i| !self.is_marker_part(i))
            .count()
    }

    /// First index at or after `idx` that is not part of a marker, or `None`
    /// when the ring holds nothing but markers.
    pub fn next_visible(&self, idx: usize) -> Option<usize> {
        let start = self.wrap(idx);
        (0..self.chars.len())
            .map(|step| self.wrap(start + step))
            .find(|&i| !self.is_marker_part(i))
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

fn classic_text() -> String {
    let spc = " ".repeat(29);
    [
        " ^0",
        spc.as_str(),
        "WOW, THIS DEMO SURE DOES LOOK GREAT..  BUT PERHAPS THE SCROLLINE LOOKS A BIT   TOO ORDINARY. ",
        "WELL, OKEY, LET US SWING IT UP AND DOWN. ",
        "^1 THIS IS THE LITTLE BIT OF EVERYTHING DEMO BY THE CAREBEARS. THERE ARE STAR RAY TYPE OF ",
        "BACKGROUND SCROLLERS, A DISTORTED TCB LOGO, ",
        "SOME GREAT MAD MAX MUSIC AND A SWINGING SCROLLINE OR..... PERHAPS EVEN MORE..............",
        "^2...........  THIS IS BEGINNING TO LOOK ",
        "LIKE THE XXX INTERNATIONAL BALL DEMO SCREEN.                       ",
        "^3    BUT THEIR SCROLLINE WAS NOT THIS BIG. WE HOPE YOU DO NOT ",
        "THINK THAT WE HAVE TWO DIFFERENTLY SIZED FONTS. WE HAVE MANY MORE... ^4  ",
        "YEAH...  DO NOT LEAVE YET, THERE IS STILL MORE TO COME, JUST ",
        "WAIT AND SEE.  IF YOU THINK THIS IS HARD TO READ, WAIT TILL YOU HAVE ",
        "SEEN WHAT YOU ARE GOING TO SEE IN ABOUT THREE SECONDS.     ",
        "^5 THAT WAS NOT THREE SECONDS, BUT NOW YOU HAVE SEEN OUR THREE DIMENSIONAL ",
        "BENDING.. YOU MIGHT WONDER WHY WE HAVE NO PUNCTUATION EXCEPT ",
        "FOR THESE TWO ., . WE DO NOT EVEN HAVE THE LITTLE BLACK DOT BETWEEN HAVEN AND T, ",
        "HAVEN T, SEE... WELL, NOW THAT WE ARE OUT OF IDEAS WHAT ",
        "TO WRITE, WE CAN AS WELL EXPLAIN WHY. THE PROBLEM IS THAT ALL THE PART DEMOS ",
        "MUST WORK ON HALF A MEG AND EVERY CHARACTER TAKES ABOUT TEN ",
        "KILOBYTES. WE ARE GOING TO GREET SOME FOLKS NOW, SO LET US CHANGE WAVEFORM... ",
        "                        ^6             ",
        "MEGAGREETINGS GO TO ALL THE OTHER MEMBERS OF THE UNION. WE DO NOT FEEL ",
        "LIKE GREETING TO MUCH COZ WE DO NOT HAVE THOSE LITTLE BENT LINES, SO ",
        "WE CAN NOT MAKE COMMENTS. BUT JUST ONCE YOU WILL HAVE TO PRETEND YOU SAW ",
        "ONE OF THOSE, IT SHOULD HAVE COME INSTEAD OF THE SPACE BETWEEN ",
        "THE WORDS COOL AND YOUR. HERE WE GO... HELLO, AN COOL  YOUR NEW INTRO IS ",
        "REALLY SOMETHING .                    ^7 YOU WILL HAVE ",
        "TO READ IN THE MAIN SCROLLTEXT FOR MORE GREETINGS....  BYE.............. ",
        "                                             ",
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ScrollText {
        ScrollText::new(s).unwrap()
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(ScrollText::new(""), Err(ScrollError::EmptySource));
    }

    #[test]
    fn markers_are_escape_plus_low_digit() {
        let t = text("A^3B^9C^");
        assert_eq!(t.marker_at(1).map(WaveIndex::get), Some(3));
        assert!(t.is_marker_digit(2));
        assert_eq!(t.marker_at(4), None);
        assert!(!t.is_marker_digit(5));
        // Escape at the end wraps onto 'A', which is not a digit.
        assert_eq!(t.marker_at(7), None);
        assert_eq!(t.visible_count(), 6);
    }

    #[test]
    fn marker_may_straddle_the_ring_end() {
        let t = text("3AB^");
        assert_eq!(t.marker_at(3).map(WaveIndex::get), Some(3));
        assert!(t.is_marker_digit(0));
        assert_eq!(t.next_visible(3), Some(1));
        assert_eq!(t.next_visible(0), Some(1));
    }

    #[test]
    fn single_escape_is_literal() {
        let t = text("^");
        assert_eq!(t.marker_at(0), None);
        assert!(!t.is_marker_digit(0));
        assert_eq!(t.next_visible(5), Some(0));
    }

    #[test]
    fn marker_only_ring_has_no_visible_index() {
        let t = text("^1^2");
        assert_eq!(t.visible_count(), 0);
        assert_eq!(t.next_visible(0), None);
    }

    #[test]
    fn custom_escape() {
        let t = ScrollText::with_escape("A~5B", '~').unwrap();
        assert_eq!(t.marker_at(1).map(WaveIndex::get), Some(5));
        assert_eq!(t.marker_at(0), None);
    }

    #[test]
    fn classic_text_walks_every_waveform() {
        let t = ScrollText::classic();
        let mut seen: Vec<usize> = (0..t.len())
            .filter_map(|i| t.marker_at(i))
            .map(WaveIndex::get)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
        assert!(t.at(0) == ' ' && t.marker_at(1).is_some());
    }
}
