use std::collections::HashMap;

pub const TILE_W: usize = 32;
pub const TILE_H: usize = 33;

/// Pixels per bitmap bit.
const CELL: usize = 4;

/// One character tile. Texels hold a shade; zero is transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    texels: Vec<u8>,
}

impl Tile {
    pub fn blank() -> Self {
        Self {
            texels: vec![0; TILE_W * TILE_H],
        }
    }

    fn from_rows(rows: &[u8; 8]) -> Self {
        let mut texels = vec![0u8; TILE_W * TILE_H];
        for (by, bits) in rows.iter().enumerate() {
            for bx in 0..8usize {
                if bits & (0x80 >> bx) == 0 {
                    continue;
                }
                for dy in 0..CELL {
                    for dx in 0..CELL {
                        // Darker lower-right rim gives the blocks a bevel.
                        let shade = if dx == CELL - 1 || dy == CELL - 1 { 150 } else { 255 };
                        let x = bx * CELL + dx;
                        let y = by * CELL + dy;
                        texels[y * TILE_W + x] = shade;
                    }
                }
            }
        }
        Self { texels }
    }

    pub fn width(&self) -> usize {
        TILE_W
    }

    pub fn height(&self) -> usize {
        TILE_H
    }

    pub fn texel(&self, x: usize, y: usize) -> u8 {
        if x >= TILE_W || y >= TILE_H {
            return 0;
        }
        self.texels[y * TILE_W + x]
    }

    pub fn is_blank(&self) -> bool {
        self.texels.iter().all(|&t| t == 0)
    }
}

/// Glyph set of the demo font: a handful of punctuation and A-Z.
const GLYPHS: &[(char, [u8; 8])] = &[
    ('!', [0x18, 0x18, 0x18, 0x18, 0x00, 0x00, 0x18, 0x00]),
    ('(', [0x0C, 0x18, 0x30, 0x30, 0x30, 0x18, 0x0C, 0x00]),
    (')', [0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x18, 0x30, 0x00]),
    (',', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x30]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00]),
    (':', [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00]),
    (';', [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x30]),
    ('A', [0x18, 0x3C, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x00]),
    ('B', [0x7C, 0x66, 0x66, 0x7C, 0x66, 0x66, 0x7C, 0x00]),
    ('C', [0x3C, 0x66, 0x60, 0x60, 0x60, 0x66, 0x3C, 0x00]),
    ('D', [0x78, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0x78, 0x00]),
    ('E', [0x7E, 0x60, 0x60, 0x78, 0x60, 0x60, 0x7E, 0x00]),
    ('F', [0x7E, 0x60, 0x60, 0x78, 0x60, 0x60, 0x60, 0x00]),
    ('G', [0x3C, 0x66, 0x60, 0x6E, 0x66, 0x66, 0x3C, 0x00]),
    ('H', [0x66, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00]),
    ('I', [0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00]),
    ('J', [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x6C, 0x38, 0x00]),
    ('K', [0x66, 0x6C, 0x78, 0x70, 0x78, 0x6C, 0x66, 0x00]),
    ('L', [0x60, 0x60, 0x60, 0x60, 0x60, 0x60, 0x7E, 0x00]),
    ('M', [0x63, 0x77, 0x7F, 0x6B, 0x63, 0x63, 0x63, 0x00]),
    ('N', [0x66, 0x76, 0x7E, 0x7E, 0x6E, 0x66, 0x66, 0x00]),
    ('O', [0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00]),
    ('P', [0x7C, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x60, 0x00]),
    ('Q', [0x3C, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x0E, 0x00]),
    ('R', [0x7C, 0x66, 0x66, 0x7C, 0x78, 0x6C, 0x66, 0x00]),
    ('S', [0x3C, 0x66, 0x60, 0x3C, 0x06, 0x66, 0x3C, 0x00]),
    ('T', [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00]),
    ('U', [0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00]),
    ('V', [0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00]),
    ('W', [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00]),
    ('X', [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00]),
    ('Y', [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00]),
    ('Z', [0x7E, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x7E, 0x00]),
];

/// Character to tile lookup. Lowercase folds to uppercase and anything
/// outside the glyph set, space included, maps to the blank tile.
pub struct GlyphAtlas {
    tiles: HashMap<char, Tile>,
    blank: Tile,
}

impl GlyphAtlas {
    pub fn classic() -> Self {
        let tiles = GLYPHS
            .iter()
            .map(|(ch, rows)| (*ch, Tile::from_rows(rows)))
            .collect();
        Self {
            tiles,
            blank: Tile::blank(),
        }
    }

    pub fn tile(&self, ch: char) -> &Tile {
        self.tiles
            .get(&ch)
            .or_else(|| self.tiles.get(&ch.to_ascii_uppercase()))
            .unwrap_or(&self.blank)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.tiles.contains_key(&ch.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self::classic()
    }
}
