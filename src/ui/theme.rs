//! Theme constants and colors for the chess board.

use serde::Deserialize;
use shakmaty::Square;

use crate::domain::square_indices;

// Layout constants
pub const SQUARE_SIZE: u32 = 80;
pub const FRAME_RATE: u32 = 15;
pub const WINDOW_TITLE: &str = "chess";

// Board colors
pub const LIGHT_SQUARE: Rgb = Rgb(236, 208, 166);
pub const DARK_SQUARE: Rgb = Rgb(165, 117, 80);

/// An opaque RGB color, written `[r, g, b]` in the config file
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pack as 0xRRGGBB for gpui's `rgb()`
    pub fn to_hex(self) -> u32 {
        (self.0 as u32) << 16 | (self.1 as u32) << 8 | self.2 as u32
    }
}

/// Two-color checkerboard palette
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    pub light: Rgb,
    pub dark: Rgb,
}

impl Palette {
    /// Color for a square by the parity of its screen cell, `(col + row) % 2`
    /// with the top-left cell at (0, 0). Parity 0 is the light color.
    ///
    /// Flipping the board moves both coordinates by 7, so the parity is the same
    /// in either orientation: a1 is always dark, h1 always light.
    pub fn square_color(&self, square: Square) -> Rgb {
        let (file, rank) = square_indices(square);
        if (file + 7 - rank) % 2 == 0 {
            self.light
        } else {
            self.dark
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            light: LIGHT_SQUARE,
            dark: DARK_SQUARE,
        }
    }
}
