//! Board layout calculations - the mapping between squares and pixels.

use serde::Deserialize;
use shakmaty::Square;

use crate::domain::{ChessboardError, square_indices, to_square};
use crate::ui::theme::SQUARE_SIZE;

/// Which side sits at the bottom of the window
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// File a on the left, rank 8 on top
    #[default]
    WhiteBottom,
    /// File h on the left, rank 1 on top
    BlackBottom,
}

/// Top-left pixel of a cell, relative to the board origin
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PixelPos {
    pub x: u32,
    pub y: u32,
}

/// Handles all coordinate transformations for the chess board
#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    pub square_size: u32,
    pub orientation: Orientation,
}

impl BoardLayout {
    pub fn new(square_size: u32, orientation: Orientation) -> Self {
        Self {
            square_size,
            orientation,
        }
    }

    /// Get the total size of the board (8 squares)
    pub fn board_total_size(&self) -> u32 {
        self.square_size * 8
    }

    /// Screen column and row (0-based, row 0 on top) of a square
    fn cell_of(&self, square: Square) -> (u32, u32) {
        let (file, rank) = square_indices(square);
        match self.orientation {
            Orientation::WhiteBottom => (file, 7 - rank),
            Orientation::BlackBottom => (7 - file, rank),
        }
    }

    /// Pixel origin of the cell holding `square`
    pub fn square_to_pixel(&self, square: Square) -> PixelPos {
        let (col, row) = self.cell_of(square);
        PixelPos {
            x: col * self.square_size,
            y: row * self.square_size,
        }
    }

    /// Square whose cell contains the pixel; the exact inverse of `square_to_pixel`
    #[allow(dead_code)]
    pub fn pixel_to_square(&self, x: i64, y: i64) -> Result<Square, ChessboardError> {
        let total = self.board_total_size() as i64;
        if x < 0 || y < 0 || x >= total || y >= total {
            return Err(ChessboardError::OutOfBounds { x, y });
        }

        let col = (x / self.square_size as i64) as u32;
        let row = (y / self.square_size as i64) as u32;
        Ok(match self.orientation {
            Orientation::WhiteBottom => to_square(col, 7 - row),
            Orientation::BlackBottom => to_square(7 - col, row),
        })
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(SQUARE_SIZE, Orientation::WhiteBottom)
    }
}
