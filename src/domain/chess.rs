//! Pure chess domain types and utilities.
//! No GPUI dependencies - this is the domain layer.

use serde::Deserialize;
use shakmaty::{Color as SColor, File, Rank, Role, Square};
use std::fmt;

use super::ChessboardError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// How many instances of this kind a standard set holds per color
    pub fn instance_count(self) -> u8 {
        match self {
            PieceKind::Pawn => 8,
            PieceKind::Rook | PieceKind::Knight | PieceKind::Bishop => 2,
            PieceKind::Queen | PieceKind::King => 1,
        }
    }

    pub fn role(self) -> Role {
        match self {
            PieceKind::Pawn => Role::Pawn,
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook => Role::Rook,
            PieceKind::Queen => Role::Queen,
            PieceKind::King => Role::King,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub const ALL: [PieceColor; 2] = [PieceColor::White, PieceColor::Black];

    /// Rank holding this color's pieces (not pawns) at the start
    pub fn back_rank(self) -> Rank {
        match self {
            PieceColor::White => Rank::First,
            PieceColor::Black => Rank::Eighth,
        }
    }

    pub fn pawn_rank(self) -> Rank {
        match self {
            PieceColor::White => Rank::Second,
            PieceColor::Black => Rank::Seventh,
        }
    }

    pub fn to_shakmaty(self) -> SColor {
        match self {
            PieceColor::White => SColor::White,
            PieceColor::Black => SColor::Black,
        }
    }
}

/// Identity of one physical piece: kind, color and an index among duplicates.
///
/// The index is 0..8 for pawns, 0..2 for rooks, knights and bishops,
/// and always 0 for the queen and king.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PieceId {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub index: u8,
}

impl PieceId {
    /// Build an identity, rejecting indices a standard set does not have
    pub fn new(kind: PieceKind, color: PieceColor, index: u8) -> Result<Self, ChessboardError> {
        if index >= kind.instance_count() {
            return Err(ChessboardError::NotFound { kind, color, index });
        }
        Ok(Self { kind, color, index })
    }

    /// Every identity a standard set requires, in the given kind order
    pub fn standard_set(kinds: &[PieceKind], colors: &[PieceColor]) -> Vec<PieceId> {
        colors
            .iter()
            .flat_map(|&color| {
                kinds.iter().flat_map(move |&kind| {
                    (0..kind.instance_count()).map(move |index| PieceId { kind, color, index })
                })
            })
            .collect()
    }

    pub fn to_shakmaty(self) -> shakmaty::Piece {
        shakmaty::Piece {
            color: self.color.to_shakmaty(),
            role: self.kind.role(),
        }
    }

    /// Display character, uppercase for white (`P`, `n`, ...)
    pub fn symbol(self) -> char {
        self.to_shakmaty().char()
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} #{}", self.color, self.kind, self.index)
    }
}

/// Convert file/rank indices (0-based, a1 = (0, 0)) to a shakmaty Square
pub fn to_square(file: u32, rank: u32) -> Square {
    Square::from_coords(File::new(file), Rank::new(rank))
}

/// 0-based file and rank indices of a square
pub fn square_indices(square: Square) -> (u32, u32) {
    (square.file() as u32, square.rank() as u32)
}
