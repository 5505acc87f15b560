//! Error taxonomy shared by the board model, asset loading and PGN input.

use std::path::PathBuf;

use super::{PieceColor, PieceKind};

#[derive(Debug, thiserror::Error)]
pub enum ChessboardError {
    #[error("failed to load sprite sheet {path}: {reason}")]
    AssetLoad { path: PathBuf, reason: String },

    #[error("pixel ({x}, {y}) is outside the board")]
    OutOfBounds { x: i64, y: i64 },

    #[error("no piece {color:?} {kind:?} #{index}")]
    NotFound {
        kind: PieceKind,
        color: PieceColor,
        index: u8,
    },

    #[error("registry is missing {missing} piece(s) required for the starting layout")]
    IncompleteRegistry { missing: usize },

    #[error("failed to read PGN database {path}: {reason}")]
    Pgn { path: PathBuf, reason: String },

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}
