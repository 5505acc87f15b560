pub mod chess;
pub mod error;
pub mod pgn;

pub use chess::{PieceColor, PieceId, PieceKind, square_indices, to_square};
pub use error::ChessboardError;
