//! Starting layout - puts every piece on its square of the initial position.

use shakmaty::{File, Square};

use crate::domain::{ChessboardError, PieceColor, PieceId, PieceKind};
use crate::models::registry::{Placement, PieceRegistry};
use crate::ui::board_layout::BoardLayout;

/// Starting square of a piece in the standard position.
///
/// Pawn `i` stands on file `i`; paired pieces take the queenside file for
/// index 0 and the kingside file for index 1.
pub fn home_square(id: PieceId) -> Square {
    let rank = match id.kind {
        PieceKind::Pawn => id.color.pawn_rank(),
        _ => id.color.back_rank(),
    };
    let file = match (id.kind, id.index) {
        (PieceKind::Pawn, i) => File::new(i as u32),
        (PieceKind::Rook, 0) => File::A,
        (PieceKind::Rook, _) => File::H,
        (PieceKind::Knight, 0) => File::B,
        (PieceKind::Knight, _) => File::G,
        (PieceKind::Bishop, 0) => File::C,
        (PieceKind::Bishop, _) => File::F,
        (PieceKind::Queen, _) => File::D,
        (PieceKind::King, _) => File::E,
    };
    Square::from_coords(file, rank)
}

/// Reset every piece to the textbook starting position.
///
/// Idempotent. Fails with `IncompleteRegistry` (and moves nothing) if any
/// piece of a standard set is missing from the registry.
pub fn reset_to_start(
    registry: &mut PieceRegistry,
    layout: &BoardLayout,
) -> Result<(), ChessboardError> {
    let required = PieceId::standard_set(&PieceKind::ALL, &PieceColor::ALL);
    let missing = required.iter().filter(|&&id| !registry.contains(id)).count();
    if missing > 0 {
        return Err(ChessboardError::IncompleteRegistry { missing });
    }

    for id in required {
        let square = home_square(id);
        let pixel = layout.square_to_pixel(square);
        registry.set_placement(id, Placement { square, pixel })?;
    }

    tracing::debug!("pieces reset to starting position\n{}", registry.diagram());
    Ok(())
}
