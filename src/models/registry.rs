//! Piece registry - one entry per physical piece, holding where it is drawn.

use std::collections::HashMap;
use std::sync::Arc;

use shakmaty::Square;

use crate::domain::{ChessboardError, PieceColor, PieceId, PieceKind, to_square};
use crate::ui::atlas::{SpriteAtlas, VisualAsset};
use crate::ui::board_layout::PixelPos;

/// Where a piece currently sits
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub square: Square,
    pub pixel: PixelPos,
}

/// A concrete piece: its identity, its shared image and its placement
#[derive(Clone, Debug)]
pub struct PieceInstance {
    pub id: PieceId,
    pub asset: Arc<VisualAsset>,
    /// None until the layout engine has run
    pub placement: Option<Placement>,
}

/// Owns every piece instance. Iteration order is population order and
/// never changes once populated.
#[derive(Debug, Default)]
pub struct PieceRegistry {
    pieces: Vec<PieceInstance>,
    index: HashMap<PieceId, usize>,
}

impl PieceRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create one instance per identity in a standard set, colors in sheet row
    /// order and kinds in sheet column order, each bound to its sliced image
    pub fn populate(atlas: &SpriteAtlas) -> Self {
        let layout = atlas.layout();
        let mut registry = Self::new();
        for id in PieceId::standard_set(&layout.columns, &layout.rows) {
            match atlas.get(id.kind, id.color) {
                Some(asset) => registry.insert(id, Arc::clone(asset)),
                None => tracing::warn!(piece = %id, "no sprite for piece, skipped"),
            }
        }
        tracing::debug!(pieces = registry.len(), "populated piece registry");
        registry
    }

    fn insert(&mut self, id: PieceId, asset: Arc<VisualAsset>) {
        self.index.insert(id, self.pieces.len());
        self.pieces.push(PieceInstance {
            id,
            asset,
            placement: None,
        });
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a piece by kind, color and index
    #[allow(dead_code)]
    pub fn get(
        &self,
        kind: PieceKind,
        color: PieceColor,
        index: u8,
    ) -> Result<&PieceInstance, ChessboardError> {
        let id = PieceId::new(kind, color, index)?;
        self.index
            .get(&id)
            .map(|&slot| &self.pieces[slot])
            .ok_or(ChessboardError::NotFound { kind, color, index })
    }

    /// Every piece, in stable order
    pub fn all(&self) -> impl Iterator<Item = &PieceInstance> + Clone {
        self.pieces.iter()
    }

    /// Move a piece to a square. Only the layout engine (and future move
    /// application) calls this.
    pub(crate) fn set_placement(
        &mut self,
        id: PieceId,
        placement: Placement,
    ) -> Result<(), ChessboardError> {
        let slot = *self.index.get(&id).ok_or(ChessboardError::NotFound {
            kind: id.kind,
            color: id.color,
            index: id.index,
        })?;
        self.pieces[slot].placement = Some(placement);
        Ok(())
    }

    /// The piece standing on a square, if any
    pub fn occupant(&self, square: Square) -> Option<&PieceInstance> {
        self.pieces
            .iter()
            .find(|p| p.placement.is_some_and(|pl| pl.square == square))
    }

    /// Text diagram of the board, rank 8 first, using piece characters
    /// (`.` for an empty square)
    pub fn diagram(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8).rev() {
            for file in 0..8 {
                let symbol = self
                    .occupant(to_square(file, rank))
                    .map_or('.', |p| p.id.symbol());
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}
