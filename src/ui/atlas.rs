//! Sprite atlas - slices the piece sprite sheet into per-piece images.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use gpui::AssetSource;
use image::{Rgba, RgbaImage, imageops};
use serde::Deserialize;

use crate::domain::{ChessboardError, PieceColor, PieceKind};
use crate::ui::assets::FileAssets;
use crate::ui::theme::SQUARE_SIZE;

/// Grid arrangement of the sprite sheet: one row per color, one column per kind
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub rows: [PieceColor; 2],
    pub columns: [PieceKind; 6],
    /// Width and height of one cell in pixels
    pub cell: u32,
}

impl SheetLayout {
    /// Minimum sheet dimensions for this grid
    pub fn required_size(&self) -> (u32, u32) {
        (
            self.columns.len() as u32 * self.cell,
            self.rows.len() as u32 * self.cell,
        )
    }

    /// Each color must own one row and each kind one column
    pub fn validate(&self) -> Result<(), String> {
        if self.cell == 0 {
            return Err("sheet cell size must be non-zero".to_string());
        }
        if self.rows[0] == self.rows[1] {
            return Err(format!("sheet rows repeat {:?}", self.rows[0]));
        }
        for (i, kind) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(kind) {
                return Err(format!("sheet columns repeat {kind:?}"));
            }
        }
        Ok(())
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            rows: [PieceColor::White, PieceColor::Black],
            columns: [
                PieceKind::King,
                PieceKind::Queen,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::Rook,
                PieceKind::Pawn,
            ],
            cell: SQUARE_SIZE,
        }
    }
}

/// Transparency key applied to every sliced cell
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(try_from = "ColorKeySetting")]
pub enum ColorKey {
    /// Use the color of each cell's top-left pixel
    SampleOrigin,
    Rgb([u8; 3]),
}

/// Config form of a color key: `-1` or `[r, g, b]`
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorKeySetting {
    Sentinel(i64),
    Rgb([u8; 3]),
}

impl TryFrom<ColorKeySetting> for ColorKey {
    type Error = String;

    fn try_from(setting: ColorKeySetting) -> Result<Self, Self::Error> {
        match setting {
            ColorKeySetting::Sentinel(-1) => Ok(ColorKey::SampleOrigin),
            ColorKeySetting::Sentinel(other) => Err(format!(
                "color key must be -1 or [r, g, b], got {other}"
            )),
            ColorKeySetting::Rgb(rgb) => Ok(ColorKey::Rgb(rgb)),
        }
    }
}

/// Immutable image of one piece kind in one color, shared by all its instances
#[derive(Debug)]
pub struct VisualAsset {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub image: RgbaImage,
}

/// All piece images sliced from one sprite sheet
#[derive(Debug)]
pub struct SpriteAtlas {
    layout: SheetLayout,
    assets: HashMap<(PieceKind, PieceColor), Arc<VisualAsset>>,
}

impl SpriteAtlas {
    /// Read the sprite sheet through the asset source and slice it
    pub fn load(
        assets: &FileAssets,
        path: &str,
        layout: SheetLayout,
        color_key: Option<ColorKey>,
    ) -> Result<Self, ChessboardError> {
        let load_error = |reason: String| ChessboardError::AssetLoad {
            path: PathBuf::from(path),
            reason,
        };

        let bytes = assets
            .load(path)
            .map_err(|e| load_error(e.to_string()))?
            .ok_or_else(|| load_error("file not found".to_string()))?;
        let sheet = image::load_from_memory(&bytes)
            .map_err(|e| load_error(e.to_string()))?
            .to_rgba8();

        tracing::info!(
            path,
            width = sheet.width(),
            height = sheet.height(),
            "loaded sprite sheet"
        );
        Self::from_image(&sheet, layout, color_key).map_err(load_error)
    }

    /// Slice an already decoded sheet. Fails if the sheet is smaller than the grid.
    pub fn from_image(
        sheet: &RgbaImage,
        layout: SheetLayout,
        color_key: Option<ColorKey>,
    ) -> Result<Self, String> {
        layout.validate()?;
        let (min_width, min_height) = layout.required_size();
        if sheet.width() < min_width || sheet.height() < min_height {
            return Err(format!(
                "sheet is {}x{}, expected at least {}x{}",
                sheet.width(),
                sheet.height(),
                min_width,
                min_height
            ));
        }

        let mut assets = HashMap::new();
        for (row, &color) in layout.rows.iter().enumerate() {
            for (col, &kind) in layout.columns.iter().enumerate() {
                let x = col as u32 * layout.cell;
                let y = row as u32 * layout.cell;
                let mut image = imageops::crop_imm(sheet, x, y, layout.cell, layout.cell).to_image();
                if let Some(key) = color_key {
                    apply_color_key(&mut image, key);
                }
                assets.insert((kind, color), Arc::new(VisualAsset { kind, color, image }));
            }
        }

        Ok(Self { layout, assets })
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn get(&self, kind: PieceKind, color: PieceColor) -> Option<&Arc<VisualAsset>> {
        self.assets.get(&(kind, color))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<VisualAsset>> {
        self.assets.values()
    }
}

/// Make every pixel whose RGB equals the key fully transparent
fn apply_color_key(image: &mut RgbaImage, key: ColorKey) {
    let [r, g, b] = match key {
        ColorKey::Rgb(rgb) => rgb,
        ColorKey::SampleOrigin => {
            let Rgba([r, g, b, _]) = *image.get_pixel(0, 0);
            [r, g, b]
        }
    };

    for pixel in image.pixels_mut() {
        if pixel.0[0] == r && pixel.0[1] == g && pixel.0[2] == b {
            pixel.0[3] = 0;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A sheet where every cell is filled with a color derived from its grid position
    pub(crate) fn test_sheet(cell: u32) -> RgbaImage {
        RgbaImage::from_fn(cell * 6, cell * 2, |x, y| {
            let col = (x / cell) as u8;
            let row = (y / cell) as u8;
            Rgba([col * 40, row * 100, 7, 255])
        })
    }

    #[test]
    fn test_slices_every_kind_and_color() {
        let layout = SheetLayout {
            cell: 4,
            ..SheetLayout::default()
        };
        let atlas = SpriteAtlas::from_image(&test_sheet(4), layout, None).unwrap();
        assert_eq!(atlas.iter().count(), 12);

        // column 0 is the king, row 1 is black
        let king = atlas.get(PieceKind::King, PieceColor::Black).unwrap();
        assert_eq!(king.image.dimensions(), (4, 4));
        assert_eq!(*king.image.get_pixel(3, 3), Rgba([0, 100, 7, 255]));

        // column 5 is the pawn, row 0 is white
        let pawn = atlas.get(PieceKind::Pawn, PieceColor::White).unwrap();
        assert_eq!(*pawn.image.get_pixel(0, 0), Rgba([200, 0, 7, 255]));
    }

    #[test]
    fn test_undersized_sheet_rejected() {
        let sheet = RgbaImage::new(479, 160);
        assert!(SpriteAtlas::from_image(&sheet, SheetLayout::default(), None).is_err());
        let sheet = RgbaImage::new(480, 159);
        assert!(SpriteAtlas::from_image(&sheet, SheetLayout::default(), None).is_err());
    }

    #[test]
    fn test_load_undersized_file_is_asset_load_error() {
        let dir = std::env::temp_dir().join("chessboard-gui-atlas-small");
        std::fs::create_dir_all(&dir).unwrap();
        RgbaImage::new(100, 40).save(dir.join("small.png")).unwrap();

        let assets = FileAssets::with_base(&dir);
        let result = SpriteAtlas::load(&assets, "small.png", SheetLayout::default(), None);
        assert!(matches!(result, Err(ChessboardError::AssetLoad { .. })));
    }

    #[test]
    fn test_load_missing_file_is_asset_load_error() {
        let assets = FileAssets::with_base(std::env::temp_dir());
        let result = SpriteAtlas::load(
            &assets,
            "chessboard-gui/missing-sheet.png",
            SheetLayout::default(),
            None,
        );
        assert!(matches!(result, Err(ChessboardError::AssetLoad { .. })));
    }

    #[test]
    fn test_unreadable_sheet_reports_read_error() {
        let dir = std::env::temp_dir().join("chessboard-gui-atlas-unreadable");
        std::fs::create_dir_all(dir.join("sheet.png")).unwrap();

        let assets = FileAssets::with_base(&dir);
        let result = SpriteAtlas::load(&assets, "sheet.png", SheetLayout::default(), None);
        match result {
            Err(ChessboardError::AssetLoad { reason, .. }) => {
                assert_ne!(reason, "file not found")
            }
            other => panic!("expected AssetLoad, got {other:?}"),
        }
    }

    #[test]
    fn test_sample_origin_color_key() {
        let mut sheet = test_sheet(4);
        // one pixel inside the white queen cell that differs from its origin
        sheet.put_pixel(4 + 2, 2, Rgba([1, 2, 3, 255]));
        let layout = SheetLayout {
            cell: 4,
            ..SheetLayout::default()
        };
        let atlas =
            SpriteAtlas::from_image(&sheet, layout, Some(ColorKey::SampleOrigin)).unwrap();

        let queen = atlas.get(PieceKind::Queen, PieceColor::White).unwrap();
        assert_eq!(queen.image.get_pixel(0, 0).0[3], 0);
        assert_eq!(*queen.image.get_pixel(2, 2), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_rgb_color_key() {
        let layout = SheetLayout {
            cell: 4,
            ..SheetLayout::default()
        };
        let atlas = SpriteAtlas::from_image(&test_sheet(4), layout, Some(ColorKey::Rgb([0, 0, 7])))
            .unwrap();
        let white_king = atlas.get(PieceKind::King, PieceColor::White).unwrap();
        assert!(white_king.image.pixels().all(|p| p.0[3] == 0));
        let white_queen = atlas.get(PieceKind::Queen, PieceColor::White).unwrap();
        assert!(white_queen.image.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_repeated_row_or_column_rejected() {
        let layout = SheetLayout {
            rows: [PieceColor::White, PieceColor::White],
            cell: 4,
            ..SheetLayout::default()
        };
        assert!(layout.validate().is_err());
        assert!(SpriteAtlas::from_image(&test_sheet(4), layout, None).is_err());

        let mut layout = SheetLayout {
            cell: 4,
            ..SheetLayout::default()
        };
        layout.columns[5] = PieceKind::Rook;
        assert!(layout.validate().is_err());
        assert!(SpriteAtlas::from_image(&test_sheet(4), layout, None).is_err());

        let layout = SheetLayout {
            rows: [PieceColor::Black, PieceColor::White],
            ..SheetLayout::default()
        };
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_color_key_setting() {
        let key: ColorKey = serde_json::from_str("-1").unwrap();
        assert_eq!(key, ColorKey::SampleOrigin);
        let key: ColorKey = serde_json::from_str("[255, 0, 255]").unwrap();
        assert_eq!(key, ColorKey::Rgb([255, 0, 255]));
        assert!(serde_json::from_str::<ColorKey>("3").is_err());
    }
}
