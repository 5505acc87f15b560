//! Application configuration, read from an optional JSON file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ChessboardError;
use crate::ui::atlas::{ColorKey, SheetLayout};
use crate::ui::board_layout::{BoardLayout, Orientation};
use crate::ui::theme::{DARK_SQUARE, FRAME_RATE, LIGHT_SQUARE, Palette, Rgb, SQUARE_SIZE};

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "chessboard.json";

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Edge length of one board square in pixels
    pub square_size: u32,
    pub orientation: Orientation,
    /// Sprite sheet path, relative to the executable or working directory
    pub sprite_sheet: String,
    pub sheet: SheetLayout,
    pub color_key: Option<ColorKey>,
    /// Target frames per second
    pub frame_rate: u32,
    pub light_square: Rgb,
    pub dark_square: Rgb,
    /// PGN database whose first game is read at startup
    pub pgn_path: Option<PathBuf>,
    /// Render one frame to this PNG and exit instead of opening a window
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ChessboardError> {
        let config_error = |reason: String| ChessboardError::Config {
            path: path.to_path_buf(),
            reason,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))?;
        if config.square_size == 0 {
            return Err(config_error("square size must be non-zero".to_string()));
        }
        config.sheet.validate().map_err(config_error)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn board_layout(&self) -> BoardLayout {
        BoardLayout::new(self.square_size, self.orientation)
    }

    pub fn palette(&self) -> Palette {
        Palette {
            light: self.light_square,
            dark: self.dark_square,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            square_size: SQUARE_SIZE,
            orientation: Orientation::WhiteBottom,
            sprite_sheet: "img/Chess_Pieces_Sprite.png".to_string(),
            sheet: SheetLayout::default(),
            color_key: None,
            frame_rate: FRAME_RATE,
            light_square: LIGHT_SQUARE,
            dark_square: DARK_SQUARE,
            pgn_path: None,
            snapshot_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PieceColor, PieceKind};

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.square_size, 80);
        assert_eq!(config.frame_rate, 15);
        assert_eq!(config.board_layout().board_total_size(), 640);
        assert_eq!(config.sheet.required_size(), (480, 160));
        assert_eq!(config.sheet.columns[0], PieceKind::King);
        assert_eq!(config.sheet.columns[5], PieceKind::Pawn);
        assert_eq!(config.palette(), Palette::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("chessboard-gui-no-config.json");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.sprite_sheet, "img/Chess_Pieces_Sprite.png");
    }

    #[test]
    fn partial_file_overrides_fields() {
        let json = r#"{
            "orientation": "black_bottom",
            "color_key": -1,
            "dark_square": [10, 20, 30],
            "sheet": { "rows": ["black", "white"] }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.orientation, Orientation::BlackBottom);
        assert_eq!(config.color_key, Some(ColorKey::SampleOrigin));
        assert_eq!(config.dark_square, Rgb(10, 20, 30));
        assert_eq!(config.sheet.rows, [PieceColor::Black, PieceColor::White]);
        assert_eq!(config.sheet.cell, 80);
        assert_eq!(config.square_size, 80);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let path = std::env::temp_dir().join("chessboard-gui-bad-config.json");
        std::fs::write(&path, r#"{ "square_size": "big" }"#).unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ChessboardError::Config { .. })
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn zero_square_size_rejected() {
        let path = std::env::temp_dir().join("chessboard-gui-zero-config.json");
        std::fs::write(&path, r#"{ "square_size": 0 }"#).unwrap();
        assert!(Config::load(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn repeated_sheet_row_is_config_error() {
        let path = std::env::temp_dir().join("chessboard-gui-dup-row-config.json");
        std::fs::write(&path, r#"{ "sheet": { "rows": ["white", "white"] } }"#).unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ChessboardError::Config { .. })
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn repeated_sheet_column_is_config_error() {
        let path = std::env::temp_dir().join("chessboard-gui-dup-column-config.json");
        std::fs::write(
            &path,
            r#"{ "sheet": { "columns": ["king", "queen", "bishop", "knight", "rook", "rook"] } }"#,
        )
        .unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ChessboardError::Config { .. })
        ));
        let _ = std::fs::remove_file(&path);
    }
}
