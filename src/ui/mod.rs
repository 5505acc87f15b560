pub mod assets;
pub mod atlas;
pub mod board_layout;
pub mod canvas;
pub mod render_loop;
pub mod theme;
pub mod views;

pub use assets::FileAssets;
