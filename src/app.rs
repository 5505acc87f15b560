//! Application setup: board preparation, window creation and headless snapshots.

use std::path::Path;

use anyhow::{Context as _, ensure};
use gpui::{App, Bounds, TitlebarOptions, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;

use crate::config::Config;
use crate::domain::pgn;
use crate::models::{PieceRegistry, reset_to_start};
use crate::ui::FileAssets;
use crate::ui::atlas::SpriteAtlas;
use crate::ui::canvas::{DisplayList, Framebuffer};
use crate::ui::render_loop::{FrameLimit, FramePacer, RenderLoop};
use crate::ui::theme::WINDOW_TITLE;
use crate::ui::views::ChessBoardView;

/// Sliced sprites plus a registry already laid out in the starting position
pub struct PreparedBoard {
    pub atlas: SpriteAtlas,
    pub registry: PieceRegistry,
}

/// Load the sprite sheet, populate the registry and lay out the pieces
pub fn prepare_board(config: &Config, assets: &FileAssets) -> anyhow::Result<PreparedBoard> {
    tracing::debug!(
        sprite_sheet = %config.sprite_sheet,
        resolved = ?assets.resolve(&config.sprite_sheet),
        "loading sprite sheet"
    );
    let atlas = SpriteAtlas::load(assets, &config.sprite_sheet, config.sheet, config.color_key)?;
    let mut registry = PieceRegistry::populate(&atlas);
    reset_to_start(&mut registry, &config.board_layout())
        .context("laying out the starting position")?;
    tracing::info!(pieces = registry.len(), "board ready");
    Ok(PreparedBoard { atlas, registry })
}

/// Log the first game of the configured PGN database. The board does not
/// depend on it, so failures are only warnings.
pub fn log_first_game(path: &Path) {
    match pgn::read_first_game(path) {
        Ok(Some(game)) => tracing::info!(
            event = game.tag("Event").unwrap_or("?"),
            white = game.tag("White").unwrap_or("?"),
            black = game.tag("Black").unwrap_or("?"),
            result = game.tag("Result").unwrap_or("*"),
            movetext_len = game.movetext.len(),
            "read first PGN game"
        ),
        Ok(None) => tracing::warn!(path = %path.display(), "PGN database has no games"),
        Err(e) => tracing::warn!("{e}"),
    }
}

/// Render a single frame headlessly and write it as PNG
pub fn render_snapshot(config: &Config, board: &PreparedBoard, path: &Path) -> anyhow::Result<()> {
    let side = config.board_layout().board_total_size();
    // a stale file must not pass for this run's output
    let _ = std::fs::remove_file(path);
    let mut render_loop = RenderLoop::new(
        Framebuffer::with_capture(side, side, path),
        config.board_layout(),
        config.palette(),
    );
    let mut pacer = FramePacer::new(config.frame_rate);
    let frames = render_loop.run(&mut FrameLimit::new(1), &board.registry, &mut pacer);

    ensure!(
        path.is_file(),
        "snapshot {} was not written",
        path.display()
    );
    tracing::info!(frames, path = %path.display(), "wrote snapshot");
    Ok(())
}

/// Open the board window and start the frame loop
pub fn run(cx: &mut App, config: Config, board: PreparedBoard) {
    gpui_component::init(cx);

    let layout = config.board_layout();
    let side = layout.board_total_size();
    let frame_interval = FramePacer::new(config.frame_rate).interval();
    let render_loop = RenderLoop::new(DisplayList::new(), layout, config.palette());

    let bounds = Bounds::centered(None, size(px(side as f32), px(side as f32)), cx);
    let opened = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some(WINDOW_TITLE.into()),
                ..Default::default()
            }),
            is_resizable: false,
            ..Default::default()
        },
        move |window, cx| {
            let PreparedBoard { atlas, registry } = board;
            let view = cx.new(|cx| {
                ChessBoardView::new(
                    registry,
                    &atlas,
                    render_loop,
                    side,
                    frame_interval,
                    window,
                    cx,
                )
            });
            cx.new(|cx| Root::new(view, window, cx))
        },
    );

    if let Err(e) = opened {
        tracing::error!("failed to open window: {e:#}");
        eprintln!("Failed to open window: {e:#}");
        std::process::exit(1);
    }
}
