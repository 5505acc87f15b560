mod app;
mod config;
mod domain;
mod models;
mod ui;

use std::path::Path;

use gpui::{App, Application};

use crate::config::{CONFIG_FILE, Config};
use crate::ui::FileAssets;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chessboard_gui=info".into()),
        )
        .init();

    if let Err(e) = try_main() {
        tracing::error!("startup failed: {e:#}");
        eprintln!("Failed to start: {e:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let config = Config::load(Path::new(CONFIG_FILE))?;
    let assets = FileAssets::new();
    let board = app::prepare_board(&config, &assets)?;

    if let Some(path) = &config.pgn_path {
        app::log_first_game(path);
    }

    if let Some(path) = config.snapshot_path.clone() {
        return app::render_snapshot(&config, &board, &path);
    }

    Application::new()
        .with_assets(assets)
        .run(move |cx: &mut App| app::run(cx, config, board));
    Ok(())
}
