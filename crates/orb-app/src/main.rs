use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use orb_core::draw::CanvasSize;

pub mod app;
pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Logging : le TUI occupe stdout, donc stderr ou fichier
    let mut logger = env_logger::Builder::new();
    logger.filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn));
    if let Some(ref path) = cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Impossible de créer le log {}", path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    // 3. Paramètres initiaux
    let params = cli.initial_params();
    log::info!("Paramètres initiaux : {params:?}");

    // 4. Source de frames
    let handle = pipeline::start_source(&cli)?;

    // 5. App (avant le terminal : une erreur ici laisse le terminal intact)
    let canvas = CanvasSize::new(cli.canvas_width, cli.canvas_height);
    let mut app_instance = app::App::new(handle, params, canvas, cli.fps)?;

    // 6. Terminal ratatui
    let terminal = ratatui::init();

    // 7. Boucle principale
    let result = app_instance.run(terminal);

    // 8. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}
