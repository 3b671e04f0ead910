mod app_dir;
mod cli;
mod driver;
mod preferences;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use mandelzoom_render::{spawn_session, ZoomSession};

use cli::Cli;
use preferences::AppPreferences;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting MandelZoom");

    let mut prefs = AppPreferences::load();
    cli.apply(&mut prefs);

    match run(&prefs) {
        Ok(()) => {
            if cli.save_preferences {
                prefs.save();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(prefs: &AppPreferences) -> Result<(), mandelzoom_render::RenderError> {
    let session = ZoomSession::new(prefs.session.clone())?;
    let handle = spawn_session(session)?;
    let events = handle.subscribe()?;

    let summary = driver::run_zooms(&handle, &events, prefs.target, prefs.zooms)?;
    if prefs.replay_at_exit {
        driver::replay_all(&handle, &events)?;
    }

    let session = handle.shutdown()?;
    info!(
        zooms = summary.zooms_completed,
        hit_ceiling = summary.hit_ceiling,
        frames = session.frames().len(),
        magnification = session.magnification(),
        max_iterations = session.max_iterations(),
        "Done"
    );
    Ok(())
}
