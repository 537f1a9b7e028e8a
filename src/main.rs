//! # Matrix Board Application Entry Point
//!
//! Wires configuration, data sources, the panel driver and the control API
//! into a running board. Production frames go to a raw frame sink read by
//! the hardware bridge; `--stdout` previews them in a truecolor terminal.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use matrix_board_lib::canvas::Canvas;
use matrix_board_lib::config::{self, Config};
use matrix_board_lib::control::{ControlSurface, ScreenCommand};
use matrix_board_lib::controller::{DisplayController, Sources};
use matrix_board_lib::panel::{FrameSinkPanel, NullPanel, PanelDriver, TerminalPanel};
use matrix_board_lib::server::{build_router, run_server};
use matrix_board_lib::sources::{http_client, StandingsSource, TransitSource, WeatherSource};
use matrix_board_lib::state::DisplayHandle;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(name = "matrix-board", version, about = "Weather, standings and transit on a 64x32 LED matrix")]
struct Cli {
    /// Configuration file [default: matrix-board.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Preview frames in the terminal instead of driving the panel
    #[arg(long)]
    stdout: bool,

    /// Write raw RGB frames to this file or FIFO
    #[arg(long, value_name = "PATH", conflicts_with = "stdout")]
    frame_sink: Option<PathBuf>,

    /// Do not start the HTTP control API
    #[arg(long)]
    no_server: bool,

    /// Screen to show first (weather, standings, transit)
    #[arg(long, value_name = "NAME")]
    screen: Option<String>,

    /// Start with auto-rotate off
    #[arg(long)]
    no_rotate: bool,

    /// Write the effective configuration to --config and exit
    #[arg(long)]
    init_config: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn panel_driver(cli: &Cli, config: &Config) -> Result<Box<dyn PanelDriver>> {
    let panel = &config.panel;
    if let Some(path) = &cli.frame_sink {
        log::info!(
            "Writing {}x{} frames to {} ({:?}, {}% brightness)",
            panel.width,
            panel.height,
            path.display(),
            panel.channel_order,
            panel.brightness
        );
        let sink = FrameSinkPanel::open(path, panel.width, panel.height, panel.brightness, panel.channel_order)
            .with_context(|| format!("opening frame sink {}", path.display()))?;
        return Ok(Box::new(sink));
    }
    if cli.stdout {
        return Ok(Box::new(TerminalPanel::stdout()));
    }
    log::warn!("No panel output selected (--frame-sink or --stdout), frames are discarded");
    Ok(Box::new(NullPanel))
}

/// Resolves on SIGINT or SIGTERM.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).context("installing SIGINT handler")?;
    let mut sigterm = signal(SignalKind::terminate()).context("installing SIGTERM handler")?;
    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => log::info!("SIGINT received. Initiating graceful shutdown."),
            _ = sigterm.recv() => log::info!("SIGTERM received. Initiating graceful shutdown."),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("Ctrl-C received. Initiating graceful shutdown."),
            Err(err) => {
                log::error!("Ctrl-C handler failed: {}", err);
                std::future::pending::<()>().await;
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }))
        .format_timestamp_secs()
        .init();

    log::info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if cli.init_config {
        let path = cli.config.clone().unwrap_or_else(|| PathBuf::from(config::DEFAULT_PATH));
        config.save_to_path(&path)?;
        return Ok(());
    }

    let display = DisplayHandle::new(config.initial_state());
    let control = ControlSurface::new(display.clone());
    if cli.screen.is_some() || cli.no_rotate {
        control.set_screen_selection(&ScreenCommand {
            screen: cli.screen.clone(),
            auto_rotate: cli.no_rotate.then_some(false),
        });
    }

    let canvas = Canvas::new(config.panel.width, config.panel.height, panel_driver(&cli, &config)?);

    let schedule = config.schedule();
    let client = http_client(schedule.fetch_timeout)?;
    let season = config.standings.season();
    log::info!("Standings season {}", season);
    let sources = Sources {
        weather: WeatherSource::new(client.clone(), &config.weather.location),
        standings: StandingsSource::new(
            client.clone(),
            config.standings.league_id,
            config.standings.division_id,
            season,
        ),
        transit: TransitSource::new(
            client,
            &config.transit.system,
            &config.transit.stop_id,
            config.departure_filter(),
            config.transit.use_proxy,
        ),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let server = if config.server.enabled && !cli.no_server {
        let listener = TcpListener::bind(&config.server.bind)
            .await
            .with_context(|| format!("binding control API to {}", config.server.bind))?;
        let app = build_router(control, config.server.max_body_bytes);
        let mut stop = shutdown_rx.clone();
        Some(tokio::spawn(run_server(listener, app, async move {
            let _ = stop.wait_for(|stopping| *stopping).await;
        })))
    } else {
        log::info!("Control API disabled");
        None
    };

    let signal = shutdown_signal()?;
    let signal_tx = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        signal.await;
        let _ = signal_tx.send(true);
    });

    let controller = DisplayController::new(
        canvas,
        display,
        config.screens(),
        sources,
        schedule,
        config.policies(),
    );
    let outcome = tokio::spawn(controller.run(shutdown_rx))
        .await
        .context("display controller task failed")?;

    // The controller only returns early on a panel failure; stop the server too
    let _ = shutdown_tx.send(true);
    if let Some(server) = server {
        server.await.context("control server task failed")??;
    }

    outcome.context("panel output failed")?;
    log::info!("Shutdown complete");
    Ok(())
}
