use anyhow::Context;
use axum::Router;
use kblog_core::{api, app, config};
use std::net::SocketAddr;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kblog_telemetry::init();

    let (cfg, cfg_path) = config::Config::load().context("loading kblog config")?;
    info!(?cfg_path, model = %cfg.generation.model, "config loaded");

    let addr: SocketAddr = cfg.server.bind.parse().context("invalid server bind address")?;
    let state = app::AppState::new(cfg)?;
    let router: Router = api::build_router(state);

    info!(%addr, version = env!("CARGO_PKG_VERSION"), "kblog-core listening");

    let server = axum::serve(tokio::net::TcpListener::bind(addr).await?, router);
    let graceful = server.with_graceful_shutdown(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("ctrl-c received; shutting down");
    });

    if let Err(e) = graceful.await {
        error!(error = %e, "server error");
    }

    Ok(())
}
