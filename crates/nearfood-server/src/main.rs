use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use nearfood_server::{app, AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "nearfood-server", about = "NearFood storefront API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Seed the demo dataset on startup.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    let store = config.build_store();
    let payments = config.build_payments();
    let state = AppState::new(store, payments);

    if args.seed {
        let summary = nearfood_server::seed::run(&state.store)
            .await
            .context("seeding demo data")?;
        tracing::info!(restaurants = summary.restaurants, "seeded on startup");
    }

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    tracing::info!(addr = %args.bind, "listening");

    axum::serve(listener, app(state))
        .await
        .context("server exited")?;
    Ok(())
}
