use std::net::SocketAddr;

use clap::Parser;
use eyre::Result;
use log::info;

use subtrans::config::Config;
use subtrans::server::{AppState, router};

#[derive(Parser)]
#[command(
    name = "subtrans-server",
    about = "HTTP API for subtitle fetching with placeholder fallback",
    version,
)]
struct ServerCli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8787")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = ServerCli::parse();
    let config = Config::load().unwrap_or_default();
    let client = subtrans::build_client(config.request_timeout_secs)?;

    info!("Subtitle provider: {}", config.subtitle_api_url);
    let state = AppState::new(client, config);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!("Listening on {}", cli.listen);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
