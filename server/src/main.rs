use std::net::SocketAddr;

use miette::{Context, IntoDiagnostic, Result};
use rachael::{Config, Gateway};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod rpc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "server=info,rachael=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .into_diagnostic()
        .wrap_err("PORT must be a port number")?;

    let app = rpc::app(Gateway::new(&config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, model = config.model(), upstream = config.endpoint(), "listening");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .into_diagnostic()
        .wrap_err("Server stopped")?;

    Ok(())
}
