use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use product_scraper::{
    config::Config,
    api::routes::create_router,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_scraper=info,tower_http=info")),
        )
        .init();

    let config = Config::load()?;
    let server_addr = config.server_addr;

    let app = create_router();

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!(%server_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
