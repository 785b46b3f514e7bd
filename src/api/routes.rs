use axum::{
    routing::post,
    Router,
    extract::Json,
};
use tower_http::cors::{CorsLayer, Any};

use crate::error::{AppError, Result};
use crate::api::models::{ScrapeRequest, ScrapeResponse};
use crate::extractor::extract_product;
use crate::fetcher::fetch_html;

/// The service is stateless between requests, so the router carries no
/// shared state. The CORS layer answers OPTIONS preflights and stamps
/// permissive headers on every response.
pub fn create_router() -> Router {
    Router::new()
        .route("/api/scrape", post(scrape_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn scrape_handler(Json(req): Json<ScrapeRequest>) -> Result<Json<ScrapeResponse>> {
    let url = req
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(AppError::MissingUrl)?;

    tracing::info!(%url, "scraping product page");
    let started = std::time::Instant::now();

    let html = fetch_html(url).await?;
    let product = extract_product(&html, url);

    tracing::info!(
        %url,
        elapsed_ms = started.elapsed().as_millis() as u64,
        title_found = product.title.is_some(),
        price_found = product.price.is_some(),
        image_count = product.images.len(),
        "scrape complete"
    );

    Ok(Json(ScrapeResponse { product }))
}
