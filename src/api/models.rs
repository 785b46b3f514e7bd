use serde::{Deserialize, Serialize};

/// `url` is optional at the deserialization layer so a missing field maps
/// to the handler's "URL is required" response instead of a serde reject.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
}

/// Best-effort extraction result. Absent fields mean "not found", never an
/// error; callers are expected to treat sparse records as partial success.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ScrapedProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Declared in the shape but not populated by any current heuristic.
    #[serde(rename = "originalPrice", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub images: Vec<String>,
    /// Declared in the shape but not populated by any current heuristic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub product: ScrapedProduct,
}
