//! Heuristic extraction of a product record from raw page markup.
//!
//! Each field is populated by an independent pass with its own precedence
//! and fallback rules; a pass that finds nothing leaves its field absent
//! and never affects the others.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::api::models::ScrapedProduct;
use crate::resolve::resolve_url;

const MAX_IMAGES: usize = 10;
/// Meta descriptions shorter than this trigger the content-block fallback.
const META_DESCRIPTION_MIN_CHARS: usize = 50;
/// Resolved image URLs at or under this length are treated as tracking
/// pixels or decorative assets and dropped.
const MIN_IMAGE_URL_CHARS: usize = 20;

const IMAGE_NOISE_NEEDLES: &[&str] = &["logo", "icon", "sprite", "placeholder"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Failed to parse selector")
}

static TITLE_SEL: Lazy<Selector> = Lazy::new(|| selector("title"));
static META_TITLE_SEL: Lazy<Selector> = Lazy::new(|| {
    selector(r#"meta[property="og:title"], meta[property="twitter:title"]"#)
});
static H1_SEL: Lazy<Selector> = Lazy::new(|| selector("h1"));

static META_NAME_DESC_SEL: Lazy<Selector> = Lazy::new(|| {
    selector(
        r#"meta[name="description"], meta[name="og:description"], meta[name="twitter:description"]"#,
    )
});
static META_PROP_DESC_SEL: Lazy<Selector> = Lazy::new(|| {
    selector(r#"meta[property="og:description"], meta[property="twitter:description"]"#)
});
// Product-qualified variants first so the most specific block wins ties on
// scan order; a candidate still has to be strictly longer to replace.
static CONTENT_BLOCK_SELS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        r#"div[class*="product"][class*="description"]"#,
        r#"section[class*="product"][class*="description"]"#,
        r#"div[class*="description"]"#,
        r#"section[class*="description"]"#,
        r#"p[class*="description"]"#,
    ]
    .iter()
    .map(|css| selector(css))
    .collect()
});

static META_IMAGE_SEL: Lazy<Selector> = Lazy::new(|| {
    selector(r#"meta[property="og:image"], meta[property="twitter:image"]"#)
});
static IMG_SEL: Lazy<Selector> = Lazy::new(|| selector("img[src]"));

// Trailing "separator + storefront tagline" suffixes commerce sites append
// to titles. Everything from the separator onward goes.
static SITE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*[-–—|]\s*(?:buy online|shop now|online store|online shopping|best price|free shipping)\b.*$",
    )
    .expect("Failed to compile site suffix pattern")
});
static TRAILING_SEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*[-–—|]\s*$").expect("Failed to compile trailing separator pattern")
});
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace pattern"));

// Tried strictly in order; only the first textual match of each pattern is
// considered before moving on to the next.
static PRICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\$\s*([0-9][0-9,]*(?:\.[0-9]+)?)",
        r"₹\s*([0-9][0-9,]*(?:\.[0-9]+)?)",
        r"€\s*([0-9][0-9,]*(?:\.[0-9]+)?)",
        r"£\s*([0-9][0-9,]*(?:\.[0-9]+)?)",
        r#"(?i)"[^"]*price[^"]*"\s*:\s*"?([0-9][0-9,]*(?:\.[0-9]+)?)"#,
        r#"(?i)"[^"]*amount[^"]*"\s*:\s*"?([0-9][0-9,]*(?:\.[0-9]+)?)"#,
        r"(?i)price[^<>]*>\s*[$₹€£]?\s*([0-9][0-9,]*(?:\.[0-9]+)?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile price pattern"))
    .collect()
});

/// Runs every extraction pass over the fetched markup. Infallible: a field
/// with no plausible value is simply left absent.
pub fn extract_product(html: &str, base_url: &str) -> ScrapedProduct {
    let document = Html::parse_document(html);

    ScrapedProduct {
        title: extract_title(&document),
        description: extract_description(&document),
        price: extract_price(html),
        // Declared in the output shape but not populated by any current
        // heuristic; kept as placeholders pending product guidance.
        original_price: None,
        currency: None,
        images: extract_images(&document, base_url),
    }
}

/// `<title>`, then `og:title`/`twitter:title`, then the first `<h1>`.
/// Empty or whitespace-only candidates fall through to the next source.
fn extract_title(document: &Html) -> Option<String> {
    let candidates = [
        document.select(&TITLE_SEL).next().map(element_text),
        document
            .select(&META_TITLE_SEL)
            .next()
            .and_then(content_attr),
        document.select(&H1_SEL).next().map(element_text),
    ];

    let raw = candidates
        .into_iter()
        .flatten()
        .find(|c| !c.trim().is_empty())?;

    let title = strip_site_suffix(&collapse_whitespace(&raw));
    (!title.is_empty()).then_some(title)
}

fn strip_site_suffix(title: &str) -> String {
    let title = SITE_SUFFIX_RE.replace(title, "");
    let title = TRAILING_SEP_RE.replace(&title, "");
    title.trim().to_string()
}

/// Longest-wins across both meta tag spellings; content blocks are scanned
/// only when the metas under-deliver (absent or under 50 chars), since they
/// are noisier and more expensive.
fn extract_description(document: &Html) -> Option<String> {
    let mut best = String::new();

    let metas = document
        .select(&META_NAME_DESC_SEL)
        .chain(document.select(&META_PROP_DESC_SEL));
    for element in metas {
        if let Some(content) = element.value().attr("content") {
            if char_len(content) > char_len(&best) {
                best = content.to_string();
            }
        }
    }

    if char_len(best.trim()) < META_DESCRIPTION_MIN_CHARS {
        for sel in CONTENT_BLOCK_SELS.iter() {
            for element in document.select(sel) {
                let text = collapse_whitespace(&element_text(element));
                if char_len(&text) > char_len(&best) {
                    best = text;
                }
            }
        }
    }

    let best = best.trim().to_string();
    (!best.is_empty()).then_some(best)
}

/// First pattern whose first match parses to a positive number wins. No
/// attempt is made to tell sale and original prices apart.
fn extract_price(html: &str) -> Option<f64> {
    for pattern in PRICE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(html) {
            let raw = caps[1].replace(',', "");
            if let Ok(value) = raw.parse::<f64>() {
                if value.is_finite() && value > 0.0 {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// `og:image`/`twitter:image` metas first, then `<img>` tags, all in
/// document order; deduplicated keeping the first occurrence, capped at 10.
/// Only `<img>` candidates go through the noise filter.
fn extract_images(document: &Html, base_url: &str) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();

    for element in document.select(&META_IMAGE_SEL) {
        if let Some(content) = element.value().attr("content") {
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            push_unique(&mut images, resolve_url(content, base_url));
        }
    }

    for element in document.select(&IMG_SEL) {
        if let Some(src) = element.value().attr("src") {
            let src = src.trim();
            if src.is_empty() {
                continue;
            }
            let resolved = resolve_url(src, base_url);
            if is_noise_image(&resolved) {
                continue;
            }
            push_unique(&mut images, resolved);
        }
    }

    images.truncate(MAX_IMAGES);
    images
}

fn is_noise_image(url: &str) -> bool {
    if char_len(url) <= MIN_IMAGE_URL_CHARS {
        return true;
    }
    let lower = url.to_lowercase();
    IMAGE_NOISE_NEEDLES.iter().any(|needle| lower.contains(needle))
}

fn push_unique(images: &mut Vec<String>, url: String) {
    if !images.contains(&url) {
        images.push(url);
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect()
}

fn content_attr(element: ElementRef) -> Option<String> {
    element.value().attr("content").map(str::to_string)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://shop.example.com/p/123";

    fn product(html: &str) -> ScrapedProduct {
        extract_product(html, BASE)
    }

    #[test]
    fn title_from_title_tag_with_suffix_stripped() {
        let p = product("<html><head><title>Classic Bomber Jacket – Buy Online | ShopX</title></head></html>");
        assert_eq!(p.title.as_deref(), Some("Classic Bomber Jacket"));
    }

    #[test]
    fn title_trailing_bare_separator_trimmed() {
        let p = product("<title>Wool Scarf |</title>");
        assert_eq!(p.title.as_deref(), Some("Wool Scarf"));
    }

    #[test]
    fn title_without_suffix_kept_verbatim() {
        let p = product("<title>Leather Belt | ShopX</title>");
        assert_eq!(p.title.as_deref(), Some("Leather Belt | ShopX"));
    }

    #[test]
    fn title_prefers_title_tag_over_og_and_h1() {
        let p = product(concat!(
            "<title>From Title</title>",
            r#"<meta property="og:title" content="From OG">"#,
            "<h1>From H1</h1>",
        ));
        assert_eq!(p.title.as_deref(), Some("From Title"));
    }

    #[test]
    fn empty_title_tag_falls_through_to_og_title() {
        let p = product(concat!(
            "<title>  </title>",
            r#"<meta property="og:title" content="Silk Tie">"#,
        ));
        assert_eq!(p.title.as_deref(), Some("Silk Tie"));
    }

    #[test]
    fn title_falls_back_to_h1_with_nested_tags_stripped() {
        let p = product("<body><h1>Canvas <em>Tote</em> Bag</h1></body>");
        assert_eq!(p.title.as_deref(), Some("Canvas Tote Bag"));
    }

    #[test]
    fn title_entities_are_decoded() {
        let p = product("<title>Salt &amp; Pepper Mill</title>");
        assert_eq!(p.title.as_deref(), Some("Salt & Pepper Mill"));
    }

    #[test]
    fn title_absent_when_no_source_present() {
        let p = product("<body><p>nothing here</p></body>");
        assert_eq!(p.title, None);
    }

    #[test]
    fn description_from_og_meta() {
        let p = product(
            r#"<meta property="og:description" content="Premium leather jacket, handcrafted.">"#,
        );
        assert_eq!(
            p.description.as_deref(),
            Some("Premium leather jacket, handcrafted.")
        );
    }

    #[test]
    fn description_longest_meta_wins() {
        let p = product(concat!(
            r#"<meta name="description" content="Short blurb.">"#,
            r#"<meta property="og:description" content="A considerably longer and more useful description of the product.">"#,
        ));
        assert_eq!(
            p.description.as_deref(),
            Some("A considerably longer and more useful description of the product.")
        );
    }

    #[test]
    fn short_meta_triggers_content_block_fallback() {
        let p = product(concat!(
            r#"<meta name="description" content="Terse.">"#,
            r#"<div class="product-description">Hand-stitched from full-grain leather with a quilted "#,
            "lining and two interior pockets.</div>",
        ));
        assert_eq!(
            p.description.as_deref(),
            Some("Hand-stitched from full-grain leather with a quilted lining and two interior pockets.")
        );
    }

    #[test]
    fn long_meta_suppresses_content_block_fallback() {
        let long_meta = "This meta description is comfortably over the fifty character gate.";
        let p = product(&format!(
            concat!(
                r#"<meta name="description" content="{}">"#,
                r#"<div class="description">{}</div>"#,
            ),
            long_meta,
            "x".repeat(400),
        ));
        assert_eq!(p.description.as_deref(), Some(long_meta));
    }

    #[test]
    fn content_block_text_is_tag_stripped_and_collapsed() {
        let p = product(
            "<div class=\"description\">A <b>bold</b> claim\n   spread across\n lines that runs well past fifty characters total.</div>",
        );
        assert_eq!(
            p.description.as_deref(),
            Some("A bold claim spread across lines that runs well past fifty characters total.")
        );
    }

    #[test]
    fn price_first_dollar_match_in_document_order() {
        let p = product("<span>$49.99</span><del>$59.99</del>");
        assert_eq!(p.price, Some(49.99));
    }

    #[test]
    fn price_strips_thousands_separators() {
        let p = product("<span>$1,299.50</span>");
        assert_eq!(p.price, Some(1299.5));
    }

    #[test]
    fn price_currency_symbols_tried_in_order() {
        let p = product("<span>€15.00</span><span>£12.00</span>");
        assert_eq!(p.price, Some(15.0));
    }

    #[test]
    fn price_zero_match_does_not_shadow_later_patterns() {
        // $0.00 is the first (and only) $ match; the pattern yields no valid
        // value so the scan moves on to the next currency, not the next $.
        let p = product("<span>$0.00</span><span>$20.00</span><span>€8.50</span>");
        assert_eq!(p.price, Some(8.5));
    }

    #[test]
    fn price_from_json_price_key() {
        let p = product(r#"<script>{"salePrice": "89.99"}</script>"#);
        assert_eq!(p.price, Some(89.99));
    }

    #[test]
    fn price_from_rupee_symbol() {
        let p = product(r#"<span class="product-price">₹1,299</span>"#);
        assert_eq!(p.price, Some(1299.0));
    }

    #[test]
    fn price_from_labelled_markup_without_symbol() {
        let p = product(r#"<span class="price">49.99</span>"#);
        assert_eq!(p.price, Some(49.99));
    }

    #[test]
    fn price_absent_when_nothing_plausible() {
        let p = product("<p>Contact us for pricing</p>");
        assert_eq!(p.price, None);
    }

    #[test]
    fn original_price_and_currency_stay_unpopulated() {
        let p = product(r#"<span>$49.99</span><meta property="og:title" content="X">"#);
        assert_eq!(p.original_price, None);
        assert_eq!(p.currency, None);
    }

    #[test]
    fn images_meta_first_then_imgs_resolved_and_deduped() {
        let p = product(concat!(
            r#"<meta property="og:image" content="/images/product1.jpg">"#,
            r#"<img src="https://shop.example.com/images/product1.jpg">"#,
            r#"<img src="/images/product2.jpg">"#,
        ));
        assert_eq!(
            p.images,
            vec![
                "https://shop.example.com/images/product1.jpg",
                "https://shop.example.com/images/product2.jpg",
            ]
        );
    }

    #[test]
    fn img_noise_substrings_rejected() {
        let p = product(concat!(
            r#"<img src="/assets/site-logo.png">"#,
            r#"<img src="/assets/cart-icon.svg">"#,
            r#"<img src="/assets/css-sprite.png">"#,
            r#"<img src="/assets/placeholder-photo.jpg">"#,
            r#"<img src="/images/gallery/product-front.jpg">"#,
        ));
        assert_eq!(
            p.images,
            vec!["https://shop.example.com/images/gallery/product-front.jpg"]
        );
    }

    #[test]
    fn tiny_img_urls_rejected() {
        let p = product(r#"<img src="https://t.co/1.gif">"#);
        assert!(p.images.is_empty());
    }

    #[test]
    fn noise_filter_skips_meta_images() {
        // The filter is an <img>-only heuristic; og:image content is trusted.
        let p = product(r#"<meta property="og:image" content="/images/brand-logo-shot.jpg">"#);
        assert_eq!(
            p.images,
            vec!["https://shop.example.com/images/brand-logo-shot.jpg"]
        );
    }

    #[test]
    fn images_capped_at_ten() {
        let imgs: String = (0..15)
            .map(|i| format!(r#"<img src="/images/gallery/product-{i:02}.jpg">"#))
            .collect();
        let p = product(&imgs);
        assert_eq!(p.images.len(), 10);
        assert_eq!(p.images[0], "https://shop.example.com/images/gallery/product-00.jpg");
        assert_eq!(p.images[9], "https://shop.example.com/images/gallery/product-09.jpg");
    }

    #[test]
    fn protocol_relative_og_image_inherits_https() {
        let p = product(r#"<meta property="og:image" content="//cdn.example.com/p/product-1.jpg">"#);
        assert_eq!(p.images, vec!["https://cdn.example.com/p/product-1.jpg"]);
    }

    #[test]
    fn passes_are_independent() {
        // No title anywhere; the other passes still populate.
        let p = product(concat!(
            r#"<meta property="og:description" content="A described but untitled product, still over fifty chars.">"#,
            "<span>$12.00</span>",
        ));
        assert_eq!(p.title, None);
        assert!(p.description.is_some());
        assert_eq!(p.price, Some(12.0));
    }
}
