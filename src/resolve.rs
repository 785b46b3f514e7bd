use url::Url;

/// Normalizes a candidate URL found in page markup to absolute form.
///
/// Already-absolute `http(s)` URLs pass through unchanged.
/// Protocol-relative URLs (`//cdn.example.com/x.jpg`) inherit `https:`.
/// Anything else is resolved against the origin (scheme + host, not the
/// full path) of the page the markup came from. Malformed input is returned
/// as-is rather than aborting the extraction that found it.
pub fn resolve_url(candidate: &str, base: &str) -> String {
    let candidate = candidate.trim();

    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return candidate.to_string();
    }
    if candidate.starts_with("//") {
        return format!("https:{}", candidate);
    }

    let Ok(base) = Url::parse(base) else {
        return candidate.to_string();
    };
    // "null" for opaque origins; the join below then fails and we fall back.
    let origin = base.origin().ascii_serialization();

    match Url::parse(&origin).and_then(|origin| origin.join(candidate)) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => candidate.to_string(),
    }
}
