use pricescout_core::SearchQuery;
use pricescout_sources::{SourceDefinition, QUERY_PLACEHOLDER};
use url::Url;

/// Interpolate the percent-encoded query into the source's search URL.
pub fn build_search_url(definition: &SourceDefinition, query: &SearchQuery) -> String {
    definition
        .search_url_template
        .replace(QUERY_PLACEHOLDER, &urlencoding::encode(query.as_str()))
}

/// Turn a scraped link or image reference into an absolute http(s) URL.
///
/// Browsers already resolve `href`/`src`, but other engines may hand back the
/// raw attribute, so relative references are joined onto the page URL.
pub fn resolve_url(base: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let resolved = match Url::parse(reference) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(base).ok()?.join(reference).ok()?
        }
        Err(_) => return None,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
