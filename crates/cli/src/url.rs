//! URL sanitation and query annotation performed before an audit starts.
//!
//! The annotated query string is how the standard identifier crosses the
//! navigation boundary into the page's bootstrap state.

use anyhow::{Context, Result};
use url::Url;

use a11y_core::Standard;
use a11y_core::script::STANDARD_PARAM;

/// Parses `raw` into an absolute URL, defaulting the scheme to `http://`
/// when none was given.
pub fn sanitize(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    Url::parse(&candidate).with_context(|| format!("invalid URL: {raw}"))
}

/// Appends the standard identifier to the URL's query string, preserving
/// any existing parameters.
pub fn with_standard(mut url: Url, standard: Standard) -> Url {
    url.query_pairs_mut()
        .append_pair(STANDARD_PARAM, &standard.to_string());
    url
}
