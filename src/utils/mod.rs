//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Resolve a relative path against an API base URL (which ends in `/`).
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    Ok(base.join(path.trim_start_matches('/'))?)
}

/// Resolve a path and append query pairs.
pub fn endpoint_with_query<'a>(
    base: &Url,
    path: &str,
    pairs: impl IntoIterator<Item = (&'a str, String)>,
) -> Result<Url> {
    let mut url = endpoint(base, path)?;
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, &value);
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url)
}
