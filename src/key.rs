use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::Result;

/// Canonical identifier correlating telemetry with the track it describes.
///
/// Built from a locator the key is `scheme://host[:port]/path[?query]` with the
/// fragment and user-info dropped, default ports elided and query pairs sorted.
/// Two locators that only differ in those respects map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey(Arc<str>);

impl TrackKey {
    /// Opaque key used verbatim, for producers that do not deal in locators.
    pub fn new(raw: impl AsRef<str>) -> Self {
        TrackKey(Arc::from(raw.as_ref()))
    }

    pub fn from_locator(url: &Url) -> Self {
        TrackKey(Arc::from(canonicalize(url)))
    }

    pub fn parse(locator: &str) -> Result<Self> {
        let url = Url::parse(locator)?;
        Ok(Self::from_locator(&url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Url> for TrackKey {
    fn from(url: &Url) -> Self {
        TrackKey::from_locator(url)
    }
}

fn canonicalize(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    // Fails only for cannot-be-a-base urls, which carry no credentials anyway.
    let _ = canonical.set_username("");
    let _ = canonical.set_password(None);

    let mut pairs: Vec<(String, String)> = canonical
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if pairs.is_empty() {
        canonical.set_query(None);
    } else {
        pairs.sort();
        canonical
            .query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    canonical.into()
}
