//! Resource source trait

use oslc_browser_core::{vocab, Resource};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

/// Result of a read: a resource, or an error carrying its numeric code.
pub type ReadResult = oslc_browser_core::Result<Resource>;

/// A read request: target URI plus headers merged over the fetcher defaults.
#[derive(Clone, Debug)]
pub struct ReadRequest {
    pub uri: String,
    pub headers: HeaderMap,
}

impl ReadRequest {
    /// Read the full resource with the default RDF Accept header.
    pub fn full(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Read the compact preview, accepting plain RDF from servers without one.
    pub fn preview(uri: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(vocab::ACCEPT_PREVIEW));
        headers.insert(
            HeaderName::from_static("oslc-core-version"),
            HeaderValue::from_static(vocab::OSLC_CORE_VERSION),
        );
        Self {
            uri: uri.into(),
            headers,
        }
    }

    /// Same headers, different target.
    pub fn retarget(&self, uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: self.headers.clone(),
        }
    }

    pub fn is_preview(&self) -> bool {
        self.headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(vocab::MEDIA_COMPACT))
    }
}

impl From<&str> for ReadRequest {
    fn from(uri: &str) -> Self {
        Self::full(uri)
    }
}

/// Anything that can read OSLC resources.
#[async_trait::async_trait]
pub trait ResourceSource: Send + Sync {
    async fn read(&self, request: ReadRequest) -> ReadResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_request_prefers_compact() {
        let req = ReadRequest::preview("https://x/r");
        assert!(req.is_preview());
        assert_eq!(
            req.headers.get(ACCEPT).unwrap(),
            "application/x-oslc-compact+xml;q=0.5,application/rdf+xml;q=0.4"
        );
        assert_eq!(req.headers.get("OSLC-Core-Version").unwrap(), "2.0");
    }

    #[test]
    fn full_request_uses_fetcher_defaults() {
        let req: ReadRequest = "https://x/r".into();
        assert!(req.headers.is_empty());
        assert!(!req.is_preview());
    }

    #[test]
    fn retarget_keeps_headers() {
        let req = ReadRequest::preview("https://x/r").retarget("https://proxy/x");
        assert_eq!(req.uri, "https://proxy/x");
        assert!(req.is_preview());
    }
}
