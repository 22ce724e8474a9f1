//! OSLC client: authenticated reads plus query and mutation entry points

use crate::fetch::{AuthenticatingFetcher, FetchConfig, FetchError};
use crate::reader;
use crate::source::{ReadRequest, ReadResult, ResourceSource};
use oslc_browser_core::{Error, Resource, Result};
use tracing::{debug, warn};

pub struct OslcClient {
    fetcher: AuthenticatingFetcher,
}

impl OslcClient {
    pub fn new(config: FetchConfig) -> std::result::Result<Self, FetchError> {
        Ok(Self {
            fetcher: AuthenticatingFetcher::new(config)?,
        })
    }

    pub fn fetcher(&self) -> &AuthenticatingFetcher {
        &self.fetcher
    }

    /// Queries are answered by reading the `from` resource.
    pub async fn query(&self, from: &str) -> ReadResult {
        self.read(ReadRequest::full(from)).await
    }

    pub async fn create(&self, _resource_type: &str, _resource: &Resource) -> Result<Resource> {
        Err(Error::unsupported("create"))
    }

    pub async fn update(&self, _resource: &Resource) -> Result<()> {
        Err(Error::unsupported("update"))
    }

    pub async fn delete(&self, _uri: &str) -> Result<()> {
        Err(Error::unsupported("delete"))
    }
}

#[async_trait::async_trait]
impl ResourceSource for OslcClient {
    async fn read(&self, request: ReadRequest) -> ReadResult {
        debug!("read {} (preview: {})", request.uri, request.is_preview());
        let response = match self.fetcher.fetch(&request.uri, &request.headers).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not fetch {}: {}", request.uri, e);
                return Err(e.into());
            }
        };
        reader::interpret(&request.uri, &response)
    }
}
