//! OSLC browser client - authenticating fetcher, RDF reader and resource sources

pub mod client;
pub mod fetch;
pub mod reader;
pub mod source;

pub use client::OslcClient;
pub use fetch::{
    AuthenticatingFetcher, Credentials, FetchConfig, FetchError, FetchResponse, DEFAULT_RELAY_BASE,
};
pub use source::{ReadRequest, ReadResult, ResourceSource};
