//! Vocabulary, media types and header names used by OSLC servers

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const OSLC: &str = "http://open-services.net/ns/core#";
pub const OSLC_CONFIG: &str = "http://open-services.net/ns/config#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
pub const OSLC_SHORT_TITLE: &str = "http://open-services.net/ns/core#shortTitle";
pub const OSLC_SMALL_PREVIEW: &str = "http://open-services.net/ns/core#smallPreview";
pub const OSLC_DOCUMENT: &str = "http://open-services.net/ns/core#document";
pub const OSLC_HINT_WIDTH: &str = "http://open-services.net/ns/core#hintWidth";
pub const OSLC_HINT_HEIGHT: &str = "http://open-services.net/ns/core#hintHeight";
pub const OSLC_INSTANCE_SHAPE: &str = "http://open-services.net/ns/core#instanceShape";
pub const OSLC_SERVICE_PROVIDER: &str = "http://open-services.net/ns/core#serviceProvider";
pub const OSLC_CONFIG_COMPONENT: &str = "http://open-services.net/ns/config#component";

pub const MEDIA_TURTLE: &str = "text/turtle";
pub const MEDIA_RDF_XML: &str = "application/rdf+xml";
pub const MEDIA_COMPACT: &str = "application/x-oslc-compact+xml";

/// Default Accept for full resource reads.
pub const ACCEPT_RDF: &str = "application/rdf+xml;q=0.9,text/turtle;q=0.8";
/// Accept for preview reads: compact preferred over plain RDF.
pub const ACCEPT_PREVIEW: &str = "application/x-oslc-compact+xml;q=0.5,application/rdf+xml;q=0.4";

pub const HEADER_OSLC_CORE_VERSION: &str = "OSLC-Core-Version";
pub const OSLC_CORE_VERSION: &str = "2.0";

/// Jazz form-auth vendor header.
pub const HEADER_AUTH_MSG: &str = "x-com-ibm-team-repository-web-auth-msg";
pub const AUTH_MSG_REQUIRED: &str = "authrequired";
pub const AUTH_MSG_FAILED: &str = "authfailed";
