//! Turns fetched responses into resources
//!
//! Turtle is chosen by content type or a `.ttl` suffix, RDF/XML otherwise.
//! The compact media type yields a compact resource. Every failure is mapped
//! to a core [`Error`]; parser errors never escape raw.

use crate::fetch::FetchResponse;
use oslc_browser_core::types::blank_key;
use oslc_browser_core::{vocab, Error, Graph, Resource, ResourceKind, Result, Value};
use oxrdf::{Subject, Term};
use oxrdfio::{RdfFormat, RdfParser};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Syntax {
    Turtle,
    RdfXml,
}

impl Syntax {
    fn format(self) -> RdfFormat {
        match self {
            Self::Turtle => RdfFormat::Turtle,
            Self::RdfXml => RdfFormat::RdfXml,
        }
    }
}

pub fn select_syntax(content_type: Option<&str>, uri: &str) -> Syntax {
    let turtle_type = content_type.is_some_and(|ct| ct.starts_with(vocab::MEDIA_TURTLE));
    if turtle_type || uri.ends_with(".ttl") {
        Syntax::Turtle
    } else {
        Syntax::RdfXml
    }
}

pub fn select_kind(content_type: Option<&str>) -> ResourceKind {
    match content_type {
        Some(ct) if ct.starts_with(vocab::MEDIA_COMPACT) => ResourceKind::Compact,
        _ => ResourceKind::Full,
    }
}

/// Interpret the response to a read of `uri`.
pub fn interpret(uri: &str, response: &FetchResponse) -> Result<Resource> {
    if response.status != 200 {
        debug!("Read of {} returned status {}", uri, response.status);
        return Err(Error::Status(response.status));
    }
    if response.auth_msg() == Some(vocab::AUTH_MSG_FAILED) {
        return Err(Error::Unauthorized);
    }

    let content_type = response.content_type();
    let syntax = select_syntax(content_type, uri);
    let graph = parse_graph(&response.body, uri, syntax).map_err(|e| {
        warn!("Could not parse {} as {:?}: {}", uri, syntax, e);
        e
    })?;

    // Documents served after an upgrade or redirect describe the final URL.
    let mut resource = if graph.contains_subject(uri) {
        Resource::from_graph(uri, graph, select_kind(content_type))
    } else {
        Resource::from_graph(response.uri.as_str(), graph, select_kind(content_type))
    };
    resource.set_uri(uri);
    Ok(resource.with_etag(response.etag().map(str::to_string)))
}

/// Parse an RDF document into a statement graph, resolving relative IRIs
/// against `base`.
pub fn parse_graph(body: &str, base: &str, syntax: Syntax) -> Result<Graph> {
    let parser = match RdfParser::from_format(syntax.format()).with_base_iri(base) {
        Ok(parser) => parser,
        Err(e) => {
            debug!("Parsing {} without base iri: {}", base, e);
            RdfParser::from_format(syntax.format())
        }
    };

    let mut graph = Graph::new();
    for quad in parser.for_reader(body.as_bytes()) {
        let quad = quad.map_err(|e| Error::parse(e.to_string()))?;
        let subject = match quad.subject {
            Subject::NamedNode(node) => node.into_string(),
            Subject::BlankNode(node) => blank_key(node.as_str()),
            #[allow(unreachable_patterns)]
            _ => continue,
        };
        let object = match quad.object {
            Term::NamedNode(node) => Value::Uri(node.into_string()),
            Term::BlankNode(node) => Value::Blank(node.as_str().to_string()),
            Term::Literal(literal) => Value::Literal(literal.value().to_string()),
            #[allow(unreachable_patterns)]
            _ => continue,
        };
        graph.insert(subject, quad.predicate.into_string(), object);
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ETAG};

    const URI: &str = "https://rm.example.com/rm/resources/REQ-1";

    const TURTLE: &str = r#"
        @prefix dcterms: <http://purl.org/dc/terms/> .
        @prefix oslc_rm: <http://open-services.net/ns/rm#> .
        <https://rm.example.com/rm/resources/REQ-1>
            dcterms:title "Brake distance" ;
            oslc_rm:validatedBy <https://qm.example.com/tc/1>, <https://qm.example.com/tc/2> .
    "#;

    const RDF_XML: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:oslc_rm="http://open-services.net/ns/rm#">
  <rdf:Description rdf:about="https://rm.example.com/rm/resources/REQ-1">
    <dcterms:title>Brake distance</dcterms:title>
    <oslc_rm:validatedBy rdf:resource="https://qm.example.com/tc/1"/>
  </rdf:Description>
</rdf:RDF>"#;

    const COMPACT: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:oslc="http://open-services.net/ns/core#">
  <oslc:Compact rdf:about="https://rm.example.com/rm/resources/REQ-1">
    <dcterms:title>Brake &amp;amp; steer</dcterms:title>
    <oslc:shortTitle>REQ-1</oslc:shortTitle>
    <oslc:smallPreview>
      <oslc:Preview>
        <oslc:document rdf:resource="https://rm.example.com/preview/REQ-1"/>
        <oslc:hintHeight>10em</oslc:hintHeight>
      </oslc:Preview>
    </oslc:smallPreview>
  </oslc:Compact>
</rdf:RDF>"#;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> FetchResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        }
        headers.insert(ETAG, HeaderValue::from_static("\"v7\""));
        FetchResponse {
            uri: URI.to_string(),
            status,
            headers,
            body: body.to_string(),
        }
    }

    #[test]
    fn syntax_selection() {
        assert_eq!(select_syntax(Some("text/turtle;charset=utf-8"), URI), Syntax::Turtle);
        assert_eq!(select_syntax(None, "https://x/doc.ttl"), Syntax::Turtle);
        assert_eq!(select_syntax(Some("application/rdf+xml"), URI), Syntax::RdfXml);
        assert_eq!(select_syntax(None, URI), Syntax::RdfXml);
    }

    #[test]
    fn reads_turtle() {
        let r = interpret(URI, &response(200, Some("text/turtle"), TURTLE)).unwrap();
        assert_eq!(r.title(), Some("Brake distance"));
        assert_eq!(r.get_uris("http://open-services.net/ns/rm#validatedBy").len(), 2);
        assert_eq!(r.etag(), Some("\"v7\""));
        assert!(!r.is_compact());
    }

    #[test]
    fn reads_rdf_xml_by_default() {
        let r = interpret(URI, &response(200, None, RDF_XML)).unwrap();
        assert_eq!(r.title(), Some("Brake distance"));
        assert!(r.link_types().contains("http://open-services.net/ns/rm#validatedBy"));
    }

    #[test]
    fn reads_compact_preview() {
        let r = interpret(URI, &response(200, Some("application/x-oslc-compact+xml"), COMPACT)).unwrap();
        assert!(r.is_compact());
        let compact = r.compact().unwrap();
        assert_eq!(compact.short_title.as_deref(), Some("REQ-1"));
        assert_eq!(r.label(), "Brake & steer");
        let preview = compact.small_preview.unwrap();
        assert_eq!(preview.document, "https://rm.example.com/preview/REQ-1");
        assert_eq!(preview.hint_height.as_deref(), Some("10em"));
    }

    #[test]
    fn non_200_is_status_error() {
        let err = interpret(URI, &response(404, None, "")).unwrap_err();
        assert!(matches!(err, Error::Status(404)));
        assert_eq!(err.code(), 404);
    }

    #[test]
    fn auth_failed_header_is_unauthorized() {
        let mut resp = response(200, Some("text/html"), "<html/>");
        resp.headers.insert(
            "x-com-ibm-team-repository-web-auth-msg",
            HeaderValue::from_static("authfailed"),
        );
        let err = interpret(URI, &resp).unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
        assert_eq!(err.code(), 401);
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = interpret(URI, &response(200, Some("text/turtle"), "<unterminated")).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(err.code(), 500);
    }

    #[test]
    fn relative_subject_resolves_against_request_uri() {
        let body = r#"<> <http://purl.org/dc/terms/title> "Self" ."#;
        let r = interpret(URI, &response(200, Some("text/turtle"), body)).unwrap();
        assert_eq!(r.title(), Some("Self"));
    }

    #[test]
    fn upgraded_document_is_found_under_requested_uri() {
        let body = r#"<https://example.com/r> <http://purl.org/dc/terms/title> "Upgraded" ."#;
        let mut resp = response(200, Some("text/turtle"), body);
        resp.uri = "https://example.com/r".into();
        let r = interpret("http://example.com/r", &resp).unwrap();
        assert_eq!(r.uri(), "http://example.com/r");
        assert_eq!(r.title(), Some("Upgraded"));
    }
}
