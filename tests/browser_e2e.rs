//! End-to-end: config file → OSLC client → navigator, against a mock server.

use oslc_browser::render;
use oslc_browser::BrowserConfig;
use oslc_browser_client::OslcClient;
use oslc_browser_nav::Navigator;
use std::io::Write;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPACT: &str = "application/x-oslc-compact+xml";

fn requirement(base: &str) -> String {
    format!(
        r#"@prefix dcterms: <http://purl.org/dc/terms/> .
@prefix oslc_rm: <http://open-services.net/ns/rm#> .
@prefix oslc: <http://open-services.net/ns/core#> .
<{base}/rm/REQ-1>
    a oslc_rm:Requirement ;
    dcterms:title "Brake distance" ;
    oslc:serviceProvider <{base}/rm/sp> ;
    oslc_rm:validatedBy <{base}/qm/TC-1>, <{base}/qm/TC-2> ."#
    )
}

fn compact(base: &str, id: &str, title: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:oslc="http://open-services.net/ns/core#">
  <oslc:Compact rdf:about="{base}/qm/{id}">
    <dcterms:title>{title}</dcterms:title>
    <oslc:shortTitle>{id}</oslc:shortTitle>
    <oslc:smallPreview>
      <oslc:Preview>
        <oslc:document rdf:resource="{base}/qm/{id}/preview"/>
      </oslc:Preview>
    </oslc:smallPreview>
  </oslc:Compact>
</rdf:RDF>"#
    )
}

async fn oslc_server() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/rm/REQ-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(requirement(&base), "text/turtle"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/qm/TC-1"))
        .and(header("oslc-core-version", "2.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(compact(&base, "TC-1", "Stop on wet road"), COMPACT),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/qm/TC-2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    server
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn navigator(config: &BrowserConfig) -> Navigator {
    let client = Arc::new(OslcClient::new(config.fetch_config()).unwrap());
    Navigator::new(client, config.link_filter().unwrap())
        .with_fallback_proxy(config.network.fallback_proxy.clone())
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn config_loads_from_file() {
    let file = config_file(
        r#"
[auth]
user_id = "alice"

[network]
relay_enabled = false

[[favorites]]
name = "Demo"
[[favorites.items]]
label = "Brake requirement"
uri = "https://rm.example.com/rm/REQ-1"
"#,
    );
    let config = BrowserConfig::load(file.path());
    assert_eq!(config.auth.user_id, "alice");
    assert!(config.fetch_config().relay_base.is_none());
    assert_eq!(
        config.favorite("Brake requirement").map(|f| f.uri.as_str()),
        Some("https://rm.example.com/rm/REQ-1")
    );
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let file = config_file("[auth\nuser_id = ");
    let config = BrowserConfig::load(file.path());
    assert!(config.network.relay_enabled);
    assert_eq!(config.auth.user_id, "");
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = BrowserConfig::load(&dir.path().join("absent.toml"));
    assert!(config.filters.use_defaults);
}

// ===========================================================================
// Browsing against a mock OSLC server
// ===========================================================================

fn offline_config() -> BrowserConfig {
    let mut config = BrowserConfig::default();
    config.network.relay_enabled = false;
    config
}

#[tokio::test]
async fn graph_expansion_over_http() {
    let server = oslc_server().await;
    let root_uri = format!("{}/rm/REQ-1", server.uri());
    let mut nav = navigator(&offline_config());

    nav.navigate(&root_uri).await.unwrap();
    let summary = nav.graph_mut().expand(&root_uri).await.unwrap();
    assert_eq!(summary.added_nodes, 1);

    let state = nav.graph().state();
    let tc1 = format!("{}/qm/TC-1", server.uri());
    assert_eq!(state.node(&tc1).unwrap().label, "Stop on wet road");
    assert_eq!(state.edges()[0].label, "validatedBy");
    assert!(!state.contains(&format!("{}/rm/sp", server.uri())));

    let text = render::format_graph(state);
    assert!(text.contains("Brake distance --validatedBy--> Stop on wet road"));
}

#[tokio::test]
async fn columns_over_http_keep_compact_previews() {
    let server = oslc_server().await;
    let root_uri = format!("{}/rm/REQ-1", server.uri());
    let mut nav = navigator(&offline_config());
    nav.navigate(&root_uri).await.unwrap();

    let links = nav.link_types(&root_uri).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].local_name, "validatedBy");

    nav.columns_mut().select_link_type(&links[0].targets, 0).await;
    let state = nav.columns().state();
    assert_eq!(state.len(), 2);
    assert_eq!(state.columns()[1].len(), 1);

    let preview = state.columns()[1][0].compact().unwrap();
    assert_eq!(preview.short_title.as_deref(), Some("TC-1"));
    assert_eq!(
        preview.small_preview.unwrap().document,
        format!("{}/qm/TC-1/preview", server.uri())
    );
}

#[tokio::test]
async fn unreadable_root_reports_status() {
    let server = oslc_server().await;
    let mut nav = navigator(&offline_config());
    let err = nav.navigate(&format!("{}/qm/TC-2", server.uri())).await.unwrap_err();
    assert_eq!(err.code(), 403);
    assert!(nav.root().is_none());
}
