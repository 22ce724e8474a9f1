//! Browsing session: one root shown as columns and as a graph

use crate::columns::ColumnNavigator;
use crate::events::EventSender;
use crate::graph::GraphTraversalEngine;
use oslc_browser_client::{ReadRequest, ResourceSource};
use oslc_browser_core::{local_name, LinkFilter, Resource, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// A followable predicate of a resource and the URIs it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkType {
    pub predicate: String,
    pub local_name: String,
    pub targets: Vec<String>,
}

pub struct Navigator {
    source: Arc<dyn ResourceSource>,
    filter: Arc<LinkFilter>,
    columns: ColumnNavigator,
    graph: GraphTraversalEngine,
    root: Option<Arc<Resource>>,
}

impl Navigator {
    pub fn new(source: Arc<dyn ResourceSource>, filter: LinkFilter) -> Self {
        let filter = Arc::new(filter);
        Self {
            columns: ColumnNavigator::new(source.clone()),
            graph: GraphTraversalEngine::new(source.clone(), filter.clone()),
            source,
            filter,
            root: None,
        }
    }

    pub fn with_fallback_proxy(mut self, base: Option<String>) -> Self {
        if let Some(base) = base {
            self.columns = self.columns.with_fallback_proxy(base);
        }
        self
    }

    pub fn with_events(mut self, events: EventSender) -> Self {
        self.columns = self.columns.with_events(events.clone());
        self.graph = self.graph.with_events(events);
        self
    }

    pub fn root(&self) -> Option<&Arc<Resource>> {
        self.root.as_ref()
    }

    pub fn filter(&self) -> &LinkFilter {
        &self.filter
    }

    pub fn columns(&self) -> &ColumnNavigator {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnNavigator {
        &mut self.columns
    }

    pub fn graph(&self) -> &GraphTraversalEngine {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphTraversalEngine {
        &mut self.graph
    }

    /// Make `uri` the new root. On a failed read nothing changes.
    pub async fn navigate(&mut self, uri: &str) -> Result<Arc<Resource>> {
        let root = match self.source.read(ReadRequest::preview(uri)).await {
            Ok(resource) => Arc::new(resource),
            Err(e) => {
                warn!("Could not read resource {}, status: {}", uri, e.code());
                return Err(e);
            }
        };
        info!("Navigating to {} ({})", root.uri(), root.label());
        self.columns.root_changed(root.clone());
        self.graph.reset(&root);
        self.root = Some(root.clone());
        Ok(root)
    }

    /// Followable link types of `uri`, sorted by local name.
    pub async fn link_types(&self, uri: &str) -> Result<Vec<LinkType>> {
        let resource = self.source.read(ReadRequest::full(uri)).await?;
        Ok(followable_links(&resource, &self.filter))
    }

    /// URI objects of `predicate` on `uri`.
    pub async fn objects(&self, uri: &str, predicate: &str) -> Result<Vec<String>> {
        let resource = self.source.read(ReadRequest::full(uri)).await?;
        Ok(resource
            .get_uris(predicate)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Unfiltered link types of `resource`. Local names starting with `_Y` are
/// internal server bookkeeping and never listed.
pub fn followable_links(resource: &Resource, filter: &LinkFilter) -> Vec<LinkType> {
    let mut links: Vec<LinkType> = resource
        .link_types()
        .into_iter()
        .filter(|p| !filter.filter_link(p))
        .filter(|p| !local_name(p).starts_with("_Y"))
        .map(|p| LinkType {
            predicate: p.to_string(),
            local_name: local_name(p).to_string(),
            targets: resource.get_uris(p).into_iter().map(str::to_string).collect(),
        })
        .collect();
    links.sort_by(|a, b| a.local_name.cmp(&b.local_name));
    links
}
