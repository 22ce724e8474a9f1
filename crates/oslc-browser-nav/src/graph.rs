//! Resource graph: on-demand expansion of a resource's links
//!
//! Expansion is split in two so callers can overlap fetches without sharing
//! mutable state:
//!
//!   collect: read the resource, fan out preview reads for every followed
//!            link, wait for all of them (`&self`, no state touched)
//!   commit:  merge the staged nodes and edges in one step, then request a
//!            single layout pass
//!
//! Two expansions committing the same node race harmlessly: labels are a pure
//! function of the resource, so the last commit wins with the same value.

use crate::events::{emit, EventSender, ViewEvent};
use futures::stream::{FuturesUnordered, StreamExt};
use oslc_browser_client::{ReadRequest, ResourceSource};
use oslc_browser_core::{local_name, vocab, LinkFilter, Resource, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub uri: String,
    pub label: String,
    pub expanded: bool,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Highlight state of a node or edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Normal,
    Highlighted,
    Dimmed,
}

/// Nodes keyed by URI plus the edges between them, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct GraphState {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_set: HashSet<GraphEdge>,
    selected: Option<String>,
}

impl GraphState {
    pub fn new(root: &Resource) -> Self {
        let mut state = Self::default();
        state.reset(root);
        state
    }

    /// Drop everything and start over from `root`.
    pub fn reset(&mut self, root: &Resource) {
        *self = Self::default();
        self.upsert_node(root.uri(), root.label());
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, uri: &str) -> Option<&GraphNode> {
        self.index.get(uri).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.index.contains_key(uri)
    }

    /// Targets of the edges leaving `uri`.
    pub fn successors<'a>(&'a self, uri: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == uri)
            .map(|e| e.target.as_str())
    }

    /// Add a node, or update the label of an existing one. Returns true if added.
    pub fn upsert_node(&mut self, uri: &str, label: String) -> bool {
        match self.index.get(uri) {
            Some(&i) => {
                self.nodes[i].label = label;
                false
            }
            None => {
                self.index.insert(uri.to_string(), self.nodes.len());
                self.nodes.push(GraphNode {
                    uri: uri.to_string(),
                    label,
                    expanded: false,
                });
                true
            }
        }
    }

    /// Append an edge unless the same (source, target, label) is present.
    pub fn add_edge(&mut self, edge: GraphEdge) -> bool {
        if self.edge_set.contains(&edge) {
            return false;
        }
        self.edge_set.insert(edge.clone());
        self.edges.push(edge);
        true
    }

    /// Merge a settled expansion batch.
    pub fn commit(&mut self, batch: ExpansionBatch) -> CommitSummary {
        let mut summary = CommitSummary::default();
        self.upsert_node(&batch.source, batch.source_label);
        if let Some(&i) = self.index.get(&batch.source) {
            self.nodes[i].expanded = true;
        }
        for (uri, label) in batch.nodes {
            if self.upsert_node(&uri, label) {
                summary.added_nodes += 1;
            }
        }
        for edge in batch.edges {
            if self.add_edge(edge) {
                summary.added_edges += 1;
            }
        }
        summary
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, uri: &str) {
        if self.contains(uri) {
            self.selected = Some(uri.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Selected node and its direct successors are highlighted, all other
    /// nodes dimmed.
    pub fn node_mark(&self, uri: &str) -> Mark {
        let Some(selected) = self.selected.as_deref() else {
            return Mark::Normal;
        };
        if uri == selected || self.successors(selected).any(|t| t == uri) {
            Mark::Highlighted
        } else {
            Mark::Dimmed
        }
    }

    /// Edges leaving the selected node are highlighted, all others dimmed.
    pub fn edge_mark(&self, edge: &GraphEdge) -> Mark {
        match self.selected.as_deref() {
            None => Mark::Normal,
            Some(selected) if edge.source == selected => Mark::Highlighted,
            Some(_) => Mark::Dimmed,
        }
    }
}

/// Nodes and edges staged by one expansion, not yet part of any graph.
#[derive(Clone, Debug, Default)]
pub struct ExpansionBatch {
    pub source: String,
    pub source_label: String,
    /// (uri, label) of every resolved target.
    pub nodes: Vec<(String, String)>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub added_nodes: usize,
    pub added_edges: usize,
}

/// Read `node_uri` in full and resolve every followed link target.
///
/// Fails only if the resource itself cannot be read; individual targets
/// that fail are logged and left out.
pub async fn collect_expansion(
    source: &dyn ResourceSource,
    filter: &LinkFilter,
    node_uri: &str,
) -> Result<ExpansionBatch> {
    let resource = source.read(ReadRequest::full(node_uri)).await?;

    let mut pending = FuturesUnordered::new();
    for link in resource.link_types() {
        if filter.filter_link(link) {
            continue;
        }
        let label = local_name(link).to_string();
        for target in resource.get_uris(link) {
            let label = label.clone();
            let target = target.to_string();
            pending.push(async move {
                let result = source.read(ReadRequest::preview(target.as_str())).await;
                (target, label, result)
            });
        }
    }

    let mut batch = ExpansionBatch {
        source: resource.uri().to_string(),
        source_label: resource.label(),
        ..Default::default()
    };
    while let Some((target, label, result)) = pending.next().await {
        match result {
            Ok(preview) if hidden_artifact(filter, &preview) => {
                debug!("Skipping filtered artifact {}", target);
            }
            Ok(preview) => {
                batch.edges.push(GraphEdge::new(resource.uri(), preview.uri(), label));
                batch.nodes.push((preview.uri().to_string(), preview.label()));
            }
            Err(e) => {
                warn!("Could not read linked resource {}, status: {}", target, e.code());
            }
        }
    }
    Ok(batch)
}

fn hidden_artifact(filter: &LinkFilter, resource: &Resource) -> bool {
    resource
        .get_uris(vocab::RDF_TYPE)
        .into_iter()
        .any(|t| filter.filter_artifact(t))
}

/// Graph state plus the source and filter used to grow it.
pub struct GraphTraversalEngine {
    source: Arc<dyn ResourceSource>,
    filter: Arc<LinkFilter>,
    state: GraphState,
    events: Option<EventSender>,
    layout_passes: usize,
}

impl GraphTraversalEngine {
    pub fn new(source: Arc<dyn ResourceSource>, filter: Arc<LinkFilter>) -> Self {
        Self {
            source,
            filter,
            state: GraphState::default(),
            events: None,
            layout_passes: 0,
        }
    }

    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    /// Number of layout passes requested so far.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    pub fn reset(&mut self, root: &Resource) {
        self.state.reset(root);
        emit(&self.events, ViewEvent::GraphReset {
            root: root.uri().to_string(),
        });
    }

    pub async fn collect(&self, node_uri: &str) -> Result<ExpansionBatch> {
        collect_expansion(self.source.as_ref(), &self.filter, node_uri).await
    }

    pub fn commit(&mut self, batch: ExpansionBatch) -> CommitSummary {
        let node = batch.source.clone();
        let summary = self.state.commit(batch);
        self.layout_passes += 1;
        emit(&self.events, ViewEvent::GraphExpanded {
            node,
            added_nodes: summary.added_nodes,
            added_edges: summary.added_edges,
        });
        emit(&self.events, ViewEvent::LayoutRequested);
        summary
    }

    /// Expand a node: fetch everything, then commit once.
    pub async fn expand(&mut self, node_uri: &str) -> Result<CommitSummary> {
        let batch = match self.collect(node_uri).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Could not read resource {}, status: {}", node_uri, e.code());
                return Err(e);
            }
        };
        let summary = self.commit(batch);
        info!(
            "Expanded {}: {} new nodes, {} new edges",
            node_uri, summary.added_nodes, summary.added_edges
        );
        Ok(summary)
    }

    pub fn select(&mut self, uri: &str) {
        self.state.select(uri);
        emit(&self.events, ViewEvent::SelectionChanged {
            selected: self.state.selected().map(str::to_string),
        });
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
        emit(&self.events, ViewEvent::SelectionChanged { selected: None });
    }
}
