//! Resource model shared by the client and the navigators

use crate::label::{decode_entities, display_label};
use crate::vocab;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Object of a statement.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    Uri(String),
    Blank(String),
    Literal(String),
}

impl Value {
    pub fn uri(s: impl Into<String>) -> Self {
        Self::Uri(s.into())
    }

    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(id.into())
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Uri(s) | Self::Blank(s) | Self::Literal(s) => s,
        }
    }

    /// Key under which this value appears as a subject, if it can be one.
    pub fn subject_key(&self) -> Option<String> {
        match self {
            Self::Uri(u) => Some(u.clone()),
            Self::Blank(id) => Some(blank_key(id)),
            Self::Literal(_) => None,
        }
    }
}

/// Subject key for a blank node label.
pub fn blank_key(id: &str) -> String {
    format!("_:{}", id)
}

/// Statements of one parsed document, indexed by subject then predicate.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    subjects: HashMap<String, BTreeMap<String, Vec<Value>>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement. Duplicate statements are stored once.
    pub fn insert(&mut self, subject: impl Into<String>, predicate: impl Into<String>, object: Value) {
        let values = self
            .subjects
            .entry(subject.into())
            .or_default()
            .entry(predicate.into())
            .or_default();
        if !values.contains(&object) {
            values.push(object);
        }
    }

    pub fn properties(&self, subject: &str) -> Option<&BTreeMap<String, Vec<Value>>> {
        self.subjects.get(subject)
    }

    pub fn objects(&self, subject: &str, predicate: &str) -> &[Value] {
        self.subjects
            .get(subject)
            .and_then(|props| props.get(predicate))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_subject(&self, subject: &str) -> bool {
        self.subjects.contains_key(subject)
    }

    pub fn len(&self) -> usize {
        self.subjects
            .values()
            .flat_map(|props| props.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    fn rekey(&mut self, from: &str, to: &str) {
        if from == to || self.subjects.contains_key(to) {
            return;
        }
        if let Some(props) = self.subjects.remove(from) {
            self.subjects.insert(to.to_string(), props);
        }
    }
}

/// Which representation the server returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Full,
    Compact,
}

/// An OSLC resource as read from a server.
///
/// The whole parsed document is kept so blank nodes (e.g. the compact small
/// preview) can be dereferenced. Property accessors look at the statements
/// whose subject is the resource URI.
#[derive(Clone, Debug)]
pub struct Resource {
    uri: String,
    graph: Graph,
    etag: Option<String>,
    kind: ResourceKind,
}

impl Resource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::from_graph(uri, Graph::new(), ResourceKind::Full)
    }

    pub fn from_graph(uri: impl Into<String>, graph: Graph, kind: ResourceKind) -> Self {
        Self {
            uri: uri.into(),
            graph,
            etag: None,
            kind,
        }
    }

    /// Add a property of this resource.
    pub fn with_property(mut self, predicate: impl Into<String>, value: Value) -> Self {
        self.graph.insert(self.uri.clone(), predicate, value);
        self
    }

    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Replace the resource identity. Properties recorded under the old URI
    /// move with it unless the document already describes the new URI.
    pub fn set_uri(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        self.graph.rekey(&self.uri, &uri);
        self.uri = uri;
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_compact(&self) -> bool {
        self.kind == ResourceKind::Compact
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// All values of a property (empty when absent).
    pub fn get(&self, predicate: &str) -> &[Value] {
        self.graph.objects(&self.uri, predicate)
    }

    /// URI values of a property.
    pub fn get_uris(&self, predicate: &str) -> Vec<&str> {
        self.get(predicate).iter().filter_map(Value::as_uri).collect()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.graph
            .properties(&self.uri)
            .into_iter()
            .flat_map(|props| props.iter().map(|(p, v)| (p.as_str(), v.as_slice())))
    }

    /// Predicates with at least one URI reference object.
    pub fn link_types(&self) -> BTreeSet<&str> {
        self.properties()
            .filter(|(_, values)| values.iter().any(|v| v.as_uri().is_some()))
            .map(|(predicate, _)| predicate)
            .collect()
    }

    fn first_text(&self, subject: &str, predicate: &str) -> Option<&str> {
        self.graph
            .objects(subject, predicate)
            .iter()
            .find_map(|v| match v {
                Value::Literal(s) | Value::Uri(s) => Some(s.as_str()),
                Value::Blank(_) => None,
            })
            .filter(|s| !s.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.first_text(&self.uri, vocab::DCTERMS_TITLE)
    }

    pub fn short_title(&self) -> Option<&str> {
        self.first_text(&self.uri, vocab::OSLC_SHORT_TITLE)
    }

    /// Display label: title, then short title, then URI, entity-decoded.
    pub fn label(&self) -> String {
        display_label(self.title(), self.short_title(), &self.uri)
    }

    /// The small preview descriptor, following the `oslc:smallPreview` node.
    pub fn small_preview(&self) -> Option<SmallPreview> {
        let node = self
            .get(vocab::OSLC_SMALL_PREVIEW)
            .iter()
            .find_map(Value::subject_key)?;
        let document = self.first_text(&node, vocab::OSLC_DOCUMENT)?;
        Some(SmallPreview {
            document: decode_entities(document),
            hint_width: self.first_text(&node, vocab::OSLC_HINT_WIDTH).map(str::to_string),
            hint_height: self.first_text(&node, vocab::OSLC_HINT_HEIGHT).map(str::to_string),
        })
    }

    /// Compact view, only for resources read as the compact media type.
    pub fn compact(&self) -> Option<CompactResource> {
        if !self.is_compact() {
            return None;
        }
        Some(CompactResource {
            uri: self.uri.clone(),
            title: self.title().unwrap_or_default().to_string(),
            short_title: self.short_title().map(str::to_string),
            small_preview: self.small_preview(),
        })
    }
}

/// Document reference used for inline preview rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallPreview {
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_height: Option<String>,
}

/// Compact (preview) representation of a resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactResource {
    pub uri: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_preview: Option<SmallPreview>,
}
