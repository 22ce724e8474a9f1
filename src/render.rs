//! Plain-text views of resources, graphs and columns

use crate::config::FavoriteFolder;
use oslc_browser_core::{local_name, Resource, Value};
use oslc_browser_nav::{ColumnsState, GraphState, LinkType, Mark};

pub fn format_resource(resource: &Resource) -> String {
    let mut out = String::new();
    out.push_str(&format!("═══ {} ═══\n", resource.label()));
    out.push_str(&format!("URI: {}\n", resource.uri()));
    if let Some(etag) = resource.etag() {
        out.push_str(&format!("ETag: {}\n", etag));
    }
    if let Some(preview) = resource.small_preview() {
        out.push_str(&format!("Preview: {}", preview.document));
        if let (Some(w), Some(h)) = (&preview.hint_width, &preview.hint_height) {
            out.push_str(&format!(" ({} x {})", w, h));
        }
        out.push('\n');
    }
    out.push('\n');

    for (predicate, values) in resource.properties() {
        for value in values {
            let shown = match value {
                Value::Uri(u) => format!("<{}>", u),
                Value::Blank(id) => format!("_:{}", id),
                Value::Literal(l) => format!("\"{}\"", l),
            };
            out.push_str(&format!("  {:<24} {}\n", local_name(predicate), shown));
        }
    }
    out
}

pub fn format_link_types(links: &[LinkType]) -> String {
    if links.is_empty() {
        return "(no links)\n".to_string();
    }
    let mut out = String::new();
    for link in links {
        out.push_str(&format!("{} ({})\n", link.local_name, link.targets.len()));
        for target in &link.targets {
            out.push_str(&format!("  → {}\n", target));
        }
    }
    out
}

pub fn format_graph(state: &GraphState) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Graph: {} nodes, {} edges\n",
        state.nodes().len(),
        state.edges().len()
    ));
    for node in state.nodes() {
        let marker = match state.node_mark(&node.uri) {
            Mark::Highlighted => '*',
            Mark::Dimmed => '.',
            Mark::Normal => ' ',
        };
        let expanded = if node.expanded { " [expanded]" } else { "" };
        out.push_str(&format!("{} {}{}\n    {}\n", marker, node.label, expanded, node.uri));
    }
    if !state.edges().is_empty() {
        out.push('\n');
    }
    for edge in state.edges() {
        let from = state.node(&edge.source).map_or(edge.source.as_str(), |n| n.label.as_str());
        let to = state.node(&edge.target).map_or(edge.target.as_str(), |n| n.label.as_str());
        out.push_str(&format!("  {} --{}--> {}\n", from, edge.label, to));
    }
    out
}

pub fn format_columns(state: &ColumnsState) -> String {
    let mut out = String::new();
    for (i, column) in state.columns().iter().enumerate() {
        out.push_str(&format!("── Column {} ({}) ──\n", i, column.len()));
        for resource in column {
            out.push_str(&format!("  {}\n    {}\n", resource.label(), resource.uri()));
        }
    }
    out
}

pub fn format_favorites(folders: &[FavoriteFolder]) -> String {
    if folders.is_empty() {
        return "(no favorites configured)\n".to_string();
    }
    let mut out = String::new();
    for folder in folders {
        out.push_str(&format!("{}\n", folder.name));
        for item in &folder.items {
            out.push_str(&format!("  {}  {}\n", item.label, item.uri));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Favorite;
    use oslc_browser_core::vocab;
    use oslc_browser_nav::{ExpansionBatch, GraphEdge};
    use std::sync::Arc;

    #[test]
    fn resource_shows_label_and_properties() {
        let r = Resource::new("https://x/r")
            .with_property(vocab::DCTERMS_TITLE, Value::literal("Brake &amp; steer"))
            .with_property("http://open-services.net/ns/rm#validatedBy", Value::uri("https://x/tc"));
        let text = format_resource(&r);
        assert!(text.starts_with("═══ Brake & steer ═══"));
        assert!(text.contains("validatedBy"));
        assert!(text.contains("<https://x/tc>"));
    }

    #[test]
    fn graph_lists_edges_by_label() {
        let mut state = GraphState::new(&Resource::new("https://x/root"));
        state.commit(ExpansionBatch {
            source: "https://x/root".into(),
            source_label: "Root".into(),
            nodes: vec![("https://x/a".into(), "A".into())],
            edges: vec![GraphEdge::new("https://x/root", "https://x/a", "validatedBy")],
        });
        let text = format_graph(&state);
        assert!(text.contains("2 nodes, 1 edges"));
        assert!(text.contains("Root --validatedBy--> A"));
    }

    #[test]
    fn columns_are_numbered() {
        let mut state = ColumnsState::new();
        state.root_changed(Arc::new(Resource::new("https://x/root")));
        let text = format_columns(&state);
        assert!(text.contains("Column 0 (1)"));
    }

    #[test]
    fn favorites_grouped_by_folder() {
        let folders = vec![FavoriteFolder {
            name: "JKE Banking".into(),
            items: vec![Favorite {
                label: "Test requirement".into(),
                uri: "https://x/rm/1".into(),
            }],
        }];
        let text = format_favorites(&folders);
        assert!(text.starts_with("JKE Banking\n"));
        assert!(text.contains("Test requirement  https://x/rm/1"));
    }
}
