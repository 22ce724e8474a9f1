//! Change notifications for rendering layers

use tokio::sync::mpsc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    GraphReset {
        root: String,
    },
    GraphExpanded {
        node: String,
        added_nodes: usize,
        added_edges: usize,
    },
    /// One layout pass over the whole graph.
    LayoutRequested,
    SelectionChanged {
        selected: Option<String>,
    },
    ColumnsChanged {
        columns: usize,
    },
}

pub type EventSender = mpsc::UnboundedSender<ViewEvent>;

pub(crate) fn emit(events: &Option<EventSender>, event: ViewEvent) {
    if let Some(tx) = events {
        // A dropped receiver just means nobody is rendering.
        let _ = tx.send(event);
    }
}
