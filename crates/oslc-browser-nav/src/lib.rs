//! OSLC browser navigation - graph expansion and drill-down columns
//!
//! State lives in plain containers (`GraphState`, `ColumnsState`). The
//! engines fill them from a `ResourceSource` and report every committed
//! change as a `ViewEvent` for whatever renders them.

pub mod columns;
pub mod events;
pub mod graph;
pub mod navigator;

pub use columns::{proxy_uri, read_preview, Column, ColumnNavigator, ColumnsState};
pub use events::{EventSender, ViewEvent};
pub use graph::{
    collect_expansion, CommitSummary, ExpansionBatch, GraphEdge, GraphNode, GraphState,
    GraphTraversalEngine, Mark,
};
pub use navigator::{followable_links, LinkType, Navigator};
