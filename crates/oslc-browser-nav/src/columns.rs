//! Drill-down columns of resource previews

use crate::events::{emit, EventSender, ViewEvent};
use futures::stream::{FuturesUnordered, StreamExt};
use oslc_browser_client::{ReadRequest, ResourceSource};
use oslc_browser_core::{Resource, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters left alone when encoding a whole URI.
const URI_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters left alone when encoding a single URI component.
const COMPONENT_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Address of `target` behind the fallback proxy at `base`.
///
/// The part before `?` is encoded as a URI; the query, `?` included, as a
/// single component.
pub fn proxy_uri(base: &str, target: &str) -> String {
    match target.find('?') {
        Some(at) => {
            let (path, query) = target.split_at(at);
            format!(
                "{}{}{}",
                base,
                utf8_percent_encode(path, URI_RESERVED),
                utf8_percent_encode(query, COMPONENT_RESERVED)
            )
        }
        None => format!("{}{}", base, utf8_percent_encode(target, URI_RESERVED)),
    }
}

/// Preview-read `uri`, retrying through `fallback_proxy` when set.
///
/// A resource read through the proxy is given back its original identity.
pub async fn read_preview(
    source: &dyn ResourceSource,
    uri: &str,
    fallback_proxy: Option<&str>,
) -> Result<Resource> {
    let request = ReadRequest::preview(uri);
    let err = match source.read(request.clone()).await {
        Ok(resource) => return Ok(resource),
        Err(e) => e,
    };
    let Some(base) = fallback_proxy else {
        return Err(err);
    };

    let proxied = proxy_uri(base, uri);
    debug!("Retrying {} through fallback proxy as {}", uri, proxied);
    let mut resource = source.read(request.retarget(proxied)).await?;
    resource.set_uri(uri);
    Ok(resource)
}

pub type Column = Vec<Arc<Resource>>;

/// Ordered columns; column 0 holds exactly the current root.
#[derive(Clone, Debug, Default)]
pub struct ColumnsState {
    columns: Vec<Column>,
}

impl ColumnsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn root(&self) -> Option<&Arc<Resource>> {
        self.columns.first().and_then(|c| c.first())
    }

    /// Start over from `root` unless it is already the shared root. Returns
    /// true if the columns were reset.
    pub fn root_changed(&mut self, root: Arc<Resource>) -> bool {
        if self.root().is_some_and(|current| Arc::ptr_eq(current, &root)) {
            return false;
        }
        self.columns = vec![vec![root]];
        true
    }

    /// Drop every column to the right of `column_index`.
    pub fn select_resource(&mut self, column_index: usize) {
        self.columns.truncate(column_index + 1);
    }

    /// Replace everything right of `column_index` with `column`.
    pub fn push_column(&mut self, column_index: usize, column: Column) {
        self.select_resource(column_index);
        self.columns.push(column);
    }
}

pub struct ColumnNavigator {
    source: Arc<dyn ResourceSource>,
    fallback_proxy: Option<String>,
    state: ColumnsState,
    events: Option<EventSender>,
}

impl ColumnNavigator {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self {
            source,
            fallback_proxy: None,
            state: ColumnsState::new(),
            events: None,
        }
    }

    pub fn with_fallback_proxy(mut self, base: impl Into<String>) -> Self {
        self.fallback_proxy = Some(base.into());
        self
    }

    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> &ColumnsState {
        &self.state
    }

    pub fn fallback_proxy(&self) -> Option<&str> {
        self.fallback_proxy.as_deref()
    }

    pub fn root_changed(&mut self, root: Arc<Resource>) {
        if self.state.root_changed(root) {
            self.changed();
        }
    }

    /// Read previews for every URI concurrently, in completion order.
    /// Failed reads are logged and left out.
    pub async fn resolve_previews(&self, object_uris: &[String]) -> Column {
        let proxy = self.fallback_proxy.as_deref();
        let mut pending: FuturesUnordered<_> = object_uris
            .iter()
            .map(|uri| async move { (uri, read_preview(self.source.as_ref(), uri, proxy).await) })
            .collect();

        let mut column = Column::with_capacity(object_uris.len());
        while let Some((uri, result)) = pending.next().await {
            match result {
                Ok(resource) => column.push(Arc::new(resource)),
                Err(e) => warn!("Could not read resource {}, status: {}", uri, e.code()),
            }
        }
        column
    }

    pub fn commit_column(&mut self, column_index: usize, column: Column) {
        self.state.push_column(column_index, column);
        self.changed();
    }

    /// Open a new column right of `column_index` holding previews of the
    /// objects of the chosen link type.
    pub async fn select_link_type(&mut self, object_uris: &[String], column_index: usize) {
        let column = self.resolve_previews(object_uris).await;
        debug!(
            "Resolved {} of {} previews for column {}",
            column.len(),
            object_uris.len(),
            column_index + 1
        );
        self.commit_column(column_index, column);
    }

    pub fn select_resource(&mut self, column_index: usize) {
        self.state.select_resource(column_index);
        self.changed();
    }

    fn changed(&self) {
        emit(&self.events, ViewEvent::ColumnsChanged {
            columns: self.state.len(),
        });
    }
}
