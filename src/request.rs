//! Request pipeline: query → navigation → window → filtered delta.

use log::{debug, trace};
use serde::Serialize;

use crate::error::Result;
use crate::filter::filter_by_window;
use crate::labels::LabelResolver;
use crate::layout::{compute_window, GridMetrics};
use crate::navigation::navigate;
use crate::query::{RequiredKeys, ViewportQuery};
use crate::types::{Delta, Viewport, Window};

/// What a viewport request answers with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportResponse {
    /// Resolved viewport; absent when the request gave an explicit window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    pub window: Window,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
}

/// Sheet collaborators a request is resolved against.
#[derive(Debug)]
pub struct ViewportRequest<'a, M, L> {
    metrics: &'a M,
    labels: &'a L,
}

impl<'a, M: GridMetrics, L: LabelResolver> ViewportRequest<'a, M, L> {
    pub fn new(metrics: &'a M, labels: &'a L) -> Self {
        Self { metrics, labels }
    }

    /// Parse `query` and resolve it. Rejected queries are logged and returned
    /// as errors.
    pub fn handle(&self, query: &str, required: RequiredKeys, delta: Option<&Delta>) -> Result<ViewportResponse> {
        let parsed = ViewportQuery::parse_str(query, required, self.labels).map_err(|err| {
            debug!(target: "xlviewport::request", "rejected {query:?}: {err}");
            err
        })?;
        Ok(self.resolve(parsed, delta))
    }

    /// Resolve an already parsed query.
    ///
    /// Navigations are applied first, then the window is computed at the
    /// resulting home. A delta, when given, is filtered to that window and
    /// stamped with the viewport and window.
    pub fn resolve(&self, query: ViewportQuery, delta: Option<&Delta>) -> ViewportResponse {
        let (viewport, window) = match query {
            ViewportQuery::Window(window) => (None, window),
            ViewportQuery::Viewport(viewport) => {
                let viewport = navigate(viewport, self.metrics);
                let window = compute_window(
                    &viewport.rectangle,
                    viewport.include_frozen_columns_rows,
                    self.metrics,
                );
                (Some(viewport), window)
            }
        };

        let delta = delta.map(|delta| {
            let mut filtered = filter_by_window(delta, &window);
            filtered.viewport.clone_from(&viewport);
            filtered.window.clone_from(&window);
            filtered
        });

        trace!(
            target: "xlviewport::request",
            "resolved window {window}{}",
            if delta.is_some() { " with delta" } else { "" }
        );
        ViewportResponse {
            viewport,
            window,
            delta,
        }
    }
}
