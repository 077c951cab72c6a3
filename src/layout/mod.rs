//! Layout engine for the visible window.
//!
//! This module handles:
//! - Column width / row height lookup ([`GridMetrics`], [`SheetLayout`])
//! - Turning a pixel viewport into visible cell ranges, frozen panes included

mod metrics;
mod window;

pub use metrics::{GridMetrics, SheetLayout, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
pub use window::{compute_window, scroll_origin, WindowSpans};
