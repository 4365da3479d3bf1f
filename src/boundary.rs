//! Edge detection for a single scroll gesture.
//!
//! Everything here is pure: given the element's scroll metrics, the signed
//! gesture delta and the configured margins, [`classify`] decides whether the
//! gesture nears an edge, hits an edge, or is none of the widget's business.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Margins;

/// One of the two vertical edges of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
        }
    }
}

/// Snapshot of the three scroll properties read from the element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    /// Current vertical scroll offset
    pub scroll_top: f64,
    /// Full height of the scrollable content
    pub scroll_height: f64,
    /// Height of the visible viewport
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Remaining scrollable distance below the viewport.
    /// Zero or negative once the bottom is reached.
    #[inline]
    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - self.client_height - self.scroll_top
    }

    /// Scrolled distance from the top edge.
    #[inline]
    pub fn distance_from_top(&self) -> f64 {
        self.scroll_top
    }

    /// Offset the element is pinned to when `edge` is hit.
    ///
    /// The bottom pin writes the full content height; the browser clamps it to
    /// the maximum reachable offset.
    pub fn pin_offset(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => 0.0,
            Edge::Bottom => self.scroll_height,
        }
    }
}

/// Direction a delta scrolls the content in.
///
/// Positive deltas move toward the bottom; zero counts as toward the top.
#[inline]
pub fn direction_of(delta: f64) -> Edge {
    if delta > 0.0 {
        Edge::Bottom
    } else {
        Edge::Top
    }
}

/// What the widget does with one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "edge", rename_all = "camelCase")]
pub enum Decision {
    /// Not near an edge; the native event runs untouched.
    PassThrough,
    /// `preventScroll` is set: the event is cancelled, no callback runs.
    Suppress,
    /// Within the margin of an edge: the edge callback runs, the event passes.
    Approaching(Edge),
    /// At or past an edge: the edge callback runs, the element is pinned to
    /// the edge and the event is cancelled.
    Reached(Edge),
}

impl Decision {
    /// Whether the native event must be cancelled.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppress | Self::Reached(_))
    }

    /// Edge whose callback fires, if any.
    pub fn notified_edge(&self) -> Option<Edge> {
        match self {
            Self::Approaching(edge) | Self::Reached(edge) => Some(*edge),
            Self::PassThrough | Self::Suppress => None,
        }
    }
}

/// Classify one gesture against the current scroll position.
///
/// The bottom branch is evaluated first. Margin checks use `<= 0`, so a
/// position exactly `margin` away from an edge already notifies; only a
/// distance of zero or less counts as reaching the edge.
pub fn classify(
    metrics: &ScrollMetrics,
    delta: f64,
    margins: Margins,
    prevent_scroll: bool,
) -> Decision {
    if prevent_scroll {
        return Decision::Suppress;
    }

    match direction_of(delta) {
        Edge::Bottom => {
            let distance = metrics.distance_to_bottom();
            if distance - margins.bottom() <= 0.0 {
                return reached_or_approaching(Edge::Bottom, distance);
            }
        }
        Edge::Top => {
            let distance = metrics.distance_from_top();
            if distance - margins.top() <= 0.0 {
                return reached_or_approaching(Edge::Top, distance);
            }
        }
    }
    Decision::PassThrough
}

fn reached_or_approaching(edge: Edge, distance: f64) -> Decision {
    if distance <= 0.0 {
        Decision::Reached(edge)
    } else {
        Decision::Approaching(edge)
    }
}
