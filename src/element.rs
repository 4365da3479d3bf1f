//! The scrollable node a widget instance owns.
//!
//! [`ScrollElement`] is the seam between the widget logic and its host: the
//! web binding implements it over an `HtmlElement`, the scenario replayer and
//! the tests over [`SimulatedElement`].

use serde::{Deserialize, Serialize};

use crate::boundary::ScrollMetrics;

/// Scroll properties and mutations the widget needs from its element.
pub trait ScrollElement {
    /// Current `scrollTop`, `scrollHeight` and `clientHeight`.
    fn metrics(&self) -> ScrollMetrics;

    /// Jump to `offset` immediately.
    fn set_scroll_top(&mut self, offset: f64);

    /// Start a smooth scroll toward `offset`. Completion is not tracked.
    fn smooth_scroll_to(&mut self, offset: f64);
}

/// In-memory element with fixed content and viewport heights.
///
/// Writes are stored verbatim without clamping, so a pin to the bottom edge
/// reads back as the full content height.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedElement {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    /// Target of the most recent smooth scroll request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smooth_target: Option<f64>,
}

impl SimulatedElement {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
            smooth_target: None,
        }
    }
}

impl From<ScrollMetrics> for SimulatedElement {
    fn from(m: ScrollMetrics) -> Self {
        Self::new(m.scroll_top, m.scroll_height, m.client_height)
    }
}

impl ScrollElement for SimulatedElement {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.scroll_top, self.scroll_height, self.client_height)
    }

    fn set_scroll_top(&mut self, offset: f64) {
        self.scroll_top = offset;
    }

    fn smooth_scroll_to(&mut self, offset: f64) {
        // Smooth scrolling settles on the same offset; the replay has no frames.
        self.smooth_target = Some(offset);
        self.scroll_top = offset;
    }
}
