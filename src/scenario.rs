//! Scripted replay of widget input against a simulated element.
//!
//! A scenario is a JSON document with an initial configuration, the element's
//! scroll metrics, and a list of steps:
//!
//! ```json
//! {
//!   "config": { "atBottomMargin": 150 },
//!   "element": { "scrollTop": 600, "scrollHeight": 1000, "clientHeight": 400 },
//!   "steps": [
//!     { "wheel": { "deltaY": 50 } },
//!     { "touchStart": { "clientY": 300 } },
//!     { "touchMove": { "clientY": 340 } },
//!     { "configure": { "topScroll": "bottom" } },
//!     { "setScrollTop": 590 },
//!     "teardown"
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::boundary::{Edge, ScrollMetrics};
use crate::config::ScrollConfig;
use crate::element::{ScrollElement, SimulatedElement};
use crate::error::Result;
use crate::widget::{
    BoundaryHandler, GestureInput, ListenerChange, ListenerState, Outcome, ScrollBoundary,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub config: ScrollConfig,
    pub element: ScrollMetrics,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse a scenario document.
    ///
    /// # Errors
    /// Fails on malformed JSON or unknown step kinds.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Step {
    Wheel { delta_y: f64 },
    TouchStart { client_y: f64 },
    TouchMove { client_y: f64 },
    /// Replace the configuration.
    Configure(ScrollConfig),
    /// Move the element as if the user scrolled natively.
    SetScrollTop(f64),
    Teardown,
}

/// Boundary callback observed during a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub edge: Edge,
    pub delta: f64,
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notifications: Vec<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_change: Option<ListenerChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrolled_to: Option<f64>,
    pub listeners: ListenerState,
    pub scroll_top: f64,
}

/// Full replay result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replay {
    /// Listener state right after the element was attached.
    pub attached: ListenerState,
    pub steps: Vec<StepReport>,
}

#[derive(Default)]
struct Recorder {
    seen: Vec<Notification>,
}

impl BoundaryHandler for Recorder {
    fn at_top(&mut self, delta: f64) {
        self.seen.push(Notification {
            edge: Edge::Top,
            delta,
        });
    }

    fn at_bottom(&mut self, delta: f64) {
        self.seen.push(Notification {
            edge: Edge::Bottom,
            delta,
        });
    }
}

/// Run `scenario` from a freshly attached widget.
///
/// # Errors
/// Fails when the initial or a reconfigured margin is invalid.
pub fn replay(scenario: &Scenario) -> Result<Replay> {
    let mut widget = ScrollBoundary::new(scenario.config.clone())?;
    widget.attach(SimulatedElement::from(scenario.element));
    let attached = widget.listener_state();

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let mut recorder = Recorder::default();
        let mut report = StepReport {
            index,
            outcome: None,
            notifications: Vec::new(),
            listener_change: None,
            scrolled_to: None,
            listeners: ListenerState::Detached,
            scroll_top: 0.0,
        };

        match step {
            Step::Wheel { delta_y } => {
                let input = GestureInput::Wheel { delta_y: *delta_y };
                report.outcome = Some(widget.dispatch(input, &mut recorder));
            }
            Step::TouchStart { client_y } => {
                let input = GestureInput::TouchStart {
                    client_y: *client_y,
                };
                report.outcome = Some(widget.dispatch(input, &mut recorder));
            }
            Step::TouchMove { client_y } => {
                let input = GestureInput::TouchMove {
                    client_y: *client_y,
                };
                report.outcome = Some(widget.dispatch(input, &mut recorder));
            }
            Step::Configure(config) => {
                let change = widget.update(config.clone())?;
                report.listener_change = change.listeners;
                report.scrolled_to = change.scrolled_to;
            }
            Step::SetScrollTop(offset) => {
                if let Some(element) = widget.element_mut() {
                    element.set_scroll_top(*offset);
                }
            }
            Step::Teardown => report.listener_change = widget.teardown(),
        }

        report.notifications = recorder.seen;
        report.listeners = widget.listener_state();
        report.scroll_top = widget
            .element()
            .map(|element| element.metrics().scroll_top)
            .unwrap_or_default();
        steps.push(report);
    }

    Ok(Replay { attached, steps })
}
