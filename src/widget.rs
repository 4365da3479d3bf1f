//! The scroll-boundary widget.
//!
//! [`ScrollBoundary`] owns one scrollable element, the touch gesture state and
//! the listener lifecycle. It never touches a host event system directly:
//! lifecycle methods return the [`ListenerChange`] the host must carry out, and
//! event handling returns an [`Outcome`] telling the host whether to cancel the
//! native event. This keeps the web binding a thin layer and lets everything
//! here run natively.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::boundary::{classify, Decision, Edge};
use crate::config::{Margins, ScrollConfig, ScrollTarget};
use crate::element::ScrollElement;
use crate::error::Result;
use crate::predicate::resolve;

/// Whether the wheel/touch listeners are registered on the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListenerState {
    #[default]
    Detached,
    Attached,
}

/// Registration work the host has to perform after a lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListenerChange {
    /// Register the `wheel`, `touchstart` and `touchmove` listeners.
    Attach,
    /// Unregister all three.
    Detach,
}

/// A native input event, reduced to what the widget reads from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    /// Wheel event; `delta_y` is the event's vertical delta.
    Wheel { delta_y: f64 },
    /// Touch start at vertical client coordinate `client_y`.
    TouchStart { client_y: f64 },
    /// Touch move to vertical client coordinate `client_y`.
    TouchMove { client_y: f64 },
}

/// Result of evaluating one input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub decision: Decision,
    /// Normalized delta, absent for events that carry no movement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    /// Offset the element gets pinned to when an edge was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<f64>,
}

impl Outcome {
    fn pass_through(delta: Option<f64>) -> Self {
        Self {
            decision: Decision::PassThrough,
            delta,
            pin: None,
        }
    }

    /// Whether the host must stop propagation and prevent the default action.
    pub fn is_suppressed(&self) -> bool {
        self.decision.is_suppressed()
    }

    /// Edge callback to run and the delta to hand it.
    pub fn notification(&self) -> Option<(Edge, f64)> {
        let edge = self.decision.notified_edge()?;
        self.delta.map(|delta| (edge, delta))
    }
}

/// Receiver of boundary notifications. Both callbacks are optional.
pub trait BoundaryHandler {
    fn at_top(&mut self, _delta: f64) {}
    fn at_bottom(&mut self, _delta: f64) {}
}

impl BoundaryHandler for () {}

type BoundaryCallback = Box<dyn FnMut(f64)>;

/// Closure-backed [`BoundaryHandler`].
#[derive(Default)]
pub struct Callbacks {
    at_top: Option<BoundaryCallback>,
    at_bottom: Option<BoundaryCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_top(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.at_top = Some(Box::new(callback));
        self
    }

    pub fn on_bottom(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.at_bottom = Some(Box::new(callback));
        self
    }
}

impl BoundaryHandler for Callbacks {
    fn at_top(&mut self, delta: f64) {
        if let Some(callback) = self.at_top.as_mut() {
            callback(delta);
        }
    }

    fn at_bottom(&mut self, delta: f64) {
        if let Some(callback) = self.at_bottom.as_mut() {
            callback(delta);
        }
    }
}

/// Effects of applying a new configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfigChange {
    pub listeners: Option<ListenerChange>,
    /// Offset a smooth scroll was started toward.
    pub scrolled_to: Option<f64>,
}

/// Per-instance widget state.
#[derive(Debug)]
pub struct ScrollBoundary<E> {
    /// Set by the first `attach`, never replaced.
    element: Option<E>,
    touch_start_y: Option<f64>,
    listeners: ListenerState,
    config: ScrollConfig,
    margins: Margins,
}

impl<E: ScrollElement> ScrollBoundary<E> {
    /// Create a detached widget.
    ///
    /// # Errors
    /// Fails when the configuration carries an invalid margin.
    pub fn new(config: ScrollConfig) -> Result<Self> {
        let margins = config.margins()?;
        Ok(Self {
            element: None,
            touch_start_y: None,
            listeners: ListenerState::Detached,
            config,
            margins,
        })
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> Option<&mut E> {
        self.element.as_mut()
    }

    pub fn listener_state(&self) -> ListenerState {
        self.listeners
    }

    pub fn is_listening(&self) -> bool {
        self.listeners == ListenerState::Attached
    }

    pub fn touch_start_y(&self) -> Option<f64> {
        self.touch_start_y
    }

    /// Take ownership of the scrollable element.
    ///
    /// Only the first call stores its element; later calls are no-ops. Listeners
    /// attach right away unless the configuration disables them.
    pub fn attach(&mut self, element: E) -> Option<ListenerChange> {
        if self.element.is_some() {
            debug!("element already attached, ignoring");
            return None;
        }
        self.element = Some(element);
        debug!("element attached");
        let listen = self.config.is_enabled();
        self.transition(listen)
    }

    /// React to a change of the `enabled` option.
    ///
    /// Nothing happens when both values resolve the same.
    pub fn set_enabled(
        &mut self,
        next: Option<bool>,
        prev: Option<bool>,
    ) -> Option<ListenerChange> {
        self.config.enabled = next;
        let listen = resolve(next, true);
        if listen == resolve(prev, true) {
            return None;
        }
        self.transition(listen)
    }

    /// Apply a new configuration, replacing `old`.
    ///
    /// Starts a smooth scroll when `top_scroll` changed, then reconciles the
    /// listeners with the new `enabled` value.
    ///
    /// # Errors
    /// Fails without changing anything when the new margins are invalid.
    pub fn on_configuration_change(
        &mut self,
        old: &ScrollConfig,
        new: ScrollConfig,
    ) -> Result<ConfigChange> {
        self.margins = new.margins()?;
        let scroll_request = new.top_scroll.filter(|_| new.top_scroll != old.top_scroll);
        let (next, prev) = (new.enabled, old.enabled);
        self.config = new;

        let scrolled_to =
            scroll_request.and_then(|target| self.on_external_scroll_request(target));
        let listeners = self.set_enabled(next, prev);
        Ok(ConfigChange {
            listeners,
            scrolled_to,
        })
    }

    /// [`Self::on_configuration_change`] against the current configuration.
    ///
    /// # Errors
    /// Fails when the new margins are invalid.
    pub fn update(&mut self, new: ScrollConfig) -> Result<ConfigChange> {
        let old = self.config.clone();
        self.on_configuration_change(&old, new)
    }

    /// Smoothly scroll the element toward `target`.
    ///
    /// Skipped when no element is owned or the element already sits at the
    /// requested offset. Returns the offset scrolled toward.
    pub fn on_external_scroll_request(&mut self, target: ScrollTarget) -> Option<f64> {
        let element = self.element.as_mut()?;
        let metrics = element.metrics();
        if (target.as_f64() - metrics.scroll_top).abs() <= f64::EPSILON {
            return None;
        }
        let offset = target.resolve(&metrics);
        debug!(request = ?target, offset, "smooth scroll requested");
        element.smooth_scroll_to(offset);
        Some(offset)
    }

    /// Drop the listeners if they are registered. Safe to call repeatedly.
    pub fn teardown(&mut self) -> Option<ListenerChange> {
        self.touch_start_y = None;
        self.transition(false)
    }

    /// Evaluate an input event without mutating the element.
    ///
    /// Touch starts only record the gesture origin. A touch move before any
    /// touch start has no origin to measure from and passes through.
    pub fn evaluate(&mut self, input: GestureInput) -> Outcome {
        if !self.is_listening() {
            return Outcome::pass_through(None);
        }
        match input {
            GestureInput::TouchStart { client_y } => {
                self.touch_start_y = Some(client_y);
                Outcome::pass_through(None)
            }
            GestureInput::Wheel { delta_y } => self.evaluate_delta(delta_y),
            GestureInput::TouchMove { client_y } => match self.touch_start_y {
                // Finger moving up scrolls the content down.
                Some(start) => self.evaluate_delta(start - client_y),
                None => Outcome::pass_through(None),
            },
        }
    }

    fn evaluate_delta(&self, delta: f64) -> Outcome {
        let Some(element) = self.element.as_ref() else {
            return Outcome::pass_through(Some(delta));
        };
        if !self.config.is_enabled() {
            return Outcome::pass_through(Some(delta));
        }

        let metrics = element.metrics();
        let decision = classify(&metrics, delta, self.margins, self.config.prevents_scroll());
        let pin = match decision {
            Decision::Reached(edge) => Some(metrics.pin_offset(edge)),
            _ => None,
        };
        trace!(delta, ?decision, scroll_top = metrics.scroll_top, "scroll gesture");
        Outcome {
            decision,
            delta: Some(delta),
            pin,
        }
    }

    /// Pin the element to the reached edge, if any.
    pub fn apply(&mut self, outcome: &Outcome) {
        if let (Some(offset), Some(element)) = (outcome.pin, self.element.as_mut()) {
            element.set_scroll_top(offset);
        }
    }

    /// Evaluate and apply an event, leaving callbacks to the caller.
    pub fn handle(&mut self, input: GestureInput) -> Outcome {
        let outcome = self.evaluate(input);
        self.apply(&outcome);
        outcome
    }

    /// Evaluate an event, notify `handler`, then apply the outcome.
    pub fn dispatch(
        &mut self,
        input: GestureInput,
        handler: &mut impl BoundaryHandler,
    ) -> Outcome {
        let outcome = self.evaluate(input);
        match outcome.notification() {
            Some((Edge::Top, delta)) => handler.at_top(delta),
            Some((Edge::Bottom, delta)) => handler.at_bottom(delta),
            None => {}
        }
        self.apply(&outcome);
        outcome
    }

    fn transition(&mut self, listen: bool) -> Option<ListenerChange> {
        if self.element.is_none() {
            return None;
        }
        let change = match (self.listeners, listen) {
            (ListenerState::Detached, true) => ListenerChange::Attach,
            (ListenerState::Attached, false) => ListenerChange::Detach,
            _ => return None,
        };
        self.listeners = match change {
            ListenerChange::Attach => ListenerState::Attached,
            ListenerChange::Detach => ListenerState::Detached,
        };
        debug!(?change, "listener state changed");
        Some(change)
    }
}
