//! Shared helpers for widget integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;

use isolated_scroll::{
    Callbacks, Edge, GestureInput, Outcome, ScrollBoundary, ScrollConfig, SimulatedElement,
};

/// Boundary notifications in the order they fired.
pub type Calls = Rc<RefCell<Vec<(Edge, f64)>>>;

/// Callbacks that push every notification into the returned log.
pub fn recording_callbacks() -> (Callbacks, Calls) {
    let calls: Calls = Rc::default();
    let top = Rc::clone(&calls);
    let bottom = Rc::clone(&calls);
    let callbacks = Callbacks::new()
        .on_top(move |delta| top.borrow_mut().push((Edge::Top, delta)))
        .on_bottom(move |delta| bottom.borrow_mut().push((Edge::Bottom, delta)));
    (callbacks, calls)
}

/// The reference container: 1000 tall content in a 400 tall viewport.
pub fn container(scroll_top: f64) -> SimulatedElement {
    SimulatedElement::new(scroll_top, 1000.0, 400.0)
}

/// A widget attached to `container(scroll_top)`.
pub fn attached(config: ScrollConfig, scroll_top: f64) -> ScrollBoundary<SimulatedElement> {
    let mut widget = ScrollBoundary::new(config).expect("valid config");
    widget.attach(container(scroll_top));
    widget
}

pub fn wheel(delta_y: f64) -> GestureInput {
    GestureInput::Wheel { delta_y }
}

pub fn touch_start(client_y: f64) -> GestureInput {
    GestureInput::TouchStart { client_y }
}

pub fn touch_move(client_y: f64) -> GestureInput {
    GestureInput::TouchMove { client_y }
}

pub fn scroll_top(widget: &ScrollBoundary<SimulatedElement>) -> f64 {
    widget.element().expect("element attached").scroll_top
}

/// Dispatch with fresh recording callbacks.
pub fn dispatch_recorded(
    widget: &mut ScrollBoundary<SimulatedElement>,
    input: GestureInput,
) -> (Outcome, Vec<(Edge, f64)>) {
    let (mut callbacks, calls) = recording_callbacks();
    let outcome = widget.dispatch(input, &mut callbacks);
    let seen = calls.borrow().clone();
    (outcome, seen)
}
