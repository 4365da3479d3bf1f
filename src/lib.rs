//! isolated-scroll - scroll isolation and edge triggers for the web
//!
//! Wraps one scrollable element and watches its wheel and touch gestures:
//! - Notifies `atTop` / `atBottom` once the user scrolls within a margin of an edge
//! - Cancels gestures that would otherwise scroll ancestor containers past an edge
//! - Optionally cancels every gesture (`preventScroll`)
//! - Smoothly scrolls to an externally requested offset (`topScroll`)
//!
//! The widget logic in [`widget`] is host-agnostic and runs natively; the
//! WebAssembly build adds the DOM binding.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { IsolatedScroll } from 'isolated-scroll';
//! await init();
//! const scroll = new IsolatedScroll(container, { atBottom: loadMore });
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use isolated_scroll::{Callbacks, GestureInput, ScrollBoundary, ScrollConfig, SimulatedElement};
//!
//! let mut widget = ScrollBoundary::new(ScrollConfig::new()).unwrap();
//! widget.attach(SimulatedElement::new(600.0, 1000.0, 400.0));
//! let mut callbacks = Callbacks::new().on_bottom(|delta| println!("bottom by {delta}"));
//! let outcome = widget.dispatch(GestureInput::Wheel { delta_y: 50.0 }, &mut callbacks);
//! assert!(outcome.is_suppressed());
//! ```

pub mod boundary;
pub mod config;
pub mod element;
pub mod error;
pub mod predicate;
pub mod render;
pub mod scenario;
pub mod widget;

// DOM binding (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use boundary::{classify, Decision, Edge, ScrollMetrics};
pub use config::{Margins, PassThrough, Props, ScrollConfig, ScrollTarget, DEFAULT_MARGIN};
pub use element::{ScrollElement, SimulatedElement};
pub use error::{IsolatedScrollError, Result};
pub use predicate::resolve;
pub use render::{render_child, RenderedChild};
pub use widget::{
    BoundaryHandler, Callbacks, ConfigChange, GestureInput, ListenerChange, ListenerState,
    Outcome, ScrollBoundary,
};

#[cfg(target_arch = "wasm32")]
pub use web::IsolatedScroll;
