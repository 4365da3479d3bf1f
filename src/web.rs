//! DOM binding for the widget.
//!
//! Exposes the WASM-exported `IsolatedScroll` class. It wraps the single
//! element child of a container, forwards pass-through props to it as
//! attributes, and registers the `wheel` / `touchstart` / `touchmove`
//! listeners that feed [`ScrollBoundary`].
//!
//! ```javascript
//! import init, { IsolatedScroll } from 'isolated-scroll';
//! await init();
//! const scroll = new IsolatedScroll(container, {
//!     atBottom: (delta) => loadMore(),
//!     atBottomMargin: 200,
//!     className: 'feed',
//! });
//! scroll.update({ topScroll: Infinity });
//! scroll.destroy();
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Element, Event, HtmlElement, ScrollBehavior, ScrollToOptions,
    TouchEvent, WheelEvent,
};

use crate::boundary::{Edge, ScrollMetrics};
use crate::config::{Props, ScrollConfig, ScrollTarget};
use crate::element::ScrollElement;
use crate::error::IsolatedScrollError;
use crate::render::render_child;
use crate::widget::{GestureInput, ListenerChange, ListenerState, ScrollBoundary};

type WheelClosure = Closure<dyn FnMut(WheelEvent) -> Result<(), JsValue>>;
type TouchClosure = Closure<dyn FnMut(TouchEvent) -> Result<(), JsValue>>;

/// Pass-through props in the order they were supplied.
type JsAttributes = Vec<(String, JsValue)>;

fn scroll_top_f64(element: &HtmlElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

/// `HtmlElement` seen through the widget's element seam.
#[derive(Debug)]
struct DomElement {
    element: HtmlElement,
}

impl ScrollElement for DomElement {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            scroll_top_f64(&self.element),
            f64::from(self.element.scroll_height()),
            f64::from(self.element.client_height()),
        )
    }

    fn set_scroll_top(&mut self, offset: f64) {
        // Through Reflect to keep fractional offsets; the browser clamps.
        if let Err(e) = Reflect::set(
            self.element.as_ref(),
            &JsValue::from_str("scrollTop"),
            &JsValue::from_f64(offset),
        ) {
            warn!(offset, error = ?e, "failed to set scrollTop");
        }
    }

    fn smooth_scroll_to(&mut self, offset: f64) {
        let options = ScrollToOptions::new();
        options.set_top(offset);
        options.set_left(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.element.scroll_to_with_scroll_to_options(&options);
    }
}

#[derive(Default)]
struct JsCallbacks {
    at_top: Option<Function>,
    at_bottom: Option<Function>,
}

impl JsCallbacks {
    fn for_edge(&self, edge: Edge) -> Option<Function> {
        match edge {
            Edge::Top => self.at_top.clone(),
            Edge::Bottom => self.at_bottom.clone(),
        }
    }
}

/// A JS props object split into its recognized and forwarded parts.
#[derive(Default)]
struct JsProps {
    config: ScrollConfig,
    callbacks: JsCallbacks,
    attributes: JsAttributes,
}

fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

fn flag_prop(value: &JsValue) -> Option<bool> {
    // Any defined value counts, coerced with JS truthiness.
    if value.is_undefined() {
        None
    } else {
        Some(value.is_truthy())
    }
}

fn number_prop(name: &str, value: &JsValue) -> Result<Option<f64>, IsolatedScrollError> {
    if is_absent(value) {
        return Ok(None);
    }
    value
        .as_f64()
        .map(Some)
        .ok_or_else(|| IsolatedScrollError::InvalidProps(format!("{name} must be a number")))
}

fn function_prop(name: &str, value: &JsValue) -> Result<Option<Function>, IsolatedScrollError> {
    if is_absent(value) {
        return Ok(None);
    }
    value
        .dyn_ref::<Function>()
        .cloned()
        .map(Some)
        .ok_or_else(|| IsolatedScrollError::InvalidProps(format!("{name} must be a function")))
}

fn parse_props(props: &JsValue) -> Result<JsProps, IsolatedScrollError> {
    let mut parsed = JsProps::default();
    if is_absent(props) {
        return Ok(parsed);
    }
    let object = props
        .dyn_ref::<Object>()
        .ok_or_else(|| IsolatedScrollError::InvalidProps("props must be an object".into()))?;

    for key in Object::keys(object).iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        let value = Reflect::get(object, &key)
            .map_err(|e| IsolatedScrollError::InvalidProps(format!("{name}: {e:?}")))?;
        if !Props::is_recognized(&name) {
            parsed.attributes.push((name, value));
            continue;
        }
        match name.as_str() {
            "atTop" => parsed.callbacks.at_top = function_prop(&name, &value)?,
            "atBottom" => parsed.callbacks.at_bottom = function_prop(&name, &value)?,
            "atTopMargin" => parsed.config.at_top_margin = number_prop(&name, &value)?,
            "atBottomMargin" => parsed.config.at_bottom_margin = number_prop(&name, &value)?,
            "enabled" => parsed.config.enabled = flag_prop(&value),
            "preventScroll" => parsed.config.prevent_scroll = flag_prop(&value),
            "topScroll" => {
                parsed.config.top_scroll =
                    number_prop(&name, &value)?.and_then(ScrollTarget::from_f64);
            }
            _ => {}
        }
    }
    Ok(parsed)
}

fn dom_attribute_name(prop: &str) -> &str {
    match prop {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

/// How a pass-through prop landed on the child.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Forwarded {
    Attribute(String),
    Property(String),
}

impl Forwarded {
    fn name(&self) -> &str {
        match self {
            Self::Attribute(name) | Self::Property(name) => name,
        }
    }
}

/// Values that cannot be expressed as an attribute (functions, objects).
fn is_property_value(value: &JsValue) -> bool {
    !is_absent(value)
        && value.as_bool().is_none()
        && value.as_string().is_none()
        && value.as_f64().is_none()
}

/// Write pass-through props onto `child`, undoing whatever was forwarded last
/// time but is absent now.
///
/// Strings and numbers become attributes, `true` an empty attribute, `false`
/// and `null` remove the attribute. Anything else (event handlers, objects) is
/// assigned as a property and reset to `undefined` once it goes away.
fn forward_attributes(
    child: &HtmlElement,
    attributes: &JsAttributes,
    previous: &[Forwarded],
) -> Result<Vec<Forwarded>, JsValue> {
    for stale in previous {
        let current = attributes
            .iter()
            .find(|(name, _)| name == stale.name())
            .map(|(_, value)| value);
        match stale {
            Forwarded::Attribute(name) if current.map_or(true, is_property_value) => {
                child.remove_attribute(dom_attribute_name(name))?;
            }
            Forwarded::Property(name) if !current.is_some_and(is_property_value) => {
                Reflect::set(child.as_ref(), &JsValue::from_str(name), &JsValue::UNDEFINED)?;
            }
            _ => {}
        }
    }

    let mut written = Vec::with_capacity(attributes.len());
    for (name, value) in attributes {
        let attr = dom_attribute_name(name);
        if is_property_value(value) {
            Reflect::set(child.as_ref(), &JsValue::from_str(name), value)?;
            written.push(Forwarded::Property(name.clone()));
            continue;
        }
        if is_absent(value) || value.as_bool() == Some(false) {
            child.remove_attribute(attr)?;
        } else if let Some(text) = value.as_string() {
            child.set_attribute(attr, &text)?;
        } else if let Some(number) = value.as_f64() {
            child.set_attribute(attr, &number.to_string())?;
        } else {
            child.set_attribute(attr, "")?;
        }
        written.push(Forwarded::Attribute(name.clone()));
    }
    Ok(written)
}

fn element_children(container: &HtmlElement) -> Vec<Element> {
    let children = container.children();
    (0..children.length())
        .filter_map(|index| children.item(index))
        .collect()
}

/// State shared between the exported object and its event listeners.
struct SharedState {
    boundary: ScrollBoundary<DomElement>,
    callbacks: JsCallbacks,
}

/// Registered listener closures. Kept alive so the very same functions can be
/// removed again.
struct Listeners {
    target: HtmlElement,
    wheel: WheelClosure,
    touch_start: TouchClosure,
    touch_move: TouchClosure,
}

impl Listeners {
    fn register(target: &HtmlElement, state: &Rc<RefCell<SharedState>>) -> Result<Self, JsValue> {
        let weak = Rc::downgrade(state);
        let wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
            let input = GestureInput::Wheel {
                delta_y: event.delta_y(),
            };
            handle_gesture(&weak, event.as_ref(), input)
        }) as Box<dyn FnMut(WheelEvent) -> Result<(), JsValue>>);

        let weak = Rc::downgrade(state);
        let touch_start = Closure::wrap(Box::new(move |event: TouchEvent| {
            match first_touch_y(&event) {
                Some(client_y) => {
                    handle_gesture(&weak, event.as_ref(), GestureInput::TouchStart { client_y })
                }
                None => Ok(()),
            }
        }) as Box<dyn FnMut(TouchEvent) -> Result<(), JsValue>>);

        let weak = Rc::downgrade(state);
        let touch_move = Closure::wrap(Box::new(move |event: TouchEvent| {
            match first_touch_y(&event) {
                Some(client_y) => {
                    handle_gesture(&weak, event.as_ref(), GestureInput::TouchMove { client_y })
                }
                None => Ok(()),
            }
        }) as Box<dyn FnMut(TouchEvent) -> Result<(), JsValue>>);

        // Non-passive, otherwise preventDefault is ignored for wheel and touch.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        for (event_type, callback) in [
            ("wheel", wheel.as_ref()),
            ("touchstart", touch_start.as_ref()),
            ("touchmove", touch_move.as_ref()),
        ] {
            target
                .add_event_listener_with_callback_and_add_event_listener_options(
                    event_type,
                    callback.unchecked_ref(),
                    &options,
                )
                .map_err(|e| {
                    IsolatedScrollError::Dom(format!("failed to register {event_type}: {e:?}"))
                })?;
        }

        Ok(Self {
            target: target.clone(),
            wheel,
            touch_start,
            touch_move,
        })
    }

    fn unregister(&self) {
        for (event_type, callback) in [
            ("wheel", self.wheel.as_ref()),
            ("touchstart", self.touch_start.as_ref()),
            ("touchmove", self.touch_move.as_ref()),
        ] {
            if let Err(e) = self
                .target
                .remove_event_listener_with_callback(event_type, callback.unchecked_ref())
            {
                warn!(event_type, error = ?e, "failed to remove listener");
            }
        }
    }
}

fn first_touch_y(event: &TouchEvent) -> Option<f64> {
    event
        .changed_touches()
        .get(0)
        .map(|touch| f64::from(touch.client_y()))
}

/// Run one gesture through the widget.
///
/// The state borrow is released before the JS callback runs, so a callback
/// may call back into the widget. An exception thrown by the callback is
/// rethrown to the host and the event is then left alone.
fn handle_gesture(
    state: &Weak<RefCell<SharedState>>,
    event: &Event,
    input: GestureInput,
) -> Result<(), JsValue> {
    let Some(state) = state.upgrade() else {
        return Ok(());
    };

    let (outcome, callback) = {
        let mut s = state.borrow_mut();
        let outcome = s.boundary.evaluate(input);
        let callback = outcome
            .notification()
            .and_then(|(edge, delta)| s.callbacks.for_edge(edge).map(|f| (f, delta)));
        (outcome, callback)
    };

    if let Some((callback, delta)) = callback {
        callback.call1(&JsValue::NULL, &JsValue::from_f64(delta))?;
    }

    state.borrow_mut().boundary.apply(&outcome);
    if outcome.is_suppressed() {
        event.stop_immediate_propagation();
        event.prevent_default();
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateSnapshot<'a> {
    listeners: ListenerState,
    config: &'a ScrollConfig,
    metrics: Option<ScrollMetrics>,
    touch_start_y: Option<f64>,
}

/// Scroll-isolating wrapper around a container's single child element.
#[wasm_bindgen]
pub struct IsolatedScroll {
    state: Rc<RefCell<SharedState>>,
    listeners: Option<Listeners>,
    child: HtmlElement,
    forwarded: Vec<Forwarded>,
}

#[wasm_bindgen]
impl IsolatedScroll {
    /// Wrap the only element child of `container`.
    ///
    /// # Errors
    /// Throws when the container does not hold exactly one element child, when
    /// a recognized prop has the wrong type, or when a margin is negative. The
    /// child is left untouched in all three cases.
    #[wasm_bindgen(constructor)]
    pub fn new(container: &HtmlElement, props: &JsValue) -> Result<IsolatedScroll, JsValue> {
        console_error_panic_hook::set_once();

        let parsed = parse_props(props)?;
        let rendered = render_child(element_children(container), &parsed.attributes)?;
        let child = rendered.child.dyn_into::<HtmlElement>().map_err(|_| {
            IsolatedScrollError::InvalidProps("child must be an HTML element".into())
        })?;
        let mut boundary = ScrollBoundary::new(parsed.config)?;
        let forwarded = forward_attributes(&child, &rendered.attributes, &[])?;

        let change = boundary.attach(DomElement {
            element: child.clone(),
        });
        let state = Rc::new(RefCell::new(SharedState {
            boundary,
            callbacks: parsed.callbacks,
        }));

        let mut view = Self {
            state,
            listeners: None,
            child,
            forwarded,
        };
        view.reconcile(change)?;
        Ok(view)
    }

    /// Apply a new props object. Returns the offset a smooth scroll was
    /// started toward, if `topScroll` changed.
    ///
    /// # Errors
    /// Throws on malformed props or when an attribute cannot be written; the
    /// previous configuration and listeners stay in place.
    pub fn update(&mut self, props: &JsValue) -> Result<Option<f64>, JsValue> {
        let parsed = parse_props(props)?;
        parsed.config.margins()?;
        self.forwarded = forward_attributes(&self.child, &parsed.attributes, &self.forwarded)?;

        let change = {
            let mut s = self.state.borrow_mut();
            let old = s.boundary.config().clone();
            let change = s.boundary.on_configuration_change(&old, parsed.config)?;
            s.callbacks = parsed.callbacks;
            change
        };
        self.reconcile(change.listeners)?;
        Ok(change.scrolled_to)
    }

    /// Remove the listeners. Safe to call more than once.
    pub fn destroy(&mut self) {
        let change = self.state.borrow_mut().boundary.teardown();
        if let Err(e) = self.reconcile(change) {
            warn!(error = ?e, "failed to release listeners");
        }
    }

    /// Whether the wheel/touch listeners are currently registered.
    #[wasm_bindgen(js_name = isListening)]
    pub fn is_listening(&self) -> bool {
        self.listeners.is_some()
    }

    /// Snapshot of listener state, configuration and scroll metrics.
    ///
    /// # Errors
    /// Throws if the snapshot cannot be converted to a JS object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let snapshot = StateSnapshot {
            listeners: s.boundary.listener_state(),
            config: s.boundary.config(),
            metrics: s.boundary.element().map(ScrollElement::metrics),
            touch_start_y: s.boundary.touch_start_y(),
        };
        serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl IsolatedScroll {
    fn reconcile(&mut self, change: Option<ListenerChange>) -> Result<(), JsValue> {
        match change {
            Some(ListenerChange::Attach) if self.listeners.is_none() => {
                match Listeners::register(&self.child, &self.state) {
                    Ok(listeners) => self.listeners = Some(listeners),
                    Err(e) => {
                        // Keep the widget state in line with what is registered.
                        self.state.borrow_mut().boundary.teardown();
                        return Err(e);
                    }
                }
            }
            Some(ListenerChange::Detach) => {
                if let Some(listeners) = self.listeners.take() {
                    listeners.unregister();
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl Drop for IsolatedScroll {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.take() {
            listeners.unregister();
        }
    }
}
