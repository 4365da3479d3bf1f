//! Listener lifecycle and configuration tests
//!
//! Covers element attachment, the Detached/Attached state machine, external
//! scroll requests and configuration updates.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;

use fixtures::{attached, container, scroll_top, wheel};
use isolated_scroll::{
    IsolatedScrollError, ListenerChange, ListenerState, ScrollBoundary, ScrollConfig,
    ScrollTarget, SimulatedElement,
};

fn detached(config: ScrollConfig) -> ScrollBoundary<SimulatedElement> {
    ScrollBoundary::new(config).unwrap()
}

// =============================================================================
// ATTACHMENT
// =============================================================================

#[test]
fn test_attach_registers_listeners_by_default() {
    let mut widget = detached(ScrollConfig::new());
    assert_eq!(widget.listener_state(), ListenerState::Detached);

    let change = widget.attach(container(0.0));

    assert_eq!(change, Some(ListenerChange::Attach));
    assert_eq!(widget.listener_state(), ListenerState::Attached);
}

#[test]
fn test_attach_while_disabled_registers_nothing() {
    let mut widget = detached(ScrollConfig::new().with_enabled(false));
    assert_eq!(widget.attach(container(0.0)), None);
    assert_eq!(widget.listener_state(), ListenerState::Detached);
    assert!(widget.element().is_some());
}

#[test]
fn test_first_attachment_wins() {
    let mut widget = detached(ScrollConfig::new());
    widget.attach(container(120.0));

    let change = widget.attach(container(480.0));

    assert_eq!(change, None);
    assert_eq!(scroll_top(&widget), 120.0);
    assert!(widget.is_listening());
}

#[test]
fn test_events_before_attachment_are_ignored() {
    let mut widget = detached(ScrollConfig::new());
    let outcome = widget.handle(wheel(50.0));
    assert!(!outcome.is_suppressed());
    assert_eq!(outcome.notification(), None);
}

// =============================================================================
// ENABLED TRANSITIONS
// =============================================================================

#[test]
fn test_disable_then_enable() {
    let mut widget = attached(ScrollConfig::new(), 0.0);

    assert_eq!(
        widget.set_enabled(Some(false), None),
        Some(ListenerChange::Detach)
    );
    assert!(!widget.is_listening());

    assert_eq!(
        widget.set_enabled(Some(true), Some(false)),
        Some(ListenerChange::Attach)
    );
    assert!(widget.is_listening());
}

#[test]
fn test_unset_and_true_resolve_the_same() {
    let mut widget = attached(ScrollConfig::new(), 0.0);
    assert_eq!(widget.set_enabled(Some(true), None), None);
    assert_eq!(widget.set_enabled(None, Some(true)), None);
    assert!(widget.is_listening());
}

#[test]
fn test_unchanged_disabled_is_noop() {
    let mut widget = attached(ScrollConfig::new().with_enabled(false), 0.0);
    assert_eq!(widget.set_enabled(Some(false), Some(false)), None);
    assert!(!widget.is_listening());
}

#[test]
fn test_enable_without_element_waits_for_attachment() {
    let mut widget = detached(ScrollConfig::new().with_enabled(false));

    assert_eq!(widget.set_enabled(Some(true), Some(false)), None);
    assert_eq!(widget.listener_state(), ListenerState::Detached);

    assert_eq!(widget.attach(container(0.0)), Some(ListenerChange::Attach));
}

// =============================================================================
// TEARDOWN
// =============================================================================

#[test]
fn test_teardown_detaches_once() {
    let mut widget = attached(ScrollConfig::new(), 0.0);

    assert_eq!(widget.teardown(), Some(ListenerChange::Detach));
    assert_eq!(widget.teardown(), None);
    assert_eq!(widget.listener_state(), ListenerState::Detached);
}

#[test]
fn test_teardown_without_listeners_is_safe() {
    let mut never_attached = detached(ScrollConfig::new());
    assert_eq!(never_attached.teardown(), None);

    let mut disabled = attached(ScrollConfig::new().with_enabled(false), 0.0);
    assert_eq!(disabled.teardown(), None);
}

#[test]
fn test_events_after_teardown_are_ignored() {
    let mut widget = attached(ScrollConfig::new(), 600.0);
    widget.teardown();

    let outcome = widget.handle(wheel(50.0));

    assert!(!outcome.is_suppressed());
    assert_eq!(scroll_top(&widget), 600.0);
}

// =============================================================================
// EXTERNAL SCROLL REQUESTS
// =============================================================================

#[test]
fn test_top_scroll_infinity_scrolls_to_content_height() {
    let mut widget = attached(ScrollConfig::new(), 100.0);

    let change = widget
        .update(ScrollConfig::new().with_top_scroll(ScrollTarget::Bottom))
        .unwrap();

    assert_eq!(change.scrolled_to, Some(1000.0));
    let element = widget.element().unwrap();
    assert_eq!(element.smooth_target, Some(1000.0));
}

#[test]
fn test_top_scroll_negative_infinity_scrolls_to_zero() {
    let mut widget = attached(ScrollConfig::new(), 300.0);
    let request = ScrollTarget::from_f64(f64::NEG_INFINITY).unwrap();
    assert_eq!(widget.on_external_scroll_request(request), Some(0.0));
    assert_eq!(scroll_top(&widget), 0.0);
}

#[test]
fn test_top_scroll_offset_is_used_verbatim() {
    let mut widget = attached(ScrollConfig::new(), 0.0);
    assert_eq!(
        widget.on_external_scroll_request(ScrollTarget::Offset(275.5)),
        Some(275.5)
    );
    assert_eq!(scroll_top(&widget), 275.5);
}

#[test]
fn test_top_scroll_at_current_offset_does_nothing() {
    let mut widget = attached(ScrollConfig::new(), 250.0);
    assert_eq!(
        widget.on_external_scroll_request(ScrollTarget::Offset(250.0)),
        None
    );
    assert_eq!(widget.element().unwrap().smooth_target, None);
}

#[test]
fn test_top_scroll_zero_is_a_real_request() {
    let mut widget = attached(ScrollConfig::new(), 250.0);
    let change = widget
        .update(ScrollConfig::new().with_top_scroll(ScrollTarget::Offset(0.0)))
        .unwrap();
    assert_eq!(change.scrolled_to, Some(0.0));
}

#[test]
fn test_unchanged_top_scroll_is_not_replayed() {
    let config = ScrollConfig::new().with_top_scroll(ScrollTarget::Offset(200.0));
    let mut widget = attached(ScrollConfig::new(), 0.0);

    let first = widget.update(config.clone()).unwrap();
    assert_eq!(first.scrolled_to, Some(200.0));

    // User scrolls away; re-rendering with the same request leaves them there
    widget.element_mut().unwrap().scroll_top = 500.0;
    let second = widget.update(config).unwrap();
    assert_eq!(second.scrolled_to, None);
    assert_eq!(scroll_top(&widget), 500.0);
}

#[test]
fn test_scroll_request_without_element_is_ignored() {
    let mut widget = detached(ScrollConfig::new());
    assert_eq!(
        widget.on_external_scroll_request(ScrollTarget::Bottom),
        None
    );
}

// =============================================================================
// CONFIGURATION UPDATES
// =============================================================================

#[test]
fn test_configuration_change_reconciles_listeners() {
    let old = ScrollConfig::new();
    let mut widget = attached(old.clone(), 0.0);

    let change = widget
        .on_configuration_change(&old, ScrollConfig::new().with_enabled(false))
        .unwrap();

    assert_eq!(change.listeners, Some(ListenerChange::Detach));
    assert_eq!(change.scrolled_to, None);
    assert_eq!(widget.config().enabled, Some(false));
}

#[test]
fn test_configuration_change_applies_new_margins() {
    let mut widget = attached(ScrollConfig::new(), 500.0);
    assert!(widget.handle(wheel(10.0)).notification().is_some());

    widget
        .update(ScrollConfig::new().with_bottom_margin(50.0))
        .unwrap();

    assert_eq!(widget.margins().bottom(), 50.0);
    assert!(widget.handle(wheel(10.0)).notification().is_none());
}

#[test]
fn test_invalid_margin_rejected_without_changes() {
    let mut widget = attached(ScrollConfig::new().with_top_margin(20.0), 0.0);

    let err = widget
        .update(
            ScrollConfig::new()
                .with_enabled(false)
                .with_bottom_margin(-5.0),
        )
        .unwrap_err();

    assert!(matches!(err, IsolatedScrollError::InvalidMargin { .. }));
    assert_eq!(widget.config().at_top_margin, Some(20.0));
    assert!(widget.is_listening());
}

#[test]
fn test_invalid_margin_rejected_at_construction() {
    let result = ScrollBoundary::<SimulatedElement>::new(ScrollConfig::new().with_top_margin(-1.0));
    assert!(result.is_err());
}
