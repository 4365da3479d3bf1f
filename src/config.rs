//! Widget configuration.
//!
//! [`ScrollConfig`] holds the recognized options; every other key the
//! embedding application supplies travels separately in [`Props::attributes`]
//! and is forwarded to the wrapped child untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::boundary::{Edge, ScrollMetrics};
use crate::error::{IsolatedScrollError, Result};
use crate::predicate::resolve;

/// Margin used for either edge when none is configured.
pub const DEFAULT_MARGIN: f64 = 150.0;

/// Option names the widget consumes itself (JavaScript spelling).
pub const RECOGNIZED_KEYS: [&str; 7] = [
    "atTop",
    "atBottom",
    "atTopMargin",
    "atBottomMargin",
    "enabled",
    "preventScroll",
    "topScroll",
];

/// Attributes forwarded verbatim to the wrapped child.
pub type PassThrough = BTreeMap<String, serde_json::Value>;

/// Validated trigger distances for both edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    top: f64,
    bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: DEFAULT_MARGIN,
            bottom: DEFAULT_MARGIN,
        }
    }
}

impl Margins {
    /// Build margins, rejecting negative or NaN distances.
    ///
    /// # Errors
    /// Returns [`IsolatedScrollError::InvalidMargin`] naming the first bad edge.
    pub fn new(top: f64, bottom: f64) -> Result<Self> {
        Ok(Self {
            top: check_margin(Edge::Top, top)?,
            bottom: check_margin(Edge::Bottom, bottom)?,
        })
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.top
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.bottom
    }
}

fn check_margin(edge: Edge, value: f64) -> Result<f64> {
    if value.is_nan() || value < 0.0 {
        return Err(IsolatedScrollError::InvalidMargin { edge, value });
    }
    Ok(value)
}

/// Externally requested scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TargetRepr", into = "TargetRepr")]
pub enum ScrollTarget {
    /// Scroll to offset zero (requested as negative infinity).
    Top,
    /// Scroll to the full content height (requested as positive infinity).
    Bottom,
    /// Scroll to this offset.
    Offset(f64),
}

impl ScrollTarget {
    /// Interpret a numeric request. Infinities select an edge; NaN is no
    /// request at all.
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                Some(Self::Bottom)
            } else {
                Some(Self::Top)
            }
        } else {
            Some(Self::Offset(value))
        }
    }

    /// Concrete offset to scroll to for the given element state.
    pub fn resolve(&self, metrics: &ScrollMetrics) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Bottom => metrics.scroll_height,
            Self::Offset(offset) => *offset,
        }
    }

    /// Numeric form, with infinities for the edge requests.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Top => f64::NEG_INFINITY,
            Self::Bottom => f64::INFINITY,
            Self::Offset(offset) => *offset,
        }
    }
}

// JSON has no infinities, so edge requests are spelled as keywords there.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    Keyword(TargetKeyword),
    Offset(f64),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TargetKeyword {
    Top,
    Bottom,
}

impl From<TargetRepr> for ScrollTarget {
    fn from(repr: TargetRepr) -> Self {
        match repr {
            TargetRepr::Keyword(TargetKeyword::Top) => Self::Top,
            TargetRepr::Keyword(TargetKeyword::Bottom) => Self::Bottom,
            TargetRepr::Offset(offset) => Self::from_f64(offset).unwrap_or(Self::Offset(0.0)),
        }
    }
}

impl From<ScrollTarget> for TargetRepr {
    fn from(target: ScrollTarget) -> Self {
        match target {
            ScrollTarget::Top => Self::Keyword(TargetKeyword::Top),
            ScrollTarget::Bottom => Self::Keyword(TargetKeyword::Bottom),
            ScrollTarget::Offset(offset) => Self::Offset(offset),
        }
    }
}

/// Recognized widget options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollConfig {
    /// Listener gate; unset means enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Cancel every gesture instead of only those hitting an edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_scroll: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_top_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_bottom_margin: Option<f64>,
    /// Programmatic smooth-scroll request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_scroll: Option<ScrollTarget>,
}

impl ScrollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_prevent_scroll(mut self, prevent: bool) -> Self {
        self.prevent_scroll = Some(prevent);
        self
    }

    pub fn with_top_margin(mut self, margin: f64) -> Self {
        self.at_top_margin = Some(margin);
        self
    }

    pub fn with_bottom_margin(mut self, margin: f64) -> Self {
        self.at_bottom_margin = Some(margin);
        self
    }

    pub fn with_top_scroll(mut self, target: ScrollTarget) -> Self {
        self.top_scroll = Some(target);
        self
    }

    /// Resolved listener gate.
    pub fn is_enabled(&self) -> bool {
        resolve(self.enabled, true)
    }

    /// Resolved unconditional-suppression gate.
    pub fn prevents_scroll(&self) -> bool {
        resolve(self.prevent_scroll, false)
    }

    /// Margins with defaults filled in.
    ///
    /// # Errors
    /// Fails when a configured margin is negative or NaN.
    pub fn margins(&self) -> Result<Margins> {
        Margins::new(
            self.at_top_margin.unwrap_or(DEFAULT_MARGIN),
            self.at_bottom_margin.unwrap_or(DEFAULT_MARGIN),
        )
    }
}

/// Everything the embedding application hands the widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProps")]
pub struct Props {
    #[serde(flatten)]
    pub config: ScrollConfig,
    /// Keys outside [`RECOGNIZED_KEYS`], forwarded to the child.
    #[serde(flatten)]
    pub attributes: PassThrough,
}

/// Wire shape of [`Props`]. The flattened map also catches the callback keys,
/// which carry no data and are dropped on conversion.
#[derive(Deserialize)]
struct RawProps {
    #[serde(flatten)]
    config: ScrollConfig,
    #[serde(flatten)]
    attributes: PassThrough,
}

impl From<RawProps> for Props {
    fn from(raw: RawProps) -> Self {
        let mut attributes = raw.attributes;
        attributes.retain(|key, _| !Props::is_recognized(key));
        Self {
            config: raw.config,
            attributes,
        }
    }
}

impl Props {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            attributes: PassThrough::new(),
        }
    }

    /// Add a forwarded attribute. Recognized option names are ignored.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        let key = key.into();
        if !Self::is_recognized(&key) {
            self.attributes.insert(key, value);
        }
        self
    }

    /// Whether `key` is consumed by the widget rather than forwarded.
    pub fn is_recognized(key: &str) -> bool {
        RECOGNIZED_KEYS.contains(&key)
    }
}
