//! The single-child contract.
//!
//! The widget renders nothing of its own: it takes the one child it wraps,
//! hooks itself onto that child's element and forwards every pass-through
//! attribute to it.

use crate::config::PassThrough;
use crate::error::{IsolatedScrollError, Result};

/// The wrapped child together with the attributes to forward to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChild<C, A = PassThrough> {
    pub child: C,
    pub attributes: A,
}

/// Accept exactly one child.
///
/// # Errors
/// Returns [`IsolatedScrollError::ChildCount`] for zero or several children;
/// the widget never picks one silently.
pub fn render_child<C, A: Clone>(
    children: Vec<C>,
    attributes: &A,
) -> Result<RenderedChild<C, A>> {
    let count = children.len();
    let mut children = children.into_iter();
    match (children.next(), children.next()) {
        (Some(child), None) => Ok(RenderedChild {
            child,
            attributes: attributes.clone(),
        }),
        _ => Err(IsolatedScrollError::ChildCount(count)),
    }
}
