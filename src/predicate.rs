//! Tri-state flag resolution.
//!
//! Options such as `enabled` or `preventScroll` may be left unset by the
//! embedding application. Every read of such a flag goes through [`resolve`]
//! so that "unset" consistently means the caller's default.

/// Resolve an optional flag against `default`.
///
/// Unset yields `default`, a set value yields itself.
#[inline]
pub fn resolve(value: Option<bool>, default: bool) -> bool {
    value.unwrap_or(default)
}
