//! Stack growth guard for recursive walks.
//!
//! Trees copied with `dup`, ancestor chains walked during
//! linearization, and type-member resolution all recurse once per level of
//! nesting. Inputs are program-shaped, so depth is unbounded in principle.
//! Every such recursion goes through [`ensure_sufficient_stack`], which
//! switches to a freshly allocated stack segment when the current one runs
//! low.
//!
//! On `wasm32` the guard is a plain call.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
///
/// ```text
/// fn depth(tree: &TreePtr) -> usize {
///     ensure_sufficient_stack(|| 1 + children(tree).map(depth).max().unwrap_or(0))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Run `f` directly; the wasm runtime owns its stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
