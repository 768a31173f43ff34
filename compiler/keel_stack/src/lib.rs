//! Stack growth for recursive pattern walks.
//!
//! Pattern compilation and runtime matching both recurse once per nesting
//! level of a deconstruction pattern (`Line(Point(a, _), Point(_, b))`).
//! Generated or pathological patterns can nest far deeper than anything
//! written by hand, so every recursive step goes through
//! [`ensure_sufficient_stack`].
//!
//! - **Native targets**: grows the stack with `stacker` when less than the
//!   red zone remains.
//! - **WASM targets**: calls straight through.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: the runtime manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
