//! Stack growth for deep recursion
//!
//! Parsing and evaluation recurse once per nesting level and once per
//! Monkey call. Both entry points run through [`ensure_sufficient_stack`]
//! so that deep input or a high call-depth limit never exhausts the
//! thread's stack.

/// Run `f`, first growing the stack if less than the red zone remains
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (128KB red zone).
    const RED_ZONE: usize = 128 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
