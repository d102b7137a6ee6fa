//! Middleware layer.
//!
//! Middleware takes a [`Handler`] and returns a new one that wraps it. It is
//! the right place for cross-cutting concerns: structured tracing, timing,
//! argument checks, access control.
//!
//! # Order
//!
//! A middleware list is FIFO: the first entry is the outermost layer. It runs
//! first on the way in and last on the way out.
//!
//! ```text
//! [w1, w2] around h
//!
//!   w1 ─┐                    ┌─ w1
//!       w2 ─┐          ┌─ w2
//!           └─── h ────┘
//! ```
//!
//! [`compose`] builds this by applying the list last to first, so `w1` is
//! applied last and ends up wrapping everything else.
//!
//! Built-in middleware:
//! - [`trace`]: per-call span with key, argument count and latency

use std::fmt;
use std::sync::Arc;

use crate::handler::Handler;

mod trace;

pub use trace::trace;

// ── Internal types ────────────────────────────────────────────────────────────

trait ErasedMiddleware {
    fn wrap(&self, next: Handler) -> Handler;
}

struct FnMiddleware<F>(F);

impl<F> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Handler) -> Handler,
{
    fn wrap(&self, next: Handler) -> Handler {
        (self.0)(next)
    }
}

// ── Public Middleware type ────────────────────────────────────────────────────

/// A decorator producing a new [`Handler`] from an existing one.
///
/// Any `Fn(Handler) -> Handler` converts into `Middleware`:
///
/// ```rust
/// use chord::{Handler, Middleware};
///
/// let quiet = Middleware::new(|next: Handler| {
///     Handler::new(move |input, out| {
///         if input.flag("quiet").is_none() {
///             next.call(input, out);
///         }
///     })
/// });
/// ```
#[derive(Clone)]
pub struct Middleware(Arc<dyn ErasedMiddleware + Send + Sync + 'static>);

impl Middleware {
    /// Wraps a closure as middleware.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self(Arc::new(FnMiddleware(f)))
    }

    /// Wraps `next`, returning the decorated handler. `next` itself is left
    /// untouched.
    pub fn wrap(&self, next: Handler) -> Handler {
        self.0.wrap(next)
    }
}

impl<F> From<F> for Middleware
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

/// Wraps `base` in every entry of `middleware`, first entry outermost.
///
/// An empty list returns `base` itself (same allocation).
pub fn compose(base: Handler, middleware: &[Middleware]) -> Handler {
    middleware
        .iter()
        .rev()
        .fold(base, |next, layer| layer.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Log, around, invoke, leaf};

    #[test]
    fn test_first_middleware_is_outermost() {
        let log = Log::default();
        let composed = compose(leaf(&log), &[around(&log, "a", "A"), around(&log, "b", "B")]);

        invoke(&composed);

        assert_eq!(log.entries(), ["a", "b", "h", "B", "A"]);
    }

    #[test]
    fn test_single_middleware_is_applied() {
        let log = Log::default();
        let composed = compose(leaf(&log), &[around(&log, "a", "A")]);

        invoke(&composed);

        assert_eq!(log.entries(), ["a", "h", "A"]);
    }

    #[test]
    fn test_empty_list_returns_base() {
        let log = Log::default();
        let base = leaf(&log);

        assert!(compose(base.clone(), &[]).ptr_eq(&base));
    }

    #[test]
    fn test_compose_leaves_base_untouched() {
        let log = Log::default();
        let base = leaf(&log);
        let _ = compose(base.clone(), &[around(&log, "a", "A")]);

        invoke(&base);

        assert_eq!(log.entries(), ["h"]);
    }
}
