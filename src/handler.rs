//! Handler type and type erasure.
//!
//! # How handlers are stored
//!
//! A [`Chord`](crate::Chord) holds handlers of *different* closure types in a
//! single map. Rust collections can only hold one concrete type, so every
//! handler is hidden behind a trait object (`dyn ErasedHandler`) and shared
//! through an `Arc`.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! |input, out| { … }                      ← user writes this
//!        ↓ chord.register("status", …)
//! Handler::from(closure)                  ← From blanket impl
//!        ↓
//! Arc::new(FnHandler(closure))            ← heap-allocated wrapper
//!        ↓  stored as Handler(Arc<dyn ErasedHandler>)
//! handler.call(input, &mut output)        ← one vtable dispatch
//! ```
//!
//! Cloning a [`Handler`] is one atomic increment. Middleware composition
//! builds new handlers around existing ones; it never touches the one it
//! wraps.

use std::fmt;
use std::sync::Arc;

use crate::input::Input;
use crate::output::Output;

// ── Internal types ────────────────────────────────────────────────────────────

/// Internal dispatch interface behind every [`Handler`].
trait ErasedHandler {
    fn call(&self, input: Input, output: &mut Output);
}

/// Newtype that holds a concrete closure `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F> ErasedHandler for FnHandler<F>
where
    F: Fn(Input, &mut Output),
{
    fn call(&self, input: Input, output: &mut Output) {
        (self.0)(input, output)
    }
}

// ── Public Handler type ───────────────────────────────────────────────────────

/// An executable unit bound to a key.
///
/// Any closure or function with the signature
///
/// ```text
/// fn name(input: Input, output: &mut Output)
/// ```
///
/// converts into a `Handler`, so registration accepts plain closures:
///
/// ```rust
/// use chord::{Chord, Input, Output};
/// use std::io::Write;
///
/// let root = Chord::new();
/// root.register("hello", |input: Input, out: &mut Output| {
///     let _ = writeln!(out, "hello {}", input.args().join(" "));
/// });
/// ```
///
/// The handler is a black box to the tree: it is stored, composed and
/// invoked, never inspected.
#[derive(Clone)]
pub struct Handler(Arc<dyn ErasedHandler + Send + Sync + 'static>);

impl Handler {
    /// Wraps a closure as a handler.
    ///
    /// Equivalent to `Handler::from(f)`, but gives the compiler the closure
    /// signature up front, which is what middleware bodies usually want.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Input, &mut Output) + Send + Sync + 'static,
    {
        Self(Arc::new(FnHandler(f)))
    }

    /// Runs the handler to completion.
    pub fn call(&self, input: Input, output: &mut Output) {
        self.0.call(input, output)
    }

    /// Returns `true` if both values point at the same handler allocation.
    ///
    /// Clones of one `Handler` compare equal; two handlers built from
    /// identical closures do not.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<F> From<F> for Handler
where
    F: Fn(Input, &mut Output) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_closure_handler_writes_output() {
        let handler = Handler::new(|input: Input, out: &mut Output| {
            write!(out, "{}:{}", input.key(), input.args().len()).unwrap();
        });

        let (mut out, capture) = Output::memory("");
        handler.call(Input::new("ping").with_arg("a").with_arg("b"), &mut out);
        out.flush().unwrap();

        assert_eq!(capture.to_string_lossy(), "ping:2");
    }

    #[test]
    fn test_ptr_eq_follows_clones() {
        let a = Handler::new(|_, _| {});
        let b = Handler::new(|_, _| {});

        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
