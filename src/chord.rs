//! The dispatch tree node.
//!
//! A [`Chord`] holds three things:
//!
//! | Field | Storage | Concurrency |
//! |---|---|---|
//! | handlers | `DashMap<String, Handler>` | sharded locks, per-key linearizable |
//! | chords | `DashMap<String, Arc<Chord>>` | sharded locks, per-key linearizable |
//! | middleware | `ArcSwap<Vec<Middleware>>` | copy-on-write, lock-free reads |
//!
//! Handler keys and chord keys are separate namespaces: `"git"` can be both a
//! handler and a mounted chord on the same node.
//!
//! Every method takes `&self`. Share a tree across threads with `Arc<Chord>`
//! and mutate it from anywhere; no external lock is needed.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tracing::debug;

use crate::error::Error;
use crate::handler::Handler;
use crate::input::Input;
use crate::middleware::{Middleware, compose};
use crate::output::Output;
use crate::resolve::Resolver;

/// A registry of handlers, nested chords, and local middleware.
pub struct Chord {
    handlers: DashMap<String, Handler>,
    chords: DashMap<String, Arc<Chord>>,
    middleware: ArcSwap<Vec<Middleware>>,
}

impl Chord {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            chords: DashMap::new(),
            middleware: ArcSwap::from_pointee(Vec::new()),
        }
    }

    // ── Handlers ─────────────────────────────────────────────────────────────

    /// Stores `handler` under `key`, replacing whatever was there.
    pub fn register(&self, key: impl Into<String>, handler: impl Into<Handler>) {
        let key = key.into();
        debug!(%key, "handler registered");
        self.handlers.insert(key, handler.into());
    }

    /// Composes `handler` with `middleware` (first entry outermost), then
    /// stores the result under `key`.
    ///
    /// The map only ever sees the finished handler; no reader can observe a
    /// partly wrapped one.
    pub fn register_with<I>(&self, key: impl Into<String>, handler: impl Into<Handler>, middleware: I)
    where
        I: IntoIterator,
        I::Item: Into<Middleware>,
    {
        let middleware: Vec<Middleware> = middleware.into_iter().map(Into::into).collect();
        self.register(key, compose(handler.into(), &middleware));
    }

    /// Removes the handler stored under `key` and returns it.
    ///
    /// `handler` is accepted but **not** compared with the stored value: any
    /// caller can remove any key's handler by naming the key. Use
    /// [`unregister_exact`](Chord::unregister_exact) to remove only a specific
    /// handler.
    pub fn unregister(&self, key: &str, _handler: &Handler) -> Option<Handler> {
        let removed = self.handlers.remove(key).map(|(_, handler)| handler);
        if removed.is_some() {
            debug!(key, "handler unregistered");
        }
        removed
    }

    /// Removes the handler under `key` only if it is `handler` (same
    /// allocation, see [`Handler::ptr_eq`]). Returns whether it was removed.
    pub fn unregister_exact(&self, key: &str, handler: &Handler) -> bool {
        let removed = self
            .handlers
            .remove_if(key, |_, stored| stored.ptr_eq(handler))
            .is_some();
        if removed {
            debug!(key, "handler unregistered");
        }
        removed
    }

    pub fn handler(&self, key: &str) -> Option<Handler> {
        self.handlers.get(key).map(|entry| entry.value().clone())
    }

    /// Keys of every registered handler, sorted.
    pub fn handler_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        keys
    }

    // ── Chords ───────────────────────────────────────────────────────────────

    /// Mounts `chord` under `key`, replacing whatever was there.
    ///
    /// The `Arc` is shared, not copied: the same chord may be mounted under
    /// several parents, and later changes to it are visible through all of
    /// them. Nothing prevents mounting a chord under itself.
    pub fn mount(&self, key: impl Into<String>, chord: Arc<Chord>) {
        let key = key.into();
        debug!(%key, "chord mounted");
        self.chords.insert(key, chord);
    }

    pub fn unmount(&self, key: &str) -> Option<Arc<Chord>> {
        let removed = self.chords.remove(key).map(|(_, chord)| chord);
        if removed.is_some() {
            debug!(key, "chord unmounted");
        }
        removed
    }

    pub fn chord(&self, key: &str) -> Option<Arc<Chord>> {
        self.chords.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Keys of every mounted chord, sorted.
    pub fn chord_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.chords.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        keys
    }

    // ── Middleware ───────────────────────────────────────────────────────────

    /// Appends `middleware` to this chord's list.
    ///
    /// The whole batch lands at once: concurrent readers see the list either
    /// before or after it, never a part of it.
    pub fn use_middleware<I>(&self, middleware: I)
    where
        I: IntoIterator,
        I::Item: Into<Middleware>,
    {
        let added: Vec<Middleware> = middleware.into_iter().map(Into::into).collect();
        if added.is_empty() {
            return;
        }

        // `rcu` may run the closure more than once if another writer wins the
        // swap; each attempt rebuilds from the latest list.
        self.middleware.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + added.len());
            next.extend(current.iter().cloned());
            next.extend(added.iter().cloned());
            next
        });
        debug!(added = added.len(), "middleware added");
    }

    /// An immutable snapshot of this chord's middleware. Later appends do not
    /// show up in it.
    pub fn middleware(&self) -> Arc<Vec<Middleware>> {
        self.middleware.load_full()
    }

    // ── Execution ────────────────────────────────────────────────────────────

    /// Resolves `path` from this chord, runs the handler, then flushes
    /// `output`.
    ///
    /// ```rust
    /// use chord::{Chord, Input, Output};
    /// use std::io::Write;
    /// use std::sync::Arc;
    ///
    /// let git = Arc::new(Chord::new());
    /// git.register("status", |_: Input, out: &mut Output| {
    ///     let _ = out.write_all(b"clean");
    /// });
    ///
    /// let root = Chord::new();
    /// root.mount("git", git);
    ///
    /// let (mut out, capture) = Output::memory("");
    /// root.dispatch(&["git", "status"], Input::new("status"), &mut out).unwrap();
    /// assert_eq!(capture.to_string_lossy(), "clean");
    /// ```
    pub fn dispatch<S: AsRef<str>>(
        &self,
        path: &[S],
        input: Input,
        output: &mut Output,
    ) -> Result<(), Error> {
        use std::io::Write;

        let handler = Resolver::new().resolve(self, path)?;
        handler.call(input, output);
        output.flush()?;
        Ok(())
    }

    /// `true` if no handler is registered and no chord is mounted.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.chords.is_empty()
    }
}

impl Default for Chord {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chord")
            .field("handlers", &self.handler_keys())
            .field("chords", &self.chord_keys())
            .field("middleware", &self.middleware.load().len())
            .finish()
    }
}
