//! Path resolution.
//!
//! A path is an ordered list of keys. Every key but the last must name a
//! mounted chord; the last names a handler on the chord reached. The handler
//! comes back wrapped in the middleware of every chord visited, deepest chord
//! closest to the handler and the root outermost:
//!
//! ```text
//! root [m1]  ──"git"──▶  git [m2]  ──"commit"──▶  handler h
//!
//! match_path(root, ["git", "commit"])  ==  m1(m2(h))
//! ```
//!
//! Resolution is a loop, not recursion: it descends collecting each chord's
//! middleware snapshot, then composes the snapshots bottom-up. No lock spans
//! the walk. Each chord is read when it is visited, so a concurrent mount,
//! unmount or middleware change may or may not be seen.

use std::sync::Arc;

use tracing::trace;

use crate::chord::Chord;
use crate::error::ResolveError;
use crate::handler::Handler;
use crate::middleware::compose;

/// Resolves `path` against `root`, returning the fully wrapped handler.
///
/// Returns `None` for an empty path, a missing chord at any intermediate
/// segment, or a missing handler at the last one. Use
/// [`Resolver::resolve`] to find out which.
///
/// ```rust
/// use chord::{Chord, Input, Output, match_path};
/// use std::sync::Arc;
///
/// let remote = Arc::new(Chord::new());
/// remote.register("add", |_: Input, _: &mut Output| {});
///
/// let root = Chord::new();
/// root.mount("remote", remote);
///
/// assert!(match_path(&root, &["remote", "add"]).is_some());
/// assert!(match_path(&root, &["remote"]).is_none());
/// assert!(match_path::<&str>(&root, &[]).is_none());
/// ```
pub fn match_path<S: AsRef<str>>(root: &Chord, path: &[S]) -> Option<Handler> {
    Resolver::new().resolve(root, path).ok()
}

/// Path resolution settings.
///
/// ```rust
/// use chord::{Chord, Resolver, ResolveError};
///
/// let resolver = Resolver::new().max_depth(4);
/// let err = resolver.resolve(&Chord::new(), &["a", "b", "c", "d", "e"]).unwrap_err();
/// assert_eq!(err, ResolveError::TooDeep { depth: 5, limit: 4 });
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Resolver {
    max_depth: Option<usize>,
}

impl Resolver {
    /// A resolver with no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects paths with more than `limit` segments before touching the
    /// tree. Returns `self` for chaining.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Resolves `path` against `root`, reporting why it failed if it did.
    pub fn resolve<S: AsRef<str>>(&self, root: &Chord, path: &[S]) -> Result<Handler, ResolveError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(ResolveError::EmptyPath);
        };
        if let Some(limit) = self.max_depth.filter(|&limit| path.len() > limit) {
            return Err(ResolveError::TooDeep { depth: path.len(), limit });
        }

        // layers[0] is root's middleware, layers[n] the n-th chord below it.
        let mut layers = Vec::with_capacity(path.len());
        layers.push(root.middleware());

        let mut current: Option<Arc<Chord>> = None;
        for (depth, key) in parents.iter().enumerate() {
            let key = key.as_ref();
            let node = current.as_deref().unwrap_or(root);
            let Some(child) = node.chord(key) else {
                trace!(key, depth, "no chord at segment");
                return Err(ResolveError::ChordNotFound { key: key.to_owned(), depth });
            };
            layers.push(child.middleware());
            current = Some(child);
        }

        let key = last.as_ref();
        let node = current.as_deref().unwrap_or(root);
        let Some(handler) = node.handler(key) else {
            trace!(key, "no handler at final segment");
            return Err(ResolveError::HandlerNotFound { key: key.to_owned() });
        };

        Ok(layers
            .iter()
            .rev()
            .fold(handler, |handler, layer| compose(handler, layer)))
    }
}
