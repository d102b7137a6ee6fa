//! # chord
//!
//! A concurrent dispatch tree. Keys map to handlers and to nested chords;
//! each chord carries its own middleware. Give it a path, get back one
//! handler wrapped in every middleware on the way down.
//!
//! ## The contract
//!
//! chord routes by exact key per segment, and that is all it routes by.
//! There are no wildcards, no parameters, no persistence, no timeouts. The
//! caller owns the root; there is no global tree.
//!
//! What chord does:
//!
//! - **Registry**: [`Chord`] maps keys to [`Handler`]s and to mounted
//!   sub-chords, safe to mutate from any number of threads
//! - **Middleware**: [`Middleware`] decorates handlers; lists are FIFO,
//!   first entry outermost ([`compose`])
//! - **Resolution**: [`match_path`] walks a path and stacks middleware from
//!   every chord it passes, root outermost
//!
//! What it leaves to you: parsing arguments into an [`Input`], wiring an
//! [`Output`] to a terminal or socket, and deciding what "not found" means.
//!
//! ## Quick start
//!
//! ```rust
//! use std::io::Write;
//! use std::sync::Arc;
//!
//! use chord::{Chord, Handler, Input, Middleware, Output, match_path};
//!
//! let root = Chord::new();
//! root.use_middleware([Middleware::new(|next: Handler| {
//!     Handler::new(move |input, out| {
//!         let _ = write!(out, "[");
//!         next.call(input, out);
//!         let _ = write!(out, "]");
//!     })
//! })]);
//!
//! let remote = Arc::new(Chord::new());
//! remote.register("list", |_: Input, out: &mut Output| {
//!     let _ = write!(out, "origin");
//! });
//! root.mount("remote", remote);
//!
//! let handler = match_path(&root, &["remote", "list"]).expect("registered above");
//!
//! let (mut out, capture) = Output::memory("");
//! handler.call(Input::new("list"), &mut out);
//! out.flush().unwrap();
//! assert_eq!(capture.to_string_lossy(), "[origin]");
//! ```
//!
//! ## Consistency
//!
//! Single-key reads and writes on a chord are linearizable. Nothing spans
//! chords: a resolution running while the tree changes may see some chords
//! before the change and others after it. If you need an atomic swap of the
//! whole table, build a new root and swap the `Arc` you hand out.

mod chord;
mod error;
mod handler;
mod input;
mod output;
mod resolve;

#[cfg(test)]
mod test_util;

pub mod middleware;

pub use chord::Chord;
pub use error::{Error, ResolveError};
pub use handler::Handler;
pub use input::Input;
pub use middleware::{Middleware, compose};
pub use output::{Capture, Output};
pub use resolve::{Resolver, match_path};
