//! Per-call tracing span.

use std::time::Instant;

use tracing::{debug, debug_span};

use super::Middleware;
use crate::handler::Handler;

/// Runs each call inside a `handler` span carrying the input key and argument
/// count, and logs the elapsed time when the handler returns.
///
/// ```rust
/// use chord::{Chord, middleware};
///
/// let root = Chord::new();
/// root.use_middleware([middleware::trace()]);
/// ```
pub fn trace() -> Middleware {
    Middleware::new(|next: Handler| {
        Handler::new(move |input, out| {
            let span = debug_span!("handler", key = %input.key(), args = input.args().len());
            let _guard = span.enter();

            let started = Instant::now();
            debug!("handler started");
            next.call(input, out);
            debug!(elapsed = ?started.elapsed(), "handler finished");
        })
    })
}
