//! Helpers shared by the unit tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::handler::Handler;
use crate::input::Input;
use crate::middleware::Middleware;
use crate::output::Output;

/// An append-only event log shared between handlers and middleware.
#[derive(Clone, Default)]
pub(crate) struct Log(Arc<Mutex<Vec<&'static str>>>);

impl Log {
    pub(crate) fn push(&self, entry: &'static str) {
        self.0.lock().unwrap().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

/// Middleware that logs `pre` before and `post` after the wrapped handler.
pub(crate) fn around(log: &Log, pre: &'static str, post: &'static str) -> Middleware {
    let log = log.clone();
    Middleware::new(move |next: Handler| {
        let log = log.clone();
        Handler::new(move |input, out| {
            log.push(pre);
            next.call(input, out);
            log.push(post);
        })
    })
}

/// A handler that logs `"h"`.
pub(crate) fn leaf(log: &Log) -> Handler {
    let log = log.clone();
    Handler::new(move |_, _| log.push("h"))
}

/// A handler that writes `text` to its output.
pub(crate) fn writes(text: &'static str) -> Handler {
    Handler::new(move |_, out| {
        out.write_all(text.as_bytes()).unwrap();
    })
}

/// Runs `handler` against an in-memory output and returns what it wrote.
pub(crate) fn run(handler: &Handler) -> String {
    let (mut out, capture) = Output::memory("");
    handler.call(Input::new("test"), &mut out);
    out.flush().unwrap();
    capture.to_string_lossy()
}

/// Runs `handler` with output discarded.
pub(crate) fn invoke(handler: &Handler) {
    handler.call(Input::new("h"), &mut Output::sink());
}
