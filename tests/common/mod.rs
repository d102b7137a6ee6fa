//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use chord::{Handler, Input, Middleware, Output};

/// An append-only event log shared between handlers and middleware.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Middleware that logs `pre` before and `post` after the wrapped handler.
pub fn around(log: &Log, pre: &'static str, post: &'static str) -> Middleware {
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

/// Middleware that writes `open` before and `close` after the wrapped handler.
pub fn brackets(open: &'static str, close: &'static str) -> Middleware {
    Middleware::new(move |next: Handler| {
        Handler::new(move |input, out| {
            out.write_all(open.as_bytes()).unwrap();
            next.call(input, out);
            out.write_all(close.as_bytes()).unwrap();
        })
    })
}

/// A handler that writes `text` to its output.
pub fn writes(text: &'static str) -> Handler {
    Handler::new(move |_, out| {
        out.write_all(text.as_bytes()).unwrap();
    })
}

/// Runs `handler` against an in-memory output and returns what it wrote.
pub fn run(handler: &Handler, input: Input) -> String {
    let (mut out, capture) = Output::memory("");
    handler.call(input, &mut out);
    out.flush().unwrap();
    capture.to_string_lossy()
}
