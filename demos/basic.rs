//! Minimal chord example: a git-like command tree on stdin/stdout.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic -- git status --branch=dev
//!   cargo run --example basic -- git remote list
//!   echo "fix typo" | cargo run --example basic -- git commit a.rs b.rs
//!
//! Leading words are the path; `--name=value` words become flags and the
//! words after the handler key become arguments. That split is this
//! example's choice: chord itself never parses anything.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use chord::{Chord, Input, Output, middleware};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let root = app();

    let words: Vec<String> = std::env::args().skip(1).collect();
    let (path, input) = split(&root, &words);

    let mut out = Output::new(io::stdin(), io::stdout());
    match root.dispatch(&path, input, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("commands: {}", root.chord_keys().join(", "));
            ExitCode::FAILURE
        }
    }
}

fn app() -> Chord {
    let root = Chord::new();
    root.use_middleware([middleware::trace()]);

    let git = Arc::new(Chord::new());
    git.register("status", status);
    git.register("commit", commit);

    let remote = Arc::new(Chord::new());
    remote.register("list", |_: Input, out: &mut Output| {
        let _ = writeln!(out, "origin");
    });
    git.mount("remote", remote);

    root.mount("git", git);
    root
}

/// Walks mounted chords greedily; the first word that is not a chord key is
/// the handler key.
fn split(root: &Chord, words: &[String]) -> (Vec<String>, Input) {
    let mut path = Vec::new();
    let mut node: Option<Arc<Chord>> = None;
    let mut rest = words.iter();

    for word in rest.by_ref() {
        path.push(word.clone());
        let current = node.as_deref().unwrap_or(root);
        match current.chord(word) {
            Some(child) => node = Some(child),
            None => break,
        }
    }

    let key = path.last().cloned().unwrap_or_default();
    let mut input = Input::new(key);
    for word in rest {
        match word.strip_prefix("--").and_then(|flag| flag.split_once('=')) {
            Some((name, value)) => input = input.with_flag(name, value),
            None => input = input.with_arg(word.as_str()),
        }
    }
    (path, input)
}

// git status [--branch=<name>]
fn status(input: Input, out: &mut Output) {
    let branch = input.flag("branch").unwrap_or("main");
    let _ = writeln!(out, "on branch {branch}, nothing to commit");
}

// echo <message> | git commit <files...>
fn commit(input: Input, out: &mut Output) {
    let mut message = String::new();
    if out.read_line(&mut message).is_err() || message.trim().is_empty() {
        let _ = writeln!(out, "aborting commit due to empty message");
        return;
    }
    let _ = writeln!(out, "[main] {} ({} files)", message.trim(), input.args().len());
}
