//! Handler input: key, positional arguments, and named flags.

use std::collections::HashMap;

/// The input handed to a [`Handler`](crate::Handler).
///
/// The tree never reads it. Whatever feeds the tree (a CLI parser, a socket
/// reader) fills it in and the handler interprets it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub(crate) key: String,
    pub(crate) args: Vec<String>,
    pub(crate) flags: HashMap<String, String>,
}

impl Input {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Self::default() }
    }

    /// Appends one positional argument. Returns `self` for chaining.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends every item of `args` as positional arguments.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets a named flag. A repeated name overwrites the earlier value.
    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.flags.insert(name.into(), value.into());
        self
    }

    pub fn key(&self) -> &str { &self.key }
    pub fn args(&self) -> &[String] { &self.args }
    pub fn flags(&self) -> &HashMap<String, String> { &self.flags }

    /// Returns a named flag value.
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }
}
