//! Command definitions
//!
//! Represents commands sent to the server.

use std::fmt;

/// Command verbs understood by bloomd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    // Server commands
    Create,
    List,
    Info,
    Flush,

    // Filter commands
    Set,
    Check,
    Bulk,
    Multi,
    Drop,
    Close,
    Clear,
}

impl Verb {
    /// Every verb, in declaration order
    pub const ALL: [Verb; 11] = [
        Verb::Create,
        Verb::List,
        Verb::Info,
        Verb::Flush,
        Verb::Set,
        Verb::Check,
        Verb::Bulk,
        Verb::Multi,
        Verb::Drop,
        Verb::Close,
        Verb::Clear,
    ];

    /// The verb as it appears on the wire
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::List => "list",
            Verb::Info => "info",
            Verb::Flush => "flush",
            Verb::Set => "set",
            Verb::Check => "check",
            Verb::Bulk => "bulk",
            Verb::Multi => "multi",
            Verb::Drop => "drop",
            Verb::Close => "close",
            Verb::Clear => "clear",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command ready to be rendered onto the wire
///
/// Arguments are stored as given. Callers are responsible for making sure
/// no argument contains whitespace (see [`super::validate_token`] and
/// [`super::hash_key`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    args: Vec<String>,
}

impl Command {
    /// A command with no arguments
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            args: Vec::new(),
        }
    }

    /// A command with the given arguments, in order
    pub fn with_args<I, S>(verb: Verb, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            verb,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb.as_str())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
