// SPDX-License-Identifier: Apache-2.0

//! The error taxonomy shared by every `secpol-*` crate.
//!
//! One variant per failure family named in the toolkit's error handling
//! design: malformed input, unknown symbols, missing policy capabilities,
//! malformed query parameters, internally-contradictory policy data,
//! a checker module failing during its run, and allocation/I-O failures.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// A policy capability a loaded image may or may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AttributeNames,
    SyntacticRules,
    LineNumbers,
    Conditionals,
    Modules,
    Neverallow,
    SelinuxSystem,
    FcList,
    DefaultContexts,
    Mls,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::AttributeNames => "attribute names",
            Capability::SyntacticRules => "syntactic rules",
            Capability::LineNumbers => "line numbers",
            Capability::Conditionals => "conditionals",
            Capability::Modules => "loadable modules",
            Capability::Neverallow => "neverallow rules",
            Capability::SelinuxSystem => "a running SELinux system",
            Capability::FcList => "a file context list",
            Capability::DefaultContexts => "default_contexts",
            Capability::Mls => "MLS",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A malformed binary image, fc-file line, or profile document.
    #[error("malformed input: {0}")]
    Input(String),

    /// An unknown symbol name, an out-of-range id, or a missing well-known SID.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// The loaded policy image lacks a capability an operation requires.
    #[error("operation requires policy capability: {0}")]
    Capability(Capability),

    /// Invalid regex or an invalid combination of query parameters.
    #[error("invalid query: {0}")]
    QuerySyntax(String),

    /// Expansion or back-index construction detected contradictory data.
    #[error("policy is internally inconsistent: {0}")]
    PolicyInconsistent(String),

    /// A checker module raised an error while running.
    #[error("module '{module}' failed: {source}")]
    CheckerRuntime {
        module: String,
        #[source]
        source: Box<Error>,
    },

    /// Allocation or I/O failure.
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("out of memory while building {0}")]
    OutOfMemory(String),
}

impl Error {
    pub fn input<S: Into<String>>(msg: S) -> Self {
        Error::Input(msg.into())
    }

    pub fn lookup<S: Into<String>>(msg: S) -> Self {
        Error::Lookup(msg.into())
    }

    pub fn query_syntax<S: Into<String>>(msg: S) -> Self {
        Error::QuerySyntax(msg.into())
    }

    pub fn inconsistent<S: Into<String>>(msg: S) -> Self {
        Error::PolicyInconsistent(msg.into())
    }

    pub fn checker_runtime<S: Into<String>>(module: S, source: Error) -> Self {
        Error::CheckerRuntime {
            module: module.into(),
            source: Box::new(source),
        }
    }
}
