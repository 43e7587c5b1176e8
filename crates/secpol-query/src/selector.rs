// SPDX-License-Identifier: Apache-2.0

//! The name-matching selector shared by every query builder: exact,
//! shell-glob, or extended-regex match against an entity's primary name.

use regex::Regex;
use secpol_common::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    Exact(String),
    Glob(String),
    Regex(String),
}

/// A compiled selector. Building one can fail (`QuerySyntax`) if the
/// pattern is a malformed regex; matching itself never fails.
pub enum Selector {
    Exact(String),
    Regex(Regex),
}

impl Selector {
    pub fn compile(m: &NameMatch) -> Result<Selector> {
        match m {
            NameMatch::Exact(s) => Ok(Selector::Exact(s.clone())),
            NameMatch::Regex(pattern) => Regex::new(pattern)
                .map(Selector::Regex)
                .map_err(|e| Error::query_syntax(format!("invalid regex '{pattern}': {e}"))),
            NameMatch::Glob(pattern) => {
                let translated = glob_to_regex(pattern);
                Regex::new(&translated)
                    .map(Selector::Regex)
                    .map_err(|e| Error::query_syntax(format!("invalid glob '{pattern}': {e}")))
            }
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Selector::Exact(s) => s == candidate,
            Selector::Regex(r) => r.is_match(candidate),
        }
    }
}

/// Translate a shell glob (`*`, `?`, literal everything else) into an
/// anchored regex. Glob and regex escaping rules differ, so this is kept
/// separate from feeding a glob straight into `Regex::new`.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let mut literal = String::new();
    let flush = |literal: &mut String, out: &mut String| {
        if !literal.is_empty() {
            out.push_str(&regex::escape(literal));
            literal.clear();
        }
    };
    for c in glob.chars() {
        match c {
            '*' => {
                flush(&mut literal, &mut out);
                out.push_str(".*");
            }
            '?' => {
                flush(&mut literal, &mut out);
                out.push('.');
            }
            c => literal.push(c),
        }
    }
    flush(&mut literal, &mut out);
    out.push('$');
    out
}
