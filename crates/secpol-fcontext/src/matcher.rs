// SPDX-License-Identifier: Apache-2.0

//! String matching shared by path and context-component filters: plain
//! substring, shell glob, or extended regex — never promoted into each
//! other silently, since the escaping rules differ.

use regex::Regex;
use secpol_common::{Error, Result};

#[derive(Debug, Clone)]
pub enum StringMatch {
    Substring(String),
    Glob(String),
    Regex(String),
}

pub struct CompiledMatch {
    kind: CompiledKind,
}

enum CompiledKind {
    Substring(String),
    Regex(Regex),
}

impl CompiledMatch {
    /// Compile `m`, or if `literal` is set, always treat it as a plain
    /// substring regardless of `m`'s variant.
    pub fn compile(m: &StringMatch, literal: bool) -> Result<Self> {
        if literal {
            let text = match m {
                StringMatch::Substring(s) | StringMatch::Glob(s) | StringMatch::Regex(s) => s.clone(),
            };
            return Ok(CompiledMatch {
                kind: CompiledKind::Substring(text),
            });
        }
        let kind = match m {
            StringMatch::Substring(s) => CompiledKind::Substring(s.clone()),
            StringMatch::Glob(g) => CompiledKind::Regex(
                Regex::new(&glob_to_regex(g)).map_err(|e| Error::query_syntax(format!("bad glob {g}: {e}")))?,
            ),
            StringMatch::Regex(r) => {
                CompiledKind::Regex(Regex::new(r).map_err(|e| Error::query_syntax(format!("bad regex {r}: {e}")))?)
            }
        };
        Ok(CompiledMatch { kind })
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.kind {
            CompiledKind::Substring(needle) => text.contains(needle.as_str()),
            CompiledKind::Regex(re) => re.is_match(text),
        }
    }
}

/// Translate a shell glob (`*`, `?`) into an anchored regex, escaping
/// literal runs with `regex::escape` rather than hand-rolling escaping.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let mut literal = String::new();
    for c in glob.chars() {
        match c {
            '*' => {
                if !literal.is_empty() {
                    out.push_str(&regex::escape(&literal));
                    literal.clear();
                }
                out.push_str(".*");
            }
            '?' => {
                if !literal.is_empty() {
                    out.push_str(&regex::escape(&literal));
                    literal.clear();
                }
                out.push('.');
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        out.push_str(&regex::escape(&literal));
    }
    out.push('$');
    out
}
