// SPDX-License-Identifier: Apache-2.0

//! Compiling a [`crate::param::NameMatch`] into a predicate, and testing
//! a name set against "any of these names match" (used by `include`
//! criteria, which require every named pattern to hit at least one
//! member of the candidate's set).

use crate::param::NameMatch;
use regex::Regex;
use secpol_common::{Error, Result};

pub enum Compiled {
    Exact(String),
    Regex(Regex),
}

impl Compiled {
    pub fn compile(m: &NameMatch) -> Result<Self> {
        Ok(match m {
            NameMatch::Exact(s) => Compiled::Exact(s.clone()),
            NameMatch::Glob(g) => Compiled::Regex(
                Regex::new(&glob_to_regex(g)).map_err(|e| Error::query_syntax(format!("bad glob {g}: {e}")))?,
            ),
            NameMatch::Regex(r) => {
                Compiled::Regex(Regex::new(r).map_err(|e| Error::query_syntax(format!("bad regex {r}: {e}")))?)
            }
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Compiled::Exact(s) => s == name,
            Compiled::Regex(re) => re.is_match(name),
        }
    }
}

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

/// Whether any name in `names` matches `pattern`.
pub fn any_matches(pattern: &Compiled, names: impl IntoIterator<Item = impl AsRef<str>>) -> bool {
    names.into_iter().any(|n| pattern.matches(n.as_ref()))
}
