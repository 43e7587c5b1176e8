// SPDX-License-Identifier: Apache-2.0

//! `file_contexts` line parsing: `path-regex WS [type-spec WS] context`,
//! `#` comments, blank lines ignored.

use crate::entry::ObjectType;
use secpol_common::{Error, Result};

pub struct ParsedLine {
    pub path_regex: String,
    pub object_type: ObjectType,
    pub context: ParsedContext,
}

pub enum ParsedContext {
    NoLabel,
    Components {
        user: String,
        role: String,
        ty: String,
        range: Option<String>,
    },
}

/// Parse one non-blank, non-comment `file_contexts` line.
pub fn parse_line(line: &str) -> Result<ParsedLine> {
    let mut fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(Error::input(format!("malformed file_contexts line: {line}")));
    }
    let context_field = fields.pop().unwrap();
    let path_regex = fields[0].to_string();

    let object_type = if fields.len() == 2 {
        ObjectType::from_spec(fields[1])
            .ok_or_else(|| Error::input(format!("unknown type-spec '{}' in: {line}", fields[1])))?
    } else if fields.len() == 1 {
        ObjectType::Any
    } else {
        return Err(Error::input(format!("malformed file_contexts line: {line}")));
    };

    let context = parse_context(context_field)?;
    Ok(ParsedLine {
        path_regex,
        object_type,
        context,
    })
}

fn parse_context(field: &str) -> Result<ParsedContext> {
    if field == "<<none>>" {
        return Ok(ParsedContext::NoLabel);
    }
    let parts: Vec<&str> = field.split(':').collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(Error::input(format!("malformed context '{field}'")));
    }
    Ok(ParsedContext::Components {
        user: parts[0].to_string(),
        role: parts[1].to_string(),
        ty: parts[2].to_string(),
        range: parts.get(3).map(|s| s.to_string()),
    })
}

/// Parse a whole `file_contexts` document, skipping blank lines and
/// `#`-prefixed comments.
pub fn parse_document(text: &str) -> Result<Vec<ParsedLine>> {
    let mut out = Vec::new();
    for raw_line in text.lines() {
        let line = match raw_line.split_once('#') {
            Some((before, _)) => before.trim(),
            None => raw_line.trim(),
        };
        if line.is_empty() {
            continue;
        }
        out.push(parse_line(line)?);
    }
    Ok(out)
}
