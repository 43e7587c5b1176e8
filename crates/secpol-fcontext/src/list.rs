// SPDX-License-Identifier: Apache-2.0

//! The file-context list (C9): an ordered sequence of entries plus
//! path/object-type/context queries over them.

use crate::entry::{FcContext, FcEntry, ObjectType, ObjectTypeMask};
use crate::matcher::{CompiledMatch, StringMatch};
use crate::parse::{self, ParsedContext};
use secpol_common::{Error, Result};
use secpol_model::model::PolicyModel;

/// An ordered `file_contexts` entry list. Queries return entries in
/// source order. When a [`PolicyModel`] is supplied at insertion time,
/// context components are resolved and validated against it; otherwise
/// they are stored verbatim as strings.
#[derive(Default)]
pub struct FcList {
    entries: Vec<FcEntry>,
}

impl FcList {
    pub fn new() -> Self {
        FcList::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FcEntry> {
        self.entries.iter()
    }

    /// Append one entry, resolving its context against `model` if given.
    pub fn push(&mut self, path_regex: String, object_type: ObjectType, context: ParsedContext, model: Option<&PolicyModel>) -> Result<()> {
        let fc_context = match context {
            ParsedContext::NoLabel => FcContext::NoLabel,
            ParsedContext::Components { user, role, ty, range } => match model {
                Some(m) => FcContext::Resolved(resolve_context(m, &user, &role, &ty, range.as_deref())?),
                None => FcContext::Raw { user, role, ty, range },
            },
        };
        self.entries.push(FcEntry {
            path_regex,
            object_type,
            context: fc_context,
        });
        Ok(())
    }

    /// Parse a whole `file_contexts` document and append every entry.
    pub fn load_document(&mut self, text: &str, model: Option<&PolicyModel>) -> Result<()> {
        for line in parse::parse_document(text)? {
            self.push(line.path_regex, line.object_type, line.context, model)?;
        }
        Ok(())
    }
}

fn resolve_context(
    model: &PolicyModel,
    user: &str,
    role: &str,
    ty: &str,
    range: Option<&str>,
) -> Result<secpol_model::context::SecurityContext> {
    let user_id = model.users.lookup(user).ok_or_else(|| Error::lookup(format!("unknown user {user}")))?;
    let role_id = model.roles.lookup(role).ok_or_else(|| Error::lookup(format!("unknown role {role}")))?;
    let ty_id = model.types.lookup(ty).ok_or_else(|| Error::lookup(format!("unknown type {ty}")))?;
    let mut ctx = secpol_model::context::SecurityContext::new(user_id, role_id, ty_id);
    if let Some(range_str) = range {
        ctx = ctx.with_range(parse_range(model, range_str)?);
    }
    Ok(ctx)
}

/// Parse `low-high` or a single level into an [`secpol_model::mls::MlsRange`].
fn parse_range(model: &PolicyModel, text: &str) -> Result<secpol_model::mls::MlsRange> {
    let (low_str, high_str) = match text.split_once('-') {
        Some((l, h)) => (l.trim(), h.trim()),
        None => (text.trim(), text.trim()),
    };
    let low = parse_level(model, low_str)?;
    let high = parse_level(model, high_str)?;
    Ok(secpol_model::mls::MlsRange { low, high })
}

fn parse_level(model: &PolicyModel, text: &str) -> Result<secpol_model::mls::Level> {
    let mut parts = text.splitn(2, ':');
    let sens_name = parts.next().unwrap_or("");
    let sensitivity = model
        .mls
        .sensitivities
        .lookup(sens_name)
        .ok_or_else(|| Error::lookup(format!("unknown sensitivity {sens_name}")))?;
    let mut categories = secpol_core::Bitset::with_capacity(model.mls.categories.count());
    if let Some(cats) = parts.next() {
        for group in cats.split(',') {
            if group.is_empty() {
                continue;
            }
            let (lo, hi) = match group.split_once('.') {
                Some((l, h)) => (l, h),
                None => (group, group),
            };
            let lo_id = model.mls.categories.lookup(lo).ok_or_else(|| Error::lookup(format!("unknown category {lo}")))?;
            let hi_id = model.mls.categories.lookup(hi).ok_or_else(|| Error::lookup(format!("unknown category {hi}")))?;
            for raw in lo_id.raw()..=hi_id.raw() {
                categories.grow_to(raw);
                categories.insert(raw);
            }
        }
    }
    Ok(secpol_model::mls::Level::new(sensitivity, categories))
}

#[derive(Default)]
pub struct FcQuery {
    path: Option<(StringMatch, bool)>,
    object_types: Option<ObjectTypeMask>,
    user: Option<StringMatch>,
    role: Option<StringMatch>,
    ty: Option<StringMatch>,
    range: Option<StringMatch>,
}

impl FcQuery {
    pub fn new() -> Self {
        FcQuery::default()
    }

    pub fn path(mut self, m: StringMatch, literal: bool) -> Self {
        self.path = Some((m, literal));
        self
    }

    pub fn object_types(mut self, mask: ObjectTypeMask) -> Self {
        self.object_types = Some(mask);
        self
    }

    pub fn user(mut self, m: StringMatch) -> Self {
        self.user = Some(m);
        self
    }

    pub fn role(mut self, m: StringMatch) -> Self {
        self.role = Some(m);
        self
    }

    pub fn ty(mut self, m: StringMatch) -> Self {
        self.ty = Some(m);
        self
    }

    pub fn range(mut self, m: StringMatch) -> Self {
        self.range = Some(m);
        self
    }

    pub fn run<'l>(&self, list: &'l FcList, model: Option<&PolicyModel>) -> Result<Vec<&'l FcEntry>> {
        let path = self.path.as_ref().map(|(m, lit)| CompiledMatch::compile(m, *lit)).transpose()?;
        let user = self.user.as_ref().map(|m| CompiledMatch::compile(m, false)).transpose()?;
        let role = self.role.as_ref().map(|m| CompiledMatch::compile(m, false)).transpose()?;
        let ty = self.ty.as_ref().map(|m| CompiledMatch::compile(m, false)).transpose()?;
        let range = self.range.as_ref().map(|m| CompiledMatch::compile(m, false)).transpose()?;

        Ok(list
            .entries
            .iter()
            .filter(|e| {
                if let Some(p) = &path {
                    if !p.matches(&e.path_regex) {
                        return false;
                    }
                }
                if let Some(mask) = &self.object_types {
                    if !mask.matches(e.object_type) {
                        return false;
                    }
                }
                context_components_match(&e.context, &user, &role, &ty, &range, model)
            })
            .collect())
    }
}

fn context_components_match(
    ctx: &FcContext,
    user: &Option<CompiledMatch>,
    role: &Option<CompiledMatch>,
    ty: &Option<CompiledMatch>,
    range: &Option<CompiledMatch>,
    model: Option<&PolicyModel>,
) -> bool {
    if user.is_none() && role.is_none() && ty.is_none() && range.is_none() {
        return true;
    }
    let (user_name, role_name, ty_name, range_name): (String, String, String, Option<String>) = match ctx {
        FcContext::NoLabel => return false,
        FcContext::Raw { user, role, ty, range } => (user.clone(), role.clone(), ty.clone(), range.clone()),
        FcContext::Resolved(c) => {
            let model = match model {
                Some(m) => m,
                None => return false,
            };
            (
                model.users.name_of(c.user).unwrap_or("").to_string(),
                model.roles.name_of(c.role).unwrap_or("").to_string(),
                model.types.name_of(c.ty).unwrap_or("").to_string(),
                c.range.as_ref().map(|_| String::new()),
            )
        }
    };
    if let Some(m) = user {
        if !m.matches(&user_name) {
            return false;
        }
    }
    if let Some(m) = role {
        if !m.matches(&role_name) {
            return false;
        }
    }
    if let Some(m) = ty {
        if !m.matches(&ty_name) {
            return false;
        }
    }
    if let Some(m) = range {
        match &range_name {
            Some(r) if m.matches(r) => {}
            _ => return false,
        }
    }
    true
}
