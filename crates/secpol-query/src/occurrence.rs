// SPDX-License-Identifier: Apache-2.0

//! Network and filesystem context-occurrence queries: `portcon`,
//! `netifcon`, `nodecon`, `fs_use`, `genfscon`.
//!
//! All five share the same "match some component of the bound context"
//! shape, so one generic filter covers them; each entry kind adds its
//! own identifying fields (port range, interface name, address, ...).

use crate::mlsfilter::MlsFilter;
use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::context::SecurityContext;
use secpol_model::model::PolicyModel;

#[derive(Debug, Clone, Default)]
pub struct ContextFilter {
    pub user: Option<NameMatch>,
    pub role: Option<NameMatch>,
    pub ty: Option<NameMatch>,
    pub mls: Option<MlsFilter>,
}

impl ContextFilter {
    pub fn new() -> Self {
        ContextFilter::default()
    }

    pub fn user(mut self, m: NameMatch) -> Self {
        self.user = Some(m);
        self
    }

    pub fn role(mut self, m: NameMatch) -> Self {
        self.role = Some(m);
        self
    }

    pub fn ty(mut self, m: NameMatch) -> Self {
        self.ty = Some(m);
        self
    }

    pub fn mls(mut self, filter: MlsFilter) -> Self {
        self.mls = Some(filter);
        self
    }

    fn compiled(&self) -> Result<CompiledContextFilter> {
        Ok(CompiledContextFilter {
            user: self.user.as_ref().map(Selector::compile).transpose()?,
            role: self.role.as_ref().map(Selector::compile).transpose()?,
            ty: self.ty.as_ref().map(Selector::compile).transpose()?,
            mls: self.mls.clone(),
        })
    }

    pub fn matches(&self, ctx: &SecurityContext, model: &PolicyModel) -> Result<bool> {
        Ok(self.compiled()?.matches(ctx, model))
    }
}

struct CompiledContextFilter {
    user: Option<Selector>,
    role: Option<Selector>,
    ty: Option<Selector>,
    mls: Option<MlsFilter>,
}

impl CompiledContextFilter {
    fn matches(&self, ctx: &SecurityContext, model: &PolicyModel) -> bool {
        if let Some(s) = &self.user {
            if !model.users.name_of(ctx.user).is_some_and(|n| s.matches(n)) {
                return false;
            }
        }
        if let Some(s) = &self.role {
            if !model.roles.name_of(ctx.role).is_some_and(|n| s.matches(n)) {
                return false;
            }
        }
        if let Some(s) = &self.ty {
            if !model.types.name_of(ctx.ty).is_some_and(|n| s.matches(n)) {
                return false;
            }
        }
        if let Some(filter) = &self.mls {
            match &ctx.range {
                Some(range) if filter.matches(range) => {}
                _ => return false,
            }
        }
        true
    }
}

pub fn query_portcon<'m>(model: &'m PolicyModel, filter: &ContextFilter) -> Result<Vec<&'m secpol_model::occurrences::PortconEntry>> {
    let compiled = filter.compiled()?;
    Ok(model
        .occurrences
        .portcon
        .iter()
        .filter(|e| compiled.matches(&e.context, model))
        .collect())
}

pub fn query_nodecon<'m>(model: &'m PolicyModel, filter: &ContextFilter) -> Result<Vec<&'m secpol_model::occurrences::NodeconEntry>> {
    let compiled = filter.compiled()?;
    Ok(model
        .occurrences
        .nodecon
        .iter()
        .filter(|e| compiled.matches(&e.context, model))
        .collect())
}

pub fn query_netifcon<'m>(model: &'m PolicyModel, filter: &ContextFilter) -> Result<Vec<&'m secpol_model::occurrences::NetifconEntry>> {
    let compiled = filter.compiled()?;
    Ok(model
        .occurrences
        .netifcon
        .iter()
        .filter(|e| compiled.matches(&e.if_context, model) || compiled.matches(&e.msg_context, model))
        .collect())
}

pub fn query_fs_use<'m>(model: &'m PolicyModel, filter: &ContextFilter) -> Result<Vec<&'m secpol_model::occurrences::FsUseEntry>> {
    let compiled = filter.compiled()?;
    Ok(model
        .occurrences
        .fs_use
        .iter()
        .filter(|e| compiled.matches(&e.context, model))
        .collect())
}

pub fn query_genfscon<'m>(model: &'m PolicyModel, filter: &ContextFilter) -> Result<Vec<&'m secpol_model::occurrences::GenfsconEntry>> {
    let compiled = filter.compiled()?;
    Ok(model
        .occurrences
        .genfscon
        .iter()
        .filter(|e| compiled.matches(&e.context, model))
        .collect())
}
