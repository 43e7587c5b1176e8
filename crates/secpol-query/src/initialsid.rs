// SPDX-License-Identifier: Apache-2.0

//! Initial-SID queries.

use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::model::PolicyModel;
use secpol_model::occurrences::InitialSidEntry;

#[derive(Debug, Clone, Default)]
pub struct InitialSidQuery {
    name: Option<NameMatch>,
    bound_only: bool,
}

impl InitialSidQuery {
    pub fn new() -> Self {
        InitialSidQuery::default()
    }

    pub fn name(mut self, m: NameMatch) -> Self {
        self.name = Some(m);
        self
    }

    /// Only return SIDs that have a context bound (filters out `<no
    /// context>` entries).
    pub fn bound_only(mut self, yes: bool) -> Self {
        self.bound_only = yes;
        self
    }

    pub fn run<'m>(&self, model: &'m PolicyModel) -> Result<Vec<&'m InitialSidEntry>> {
        let selector = match &self.name {
            Some(m) => Some(Selector::compile(m)?),
            None => None,
        };
        Ok(model
            .occurrences
            .initial_sids
            .iter()
            .filter(|e| !e.name.is_empty())
            .filter(|e| match &selector {
                Some(s) => s.matches(&e.name),
                None => true,
            })
            .filter(|e| !self.bound_only || e.context.is_some())
            .collect())
    }
}
