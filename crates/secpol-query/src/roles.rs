// SPDX-License-Identifier: Apache-2.0

//! Role queries.

use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::model::PolicyModel;
use secpol_model::context::RoleId;

#[derive(Debug, Clone, Default)]
pub struct RoleQuery {
    name: Option<NameMatch>,
}

impl RoleQuery {
    pub fn new() -> Self {
        RoleQuery::default()
    }

    pub fn name(mut self, m: NameMatch) -> Self {
        self.name = Some(m);
        self
    }

    pub fn run(&self, model: &PolicyModel) -> Result<Vec<RoleId>> {
        let selector = match &self.name {
            Some(m) => Some(Selector::compile(m)?),
            None => None,
        };
        Ok(model
            .roles
            .iter()
            .filter(|id| match &selector {
                Some(s) => model.roles.name_of(*id).is_some_and(|n| s.matches(n)),
                None => true,
            })
            .collect())
    }
}
