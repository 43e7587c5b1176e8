// SPDX-License-Identifier: Apache-2.0

//! Object-class queries, including permission set-containment.

use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::classes::ClassId;
use secpol_model::model::PolicyModel;

#[derive(Debug, Clone, Default)]
pub struct ClassQuery {
    name: Option<NameMatch>,
    required_perms: Vec<String>,
}

impl ClassQuery {
    pub fn new() -> Self {
        ClassQuery::default()
    }

    pub fn name(mut self, m: NameMatch) -> Self {
        self.name = Some(m);
        self
    }

    /// Require the class's permission set (including inherited common
    /// permissions) to contain every one of `perms`.
    pub fn with_perms(mut self, perms: Vec<String>) -> Self {
        self.required_perms = perms;
        self
    }

    pub fn run(&self, model: &PolicyModel) -> Result<Vec<ClassId>> {
        let selector = match &self.name {
            Some(m) => Some(Selector::compile(m)?),
            None => None,
        };
        Ok(model
            .classes
            .iter()
            .filter(|id| match &selector {
                Some(s) => model.classes.name_of(*id).is_some_and(|n| s.matches(n)),
                None => true,
            })
            .filter(|id| {
                if self.required_perms.is_empty() {
                    return true;
                }
                let perms = model.classes.perms(*id, &model.commons);
                self.required_perms.iter().all(|p| perms.contains(p))
            })
            .collect())
    }
}
