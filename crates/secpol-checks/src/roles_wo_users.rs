// SPDX-License-Identifier: Apache-2.0

//! Flags roles not assigned to any user — a role nothing can log in as.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::{Criterion, ElementHandle, ElementKind, MatchMode, NameMatch, Operator, Param, PolySearch, Test, TestKind};
use std::collections::HashMap;

pub struct RolesWoUsers {
    options: HashMap<String, ModuleOption>,
}

impl Default for RolesWoUsers {
    fn default() -> Self {
        RolesWoUsers { options: HashMap::new() }
    }
}

impl RolesWoUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for RolesWoUsers {
    fn name(&self) -> &str {
        "roles_wo_users"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Find roles that are not assigned to any user."
    }

    fn description(&self) -> &str {
        "A role with no user assigned to it can never be reached: no login context can ever \
         name it."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'roles_wo_users' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        for role in model.roles.iter() {
            let role_name = model.roles.name_of(role).unwrap_or("").to_string();
            let search = PolySearch::new(ElementKind::User, MatchMode::All).test(Test::new(
                TestKind::Roles,
                vec![Criterion::new(Operator::Include, Param::Names(vec![NameMatch::Exact(role_name)]))],
            ));
            if search.run(model, fclist)?.is_empty() {
                result
                    .entry(ElementHandle::Role(role))
                    .add_proof(ElementHandle::Empty, "Role is not assigned to a user.");
            }
        }
        Ok(result)
    }
}
