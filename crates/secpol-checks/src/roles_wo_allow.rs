// SPDX-License-Identifier: Apache-2.0

//! Flags roles (other than `object_r`) that never appear as either side
//! of a `role_allow` statement — such a role can never be reached by a
//! `newrole`/`setcon` transition.

use crate::common::roles_excluding_object_r;
use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::{
    Criterion, ElementHandle, ElementKind, MatchMode, NameMatch, Operator, Param, PolySearch, Test, TestKind,
};
use std::collections::HashMap;

pub struct RolesWoAllow {
    options: HashMap<String, ModuleOption>,
}

impl Default for RolesWoAllow {
    fn default() -> Self {
        RolesWoAllow { options: HashMap::new() }
    }
}

impl RolesWoAllow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for RolesWoAllow {
    fn name(&self) -> &str {
        "roles_wo_allow"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Find roles that are not used in a role allow rule."
    }

    fn description(&self) -> &str {
        "A role that never appears in a role_allow statement cannot be reached by any role \
         transition, making it unusable at runtime."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'roles_wo_allow' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let search = PolySearch::new(ElementKind::Role, MatchMode::Any).test(Test::new(
            TestKind::RoleAllow,
            vec![Criterion::new(Operator::SourceOrTarget, Param::Names(vec![NameMatch::Exact("X".into())]))],
        ));
        let matched = search.run(model, fclist)?;
        let matched_roles: Vec<_> = matched.into_iter().map(|r| r.element).collect();

        let mut result = ModuleResult::new();
        for role in roles_excluding_object_r(model) {
            if !matched_roles.contains(&ElementHandle::Role(role)) {
                result
                    .entry(ElementHandle::Role(role))
                    .add_proof(ElementHandle::Empty, "Role is not used in an allow rule.");
            }
        }
        Ok(result)
    }
}
