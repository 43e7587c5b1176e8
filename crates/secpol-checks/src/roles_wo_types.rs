// SPDX-License-Identifier: Apache-2.0

//! Flags roles with no `role R types {...}` declaration — such a role
//! cannot form a valid security context.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct RolesWoTypes {
    options: HashMap<String, ModuleOption>,
}

impl Default for RolesWoTypes {
    fn default() -> Self {
        RolesWoTypes { options: HashMap::new() }
    }
}

impl RolesWoTypes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for RolesWoTypes {
    fn name(&self) -> &str {
        "roles_wo_types"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Find roles without assigned types."
    }

    fn description(&self) -> &str {
        "Roles without types cannot form a valid context."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'roles_wo_types' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        for role in model.roles.iter() {
            if model.types_of_role(role).is_empty() {
                result
                    .entry(ElementHandle::Role(role))
                    .add_proof(ElementHandle::Empty, "Role has no types.");
            }
        }
        Ok(result)
    }
}
