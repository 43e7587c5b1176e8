// SPDX-License-Identifier: Apache-2.0

//! Flags users declared with no roles at all.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct UsersWoRoles {
    options: HashMap<String, ModuleOption>,
}

impl Default for UsersWoRoles {
    fn default() -> Self {
        UsersWoRoles { options: HashMap::new() }
    }
}

impl UsersWoRoles {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for UsersWoRoles {
    fn name(&self) -> &str {
        "users_wo_roles"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Find users with no roles."
    }

    fn description(&self) -> &str {
        "A user statement with an empty role set can never form a valid login context."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'users_wo_roles' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        for user in model.users.iter() {
            let has_roles = model.user_stmts.iter().any(|u| u.user == user && !u.roles.is_empty());
            if !has_roles {
                result
                    .entry(ElementHandle::User(user))
                    .add_proof(ElementHandle::Empty, "User has no roles.");
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::*;

    #[test]
    fn flags_user_declared_with_empty_role_set() {
        let raw = RawPolicyImage {
            roles: vec!["staff_r".into()],
            users: vec![
                RawUser { name: "alice".into(), roles: vec!["staff_r".into()], range: None, default_level: None },
                RawUser { name: "ghost".into(), roles: vec![], range: None, default_level: None },
            ],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = UsersWoRoles::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].element, ElementHandle::User(model.users.lookup("ghost").unwrap()));
    }
}
