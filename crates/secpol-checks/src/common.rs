// SPDX-License-Identifier: Apache-2.0

//! Small helpers shared by several modules: the `object_r` exclusion
//! every role-centric module applies, and option-table construction.

use secpol_checker::ModuleOption;
use secpol_model::context::RoleId;
use secpol_model::model::PolicyModel;
use std::collections::HashMap;

/// Every declared role except `object_r`, which every `sechecker` role
/// module excludes as meaningless (it never labels a process or names a
/// user-reachable role).
pub fn roles_excluding_object_r(model: &PolicyModel) -> Vec<RoleId> {
    model
        .roles
        .iter()
        .filter(|r| model.roles.name_of(*r) != Some("object_r"))
        .collect()
}

pub fn is_object_r(model: &PolicyModel, role: RoleId) -> bool {
    model.roles.name_of(role) == Some("object_r")
}

/// Build a one-entry option table, the common case for modules with a
/// single attribute-name-list option.
pub fn single_option(key: &str, description: &str, defaults: &[&str]) -> HashMap<String, ModuleOption> {
    let mut map = HashMap::new();
    map.insert(
        key.to_string(),
        ModuleOption::new(description, defaults.iter().map(|s| s.to_string()).collect()),
    );
    map
}
