// SPDX-License-Identifier: Apache-2.0

//! Finds process domains (per `find_domains`) with no role association
//! other than `object_r` — a domain no user can ever transition into.

use crate::common::roles_excluding_object_r;
use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct DomainsWoRoles {
    options: HashMap<String, ModuleOption>,
    dependencies: Vec<String>,
}

impl Default for DomainsWoRoles {
    fn default() -> Self {
        DomainsWoRoles { options: HashMap::new(), dependencies: vec!["find_domains".to_string()] }
    }
}

impl DomainsWoRoles {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for DomainsWoRoles {
    fn name(&self) -> &str {
        "domains_wo_roles"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Finds process domains not associated with any role."
    }

    fn description(&self) -> &str {
        "A process domain with no role association is unreachable: no user in any role can ever \
         be placed in that domain."
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'domains_wo_roles' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, deps: &DepResults) -> Result<ModuleResult> {
        let domains =
            *deps.get("find_domains").ok_or_else(|| Error::checker_runtime("domains_wo_roles", Error::input("missing dependency result: find_domains")))?;

        let roles = roles_excluding_object_r(model);
        let mut result = ModuleResult::new();
        for entry in domains.entries() {
            let ElementHandle::Type(ty) = entry.element else { continue };
            let roles_of_ty = model.roles_of_type(ty);
            if roles.iter().all(|r| !roles_of_ty.contains(r.raw())) {
                result.entry(entry.element.clone()).add_proof(ElementHandle::Empty, "Domain is not assigned to a role.");
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
    fn flags_domain_with_no_role_association() {
        let raw = RawPolicyImage {
            types: vec![RawType { name: "init_t".into(), is_attribute: false }, RawType { name: "orphan_t".into(), is_attribute: false }],
            roles: vec!["sysadm_r".into(), "object_r".into()],
            role_types: vec![RawRoleType { role: "sysadm_r".into(), types: vec!["init_t".into()] }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let init_t = model.types.lookup("init_t").unwrap();
        let orphan_t = model.types.lookup("orphan_t").unwrap();

        let mut domains = ModuleResult::new();
        domains.entry(ElementHandle::Type(init_t)).add_proof(ElementHandle::Empty, "");
        domains.entry(ElementHandle::Type(orphan_t)).add_proof(ElementHandle::Empty, "");

        let mut deps: DepResults = HashMap::new();
        deps.insert("find_domains", &domains);

        let mut module = DomainsWoRoles::new();
        let result = module.run(&model, None, &deps).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].element, ElementHandle::Type(orphan_t));
    }
}
