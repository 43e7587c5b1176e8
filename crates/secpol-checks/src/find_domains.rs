// SPDX-License-Identifier: Apache-2.0

//! Finds process domains: types that carry a domain attribute, source an
//! allow/auditallow/dontaudit rule outside class `filesystem`, are the
//! default of a `process` `type_transition`, or are associated with a
//! non-`object_r` role.

use crate::common::roles_excluding_object_r;
use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Requirement, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::{Criterion, ElementHandle, ElementKind, MatchMode, NameMatch, Operator, Param, PolySearch, RuleKindMask, Test, TestKind};
use std::collections::HashMap;

pub struct FindDomains {
    options: HashMap<String, ModuleOption>,
}

impl Default for FindDomains {
    fn default() -> Self {
        FindDomains { options: crate::common::single_option("domain_attribute", "attribute naming process domains", &["domain"]) }
    }
}

impl FindDomains {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for FindDomains {
    fn name(&self) -> &str {
        "find_domains"
    }

    fn severity(&self) -> Severity {
        Severity::Util
    }

    fn summary(&self) -> &str {
        "Utility module: find process domains."
    }

    fn description(&self) -> &str {
        "Finds process domain types by attribute, source AV rules, process type_transitions, \
         and role association."
    }

    fn recommendations(&self) -> &[Requirement] {
        &[Requirement::AttributeNames]
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, values: Vec<String>, override_existing: bool) -> Result<()> {
        match self.options.get_mut(name) {
            Some(opt) => opt.set(values, override_existing),
            None => Err(Error::input(format!("module 'find_domains' has no option '{name}'"))),
        }
    }

    fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();

        let search = PolySearch::new(ElementKind::Type, MatchMode::Any)
            .test(Test::new(
                TestKind::AvRule,
                vec![
                    Criterion::new(Operator::RuleType, Param::RuleKind(RuleKindMask::NEVERALLOW)).negated(),
                    Criterion::new(Operator::Source, Param::Names(vec![NameMatch::Exact("X".into())])),
                    Criterion::new(Operator::Class, Param::Names(vec![NameMatch::Exact("filesystem".into())])).negated(),
                ],
            ))
            .test(Test::new(
                TestKind::TeRule,
                vec![
                    Criterion::new(Operator::RuleType, Param::RuleKind(RuleKindMask::TYPE_TRANSITION)),
                    Criterion::new(Operator::Default, Param::Names(vec![NameMatch::Exact("X".into())])),
                    Criterion::new(Operator::Class, Param::Names(vec![NameMatch::Exact("process".into())])),
                ],
            ));
        for hit in search.run(model, fclist)? {
            let entry = result.entry(hit.element);
            for proof in hit.proofs {
                entry.add_proof(proof.handle, "");
            }
        }

        if Requirement::AttributeNames.check(model, fclist) {
            let domain_attrs: Vec<_> = self.options["domain_attribute"]
                .values
                .iter()
                .filter_map(|name| model.types.lookup(name))
                .collect();
            for ty in model.types.iter_types() {
                let attrs_of_ty = model.types.attrs_of(ty);
                for attr in &domain_attrs {
                    if attrs_of_ty.contains(attr.raw()) {
                        result.entry(ElementHandle::Type(ty)).add_proof(ElementHandle::Type(*attr), "has attribute ");
                    }
                }
            }
        }

        let roles = roles_excluding_object_r(model);
        for ty in model.types.iter_types() {
            let roles_of_ty = model.roles_of_type(ty);
            for role in &roles {
                if roles_of_ty.contains(role.raw()) {
                    result.entry(ElementHandle::Type(ty)).add_proof(ElementHandle::Role(*role), "is assigned to role ");
                }
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
    fn flags_type_with_domain_attribute_and_role_association() {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "init_t".into(), is_attribute: false },
                RawType { name: "domain".into(), is_attribute: true },
                RawType { name: "passwd_t".into(), is_attribute: false },
            ],
            attribute_membership: vec![RawAttributeMembership { attribute: "domain".into(), member: "init_t".into() }],
            roles: vec!["sysadm_r".into(), "object_r".into()],
            role_types: vec![RawRoleType { role: "sysadm_r".into(), types: vec!["init_t".into()] }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = FindDomains::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        let flagged: Vec<_> = result.entries().iter().map(|e| e.element.clone()).collect();
        assert!(flagged.contains(&ElementHandle::Type(model.types.lookup("init_t").unwrap())));
        assert!(!flagged.contains(&ElementHandle::Type(model.types.lookup("passwd_t").unwrap())));
    }
}
