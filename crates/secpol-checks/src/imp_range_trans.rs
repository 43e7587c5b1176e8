// SPDX-License-Identifier: Apache-2.0

//! Finds impossible range transitions: a range transition is only
//! reachable if (1) a TE rule lets the transition happen, (2) a role
//! association lets some role reach the source type, and (3) some user
//! can actually be placed in the target MLS range (and, if a role
//! exists, in one of those roles too).

use crate::common::roles_excluding_object_r;
use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Requirement, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_model::rules::{AvRuleKind, RangeTransition};
use secpol_polsearch::ElementHandle;
use secpol_render::render_mls_range;
use std::collections::HashMap;

pub struct ImpRangeTrans {
    options: HashMap<String, ModuleOption>,
}

impl Default for ImpRangeTrans {
    fn default() -> Self {
        ImpRangeTrans { options: HashMap::new() }
    }
}

impl ImpRangeTrans {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for ImpRangeTrans {
    fn name(&self) -> &str {
        "imp_range_trans"
    }

    fn severity(&self) -> Severity {
        Severity::Med
    }

    fn summary(&self) -> &str {
        "Find impossible range transitions."
    }

    fn description(&self) -> &str {
        "A range transition is possible if and only if all of the following conditions are \
         satisfied:\n   1) there exist TE rules allowing the range transition to occur\n   2) \
         there exist RBAC rules allowing the range transition to occur\n   3) at least one user \
         must be able to transition to the target MLS range"
    }

    fn requirements(&self) -> &[Requirement] {
        &[Requirement::Mls]
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'imp_range_trans' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        let all_roles = roles_excluding_object_r(model);
        log::debug!("checking {} range transitions for reachability", model.range_transitions.len());

        for (i, rt) in model.range_transitions.iter().enumerate() {
            let handle = ElementHandle::RangeTransition(i);
            self.check_te_rule(model, rt, handle.clone(), &mut result);
            let role_names = self.check_roles(model, rt, &all_roles, handle.clone(), &mut result);
            self.check_users(model, rt, &role_names, handle, &mut result);
        }
        Ok(result)
    }
}

impl ImpRangeTrans {
    fn check_te_rule(&self, model: &PolicyModel, rt: &RangeTransition, handle: ElementHandle, result: &mut ModuleResult) {
        let source = rt.source.expand(&model.types, None);
        let target = rt.target.expand(&model.types, Some(&source));
        let class_name = rt.class.and_then(|c| model.classes.name_of(c)).unwrap_or("process");

        let (required_class, required_perm) = if class_name == "process" {
            ("file", "execute")
        } else {
            let Some(class_id) = rt.class else { return };
            if !model.classes.perms(class_id, &model.commons).iter().any(|p| p == "create") {
                // "create" is not a valid permission for this class; the transition can never
                // be reached via this route, matching the original's decision to skip it.
                return;
            }
            (class_name, "create")
        };

        let satisfied = model.av_rules.iter().any(|r| {
            if r.kind != AvRuleKind::Allow {
                return false;
            }
            let r_class_name = model.classes.name_of(r.class).unwrap_or("");
            if r_class_name != required_class || !r.perms.iter().any(|p| p == required_perm) {
                return false;
            }
            let r_source = r.source.expand(&model.types, None);
            let r_target = r.target.expand(&model.types, Some(&r_source));
            r_source.intersects(&source) && r_target.intersects(&target)
        });

        if !satisfied {
            let source_names = type_names(model, &source);
            let target_names = type_names(model, &target);
            for src in &source_names {
                for tgt in &target_names {
                    result.entry(handle.clone()).add_proof(
                        ElementHandle::Literal(format!("allow {src} {tgt} : {required_class} {required_perm};")),
                        "Missing: ",
                    );
                }
            }
        }
    }

    /// Returns the role names found, so `check_users` can phrase its combined-query proof.
    fn check_roles(
        &self,
        model: &PolicyModel,
        rt: &RangeTransition,
        all_roles: &[secpol_model::context::RoleId],
        handle: ElementHandle,
        result: &mut ModuleResult,
    ) -> Vec<String> {
        let source = rt.source.expand(&model.types, None);
        let mut role_names = Vec::new();
        for ty_raw in source.iter() {
            let ty = secpol_model::context::TypeId::new(ty_raw);
            let roles_of_ty = model.roles_of_type(ty);
            for role in all_roles {
                if roles_of_ty.contains(role.raw()) {
                    if let Some(name) = model.roles.name_of(*role) {
                        if !role_names.contains(&name.to_string()) {
                            role_names.push(name.to_string());
                        }
                    }
                }
            }
        }
        if role_names.is_empty() {
            let source_names = type_names(model, &source);
            for src in &source_names {
                result.entry(handle.clone()).add_proof(ElementHandle::Literal(format!("No role associated with type {src}")), "");
            }
        }
        role_names
    }

    fn check_users(&self, model: &PolicyModel, rt: &RangeTransition, role_names: &[String], handle: ElementHandle, result: &mut ModuleResult) {
        let with_range: Vec<_> = model
            .user_stmts
            .iter()
            .filter(|u| matches!(&u.range, Some(r) if r.is_superrange_of(&rt.range)))
            .collect();

        if with_range.is_empty() {
            result
                .entry(handle)
                .add_proof(ElementHandle::Literal(format!("No user with range {}", render_mls_range(&rt.range, model))), "");
            return;
        }

        if role_names.is_empty() {
            return;
        }

        let role_ids: Vec<_> = role_names.iter().filter_map(|n| model.roles.lookup(n)).collect();
        let with_role = with_range.iter().any(|u| role_ids.iter().any(|r| u.roles.contains(r.raw())));
        if !with_role {
            result.entry(handle).add_proof(
                ElementHandle::Literal(format!(
                    "No user with range {} and one of the roles {{ {} }}",
                    render_mls_range(&rt.range, model),
                    role_names.join(" ")
                )),
                "",
            );
        }
    }
}

fn type_names(model: &PolicyModel, ids: &secpol_core::Bitset) -> Vec<String> {
    ids.iter()
        .filter_map(|raw| model.types.name_of(secpol_model::context::TypeId::new(raw)).map(|s| s.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::*;

    fn component(name: &str) -> RawComponent {
        RawComponent { names: vec![name.to_string()], ..Default::default() }
    }

    fn sens_range(low: &str, high: &str) -> RawRange {
        RawRange {
            low: RawLevel { sensitivity: low.to_string(), categories: vec![] },
            high: RawLevel { sensitivity: high.to_string(), categories: vec![] },
        }
    }

    #[test]
    fn flags_transition_missing_te_rule_and_role_and_user() {
        let raw = RawPolicyImage {
            mls_enabled: true,
            types: vec![RawType { name: "staff_t".into(), is_attribute: false }, RawType { name: "sysadm_t".into(), is_attribute: false }],
            roles: vec!["object_r".into()],
            sensitivities: vec!["s0".into(), "s1".into()],
            range_transitions: vec![RawRangeTransition {
                source: component("staff_t"),
                target: component("sysadm_t"),
                class: None,
                range: sens_range("s1", "s1"),
            }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = ImpRangeTrans::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        assert_eq!(result.len(), 1);
        let entry = &result.entries()[0];
        assert!(entry.proofs.iter().any(|p| matches!(&p.element, ElementHandle::Literal(s) if s.starts_with("allow staff_t sysadm_t"))));
        assert!(entry.proofs.iter().any(|p| matches!(&p.element, ElementHandle::Literal(s) if s.starts_with("No role associated"))));
        assert!(entry.proofs.iter().any(|p| matches!(&p.element, ElementHandle::Literal(s) if s.starts_with("No user with range"))));
    }

    #[test]
    fn no_flag_when_all_three_conditions_hold() {
        let raw = RawPolicyImage {
            mls_enabled: true,
            types: vec![RawType { name: "staff_t".into(), is_attribute: false }, RawType { name: "sysadm_t".into(), is_attribute: false }],
            roles: vec!["staff_r".into(), "object_r".into()],
            role_types: vec![RawRoleType { role: "staff_r".into(), types: vec!["staff_t".into()] }],
            sensitivities: vec!["s0".into(), "s1".into()],
            classes: vec![RawClass { name: "file".into(), common: None, perms: vec!["execute".into()] }],
            av_rules: vec![RawAvRule {
                kind: RawAvRuleKind::Allow,
                source: component("staff_t"),
                target: component("sysadm_t"),
                class: "file".into(),
                perms: vec!["execute".into()],
                cond: None,
                line: None,
            }],
            users: vec![RawUser {
                name: "staff_u".into(),
                roles: vec!["staff_r".into()],
                range: Some(sens_range("s0", "s1")),
                default_level: None,
            }],
            range_transitions: vec![RawRangeTransition {
                source: component("staff_t"),
                target: component("sysadm_t"),
                class: None,
                range: sens_range("s1", "s1"),
            }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = ImpRangeTrans::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        assert!(result.is_empty());
    }
}
