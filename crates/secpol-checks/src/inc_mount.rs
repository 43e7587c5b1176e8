// SPDX-License-Identifier: Apache-2.0

//! Finds domains with incomplete mount permissions: a mount operation
//! requires both `allow dom fs_t : filesystem mount;` and
//! `allow dom dir_t : dir mounton;` — this module flags a domain that has
//! only one of the two, expanded over attributes.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_model::rules::{AvRule, AvRuleId, AvRuleKind};
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct IncMount {
    options: HashMap<String, ModuleOption>,
}

impl Default for IncMount {
    fn default() -> Self {
        IncMount { options: HashMap::new() }
    }
}

impl IncMount {
    pub fn new() -> Self {
        Self::default()
    }
}

/// True if `rule`'s expanded source/target sets intersect `source`/`target`.
fn semantic_match(model: &PolicyModel, rule: &AvRule, source: secpol_core::bitset::Bitset, target: secpol_core::bitset::Bitset) -> bool {
    let rule_source = rule.source.expand(&model.types, None);
    let rule_target = rule.target.expand(&model.types, Some(&rule_source));
    rule_source.intersects(&source) && rule_target.intersects(&target)
}

fn find_rules<'a>(model: &'a PolicyModel, class: &str, perm: &str) -> Vec<(usize, &'a AvRule)> {
    let Some(class_id) = model.classes.lookup(class) else { return Vec::new() };
    model
        .av_rules
        .iter()
        .enumerate()
        .filter(|(_, r)| r.kind == AvRuleKind::Allow && r.class == class_id && r.perms.iter().any(|p| p == perm))
        .collect()
}

impl Module for IncMount {
    fn name(&self) -> &str {
        "inc_mount"
    }

    fn severity(&self) -> Severity {
        Severity::Med
    }

    fn summary(&self) -> &str {
        "Find domains that have incomplete mount permissions."
    }

    fn description(&self) -> &str {
        "For a mount operation to be allowed by the policy both of the following must be \
         present:\n\n   1) allow somedomain_d sometype_t : filesystem mount;\n   2) allow \
         somedomain_d sometype_t : dir mounton;\n\nThis module finds domains that have only one \
         of the two rules."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'inc_mount' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mount_rules = find_rules(model, "filesystem", "mount");
        let mounton_rules = find_rules(model, "dir", "mounton");

        let mut result = ModuleResult::new();
        self.scan_direction(model, &mount_rules, &mounton_rules, "dir mounton", &mut result);
        self.scan_direction(model, &mounton_rules, &mount_rules, "filesystem mount", &mut result);
        Ok(result)
    }
}

impl IncMount {
    /// For every `have` rule, record a proof if no `other` rule semantically matches its
    /// expanded source/target. `missing_suffix` names the class/perm of the missing half.
    fn scan_direction(
        &self,
        model: &PolicyModel,
        have: &[(usize, &AvRule)],
        other: &[(usize, &AvRule)],
        missing_suffix: &str,
        result: &mut ModuleResult,
    ) {
        for (rule_idx, rule) in have {
            let source = rule.source.expand(&model.types, None);
            let target = rule.target.expand(&model.types, Some(&source));
            for src in source.iter() {
                let src_id = secpol_model::context::TypeId::new(src);
                let mut src_set = secpol_core::bitset::Bitset::with_capacity(model.types.count());
                src_set.insert(src);
                for tgt in target.iter() {
                    let tgt_id = secpol_model::context::TypeId::new(tgt);
                    let mut tgt_set = secpol_core::bitset::Bitset::with_capacity(model.types.count());
                    tgt_set.insert(tgt);

                    let matched = other.iter().any(|(_, o)| semantic_match(model, o, src_set.clone(), tgt_set.clone()));
                    if !matched {
                        let src_name = model.types.name_of(src_id).unwrap_or("?");
                        let tgt_name = model.types.name_of(tgt_id).unwrap_or("?");
                        let entry = result.entry(ElementHandle::Type(src_id));
                        entry.add_proof(
                            ElementHandle::Literal(format!("allow {src_name} {tgt_name} : {missing_suffix};")),
                            "Missing: ",
                        );
                        entry.add_proof(ElementHandle::AvRule(AvRuleId(*rule_idx as u32)), "Have: ");
                    }
                }
            }
        }
    }
}
