// SPDX-License-Identifier: Apache-2.0

//! Finds audit rules with no effect: a dontaudit rule that silences
//! permissions an allow rule with the same source/target/class also
//! grants, or an auditallow rule that names permissions no matching
//! allow rule actually grants.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_model::rules::{AvRule, AvRuleId, AvRuleKind};
use secpol_polsearch::ElementHandle;
use std::collections::{HashMap, HashSet};

pub struct SpuriousAudit {
    options: HashMap<String, ModuleOption>,
}

impl Default for SpuriousAudit {
    fn default() -> Self {
        SpuriousAudit { options: HashMap::new() }
    }
}

impl SpuriousAudit {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Same class, with semantically overlapping (expanded) source/target sets.
fn key_match(model: &PolicyModel, a: &AvRule, b: &AvRule) -> bool {
    if a.class != b.class {
        return false;
    }
    let a_source = a.source.expand(&model.types, None);
    let a_target = a.target.expand(&model.types, Some(&a_source));
    let b_source = b.source.expand(&model.types, None);
    let b_target = b.target.expand(&model.types, Some(&b_source));
    a_source.intersects(&b_source) && a_target.intersects(&b_target)
}

impl Module for SpuriousAudit {
    fn name(&self) -> &str {
        "spurious_audit"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Find audit rules with no effect."
    }

    fn description(&self) -> &str {
        "This happens when either of the following exist:\n\n   1) an allow rule with the same \
         key and permissions as a dontaudit rule\n   2) an auditallow rule without an allow rule \
         with the same key and permission combination."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'spurious_audit' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();

        for (i, dontaudit) in model.av_rules.iter().enumerate().filter(|(_, r)| r.kind == AvRuleKind::DontAudit) {
            let mut common_perms: Vec<String> = Vec::new();
            for (j, allow) in model.av_rules.iter().enumerate().filter(|(_, r)| r.kind == AvRuleKind::Allow) {
                if key_match(model, dontaudit, allow) {
                    let common: Vec<_> = dontaudit.perms.iter().filter(|p| allow.perms.contains(p)).cloned().collect();
                    if !common.is_empty() {
                        let entry = result.entry(ElementHandle::AvRule(AvRuleId(i as u32)));
                        entry.add_proof(ElementHandle::AvRule(AvRuleId(j as u32)), "");
                        for p in common {
                            if !common_perms.contains(&p) {
                                common_perms.push(p);
                            }
                        }
                    }
                }
            }
            if !common_perms.is_empty() {
                common_perms.sort();
                result
                    .entry(ElementHandle::AvRule(AvRuleId(i as u32)))
                    .add_proof(ElementHandle::Empty, format!("spurious permissions: {{ {} }}", common_perms.join(" ")));
            }
        }

        for (i, auditallow) in model.av_rules.iter().enumerate().filter(|(_, r)| r.kind == AvRuleKind::AuditAllow) {
            let mut remaining: HashSet<String> = auditallow.perms.iter().cloned().collect();
            for (_, allow) in model.av_rules.iter().enumerate().filter(|(_, r)| r.kind == AvRuleKind::Allow) {
                if key_match(model, auditallow, allow) {
                    for p in &allow.perms {
                        remaining.remove(p);
                    }
                }
            }
            if !remaining.is_empty() {
                let mut perms: Vec<_> = remaining.into_iter().collect();
                perms.sort();
                result
                    .entry(ElementHandle::AvRule(AvRuleId(i as u32)))
                    .add_proof(ElementHandle::Empty, format!("spurious permissions: {{ {} }}", perms.join(" ")));
            }
        }

        Ok(result)
    }
}
