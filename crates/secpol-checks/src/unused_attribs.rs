// SPDX-License-Identifier: Apache-2.0

//! Flags attributes never written as the source of an AV or TE rule.
//!
//! The original checker also scans `constraint`/`validatetrans`
//! expression trees for a bare reference to the attribute's name; this
//! model carries no constraint/validatetrans representation, so that
//! part of the check is not ported — an attribute referenced only from
//! a constraint will be flagged here even though it is genuinely in use.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Requirement, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct UnusedAttribs {
    options: HashMap<String, ModuleOption>,
}

impl Default for UnusedAttribs {
    fn default() -> Self {
        UnusedAttribs { options: HashMap::new() }
    }
}

impl UnusedAttribs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for UnusedAttribs {
    fn name(&self) -> &str {
        "unused_attribs"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Find attributes that are not used in a rule."
    }

    fn description(&self) -> &str {
        "An attribute that never appears as the source of an AV or TE rule contributes nothing \
         to the policy's behavior."
    }

    fn requirements(&self) -> &[Requirement] {
        &[Requirement::AttributeNames]
    }

    fn recommendations(&self) -> &[Requirement] {
        &[Requirement::Neverallow, Requirement::SynRules]
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'unused_attribs' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let include_neverallow = Requirement::Neverallow.check(model, None);

        let mut result = ModuleResult::new();
        for attr in model.types.iter_attributes() {
            let used = model.av_rules.iter().any(|r| {
                (include_neverallow || !matches!(r.kind, secpol_model::rules::AvRuleKind::Neverallow))
                    && r.source.ids.contains(attr.raw())
            }) || model.te_rules.iter().any(|r| r.source.ids.contains(attr.raw()));
            if !used {
                result
                    .entry(ElementHandle::Type(attr))
                    .add_proof(ElementHandle::Empty, "Attribute is not used in rules or constraints.");
            }
        }
        Ok(result)
    }
}
