// SPDX-License-Identifier: Apache-2.0

//! Flags types never named as the source of an `allow` rule.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::{Criterion, ElementHandle, ElementKind, MatchMode, NameMatch, Operator, Param, PolySearch, Test, TestKind};
use std::collections::HashMap;

pub struct TypesWoAllow {
    options: HashMap<String, ModuleOption>,
}

impl Default for TypesWoAllow {
    fn default() -> Self {
        TypesWoAllow { options: HashMap::new() }
    }
}

impl TypesWoAllow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for TypesWoAllow {
    fn name(&self) -> &str {
        "types_wo_allow"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Find types that are not used in an allow rule."
    }

    fn description(&self) -> &str {
        "A type never named as the source of an allow rule can never exercise any permission, \
         making it effectively unusable."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'types_wo_allow' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let search = PolySearch::new(ElementKind::Type, MatchMode::All).test(Test::new(
            TestKind::AvRule,
            vec![
                Criterion::new(Operator::RuleType, Param::RuleKind(secpol_polsearch::RuleKindMask::ALLOW)),
                Criterion::new(Operator::Source, Param::Names(vec![NameMatch::Exact("X".into())])),
            ],
        ));
        let matched: Vec<_> = search.run(model, fclist)?.into_iter().map(|r| r.element).collect();

        let mut result = ModuleResult::new();
        for ty in model.types.iter_types() {
            if !matched.contains(&ElementHandle::Type(ty)) {
                result
                    .entry(ElementHandle::Type(ty))
                    .add_proof(ElementHandle::Empty, "Type is not used in an allow rule.");
            }
        }
        Ok(result)
    }
}
