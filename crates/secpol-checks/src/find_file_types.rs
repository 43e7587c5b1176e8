// SPDX-License-Identifier: Apache-2.0

//! Finds file types: types that carry a file-type attribute, allow
//! `filesystem:associate`, are the default of a non-`process`
//! `type_transition`, or appear in a `file_contexts` entry.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Requirement, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::{Criterion, ElementHandle, ElementKind, MatchMode, NameMatch, Operator, Param, PolySearch, RuleKindMask, Test, TestKind};
use std::collections::HashMap;

pub struct FindFileTypes {
    options: HashMap<String, ModuleOption>,
}

impl Default for FindFileTypes {
    fn default() -> Self {
        FindFileTypes { options: crate::common::single_option("file_type_attribute", "attribute naming file types", &["file_type"]) }
    }
}

impl FindFileTypes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for FindFileTypes {
    fn name(&self) -> &str {
        "find_file_types"
    }

    fn severity(&self) -> Severity {
        Severity::Util
    }

    fn summary(&self) -> &str {
        "Utility module: find file types."
    }

    fn description(&self) -> &str {
        "Finds file types by attribute, filesystem:associate rules, non-process \
         type_transitions, and file_contexts entries."
    }

    fn recommendations(&self) -> &[Requirement] {
        &[Requirement::AttributeNames, Requirement::Fclist]
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, values: Vec<String>, override_existing: bool) -> Result<()> {
        match self.options.get_mut(name) {
            Some(opt) => opt.set(values, override_existing),
            None => Err(Error::input(format!("module 'find_file_types' has no option '{name}'"))),
        }
    }

    fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();

        let mut search = PolySearch::new(ElementKind::Type, MatchMode::Any)
            .test(Test::new(
                TestKind::AvRule,
                vec![
                    Criterion::new(Operator::RuleType, Param::RuleKind(RuleKindMask::ALLOW)),
                    Criterion::new(Operator::Source, Param::Names(vec![NameMatch::Exact("X".into())])),
                    Criterion::new(Operator::Class, Param::Names(vec![NameMatch::Exact("filesystem".into())])),
                    Criterion::new(Operator::Perm, Param::Names(vec![NameMatch::Exact("associate".into())])),
                ],
            ))
            .test(Test::new(
                TestKind::TeRule,
                vec![
                    Criterion::new(Operator::RuleType, Param::RuleKind(RuleKindMask::TYPE_TRANSITION)),
                    Criterion::new(Operator::Default, Param::Names(vec![NameMatch::Exact("X".into())])),
                    Criterion::new(Operator::Class, Param::Names(vec![NameMatch::Exact("process".into())])).negated(),
                ],
            ));
        if Requirement::Fclist.check(model, fclist) {
            search = search.test(Test::new(
                TestKind::FcEntry,
                vec![Criterion::new(Operator::Type, Param::Names(vec![NameMatch::Exact("X".into())]))],
            ));
        }
        for hit in search.run(model, fclist)? {
            let entry = result.entry(hit.element);
            for proof in hit.proofs {
                let prefix = match proof.kind {
                    ElementKind::FcEntry => "is in the file_contexts entry ",
                    _ => "",
                };
                entry.add_proof(proof.handle, prefix);
            }
        }

        if Requirement::AttributeNames.check(model, fclist) {
            let file_attrs: Vec<_> = self.options["file_type_attribute"]
                .values
                .iter()
                .filter_map(|name| model.types.lookup(name))
                .collect();
            for ty in model.types.iter_types() {
                let attrs_of_ty = model.types.attrs_of(ty);
                for attr in &file_attrs {
                    if attrs_of_ty.contains(attr.raw()) {
                        result.entry(ElementHandle::Type(ty)).add_proof(ElementHandle::Type(*attr), "has attribute ");
                    }
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
    fn flags_type_allowing_filesystem_associate() {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "passwd_file_t".into(), is_attribute: false },
                RawType { name: "fs_t".into(), is_attribute: false },
                RawType { name: "init_t".into(), is_attribute: false },
            ],
            classes: vec![RawClass { name: "filesystem".into(), common: None, perms: vec!["associate".into()] }],
            av_rules: vec![RawAvRule {
                kind: RawAvRuleKind::Allow,
                source: RawComponent { names: vec!["passwd_file_t".into()], ..Default::default() },
                target: RawComponent { names: vec!["fs_t".into()], ..Default::default() },
                class: "filesystem".into(),
                perms: vec!["associate".into()],
                cond: None,
                line: None,
            }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = FindFileTypes::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        let flagged: Vec<_> = result.entries().iter().map(|e| e.element.clone()).collect();
        assert!(flagged.contains(&ElementHandle::Type(model.types.lookup("passwd_file_t").unwrap())));
        assert!(!flagged.contains(&ElementHandle::Type(model.types.lookup("init_t").unwrap())));
    }
}
