// SPDX-License-Identifier: Apache-2.0

//! The poly-query itself: an element kind, a match-all/any join mode,
//! and the ordered list of tests each candidate is run through.

use crate::element::{candidates, element_name, ElementHandle, ElementKind};
use crate::test::{evaluate, Proof, Test};
use secpol_common::Result;
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    All,
    Any,
}

pub struct PolySearch {
    kind: ElementKind,
    mode: MatchMode,
    tests: Vec<Test>,
}

pub struct SearchResult {
    pub element: ElementHandle,
    pub proofs: Vec<Proof>,
}

impl PolySearch {
    pub fn new(kind: ElementKind, mode: MatchMode) -> Self {
        PolySearch {
            kind,
            mode,
            tests: Vec::new(),
        }
    }

    pub fn test(mut self, test: Test) -> Self {
        self.tests.push(test);
        self
    }

    pub fn run(&self, model: &PolicyModel, fclist: Option<&FcList>) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        for candidate in candidates(self.kind, model, fclist) {
            let subject = element_name(&candidate, model);
            let mut matched_any = false;
            let mut matched_all = true;
            let mut proofs: Vec<Proof> = Vec::new();
            for test in &self.tests {
                match evaluate(test, &candidate, subject.as_deref(), model, fclist)? {
                    Some(test_proofs) => {
                        matched_any = true;
                        for p in test_proofs {
                            if !proofs.iter().any(|existing| existing.kind == p.kind && existing.handle == p.handle) {
                                proofs.push(p);
                            }
                        }
                    }
                    None => matched_all = false,
                }
            }
            let matched = match self.mode {
                MatchMode::All => matched_all && !self.tests.is_empty(),
                MatchMode::Any => matched_any,
            };
            if matched {
                results.push(SearchResult {
                    element: candidate,
                    proofs,
                });
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{Criterion, NameMatch, Operator, Param};
    use crate::test::TestKind;
    use secpol_model::raw::*;

    fn sample_model() -> PolicyModel {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "passwd_t".into(), is_attribute: false },
                RawType { name: "shadow_t".into(), is_attribute: false },
                RawType { name: "init_t".into(), is_attribute: false },
            ],
            classes: vec![RawClass { name: "file".into(), common: None, perms: vec!["read".into()] }],
            av_rules: vec![RawAvRule {
                kind: RawAvRuleKind::Allow,
                source: RawComponent { names: vec!["init_t".into()], ..Default::default() },
                target: RawComponent { names: vec!["passwd_t".into()], ..Default::default() },
                class: "file".into(),
                perms: vec!["read".into()],
                cond: None,
                line: None,
            }],
            ..Default::default()
        };
        PolicyModel::from_raw(raw).unwrap()
    }

    #[test]
    fn any_mode_matches_type_with_source_av_rule() {
        let model = sample_model();
        let search = PolySearch::new(ElementKind::Type, MatchMode::Any).test(Test::new(
            TestKind::AvRule,
            vec![Criterion::new(Operator::Source, Param::Names(vec![NameMatch::Exact("X".into())]))],
        ));
        let results = search.run(&model, None).unwrap();
        let names: Vec<_> = results
            .iter()
            .filter_map(|r| match &r.element {
                ElementHandle::Type(id) => model.types.name_of(*id),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["init_t"]);
    }

    #[test]
    fn fc_entry_exclude_rejects_matching_path() {
        use secpol_fcontext::parse::ParsedContext;
        use secpol_fcontext::{FcList, ObjectType};

        let model = sample_model();
        let mut fclist = FcList::new();
        fclist.push("/etc/passwd".into(), ObjectType::Any, ParsedContext::NoLabel, None).unwrap();
        fclist.push("/var/log/messages".into(), ObjectType::Any, ParsedContext::NoLabel, None).unwrap();

        let search = PolySearch::new(ElementKind::FcEntry, MatchMode::Any).test(Test::new(
            TestKind::FcEntry,
            vec![Criterion::new(Operator::Exclude, Param::Names(vec![NameMatch::Glob("/etc/*".into())]))],
        ));
        let results = search.run(&model, Some(&fclist)).unwrap();
        let matched_paths: Vec<_> = results
            .iter()
            .filter_map(|r| match &r.element {
                ElementHandle::FcEntry(i) => fclist.iter().nth(*i).map(|e| e.path_regex.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(matched_paths, vec!["/var/log/messages"]);
    }

    #[test]
    fn all_mode_requires_every_test_to_match() {
        let model = sample_model();
        let search = PolySearch::new(ElementKind::Type, MatchMode::All)
            .test(Test::new(
                TestKind::AvRule,
                vec![Criterion::new(Operator::Source, Param::Names(vec![NameMatch::Exact("X".into())]))],
            ))
            .test(Test::new(
                TestKind::AvRule,
                vec![Criterion::new(Operator::Target, Param::Names(vec![NameMatch::Exact("X".into())]))],
            ));
        let results = search.run(&model, None).unwrap();
        assert!(results.is_empty());
    }
}
