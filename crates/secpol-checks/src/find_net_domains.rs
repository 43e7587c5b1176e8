// SPDX-License-Identifier: Apache-2.0

//! Finds network domains: types that source an `allow` rule against one
//! of a configurable set of network object classes.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::{Criterion, ElementKind, MatchMode, NameMatch, Operator, Param, PolySearch, RuleKindMask, Test, TestKind};
use std::collections::HashMap;

pub struct FindNetDomains {
    options: HashMap<String, ModuleOption>,
}

impl Default for FindNetDomains {
    fn default() -> Self {
        FindNetDomains {
            options: crate::common::single_option(
                "net_obj",
                "network object classes",
                &["netif", "node", "tcp_socket", "udp_socket", "association"],
            ),
        }
    }
}

impl FindNetDomains {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for FindNetDomains {
    fn name(&self) -> &str {
        "find_net_domains"
    }

    fn severity(&self) -> Severity {
        Severity::Util
    }

    fn summary(&self) -> &str {
        "Utility module: find network domains."
    }

    fn description(&self) -> &str {
        "Finds types that source an allow rule against a network object class."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, values: Vec<String>, override_existing: bool) -> Result<()> {
        match self.options.get_mut(name) {
            Some(opt) => opt.set(values, override_existing),
            None => Err(Error::input(format!("module 'find_net_domains' has no option '{name}'"))),
        }
    }

    fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let classes: Vec<NameMatch> = self.options["net_obj"].values.iter().map(|c| NameMatch::Exact(c.clone())).collect();
        let search = PolySearch::new(ElementKind::Type, MatchMode::Any).test(Test::new(
            TestKind::AvRule,
            vec![
                Criterion::new(Operator::RuleType, Param::RuleKind(RuleKindMask::ALLOW)),
                Criterion::new(Operator::Source, Param::Names(vec![NameMatch::Exact("X".into())])),
                Criterion::new(Operator::Class, Param::Names(classes)),
            ],
        ));

        let mut result = ModuleResult::new();
        for hit in search.run(model, fclist)? {
            let entry = result.entry(hit.element);
            for proof in hit.proofs {
                entry.add_proof(proof.handle, "");
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
    fn flags_type_allowing_a_network_class() {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "init_t".into(), is_attribute: false },
                RawType { name: "node_t".into(), is_attribute: false },
                RawType { name: "passwd_t".into(), is_attribute: false },
            ],
            classes: vec![
                RawClass { name: "node".into(), common: None, perms: vec!["tcp_recv".into()] },
                RawClass { name: "file".into(), common: None, perms: vec!["read".into()] },
            ],
            av_rules: vec![
                RawAvRule {
                    kind: RawAvRuleKind::Allow,
                    source: RawComponent { names: vec!["init_t".into()], ..Default::default() },
                    target: RawComponent { names: vec!["node_t".into()], ..Default::default() },
                    class: "node".into(),
                    perms: vec!["tcp_recv".into()],
                    cond: None,
                    line: None,
                },
                RawAvRule {
                    kind: RawAvRuleKind::Allow,
                    source: RawComponent { names: vec!["passwd_t".into()], ..Default::default() },
                    target: RawComponent { names: vec!["passwd_t".into()], ..Default::default() },
                    class: "file".into(),
                    perms: vec!["read".into()],
                    cond: None,
                    line: None,
                },
            ],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = FindNetDomains::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].element, secpol_polsearch::ElementHandle::Type(model.types.lookup("init_t").unwrap()));
    }
}
