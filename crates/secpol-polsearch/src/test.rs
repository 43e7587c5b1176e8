// SPDX-License-Identifier: Apache-2.0

//! Tests: a test scans one sub-collection of the policy (or fc-list),
//! evaluating its criteria conjunctively against each scanned item until
//! one satisfies all of them. The first (or, for rule-style tests, every)
//! satisfying item becomes a [`Proof`].

use crate::element::{ElementHandle, ElementKind};
use crate::namematch::{any_matches, Compiled};
use crate::param::{Criterion, Operator, Param};
use secpol_common::Result;
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_model::rules::{AvRuleKind, Component, TeRuleKind};
use secpol_model::types::TypeTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestKind {
    Attributes,
    Roles,
    AvRule,
    TeRule,
    RoleAllow,
    RoleTransition,
    RangeTransition,
    FcEntry,
    BoolState,
    Range,
}

#[derive(Debug, Clone)]
pub struct Test {
    pub kind: TestKind,
    pub criteria: Vec<Criterion>,
}

impl Test {
    pub fn new(kind: TestKind, criteria: Vec<Criterion>) -> Self {
        Test { kind, criteria }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Proof {
    pub kind: ElementKind,
    pub handle: ElementHandle,
    pub test_kind: TestKind,
}

fn component_names<'a>(component: &Component, types: &'a TypeTable) -> Vec<&'a str> {
    component
        .expand(types, None)
        .iter()
        .filter_map(|id| types.name_of(secpol_model::types::TypeId::new(id)))
        .collect()
}

fn compile_names(param: &Param, subject: &str) -> Result<Vec<Compiled>> {
    match param {
        Param::Names(names) => names
            .iter()
            .map(|n| n.substituted(subject))
            .map(|n| Compiled::compile(&n))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// `include`/`exclude`-style set-superset check: every compiled pattern
/// must match at least one member of `haystack`.
fn set_includes(patterns: &[Compiled], haystack: &[&str]) -> bool {
    patterns.iter().all(|p| any_matches(p, haystack.iter().copied()))
}

fn eval_criterion(criterion: &Criterion, subject: &str, names_in_scope: &[&str], model: &PolicyModel) -> Result<bool> {
    let raw = match criterion.operator {
        Operator::Include => set_includes(&compile_names(&criterion.param, subject)?, names_in_scope),
        Operator::Exclude => !set_includes(&compile_names(&criterion.param, subject)?, names_in_scope),
        Operator::Source | Operator::Target | Operator::SourceOrTarget | Operator::Default | Operator::Class
        | Operator::Perm | Operator::Type | Operator::RuleType | Operator::RangeExact | Operator::RangeSub
        | Operator::RangeSuper | Operator::RangeOverlap | Operator::BoolState => {
            // Handled directly by the per-test-kind scan below; a bare
            // name-set check is meaningless for these operators outside
            // that context.
            let _ = model;
            true
        }
    };
    Ok(criterion.apply(raw))
}

/// Evaluate `test` against `candidate` (whose display name, if any, is
/// `subject` and is substituted for the `"X"` placeholder). Returns the
/// proofs that justify a match, or `None` if the test did not match.
pub fn evaluate(
    test: &Test,
    candidate: &ElementHandle,
    subject: Option<&str>,
    model: &PolicyModel,
    fclist: Option<&FcList>,
) -> Result<Option<Vec<Proof>>> {
    let subject = subject.unwrap_or("");
    match test.kind {
        TestKind::Attributes => {
            let ty = match candidate {
                ElementHandle::Type(id) => *id,
                _ => return Ok(None),
            };
            let attrs: Vec<&str> = model
                .types
                .attrs_of(ty)
                .iter()
                .filter_map(|id| model.types.name_of(secpol_model::types::TypeId::new(id)))
                .collect();
            for criterion in &test.criteria {
                if !eval_criterion(criterion, subject, &attrs, model)? {
                    return Ok(None);
                }
            }
            let proofs = model
                .types
                .attrs_of(ty)
                .iter()
                .map(|id| Proof {
                    kind: ElementKind::Type,
                    handle: ElementHandle::Type(secpol_model::types::TypeId::new(id)),
                    test_kind: test.kind,
                })
                .collect();
            Ok(Some(proofs))
        }
        TestKind::Roles => {
            let user = match candidate {
                ElementHandle::User(id) => *id,
                _ => return Ok(None),
            };
            let roles: Vec<u32> = model
                .user_stmts
                .iter()
                .find(|u| u.user == user)
                .map(|u| u.roles.iter().collect())
                .unwrap_or_default();
            let names: Vec<&str> = roles
                .into_iter()
                .filter_map(|r| model.roles.name_of(secpol_model::context::RoleId::new(r)))
                .collect();
            for criterion in &test.criteria {
                if !eval_criterion(criterion, subject, &names, model)? {
                    return Ok(None);
                }
            }
            Ok(Some(
                names
                    .iter()
                    .filter_map(|n| model.roles.lookup(n))
                    .map(|id| Proof {
                        kind: ElementKind::Role,
                        handle: ElementHandle::Role(id),
                        test_kind: test.kind,
                    })
                    .collect(),
            ))
        }
        TestKind::AvRule => scan_av(test, subject, model),
        TestKind::TeRule => scan_te(test, subject, model),
        TestKind::RoleAllow => scan_role_allow(test, subject, model),
        TestKind::RoleTransition => scan_role_transition(test, subject, model),
        TestKind::RangeTransition => scan_range_transition(test, subject, model),
        TestKind::FcEntry => scan_fc_entry(test, subject, model, fclist),
        TestKind::BoolState => {
            let id = match candidate {
                ElementHandle::Bool(id) => *id,
                _ => return Ok(None),
            };
            let current = model.booleans.get(id);
            for criterion in &test.criteria {
                if let Param::BoolState(wanted) = criterion.param {
                    if criterion.apply(current == wanted) {
                        continue;
                    }
                    return Ok(None);
                }
            }
            Ok(Some(vec![Proof {
                kind: ElementKind::Bool,
                handle: ElementHandle::Bool(id),
                test_kind: test.kind,
            }]))
        }
        TestKind::Range => {
            let range = match candidate {
                ElementHandle::Range(r) => r.clone(),
                ElementHandle::RangeTransition(i) => match model.range_transitions.get(*i) {
                    Some(rt) => rt.range.clone(),
                    None => return Ok(None),
                },
                _ => return Ok(None),
            };
            for criterion in &test.criteria {
                if let (Some(relation), Param::Range(wanted)) = (criterion.operator.range_relation(), &criterion.param) {
                    if !criterion.apply(range.relation(wanted, relation)) {
                        return Ok(None);
                    }
                }
            }
            Ok(Some(vec![Proof {
                kind: ElementKind::Range,
                handle: ElementHandle::Range(range),
                test_kind: test.kind,
            }]))
        }
    }
}

fn scan_av(test: &Test, subject: &str, model: &PolicyModel) -> Result<Option<Vec<Proof>>> {
    let mut proofs = Vec::new();
    for (i, rule) in model.av_rules.iter().enumerate() {
        if av_rule_matches(test, subject, rule, model)? {
            proofs.push(Proof {
                kind: ElementKind::AvRule,
                handle: ElementHandle::AvRule(secpol_model::rules::AvRuleId(i as u32)),
                test_kind: test.kind,
            });
        }
    }
    Ok(if proofs.is_empty() { None } else { Some(proofs) })
}

fn av_rule_matches(test: &Test, subject: &str, rule: &secpol_model::rules::AvRule, model: &PolicyModel) -> Result<bool> {
    for criterion in &test.criteria {
        let raw = match criterion.operator {
            Operator::Source => component_hits(&criterion.param, subject, &rule.source, &model.types)?,
            Operator::Target => component_hits(&criterion.param, subject, &rule.target, &model.types)?,
            Operator::SourceOrTarget => {
                component_hits(&criterion.param, subject, &rule.source, &model.types)?
                    || component_hits(&criterion.param, subject, &rule.target, &model.types)?
            }
            Operator::Class => {
                let name = model.classes.name_of(rule.class).unwrap_or("");
                set_includes(&compile_names(&criterion.param, subject)?, &[name])
            }
            Operator::Perm => {
                let perms: Vec<&str> = rule.perms.iter().map(String::as_str).collect();
                set_includes(&compile_names(&criterion.param, subject)?, &perms)
            }
            Operator::RuleType => match &criterion.param {
                Param::RuleKind(mask) => {
                    let bit = match rule.kind {
                        AvRuleKind::Allow => crate::param::RuleKindMask::ALLOW,
                        AvRuleKind::AuditAllow => crate::param::RuleKindMask::AUDITALLOW,
                        AvRuleKind::DontAudit => crate::param::RuleKindMask::DONTAUDIT,
                        AvRuleKind::Neverallow => crate::param::RuleKindMask::NEVERALLOW,
                    };
                    mask.contains(bit)
                }
                _ => false,
            },
            _ => true,
        };
        if !criterion.apply(raw) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn scan_te(test: &Test, subject: &str, model: &PolicyModel) -> Result<Option<Vec<Proof>>> {
    let mut proofs = Vec::new();
    for (i, rule) in model.te_rules.iter().enumerate() {
        if te_rule_matches(test, subject, rule, model)? {
            proofs.push(Proof {
                kind: ElementKind::TeRule,
                handle: ElementHandle::TeRule(secpol_model::rules::TeRuleId(i as u32)),
                test_kind: test.kind,
            });
        }
    }
    Ok(if proofs.is_empty() { None } else { Some(proofs) })
}

fn te_rule_matches(test: &Test, subject: &str, rule: &secpol_model::rules::TeRule, model: &PolicyModel) -> Result<bool> {
    for criterion in &test.criteria {
        let raw = match criterion.operator {
            Operator::Source => component_hits(&criterion.param, subject, &rule.source, &model.types)?,
            Operator::Target => component_hits(&criterion.param, subject, &rule.target, &model.types)?,
            Operator::SourceOrTarget => {
                component_hits(&criterion.param, subject, &rule.source, &model.types)?
                    || component_hits(&criterion.param, subject, &rule.target, &model.types)?
            }
            Operator::Class => {
                let name = model.classes.name_of(rule.class).unwrap_or("");
                set_includes(&compile_names(&criterion.param, subject)?, &[name])
            }
            Operator::Default => {
                let name = model.types.name_of(rule.default).unwrap_or("");
                set_includes(&compile_names(&criterion.param, subject)?, &[name])
            }
            Operator::RuleType => match &criterion.param {
                Param::RuleKind(mask) => {
                    let bit = match rule.kind {
                        TeRuleKind::TypeTransition => crate::param::RuleKindMask::TYPE_TRANSITION,
                        TeRuleKind::TypeChange => crate::param::RuleKindMask::TYPE_CHANGE,
                        TeRuleKind::TypeMember => crate::param::RuleKindMask::TYPE_MEMBER,
                    };
                    mask.contains(bit)
                }
                _ => false,
            },
            _ => true,
        };
        if !criterion.apply(raw) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn component_hits(param: &Param, subject: &str, component: &Component, types: &TypeTable) -> Result<bool> {
    let names = component_names(component, types);
    Ok(set_includes(&compile_names(param, subject)?, &names))
}

fn scan_role_allow(test: &Test, subject: &str, model: &PolicyModel) -> Result<Option<Vec<Proof>>> {
    let mut proofs = Vec::new();
    for (i, ra) in model.role_allows.iter().enumerate() {
        let from = model.roles.name_of(ra.from).unwrap_or("");
        let to = model.roles.name_of(ra.to).unwrap_or("");
        let mut ok = true;
        for criterion in &test.criteria {
            let raw = match criterion.operator {
                Operator::Source => set_includes(&compile_names(&criterion.param, subject)?, &[from]),
                Operator::Target => set_includes(&compile_names(&criterion.param, subject)?, &[to]),
                Operator::SourceOrTarget => {
                    set_includes(&compile_names(&criterion.param, subject)?, &[from])
                        || set_includes(&compile_names(&criterion.param, subject)?, &[to])
                }
                _ => true,
            };
            if !criterion.apply(raw) {
                ok = false;
                break;
            }
        }
        if ok {
            proofs.push(Proof {
                kind: ElementKind::RoleAllow,
                handle: ElementHandle::RoleAllow(i),
                test_kind: test.kind,
            });
        }
    }
    Ok(if proofs.is_empty() { None } else { Some(proofs) })
}

fn scan_role_transition(test: &Test, subject: &str, model: &PolicyModel) -> Result<Option<Vec<Proof>>> {
    let mut proofs = Vec::new();
    for (i, rt) in model.role_transitions.iter().enumerate() {
        let source_names: Vec<&str> = rt
            .source_roles
            .iter()
            .filter_map(|r| model.roles.name_of(secpol_model::context::RoleId::new(r)))
            .collect();
        let default_name = model.roles.name_of(rt.default_role).unwrap_or("");
        let mut ok = true;
        for criterion in &test.criteria {
            let raw = match criterion.operator {
                Operator::Source => set_includes(&compile_names(&criterion.param, subject)?, &source_names),
                Operator::Target => component_hits(&criterion.param, subject, &rt.target, &model.types)?,
                Operator::Default => set_includes(&compile_names(&criterion.param, subject)?, &[default_name]),
                _ => true,
            };
            if !criterion.apply(raw) {
                ok = false;
                break;
            }
        }
        if ok {
            proofs.push(Proof {
                kind: ElementKind::RoleTransition,
                handle: ElementHandle::RoleTransition(i),
                test_kind: test.kind,
            });
        }
    }
    Ok(if proofs.is_empty() { None } else { Some(proofs) })
}

fn scan_range_transition(test: &Test, subject: &str, model: &PolicyModel) -> Result<Option<Vec<Proof>>> {
    let mut proofs = Vec::new();
    for (i, rt) in model.range_transitions.iter().enumerate() {
        let mut ok = true;
        for criterion in &test.criteria {
            let raw = match criterion.operator {
                Operator::Source => component_hits(&criterion.param, subject, &rt.source, &model.types)?,
                Operator::Target => component_hits(&criterion.param, subject, &rt.target, &model.types)?,
                Operator::Class => match rt.class {
                    Some(c) => {
                        let name = model.classes.name_of(c).unwrap_or("");
                        set_includes(&compile_names(&criterion.param, subject)?, &[name])
                    }
                    None => false,
                },
                Operator::RangeExact | Operator::RangeSub | Operator::RangeSuper | Operator::RangeOverlap => {
                    match (criterion.operator.range_relation(), &criterion.param) {
                        (Some(relation), Param::Range(range)) => rt.range.relation(range, relation),
                        _ => false,
                    }
                }
                _ => true,
            };
            if !criterion.apply(raw) {
                ok = false;
                break;
            }
        }
        if ok {
            proofs.push(Proof {
                kind: ElementKind::RangeTransition,
                handle: ElementHandle::RangeTransition(i),
                test_kind: test.kind,
            });
        }
    }
    Ok(if proofs.is_empty() { None } else { Some(proofs) })
}

fn scan_fc_entry(test: &Test, subject: &str, model: &PolicyModel, fclist: Option<&FcList>) -> Result<Option<Vec<Proof>>> {
    let list = match fclist {
        Some(l) => l,
        None => return Ok(None),
    };
    let mut proofs = Vec::new();
    for (i, entry) in list.iter().enumerate() {
        let mut ok = true;
        for criterion in &test.criteria {
            let raw = match criterion.operator {
                Operator::Include => set_includes(&compile_names(&criterion.param, subject)?, &[entry.path_regex.as_str()]),
                Operator::Exclude => !set_includes(&compile_names(&criterion.param, subject)?, &[entry.path_regex.as_str()]),
                Operator::Type => match &entry.context {
                    secpol_fcontext::FcContext::Resolved(ctx) => {
                        let name = model.types.name_of(ctx.ty).unwrap_or("");
                        set_includes(&compile_names(&criterion.param, subject)?, &[name])
                    }
                    secpol_fcontext::FcContext::Raw { ty, .. } => {
                        set_includes(&compile_names(&criterion.param, subject)?, &[ty.as_str()])
                    }
                    secpol_fcontext::FcContext::NoLabel => false,
                },
                _ => true,
            };
            if !criterion.apply(raw) {
                ok = false;
                break;
            }
        }
        if ok {
            proofs.push(Proof {
                kind: ElementKind::FcEntry,
                handle: ElementHandle::FcEntry(i),
                test_kind: test.kind,
            });
        }
    }
    Ok(if proofs.is_empty() { None } else { Some(proofs) })
}
