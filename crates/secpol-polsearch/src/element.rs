// SPDX-License-Identifier: Apache-2.0

//! The element kinds a poly-query can be parameterized over, and the
//! per-kind candidate handles produced while iterating.

use secpol_fcontext::FcList;
use secpol_model::classes::{ClassId, CommonId};
use secpol_model::cond::BoolId;
use secpol_model::context::{RoleId, UserId};
use secpol_model::mls::{Level, MlsRange};
use secpol_model::model::PolicyModel;
use secpol_model::rules::{AvRuleId, TeRuleId};
use secpol_model::types::TypeId;

pub type CategoryId = secpol_core::SymbolId<secpol_core::CategoryDomain>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Type,
    Role,
    User,
    Class,
    Common,
    Category,
    Level,
    Range,
    Bool,
    AvRule,
    TeRule,
    RoleAllow,
    RoleTransition,
    RangeTransition,
    FcEntry,
}

/// A concrete element produced while iterating one [`ElementKind`]'s
/// candidate pool, or referenced as the subject of a [`crate::test::Proof`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementHandle {
    Type(TypeId),
    Role(RoleId),
    User(UserId),
    Class(ClassId),
    Common(CommonId),
    Category(CategoryId),
    Level(Level),
    Range(MlsRange),
    Bool(BoolId),
    AvRule(AvRuleId),
    TeRule(TeRuleId),
    RoleAllow(usize),
    RoleTransition(usize),
    RangeTransition(usize),
    FcEntry(usize),
    /// A synthetic proof carrying free text rather than a policy symbol —
    /// e.g. the literal text of a rule the policy is missing. Mirrors the
    /// original checker's `element` constructed over a `std::string`
    /// rather than a `qpol_*` handle.
    Literal(String),
    /// Used by proofs for which no single element explains the result —
    /// e.g. "nothing references this symbol at all".
    Empty,
}

/// The display name substituted for the placeholder string `"X"` in a
/// string-expression criterion, when one exists for the handle's kind.
pub fn element_name(handle: &ElementHandle, model: &PolicyModel) -> Option<String> {
    match handle {
        ElementHandle::Type(id) => model.types.name_of(*id).map(str::to_string),
        ElementHandle::Role(id) => model.roles.name_of(*id).map(str::to_string),
        ElementHandle::User(id) => model.users.name_of(*id).map(str::to_string),
        ElementHandle::Class(id) => model.classes.name_of(*id).map(str::to_string),
        ElementHandle::Common(id) => model.commons.name_of(*id).map(str::to_string),
        ElementHandle::Category(id) => model.mls.categories.name_of(*id).map(str::to_string),
        ElementHandle::Bool(id) => model.booleans.name_of(*id).map(str::to_string),
        _ => None,
    }
}

/// Enumerate the candidate pool for `kind`, in ascending id / source
/// order.
pub fn candidates(kind: ElementKind, model: &PolicyModel, fclist: Option<&FcList>) -> Vec<ElementHandle> {
    match kind {
        ElementKind::Type => model.types.iter_types().map(ElementHandle::Type).collect(),
        ElementKind::Role => model.roles.iter().map(ElementHandle::Role).collect(),
        ElementKind::User => model.users.iter().map(ElementHandle::User).collect(),
        ElementKind::Class => model.classes.iter().map(ElementHandle::Class).collect(),
        ElementKind::Common => model.commons.iter().map(ElementHandle::Common).collect(),
        ElementKind::Category => model.mls.categories.iter().map(ElementHandle::Category).collect(),
        ElementKind::Bool => model.booleans.iter().map(ElementHandle::Bool).collect(),
        ElementKind::AvRule => (0..model.av_rules.len() as u32).map(|i| ElementHandle::AvRule(AvRuleId(i))).collect(),
        ElementKind::TeRule => (0..model.te_rules.len() as u32).map(|i| ElementHandle::TeRule(TeRuleId(i))).collect(),
        ElementKind::RoleAllow => (0..model.role_allows.len()).map(ElementHandle::RoleAllow).collect(),
        ElementKind::RoleTransition => (0..model.role_transitions.len()).map(ElementHandle::RoleTransition).collect(),
        ElementKind::RangeTransition => (0..model.range_transitions.len()).map(ElementHandle::RangeTransition).collect(),
        ElementKind::FcEntry => match fclist {
            Some(list) => (0..list.len()).map(ElementHandle::FcEntry).collect(),
            None => Vec::new(),
        },
        ElementKind::Level => distinct_levels(model).into_iter().map(ElementHandle::Level).collect(),
        ElementKind::Range => distinct_ranges(model).into_iter().map(ElementHandle::Range).collect(),
    }
}

/// There is no central table of distinct MLS levels in this model — a
/// level only ever exists attached to a range-transition, a user
/// statement, or a context. Collect the distinct ones seen in rule data
/// for the `Level` element kind.
fn distinct_levels(model: &PolicyModel) -> Vec<Level> {
    let mut out: Vec<Level> = Vec::new();
    let mut push = |l: &Level| {
        if !out.contains(l) {
            out.push(l.clone());
        }
    };
    for rt in &model.range_transitions {
        push(&rt.range.low);
        push(&rt.range.high);
    }
    for u in &model.user_stmts {
        if let Some(r) = &u.range {
            push(&r.low);
            push(&r.high);
        }
        if let Some(l) = &u.default_level {
            push(l);
        }
    }
    out
}

fn distinct_ranges(model: &PolicyModel) -> Vec<MlsRange> {
    let mut out: Vec<MlsRange> = Vec::new();
    for rt in &model.range_transitions {
        if !out.contains(&rt.range) {
            out.push(rt.range.clone());
        }
    }
    for u in &model.user_stmts {
        if let Some(r) = &u.range {
            if !out.contains(r) {
                out.push(r.clone());
            }
        }
    }
    out
}

