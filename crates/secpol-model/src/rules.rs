// SPDX-License-Identifier: Apache-2.0

//! Access-vector and type-enforcement rules, plus the role and range
//! transition/allow statements and user declarations.
//!
//! `AvRule`/`TeRule` store their source and target sets exactly as
//! written in the policy (a [`Component`] of type/attribute ids, not yet
//! expanded to concrete types). The back-index's notion of a "semantic
//! rule" is not a separate struct: it is just the result of expanding a
//! syntactic rule's `Component`s at the moment the index is built.

use crate::classes::ClassId;
use crate::context::{RoleId, TypeId, UserId};
use crate::mls::{Level, MlsRange};
use crate::types::TypeTable;
use secpol_core::Bitset;

/// A source or target set as written in a rule: zero or more type or
/// attribute ids, optionally complemented, starred (`*`, every type), or
/// (for targets only) `self`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    pub ids: Bitset,
    pub complement: bool,
    pub star: bool,
    pub is_self: bool,
}

impl Component {
    pub fn single(id: TypeId) -> Self {
        let mut ids = Bitset::with_capacity(id.raw() + 1);
        ids.insert(id.raw());
        Component {
            ids,
            ..Default::default()
        }
    }

    pub fn star() -> Self {
        Component {
            star: true,
            ..Default::default()
        }
    }

    pub fn self_target() -> Self {
        Component {
            is_self: true,
            ..Default::default()
        }
    }

    pub fn negated(mut self) -> Self {
        self.complement = true;
        self
    }

    /// Expand to the concrete set of member types this component denotes,
    /// given the rule's source type for resolving `self`. `source_types`
    /// is the already-expanded source set, used only when `is_self` is
    /// set.
    pub fn expand(&self, types: &TypeTable, source_types: Option<&Bitset>) -> Bitset {
        if self.is_self {
            return source_types.cloned().unwrap_or_else(|| Bitset::with_capacity(types.count()));
        }
        let base = if self.star {
            let mut all = Bitset::with_capacity(types.count());
            for t in types.iter_types() {
                all.insert(t.raw());
            }
            all
        } else {
            types.expand(&self.ids)
        };
        if self.complement {
            let mut universe = Bitset::with_capacity(types.count());
            for t in types.iter_types() {
                universe.insert(t.raw());
            }
            universe.difference(&base)
        } else {
            base
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvRuleKind {
    Allow,
    AuditAllow,
    DontAudit,
    Neverallow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvRuleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeRuleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CondBlockId(pub u32);

#[derive(Debug, Clone)]
pub struct AvRule {
    pub kind: AvRuleKind,
    pub source: Component,
    pub target: Component,
    pub class: ClassId,
    pub perms: Vec<String>,
    pub cond: Option<CondBlockId>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeRuleKind {
    TypeTransition,
    TypeChange,
    TypeMember,
}

#[derive(Debug, Clone)]
pub struct TeRule {
    pub kind: TeRuleKind,
    pub source: Component,
    pub target: Component,
    pub class: ClassId,
    pub default: TypeId,
    /// Object name for a filename `type_transition`, if present.
    pub object_name: Option<String>,
    pub cond: Option<CondBlockId>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct RoleAllow {
    pub from: RoleId,
    pub to: RoleId,
}

#[derive(Debug, Clone)]
pub struct RoleTransition {
    pub source_roles: Bitset,
    pub target: Component,
    pub class: Option<ClassId>,
    pub default_role: RoleId,
}

#[derive(Debug, Clone)]
pub struct RangeTransition {
    pub source: Component,
    pub target: Component,
    pub class: Option<ClassId>,
    pub range: MlsRange,
}

#[derive(Debug, Clone)]
pub struct UserStmt {
    pub user: UserId,
    pub roles: Bitset,
    pub range: Option<MlsRange>,
    pub default_level: Option<Level>,
}

/// A handle into either rule table, used by [`crate::cond::ConditionalBlock`]
/// to reference the rules gated by a conditional expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleRef {
    Av(AvRuleId),
    Te(TeRuleId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeTable;

    fn sample_types() -> (TypeTable, TypeId, TypeId, TypeId, TypeId) {
        let mut t = TypeTable::new();
        let passwd = t.intern_type("passwd_t");
        let shadow = t.intern_type("shadow_t");
        let unrelated = t.intern_type("unrelated_t");
        let file_type = t.intern_attribute("file_type");
        t.add_membership(file_type, passwd).unwrap();
        t.add_membership(file_type, shadow).unwrap();
        (t, passwd, shadow, unrelated, file_type)
    }

    #[test]
    fn component_expands_attribute_to_members() {
        let (t, passwd, shadow, unrelated, file_type) = sample_types();
        let comp = Component::single(file_type);
        let expanded = comp.expand(&t, None);
        assert!(expanded.contains(passwd.raw()));
        assert!(expanded.contains(shadow.raw()));
        assert!(!expanded.contains(unrelated.raw()));
    }

    #[test]
    fn component_complement_is_universe_minus_base() {
        let (t, passwd, shadow, unrelated, file_type) = sample_types();
        let comp = Component::single(file_type).negated();
        let expanded = comp.expand(&t, None);
        assert!(!expanded.contains(passwd.raw()));
        assert!(!expanded.contains(shadow.raw()));
        assert!(expanded.contains(unrelated.raw()));
    }

    #[test]
    fn component_star_is_every_type() {
        let (t, passwd, shadow, unrelated, _file_type) = sample_types();
        let expanded = Component::star().expand(&t, None);
        assert!(expanded.contains(passwd.raw()));
        assert!(expanded.contains(shadow.raw()));
        assert!(expanded.contains(unrelated.raw()));
    }

    #[test]
    fn component_self_resolves_to_source_set() {
        let (t, passwd, ..) = sample_types();
        let source_types: Bitset = [passwd.raw()].into_iter().collect();
        let expanded = Component::self_target().expand(&t, Some(&source_types));
        assert!(expanded.contains(passwd.raw()));
        assert_eq!(expanded.len(), 1);
    }
}
