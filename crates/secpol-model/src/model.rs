// SPDX-License-Identifier: Apache-2.0

//! `PolicyModel`: the single container tying together symbols, rules,
//! expansion, and the back-index — the one type every higher layer
//! (query engine, poly-query, checker modules) is handed.

use crate::backindex::{BackIndex, RuleKindTag, SemanticRuleKey};
use crate::classes::{ClassId, ClassTable, CommonId, CommonTable};
use crate::cond::{BoolId, BooleanTable, CondExpr, ConditionalBlock};
use crate::context::{RoleId, SecurityContext, UserId};
use crate::mls::{Level, MlsRange, MlsTables};
use crate::occurrences::OccurrenceTables;
use crate::raw::{self, PolicyCapabilities, RawPolicyImage};
use crate::rules::{
    AvRule, AvRuleId, AvRuleKind, Component, RoleAllow, RoleTransition, RangeTransition, RuleRef,
    TeRule, TeRuleId, TeRuleKind, UserStmt,
};
use crate::types::{synthetic_attribute_name, TypeId, TypeTable};
use secpol_common::{Error, Result};
use secpol_core::{Bitset, SymbolTable};
use std::collections::HashMap;

#[derive(Default)]
pub struct PolicyModel {
    pub mls_enabled: bool,
    pub capabilities: PolicyCapabilities,

    pub types: TypeTable,
    pub roles: SymbolTable<secpol_core::RoleDomain>,
    pub users: SymbolTable<secpol_core::UserDomain>,
    pub commons: CommonTable,
    pub classes: ClassTable,
    pub booleans: BooleanTable,
    pub mls: MlsTables,

    pub av_rules: Vec<AvRule>,
    pub te_rules: Vec<TeRule>,
    pub role_allows: Vec<RoleAllow>,
    pub role_transitions: Vec<RoleTransition>,
    pub range_transitions: Vec<RangeTransition>,
    pub user_stmts: Vec<UserStmt>,
    pub cond_blocks: Vec<ConditionalBlock<RuleRef>>,

    /// `role_types[r]` = types declared with `role r types {...}`, the
    /// bidirectional counterpart of `type_roles`.
    role_types: HashMap<u32, Bitset>,
    /// `type_roles[t]` = roles that may form a valid context with type
    /// `t`.
    type_roles: HashMap<u32, Bitset>,

    pub occurrences: OccurrenceTables,

    back_index: BackIndex,
    back_index_built: bool,
}

impl PolicyModel {
    pub fn new() -> Self {
        PolicyModel::default()
    }

    pub fn back_index(&self) -> &BackIndex {
        &self.back_index
    }

    /// Build the full policy model out of a `RawPolicyImage` supplied by
    /// an external loader.
    pub fn from_raw(raw: RawPolicyImage) -> Result<Self> {
        let mut model = PolicyModel::new();
        model.mls_enabled = raw.mls_enabled;
        model.capabilities = raw.capabilities;

        for t in &raw.types {
            if t.is_attribute {
                model.types.intern_attribute(&t.name);
            } else {
                model.types.intern_type(&t.name);
            }
        }
        model.build_attributes_from_map(&raw.attribute_membership)?;

        for r in &raw.roles {
            model.roles.intern(r);
        }
        for c in &raw.commons {
            let id = model.commons.intern(&c.name);
            for p in &c.perms {
                model.commons.add_perm(id, p);
            }
        }
        for c in &raw.classes {
            let id = model.classes.intern(&c.name);
            if let Some(common) = &c.common {
                let common_id = model
                    .commons
                    .lookup(common)
                    .ok_or_else(|| Error::inconsistent(format!("class {} inherits unknown common {}", c.name, common)))?;
                model.classes.set_inherits(id, common_id);
            }
            for p in &c.perms {
                model.classes.add_perm(id, p);
            }
        }
        for (name, default) in &raw.booleans {
            model.booleans.intern(name, *default);
        }
        for s in &raw.sensitivities {
            model.mls.sensitivities.intern(s);
        }
        for c in &raw.categories {
            model.mls.categories.intern(c);
        }

        for u in &raw.users {
            model.intern_user(u)?;
        }

        for block in &raw.cond_blocks {
            let expr = model.resolve_cond_expr(&block.expr)?;
            let mut cond = ConditionalBlock::new(expr);
            for r in &block.true_rules {
                cond.true_rules.push(model.resolve_raw_rule_ref(*r));
            }
            for r in &block.false_rules {
                cond.false_rules.push(model.resolve_raw_rule_ref(*r));
            }
            model.cond_blocks.push(cond);
        }

        for (i, r) in raw.av_rules.iter().enumerate() {
            let rule = model.build_av_rule(r)?;
            debug_assert_eq!(model.av_rules.len(), i);
            model.av_rules.push(rule);
        }
        for (i, r) in raw.te_rules.iter().enumerate() {
            let rule = model.build_te_rule(r)?;
            debug_assert_eq!(model.te_rules.len(), i);
            model.te_rules.push(rule);
        }

        for r in &raw.role_types {
            let role = model.intern_role(&r.role)?;
            for name in &r.types {
                let ty = model.lookup_type(name)?;
                model.add_role_type(role, ty);
            }
        }
        for r in &raw.role_allows {
            model.role_allows.push(RoleAllow {
                from: model.intern_role(&r.from)?,
                to: model.intern_role(&r.to)?,
            });
        }
        for r in &raw.role_transitions {
            let mut source_roles = Bitset::with_capacity(model.roles.count());
            for name in &r.source_roles {
                source_roles.insert(model.intern_role(name)?.raw());
            }
            model.role_transitions.push(RoleTransition {
                source_roles,
                target: model.build_component(&r.target)?,
                class: r.class.as_deref().map(|c| model.lookup_class(c)).transpose()?,
                default_role: model.intern_role(&r.default_role)?,
            });
        }
        for r in &raw.range_transitions {
            model.range_transitions.push(RangeTransition {
                source: model.build_component(&r.source)?,
                target: model.build_component(&r.target)?,
                class: r.class.as_deref().map(|c| model.lookup_class(c)).transpose()?,
                range: model.build_range(&r.range)?,
            });
        }

        model.build_occurrences(&raw)?;
        model.build_back_index();
        model.types.check_consistency()?;
        Ok(model)
    }

    /// Materialize attribute entries referenced only through membership
    /// pairs. An empty `attribute` name means the loader found the bitmap
    /// but no declaration for it, the same situation
    /// `qpol_policy_build_attrs_from_map` handles by minting a
    /// `@ttrNNNN` name from the next free id. A non-empty name is used
    /// as-is, whether or not it was separately declared in `raw.types` —
    /// only the membership link needs adding in that case.
    fn build_attributes_from_map(&mut self, membership: &[raw::RawAttributeMembership]) -> Result<()> {
        for m in membership {
            let attr_id = if m.attribute.is_empty() {
                let next_id = self.types.count() + 1;
                self.types.intern_attribute(&synthetic_attribute_name(next_id))
            } else {
                match self.types.lookup(&m.attribute) {
                    Some(id) => {
                        if !self.types.is_attribute(id) {
                            return Err(Error::inconsistent(format!(
                                "{} is declared as a type, not an attribute, but is used as one",
                                m.attribute
                            )));
                        }
                        id
                    }
                    None => self.types.intern_attribute(&m.attribute),
                }
            };
            let member_id = self
                .types
                .lookup(&m.member)
                .ok_or_else(|| Error::inconsistent(format!("membership references unknown type {}", m.member)))?;
            self.types.add_membership(attr_id, member_id)?;
        }
        Ok(())
    }

    fn intern_role(&mut self, name: &str) -> Result<RoleId> {
        Ok(self.roles.intern(name))
    }

    /// Record a `role R types T` association, maintaining both
    /// directions the same way `TypeTable::add_membership` does for
    /// attributes.
    fn add_role_type(&mut self, role: RoleId, ty: TypeId) {
        let type_cap = self.types.count();
        let role_cap = self.roles.count();
        for bitset in self.role_types.values_mut() {
            bitset.grow_to(type_cap);
        }
        for bitset in self.type_roles.values_mut() {
            bitset.grow_to(role_cap);
        }
        self.role_types
            .entry(role.raw())
            .or_insert_with(|| Bitset::with_capacity(type_cap))
            .insert(ty.raw());
        self.type_roles
            .entry(ty.raw())
            .or_insert_with(|| Bitset::with_capacity(role_cap))
            .insert(role.raw());
    }

    /// The types declared with `role r types {...}`.
    pub fn types_of_role(&self, role: RoleId) -> Bitset {
        self.role_types.get(&role.raw()).cloned().unwrap_or_else(|| Bitset::with_capacity(self.types.count()))
    }

    /// The roles that may form a valid context with type `t`.
    pub fn roles_of_type(&self, ty: TypeId) -> Bitset {
        self.type_roles.get(&ty.raw()).cloned().unwrap_or_else(|| Bitset::with_capacity(self.roles.count()))
    }

    fn lookup_class(&self, name: &str) -> Result<ClassId> {
        self.classes
            .lookup(name)
            .ok_or_else(|| Error::lookup(format!("unknown class {name}")))
    }

    fn lookup_type(&self, name: &str) -> Result<TypeId> {
        self.types
            .lookup(name)
            .ok_or_else(|| Error::lookup(format!("unknown type or attribute {name}")))
    }

    fn build_component(&self, raw: &raw::RawComponent) -> Result<Component> {
        if raw.is_self {
            return Ok(Component::self_target());
        }
        if raw.star {
            return Ok(Component::star());
        }
        let mut ids = Bitset::with_capacity(self.types.count());
        for name in &raw.names {
            ids.insert(self.lookup_type(name)?.raw());
        }
        Ok(Component {
            ids,
            complement: raw.complement,
            star: false,
            is_self: false,
        })
    }

    fn build_level(&mut self, raw: &raw::RawLevel) -> Result<Level> {
        let sensitivity = self.mls.sensitivities.intern(&raw.sensitivity);
        let mut categories = Bitset::with_capacity(self.mls.categories.count());
        for c in &raw.categories {
            let id = self.mls.categories.intern(c);
            categories.grow_to(id.raw());
            categories.insert(id.raw());
        }
        Ok(Level::new(sensitivity, categories))
    }

    fn build_range(&mut self, raw: &raw::RawRange) -> Result<MlsRange> {
        let low = self.build_level(&raw.low)?;
        let high = self.build_level(&raw.high)?;
        let range = MlsRange { low, high };
        if !range.is_valid() {
            return Err(Error::inconsistent("range high does not dominate low".to_string()));
        }
        Ok(range)
    }

    fn intern_user(&mut self, raw: &raw::RawUser) -> Result<UserId> {
        let id = self.users.intern(&raw.name);
        let mut roles = Bitset::with_capacity(self.roles.count());
        for r in &raw.roles {
            roles.insert(self.intern_role(r)?.raw());
        }
        let range = raw.range.as_ref().map(|r| self.build_range(r)).transpose()?;
        let default_level = raw.default_level.as_ref().map(|l| self.build_level(l)).transpose()?;
        self.user_stmts.push(UserStmt {
            user: id,
            roles,
            range,
            default_level,
        });
        Ok(id)
    }

    fn resolve_cond_expr(&mut self, expr: &raw::RawCondExpr) -> Result<CondExpr> {
        Ok(match expr {
            raw::RawCondExpr::Bool(name) => CondExpr::Bool(self.lookup_bool(name)?),
            raw::RawCondExpr::Not(e) => CondExpr::Not(Box::new(self.resolve_cond_expr(e)?)),
            raw::RawCondExpr::And(a, b) => CondExpr::And(
                Box::new(self.resolve_cond_expr(a)?),
                Box::new(self.resolve_cond_expr(b)?),
            ),
            raw::RawCondExpr::Or(a, b) => CondExpr::Or(
                Box::new(self.resolve_cond_expr(a)?),
                Box::new(self.resolve_cond_expr(b)?),
            ),
            raw::RawCondExpr::Xor(a, b) => CondExpr::Xor(
                Box::new(self.resolve_cond_expr(a)?),
                Box::new(self.resolve_cond_expr(b)?),
            ),
            raw::RawCondExpr::Eq(a, b) => CondExpr::Eq(
                Box::new(self.resolve_cond_expr(a)?),
                Box::new(self.resolve_cond_expr(b)?),
            ),
        })
    }

    fn lookup_bool(&self, name: &str) -> Result<BoolId> {
        self.booleans
            .lookup(name)
            .ok_or_else(|| Error::lookup(format!("unknown boolean {name}")))
    }

    fn resolve_raw_rule_ref(&self, r: raw::RawRuleRef) -> RuleRef {
        match r {
            raw::RawRuleRef::Av(i) => RuleRef::Av(AvRuleId(i as u32)),
            raw::RawRuleRef::Te(i) => RuleRef::Te(TeRuleId(i as u32)),
        }
    }

    fn build_av_rule(&self, r: &raw::RawAvRule) -> Result<AvRule> {
        Ok(AvRule {
            kind: match r.kind {
                raw::RawAvRuleKind::Allow => AvRuleKind::Allow,
                raw::RawAvRuleKind::AuditAllow => AvRuleKind::AuditAllow,
                raw::RawAvRuleKind::DontAudit => AvRuleKind::DontAudit,
                raw::RawAvRuleKind::Neverallow => AvRuleKind::Neverallow,
            },
            source: self.build_component(&r.source)?,
            target: self.build_component(&r.target)?,
            class: self.lookup_class(&r.class)?,
            perms: r.perms.clone(),
            cond: r.cond.map(|i| crate::rules::CondBlockId(i as u32)),
            line: r.line,
        })
    }

    fn build_te_rule(&self, r: &raw::RawTeRule) -> Result<TeRule> {
        Ok(TeRule {
            kind: match r.kind {
                raw::RawTeRuleKind::TypeTransition => TeRuleKind::TypeTransition,
                raw::RawTeRuleKind::TypeChange => TeRuleKind::TypeChange,
                raw::RawTeRuleKind::TypeMember => TeRuleKind::TypeMember,
            },
            source: self.build_component(&r.source)?,
            target: self.build_component(&r.target)?,
            class: self.lookup_class(&r.class)?,
            default: self.lookup_type(&r.default)?,
            object_name: r.object_name.clone(),
            cond: r.cond.map(|i| crate::rules::CondBlockId(i as u32)),
            line: r.line,
        })
    }

    fn build_context(&mut self, raw: &raw::RawContext) -> Result<SecurityContext> {
        let user = self.users.intern(&raw.user);
        let role = self.intern_role(&raw.role)?;
        let ty = self.lookup_type(&raw.ty)?;
        let mut ctx = SecurityContext::new(user, role, ty);
        if let Some(range) = &raw.range {
            ctx = ctx.with_range(self.build_range(range)?);
        }
        Ok(ctx)
    }

    fn build_occurrences(&mut self, raw: &RawPolicyImage) -> Result<()> {
        for e in &raw.fs_use {
            let context = self.build_context(&e.context)?;
            self.occurrences.fs_use.push(crate::occurrences::FsUseEntry {
                kind: match e.kind {
                    raw::RawFsUseKind::Xattr => crate::occurrences::FsUseKind::Xattr,
                    raw::RawFsUseKind::Task => crate::occurrences::FsUseKind::Task,
                    raw::RawFsUseKind::Trans => crate::occurrences::FsUseKind::Trans,
                },
                filesystem: e.filesystem.clone(),
                context,
            });
        }
        for e in &raw.portcon {
            let context = self.build_context(&e.context)?;
            self.occurrences.portcon.push(crate::occurrences::PortconEntry {
                protocol: match e.protocol {
                    raw::RawPortProtocol::Tcp => crate::occurrences::PortProtocol::Tcp,
                    raw::RawPortProtocol::Udp => crate::occurrences::PortProtocol::Udp,
                    raw::RawPortProtocol::Dccp => crate::occurrences::PortProtocol::Dccp,
                    raw::RawPortProtocol::Sctp => crate::occurrences::PortProtocol::Sctp,
                },
                low: e.low,
                high: e.high,
                context,
            });
        }
        for e in &raw.netifcon {
            let if_context = self.build_context(&e.if_context)?;
            let msg_context = self.build_context(&e.msg_context)?;
            self.occurrences.netifcon.push(crate::occurrences::NetifconEntry {
                interface: e.interface.clone(),
                if_context,
                msg_context,
            });
        }
        for e in &raw.nodecon {
            let context = self.build_context(&e.context)?;
            self.occurrences.nodecon.push(crate::occurrences::NodeconEntry {
                protocol: match e.protocol {
                    raw::RawIpProtocol::Ipv4 => crate::occurrences::IpProtocol::Ipv4,
                    raw::RawIpProtocol::Ipv6 => crate::occurrences::IpProtocol::Ipv6,
                },
                address: e.address,
                mask: e.mask,
                context,
            });
        }
        for e in &raw.genfscon {
            let context = self.build_context(&e.context)?;
            self.occurrences.genfscon.push(crate::occurrences::GenfsconEntry {
                filesystem: e.filesystem.clone(),
                path: e.path.clone(),
                object_type: e.object_type,
                context,
            });
        }
        for e in &raw.initial_sids {
            let context = e.context.as_ref().map(|c| self.build_context(c)).transpose()?;
            let ordinal = e.ordinal;
            if let Some(ctx) = context {
                self.occurrences.initial_sids.set_context(ordinal, ctx);
            }
            if let Some(name) = &e.name {
                self.occurrences.initial_sids.set_name(ordinal, name.clone());
            }
        }
        self.occurrences.initial_sids.add_initial_sid_names();
        Ok(())
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) -> Result<()> {
        let id = self.lookup_bool(name)?;
        self.booleans.set(id, value);
        Ok(())
    }

    /// Rebuild the back-index from scratch. Idempotent: calling this
    /// twice in a row with no rule changes leaves `back_index()`
    /// observationally identical.
    pub fn build_back_index(&mut self) {
        let mut index = BackIndex::new();
        for (i, rule) in self.av_rules.iter().enumerate() {
            let sources = rule.source.expand(&self.types, None);
            let targets = rule.target.expand(&self.types, Some(&sources));
            let kind = RuleKindTag::Av(rule.kind);
            for s in sources.iter() {
                for t in targets.iter() {
                    let mut key = SemanticRuleKey::new(kind, s, t, rule.class.raw());
                    if let Some(cond) = rule.cond {
                        key = key.with_cond(cond);
                    }
                    index.insert(key, RuleRef::Av(AvRuleId(i as u32)));
                }
            }
        }
        for (i, rule) in self.te_rules.iter().enumerate() {
            let sources = rule.source.expand(&self.types, None);
            let targets = rule.target.expand(&self.types, Some(&sources));
            let kind = RuleKindTag::Te(rule.kind);
            for s in sources.iter() {
                for t in targets.iter() {
                    let mut key = SemanticRuleKey::new(kind, s, t, rule.class.raw());
                    if let Some(cond) = rule.cond {
                        key = key.with_cond(cond);
                    }
                    index.insert(key, RuleRef::Te(TeRuleId(i as u32)));
                }
            }
        }
        self.back_index = index;
        self.back_index_built = true;
    }

    pub fn back_index_is_built(&self) -> bool {
        self.back_index_built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::*;

    fn sample_image() -> RawPolicyImage {
        RawPolicyImage {
            types: vec![
                RawType { name: "passwd_t".into(), is_attribute: false },
                RawType { name: "shadow_t".into(), is_attribute: false },
            ],
            attribute_membership: vec![
                RawAttributeMembership { attribute: "file_type".into(), member: "passwd_t".into() },
                RawAttributeMembership { attribute: "file_type".into(), member: "shadow_t".into() },
            ],
            classes: vec![RawClass { name: "file".into(), common: None, perms: vec!["read".into(), "write".into()] }],
            av_rules: vec![RawAvRule {
                kind: RawAvRuleKind::Allow,
                source: RawComponent { names: vec!["passwd_t".into()], ..Default::default() },
                target: RawComponent { names: vec!["file_type".into()], ..Default::default() },
                class: "file".into(),
                perms: vec!["read".into()],
                cond: None,
                line: Some(42),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn from_raw_materializes_synthetic_attribute_and_builds_index() {
        let model = PolicyModel::from_raw(sample_image()).unwrap();
        let file_type = model.types.lookup("file_type").unwrap();
        assert!(model.types.is_attribute(file_type));
        assert!(model.back_index_is_built());
        assert!(model.back_index().len() >= 2);
    }

    #[test]
    fn back_index_round_trips_expanded_rule() {
        let model = PolicyModel::from_raw(sample_image()).unwrap();
        let passwd = model.types.lookup("passwd_t").unwrap();
        let shadow = model.types.lookup("shadow_t").unwrap();
        let class = model.classes.lookup("file").unwrap();
        let key = SemanticRuleKey::new(
            RuleKindTag::Av(AvRuleKind::Allow),
            passwd.raw(),
            shadow.raw(),
            class.raw(),
        );
        let hits = model.back_index().lookup(&key);
        assert_eq!(hits, vec![RuleRef::Av(AvRuleId(0))]);
    }

    #[test]
    fn rebuilding_back_index_is_idempotent() {
        let mut model = PolicyModel::from_raw(sample_image()).unwrap();
        let before = model.back_index().len();
        model.build_back_index();
        assert_eq!(model.back_index().len(), before);
    }
}
