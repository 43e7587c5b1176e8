// SPDX-License-Identifier: Apache-2.0

//! AV-rule and TE-rule queries.
//!
//! Both share the same source/target/class/"any" matching discipline;
//! they differ only in their rule-kind bitmask and in what the default
//! selector means (TE rules select on the default type instead of a
//! permission set).

use bitflags::bitflags;

use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::classes::ClassId;
use secpol_model::model::PolicyModel;
use secpol_model::rules::{AvRule, AvRuleKind, Component, TeRule, TeRuleKind};
use secpol_model::types::TypeId;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AvRuleKindMask: u8 {
        const ALLOW       = 1 << 0;
        const AUDITALLOW  = 1 << 1;
        const DONTAUDIT   = 1 << 2;
        const NEVERALLOW  = 1 << 3;
        /// `auditdeny` is treated as an alias for `dontaudit`: this
        /// model doesn't carry a separate rule kind for it, matching how
        /// SETools itself folds the two together.
        const AUDITDENY   = 1 << 2;
    }
}

impl AvRuleKindMask {
    fn matches_kind(self, kind: AvRuleKind) -> bool {
        let bit = match kind {
            AvRuleKind::Allow => AvRuleKindMask::ALLOW,
            AvRuleKind::AuditAllow => AvRuleKindMask::AUDITALLOW,
            AvRuleKind::DontAudit => AvRuleKindMask::DONTAUDIT,
            AvRuleKind::Neverallow => AvRuleKindMask::NEVERALLOW,
        };
        self.contains(bit)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TeRuleKindMask: u8 {
        const TYPE_TRANSITION = 1 << 0;
        const TYPE_CHANGE     = 1 << 1;
        const TYPE_MEMBER     = 1 << 2;
    }
}

impl TeRuleKindMask {
    fn matches_kind(self, kind: TeRuleKind) -> bool {
        let bit = match kind {
            TeRuleKind::TypeTransition => TeRuleKindMask::TYPE_TRANSITION,
            TeRuleKind::TypeChange => TeRuleKindMask::TYPE_CHANGE,
            TeRuleKind::TypeMember => TeRuleKindMask::TYPE_MEMBER,
        };
        self.contains(bit)
    }
}

fn component_matches(
    component: &Component,
    selector: &Selector,
    model: &PolicyModel,
    component_only: bool,
) -> bool {
    if component_only {
        component.ids.iter().any(|id| {
            model
                .types
                .name_of(TypeId::new(id))
                .is_some_and(|n| selector.matches(n))
        })
    } else {
        let expanded = component.expand(&model.types, None);
        expanded.iter().any(|id| {
            model
                .types
                .name_of(TypeId::new(id))
                .is_some_and(|n| selector.matches(n))
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvRuleQuery {
    kinds: Option<AvRuleKindMask>,
    source: Option<NameMatch>,
    target: Option<NameMatch>,
    any: bool,
    component_only: bool,
    classes: Vec<String>,
    perms: Vec<String>,
}

impl AvRuleQuery {
    pub fn new() -> Self {
        AvRuleQuery::default()
    }

    pub fn kinds(mut self, mask: AvRuleKindMask) -> Self {
        self.kinds = Some(mask);
        self
    }

    pub fn source(mut self, m: NameMatch) -> Self {
        self.source = Some(m);
        self
    }

    pub fn target(mut self, m: NameMatch) -> Self {
        self.target = Some(m);
        self
    }

    pub fn any(mut self, yes: bool) -> Self {
        self.any = yes;
        self
    }

    pub fn component_only(mut self, yes: bool) -> Self {
        self.component_only = yes;
        self
    }

    pub fn classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    /// All of these permissions must be present on a matching rule
    /// (set-containment, not exact match).
    pub fn perms(mut self, perms: Vec<String>) -> Self {
        self.perms = perms;
        self
    }

    pub fn run(&self, model: &PolicyModel) -> Result<Vec<usize>> {
        let source = self.source.as_ref().map(Selector::compile).transpose()?;
        let target = self.target.as_ref().map(Selector::compile).transpose()?;
        let mut out = Vec::new();
        for (i, rule) in model.av_rules.iter().enumerate() {
            if !self.matches(rule, model, source.as_ref(), target.as_ref())? {
                continue;
            }
            out.push(i);
        }
        Ok(out)
    }

    fn matches(
        &self,
        rule: &AvRule,
        model: &PolicyModel,
        source: Option<&Selector>,
        target: Option<&Selector>,
    ) -> Result<bool> {
        if let Some(mask) = self.kinds {
            if !mask.matches_kind(rule.kind) {
                return Ok(false);
            }
        }
        if !self.classes.is_empty() {
            let class_name = model.classes.name_of(rule.class).unwrap_or("");
            if !self.classes.iter().any(|c| c == class_name) {
                return Ok(false);
            }
        }
        if !self.perms.is_empty() && !self.perms.iter().all(|p| rule.perms.contains(p)) {
            return Ok(false);
        }
        let source_hit = source.map(|s| component_matches(&rule.source, s, model, self.component_only));
        let target_hit = target.map(|s| component_matches(&rule.target, s, model, self.component_only));
        Ok(match (source_hit, target_hit) {
            (Some(s), Some(t)) => {
                if self.any {
                    s || t
                } else {
                    s && t
                }
            }
            (Some(s), None) => s,
            (None, Some(t)) => t,
            (None, None) => true,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeRuleQuery {
    kinds: Option<TeRuleKindMask>,
    source: Option<NameMatch>,
    target: Option<NameMatch>,
    any: bool,
    component_only: bool,
    classes: Vec<String>,
    default: Option<NameMatch>,
}

impl TeRuleQuery {
    pub fn new() -> Self {
        TeRuleQuery::default()
    }

    pub fn kinds(mut self, mask: TeRuleKindMask) -> Self {
        self.kinds = Some(mask);
        self
    }

    pub fn source(mut self, m: NameMatch) -> Self {
        self.source = Some(m);
        self
    }

    pub fn target(mut self, m: NameMatch) -> Self {
        self.target = Some(m);
        self
    }

    pub fn any(mut self, yes: bool) -> Self {
        self.any = yes;
        self
    }

    pub fn component_only(mut self, yes: bool) -> Self {
        self.component_only = yes;
        self
    }

    pub fn classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    pub fn default_type(mut self, m: NameMatch) -> Self {
        self.default = Some(m);
        self
    }

    pub fn run(&self, model: &PolicyModel) -> Result<Vec<usize>> {
        let source = self.source.as_ref().map(Selector::compile).transpose()?;
        let target = self.target.as_ref().map(Selector::compile).transpose()?;
        let default = self.default.as_ref().map(Selector::compile).transpose()?;
        let mut out = Vec::new();
        for (i, rule) in model.te_rules.iter().enumerate() {
            if !self.matches(rule, model, source.as_ref(), target.as_ref(), default.as_ref())? {
                continue;
            }
            out.push(i);
        }
        Ok(out)
    }

    fn matches(
        &self,
        rule: &TeRule,
        model: &PolicyModel,
        source: Option<&Selector>,
        target: Option<&Selector>,
        default: Option<&Selector>,
    ) -> Result<bool> {
        if let Some(mask) = self.kinds {
            if !mask.matches_kind(rule.kind) {
                return Ok(false);
            }
        }
        if !self.classes.is_empty() {
            let class_name = model.classes.name_of(rule.class).unwrap_or("");
            if !self.classes.iter().any(|c| c == class_name) {
                return Ok(false);
            }
        }
        if let Some(d) = default {
            let name = model.types.name_of(rule.default).unwrap_or("");
            if !d.matches(name) {
                return Ok(false);
            }
        }
        let source_hit = source.map(|s| component_matches(&rule.source, s, model, self.component_only));
        let target_hit = target.map(|s| component_matches(&rule.target, s, model, self.component_only));
        Ok(match (source_hit, target_hit) {
            (Some(s), Some(t)) => {
                if self.any {
                    s || t
                } else {
                    s && t
                }
            }
            (Some(s), None) => s,
            (None, Some(t)) => t,
            (None, None) => true,
        })
    }
}

pub fn class_id_of(model: &PolicyModel, name: &str) -> Option<ClassId> {
    model.classes.lookup(name)
}
