// SPDX-License-Identifier: Apache-2.0

//! The syntactic/semantic back-index: given an expanded `(source, target,
//! class)` triple — the way a query sees a rule after attribute
//! expansion — recover the as-written syntactic rule(s) it came from.
//!
//! The bucket hash is lifted directly from the kernel policy library's
//! `QPOL_SYN_RULE_TABLE_HASH` macro: `(class + (target << 2) + (source <<
//! 9)) & mask`, with a default table of `2^15` buckets. Rule kind and
//! conditional block are not part of the hash, only of bucket-local
//! equality, mirroring the original keeping separate tables per rule
//! class.

use crate::rules::{AvRuleKind, CondBlockId, RuleRef, TeRuleKind};

pub const DEFAULT_TABLE_BITS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKindTag {
    Av(AvRuleKind),
    Te(TeRuleKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticRuleKey {
    pub rule_kind: RuleKindTag,
    pub source: u32,
    pub target: u32,
    pub class: u32,
    pub cond: Option<CondBlockId>,
}

impl SemanticRuleKey {
    pub fn new(rule_kind: RuleKindTag, source: u32, target: u32, class: u32) -> Self {
        SemanticRuleKey {
            rule_kind,
            source,
            target,
            class,
            cond: None,
        }
    }

    pub fn with_cond(mut self, cond: CondBlockId) -> Self {
        self.cond = Some(cond);
        self
    }
}

pub struct BackIndex {
    buckets: Vec<Vec<(SemanticRuleKey, RuleRef)>>,
    mask: u32,
}

impl BackIndex {
    pub fn new() -> Self {
        Self::with_bits(DEFAULT_TABLE_BITS)
    }

    pub fn with_bits(bits: u32) -> Self {
        let size = 1u32 << bits;
        BackIndex {
            buckets: vec![Vec::new(); size as usize],
            mask: size - 1,
        }
    }

    fn bucket_index(&self, source: u32, target: u32, class: u32) -> usize {
        ((class.wrapping_add(target << 2).wrapping_add(source << 9)) & self.mask) as usize
    }

    pub fn insert(&mut self, key: SemanticRuleKey, rule: RuleRef) {
        let idx = self.bucket_index(key.source, key.target, key.class);
        self.buckets[idx].push((key, rule));
    }

    pub fn lookup(&self, key: &SemanticRuleKey) -> Vec<RuleRef> {
        let idx = self.bucket_index(key.source, key.target, key.class);
        self.buckets[idx]
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, r)| *r)
            .collect()
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BackIndex {
    fn default() -> Self {
        Self::new()
    }
}
