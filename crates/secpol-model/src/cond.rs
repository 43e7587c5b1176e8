// SPDX-License-Identifier: Apache-2.0

//! Conditional policy: booleans and the expression trees that gate
//! `true_rules`/`false_rules` blocks.
//!
//! A [`ConditionalBlock`] doesn't cache which branch is active. Its
//! [`ConditionalBlock::active_rules`] evaluates the expression against
//! the current [`BooleanTable`] on every call, so flipping a boolean via
//! [`BooleanTable::set`] takes effect immediately with no re-evaluation
//! pass to run afterwards.

use secpol_core::{BoolDomain, SymbolId, SymbolTable};
use std::collections::HashMap;

pub type BoolId = SymbolId<BoolDomain>;

#[derive(Default)]
pub struct BooleanTable {
    symbols: SymbolTable<BoolDomain>,
    values: HashMap<u32, bool>,
}

impl BooleanTable {
    pub fn new() -> Self {
        BooleanTable::default()
    }

    pub fn intern(&mut self, name: &str, default: bool) -> BoolId {
        let id = self.symbols.intern(name);
        self.values.entry(id.raw()).or_insert(default);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<BoolId> {
        self.symbols.lookup(name)
    }

    pub fn name_of(&self, id: BoolId) -> Option<&str> {
        self.symbols.name_of(id)
    }

    pub fn get(&self, id: BoolId) -> bool {
        self.values.get(&id.raw()).copied().unwrap_or(false)
    }

    /// Flip a boolean's current value. Any [`ConditionalBlock`] that
    /// references it observes the new value on its very next
    /// `active_rules` call.
    pub fn set(&mut self, id: BoolId, value: bool) {
        self.values.insert(id.raw(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = BoolId> + '_ {
        self.symbols.iter()
    }
}

/// A boolean expression over conditional policy booleans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CondExpr {
    Bool(BoolId),
    Not(Box<CondExpr>),
    And(Box<CondExpr>, Box<CondExpr>),
    Or(Box<CondExpr>, Box<CondExpr>),
    Xor(Box<CondExpr>, Box<CondExpr>),
    Eq(Box<CondExpr>, Box<CondExpr>),
}

impl CondExpr {
    pub fn eval(&self, booleans: &BooleanTable) -> bool {
        match self {
            CondExpr::Bool(id) => booleans.get(*id),
            CondExpr::Not(e) => !e.eval(booleans),
            CondExpr::And(a, b) => a.eval(booleans) && b.eval(booleans),
            CondExpr::Or(a, b) => a.eval(booleans) || b.eval(booleans),
            CondExpr::Xor(a, b) => a.eval(booleans) != b.eval(booleans),
            CondExpr::Eq(a, b) => a.eval(booleans) == b.eval(booleans),
        }
    }
}

/// A `true_rules { ... } false_rules { ... }` block. Generic over the
/// rule handle type so it can gate AV rules, TE rules, or any other kind
/// of conditional rule.
#[derive(Debug, Clone)]
pub struct ConditionalBlock<R> {
    pub expr: CondExpr,
    pub true_rules: Vec<R>,
    pub false_rules: Vec<R>,
}

impl<R> ConditionalBlock<R> {
    pub fn new(expr: CondExpr) -> Self {
        ConditionalBlock {
            expr,
            true_rules: Vec::new(),
            false_rules: Vec::new(),
        }
    }

    /// The rules active given the current boolean values. Exactly one of
    /// `true_rules`/`false_rules` is ever returned, never both — the two
    /// branches are mutually exclusive by construction.
    pub fn active_rules(&self, booleans: &BooleanTable) -> &[R] {
        if self.expr.eval(booleans) {
            &self.true_rules
        } else {
            &self.false_rules
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_boolean_flips_active_branch_immediately() {
        let mut booleans = BooleanTable::new();
        let secure_mode = booleans.intern("secure_mode", false);

        let mut block = ConditionalBlock::new(CondExpr::Bool(secure_mode));
        block.true_rules.push("allow a b : c read;");
        block.false_rules.push("allow a b : c write;");

        assert_eq!(block.active_rules(&booleans), &["allow a b : c write;"]);
        booleans.set(secure_mode, true);
        assert_eq!(block.active_rules(&booleans), &["allow a b : c read;"]);
    }

    #[test]
    fn branches_are_mutually_exclusive() {
        let mut booleans = BooleanTable::new();
        let b = booleans.intern("b", true);
        let block: ConditionalBlock<u32> = ConditionalBlock {
            expr: CondExpr::Not(Box::new(CondExpr::Bool(b))),
            true_rules: vec![1],
            false_rules: vec![2],
        };
        let active = block.active_rules(&booleans);
        assert_eq!(active, &[2]);
    }

    #[test]
    fn xor_and_eq_operators() {
        let mut booleans = BooleanTable::new();
        let x = booleans.intern("x", true);
        let y = booleans.intern("y", false);
        let xor = CondExpr::Xor(Box::new(CondExpr::Bool(x)), Box::new(CondExpr::Bool(y)));
        assert!(xor.eval(&booleans));
        let eq = CondExpr::Eq(Box::new(CondExpr::Bool(x)), Box::new(CondExpr::Bool(y)));
        assert!(!eq.eval(&booleans));
    }
}
