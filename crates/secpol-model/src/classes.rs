// SPDX-License-Identifier: Apache-2.0

//! Object classes, commons, and permissions.
//!
//! Permissions are scoped per class (and per common), not interned in a
//! single global table: two different classes can both declare a
//! permission named `read` that mean unrelated things, so giving them a
//! shared id space would collapse a distinction the policy itself keeps.
//! A class's permission list is plain, insertion-ordered `String`s.

use secpol_core::{ClassDomain, CommonDomain, SymbolId, SymbolTable};
use std::collections::HashMap;

pub type ClassId = SymbolId<ClassDomain>;
pub type CommonId = SymbolId<CommonDomain>;

#[derive(Default)]
struct PermSet {
    perms: Vec<String>,
}

impl PermSet {
    fn add(&mut self, perm: &str) {
        if !self.perms.iter().any(|p| p == perm) {
            self.perms.push(perm.to_string());
        }
    }
}

/// Commons hold a reusable permission list that classes can inherit.
#[derive(Default)]
pub struct CommonTable {
    symbols: SymbolTable<CommonDomain>,
    perms: HashMap<u32, PermSet>,
}

impl CommonTable {
    pub fn new() -> Self {
        CommonTable::default()
    }

    pub fn intern(&mut self, name: &str) -> CommonId {
        self.symbols.intern(name)
    }

    pub fn lookup(&self, name: &str) -> Option<CommonId> {
        self.symbols.lookup(name)
    }

    pub fn name_of(&self, id: CommonId) -> Option<&str> {
        self.symbols.name_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = CommonId> + '_ {
        self.symbols.iter()
    }

    pub fn add_perm(&mut self, common: CommonId, perm: &str) {
        self.perms.entry(common.raw()).or_default().add(perm);
    }

    pub fn perms(&self, common: CommonId) -> &[String] {
        self.perms
            .get(&common.raw())
            .map(|p| p.perms.as_slice())
            .unwrap_or(&[])
    }
}

/// A class's own permission list, plus the common (if any) it inherits
/// from.
#[derive(Default)]
struct ClassEntry {
    inherits: Option<CommonId>,
    own_perms: PermSet,
}

#[derive(Default)]
pub struct ClassTable {
    symbols: SymbolTable<ClassDomain>,
    entries: HashMap<u32, ClassEntry>,
}

impl ClassTable {
    pub fn new() -> Self {
        ClassTable::default()
    }

    pub fn intern(&mut self, name: &str) -> ClassId {
        self.symbols.intern(name)
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.symbols.lookup(name)
    }

    pub fn name_of(&self, id: ClassId) -> Option<&str> {
        self.symbols.name_of(id)
    }

    pub fn count(&self) -> u32 {
        self.symbols.count()
    }

    pub fn iter(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.symbols.iter()
    }

    pub fn set_inherits(&mut self, class: ClassId, common: CommonId) {
        self.entries.entry(class.raw()).or_default().inherits = Some(common);
    }

    pub fn inherits(&self, class: ClassId) -> Option<CommonId> {
        self.entries.get(&class.raw()).and_then(|e| e.inherits)
    }

    pub fn add_perm(&mut self, class: ClassId, perm: &str) {
        self.entries
            .entry(class.raw())
            .or_default()
            .own_perms
            .add(perm);
    }

    /// The full permission set for `class`: the inherited common's
    /// permissions (if any) followed by the class's own, in declaration
    /// order, deduplicated.
    pub fn perms(&self, class: ClassId, commons: &CommonTable) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(common) = self.inherits(class) {
            for p in commons.perms(common) {
                if !out.contains(p) {
                    out.push(p.clone());
                }
            }
        }
        if let Some(entry) = self.entries.get(&class.raw()) {
            for p in &entry.own_perms.perms {
                if !out.contains(p) {
                    out.push(p.clone());
                }
            }
        }
        out
    }

    pub fn has_perm(&self, class: ClassId, perm: &str, commons: &CommonTable) -> bool {
        self.perms(class, commons).iter().any(|p| p == perm)
    }
}
