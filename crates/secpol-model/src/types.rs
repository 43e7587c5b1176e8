// SPDX-License-Identifier: Apache-2.0

//! Types and attributes share one dense id space, the same way the
//! kernel policydb reuses `type_val_to_struct` for both kinds of entry
//! (`libqpol/src/policy_extend.c`): an attribute is just a type-table
//! entry with `is_attr` set and a membership bitset attached.

use secpol_common::{Error, Result};
use secpol_core::{Bitset, SymbolId, SymbolTable, TypeDomain};
use std::collections::HashMap;

pub type TypeId = SymbolId<TypeDomain>;

/// The type/attribute namespace plus the bidirectional membership tables
/// that make an attribute "a named set of types".
#[derive(Default)]
pub struct TypeTable {
    symbols: SymbolTable<TypeDomain>,
    is_attribute: Bitset,
    /// `members[a]` = types belonging to attribute `a`. Only populated for
    /// ids where `is_attribute` is set.
    members: HashMap<u32, Bitset>,
    /// `attrs_of[t]` = attributes that type `t` belongs to. Only
    /// populated for ids where `is_attribute` is not set.
    attrs_of: HashMap<u32, Bitset>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// Intern a primitive type name.
    pub fn intern_type(&mut self, name: &str) -> TypeId {
        let id = self.symbols.intern(name);
        self.grow(id.raw());
        id
    }

    /// Intern an attribute name, marking the id as an attribute.
    pub fn intern_attribute(&mut self, name: &str) -> TypeId {
        let id = self.symbols.intern(name);
        self.grow(id.raw());
        self.is_attribute.insert(id.raw());
        self.members.entry(id.raw()).or_insert_with(|| Bitset::with_capacity(self.symbols.count()));
        id
    }

    fn grow(&mut self, to: u32) {
        self.is_attribute.grow_to(to);
        for bitset in self.members.values_mut() {
            bitset.grow_to(to);
        }
        for bitset in self.attrs_of.values_mut() {
            bitset.grow_to(to);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.symbols.lookup(name)
    }

    pub fn name_of(&self, id: TypeId) -> Option<&str> {
        self.symbols.name_of(id)
    }

    pub fn count(&self) -> u32 {
        self.symbols.count()
    }

    pub fn is_attribute(&self, id: TypeId) -> bool {
        self.is_attribute.contains(id.raw())
    }

    pub fn iter_all(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.symbols.iter()
    }

    /// Ascending iteration over primitive type ids (excludes attributes).
    pub fn iter_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.symbols.iter().filter(move |id| !self.is_attribute(*id))
    }

    /// Ascending iteration over attribute ids.
    pub fn iter_attributes(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.symbols.iter().filter(move |id| self.is_attribute(*id))
    }

    /// Record that type `t` is a member of attribute `a`, maintaining
    /// both directions of the relation.
    pub fn add_membership(&mut self, attribute: TypeId, member: TypeId) -> Result<()> {
        if !self.symbols.contains_id(attribute) || !self.symbols.contains_id(member) {
            return Err(Error::inconsistent(format!(
                "membership references unknown id (attr={attribute:?}, type={member:?})"
            )));
        }
        self.is_attribute.insert(attribute.raw());
        self.members
            .entry(attribute.raw())
            .or_insert_with(|| Bitset::with_capacity(self.symbols.count()))
            .insert(member.raw());
        self.attrs_of
            .entry(member.raw())
            .or_insert_with(|| Bitset::with_capacity(self.symbols.count()))
            .insert(attribute.raw());
        Ok(())
    }

    /// `members(a)`: the set of types belonging to attribute `a`.
    pub fn members(&self, attribute: TypeId) -> Bitset {
        self.members
            .get(&attribute.raw())
            .cloned()
            .unwrap_or_else(|| Bitset::with_capacity(self.symbols.count()))
    }

    /// `attrs_of(t)`: the set of attributes type `t` belongs to.
    pub fn attrs_of(&self, ty: TypeId) -> Bitset {
        self.attrs_of
            .get(&ty.raw())
            .cloned()
            .unwrap_or_else(|| Bitset::with_capacity(self.symbols.count()))
    }

    /// Expand a set of ids (each either a type or an attribute) into the
    /// full set of member types: attributes are replaced by their
    /// membership, plain types pass through unchanged.
    pub fn expand(&self, ids: &Bitset) -> Bitset {
        let mut out = Bitset::with_capacity(self.symbols.count());
        for id in ids.iter() {
            if self.is_attribute.contains(id) {
                out = out.union(&self.members(TypeId::new(id)));
            } else {
                out.insert(id);
            }
        }
        out
    }

    /// Verify `members(a) <=> attrs_of(t)` bidirectional consistency for
    /// every attribute/type pair — the invariant spec.md §3 and §8 require
    /// to hold after expansion.
    pub fn check_consistency(&self) -> Result<()> {
        for attr in self.iter_attributes() {
            for ty in self.members(attr).iter() {
                if !self.attrs_of(TypeId::new(ty)).contains(attr.raw()) {
                    return Err(Error::inconsistent(format!(
                        "type {:?} is a member of attribute {:?} but attrs_of is missing the reverse link",
                        ty, attr
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Synthetic name for an attribute without one, `@ttrNNNN` with `NNNN` the
/// id zero-padded to four digits (`libqpol/src/policy_extend.c`).
pub fn synthetic_attribute_name(id: u32) -> String {
    format!("@ttr{id:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_bidirectional() {
        let mut t = TypeTable::new();
        let passwd = t.intern_type("passwd_t");
        let shadow = t.intern_type("shadow_t");
        let file_type = t.intern_attribute("file_type");
        t.add_membership(file_type, passwd).unwrap();
        t.add_membership(file_type, shadow).unwrap();

        assert!(t.members(file_type).contains(passwd.raw()));
        assert!(t.attrs_of(passwd).contains(file_type.raw()));
        t.check_consistency().unwrap();
    }

    #[test]
    fn expand_passes_plain_types_through() {
        let mut t = TypeTable::new();
        let a = t.intern_type("a_t");
        let attr = t.intern_attribute("attr_t");
        let b = t.intern_type("b_t");
        t.add_membership(attr, b).unwrap();

        let set: Bitset = [a.raw(), attr.raw()].into_iter().collect();
        let expanded = t.expand(&set);
        assert!(expanded.contains(a.raw()));
        assert!(expanded.contains(b.raw()));
        assert!(!expanded.contains(attr.raw()));
    }

    #[test]
    fn synthetic_name_is_padded() {
        assert_eq!(synthetic_attribute_name(7), "@ttr0007");
        assert_eq!(synthetic_attribute_name(12345), "@ttr12345");
    }
}
