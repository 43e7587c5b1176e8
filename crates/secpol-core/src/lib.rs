// SPDX-License-Identifier: Apache-2.0

//! Interned symbol tables (C1) and fixed-domain bitsets (C2): the two
//! building blocks every higher layer of the policy model is built from.

pub mod bitset;
pub mod symtab;

pub use bitset::Bitset;
pub use symtab::{
    BoolDomain, CategoryDomain, ClassDomain, CommonDomain, Domain, RoleDomain, SensitivityDomain,
    SymbolId, SymbolTable, TypeDomain, UserDomain,
};
