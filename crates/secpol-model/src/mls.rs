// SPDX-License-Identifier: Apache-2.0

//! MLS sensitivities, categories, levels, and ranges.
//!
//! Sensitivities are totally ordered by policy declaration order (`s0` is
//! the id-1 entry, `s1` id-2, and so on — dominance is just id
//! comparison). Categories have no inherent order; a level's category set
//! is a [`Bitset`] over the category symbol table.

use secpol_core::{Bitset, SensitivityDomain, SymbolId, SymbolTable};

pub type SensitivityId = SymbolId<SensitivityDomain>;

/// A single MLS level: a sensitivity plus a set of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub sensitivity: SensitivityId,
    pub categories: Bitset,
}

impl Level {
    pub fn new(sensitivity: SensitivityId, categories: Bitset) -> Self {
        Level {
            sensitivity,
            categories,
        }
    }

    /// `self` dominates `other`: `self`'s sensitivity is at least as high
    /// and `self`'s categories are a superset of `other`'s.
    pub fn dominates(&self, other: &Level) -> bool {
        self.sensitivity >= other.sensitivity && other.categories.is_subset_of(&self.categories)
    }

    pub fn dominated_by(&self, other: &Level) -> bool {
        other.dominates(self)
    }
}

/// A `{ low, high }` MLS range; `high` must dominate `low` (equality
/// permitted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlsRange {
    pub low: Level,
    pub high: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRelation {
    Exact,
    Sub,
    Super,
    Overlap,
}

impl MlsRange {
    pub fn single(level: Level) -> Self {
        MlsRange {
            low: level.clone(),
            high: level,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.high.dominates(&self.low)
    }

    pub fn contains_level(&self, level: &Level) -> bool {
        self.high.dominates(level) && level.dominates(&self.low)
    }

    /// `self` is a sub-interval of `other`: every level in `self` is also
    /// in `other`.
    pub fn is_subrange_of(&self, other: &MlsRange) -> bool {
        self.low.dominates(&other.low) && other.high.dominates(&self.high)
    }

    pub fn is_superrange_of(&self, other: &MlsRange) -> bool {
        other.is_subrange_of(self)
    }

    /// Whether the two ranges share at least one representable level.
    ///
    /// Sensitivities are totally ordered so the sensitivity component is
    /// a plain interval check. Categories are not totally ordered, so
    /// "shares a level" is approximated as: the union of the two lower
    /// bounds' categories must be representable at or below the
    /// intersection of the two upper bounds' categories. This is the same
    /// interval-lattice approximation `apol`'s range queries use.
    pub fn overlaps(&self, other: &MlsRange) -> bool {
        let sens_overlap = self.low.sensitivity <= other.high.sensitivity
            && other.low.sensitivity <= self.high.sensitivity;
        if !sens_overlap {
            return false;
        }
        let lower_bound = self.low.categories.union(&other.low.categories);
        let upper_bound = self.high.categories.intersection(&other.high.categories);
        lower_bound.is_subset_of(&upper_bound)
    }

    pub fn relation(&self, other: &MlsRange, relation: RangeRelation) -> bool {
        match relation {
            RangeRelation::Exact => self == other,
            RangeRelation::Sub => self.is_subrange_of(other),
            RangeRelation::Super => self.is_superrange_of(other),
            RangeRelation::Overlap => self.overlaps(other),
        }
    }
}

/// The category and sensitivity symbol tables for an MLS policy.
#[derive(Default)]
pub struct MlsTables {
    pub sensitivities: SymbolTable<SensitivityDomain>,
    pub categories: SymbolTable<secpol_core::CategoryDomain>,
}

impl MlsTables {
    pub fn new() -> Self {
        MlsTables::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(tables: &mut MlsTables, sens: &str, cats: &[&str]) -> Level {
        let s = tables.sensitivities.intern(sens);
        let mut bs = Bitset::with_capacity(tables.categories.count().max(64));
        for c in cats {
            let id = tables.categories.intern(c);
            bs.grow_to(id.raw());
            bs.insert(id.raw());
        }
        Level::new(s, bs)
    }

    #[test]
    fn dominance_respects_sensitivity_and_categories() {
        let mut tables = MlsTables::new();
        let low = level(&mut tables, "s0", &["c0"]);
        let high = level(&mut tables, "s1", &["c0", "c1"]);
        assert!(high.dominates(&low));
        assert!(!low.dominates(&high));
    }

    #[test]
    fn range_single_equals_low_high() {
        let mut tables = MlsTables::new();
        let l = level(&mut tables, "s0", &["c0"]);
        let r = MlsRange::single(l.clone());
        assert_eq!(r.low, l);
        assert_eq!(r.high, l);
        assert!(r.is_valid());
    }

    #[test]
    fn subrange_and_superrange() {
        let mut tables = MlsTables::new();
        let s0 = level(&mut tables, "s0", &[]);
        let s15 = level(&mut tables, "s15", &["c0", "c1"]);
        let outer = MlsRange {
            low: s0.clone(),
            high: s15.clone(),
        };
        let s5 = level(&mut tables, "s5", &["c0"]);
        let inner = MlsRange {
            low: s5.clone(),
            high: s5,
        };
        assert!(inner.is_subrange_of(&outer));
        assert!(outer.is_superrange_of(&inner));
        assert!(!outer.is_subrange_of(&inner));
    }

    #[test]
    fn overlap_detects_disjoint_sensitivities() {
        let mut tables = MlsTables::new();
        let low_level = level(&mut tables, "s0", &[]);
        let mid_level = level(&mut tables, "s1", &[]);
        let high_level = level(&mut tables, "s2", &[]);
        let a = MlsRange {
            low: low_level.clone(),
            high: low_level,
        };
        let b = MlsRange {
            low: mid_level.clone(),
            high: high_level,
        };
        assert!(!a.overlaps(&b));
    }
}
