// SPDX-License-Identifier: Apache-2.0

//! A module's result set: entries keyed by a policy element, each
//! carrying an ordered list of proofs.

use secpol_polsearch::ElementHandle;

/// Proof that an entry belongs in the results: the element that
/// justifies it, plus a prefix string explaining why when rendered.
#[derive(Debug, Clone)]
pub struct Proof {
    pub element: ElementHandle,
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub element: ElementHandle,
    pub proofs: Vec<Proof>,
}

impl ResultEntry {
    fn new(element: ElementHandle) -> Self {
        ResultEntry { element, proofs: Vec::new() }
    }

    pub fn add_proof(&mut self, element: ElementHandle, prefix: impl Into<String>) {
        self.proofs.push(Proof { element, prefix: prefix.into() });
    }
}

/// The set of entries a module's `run` populates. Indexed linearly
/// rather than by a hash map since `ElementHandle` carries variants
/// (MLS levels/ranges) with no cheap hash; result sets are small enough
/// that a linear scan on insert is not a concern.
#[derive(Debug, Clone, Default)]
pub struct ModuleResult {
    entries: Vec<ResultEntry>,
}

impl ModuleResult {
    pub fn new() -> Self {
        ModuleResult::default()
    }

    /// Get or create the entry for `element`. Re-requesting the same
    /// element returns the existing entry so additional proofs
    /// accumulate onto it instead of creating a duplicate.
    pub fn entry(&mut self, element: ElementHandle) -> &mut ResultEntry {
        if let Some(pos) = self.entries.iter().position(|e| e.element == element) {
            &mut self.entries[pos]
        } else {
            self.entries.push(ResultEntry::new(element));
            self.entries.last_mut().expect("just pushed")
        }
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readding_an_element_accumulates_proofs() {
        let mut result = ModuleResult::new();
        result.entry(ElementHandle::Empty).add_proof(ElementHandle::Empty, "first");
        result.entry(ElementHandle::Empty).add_proof(ElementHandle::Empty, "second");
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].proofs.len(), 2);
    }
}
