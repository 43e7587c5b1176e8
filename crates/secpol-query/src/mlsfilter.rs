// SPDX-License-Identifier: Apache-2.0

//! MLS range filtering, shared by every query kind that can restrict
//! matches by range relation.

use secpol_model::mls::{MlsRange, RangeRelation};

#[derive(Debug, Clone)]
pub struct MlsFilter {
    pub range: MlsRange,
    pub relation: RangeRelation,
}

impl MlsFilter {
    pub fn new(range: MlsRange, relation: RangeRelation) -> Self {
        MlsFilter { range, relation }
    }

    pub fn matches(&self, candidate: &MlsRange) -> bool {
        candidate.relation(&self.range, self.relation)
    }
}
