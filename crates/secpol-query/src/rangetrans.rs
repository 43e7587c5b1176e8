// SPDX-License-Identifier: Apache-2.0

//! Range-transition queries.

use crate::mlsfilter::MlsFilter;
use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::model::PolicyModel;
use secpol_model::rules::RangeTransition;
use secpol_model::types::TypeId;

fn type_component_matches(component: &secpol_model::rules::Component, selector: &Selector, model: &PolicyModel) -> bool {
    component
        .expand(&model.types, None)
        .iter()
        .any(|id| model.types.name_of(TypeId::new(id)).is_some_and(|n| selector.matches(n)))
}

#[derive(Debug, Clone, Default)]
pub struct RangeTransitionQuery {
    source: Option<NameMatch>,
    target: Option<NameMatch>,
    class: Option<String>,
    mls: Option<MlsFilter>,
}

impl RangeTransitionQuery {
    pub fn new() -> Self {
        RangeTransitionQuery::default()
    }

    pub fn source(mut self, m: NameMatch) -> Self {
        self.source = Some(m);
        self
    }

    pub fn target(mut self, m: NameMatch) -> Self {
        self.target = Some(m);
        self
    }

    pub fn class(mut self, name: String) -> Self {
        self.class = Some(name);
        self
    }

    pub fn mls(mut self, filter: MlsFilter) -> Self {
        self.mls = Some(filter);
        self
    }

    pub fn run<'m>(&self, model: &'m PolicyModel) -> Result<Vec<&'m RangeTransition>> {
        let source = self.source.as_ref().map(Selector::compile).transpose()?;
        let target = self.target.as_ref().map(Selector::compile).transpose()?;
        Ok(model
            .range_transitions
            .iter()
            .filter(|r| {
                if let Some(s) = &source {
                    if !type_component_matches(&r.source, s, model) {
                        return false;
                    }
                }
                if let Some(t) = &target {
                    if !type_component_matches(&r.target, t, model) {
                        return false;
                    }
                }
                if let Some(class) = &self.class {
                    let name = r.class.and_then(|c| model.classes.name_of(c)).unwrap_or("");
                    if name != class {
                        return false;
                    }
                }
                if let Some(filter) = &self.mls {
                    if !filter.matches(&r.range) {
                        return false;
                    }
                }
                true
            })
            .collect())
    }
}
