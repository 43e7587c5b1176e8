// SPDX-License-Identifier: Apache-2.0

//! Type/attribute queries.

use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::model::PolicyModel;
use secpol_model::types::TypeId;

#[derive(Debug, Clone, Default)]
pub struct TypeQuery {
    name: Option<NameMatch>,
    include_attributes: bool,
    attributes_only: bool,
    expand_attributes: bool,
}

impl TypeQuery {
    pub fn new() -> Self {
        TypeQuery::default()
    }

    pub fn name(mut self, m: NameMatch) -> Self {
        self.name = Some(m);
        self
    }

    /// Match attributes as well as plain types (the spec's
    /// "symbol-is-attribute / symbol-is-both" knob).
    pub fn include_attributes(mut self, yes: bool) -> Self {
        self.include_attributes = yes;
        self
    }

    pub fn attributes_only(mut self, yes: bool) -> Self {
        self.attributes_only = yes;
        self
    }

    /// Replace every attribute in the result set with its member types,
    /// the same expansion `component_matches` applies to rule
    /// source/target sets. A query for an attribute's name then returns
    /// the types that carry it instead of the attribute symbol itself.
    pub fn expand_attributes(mut self, yes: bool) -> Self {
        self.expand_attributes = yes;
        self
    }

    pub fn run(&self, model: &PolicyModel) -> Result<Vec<TypeId>> {
        let selector = match &self.name {
            Some(m) => Some(Selector::compile(m)?),
            None => None,
        };
        let ids: Box<dyn Iterator<Item = TypeId>> = if self.attributes_only {
            Box::new(model.types.iter_attributes())
        } else if self.include_attributes || self.expand_attributes {
            Box::new(model.types.iter_all())
        } else {
            Box::new(model.types.iter_types())
        };
        let matched = ids.filter(|id| match &selector {
            Some(s) => model.types.name_of(*id).is_some_and(|n| s.matches(n)),
            None => true,
        });

        if !self.expand_attributes {
            return Ok(matched.collect());
        }

        let mut out = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for id in matched {
            if model.types.is_attribute(id) {
                for member in model.types.members(id).iter() {
                    if seen.insert(member) {
                        out.push(TypeId::new(member));
                    }
                }
            } else if seen.insert(id.raw()) {
                out.push(id);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::*;

    fn sample_model() -> PolicyModel {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "passwd_t".into(), is_attribute: false },
                RawType { name: "shadow_t".into(), is_attribute: false },
            ],
            attribute_membership: vec![RawAttributeMembership {
                attribute: "file_type".into(),
                member: "passwd_t".into(),
            }],
            ..Default::default()
        };
        PolicyModel::from_raw(raw).unwrap()
    }

    #[test]
    fn plain_query_excludes_attributes_by_default() {
        let model = sample_model();
        let results = TypeQuery::new().run(&model).unwrap();
        let names: Vec<&str> = results.iter().filter_map(|id| model.types.name_of(*id)).collect();
        assert_eq!(names, vec!["passwd_t", "shadow_t"]);
    }

    #[test]
    fn glob_name_filters_results() {
        let model = sample_model();
        let results = TypeQuery::new()
            .name(NameMatch::Glob("passwd_*".into()))
            .include_attributes(true)
            .run(&model)
            .unwrap();
        let names: Vec<&str> = results.iter().filter_map(|id| model.types.name_of(*id)).collect();
        assert_eq!(names, vec!["passwd_t"]);
    }

    #[test]
    fn attributes_only_returns_attribute_ids() {
        let model = sample_model();
        let results = TypeQuery::new().attributes_only(true).run(&model).unwrap();
        let names: Vec<&str> = results.iter().filter_map(|id| model.types.name_of(*id)).collect();
        assert_eq!(names, vec!["file_type"]);
    }

    #[test]
    fn expand_attributes_replaces_attribute_with_its_members() {
        let model = sample_model();
        let results = TypeQuery::new()
            .name(NameMatch::Exact("file_type".into()))
            .expand_attributes(true)
            .run(&model)
            .unwrap();
        let names: Vec<&str> = results.iter().filter_map(|id| model.types.name_of(*id)).collect();
        assert_eq!(names, vec!["passwd_t"]);
    }

    #[test]
    fn expand_attributes_passes_plain_types_through() {
        let model = sample_model();
        let results = TypeQuery::new()
            .name(NameMatch::Exact("shadow_t".into()))
            .expand_attributes(true)
            .run(&model)
            .unwrap();
        let names: Vec<&str> = results.iter().filter_map(|id| model.types.name_of(*id)).collect();
        assert_eq!(names, vec!["shadow_t"]);
    }
}
