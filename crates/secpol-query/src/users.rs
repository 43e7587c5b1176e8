// SPDX-License-Identifier: Apache-2.0

//! User queries.

use crate::selector::{NameMatch, Selector};
use secpol_common::Result;
use secpol_model::context::UserId;
use secpol_model::model::PolicyModel;

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    name: Option<NameMatch>,
}

impl UserQuery {
    pub fn new() -> Self {
        UserQuery::default()
    }

    pub fn name(mut self, m: NameMatch) -> Self {
        self.name = Some(m);
        self
    }

    pub fn run(&self, model: &PolicyModel) -> Result<Vec<UserId>> {
        let selector = match &self.name {
            Some(m) => Some(Selector::compile(m)?),
            None => None,
        };
        Ok(model
            .users
            .iter()
            .filter(|id| match &selector {
                Some(s) => model.users.name_of(*id).is_some_and(|n| s.matches(n)),
                None => true,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::{RawPolicyImage, RawUser};

    #[test]
    fn unfiltered_query_returns_every_user_in_id_order() {
        let raw = RawPolicyImage {
            users: vec![
                RawUser { name: "system_u".into(), roles: vec![], range: None, default_level: None },
                RawUser { name: "staff_u".into(), roles: vec![], range: None, default_level: None },
            ],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let results = UserQuery::new().run(&model).unwrap();
        let names: Vec<&str> = results.iter().filter_map(|id| model.users.name_of(*id)).collect();
        assert_eq!(names, vec!["system_u", "staff_u"]);
    }
}
