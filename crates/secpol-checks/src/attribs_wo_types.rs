// SPDX-License-Identifier: Apache-2.0

//! Flags attributes with no member types — dead weight in the policy
//! since no rule referencing the attribute can ever resolve to anything.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Requirement, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct AttribsWoTypes {
    options: HashMap<String, ModuleOption>,
}

impl Default for AttribsWoTypes {
    fn default() -> Self {
        AttribsWoTypes { options: HashMap::new() }
    }
}

impl AttribsWoTypes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for AttribsWoTypes {
    fn name(&self) -> &str {
        "attribs_wo_types"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Finds attributes with no types."
    }

    fn description(&self) -> &str {
        "An attribute with no types assigned to it is either unused or indicates an error in \
         the policy, since any rule written in terms of it can never match a concrete type."
    }

    fn requirements(&self) -> &[Requirement] {
        &[Requirement::AttributeNames]
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'attribs_wo_types' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        for attr in model.types.iter_attributes() {
            if model.types.members(attr).is_empty() {
                result
                    .entry(ElementHandle::Type(attr))
                    .add_proof(ElementHandle::Empty, "Attribute has no types.");
            }
        }
        Ok(result)
    }
}
