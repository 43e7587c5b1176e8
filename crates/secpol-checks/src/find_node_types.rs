// SPDX-License-Identifier: Apache-2.0

//! Finds network node types: the type bound to the `node` initial SID,
//! plus every type seen in a `nodecon` context.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct FindNodeTypes {
    options: HashMap<String, ModuleOption>,
}

impl Default for FindNodeTypes {
    fn default() -> Self {
        FindNodeTypes { options: HashMap::new() }
    }
}

impl FindNodeTypes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for FindNodeTypes {
    fn name(&self) -> &str {
        "find_node_types"
    }

    fn severity(&self) -> Severity {
        Severity::Util
    }

    fn summary(&self) -> &str {
        "Utility module: find network node types."
    }

    fn description(&self) -> &str {
        "Finds types used to label network nodes: the node initial SID's type, and every type \
         named in a nodecon statement."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'find_node_types' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        if let Some(ty) = model.occurrences.initial_sids.by_name("node").and_then(|e| e.context.as_ref()).map(|c| c.ty) {
            result.entry(ElementHandle::Type(ty)).add_proof(ElementHandle::Empty, "");
        }
        for node in &model.occurrences.nodecon {
            result.entry(ElementHandle::Type(node.context.ty)).add_proof(ElementHandle::Empty, "");
        }
        Ok(result)
    }
}
