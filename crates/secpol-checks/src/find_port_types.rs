// SPDX-License-Identifier: Apache-2.0

//! Finds network port types: the type bound to the `port` initial SID,
//! plus every type seen in a `portcon` context.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct FindPortTypes {
    options: HashMap<String, ModuleOption>,
}

impl Default for FindPortTypes {
    fn default() -> Self {
        FindPortTypes { options: HashMap::new() }
    }
}

impl FindPortTypes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for FindPortTypes {
    fn name(&self) -> &str {
        "find_port_types"
    }

    fn severity(&self) -> Severity {
        Severity::Util
    }

    fn summary(&self) -> &str {
        "Utility module: find network port types."
    }

    fn description(&self) -> &str {
        "Finds types used to label network ports: the port initial SID's type, and every type \
         named in a portcon statement."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'find_port_types' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        if let Some(ty) = model.occurrences.initial_sids.by_name("port").and_then(|e| e.context.as_ref()).map(|c| c.ty) {
            result.entry(ElementHandle::Type(ty)).add_proof(ElementHandle::Empty, "");
        }
        for port in &model.occurrences.portcon {
            result.entry(ElementHandle::Type(port.context.ty)).add_proof(ElementHandle::Empty, "");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::*;

    fn ctx(ty: &str) -> RawContext {
        RawContext { user: "system_u".into(), role: "object_r".into(), ty: ty.into(), range: None }
    }

    #[test]
    fn collects_initial_sid_and_portcon_types() {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "port_t".into(), is_attribute: false },
                RawType { name: "http_port_t".into(), is_attribute: false },
            ],
            roles: vec!["object_r".into()],
            users: vec![RawUser { name: "system_u".into(), roles: vec!["object_r".into()], range: None, default_level: None }],
            initial_sids: vec![RawInitialSid { ordinal: 14, name: Some("port".into()), context: Some(ctx("port_t")) }],
            portcon: vec![RawPortcon { protocol: RawPortProtocol::Tcp, low: 80, high: 80, context: ctx("http_port_t") }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = FindPortTypes::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        let flagged: Vec<_> = result.entries().iter().map(|e| e.element.clone()).collect();
        assert!(flagged.contains(&ElementHandle::Type(model.types.lookup("port_t").unwrap())));
        assert!(flagged.contains(&ElementHandle::Type(model.types.lookup("http_port_t").unwrap())));
    }
}
