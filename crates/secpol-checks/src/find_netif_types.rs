// SPDX-License-Identifier: Apache-2.0

//! Finds network interface types: the type bound to the `netif` initial
//! SID, plus every type seen in a `netifcon` interface context.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use std::collections::HashMap;

pub struct FindNetifTypes {
    options: HashMap<String, ModuleOption>,
}

impl Default for FindNetifTypes {
    fn default() -> Self {
        FindNetifTypes { options: HashMap::new() }
    }
}

impl FindNetifTypes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for FindNetifTypes {
    fn name(&self) -> &str {
        "find_netif_types"
    }

    fn severity(&self) -> Severity {
        Severity::Util
    }

    fn summary(&self) -> &str {
        "Utility module: find network interface types."
    }

    fn description(&self) -> &str {
        "Finds types used to label network interfaces: the netif initial SID's type, and every \
         type named in a netifcon statement."
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'find_netif_types' has no option '{name}'")))
    }

    fn run(&mut self, model: &PolicyModel, _fclist: Option<&FcList>, _deps: &DepResults) -> Result<ModuleResult> {
        let mut result = ModuleResult::new();
        if let Some(ty) = model.occurrences.initial_sids.by_name("netif").and_then(|e| e.context.as_ref()).map(|c| c.ty) {
            result.entry(ElementHandle::Type(ty)).add_proof(ElementHandle::Empty, "");
        }
        for netif in &model.occurrences.netifcon {
            result.entry(ElementHandle::Type(netif.if_context.ty)).add_proof(ElementHandle::Empty, "");
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
    fn collects_initial_sid_and_netifcon_types() {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "netif_t".into(), is_attribute: false },
                RawType { name: "eth0_netif_t".into(), is_attribute: false },
            ],
            roles: vec!["object_r".into()],
            users: vec![RawUser { name: "system_u".into(), roles: vec!["object_r".into()], range: None, default_level: None }],
            initial_sids: vec![RawInitialSid { ordinal: 10, name: Some("netif".into()), context: Some(ctx("netif_t")) }],
            netifcon: vec![RawNetifcon {
                interface: "eth0".into(),
                if_context: ctx("eth0_netif_t"),
                msg_context: ctx("netif_t"),
            }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let mut module = FindNetifTypes::new();
        let result = module.run(&model, None, &DepResults::new()).unwrap();
        let flagged: Vec<_> = result.entries().iter().map(|e| e.element.clone()).collect();
        assert!(flagged.contains(&ElementHandle::Type(model.types.lookup("netif_t").unwrap())));
        assert!(flagged.contains(&ElementHandle::Type(model.types.lookup("eth0_netif_t").unwrap())));
    }
}
