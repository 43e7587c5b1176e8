// SPDX-License-Identifier: Apache-2.0

//! Finds types flagged by both `find_domains` and `find_file_types` —
//! a type that looks like both a process domain and a file type, almost
//! always a modeling mistake.

use secpol_checker::{DepResults, Module, ModuleOption, ModuleResult, Severity};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use std::collections::HashMap;

pub struct DomainAndFile {
    options: HashMap<String, ModuleOption>,
    dependencies: Vec<String>,
}

impl Default for DomainAndFile {
    fn default() -> Self {
        DomainAndFile {
            options: HashMap::new(),
            dependencies: vec!["find_domains".to_string(), "find_file_types".to_string()],
        }
    }
}

impl DomainAndFile {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for DomainAndFile {
    fn name(&self) -> &str {
        "domain_and_file"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn summary(&self) -> &str {
        "Finds types that are both a process domain and a file type."
    }

    fn description(&self) -> &str {
        "A type identified as both a process domain and a file type is usually a modeling \
         mistake: domains and the files they act on are normally kept as separate types."
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn options(&self) -> &HashMap<String, ModuleOption> {
        &self.options
    }

    fn set_option(&mut self, name: &str, _values: Vec<String>, _override_existing: bool) -> Result<()> {
        Err(Error::input(format!("module 'domain_and_file' has no option '{name}'")))
    }

    fn run(&mut self, _model: &PolicyModel, _fclist: Option<&FcList>, deps: &DepResults) -> Result<ModuleResult> {
        let domains = *deps.get("find_domains").ok_or_else(|| Error::checker_runtime("domain_and_file", Error::input("missing dependency result: find_domains")))?;
        let files = *deps.get("find_file_types").ok_or_else(|| Error::checker_runtime("domain_and_file", Error::input("missing dependency result: find_file_types")))?;

        let mut result = ModuleResult::new();
        for domain_entry in domains.entries() {
            if let Some(file_entry) = files.entries().iter().find(|e| e.element == domain_entry.element) {
                let entry = result.entry(domain_entry.element.clone());
                for proof in &domain_entry.proofs {
                    entry.add_proof(proof.element.clone(), format!("as a domain, {}", proof.prefix));
                }
                for proof in &file_entry.proofs {
                    entry.add_proof(proof.element.clone(), format!("as a file type, {}", proof.prefix));
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::*;
    use secpol_polsearch::ElementHandle;

    #[test]
    fn flags_type_present_in_both_dependency_results() {
        let raw = RawPolicyImage {
            types: vec![RawType { name: "confused_t".into(), is_attribute: false }, RawType { name: "clean_t".into(), is_attribute: false }],
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let confused = model.types.lookup("confused_t").unwrap();
        let clean = model.types.lookup("clean_t").unwrap();

        let mut domains = ModuleResult::new();
        domains.entry(ElementHandle::Type(confused)).add_proof(ElementHandle::Empty, "has attribute domain");
        domains.entry(ElementHandle::Type(clean)).add_proof(ElementHandle::Empty, "has attribute domain");

        let mut files = ModuleResult::new();
        files.entry(ElementHandle::Type(confused)).add_proof(ElementHandle::Empty, "has attribute file_type");

        let mut deps: DepResults = HashMap::new();
        deps.insert("find_domains", &domains);
        deps.insert("find_file_types", &files);

        let mut module = DomainAndFile::new();
        let result = module.run(&model, None, &deps).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].element, ElementHandle::Type(confused));
    }
}
