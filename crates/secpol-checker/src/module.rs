// SPDX-License-Identifier: Apache-2.0

//! The `Module` trait every concrete checker module implements.

use crate::option::ModuleOption;
use crate::requirement::Requirement;
use crate::result::ModuleResult;
use crate::severity::Severity;
use secpol_common::Result;
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use std::collections::HashMap;

/// Results of modules this module depends on, keyed by module name.
pub type DepResults<'a> = HashMap<&'a str, &'a ModuleResult>;

/// A single distinct policy check, composed over the query engine and
/// poly-query. One module may request the results of another via
/// [`Module::dependencies`] to avoid redundant scanning.
pub trait Module {
    fn name(&self) -> &str;
    fn severity(&self) -> Severity;
    fn summary(&self) -> &str;
    fn description(&self) -> &str;

    /// Names of modules whose results this module reads through
    /// [`DepResults`] during `run`.
    fn dependencies(&self) -> &[String] {
        &[]
    }

    fn requirements(&self) -> &[Requirement] {
        &[]
    }

    fn recommendations(&self) -> &[Requirement] {
        &[]
    }

    fn options(&self) -> &HashMap<String, ModuleOption>;

    fn set_option(&mut self, name: &str, values: Vec<String>, override_existing: bool) -> Result<()>;

    /// Perform the check and populate a fresh result set. The runner
    /// calls this at most once per module per lifecycle.
    fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>, deps: &DepResults) -> Result<ModuleResult>;
}
