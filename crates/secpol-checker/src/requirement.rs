// SPDX-License-Identifier: Apache-2.0

//! Requirements and recommendations: capability predicates a module's
//! policy/fc-list input is checked against before the module runs.

use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use secpol_model::raw::PolicyCapabilities;

/// A capability predicate over a policy and optional fc-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    AttributeNames,
    SynRules,
    LineNumbers,
    Conditionals,
    Modules,
    Neverallow,
    SelinuxSystem,
    Fclist,
    DefaultContexts,
    Mls,
}

impl Requirement {
    pub fn description(self) -> &'static str {
        match self {
            Requirement::AttributeNames => "policy must retain attribute names",
            Requirement::SynRules => "policy must retain syntactic (unexpanded) rules",
            Requirement::LineNumbers => "policy must retain source line numbers",
            Requirement::Conditionals => "policy must support conditional policy",
            Requirement::Modules => "policy must support loadable policy modules",
            Requirement::Neverallow => "policy must retain neverallow rules",
            Requirement::SelinuxSystem => "check must run against a running SELinux system",
            Requirement::Fclist => "a file context list must be provided",
            Requirement::DefaultContexts => "policy must retain default_contexts data",
            Requirement::Mls => "policy must be MLS-enabled",
        }
    }

    /// Evaluate this requirement against a policy and optional fc-list.
    pub fn check(self, model: &PolicyModel, fclist: Option<&FcList>) -> bool {
        match self {
            Requirement::AttributeNames => model.capabilities.contains(PolicyCapabilities::ATTRIBUTE_NAMES),
            Requirement::SynRules => model.capabilities.contains(PolicyCapabilities::SYNTACTIC_RULES),
            Requirement::LineNumbers => model.capabilities.contains(PolicyCapabilities::LINE_NUMBERS),
            Requirement::Conditionals => model.capabilities.contains(PolicyCapabilities::CONDITIONALS),
            Requirement::Modules => model.capabilities.contains(PolicyCapabilities::MODULES),
            Requirement::Neverallow => model.capabilities.contains(PolicyCapabilities::NEVERALLOW),
            Requirement::SelinuxSystem => model.capabilities.contains(PolicyCapabilities::SELINUX_SYSTEM),
            Requirement::DefaultContexts => model.capabilities.contains(PolicyCapabilities::DEFAULT_CONTEXTS),
            Requirement::Mls => model.mls_enabled,
            Requirement::Fclist => fclist.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fclist_requirement_needs_a_list() {
        let model = PolicyModel::new();
        assert!(!Requirement::Fclist.check(&model, None));
        let list = FcList::new();
        assert!(Requirement::Fclist.check(&model, Some(&list)));
    }

    #[test]
    fn mls_requirement_reads_model_flag() {
        let mut model = PolicyModel::new();
        assert!(!Requirement::Mls.check(&model, None));
        model.mls_enabled = true;
        assert!(Requirement::Mls.check(&model, None));
    }

    #[test]
    fn capability_requirement_reads_bitflags() {
        let mut model = PolicyModel::new();
        assert!(!Requirement::Neverallow.check(&model, None));
        model.capabilities |= PolicyCapabilities::NEVERALLOW;
        assert!(Requirement::Neverallow.check(&model, None));
    }
}
