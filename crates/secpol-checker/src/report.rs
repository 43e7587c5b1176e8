// SPDX-License-Identifier: Apache-2.0

//! Report assembly: aggregates module results behind a minimum-severity
//! filter and renders them using the context/rule renderers.

use crate::profile::OutputMode;
use crate::result::ModuleResult;
use crate::severity::Severity;
use secpol_model::model::PolicyModel;
use secpol_polsearch::ElementHandle;
use secpol_render::{
    render_av_rule, render_level, render_mls_range, render_range_transition, render_role_allow,
    render_role_transition, render_te_rule,
};
use std::fmt::Write as _;

/// One module's contribution to a report: either it ran (carrying its
/// result set and any degraded recommendations) or it was skipped for
/// an unmet requirement.
#[derive(Debug, Clone)]
pub enum ModuleOutcome {
    Ran {
        result: ModuleResult,
        degraded: Vec<&'static str>,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub name: String,
    pub severity: Severity,
    pub summary: String,
    pub description: String,
    pub options: Vec<(String, Vec<String>)>,
    pub output: OutputMode,
    pub outcome: ModuleOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub modules: Vec<ModuleReport>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    /// Whether any ran module's result set has at least one entry, and
    /// that module's severity is at or above `min_sev` — the signal the
    /// `sechecker` binary's exit code is based on.
    pub fn has_results_at_or_above(&self, min_sev: Severity) -> bool {
        self.modules.iter().any(|m| {
            m.severity >= min_sev
                && matches!(&m.outcome, ModuleOutcome::Ran { result, .. } if !result.is_empty())
        })
    }

    /// Render the report as text. `min_sev` filters out modules whose
    /// severity falls below it; `mode_override`, if given, replaces
    /// every module's own configured output mode.
    pub fn render(&self, model: &PolicyModel, min_sev: Severity, mode_override: Option<OutputMode>) -> String {
        let mut out = String::new();
        for module in &self.modules {
            if module.severity < min_sev {
                continue;
            }
            let mode = mode_override.unwrap_or(module.output);
            if mode == OutputMode::Quiet {
                continue;
            }
            render_module(&mut out, module, mode, model);
        }
        out
    }
}

fn render_module(out: &mut String, module: &ModuleReport, mode: OutputMode, model: &PolicyModel) {
    let _ = writeln!(out, "=== {} ({}) ===", module.name, module.severity.as_str());
    let _ = writeln!(out, "{}", module.summary);

    if matches!(mode, OutputMode::Verbose) {
        let _ = writeln!(out, "{}", module.description);
        for (name, values) in &module.options {
            let _ = writeln!(out, "  option {name}: {}", values.join(", "));
        }
    }

    match &module.outcome {
        ModuleOutcome::Skipped { reason } => {
            let _ = writeln!(out, "  skipped: {reason}");
        }
        ModuleOutcome::Ran { result, degraded } => {
            if matches!(mode, OutputMode::Verbose) {
                for reason in degraded {
                    let _ = writeln!(out, "  degraded: {reason}");
                }
            }
            let _ = writeln!(out, "  {} entries found", result.len());
            if !matches!(mode, OutputMode::Short) {
                for entry in result.entries() {
                    let _ = writeln!(out, "  - {}", render_element(&entry.element, model));
                    if matches!(mode, OutputMode::Verbose | OutputMode::Default) {
                        for proof in &entry.proofs {
                            let _ = writeln!(out, "      {}{}", proof.prefix, render_element(&proof.element, model));
                        }
                    }
                }
            }
        }
    }
}

/// Render a single element for display, per §4.3's context/rule
/// renderers where one applies.
fn render_element(handle: &ElementHandle, model: &PolicyModel) -> String {
    match handle {
        ElementHandle::Type(id) => model.types.name_of(*id).unwrap_or("<unknown type>").to_string(),
        ElementHandle::Role(id) => model.roles.name_of(*id).unwrap_or("<unknown role>").to_string(),
        ElementHandle::User(id) => model.users.name_of(*id).unwrap_or("<unknown user>").to_string(),
        ElementHandle::Class(id) => model.classes.name_of(*id).unwrap_or("<unknown class>").to_string(),
        ElementHandle::Common(id) => model.commons.name_of(*id).unwrap_or("<unknown common>").to_string(),
        ElementHandle::Category(id) => model.mls.categories.name_of(*id).unwrap_or("<unknown category>").to_string(),
        ElementHandle::Bool(id) => model.booleans.name_of(*id).unwrap_or("<unknown boolean>").to_string(),
        ElementHandle::Level(level) => render_level(level, model),
        ElementHandle::Range(range) => render_mls_range(range, model),
        ElementHandle::AvRule(id) => model
            .av_rules
            .get(id.0 as usize)
            .map(|r| render_av_rule(r, model))
            .unwrap_or_default(),
        ElementHandle::TeRule(id) => model
            .te_rules
            .get(id.0 as usize)
            .map(|r| render_te_rule(r, model))
            .unwrap_or_default(),
        ElementHandle::RoleAllow(i) => model
            .role_allows
            .get(*i)
            .map(|r| render_role_allow(r, model))
            .unwrap_or_default(),
        ElementHandle::RoleTransition(i) => model
            .role_transitions
            .get(*i)
            .map(|r| render_role_transition(r, model))
            .unwrap_or_default(),
        ElementHandle::RangeTransition(i) => model
            .range_transitions
            .get(*i)
            .map(|r| render_range_transition(r, model))
            .unwrap_or_default(),
        ElementHandle::FcEntry(i) => format!("fc-entry #{i}"),
        ElementHandle::Literal(text) => text.clone(),
        // Every current `Empty` use carries its message in the proof's prefix and has
        // nothing further to say about the element itself (see e.g. `spurious_audit`,
        // `unused_attribs`). An unbound initial SID would need its own `ElementHandle`
        // variant to render as `<no context>` via `render_optional_context`.
        ElementHandle::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ModuleResult;

    #[test]
    fn min_sev_filters_low_severity_results() {
        let mut result = ModuleResult::new();
        result.entry(ElementHandle::Empty).add_proof(ElementHandle::Empty, "");
        let report = Report {
            modules: vec![ModuleReport {
                name: "attribs_wo_types".into(),
                severity: Severity::Low,
                summary: "s".into(),
                description: "d".into(),
                options: Vec::new(),
                output: OutputMode::Default,
                outcome: ModuleOutcome::Ran { result, degraded: Vec::new() },
            }],
        };
        assert!(report.has_results_at_or_above(Severity::Low));
        assert!(!report.has_results_at_or_above(Severity::High));
    }
}
