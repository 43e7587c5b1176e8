// SPDX-License-Identifier: Apache-2.0

//! Run orchestration: resolve dependencies, verify requirements, run
//! each module once in dependency order, and assemble a report.

use crate::module::{DepResults, Module};
use crate::report::{ModuleOutcome, ModuleReport, Report};
use secpol_common::{Error, Result};
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use std::collections::HashMap;

pub struct Runner {
    modules: Vec<Box<dyn Module>>,
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Runner { modules: Vec::new() }
    }

    pub fn add_module(&mut self, module: Box<dyn Module>) {
        self.modules.push(module);
    }

    /// Topologically sort the registered modules (dependencies before
    /// dependents), verify requirements, run each exactly once, and
    /// assemble the resulting report.
    pub fn run(&mut self, model: &PolicyModel, fclist: Option<&FcList>) -> Result<Report> {
        let order = self.dependency_order()?;

        let mut ran: HashMap<String, crate::result::ModuleResult> = HashMap::new();
        let mut reports = Vec::new();

        for idx in order {
            let m = &mut self.modules[idx];
            let name = m.name().to_string();

            let unmet: Vec<&str> = m.requirements().iter().filter(|r| !r.check(model, fclist)).map(|r| r.description()).collect();
            if !unmet.is_empty() {
                let reason = unmet.join("; ");
                log::warn!("skipping module '{name}': unmet requirement(s): {reason}");
                reports.push(ModuleReport {
                    name,
                    severity: m.severity(),
                    summary: m.summary().to_string(),
                    description: m.description().to_string(),
                    options: dump_options(m.as_ref()),
                    output: crate::profile::OutputMode::Default,
                    outcome: ModuleOutcome::Skipped { reason },
                });
                continue;
            }

            let degraded: Vec<&'static str> = m
                .recommendations()
                .iter()
                .filter(|r| !r.check(model, fclist))
                .map(|r| r.description())
                .collect();

            let deps: DepResults = m
                .dependencies()
                .iter()
                .filter_map(|d| ran.get(d.as_str()).map(|r| (d.as_str(), r)))
                .collect();

            log::debug!("running module '{name}'");
            let result = m
                .run(model, fclist, &deps)
                .map_err(|e| Error::checker_runtime(name.clone(), e))?;
            log::debug!("finished module '{name}'");

            reports.push(ModuleReport {
                name: name.clone(),
                severity: m.severity(),
                summary: m.summary().to_string(),
                description: m.description().to_string(),
                options: dump_options(m.as_ref()),
                output: crate::profile::OutputMode::Default,
                outcome: ModuleOutcome::Ran { result: result.clone(), degraded },
            });
            ran.insert(name, result);
        }

        Ok(Report { modules: reports })
    }

    fn dependency_order(&self) -> Result<Vec<usize>> {
        let mut graph = DiGraph::<usize, ()>::new();
        let nodes: Vec<_> = (0..self.modules.len()).map(|i| graph.add_node(i)).collect();
        let index_of: HashMap<&str, usize> = self
            .modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name(), i))
            .collect();

        for (i, m) in self.modules.iter().enumerate() {
            for dep in m.dependencies() {
                let dep_idx = *index_of
                    .get(dep.as_str())
                    .ok_or_else(|| Error::input(format!("module '{}' depends on unknown module '{dep}'", m.name())))?;
                // edge dependency -> dependent, so the dependency sorts first.
                graph.add_edge(nodes[dep_idx], nodes[i], ());
            }
        }

        // A dependency cycle is a configuration error, surfaced the same
        // way a module failure is: a `CheckerRuntime` error naming the
        // offending point in the graph, since no single module "owns" it.
        toposort(&graph, None).map(|order| order.into_iter().map(|n| graph[n]).collect()).map_err(|cycle| {
            let at = self.modules.get(graph[cycle.node_id()]).map(|m| m.name()).unwrap_or("<unknown>");
            Error::checker_runtime("<dependency graph>", Error::input(format!("dependency cycle detected at module '{at}'")))
        })
    }
}

fn dump_options(m: &dyn Module) -> Vec<(String, Vec<String>)> {
    let mut opts: Vec<(String, Vec<String>)> = m.options().iter().map(|(k, v)| (k.clone(), v.values.clone())).collect();
    opts.sort_by(|a, b| a.0.cmp(&b.0));
    opts
}
