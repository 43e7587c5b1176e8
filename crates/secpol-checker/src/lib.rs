// SPDX-License-Identifier: Apache-2.0

//! The checker framework (C10): requirements, options, modules,
//! profiles, results, and the runner that orchestrates them into a
//! report.

pub mod module;
pub mod option;
pub mod profile;
pub mod report;
pub mod requirement;
pub mod result;
pub mod runner;
pub mod severity;

pub use module::{DepResults, Module};
pub use option::ModuleOption;
pub use profile::{parse_profile, OutputMode, Profile, ProfileModule, ProfileOption, FRAMEWORK_VERSION};
pub use report::{ModuleOutcome, ModuleReport, Report};
pub use requirement::Requirement;
pub use result::{ModuleResult, Proof, ResultEntry};
pub use runner::Runner;
pub use severity::Severity;
