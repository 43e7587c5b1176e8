// SPDX-License-Identifier: Apache-2.0

//! Thin CLI around the checker framework (C10) and its built-in modules
//! (C11), mirroring the original `sechecker` tool's option surface:
//! run a profile or a single module against a policy and render a report.
//!
//! Building a `secpol_model::raw::RawPolicyImage` from an on-disk policy
//! image is an external loader's job (see `secpol_model::raw` and
//! SPEC_FULL §6); this binary exercises the rest of the pipeline —
//! profile/module resolution, requirement checking, running, and
//! rendering — against an in-memory `PolicyModel`.

mod cli;

use clap::Parser;
use cli::Args;
use secpol_checker::{parse_profile, Module, OutputMode, Runner, Severity};
use secpol_common::Error;
use secpol_fcontext::FcList;
use secpol_model::model::PolicyModel;
use std::collections::HashSet;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    secpol_common::logging::init();
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sechecker: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Error> {
    if args.version {
        println!("sechecker {VERSION}");
        println!("Copyright (C) the project contributors. Licensed Apache-2.0.");
        return Ok(ExitCode::SUCCESS);
    }

    if args.module.is_some() && args.min_sev.is_some() {
        eprintln!("Cannot specify minimum severity and single module.");
        return Ok(ExitCode::from(2));
    }
    if [args.quiet, args.short, args.verbose].iter().filter(|b| **b).count() > 1 {
        eprintln!("Multiple output formats requested.");
        return Ok(ExitCode::from(2));
    }

    if let Some(target) = &args.help {
        return Ok(print_help(target));
    }

    if args.list {
        print_list();
        return Ok(ExitCode::SUCCESS);
    }

    if args.module.is_none() && args.profile.is_none() {
        eprintln!("No profile or module specified.");
        return Ok(ExitCode::from(2));
    }

    if !args.policy.is_empty() {
        log::warn!(
            "ignoring policy path argument(s) {:?}: this build runs checks against an empty \
             in-memory policy model, since constructing one from an on-disk image is an \
             external loader's job",
            args.policy
        );
    }
    let model = PolicyModel::new();

    let fclist = match &args.fcfile {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| Error::input(format!("reading fcfile '{path}': {e}")))?;
            let mut list = FcList::new();
            list.load_document(&text, Some(&model))?;
            Some(list)
        }
        None => None,
    };

    let mut runner = Runner::new();
    if let Some(name) = &args.module {
        load_module_and_deps(&mut runner, name)?;
    } else if let Some(path) = &args.profile {
        load_profile(&mut runner, path)?;
    }

    let report = runner.run(&model, fclist.as_ref())?;

    let min_sev = match &args.min_sev {
        Some(s) => Severity::parse_min_sev(s).ok_or_else(|| Error::input(format!("unknown severity '{s}'")))?,
        None => Severity::Low,
    };

    print!("{}", report.render(&model, min_sev, output_mode_override(&args)));

    if report.has_results_at_or_above(min_sev) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn output_mode_override(args: &Args) -> Option<OutputMode> {
    if args.quiet {
        Some(OutputMode::Quiet)
    } else if args.short {
        Some(OutputMode::Short)
    } else if args.verbose {
        Some(OutputMode::Verbose)
    } else {
        None
    }
}

/// Add `name` and the transitive closure of its `dependencies()` to `runner`.
fn load_module_and_deps(runner: &mut Runner, name: &str) -> Result<(), Error> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack = vec![name.to_string()];
    while let Some(next) = stack.pop() {
        if !seen.insert(next.clone()) {
            continue;
        }
        let module = secpol_checks::make_module(&next).ok_or_else(|| Error::input(format!("unknown module '{next}'")))?;
        stack.extend(module.dependencies().iter().cloned());
        runner.add_module(module);
    }
    Ok(())
}

/// Load every module a profile names, applying its option overrides, plus
/// the transitive closure of each named module's `dependencies()`.
fn load_profile(runner: &mut Runner, path: &str) -> Result<(), Error> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::input(format!("reading profile '{path}': {e}")))?;
    let profile = parse_profile(&text)?;

    let mut seen: HashSet<String> = HashSet::new();
    for pm in &profile.modules {
        let mut stack = vec![pm.name.clone()];
        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            let mut module = secpol_checks::make_module(&next).ok_or_else(|| Error::input(format!("unknown module '{next}'")))?;
            stack.extend(module.dependencies().iter().cloned());
            if next == pm.name {
                for opt in &pm.options {
                    module.set_option(&opt.name, opt.items.clone(), true)?;
                }
            }
            runner.add_module(module);
        }
    }
    Ok(())
}

fn print_list() {
    println!("Available modules:");
    for name in secpol_checks::MODULE_NAMES {
        let module = secpol_checks::make_module(name).expect("MODULE_NAMES entries must construct");
        println!("  {:<20} [{}] {}", module.name(), module.severity().as_str(), module.summary());
    }
}

fn print_help(target: &str) -> ExitCode {
    if target.is_empty() {
        println!("sechecker [-p PROFILE | -m MODULE] [-q|-s|-v] [--min-sev SEV] [--fcfile FILE] [-l] [-h[=MODULE]] [-V] [POLICY...]");
        println!();
        println!("Run checker modules against a loaded policy and report the results.");
        println!("Use -l to list available modules, or -h=MODULE for help on one module.");
        return ExitCode::SUCCESS;
    }
    match secpol_checks::make_module(target) {
        Some(module) => {
            println!("{} [{}]", module.name(), module.severity().as_str());
            println!("{}", module.summary());
            println!();
            println!("{}", module.description());
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("sechecker: unknown module '{target}'");
            ExitCode::from(2)
        }
    }
}
