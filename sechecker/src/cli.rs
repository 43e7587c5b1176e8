// SPDX-License-Identifier: Apache-2.0

//! Command-line surface for the checker CLI, grounded in `hipcheck::cli`'s
//! derive style: help and version are disabled on clap's built-in machinery
//! and re-implemented by hand so `-h`'s optional `MODULE` argument and the
//! copyright-style `-V` banner match the original `sechecker` tool's
//! `getopt_long` behavior rather than clap's defaults.

/// Drive one or more checker modules over a loaded policy and render a
/// report.
#[derive(Debug, clap::Parser)]
#[command(name = "sechecker", about, disable_help_flag = true, disable_version_flag = true, long_about = None)]
pub struct Args {
    /// Print general help, or help for MODULE if given.
    #[arg(short = 'h', long = "help", num_args = 0..=1, default_missing_value = "")]
    pub help: Option<String>,

    /// Print version information.
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// List available profiles and modules.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Load and run the named profile.
    #[arg(short = 'p', long = "profile", value_name = "FILE")]
    pub profile: Option<String>,

    /// Run a single module instead of a profile.
    #[arg(short = 'm', long = "module", value_name = "NAME")]
    pub module: Option<String>,

    /// Load a file_contexts list for modules that need one.
    #[arg(long = "fcfile", value_name = "FILE")]
    pub fcfile: Option<String>,

    /// Suppress all but the summary line per module.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Print entries without their proofs.
    #[arg(short = 's', long = "short")]
    pub short: bool,

    /// Print descriptions, options, and degraded recommendations too.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only report results at or above this severity (low|med|high).
    #[arg(long = "min-sev", value_name = "SEV")]
    pub min_sev: Option<String>,

    /// Monolithic policy path, or a base policy followed by module files.
    ///
    /// Accepted for surface compatibility with the wider checker CLI this
    /// binary's flags mirror; building a policy image from these paths is
    /// the external loader's job (see `secpol_model::raw::RawPolicyImage`),
    /// so this build runs against an empty in-memory policy when no
    /// in-process loader is wired in.
    pub policy: Vec<String>,
}
