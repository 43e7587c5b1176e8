// SPDX-License-Identifier: Apache-2.0

//! The built-in module table (C11): the concrete checks shipped with the
//! toolkit, one module per source file, grouped by what they find.

mod common;

pub mod attribs_wo_types;
pub mod domain_and_file;
pub mod domains_wo_roles;
pub mod find_domains;
pub mod find_file_types;
pub mod find_net_domains;
pub mod find_netif_types;
pub mod find_node_types;
pub mod find_port_types;
pub mod imp_range_trans;
pub mod inc_mount;
pub mod roles_wo_allow;
pub mod roles_wo_types;
pub mod roles_wo_users;
pub mod spurious_audit;
pub mod types_wo_allow;
pub mod unused_attribs;
pub mod users_wo_roles;

pub use attribs_wo_types::AttribsWoTypes;
pub use domain_and_file::DomainAndFile;
pub use domains_wo_roles::DomainsWoRoles;
pub use find_domains::FindDomains;
pub use find_file_types::FindFileTypes;
pub use find_net_domains::FindNetDomains;
pub use find_netif_types::FindNetifTypes;
pub use find_node_types::FindNodeTypes;
pub use find_port_types::FindPortTypes;
pub use imp_range_trans::ImpRangeTrans;
pub use inc_mount::IncMount;
pub use roles_wo_allow::RolesWoAllow;
pub use roles_wo_types::RolesWoTypes;
pub use roles_wo_users::RolesWoUsers;
pub use spurious_audit::SpuriousAudit;
pub use types_wo_allow::TypesWoAllow;
pub use unused_attribs::UnusedAttribs;
pub use users_wo_roles::UsersWoRoles;

use secpol_checker::{Module, Runner};

/// Names of every built-in module, in the order `register_all` declares
/// them. A `sechecker` binary that needs module metadata without running
/// the whole set (`-l`, `-h MODULE`, `-m MODULE`) walks this table rather
/// than reaching into a `Runner`, which only exposes `run`.
pub const MODULE_NAMES: &[&str] = &[
    "attribs_wo_types",
    "roles_wo_types",
    "roles_wo_allow",
    "roles_wo_users",
    "users_wo_roles",
    "types_wo_allow",
    "unused_attribs",
    "find_domains",
    "find_file_types",
    "find_net_domains",
    "find_netif_types",
    "find_node_types",
    "find_port_types",
    "domain_and_file",
    "domains_wo_roles",
    "inc_mount",
    "spurious_audit",
    "imp_range_trans",
];

/// Construct a fresh instance of the named built-in module.
pub fn make_module(name: &str) -> Option<Box<dyn Module>> {
    Some(match name {
        "attribs_wo_types" => Box::new(AttribsWoTypes::new()),
        "roles_wo_types" => Box::new(RolesWoTypes::new()),
        "roles_wo_allow" => Box::new(RolesWoAllow::new()),
        "roles_wo_users" => Box::new(RolesWoUsers::new()),
        "users_wo_roles" => Box::new(UsersWoRoles::new()),
        "types_wo_allow" => Box::new(TypesWoAllow::new()),
        "unused_attribs" => Box::new(UnusedAttribs::new()),
        "find_domains" => Box::new(FindDomains::new()),
        "find_file_types" => Box::new(FindFileTypes::new()),
        "find_net_domains" => Box::new(FindNetDomains::new()),
        "find_netif_types" => Box::new(FindNetifTypes::new()),
        "find_node_types" => Box::new(FindNodeTypes::new()),
        "find_port_types" => Box::new(FindPortTypes::new()),
        "domain_and_file" => Box::new(DomainAndFile::new()),
        "domains_wo_roles" => Box::new(DomainsWoRoles::new()),
        "inc_mount" => Box::new(IncMount::new()),
        "spurious_audit" => Box::new(SpuriousAudit::new()),
        "imp_range_trans" => Box::new(ImpRangeTrans::new()),
        _ => return None,
    })
}

/// Register every built-in module with `runner`. Dependencies need not
/// precede their dependents here — the runner topologically sorts them
/// before running.
pub fn register_all(runner: &mut Runner) {
    for name in MODULE_NAMES {
        runner.add_module(make_module(name).expect("MODULE_NAMES and make_module must agree"));
    }
}
