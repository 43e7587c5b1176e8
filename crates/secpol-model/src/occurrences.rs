// SPDX-License-Identifier: Apache-2.0

//! Context-occurrence tables: `fs_use`, `portcon`, `netifcon`, `nodecon`,
//! `genfscon`, and the fixed-ordinal initial-SID table.

use crate::context::SecurityContext;

/// The kernel's well-known initial SIDs, in fixed ordinal order. Index 0
/// is the sentinel "undefined" and is never a real SID.
pub const INITIAL_SID_NAMES: &[&str] = &[
    "undefined",
    "kernel",
    "security",
    "unlabeled",
    "fs",
    "file",
    "file_labels",
    "init",
    "any_socket",
    "port",
    "netif",
    "netmsg",
    "node",
    "igmp_packet",
    "icmp_socket",
    "tcp_socket",
    "sysctl_modprobe",
    "sysctl",
    "sysctl_fs",
    "sysctl_kernel",
    "sysctl_net",
    "sysctl_net_unix",
    "sysctl_vm",
    "sysctl_dev",
    "kmod",
    "policy",
    "scmp_packet",
    "devnull",
];

#[derive(Debug, Clone)]
pub struct InitialSidEntry {
    pub name: String,
    pub context: Option<SecurityContext>,
}

/// Ordinal-indexed initial SID table; index 0 is unused.
#[derive(Default)]
pub struct InitialSidTable {
    entries: Vec<InitialSidEntry>,
}

impl InitialSidTable {
    pub fn new() -> Self {
        InitialSidTable::default()
    }

    /// Bind a context to the SID at `ordinal`, growing the table as
    /// needed. Names are filled in lazily by [`Self::add_initial_sid_names`].
    pub fn set_context(&mut self, ordinal: u32, context: SecurityContext) {
        self.ensure(ordinal);
        self.entries[ordinal as usize].context = Some(context);
    }

    /// Record an explicit name for `ordinal`, overriding what
    /// `add_initial_sid_names` would otherwise assign.
    pub fn set_name(&mut self, ordinal: u32, name: String) {
        self.ensure(ordinal);
        self.entries[ordinal as usize].name = name;
    }

    fn ensure(&mut self, ordinal: u32) {
        while self.entries.len() <= ordinal as usize {
            self.entries.push(InitialSidEntry {
                name: String::new(),
                context: None,
            });
        }
    }

    /// Assign the well-known kernel name to every entry that doesn't
    /// already have one. Ordinals past the known enumeration get the
    /// sentinel name `"undefined"`.
    pub fn add_initial_sid_names(&mut self) {
        for (ordinal, entry) in self.entries.iter_mut().enumerate() {
            if entry.name.is_empty() {
                entry.name = INITIAL_SID_NAMES
                    .get(ordinal)
                    .copied()
                    .unwrap_or("undefined")
                    .to_string();
            }
        }
    }

    pub fn get(&self, ordinal: u32) -> Option<&InitialSidEntry> {
        self.entries.get(ordinal as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&InitialSidEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InitialSidEntry> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsUseKind {
    Xattr,
    Task,
    Trans,
}

#[derive(Debug, Clone)]
pub struct FsUseEntry {
    pub kind: FsUseKind,
    pub filesystem: String,
    pub context: SecurityContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortProtocol {
    Tcp,
    Udp,
    Dccp,
    Sctp,
}

#[derive(Debug, Clone)]
pub struct PortconEntry {
    pub protocol: PortProtocol,
    pub low: u16,
    pub high: u16,
    pub context: SecurityContext,
}

#[derive(Debug, Clone)]
pub struct NetifconEntry {
    pub interface: String,
    pub if_context: SecurityContext,
    pub msg_context: SecurityContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone)]
pub struct NodeconEntry {
    pub protocol: IpProtocol,
    pub address: std::net::IpAddr,
    pub mask: std::net::IpAddr,
    pub context: SecurityContext,
}

#[derive(Debug, Clone)]
pub struct GenfsconEntry {
    pub filesystem: String,
    pub path: String,
    /// `-d`, `-c`, `-b`, etc., from the `file_contexts` type-spec
    /// alphabet; `None` means any object type.
    pub object_type: Option<char>,
    pub context: SecurityContext,
}

/// All context-occurrence tables for one policy.
#[derive(Default)]
pub struct OccurrenceTables {
    pub fs_use: Vec<FsUseEntry>,
    pub portcon: Vec<PortconEntry>,
    pub netifcon: Vec<NetifconEntry>,
    pub nodecon: Vec<NodeconEntry>,
    pub genfscon: Vec<GenfsconEntry>,
    pub initial_sids: InitialSidTable,
}

impl OccurrenceTables {
    pub fn new() -> Self {
        OccurrenceTables::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RoleId, SecurityContext, TypeId, UserId};

    fn ctx() -> SecurityContext {
        SecurityContext::new(UserId::new(1), RoleId::new(1), TypeId::new(1))
    }

    #[test]
    fn unnamed_sids_get_well_known_names() {
        let mut sids = InitialSidTable::new();
        sids.set_context(1, ctx());
        sids.set_context(27, ctx());
        sids.add_initial_sid_names();
        assert_eq!(sids.get(1).unwrap().name, "kernel");
        assert_eq!(sids.get(27).unwrap().name, "devnull");
    }

    #[test]
    fn ordinal_past_known_range_is_undefined() {
        let mut sids = InitialSidTable::new();
        sids.set_context(40, ctx());
        sids.add_initial_sid_names();
        assert_eq!(sids.get(40).unwrap().name, "undefined");
    }

    #[test]
    fn name_already_set_is_preserved() {
        let mut sids = InitialSidTable::new();
        sids.set_context(1, ctx());
        sids.entries.get_mut(1).unwrap().name = "custom_sid".to_string();
        sids.add_initial_sid_names();
        assert_eq!(sids.get(1).unwrap().name, "custom_sid");
    }
}
