// SPDX-License-Identifier: Apache-2.0

//! `RawPolicyImage`: a concrete stand-in for "a handle to an already
//! loaded binary policy" supplied by an external loader. Parsing the
//! kernel's binary policy format is out of scope here; tests and callers
//! hand-construct a `RawPolicyImage` instead of reading real policy
//! bytes, and [`crate::model::PolicyModel::from_raw`] is the single seam
//! that consumes one.
//!
//! Every field here uses plain names (`String`) rather than interned
//! ids, since a raw image predates interning — building the dense symbol
//! tables out of these names is exactly what `PolicyModel::from_raw`
//! does.

use bitflags::bitflags;

bitflags! {
    /// Which optional policy capabilities the loaded image reports, per
    /// `secpol_common::Capability`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PolicyCapabilities: u32 {
        const ATTRIBUTE_NAMES  = 1 << 0;
        const SYNTACTIC_RULES  = 1 << 1;
        const LINE_NUMBERS     = 1 << 2;
        const CONDITIONALS     = 1 << 3;
        const MODULES          = 1 << 4;
        const NEVERALLOW       = 1 << 5;
        const SELINUX_SYSTEM   = 1 << 6;
        const FC_LIST          = 1 << 7;
        const DEFAULT_CONTEXTS = 1 << 8;
        const MLS              = 1 << 9;
    }
}

#[derive(Debug, Clone)]
pub struct RawType {
    pub name: String,
    pub is_attribute: bool,
}

#[derive(Debug, Clone)]
pub struct RawAttributeMembership {
    pub attribute: String,
    pub member: String,
}

#[derive(Debug, Clone)]
pub struct RawCommon {
    pub name: String,
    pub perms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RawClass {
    pub name: String,
    pub common: Option<String>,
    pub perms: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawComponent {
    pub names: Vec<String>,
    pub complement: bool,
    pub star: bool,
    pub is_self: bool,
}

#[derive(Debug, Clone)]
pub struct RawLevel {
    pub sensitivity: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RawRange {
    pub low: RawLevel,
    pub high: RawLevel,
}

#[derive(Debug, Clone)]
pub struct RawContext {
    pub user: String,
    pub role: String,
    pub ty: String,
    pub range: Option<RawRange>,
}

#[derive(Debug, Clone)]
pub enum RawCondExpr {
    Bool(String),
    Not(Box<RawCondExpr>),
    And(Box<RawCondExpr>, Box<RawCondExpr>),
    Or(Box<RawCondExpr>, Box<RawCondExpr>),
    Xor(Box<RawCondExpr>, Box<RawCondExpr>),
    Eq(Box<RawCondExpr>, Box<RawCondExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawRuleRef {
    Av(usize),
    Te(usize),
}

#[derive(Debug, Clone)]
pub struct RawCondBlock {
    pub expr: RawCondExpr,
    pub true_rules: Vec<RawRuleRef>,
    pub false_rules: Vec<RawRuleRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawAvRuleKind {
    Allow,
    AuditAllow,
    DontAudit,
    Neverallow,
}

#[derive(Debug, Clone)]
pub struct RawAvRule {
    pub kind: RawAvRuleKind,
    pub source: RawComponent,
    pub target: RawComponent,
    pub class: String,
    pub perms: Vec<String>,
    pub cond: Option<usize>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTeRuleKind {
    TypeTransition,
    TypeChange,
    TypeMember,
}

#[derive(Debug, Clone)]
pub struct RawTeRule {
    pub kind: RawTeRuleKind,
    pub source: RawComponent,
    pub target: RawComponent,
    pub class: String,
    pub default: String,
    pub object_name: Option<String>,
    pub cond: Option<usize>,
    pub line: Option<u32>,
}

/// A `role R types {...}` declaration: which types a role may form a
/// valid context with.
#[derive(Debug, Clone)]
pub struct RawRoleType {
    pub role: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RawRoleAllow {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct RawRoleTransition {
    pub source_roles: Vec<String>,
    pub target: RawComponent,
    pub class: Option<String>,
    pub default_role: String,
}

#[derive(Debug, Clone)]
pub struct RawRangeTransition {
    pub source: RawComponent,
    pub target: RawComponent,
    pub class: Option<String>,
    pub range: RawRange,
}

#[derive(Debug, Clone)]
pub struct RawUser {
    pub name: String,
    pub roles: Vec<String>,
    pub range: Option<RawRange>,
    pub default_level: Option<RawLevel>,
}

#[derive(Debug, Clone)]
pub struct RawInitialSid {
    pub ordinal: u32,
    pub name: Option<String>,
    pub context: Option<RawContext>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFsUseKind {
    Xattr,
    Task,
    Trans,
}

#[derive(Debug, Clone)]
pub struct RawFsUse {
    pub kind: RawFsUseKind,
    pub filesystem: String,
    pub context: RawContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPortProtocol {
    Tcp,
    Udp,
    Dccp,
    Sctp,
}

#[derive(Debug, Clone)]
pub struct RawPortcon {
    pub protocol: RawPortProtocol,
    pub low: u16,
    pub high: u16,
    pub context: RawContext,
}

#[derive(Debug, Clone)]
pub struct RawNetifcon {
    pub interface: String,
    pub if_context: RawContext,
    pub msg_context: RawContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawIpProtocol {
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone)]
pub struct RawNodecon {
    pub protocol: RawIpProtocol,
    pub address: std::net::IpAddr,
    pub mask: std::net::IpAddr,
    pub context: RawContext,
}

#[derive(Debug, Clone)]
pub struct RawGenfscon {
    pub filesystem: String,
    pub path: String,
    pub object_type: Option<char>,
    pub context: RawContext,
}

/// The full raw image, the unit `PolicyModel::from_raw` consumes.
#[derive(Debug, Clone, Default)]
pub struct RawPolicyImage {
    pub mls_enabled: bool,
    pub capabilities: PolicyCapabilities,
    pub types: Vec<RawType>,
    pub attribute_membership: Vec<RawAttributeMembership>,
    pub roles: Vec<String>,
    pub users: Vec<RawUser>,
    pub commons: Vec<RawCommon>,
    pub classes: Vec<RawClass>,
    pub booleans: Vec<(String, bool)>,
    pub sensitivities: Vec<String>,
    pub categories: Vec<String>,
    pub av_rules: Vec<RawAvRule>,
    pub te_rules: Vec<RawTeRule>,
    pub role_types: Vec<RawRoleType>,
    pub role_allows: Vec<RawRoleAllow>,
    pub role_transitions: Vec<RawRoleTransition>,
    pub range_transitions: Vec<RawRangeTransition>,
    pub cond_blocks: Vec<RawCondBlock>,
    pub initial_sids: Vec<RawInitialSid>,
    pub fs_use: Vec<RawFsUse>,
    pub portcon: Vec<RawPortcon>,
    pub netifcon: Vec<RawNetifcon>,
    pub nodecon: Vec<RawNodecon>,
    pub genfscon: Vec<RawGenfscon>,
}

impl Default for PolicyCapabilities {
    fn default() -> Self {
        PolicyCapabilities::empty()
    }
}
