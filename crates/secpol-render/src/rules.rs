// SPDX-License-Identifier: Apache-2.0

//! Canonical rendering for AV/TE rules and the role/range statements.
//!
//! Mirrors the kernel policy source grammar closely enough to be
//! recognizable to anyone who has read a `.te` file: brace-wrapped
//! permission lists, `~` complement prefix, `*` wildcard, and an optional
//! `[   N] ` line-number gutter when the policy image carries line
//! numbers.

use secpol_model::model::PolicyModel;
use secpol_model::rules::{AvRule, AvRuleKind, Component, RoleAllow, RoleTransition, RangeTransition, TeRule, TeRuleKind, UserStmt};

use crate::context::render_mls_range;

fn render_component(component: &Component, model: &PolicyModel) -> String {
    if component.is_self {
        return "self".to_string();
    }
    if component.star {
        return if component.complement {
            "~*".to_string()
        } else {
            "*".to_string()
        };
    }
    let mut names: Vec<&str> = component
        .ids
        .iter()
        .filter_map(|id| model.types.name_of(secpol_model::types::TypeId::new(id)))
        .collect();
    names.sort_unstable();
    let prefix = if component.complement { "~" } else { "" };
    match names.len() {
        0 => format!("{prefix}{{ }}"),
        1 => format!("{prefix}{}", names[0]),
        _ => format!("{prefix}{{ {} }}", names.join(" ")),
    }
}

fn render_perms(perms: &[String]) -> String {
    match perms.len() {
        0 => "{ }".to_string(),
        1 => perms[0].clone(),
        _ => format!("{{ {} }}", perms.join(" ")),
    }
}

fn line_prefix(line: Option<u32>) -> String {
    match line {
        Some(n) => format!("[{n:>7}] "),
        None => String::new(),
    }
}

fn av_rule_keyword(kind: AvRuleKind) -> &'static str {
    match kind {
        AvRuleKind::Allow => "allow",
        AvRuleKind::AuditAllow => "auditallow",
        AvRuleKind::DontAudit => "dontaudit",
        AvRuleKind::Neverallow => "neverallow",
    }
}

pub fn render_av_rule(rule: &AvRule, model: &PolicyModel) -> String {
    let class = model.classes.name_of(rule.class).unwrap_or("<unknown class>");
    format!(
        "{}{} {} {} : {} {};",
        line_prefix(rule.line),
        av_rule_keyword(rule.kind),
        render_component(&rule.source, model),
        render_component(&rule.target, model),
        class,
        render_perms(&rule.perms)
    )
}

fn te_rule_keyword(kind: TeRuleKind) -> &'static str {
    match kind {
        TeRuleKind::TypeTransition => "type_transition",
        TeRuleKind::TypeChange => "type_change",
        TeRuleKind::TypeMember => "type_member",
    }
}

pub fn render_te_rule(rule: &TeRule, model: &PolicyModel) -> String {
    let class = model.classes.name_of(rule.class).unwrap_or("<unknown class>");
    let default = model.types.name_of(rule.default).unwrap_or("<unknown type>");
    let object_name = match &rule.object_name {
        Some(name) => format!(" \"{name}\""),
        None => String::new(),
    };
    format!(
        "{}{} {} {} : {} {}{};",
        line_prefix(rule.line),
        te_rule_keyword(rule.kind),
        render_component(&rule.source, model),
        render_component(&rule.target, model),
        class,
        default,
        object_name
    )
}

pub fn render_role_allow(rule: &RoleAllow, model: &PolicyModel) -> String {
    let from = model.roles.name_of(rule.from).unwrap_or("<unknown role>");
    let to = model.roles.name_of(rule.to).unwrap_or("<unknown role>");
    format!("allow {from} {to};")
}

pub fn render_role_transition(rule: &RoleTransition, model: &PolicyModel) -> String {
    let mut sources: Vec<&str> = rule
        .source_roles
        .iter()
        .filter_map(|id| model.roles.name_of(secpol_core::SymbolId::new(id)))
        .collect();
    sources.sort_unstable();
    let source = match sources.len() {
        1 => sources[0].to_string(),
        _ => format!("{{ {} }}", sources.join(" ")),
    };
    let class_part = match rule.class {
        Some(c) => format!(" : {}", model.classes.name_of(c).unwrap_or("<unknown class>")),
        None => String::new(),
    };
    let default_role = model.roles.name_of(rule.default_role).unwrap_or("<unknown role>");
    format!(
        "role_transition {} {}{} {};",
        source,
        render_component(&rule.target, model),
        class_part,
        default_role
    )
}

pub fn render_range_transition(rule: &RangeTransition, model: &PolicyModel) -> String {
    let class_part = match rule.class {
        Some(c) => format!(" : {}", model.classes.name_of(c).unwrap_or("<unknown class>")),
        None => String::new(),
    };
    format!(
        "range_transition {} {}{} {};",
        render_component(&rule.source, model),
        render_component(&rule.target, model),
        class_part,
        render_mls_range(&rule.range, model)
    )
}

pub fn render_user_stmt(user: &UserStmt, model: &PolicyModel) -> String {
    let name = model.users.name_of(user.user).unwrap_or("<unknown user>");
    let mut roles: Vec<&str> = user
        .roles
        .iter()
        .filter_map(|id| model.roles.name_of(secpol_core::SymbolId::new(id)))
        .collect();
    roles.sort_unstable();
    let role_part = match roles.len() {
        1 => roles[0].to_string(),
        _ => format!("{{ {} }}", roles.join(" ")),
    };
    let range_part = match &user.range {
        Some(range) => format!(" range {}", render_mls_range(range, model)),
        None => String::new(),
    };
    format!("user {name} roles {role_part}{range_part};")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::*;

    fn sample_model() -> PolicyModel {
        let raw = RawPolicyImage {
            types: vec![
                RawType { name: "passwd_t".into(), is_attribute: false },
                RawType { name: "shadow_t".into(), is_attribute: false },
            ],
            attribute_membership: vec![
                RawAttributeMembership { attribute: "file_type".into(), member: "passwd_t".into() },
                RawAttributeMembership { attribute: "file_type".into(), member: "shadow_t".into() },
            ],
            classes: vec![RawClass { name: "file".into(), common: None, perms: vec!["read".into(), "write".into()] }],
            av_rules: vec![RawAvRule {
                kind: RawAvRuleKind::Allow,
                source: RawComponent { names: vec!["passwd_t".into()], ..Default::default() },
                target: RawComponent { names: vec!["file_type".into()], ..Default::default() },
                class: "file".into(),
                perms: vec!["read".into(), "write".into()],
                cond: None,
                line: Some(12),
            }],
            ..Default::default()
        };
        PolicyModel::from_raw(raw).unwrap()
    }

    #[test]
    fn av_rule_renders_with_line_and_brace_perms() {
        let model = sample_model();
        let rendered = render_av_rule(&model.av_rules[0], &model);
        assert_eq!(rendered, "[     12] allow passwd_t file_type : file { read write };");
    }

    #[test]
    fn star_component_renders_as_asterisk() {
        let model = sample_model();
        assert_eq!(render_component(&Component::star(), &model), "*");
        assert_eq!(render_component(&Component::star().negated(), &model), "~*");
    }
}
