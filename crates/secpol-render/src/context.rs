// SPDX-License-Identifier: Apache-2.0

//! Rendering for security contexts and MLS ranges.
//!
//! Category sets collapse contiguous runs into `low.high` form the same
//! way `libapol`'s range renderer does; `umrs-selinux`'s `CategorySet`
//! prints every category individually and doesn't do this, which is why
//! the collapsing lives here rather than being reused from there.

use secpol_core::Bitset;
use secpol_model::context::SecurityContext;
use secpol_model::mls::{Level, MlsRange};
use secpol_model::model::PolicyModel;

pub const NO_CONTEXT: &str = "<no context>";

pub fn render_security_context(ctx: &SecurityContext, model: &PolicyModel) -> String {
    let user = model.users.name_of(ctx.user).unwrap_or("<unknown user>");
    let role = model.roles.name_of(ctx.role).unwrap_or("<unknown role>");
    let ty = model.types.name_of(ctx.ty).unwrap_or("<unknown type>");
    match &ctx.range {
        Some(range) => format!("{user}:{role}:{ty}:{}", render_mls_range(range, model)),
        None => format!("{user}:{role}:{ty}"),
    }
}

pub fn render_optional_context(ctx: Option<&SecurityContext>, model: &PolicyModel) -> String {
    match ctx {
        Some(ctx) => render_security_context(ctx, model),
        None => NO_CONTEXT.to_string(),
    }
}

pub fn render_mls_range(range: &MlsRange, model: &PolicyModel) -> String {
    if range.low == range.high {
        render_level(&range.low, model)
    } else {
        format!(
            "{} - {}",
            render_level(&range.low, model),
            render_level(&range.high, model)
        )
    }
}

pub fn render_level(level: &Level, model: &PolicyModel) -> String {
    let sensitivity = model
        .mls
        .sensitivities
        .name_of(level.sensitivity)
        .unwrap_or("<unknown sensitivity>");
    if level.categories.is_empty() {
        sensitivity.to_string()
    } else {
        format!("{sensitivity}:{}", render_category_set(&level.categories, model))
    }
}

/// Render a category set, collapsing maximal contiguous runs of
/// declaration-order ids into `low.high` and joining distinct runs with
/// commas, e.g. `c0.c4,c7,c9.c12`.
pub fn render_category_set(categories: &Bitset, model: &PolicyModel) -> String {
    let ids: Vec<u32> = categories.iter().collect();
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for id in ids {
        match runs.last_mut() {
            Some((_, hi)) if *hi + 1 == id => *hi = id,
            _ => runs.push((id, id)),
        }
    }
    runs.into_iter()
        .map(|(lo, hi)| {
            let lo_name = model
                .mls
                .categories
                .name_of(secpol_core::SymbolId::new(lo))
                .unwrap_or("<unknown category>");
            if lo == hi {
                lo_name.to_string()
            } else {
                let hi_name = model
                    .mls
                    .categories
                    .name_of(secpol_core::SymbolId::new(hi))
                    .unwrap_or("<unknown category>");
                format!("{lo_name}.{hi_name}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secpol_model::raw::*;

    fn model_with_context() -> (PolicyModel, SecurityContext) {
        let raw = RawPolicyImage {
            mls_enabled: true,
            types: vec![RawType {
                name: "kernel_t".into(),
                is_attribute: false,
            }],
            roles: vec!["system_r".into()],
            users: vec![RawUser {
                name: "system_u".into(),
                roles: vec!["system_r".into()],
                range: None,
                default_level: None,
            }],
            sensitivities: vec!["s0".into(), "s1".into()],
            categories: (0..6).map(|i| format!("c{i}")).collect(),
            ..Default::default()
        };
        let model = PolicyModel::from_raw(raw).unwrap();
        let user = model.users.lookup("system_u").unwrap();
        let role = model.roles.lookup("system_r").unwrap();
        let ty = model.types.lookup("kernel_t").unwrap();
        let ctx = SecurityContext::new(user, role, ty);
        (model, ctx)
    }

    #[test]
    fn non_mls_context_renders_three_fields() {
        let (model, ctx) = model_with_context();
        assert_eq!(render_security_context(&ctx, &model), "system_u:system_r:kernel_t");
    }

    #[test]
    fn unbound_context_renders_no_context() {
        let (model, _) = model_with_context();
        assert_eq!(render_optional_context(None, &model), "<no context>");
    }

    #[test]
    fn contiguous_categories_collapse() {
        let (model, _) = model_with_context();
        let s0 = model.mls.sensitivities.lookup("s0").unwrap();
        let mut cats = Bitset::with_capacity(model.mls.categories.count());
        for name in ["c0", "c1", "c2", "c4"] {
            let id = model.mls.categories.lookup(name).unwrap();
            cats.insert(id.raw());
        }
        let level = Level::new(s0, cats);
        assert_eq!(render_level(&level, &model), "s0:c0.c2,c4");
    }

    #[test]
    fn single_level_range_renders_without_dash() {
        let (model, _) = model_with_context();
        let s0 = model.mls.sensitivities.lookup("s0").unwrap();
        let level = Level::new(s0, Bitset::with_capacity(model.mls.categories.count()));
        let range = MlsRange::single(level);
        assert_eq!(render_mls_range(&range, &model), "s0");
    }
}
