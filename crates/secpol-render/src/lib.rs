// SPDX-License-Identifier: Apache-2.0

//! Canonical textual rendering (C5/C6): security contexts, MLS ranges,
//! and policy rules, in the same form a human reading `.te`/`.fc` source
//! would recognize.

pub mod context;
pub mod rules;

pub use context::{render_level, render_mls_range, render_optional_context, render_security_context, NO_CONTEXT};
pub use rules::{render_av_rule, render_role_allow, render_role_transition, render_range_transition, render_te_rule, render_user_stmt};
