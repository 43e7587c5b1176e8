// SPDX-License-Identifier: Apache-2.0

//! In-memory SELinux-style policy model: symbol tables, rules,
//! attribute expansion, the syntactic/semantic back-index, and the
//! context-occurrence tables that sit underneath the query engine and
//! checker framework.

pub mod backindex;
pub mod classes;
pub mod cond;
pub mod context;
pub mod mls;
pub mod model;
pub mod occurrences;
pub mod raw;
pub mod rules;
pub mod types;

pub use model::PolicyModel;
pub use raw::{PolicyCapabilities, RawPolicyImage};
