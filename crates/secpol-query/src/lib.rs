// SPDX-License-Identifier: Apache-2.0

//! The query engine (C7): a builder/runner per query kind, sharing a
//! common name-matching selector and MLS range filter.

pub mod classes;
pub mod initialsid;
pub mod mlsfilter;
pub mod occurrence;
pub mod rangetrans;
pub mod roles;
pub mod rulequery;
pub mod selector;
pub mod types;
pub mod users;

pub use classes::ClassQuery;
pub use initialsid::InitialSidQuery;
pub use mlsfilter::MlsFilter;
pub use rangetrans::RangeTransitionQuery;
pub use roles::RoleQuery;
pub use rulequery::{AvRuleKindMask, AvRuleQuery, TeRuleKindMask, TeRuleQuery};
pub use selector::{NameMatch, Selector};
pub use types::TypeQuery;
pub use users::UserQuery;
