// SPDX-License-Identifier: Apache-2.0

//! The poly-query (C8): a higher-level matcher used by the checker
//! modules. Each [`query::PolySearch`] is parameterized over an
//! [`element::ElementKind`] and runs an ordered list of [`test::Test`]s
//! over that kind's candidate pool, joined by [`query::MatchMode`].

pub mod element;
pub mod namematch;
pub mod param;
pub mod query;
pub mod test;

pub use element::{ElementHandle, ElementKind};
pub use param::{Criterion, NameMatch, Operator, Param, RuleKindMask};
pub use query::{MatchMode, PolySearch, SearchResult};
pub use test::{Proof, Test, TestKind};
