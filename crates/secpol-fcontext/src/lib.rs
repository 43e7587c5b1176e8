// SPDX-License-Identifier: Apache-2.0

//! The file-context list (C9): an ordered `file_contexts` entry table,
//! parsed from the line-oriented text format, queryable by path,
//! object-type, and context component.

pub mod entry;
pub mod list;
pub mod matcher;
pub mod parse;

pub use entry::{FcContext, FcEntry, ObjectType, ObjectTypeMask};
pub use list::{FcList, FcQuery};
pub use matcher::StringMatch;
