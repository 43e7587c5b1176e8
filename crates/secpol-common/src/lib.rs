// SPDX-License-Identifier: Apache-2.0

//! Shared error taxonomy and logging bootstrap for the secpol toolkit.

pub mod error;
pub mod logging;

pub use error::{Capability, Error, Result};
