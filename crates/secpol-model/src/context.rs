// SPDX-License-Identifier: Apache-2.0

//! Security contexts: `user:role:type[:range]`.

use crate::mls::MlsRange;
use secpol_core::{RoleDomain, SymbolId, UserDomain};

pub type UserId = SymbolId<UserDomain>;
pub type RoleId = SymbolId<RoleDomain>;
pub type TypeId = crate::types::TypeId;

/// A security context. `range` is `None` on a non-MLS policy and `Some`
/// on an MLS one; there is no context with an MLS range attached to a
/// non-MLS policy model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    pub user: UserId,
    pub role: RoleId,
    pub ty: TypeId,
    pub range: Option<MlsRange>,
}

impl SecurityContext {
    pub fn new(user: UserId, role: RoleId, ty: TypeId) -> Self {
        SecurityContext {
            user,
            role,
            ty,
            range: None,
        }
    }

    pub fn with_range(mut self, range: MlsRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn is_mls(&self) -> bool {
        self.range.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_mls_context_has_no_range() {
        let ctx = SecurityContext::new(UserId::new(1), RoleId::new(1), TypeId::new(1));
        assert!(!ctx.is_mls());
        assert_eq!(ctx.range, None);
    }
}
