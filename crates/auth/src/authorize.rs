use thiserror::Error;

use shelfkeep_core::{DomainError, UserId};

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {principal} may not act for {owner}")]
    NotOwner { principal: UserId, owner: UserId },

    #[error("forbidden: privileged role required")]
    NotPrivileged,
}

impl From<AuthzError> for DomainError {
    fn from(_: AuthzError) -> Self {
        DomainError::Unauthorized
    }
}

/// Allow the owner themselves, or any admin/manager.
///
/// - No IO
/// - No panics
pub fn ensure_can_act_for(principal: &Principal, owner: UserId) -> Result<(), AuthzError> {
    if principal.owns(owner) || principal.is_privileged() {
        Ok(())
    } else {
        Err(AuthzError::NotOwner {
            principal: principal.user_id,
            owner,
        })
    }
}

pub fn ensure_privileged(principal: &Principal) -> Result<(), AuthzError> {
    if principal.is_privileged() {
        Ok(())
    } else {
        Err(AuthzError::NotPrivileged)
    }
}
