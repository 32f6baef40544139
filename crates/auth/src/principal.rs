use serde::{Deserialize, Serialize};

use shelfkeep_core::UserId;

use crate::{Role, User};

/// The authenticated caller, as resolved by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: UserId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
        }
    }

    /// Principal with only the default user role.
    pub fn user(user_id: UserId) -> Self {
        Self::new(user_id, [Role::USER])
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_privileged(&self) -> bool {
        self.roles.iter().any(Role::is_privileged)
    }

    pub fn owns(&self, owner: UserId) -> bool {
        self.user_id == owner
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id_typed(), user.roles().iter().cloned())
    }
}
