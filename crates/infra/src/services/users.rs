use std::sync::Arc;

use shelfkeep_auth::{NewUser, User, UserProfile};
use shelfkeep_core::{DomainResult, UserId};

use crate::store::Repository;

/// Accounts. Username and email uniqueness is enforced by the repository.
pub struct UserService {
    users: Arc<dyn Repository<User>>,
}

impl UserService {
    pub fn new(users: Arc<dyn Repository<User>>) -> Self {
        Self { users }
    }

    pub fn register(&self, input: NewUser) -> DomainResult<User> {
        let user = self.users.insert(User::register(input)?)?;
        tracing::info!(user_id = %user.id_typed(), username = user.username(), "user registered");
        Ok(user)
    }

    /// Persist an already-built account (e.g. one with extra roles granted).
    pub fn save(&self, user: User) -> DomainResult<User> {
        match self.users.find_by_id(&user.id_typed())? {
            Some(_) => Ok(self.users.update(user)?),
            None => Ok(self.users.insert(user)?),
        }
    }

    pub fn get(&self, id: UserId) -> DomainResult<User> {
        Ok(self.users.get(&id)?)
    }

    pub fn get_by_username(&self, username: &str) -> DomainResult<User> {
        let wanted = username.trim().to_lowercase();
        self.users
            .find_where(&|user: &User| user.username().to_lowercase() == wanted)?
            .into_iter()
            .next()
            .ok_or_else(|| shelfkeep_core::DomainError::not_found("user", username))
    }

    pub fn list(&self) -> DomainResult<Vec<User>> {
        Ok(self.users.find_all()?)
    }

    pub fn update(&self, id: UserId, email: String, profile: UserProfile) -> DomainResult<User> {
        let mut user = self.users.get(&id)?;
        user.update(email, profile)?;
        Ok(self.users.update(user)?)
    }

    pub fn delete(&self, id: UserId) -> DomainResult<()> {
        self.users.delete(&id)?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
