//! User accounts.
//!
//! Credentials are not stored here; the identity layer owns them.

use serde::{Deserialize, Serialize};

use shelfkeep_core::text::{limit_text, require_len};
use shelfkeep_core::{DomainError, DomainResult, Entity, UserId};

use crate::Role;

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub profile: UserProfile,
}

/// Contact details a user may change after registration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UserProfile {
    fn validate(&self) -> DomainResult<()> {
        limit_text("full_name", self.full_name.as_deref(), 200)?;
        limit_text("phone", self.phone.as_deref(), 20)?;
        limit_text("address", self.address.as_deref(), 500)
    }
}

fn validate_email(email: &str) -> DomainResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(DomainError::validation("email is malformed"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    profile: UserProfile,
    roles: Vec<Role>,
}

impl User {
    /// New account with the default [`Role::USER`].
    pub fn register(input: NewUser) -> DomainResult<Self> {
        require_len("username", &input.username, 3, 50)?;
        validate_email(&input.email)?;
        input.profile.validate()?;
        Ok(Self {
            id: UserId::new(),
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            profile: input.profile,
            roles: vec![Role::USER],
        })
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn update(&mut self, email: String, profile: UserProfile) -> DomainResult<()> {
        validate_email(&email)?;
        profile.validate()?;
        self.email = email.trim().to_string();
        self.profile = profile;
        Ok(())
    }

    pub fn grant(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", self.username.to_lowercase()),
            ("email", self.email.to_lowercase()),
        ]
    }
}
