use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfkeep_core::text::{limit_text, require_text};
use shelfkeep_core::{DomainResult, Entity};

shelfkeep_core::entity_id!(
    /// Author identifier.
    AuthorId
);

/// Editable author fields (create and update share them).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorDetails {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub country: Option<String>,
    pub biography: Option<String>,
}

impl AuthorDetails {
    pub fn named(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> DomainResult<()> {
        require_text("first_name", &self.first_name, 100)?;
        require_text("last_name", &self.last_name, 100)?;
        limit_text("country", self.country.as_deref(), 100)?;
        limit_text("biography", self.biography.as_deref(), 2000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    id: AuthorId,
    details: AuthorDetails,
}

impl Author {
    pub fn new(details: AuthorDetails) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: AuthorId::new(),
            details,
        })
    }

    pub fn id_typed(&self) -> AuthorId {
        self.id
    }

    pub fn details(&self) -> &AuthorDetails {
        &self.details
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }

    pub fn update(&mut self, details: AuthorDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details;
        Ok(())
    }
}

impl Entity for Author {
    type Id = AuthorId;
    const KIND: &'static str = "author";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
