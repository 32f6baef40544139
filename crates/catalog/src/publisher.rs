use serde::{Deserialize, Serialize};

use shelfkeep_core::text::{limit_text, require_text};
use shelfkeep_core::{DomainError, DomainResult, Entity};

shelfkeep_core::entity_id!(
    /// Publisher identifier.
    PublisherId
);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublisherDetails {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PublisherDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name, 200)?;
        limit_text("address", self.address.as_deref(), 500)?;
        limit_text("city", self.city.as_deref(), 100)?;
        limit_text("country", self.country.as_deref(), 100)?;
        limit_text("phone", self.phone.as_deref(), 20)?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(DomainError::validation("email is malformed"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    id: PublisherId,
    details: PublisherDetails,
}

impl Publisher {
    pub fn new(details: PublisherDetails) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: PublisherId::new(),
            details,
        })
    }

    pub fn id_typed(&self) -> PublisherId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn details(&self) -> &PublisherDetails {
        &self.details
    }

    pub fn update(&mut self, details: PublisherDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details;
        Ok(())
    }
}

impl Entity for Publisher {
    type Id = PublisherId;
    const KIND: &'static str = "publisher";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
