use serde::{Deserialize, Serialize};

use shelfkeep_core::text::{limit_text, require_text};
use shelfkeep_core::{DomainResult, Entity};

shelfkeep_core::entity_id!(
    /// Genre identifier.
    GenreId
);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenreDetails {
    pub name: String,
    pub description: Option<String>,
}

impl GenreDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name, 100)?;
        limit_text("description", self.description.as_deref(), 1000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    id: GenreId,
    details: GenreDetails,
}

impl Genre {
    pub fn new(details: GenreDetails) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: GenreId::new(),
            details,
        })
    }

    pub fn id_typed(&self) -> GenreId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn details(&self) -> &GenreDetails {
        &self.details
    }

    pub fn update(&mut self, details: GenreDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details;
        Ok(())
    }
}

impl Entity for Genre {
    type Id = GenreId;
    const KIND: &'static str = "genre";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
