use serde::{Deserialize, Serialize};

use shelfkeep_core::text::{limit_text, require_len};
use shelfkeep_core::{DomainResult, Entity};

shelfkeep_core::entity_id!(
    /// Product category identifier.
    CategoryId
);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryDetails {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        require_len("name", &self.name, 2, 100)?;
        limit_text("description", self.description.as_deref(), 500)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    details: CategoryDetails,
    deleted: bool,
}

impl Category {
    pub fn new(details: CategoryDetails) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: CategoryId::new(),
            details,
            deleted: false,
        })
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn details(&self) -> &CategoryDetails {
        &self.details
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn update(&mut self, details: CategoryDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details;
        Ok(())
    }

    pub fn soft_delete(&mut self) {
        self.deleted = true;
    }

    pub fn restore(&mut self) {
        self.deleted = false;
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const KIND: &'static str = "category";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_is_bounded() {
        assert!(Category::new(CategoryDetails::named("A")).is_err());
        assert!(Category::new(CategoryDetails::named("a".repeat(101))).is_err());
        assert!(Category::new(CategoryDetails::named("Tools")).is_ok());
    }

    #[test]
    fn soft_delete_is_reversible() {
        let mut category = Category::new(CategoryDetails::named("Garden")).unwrap();
        category.soft_delete();
        assert!(category.is_deleted());
        category.restore();
        assert!(!category.is_deleted());
    }
}
