use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use shelfkeep_core::text::{contains_ignore_case, limit_text, require_len};
use shelfkeep_core::{DomainError, DomainResult, Entity, Money};

use crate::category::CategoryId;

shelfkeep_core::entity_id!(
    /// Product identifier.
    ProductId
);

/// Editable product fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub description: Option<String>,
    /// Price in smallest currency unit.
    pub price: Money,
    pub quantity: u32,
    pub category: Option<CategoryId>,
}

impl ProductDetails {
    fn validate(&self) -> DomainResult<()> {
        require_len("name", &self.name, 2, 200)?;
        limit_text("description", self.description.as_deref(), 1000)?;
        if self.price.is_zero() {
            return Err(DomainError::validation("price must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    details: ProductDetails,
    deleted: bool,
}

impl Product {
    pub fn new(details: ProductDetails) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: ProductId::new(),
            details,
            deleted: false,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn details(&self) -> &ProductDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn price(&self) -> Money {
        self.details.price
    }

    pub fn quantity(&self) -> u32 {
        self.details.quantity
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.details.category
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn update(&mut self, details: ProductDetails) -> DomainResult<()> {
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

impl Entity for Product {
    type Id = ProductId;
    const KIND: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Product search criteria; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<CategoryId>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(product.name(), name))
            && self.category.is_none_or(|c| product.category() == Some(c))
            && self.min_price.is_none_or(|min| product.price() >= min)
            && self.max_price.is_none_or(|max| product.price() <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Name,
    Price,
    Quantity,
}

impl ProductSort {
    /// Ascending order for this key.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSort::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            ProductSort::Price => a.price().cmp(&b.price()),
            ProductSort::Quantity => a.quantity().cmp(&b.quantity()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str, price: u64) -> ProductDetails {
        ProductDetails {
            name: name.into(),
            description: None,
            price: Money::from_minor(price),
            quantity: 0,
            category: None,
        }
    }

    #[test]
    fn zero_price_and_short_name_are_rejected() {
        assert!(Product::new(details("Hammer", 0)).unwrap_err().is_validation());
        assert!(Product::new(details("H", 100)).unwrap_err().is_validation());
        assert!(Product::new(details("Hammer", 100)).is_ok());
    }

    #[test]
    fn filter_combines_criteria() {
        let tools = CategoryId::new();
        let mut d = details("Claw Hammer", 1_500);
        d.category = Some(tools);
        let hammer = Product::new(d).unwrap();

        assert!(ProductFilter::default().matches(&hammer));
        let filter = ProductFilter {
            name: Some("hammer".into()),
            category: Some(tools),
            min_price: Some(Money::from_minor(1_000)),
            max_price: Some(Money::from_minor(1_500)),
        };
        assert!(filter.matches(&hammer));

        let cheaper = ProductFilter {
            max_price: Some(Money::from_minor(1_499)),
            ..filter
        };
        assert!(!cheaper.matches(&hammer));
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let a = Product::new(details("anvil", 100)).unwrap();
        let b = Product::new(details("Bolt", 50)).unwrap();
        assert_eq!(ProductSort::Name.compare(&a, &b), Ordering::Less);
        assert_eq!(ProductSort::Price.compare(&a, &b), Ordering::Greater);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn price_range_filter_is_inclusive(price in 1u64..1_000_000, below in 0u64..1_000, above in 0u64..1_000) {
                let product = Product::new(details("Widget", price)).unwrap();
                let filter = ProductFilter {
                    min_price: Some(Money::from_minor(price.saturating_sub(below))),
                    max_price: Some(Money::from_minor(price + above)),
                    ..ProductFilter::default()
                };
                prop_assert!(filter.matches(&product));
            }
        }
    }
}
