//! Product catalog with soft deletion.
//!
//! Categories group products; neither is ever guarded on delete. A soft
//! delete hides the record from regular listings and can be undone.

pub mod category;
pub mod product;

pub use category::{Category, CategoryDetails, CategoryId};
pub use product::{Product, ProductDetails, ProductFilter, ProductId, ProductSort};
