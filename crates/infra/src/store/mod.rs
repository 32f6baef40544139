//! Record storage behind a repository trait.
//!
//! - `trait.rs`: `Repository` trait and `StoreError`
//! - `in_memory.rs`: in-memory adapter for tests/dev

mod r#trait;
pub mod in_memory;

pub use in_memory::InMemoryRepository;
pub use r#trait::{Filter, Repository, StoreError};
