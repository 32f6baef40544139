//! Infrastructure layer: storage adapters, configuration, and the services
//! that compose the domain crates.

pub mod app;
pub mod config;
pub mod query;
pub mod seed;
pub mod services;
pub mod store;


pub use app::Shelfkeep;
pub use config::Config;
pub use query::SortDir;
pub use store::{InMemoryRepository, Repository, StoreError};
