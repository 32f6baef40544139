//! `shelfkeep-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod guard;
pub mod id;
pub mod text;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use guard::{BatchDeletion, BlockedDeletion, FailedDeletion};
pub use id::{EntityId, UserId};
pub use value_object::{Money, ValueObject};
