//! `shelfkeep-auth`: identity boundary consumed by the services.
//!
//! Authentication and password handling happen elsewhere; this crate only
//! answers "who is acting" and "may they act for this owner".

pub mod authorize;
pub mod principal;
pub mod roles;
pub mod user;

pub use authorize::{ensure_can_act_for, ensure_privileged, AuthzError};
pub use principal::Principal;
pub use roles::Role;
pub use user::{NewUser, User, UserProfile};
