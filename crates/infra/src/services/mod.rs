//! Application services over repositories and ledgers.
//!
//! Services take already-built domain inputs and return domain values; any
//! presentation layer sits on top of them.

pub mod books;
pub mod inventory;
pub mod loans;
pub mod orders;
pub mod products;
pub mod reference;
pub mod reviews;
pub mod users;

pub use books::{BookFilter, BookService, BookSort, BookStores};
pub use inventory::InventoryService;
pub use loans::{LoanFilter, LoanService, LoanSort};
pub use orders::OrderService;
pub use products::{CategoryService, ProductService};
pub use reference::{
    AuthorService, AuthorSort, GenreService, GenreSort, PublisherService, PublisherSort,
    ReferenceData, ReferenceService,
};
pub use reviews::ReviewService;
pub use users::UserService;
