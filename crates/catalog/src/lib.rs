//! Catalog module: bibliographic reference data.
//!
//! Authors, genres, publishers and books, plus reader reviews. Pure domain
//! logic (no IO, no storage); relations are held as ids and counted on demand
//! by the storage layer.

pub mod author;
pub mod book;
pub mod genre;
pub mod publisher;
pub mod review;

pub use author::{Author, AuthorDetails, AuthorId};
pub use book::{Book, BookDetails, BookId};
pub use genre::{Genre, GenreDetails, GenreId};
pub use publisher::{Publisher, PublisherDetails, PublisherId};
pub use review::{Review, ReviewDetails, ReviewId};
