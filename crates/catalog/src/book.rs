use serde::{Deserialize, Serialize};

use shelfkeep_core::text::{limit_text, require_len, require_text};
use shelfkeep_core::{DomainError, DomainResult, Entity, Money};

use crate::author::AuthorId;
use crate::genre::GenreId;
use crate::publisher::PublisherId;

shelfkeep_core::entity_id!(
    /// Book identifier.
    BookId
);

pub const MIN_PUBLICATION_YEAR: i32 = 1000;
pub const MAX_PUBLICATION_YEAR: i32 = 2100;

/// Editable book fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub title: String,
    pub isbn: String,
    /// Price in smallest currency unit.
    pub price: Money,
    pub pages: u32,
    pub publication_year: i32,
    pub description: Option<String>,
    pub publisher: PublisherId,
    pub authors: Vec<AuthorId>,
    pub genres: Vec<GenreId>,
}

impl BookDetails {
    fn validate(&self) -> DomainResult<()> {
        require_text("title", &self.title, 500)?;
        require_len("isbn", self.isbn.trim(), 10, 17)?;
        if self.price.is_zero() {
            return Err(DomainError::validation("price must be positive"));
        }
        if self.pages == 0 {
            return Err(DomainError::validation("pages must be positive"));
        }
        if !(MIN_PUBLICATION_YEAR..=MAX_PUBLICATION_YEAR).contains(&self.publication_year) {
            return Err(DomainError::validation(format!(
                "publication_year must be between {MIN_PUBLICATION_YEAR} and {MAX_PUBLICATION_YEAR}"
            )));
        }
        limit_text("description", self.description.as_deref(), 5000)
    }

    fn normalized(mut self) -> Self {
        self.isbn = self.isbn.trim().to_string();
        self.authors.sort();
        self.authors.dedup();
        self.genres.sort();
        self.genres.dedup();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    details: BookDetails,
}

impl Book {
    pub fn new(details: BookDetails) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: BookId::new(),
            details: details.normalized(),
        })
    }

    pub fn id_typed(&self) -> BookId {
        self.id
    }

    pub fn details(&self) -> &BookDetails {
        &self.details
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }

    pub fn isbn(&self) -> &str {
        &self.details.isbn
    }

    pub fn price(&self) -> Money {
        self.details.price
    }

    pub fn publisher(&self) -> PublisherId {
        self.details.publisher
    }

    pub fn publication_year(&self) -> i32 {
        self.details.publication_year
    }

    pub fn has_author(&self, author: AuthorId) -> bool {
        self.details.authors.contains(&author)
    }

    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.details.genres.contains(&genre)
    }

    pub fn update(&mut self, details: BookDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details.normalized();
        Ok(())
    }
}

impl Entity for Book {
    type Id = BookId;
    const KIND: &'static str = "book";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("isbn", self.details.isbn.to_lowercase())]
    }
}
