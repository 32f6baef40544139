use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfkeep_core::text::limit_text;
use shelfkeep_core::{DomainError, DomainResult, Entity, UserId};

use crate::book::BookId;

shelfkeep_core::entity_id!(
    /// Review identifier.
    ReviewId
);

/// Rating and comment, the editable part of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDetails {
    pub rating: u8,
    pub comment: Option<String>,
}

impl ReviewDetails {
    fn validate(&self) -> DomainResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(DomainError::validation("rating must be between 1 and 5"));
        }
        limit_text("comment", self.comment.as_deref(), 2000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    user: UserId,
    book: BookId,
    details: ReviewDetails,
    reviewed_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        user: UserId,
        book: BookId,
        details: ReviewDetails,
        reviewed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: ReviewId::new(),
            user,
            book,
            details,
            reviewed_at,
        })
    }

    pub fn id_typed(&self) -> ReviewId {
        self.id
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn book(&self) -> BookId {
        self.book
    }

    pub fn rating(&self) -> u8 {
        self.details.rating
    }

    pub fn comment(&self) -> Option<&str> {
        self.details.comment.as_deref()
    }

    pub fn reviewed_at(&self) -> DateTime<Utc> {
        self.reviewed_at
    }

    pub fn update(&mut self, details: ReviewDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details;
        Ok(())
    }
}

impl Entity for Review {
    type Id = ReviewId;
    const KIND: &'static str = "review";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: only ratings 1..=5 are accepted.
            #[test]
            fn rating_bounds(rating in any::<u8>()) {
                let result = Review::new(
                    UserId::new(),
                    BookId::new(),
                    ReviewDetails { rating, comment: None },
                    Utc::now(),
                );
                prop_assert_eq!(result.is_ok(), (1..=5).contains(&rating));
            }
        }
    }

    #[test]
    fn long_comment_is_rejected() {
        let details = ReviewDetails {
            rating: 4,
            comment: Some("x".repeat(2001)),
        };
        assert!(Review::new(UserId::new(), BookId::new(), details, Utc::now()).is_err());
    }
}
