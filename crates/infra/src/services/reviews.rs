use std::sync::Arc;

use chrono::Utc;

use shelfkeep_auth::User;
use shelfkeep_catalog::{Book, BookId, Review, ReviewDetails, ReviewId};
use shelfkeep_core::{DomainResult, UserId};

use crate::store::Repository;

pub struct ReviewService {
    reviews: Arc<dyn Repository<Review>>,
    users: Arc<dyn Repository<User>>,
    books: Arc<dyn Repository<Book>>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn Repository<Review>>,
        users: Arc<dyn Repository<User>>,
        books: Arc<dyn Repository<Book>>,
    ) -> Self {
        Self {
            reviews,
            users,
            books,
        }
    }

    /// Record a review stamped with the current time.
    pub fn create(&self, user: UserId, book: BookId, details: ReviewDetails) -> DomainResult<Review> {
        self.users.get(&user)?;
        self.books.get(&book)?;
        let review = self.reviews.insert(Review::new(user, book, details, Utc::now())?)?;
        tracing::info!(review_id = %review.id_typed(), book_id = %book, rating = review.rating(), "review created");
        Ok(review)
    }

    pub fn get(&self, id: ReviewId) -> DomainResult<Review> {
        Ok(self.reviews.get(&id)?)
    }

    /// Newest first.
    pub fn list_by_book(&self, book: BookId) -> DomainResult<Vec<Review>> {
        self.books.get(&book)?;
        let mut rows = self.reviews.find_where(&|review: &Review| review.book() == book)?;
        rows.sort_by(|a, b| b.reviewed_at().cmp(&a.reviewed_at()));
        Ok(rows)
    }

    pub fn list_by_user(&self, user: UserId) -> DomainResult<Vec<Review>> {
        self.users.get(&user)?;
        Ok(self.reviews.find_where(&|review: &Review| review.user() == user)?)
    }

    pub fn update(&self, id: ReviewId, details: ReviewDetails) -> DomainResult<Review> {
        let mut review = self.reviews.get(&id)?;
        review.update(details)?;
        Ok(self.reviews.update(review)?)
    }

    pub fn delete(&self, id: ReviewId) -> DomainResult<()> {
        self.reviews.delete(&id)?;
        tracing::info!(review_id = %id, "review deleted");
        Ok(())
    }
}
