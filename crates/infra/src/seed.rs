//! Sample bookstore data for development runs.
//!
//! Each group is only inserted into an empty store, so seeding twice is a no-op.

use shelfkeep_auth::{NewUser, Role, User, UserProfile};
use shelfkeep_catalog::{AuthorDetails, BookDetails, GenreDetails, PublisherDetails};
use shelfkeep_core::{DomainResult, Money};

use crate::app::Shelfkeep;

const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub books: usize,
}

fn staff(username: &str, full_name: &str, role: Option<Role>) -> DomainResult<User> {
    let mut user = User::register(NewUser {
        username: username.to_string(),
        email: format!("{username}@bookstore.com"),
        profile: UserProfile {
            full_name: Some(full_name.to_string()),
            ..UserProfile::default()
        },
    })?;
    if let Some(role) = role {
        user.grant(role);
    }
    Ok(user)
}

pub fn seed_bookstore(app: &Shelfkeep) -> DomainResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    if app.users.list()?.is_empty() {
        for user in [
            staff("admin", "System Administrator", Some(Role::ADMIN))?,
            staff("manager", "Store Manager", Some(Role::MANAGER))?,
            staff("user", "Regular Customer", None)?,
        ] {
            app.users.save(user)?;
            summary.users += 1;
        }
    }

    if !app.books.list()?.is_empty() {
        return Ok(summary);
    }

    let tolstoy = app.authors.create(AuthorDetails {
        biography: Some("Russian writer, a classic of world literature".into()),
        ..AuthorDetails::named("Leo", "Tolstoy")
    })?;
    let dostoevsky = app.authors.create(AuthorDetails {
        biography: Some("Russian writer, philosopher and essayist".into()),
        ..AuthorDetails::named("Fyodor", "Dostoevsky")
    })?;
    let pushkin = app.authors.create(AuthorDetails {
        biography: Some("Russian poet, playwright and novelist".into()),
        ..AuthorDetails::named("Alexander", "Pushkin")
    })?;

    let eksmo = app.publishers.create(PublisherDetails {
        address: Some("Moscow".into()),
        email: Some("info@eksmo.ru".into()),
        ..PublisherDetails::named("Eksmo")
    })?;
    let ast = app.publishers.create(PublisherDetails {
        address: Some("Moscow".into()),
        email: Some("info@ast.ru".into()),
        ..PublisherDetails::named("AST")
    })?;

    let novel = app.genres.create(GenreDetails {
        description: Some("Long-form narrative prose".into()),
        ..GenreDetails::named("Novel")
    })?;
    let poetry = app.genres.create(GenreDetails {
        description: Some("Works in verse".into()),
        ..GenreDetails::named("Poetry")
    })?;
    let classics = app.genres.create(GenreDetails {
        description: Some("Classic literature".into()),
        ..GenreDetails::named("Classics")
    })?;

    let books = [
        ("War and Peace", "978-5-17-123456-7", 89_900, 1274, 1869, eksmo.id_typed(), tolstoy.id_typed(), novel.id_typed(), 50),
        ("Crime and Punishment", "978-5-17-123457-4", 59_900, 671, 1866, ast.id_typed(), dostoevsky.id_typed(), novel.id_typed(), 30),
        ("Eugene Onegin", "978-5-17-123458-1", 39_900, 224, 1833, eksmo.id_typed(), pushkin.id_typed(), poetry.id_typed(), 40),
    ];
    for (title, isbn, price, pages, year, publisher, author, genre, stock) in books {
        let book = app.books.create(BookDetails {
            title: title.to_string(),
            isbn: isbn.to_string(),
            price: Money::from_minor(price),
            pages,
            publication_year: year,
            description: None,
            publisher,
            authors: vec![author],
            genres: vec![genre, classics.id_typed()],
        })?;
        app.inventory
            .register_stock(book.id_typed(), stock, Some(LOW_STOCK_THRESHOLD))?;
        summary.books += 1;
    }

    tracing::info!(users = summary.users, books = summary.books, "sample data seeded");
    Ok(summary)
}
