//! Service wiring over the in-memory adapters.

use std::sync::Arc;

use shelfkeep_auth::User;
use shelfkeep_catalog::{Author, Book, Genre, Publisher, Review};
use shelfkeep_inventory::{InMemoryLedger, QuantityLedger, ReservationGuard};
use shelfkeep_lending::Loan;
use shelfkeep_products::{Category, Product};
use shelfkeep_sales::Order;

use crate::config::Config;
use crate::services::{
    AuthorService, BookService, BookStores, CategoryService, GenreService, InventoryService,
    LoanService, OrderService, ProductService, PublisherService, ReviewService, UserService,
};
use crate::store::{InMemoryRepository, Repository};

fn repo<E>() -> Arc<dyn Repository<E>>
where
    E: shelfkeep_core::Entity + Clone + Send + Sync + 'static,
{
    Arc::new(InMemoryRepository::<E>::new())
}

/// Every service of the three stores, sharing one set of repositories.
pub struct Shelfkeep {
    pub config: Config,
    pub authors: AuthorService,
    pub genres: GenreService,
    pub publishers: PublisherService,
    pub books: BookService,
    pub inventory: InventoryService,
    pub orders: OrderService,
    pub reviews: ReviewService,
    pub users: UserService,
    pub loans: LoanService,
    pub categories: CategoryService,
    pub products: ProductService,
}

impl Shelfkeep {
    pub fn from_config(config: Config) -> Self {
        let authors = repo::<Author>();
        let genres = repo::<Genre>();
        let publishers = repo::<Publisher>();
        let books = repo::<Book>();
        let reviews = repo::<Review>();
        let users = repo::<User>();
        let orders = repo::<Order>();
        let loans = repo::<Loan>();
        let categories = repo::<Category>();
        let products = repo::<Product>();
        let stock: Arc<dyn QuantityLedger> = Arc::new(InMemoryLedger::new());
        let copies: Arc<dyn QuantityLedger> = Arc::new(InMemoryLedger::new());

        tracing::info!(
            reservation_mode = ?config.reservation_mode,
            default_low_stock_threshold = ?config.default_low_stock_threshold,
            "wiring services"
        );

        Self {
            authors: AuthorService::new(authors.clone(), books.clone()),
            genres: GenreService::new(genres.clone(), books.clone()),
            publishers: PublisherService::new(publishers.clone(), books.clone()),
            books: BookService::new(BookStores {
                books: books.clone(),
                authors,
                genres,
                publishers,
                orders: orders.clone(),
                loans: loans.clone(),
                stock: stock.clone(),
                copies: copies.clone(),
            }),
            inventory: InventoryService::new(
                books.clone(),
                stock.clone(),
                config.default_low_stock_threshold,
            ),
            orders: OrderService::new(
                orders,
                users.clone(),
                books.clone(),
                ReservationGuard::new(stock, config.reservation_mode),
            ),
            reviews: ReviewService::new(reviews, users.clone(), books.clone()),
            users: UserService::new(users),
            loans: LoanService::new(loans, books, copies),
            categories: CategoryService::new(categories.clone(), products.clone()),
            products: ProductService::new(products, categories),
            config,
        }
    }

    /// Read configuration from the environment, install logging, wire services.
    pub fn bootstrap() -> Self {
        let config = Config::from_env();
        shelfkeep_observability::init_with(
            &config.log_level,
            shelfkeep_observability::LogFormat::from_json_flag(config.log_json),
        );
        Self::from_config(config)
    }
}

impl Default for Shelfkeep {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}
