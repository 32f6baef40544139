use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use shelfkeep_auth::{NewUser, Principal, User, UserProfile};
use shelfkeep_catalog::{Book, BookDetails, PublisherDetails};
use shelfkeep_core::Money;
use shelfkeep_infra::services::BookFilter;
use shelfkeep_infra::Shelfkeep;
use shelfkeep_sales::{NewOrder, NewOrderLine};

fn setup(books: usize, stock: u32) -> (Shelfkeep, User, Vec<Book>) {
    let app = Shelfkeep::default();
    let publisher = app
        .publishers
        .create(PublisherDetails::named("Bench House"))
        .unwrap();
    let user = app
        .users
        .register(NewUser {
            username: "bench".into(),
            email: "bench@example.com".into(),
            profile: UserProfile::default(),
        })
        .unwrap();

    let books = (0..books)
        .map(|n| {
            let book = app
                .books
                .create(BookDetails {
                    title: format!("Volume {n}"),
                    isbn: format!("978-0-000-{n:05}-0"),
                    price: Money::from_minor(10_000 + n as u64),
                    pages: 100,
                    publication_year: 2000,
                    description: None,
                    publisher: publisher.id_typed(),
                    authors: vec![],
                    genres: vec![],
                })
                .unwrap();
            app.inventory
                .register_stock(book.id_typed(), stock, Some(10))
                .unwrap();
            book
        })
        .collect();
    (app, user, books)
}

fn bench_order_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_placement");

    for lines in [1usize, 5, 20] {
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            let (app, user, books) = setup(lines, u32::MAX);
            let principal = Principal::from(&user);
            let order = NewOrder {
                user: user.id_typed(),
                lines: books
                    .iter()
                    .map(|book| NewOrderLine {
                        book: book.id_typed(),
                        quantity: 1,
                    })
                    .collect(),
                shipping_address: None,
            };
            b.iter(|| black_box(app.orders.create(&principal, order.clone()).unwrap()));
        });
    }

    group.finish();
}

fn bench_book_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("book_filter");

    for size in [100usize, 1_000] {
        let (app, _, _) = setup(size, 1);
        let filter = BookFilter {
            title: Some("volume 9".into()),
            year_from: Some(1990),
            ..BookFilter::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(app.books.filter(&filter).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_order_placement, bench_book_filter);
criterion_main!(benches);
