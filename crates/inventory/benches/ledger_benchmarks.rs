use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use shelfkeep_core::EntityId;
use shelfkeep_inventory::{
    InMemoryLedger, QuantityLedger, ReservationGuard, ReservationMode, ReservationRequest,
    TrackedItem, TrackedItemId,
};
use std::sync::Arc;

fn seeded_ledger(items: usize, quantity: u32) -> (Arc<InMemoryLedger>, Vec<TrackedItemId>) {
    let ledger = Arc::new(InMemoryLedger::new());
    let ids = (0..items)
        .map(|i| {
            let item = TrackedItem::new(EntityId::new(), format!("item-{i}"), quantity, Some(10))
                .expect("valid item");
            ledger.register(item).expect("registered").id_typed()
        })
        .collect();
    (ledger, ids)
}

fn bench_reserve_release(c: &mut Criterion) {
    let (ledger, ids) = seeded_ledger(1, u32::MAX / 2);
    let id = ids[0];

    c.bench_function("ledger/reserve_release_single", |b| {
        b.iter(|| {
            ledger.reserve(black_box(id), 1).expect("stock available");
            ledger.release(black_box(id), 1).expect("release");
        })
    });
}

fn bench_reserve_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard/reserve_all");

    for lines in [1usize, 8, 64] {
        let (ledger, ids) = seeded_ledger(lines, u32::MAX / 2);
        let guard = ReservationGuard::new(ledger, ReservationMode::AllOrNothing);
        let requests: Vec<_> = ids.iter().map(|id| ReservationRequest::new(*id, 1)).collect();

        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &requests, |b, requests| {
            b.iter(|| {
                let receipt = guard.reserve_all(black_box(requests)).expect("stock available");
                guard.release_all(&receipt);
            })
        });
    }

    group.finish();
}

fn bench_low_stock_scan(c: &mut Criterion) {
    let (ledger, _) = seeded_ledger(10_000, 5);
    c.bench_function("ledger/low_stock_10k", |b| {
        b.iter(|| black_box(ledger.low_stock(None)).len())
    });
}

criterion_group!(benches, bench_reserve_release, bench_reserve_all, bench_low_stock_scan);
criterion_main!(benches);
