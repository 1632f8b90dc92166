use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use limit_book::{Order, OrderBook, OrderType, Side};
use rust_decimal::Decimal;
use std::time::Duration;

fn limit(id: u64, side: Side, price: Decimal, qty: u32) -> Order {
    Order::new(id, 0, "AAPL", OrderType::Limit, side, price, qty)
}

fn market(id: u64, side: Side, qty: u32) -> Order {
    Order::new(id, 0, "AAPL", OrderType::Market, side, Decimal::ZERO, qty)
}

// Mixed flow with realistic ratios: mostly limits, some markets, a trickle
// of cancels.
fn simulate_order_flow(book: &OrderBook, order_count: usize) {
    let base_price = 50_000i64;

    for i in 0..order_count {
        let id = (i + 1) as u64;
        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };

        if i % 10 < 7 {
            let price_offset = (i % 10) as i64 - 5;
            let price = Decimal::from(base_price + price_offset);
            let qty = ((i % 5) + 1) as u32;
            book.add(limit(id, side, price, qty));

            if i % 10 == 0 && i > 0 {
                book.cancel(((i / 2) + 1) as u64);
            }
        } else {
            let qty = ((i % 3) + 1) as u32;
            book.add(market(id, side, qty));
        }
    }
}

fn bench_mixed_order_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_flow");

    for order_count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*order_count as u64));
        group.bench_with_input(
            format!("{}_orders", order_count),
            order_count,
            |b, &count| {
                b.iter(|| {
                    let book = OrderBook::new();
                    simulate_order_flow(black_box(&book), black_box(count));
                });
            },
        );
    }

    group.finish();
}

fn bench_limit_order_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("limit_orders");

    group.bench_function("place_limit_order", |b| {
        let book = OrderBook::new();
        let price = Decimal::from(50_000);
        let mut id = 0u64;

        b.iter(|| {
            id += 1;
            book.add(limit(black_box(id), Side::Buy, black_box(price), 1));
        });
    });

    group.finish();
}

fn bench_market_order_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_orders");

    group.bench_function("execute_market_order", |b| {
        b.iter_batched(
            || {
                let book = OrderBook::new();
                for i in 0..10 {
                    book.add(limit(i + 1, Side::Sell, Decimal::from(50_000 + i as i64), 10));
                }
                book
            },
            |book| {
                book.add(market(black_box(100), Side::Buy, black_box(5)));
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_deep_book_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_book");

    group.bench_function("match_across_levels", |b| {
        b.iter_batched(
            || {
                let book = OrderBook::new();
                for i in 0..100 {
                    book.add(limit(i + 1, Side::Sell, Decimal::from(50_000 + i as i64), 100));
                }
                book
            },
            |book| {
                book.add(market(black_box(1_000), Side::Buy, black_box(5_000)));
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_cancel_heavy_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel_heavy");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("place_then_cancel", |b| {
        b.iter(|| {
            let book = OrderBook::new();
            let base = Decimal::from(50_000);

            for i in 1..=1_000u64 {
                let offset = Decimal::from((i % 10) as i64 - 5);
                book.add(limit(i, Side::Buy, base + offset, 1));
                if i % 3 == 0 {
                    book.cancel(i);
                }
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mixed_order_throughput,
    bench_limit_order_placement,
    bench_market_order_execution,
    bench_deep_book_matching,
    bench_cancel_heavy_flow
);

criterion_main!(benches);
