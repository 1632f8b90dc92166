use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use limit_book::{Matcher, Order, OrderBook, OrderType, Side, Trade};
use order_feed::{parser, DataFeed, Journal};

#[derive(Parser, Debug)]
#[command(name = "book_sim")]
#[command(about = "Drive synthetic or replayed order flow through the matching engine")]
struct Args {
    /// Number of random orders in burst mode
    #[arg(long, default_value_t = 10_000)]
    orders: u64,

    /// Trading symbol for generated orders
    #[arg(long, default_value = "AAPL")]
    symbol: String,

    /// Lower bound of the generated price band, in cents
    #[arg(long, default_value_t = 9_900)]
    band_low: i64,

    /// Upper bound of the generated price band, in cents
    #[arg(long, default_value_t = 10_100)]
    band_high: i64,

    /// RNG seed; identical seeds replay identical runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Trade journal path
    #[arg(long, default_value = "book_sim.log")]
    journal: PathBuf,

    /// Drive orders from a data feed source (a .json/.csv/.txt file, or
    /// "simulation") instead of the internal burst generator
    #[arg(long)]
    source: Option<String>,

    /// How long to run a "simulation" source before stopping
    #[arg(long, default_value_t = 5)]
    duration_secs: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let journal = Arc::new(Journal::open(&args.journal)?);
    info!(journal = %args.journal.display(), "trade journal open");

    let book = Arc::new(OrderBook::new());
    let trade_sink = Arc::clone(&journal);
    book.set_trade_callback(Box::new(move |buy, sell, price, qty| {
        let trade = Trade::capture(buy, sell, price, qty);
        if let Err(e) = trade_sink.trade(&trade) {
            warn!(error = %e, "failed to journal trade");
        }
    }));

    let matcher = Arc::new(Matcher::new(Arc::clone(&book)));
    matcher.start();

    let started = Instant::now();
    match &args.source {
        Some(source) => run_feed(&args, source, &matcher)?,
        None => run_burst(&args, &matcher),
    }
    matcher.stop();
    let elapsed = started.elapsed();

    let processed = matcher.processed_orders();
    let rate = processed as f64 / elapsed.as_secs_f64();
    println!(
        "Processed {} orders in {:.1} ms ({:.0}/sec)",
        processed,
        elapsed.as_secs_f64() * 1e3,
        rate
    );
    println!("Total trades: {}", book.total_trades());
    println!(
        "Best Bid: {}, Best Ask: {}",
        format_price(book.best_bid()),
        format_price(book.best_ask())
    );

    journal.event(&format!(
        "run complete: processed={} trades={} elapsed_ms={:.1}",
        processed,
        book.total_trades(),
        elapsed.as_secs_f64() * 1e3
    ))?;
    Ok(())
}

/// The classic stress run: a seeded burst of random limit orders in a
/// narrow band, so both sides build up and cross constantly.
fn run_burst(args: &Args, matcher: &Matcher) {
    let mut rng = StdRng::seed_from_u64(args.seed);

    for order_id in 1..=args.orders {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = Decimal::new(rng.gen_range(args.band_low..=args.band_high), 2);
        let quantity = rng.gen_range(1..=100);
        matcher.submit(Order::new(
            order_id,
            0,
            args.symbol.clone(),
            OrderType::Limit,
            side,
            price,
            quantity,
        ));
    }
}

/// Feed mode: parse each line the feed emits and submit it.
fn run_feed(args: &Args, source: &str, matcher: &Arc<Matcher>) -> anyhow::Result<()> {
    let mut feed = DataFeed::with_seed(args.seed);
    let submitter = Arc::clone(matcher);
    feed.set_handler(move |line| match parser::parse(line) {
        Ok(order) => submitter.submit(order),
        Err(e) => warn!(error = %e, line, "dropping unparseable order"),
    });

    feed.connect(source)?;
    feed.start()?;

    if source == "simulation" || source == "random" {
        std::thread::sleep(Duration::from_secs(args.duration_secs));
        feed.stop();
    } else {
        while feed.is_running() {
            std::thread::sleep(Duration::from_millis(20));
        }
    }
    feed.disconnect();
    Ok(())
}

fn format_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.to_string())
}
