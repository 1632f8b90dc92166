use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("unknown data source `{0}`")]
    UnknownSource(String),

    #[error("cannot open source file `{path}`: {source}")]
    UnreadableFile {
        path: String,
        source: std::io::Error,
    },

    #[error("already connected to `{0}`")]
    AlreadyConnected(String),

    #[error("not connected to a data source")]
    NotConnected,

    #[error("data feed already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone)]
enum FeedSource {
    File(PathBuf),
    Simulation,
}

// Pacing between emitted lines, mimicking a real-time source.
const FILE_PACE: Duration = Duration::from_millis(1);
const SIM_PACE: Duration = Duration::from_millis(2);

/// Line-oriented order source. Connect to a `.json`/`.csv`/`.txt` file to
/// replay it, or to `"simulation"` for an endless seeded random order
/// stream; each line goes to the installed handler on a worker thread.
///
/// Lifecycle: `connect` -> `start` -> `stop` -> `disconnect`. A file feed
/// stops by itself at end of input.
pub struct DataFeed {
    source: Option<FeedSource>,
    source_name: String,
    handler: Option<Arc<dyn Fn(&str) + Send + Sync>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    seed: Option<u64>,
}

impl DataFeed {
    pub fn new() -> Self {
        Self {
            source: None,
            source_name: String::new(),
            handler: None,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            seed: None,
        }
    }

    /// Fixed simulation seed, for reproducible streams.
    pub fn with_seed(seed: u64) -> Self {
        let mut feed = Self::new();
        feed.seed = Some(seed);
        feed
    }

    pub fn set_handler(&mut self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.handler = Some(Arc::new(handler));
    }

    pub fn connect(&mut self, source: &str) -> Result<(), FeedError> {
        if self.source.is_some() {
            return Err(FeedError::AlreadyConnected(self.source_name.clone()));
        }

        let classified = if source.ends_with(".json")
            || source.ends_with(".csv")
            || source.ends_with(".txt")
        {
            File::open(source).map_err(|e| FeedError::UnreadableFile {
                path: source.to_string(),
                source: e,
            })?;
            FeedSource::File(PathBuf::from(source))
        } else if source == "simulation" || source == "random" {
            FeedSource::Simulation
        } else {
            return Err(FeedError::UnknownSource(source.to_string()));
        };

        info!(source, "data feed connected");
        self.source = Some(classified);
        self.source_name = source.to_string();
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), FeedError> {
        let Some(source) = self.source.clone() else {
            return Err(FeedError::NotConnected);
        };
        if self.worker.is_some() || self.running.load(Ordering::SeqCst) {
            return Err(FeedError::AlreadyRunning);
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let handler = self.handler.clone();
        let seed = self.seed;

        self.worker = Some(thread::spawn(move || {
            match source {
                FeedSource::File(path) => replay_file(&path, running, handler),
                FeedSource::Simulation => simulate(seed, running, handler),
            }
        }));
        Ok(())
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    pub fn disconnect(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.stop();
        info!(source = %self.source_name, "data feed disconnected");
        self.source = None;
        self.source_name.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_ref().map(|_| self.source_name.as_str())
    }
}

impl Default for DataFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DataFeed {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn replay_file(
    path: &std::path::Path,
    running: Arc<AtomicBool>,
    handler: Option<Arc<dyn Fn(&str) + Send + Sync>>,
) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            error!(path = %path.display(), error = %e, "file feed failed to open source");
            running.store(false, Ordering::SeqCst);
            return;
        }
    };

    let mut line_count = 0usize;
    for line in BufReader::new(file).lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let Ok(line) = line else { break };
        if !line.is_empty() {
            if let Some(handler) = &handler {
                handler(&line);
            }
        }

        line_count += 1;
        if line_count % 1_000 == 0 {
            info!(line_count, "file feed progress");
        }
        thread::sleep(FILE_PACE);
    }

    info!(line_count, "file feed finished");
    running.store(false, Ordering::SeqCst);
}

fn simulate(
    seed: Option<u64>,
    running: Arc<AtomicBool>,
    handler: Option<Arc<dyn Fn(&str) + Send + Sync>>,
) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut order_id = 0u64;
    while running.load(Ordering::SeqCst) {
        order_id += 1;
        let line = simulated_order(&mut rng, order_id);
        if let Some(handler) = &handler {
            handler(&line);
        }

        if order_id % 50 == 0 {
            info!(generated = order_id, "simulation feed progress");
        }
        thread::sleep(SIM_PACE);
    }
}

// Random LIMIT order around 100.00, in the JSON wire shape the parser reads.
fn simulated_order(rng: &mut StdRng, order_id: u64) -> String {
    let price = Decimal::new(rng.gen_range(9_900..=10_100), 2);
    let quantity: u32 = rng.gen_range(1..=1_000);
    let side = if rng.gen_bool(0.5) { "BUY" } else { "SELL" };

    json!({
        "orderId": order_id,
        "symbol": "AAPL",
        "type": "LIMIT",
        "side": side,
        "price": price,
        "quantity": quantity,
    })
    .to_string()
}
