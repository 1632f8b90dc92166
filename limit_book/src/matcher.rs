use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::book::OrderBook;
use crate::order::{Order, OrderId, OrderType};

enum Intent {
    Submit(Order),
    Cancel(OrderId),
}

struct InboxState {
    queue: VecDeque<Intent>,
    running: bool,
}

// Queue and running flag live under one mutex so a shutdown wakeup can
// never race past a sleeping worker.
struct Inbox {
    state: Mutex<InboxState>,
    ready: Condvar,
}

/// Serializing ingress: any number of producers may `submit`; one worker
/// thread drains the inbox in arrival order and owns every book mutation.
///
/// The single worker is what gives the total order on book mutations and
/// the arrival-stamp monotonicity the price-time discipline relies on.
/// A stopped matcher is not reusable; intents submitted after `stop` are
/// never processed.
pub struct Matcher {
    book: Arc<OrderBook>,
    inbox: Arc<Inbox>,
    worker: Mutex<Option<JoinHandle<()>>>,
    // Set by the first stop(); STOPPED is terminal, so start() refuses after.
    stopped: AtomicBool,
    processed: Arc<AtomicU64>,
}

impl Matcher {
    pub fn new(book: Arc<OrderBook>) -> Self {
        Self {
            book,
            inbox: Arc::new(Inbox {
                state: Mutex::new(InboxState {
                    queue: VecDeque::new(),
                    running: false,
                }),
                ready: Condvar::new(),
            }),
            worker: Mutex::new(None),
            stopped: AtomicBool::new(false),
            processed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn start(&self) {
        let mut worker = self.worker.lock().unwrap();
        if self.stopped.load(Ordering::SeqCst) {
            warn!("matcher already stopped");
            return;
        }
        if worker.is_some() {
            warn!("matcher already running");
            return;
        }
        self.inbox.state.lock().unwrap().running = true;

        let book = Arc::clone(&self.book);
        let inbox = Arc::clone(&self.inbox);
        let processed = Arc::clone(&self.processed);
        *worker = Some(thread::spawn(move || run_worker(book, inbox, processed)));
    }

    /// Enqueue one intent. CANCEL orders become targeted cancels; stored-but-
    /// untriggered types and invalid orders are dropped at this boundary.
    pub fn submit(&self, order: Order) {
        let intent = match order.order_type {
            OrderType::Cancel => Intent::Cancel(order.order_id),
            OrderType::Stop | OrderType::StopLimit | OrderType::Modify => {
                warn!(order_id = order.order_id, order_type = %order.order_type,
                      "unsupported order type rejected");
                return;
            }
            OrderType::Limit | OrderType::Market => {
                if !order.is_valid() {
                    warn!(order_id = order.order_id, "invalid order rejected");
                    return;
                }
                Intent::Submit(order)
            }
        };

        let mut state = self.inbox.state.lock().unwrap();
        state.queue.push_back(intent);
        drop(state);
        self.inbox.ready.notify_one();
    }

    /// Stop accepting work and join the worker. Intents already queued are
    /// drained before the worker exits; the matcher cannot be restarted.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.inbox.state.lock().unwrap().running = false;
        self.inbox.ready.notify_all();
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    pub fn processed_orders(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }
}

fn run_worker(book: Arc<OrderBook>, inbox: Arc<Inbox>, processed: Arc<AtomicU64>) {
    loop {
        let intent = {
            let mut state = inbox.state.lock().unwrap();
            loop {
                if let Some(intent) = state.queue.pop_front() {
                    break Some(intent);
                }
                if !state.running {
                    break None;
                }
                state = inbox.ready.wait(state).unwrap();
            }
        };

        match intent {
            Some(Intent::Submit(order)) => {
                let order_id = order.order_id;
                book.add(order);
                debug!(order_id, "order processed");
            }
            Some(Intent::Cancel(order_id)) => {
                book.cancel(order_id);
                debug!(order_id, "cancel processed");
            }
            None => break,
        }
        processed.fetch_add(1, Ordering::Relaxed);
    }
}
