//! Progress overlay state and the background status watcher behind it.
//!
//! After an upload (or re-enrichment) a watcher thread re-fetches the property
//! every `interval` and publishes the status on a shared [`ProgressBoard`].
//! The overlay fragment reads the board; it never calls the backend itself.

use crate::api::{ApiError, PropertyApi};
use crate::domain::PropertyStatus;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle, Thread};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Overlay captions, cycled on a timer while processing runs.
pub const PHASES: [&str; 4] = [
    "Reading your floor plan",
    "Measuring rooms and features",
    "Gathering market data and comparables",
    "Writing your listing copy",
];

/// How long each caption stays up.
pub const PHASE_LENGTH: Duration = Duration::from_secs(4);

/// Finished entries nobody polled are dropped after this long.
pub const FINISHED_RETENTION: Duration = Duration::from_secs(10 * 60);

pub fn phase_at(elapsed: Duration) -> &'static str {
    let step = elapsed.as_secs() / PHASE_LENGTH.as_secs();
    PHASES[(step % PHASES.len() as u64) as usize]
}

#[derive(Debug, Clone, Copy)]
pub struct WatchConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WatchOutcome {
    Finished(PropertyStatus),
    Cancelled,
    TimedOut,
}

/// What the overlay needs to render one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub status: PropertyStatus,
    pub phase: &'static str,
    pub elapsed: Duration,
    pub finished: bool,
    pub note: Option<String>,
}

struct Entry {
    generation: u64,
    started: Instant,
    status: PropertyStatus,
    finished: bool,
    finished_at: Option<Instant>,
    note: Option<String>,
    cancel: Arc<AtomicBool>,
    thread: Option<Thread>,
}

#[derive(Default)]
struct BoardInner {
    next_generation: u64,
    entries: HashMap<String, Entry>,
}

/// Latest known processing state per property, shared between watcher threads
/// and request handlers.
#[derive(Clone)]
pub struct ProgressBoard {
    inner: Arc<Mutex<BoardInner>>,
    retention: Duration,
}

impl Default for ProgressBoard {
    fn default() -> Self {
        Self::with_retention(FINISHED_RETENTION)
    }
}

impl ProgressBoard {
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            inner: Arc::default(),
            retention,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardInner> {
        // A panicking watcher must not take the overlay down with it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drop entries whose watcher finished more than `retention` ago.
    fn prune(&self, inner: &mut BoardInner) {
        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, e| e.finished_at.map_or(true, |at| at.elapsed() < self.retention));
        let dropped = before - inner.entries.len();
        if dropped > 0 {
            debug!(dropped, "pruned finished progress entries");
        }
    }

    /// Start tracking `id`, cancelling any watcher already tracking it.
    fn register(&self, id: &str, cancel: Arc<AtomicBool>) -> u64 {
        let mut inner = self.lock();
        self.prune(&mut inner);
        inner.next_generation += 1;
        let generation = inner.next_generation;

        let previous = inner.entries.insert(
            id.to_string(),
            Entry {
                generation,
                started: Instant::now(),
                status: PropertyStatus::Processing,
                finished: false,
                finished_at: None,
                note: None,
                cancel,
                thread: None,
            },
        );
        if let Some(prev) = previous {
            signal(&prev);
        }
        generation
    }

    fn attach_thread(&self, id: &str, generation: u64, thread: Thread) {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get_mut(id) {
            if entry.generation == generation {
                entry.thread = Some(thread);
            }
        }
    }

    fn update<F: FnOnce(&mut Entry)>(&self, id: &str, generation: u64, f: F) {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get_mut(id) {
            if entry.generation == generation {
                f(entry);
            }
        }
    }

    pub fn snapshot(&self, id: &str) -> Option<ProgressSnapshot> {
        let mut inner = self.lock();
        self.prune(&mut inner);
        inner.entries.get(id).map(|e| {
            let elapsed = e.started.elapsed();
            ProgressSnapshot {
                status: e.status.clone(),
                phase: phase_at(elapsed),
                elapsed,
                finished: e.finished || e.status.is_terminal(),
                note: e.note.clone(),
            }
        })
    }

    /// Stop the watcher for `id` (if any) and drop its state.
    pub fn cancel(&self, id: &str) -> bool {
        let removed = self.lock().entries.remove(id);
        match removed {
            Some(entry) => {
                signal(&entry);
                true
            }
            None => false,
        }
    }
}

fn signal(entry: &Entry) {
    entry.cancel.store(true, Ordering::SeqCst);
    if let Some(t) = &entry.thread {
        t.unpark();
    }
}

pub struct WatchHandle {
    cancel: Arc<AtomicBool>,
    thread: JoinHandle<WatchOutcome>,
}

impl WatchHandle {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.thread.thread().unpark();
    }

    pub fn join(self) -> WatchOutcome {
        self.thread.join().unwrap_or(WatchOutcome::Cancelled)
    }
}

/// Spawn a watcher polling `id` until it reaches a terminal status, is
/// cancelled, or `config.timeout` elapses.
pub fn spawn_watcher(
    api: Arc<dyn PropertyApi>,
    board: ProgressBoard,
    id: String,
    config: WatchConfig,
) -> WatchHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let generation = board.register(&id, cancel.clone());

    let flag = cancel.clone();
    let thread_board = board.clone();
    let thread_id = id.clone();
    let thread = thread::spawn(move || {
        watch_loop(api.as_ref(), &thread_board, &thread_id, generation, &flag, config)
    });
    board.attach_thread(&id, generation, thread.thread().clone());

    WatchHandle { cancel, thread }
}

fn watch_loop(
    api: &dyn PropertyApi,
    board: &ProgressBoard,
    id: &str,
    generation: u64,
    cancel: &AtomicBool,
    config: WatchConfig,
) -> WatchOutcome {
    let started = Instant::now();
    info!(property_id = id, "status watcher started");

    loop {
        if cancel.load(Ordering::SeqCst) {
            info!(property_id = id, "status watcher cancelled");
            return WatchOutcome::Cancelled;
        }

        match api.get_property(id) {
            Ok(record) => {
                let status = PropertyStatus::parse(record.status.as_deref());
                debug!(property_id = id, status = %status, "status poll");
                let terminal = status.is_terminal();
                board.update(id, generation, |e| {
                    e.status = status.clone();
                    e.note = None;
                    e.finished = terminal;
                    e.finished_at = terminal.then(Instant::now);
                });
                if terminal {
                    info!(property_id = id, status = %status, "status watcher finished");
                    return WatchOutcome::Finished(status);
                }
            }
            // The record can lag the upload response by a moment.
            Err(ApiError::NotFound(_)) => {
                debug!(property_id = id, "property not visible yet");
            }
            Err(e) => {
                warn!(property_id = id, error = %e, "status poll failed");
                let note = e.to_string();
                board.update(id, generation, |entry| entry.note = Some(note));
            }
        }

        if started.elapsed() >= config.timeout {
            warn!(property_id = id, "status watcher timed out");
            board.update(id, generation, |e| {
                e.finished = true;
                e.finished_at = Some(Instant::now());
                e.note = Some("Still processing. Refresh the page later to check again.".into());
            });
            return WatchOutcome::TimedOut;
        }

        if sleep_unless_cancelled(cancel, config.interval) {
            info!(property_id = id, "status watcher cancelled");
            return WatchOutcome::Cancelled;
        }
    }
}

/// Returns true if woken by cancellation.
fn sleep_unless_cancelled(cancel: &AtomicBool, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if cancel.load(Ordering::SeqCst) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::park_timeout(deadline - now);
    }
}
