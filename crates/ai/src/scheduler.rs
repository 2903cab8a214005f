use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use tracing::{debug, warn};

use crate::job::AdviceJob;
use crate::result::AdviceError;

/// Bounded pool of scoped worker threads for per-record fan-out.
///
/// Results are written back by input index, so output order never depends on
/// thread scheduling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WorkerPool {
    max_concurrent: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(4)
    }
}

impl WorkerPool {
    /// A pool of at most `max_concurrent` workers (minimum 1).
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run everything on the calling thread.
    pub fn sequential() -> Self {
        Self::new(1)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Apply `f` to every item, returning outputs in input order.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        let workers = self.max_concurrent.min(items.len());
        if workers <= 1 {
            return items.iter().map(f).collect();
        }

        let next = AtomicUsize::new(0);
        let slots: Vec<Mutex<Option<R>>> = items.iter().map(|_| Mutex::new(None)).collect();

        thread::scope(|s| {
            let (next, slots, f) = (&next, &slots, &f);
            for _ in 0..workers {
                s.spawn(move || {
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        if i >= items.len() {
                            break;
                        }
                        let out = f(&items[i]);
                        *slots[i].lock().unwrap_or_else(|p| p.into_inner()) = Some(out);
                    }
                });
            }
        });

        slots
            .into_iter()
            .filter_map(|slot| slot.into_inner().unwrap_or_else(|p| p.into_inner()))
            .collect()
    }
}

/// Scheduler/executor for advice jobs.
///
/// This is intentionally minimal and storage/runtime agnostic.
pub trait AdviceScheduler: Send + Sync + 'static {
    fn pool(&self) -> WorkerPool;

    fn run<J: AdviceJob>(&self, job: J) -> Result<J::Output, AdviceError> {
        let started = Instant::now();
        let out = job.run(self.pool());
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &out {
            Ok(_) => debug!(job = job.name(), elapsed_ms, "advice job finished"),
            Err(e) if e.is_no_data() => {
                debug!(job = job.name(), elapsed_ms, "advice job had no data")
            }
            Err(e) => warn!(job = job.name(), elapsed_ms, error = %e, "advice job failed"),
        }
        out
    }
}

/// Simple synchronous scheduler that runs jobs immediately in-process.
#[derive(Debug, Copy, Clone, Default)]
pub struct LocalAdviceScheduler {
    pool: WorkerPool,
}

impl LocalAdviceScheduler {
    pub fn new(pool: WorkerPool) -> Self {
        Self { pool }
    }

    pub fn with_max_concurrent(max_concurrent: usize) -> Self {
        Self::new(WorkerPool::new(max_concurrent))
    }
}

impl AdviceScheduler for LocalAdviceScheduler {
    fn pool(&self) -> WorkerPool {
        self.pool
    }
}
