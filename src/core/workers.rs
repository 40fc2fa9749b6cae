//! Background thread pool for clip decoding.
//!
//! A global crossbeam injector feeds a handful of named worker threads.
//! Decode jobs are one-shot per clip, so there is no per-worker deque or
//! stealing here - workers pull from the shared queue until shutdown.

use crossbeam::deque::Injector;
use log::trace;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Worker pool; joins its threads on drop.
pub struct Workers {
    injector: Arc<Injector<Job>>,
    handles: Vec<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Workers {
    /// Spawn `num_threads` workers (at least one).
    pub fn new(num_threads: usize) -> Self {
        let injector: Arc<Injector<Job>> = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::new();

        for worker_id in 0..num_threads.max(1) {
            let injector = Arc::clone(&injector);
            let shutdown = Arc::clone(&shutdown);

            let handle = thread::Builder::new()
                .name(format!("showreel-worker-{}", worker_id))
                .spawn(move || {
                    trace!("Worker {} started", worker_id);
                    loop {
                        if let Some(job) = injector.steal().success() {
                            job();
                            continue;
                        }
                        if shutdown.load(Ordering::Relaxed) {
                            break;
                        }
                        // Idle - short sleep instead of spinning
                        thread::sleep(std::time::Duration::from_millis(1));
                    }
                    trace!("Worker {} stopped", worker_id);
                })
                .expect("Failed to spawn worker thread");

            handles.push(handle);
        }

        trace!("Workers initialized: {} threads", num_threads.max(1));
        Self {
            injector,
            handles,
            shutdown,
        }
    }

    /// Queue a job for execution on a worker thread.
    pub fn execute<F: FnOnce() + Send + 'static>(&self, job: F) {
        self.injector.push(Box::new(job));
    }

    /// Jobs still waiting for a worker.
    pub fn pending(&self) -> usize {
        self.injector.len()
    }
}

impl Drop for Workers {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::{Duration, Instant};

    #[test]
    fn test_jobs_run_on_workers() {
        let workers = Workers::new(2);
        let count = Arc::new(AtomicU32::new(0));

        for _ in 0..8 {
            let c = Arc::clone(&count);
            workers.execute(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 8 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(count.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_drop_joins_idle_pool() {
        let workers = Workers::new(1);
        drop(workers); // must not hang
    }
}
