//! Background resource loading
//!
//! A fixed set of worker threads pulls load jobs from a shared channel.
//! Every job fills exactly one [`Resource`](super::Resource) and publishes
//! its new state; the main thread only ever polls those states.
//!
//! Cancelling the pool drops the jobs that have not started yet and puts
//! their resources back to `Unloaded`. Jobs already running are left to
//! finish on their own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{Handle, ResourceError};
use crate::config::LoaderConfig;

/// A queued load; the flag tells it whether the pool was cancelled
struct Job {
    name: String,
    run: Box<dyn FnOnce(bool) + Send + 'static>,
}

struct Worker {
    id: usize,
    thread: thread::JoinHandle<()>,
}

impl Worker {
    fn spawn(id: usize, receiver: Receiver<Job>, cancelled: Arc<AtomicBool>) -> Result<Self, ResourceError> {
        let thread = thread::Builder::new()
            .name(format!("loader-{id}"))
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    let cancel = cancelled.load(Ordering::Acquire);
                    log::trace!("loader-{id}: {} {}", if cancel { "dropping" } else { "loading" }, job.name);
                    (job.run)(cancel);
                }
            })?;
        Ok(Self { id, thread })
    }
}

/// Worker pool for resource loads
pub struct LoaderPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
    /// Kept so `cancel` can drain jobs no worker has picked up
    receiver: Receiver<Job>,
    cancelled: Arc<AtomicBool>,
    multithread: bool,
}

impl LoaderPool {
    /// Create a pool with `worker_count` threads
    ///
    /// With `multithread` false no threads are started and every job runs
    /// on the thread that enqueues it.
    pub fn new(worker_count: usize, multithread: bool) -> Result<Self, ResourceError> {
        let (sender, receiver) = unbounded();
        let cancelled = Arc::new(AtomicBool::new(false));

        let workers = if multithread {
            (0..worker_count.max(1))
                .map(|id| Worker::spawn(id, receiver.clone(), Arc::clone(&cancelled)))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        log::debug!("Loader pool started with {} workers", workers.len());
        Ok(Self {
            workers,
            sender: Some(sender),
            receiver,
            cancelled,
            multithread,
        })
    }

    /// Create a pool from the loader section of the engine config
    pub fn from_config(config: &LoaderConfig) -> Result<Self, ResourceError> {
        Self::new(config.worker_count, config.multithread)
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Whether jobs run on worker threads
    pub fn is_multithreaded(&self) -> bool {
        self.multithread
    }

    /// Whether `cancel` has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Queue a load for `handle`
    ///
    /// The resource moves to `Loading` immediately. Returns false when the
    /// resource is already loading or loaded, or the pool was cancelled.
    pub fn enqueue<T, F>(&self, handle: &Handle<T>, load: F) -> bool
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T, ResourceError> + Send + 'static,
    {
        if self.is_cancelled() {
            log::warn!("Loader pool cancelled, not queueing {}", handle.name());
            return false;
        }
        if !handle.try_begin_loading() {
            return false;
        }

        let resource = Arc::clone(handle);
        let job = Job {
            name: handle.name().to_string(),
            run: Box::new(move |cancelled| {
                if cancelled {
                    resource.reset();
                    return;
                }
                match load() {
                    Ok(data) => resource.complete(data),
                    Err(err) => {
                        log::warn!("Failed to load {}: {err}", resource.name());
                        resource.fail(err.to_string());
                    }
                }
            }),
        };

        match &self.sender {
            Some(sender) if self.multithread => {
                if let Err(err) = sender.send(job) {
                    // Workers are gone; run here so the resource never sticks in Loading
                    (err.into_inner().run)(false);
                }
            }
            _ => (job.run)(false),
        }
        true
    }

    /// Stop loading
    ///
    /// Queued jobs are discarded and their resources reset to `Unloaded`
    /// before this returns. Running jobs complete normally. Later calls to
    /// [`enqueue`](Self::enqueue) are refused.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        let mut dropped = 0;
        while let Ok(job) = self.receiver.try_recv() {
            (job.run)(true);
            dropped += 1;
        }
        log::debug!("Loader pool cancelled, {dropped} queued jobs dropped");
    }
}

impl Drop for LoaderPool {
    fn drop(&mut self) {
        // Closing the channel ends the worker loops once the queue is empty
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if worker.thread.join().is_err() {
                log::error!("Loader worker {} panicked", worker.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoadState, Resource};
    use crossbeam_channel::bounded;
    use std::time::Duration;

    fn wait_until(mut done: impl FnMut() -> bool) {
        for _ in 0..500 {
            if done() {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("timed out waiting for loader");
    }

    #[test]
    fn test_inline_loading() {
        let pool = LoaderPool::new(5, false).unwrap();
        assert_eq!(pool.worker_count(), 0);

        let handle = Arc::new(Resource::<u32>::new("answer"));
        assert!(pool.enqueue(&handle, || Ok(42)));
        assert_eq!(*handle.data().unwrap(), 42);
        assert!(!pool.enqueue(&handle, || Ok(0)));
    }

    #[test]
    fn test_threaded_loading_completes() {
        let pool = LoaderPool::new(3, true).unwrap();
        let handles: Vec<_> = (0..10u32)
            .map(|i| {
                let handle = Arc::new(Resource::<u32>::new(format!("r{i}")));
                pool.enqueue(&handle, move || Ok(i * 2));
                handle
            })
            .collect();

        wait_until(|| handles.iter().all(|h| h.is_loaded()));
        assert_eq!(*handles[7].data().unwrap(), 14);
    }

    #[test]
    fn test_failed_load_is_reported() {
        let pool = LoaderPool::new(1, false).unwrap();
        let handle = Arc::new(Resource::<u32>::new("broken"));
        pool.enqueue(&handle, || Err(ResourceError::NotFound("broken.obj".to_string())));
        assert_eq!(handle.state(), LoadState::Failed);
    }

    #[test]
    fn test_cancel_resets_queued_resources() {
        let pool = LoaderPool::new(1, true).unwrap();
        let (started_tx, started_rx) = bounded(1);
        let (release_tx, release_rx) = bounded::<()>(1);

        let running = Arc::new(Resource::<u32>::new("running"));
        pool.enqueue(&running, move || {
            started_tx.send(()).ok();
            release_rx.recv().ok();
            Ok(1)
        });
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let queued: Vec<_> = (0..3)
            .map(|i| {
                let handle = Arc::new(Resource::<u32>::new(format!("queued{i}")));
                pool.enqueue(&handle, || Ok(0));
                handle
            })
            .collect();
        assert!(queued.iter().all(|h| h.state() == LoadState::Loading));

        pool.cancel();
        assert!(queued.iter().all(|h| h.state() == LoadState::Unloaded));
        assert_eq!(running.state(), LoadState::Loading);

        // The running job is not interrupted
        release_tx.send(()).unwrap();
        wait_until(|| running.is_loaded());

        let late = Arc::new(Resource::<u32>::new("late"));
        assert!(!pool.enqueue(&late, || Ok(0)));
        assert_eq!(late.state(), LoadState::Unloaded);
    }
}
