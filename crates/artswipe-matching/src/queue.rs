//! Background match checks.
//!
//! A fixed set of worker tasks drain one bounded queue of match checks. The
//! sender side is cheap to clone into request handlers; enqueueing never
//! waits for a worker, and nothing a worker does is reported back to the
//! request that enqueued it.

use std::sync::Arc;
use std::time::Duration;

use artswipe_types::{UserId, WorkId};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::detector::MatchDetector;

/// Configuration for the match worker pool
#[derive(Debug, Clone, Copy)]
pub struct MatchQueueConfig {
    /// Number of worker tasks
    pub workers: usize,
    /// Maximum queued checks. Up to as many again wait in deferred sends;
    /// past that, checks are dropped.
    pub capacity: usize,
}

impl Default for MatchQueueConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MatchJob {
    from: UserId,
    to_work: WorkId,
}

/// Where an enqueued check ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    Queued,
    /// The queue was full; a detached task is waiting for room.
    Deferred,
    /// Queue and deferred sends were both full, or the queue is closed.
    Dropped,
}

/// Sending half of the match worker pool.
#[derive(Clone)]
pub struct MatchQueue {
    tx: mpsc::Sender<MatchJob>,
    /// Bounds the detached sends spawned while the queue is full.
    spill: Arc<Semaphore>,
}

/// Join handles of the match workers, used to drain on shutdown.
pub struct MatchWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl MatchQueue {
    /// Spawns the workers on the current tokio runtime.
    pub fn start(detector: MatchDetector, config: MatchQueueConfig) -> (Self, MatchWorkers) {
        let capacity = config.capacity.max(1);
        let (tx, rx) = mpsc::channel::<MatchJob>(capacity);
        let rx = Arc::new(Mutex::new(rx));
        let worker_count = config.workers.max(1);

        info!(
            "Starting match queue with {} workers (capacity {})",
            worker_count, capacity
        );

        let handles = (0..worker_count)
            .map(|i| tokio::spawn(run_worker(i, detector.clone(), rx.clone())))
            .collect();

        let spill = Arc::new(Semaphore::new(capacity));
        (Self { tx, spill }, MatchWorkers { handles })
    }

    /// Schedules a match check for a like that was just persisted.
    pub fn enqueue(&self, from: UserId, to_work: WorkId) -> Enqueued {
        let job = MatchJob { from, to_work };

        match self.tx.try_send(job) {
            Ok(()) => {
                debug!("Queued match check {} -> {}", from, to_work);
                Enqueued::Queued
            }
            Err(TrySendError::Full(job)) => {
                let Ok(permit) = self.spill.clone().try_acquire_owned() else {
                    warn!("Match queue overloaded, dropped check {} -> {}", from, to_work);
                    return Enqueued::Dropped;
                };

                warn!("Match queue full, deferring check {} -> {}", from, to_work);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if tx.send(job).await.is_err() {
                        warn!(
                            "Match queue closed, dropped check {} -> {}",
                            job.from, job.to_work
                        );
                    }
                    drop(permit);
                });
                Enqueued::Deferred
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Match queue closed, dropped check {} -> {}", from, to_work);
                Enqueued::Dropped
            }
        }
    }
}

impl MatchWorkers {
    /// Waits for the workers to finish every queued check.
    ///
    /// Workers exit once all [`MatchQueue`] clones are dropped and the queue
    /// is empty, so drop the senders first. Workers still running after
    /// `timeout` are aborted.
    pub async fn drain(self, timeout: Duration) {
        let mut handles = self.handles;

        let wait_all = async {
            for handle in handles.iter_mut() {
                if let Err(e) = handle.await {
                    error!("Match worker exited abnormally: {}", e);
                }
            }
        };
        let timed_out = tokio::time::timeout(timeout, wait_all).await.is_err();

        if timed_out {
            warn!("Match queue did not drain within {:?}, aborting workers", timeout);
            for handle in &handles {
                handle.abort();
            }
        } else {
            info!("Match queue drained");
        }
    }
}

async fn run_worker(
    worker_id: usize,
    detector: MatchDetector,
    rx: Arc<Mutex<mpsc::Receiver<MatchJob>>>,
) {
    debug!("Match worker {} started", worker_id);

    loop {
        let job = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };
        let Some(job) = job else {
            break;
        };

        // rusqlite calls block; keep them off the async workers.
        let detector = detector.clone();
        let result = tokio::task::spawn_blocking(move || {
            detector.check_and_create_match(job.from, job.to_work)
        })
        .await;

        if let Err(e) = result {
            error!(
                "Match worker {} check {} -> {} panicked: {}",
                worker_id, job.from, job.to_work, e
            );
        }
    }

    debug!("Match worker {} stopped", worker_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::SwipeRecorder;
    use crate::testing::{db, match_count, user, work};

    #[tokio::test]
    async fn drain_finishes_queued_checks() {
        let db = db();
        let a = user(&db, "alice");
        let b = user(&db, "bob");
        let wa = work(&db, a, "works/a.png");
        let wb = work(&db, b, "works/b.png");

        let recorder = SwipeRecorder::new(db.clone());
        recorder.record_swipe(a, wb, true).unwrap();
        recorder.record_swipe(b, wa, true).unwrap();

        let (queue, workers) = MatchQueue::start(
            MatchDetector::new(db.clone()),
            MatchQueueConfig {
                workers: 2,
                capacity: 8,
            },
        );
        for _ in 0..5 {
            queue.enqueue(b, wa);
            queue.enqueue(a, wb);
        }
        drop(queue);

        workers.drain(Duration::from_secs(5)).await;
        assert_eq!(match_count(&db, a, b), 1);
    }

    #[tokio::test]
    async fn overflow_is_deferred_not_dropped() {
        let db = db();
        let a = user(&db, "alice");
        let b = user(&db, "bob");
        let wa = work(&db, a, "works/a.png");
        let wb = work(&db, b, "works/b.png");

        let recorder = SwipeRecorder::new(db.clone());
        recorder.record_swipe(a, wb, true).unwrap();
        recorder.record_swipe(b, wa, true).unwrap();

        let (queue, workers) = MatchQueue::start(
            MatchDetector::new(db.clone()),
            MatchQueueConfig {
                workers: 1,
                capacity: 2,
            },
        );
        // Workers have not run yet; the junk checks fill the queue.
        assert_eq!(queue.enqueue(a, WorkId::new()), Enqueued::Queued);
        assert_eq!(queue.enqueue(a, WorkId::new()), Enqueued::Queued);
        assert_eq!(queue.enqueue(a, WorkId::new()), Enqueued::Deferred);
        assert_eq!(queue.enqueue(b, wa), Enqueued::Deferred);
        drop(queue);

        workers.drain(Duration::from_secs(5)).await;
        assert_eq!(match_count(&db, a, b), 1);
    }

    #[tokio::test]
    async fn deferred_sends_are_bounded() {
        let db = db();
        let (queue, workers) = MatchQueue::start(
            MatchDetector::new(db.clone()),
            MatchQueueConfig {
                workers: 1,
                capacity: 1,
            },
        );
        let from = UserId::new();

        assert_eq!(queue.enqueue(from, WorkId::new()), Enqueued::Queued);
        assert_eq!(queue.enqueue(from, WorkId::new()), Enqueued::Deferred);
        for _ in 0..10 {
            assert_eq!(queue.enqueue(from, WorkId::new()), Enqueued::Dropped);
        }
        drop(queue);

        workers.drain(Duration::from_secs(5)).await;
    }
}
