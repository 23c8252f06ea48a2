//! Fixed-size pool of lookup workers.
//!
//! All workers pull from one bounded job queue. Every job carries the reply
//! sender of the batch that submitted it, so results from concurrent callers
//! never mix even though the workers and the queue are shared.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::source::ItemSource;
use crate::types::{FetchJob, FetchResult};

type SharedJobReceiver = Arc<Mutex<mpsc::Receiver<FetchJob>>>;

/// Pool of long-lived workers resolving item IDs through an [`ItemSource`]
///
/// Cloning is cheap and shares the same workers and queue.
#[derive(Clone)]
pub struct WorkerPool {
    jobs: mpsc::Sender<FetchJob>,
    workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
    cancel_token: CancellationToken,
    worker_count: usize,
}

impl WorkerPool {
    /// Launch `worker_count` workers behind a queue holding `queue_capacity` jobs
    ///
    /// Must be called from within a tokio runtime. Both sizes are clamped to
    /// at least 1.
    pub fn start(
        worker_count: usize,
        queue_capacity: usize,
        source: Arc<dyn ItemSource>,
    ) -> Self {
        let worker_count = worker_count.max(1);
        let (jobs, rx) = mpsc::channel(queue_capacity.max(1));
        let rx: SharedJobReceiver = Arc::new(Mutex::new(rx));
        let cancel_token = CancellationToken::new();

        let workers = (0..worker_count)
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    Arc::clone(&rx),
                    Arc::clone(&source),
                    cancel_token.clone(),
                ))
            })
            .collect();

        tracing::info!(worker_count, queue_capacity, "Worker pool started");

        Self {
            jobs,
            workers: Arc::new(Mutex::new(workers)),
            cancel_token,
            worker_count,
        }
    }

    /// Number of workers the pool was started with
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Queue a job, waiting while the queue is full
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShuttingDown`] once the pool has been shut down.
    pub async fn submit(&self, job: FetchJob) -> Result<()> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::ShuttingDown);
        }
        self.jobs.send(job).await.map_err(|_| Error::ShuttingDown)
    }

    /// Stop the workers and wait for them to exit
    ///
    /// A lookup already in flight completes and reports its result; jobs
    /// still queued are dropped, which closes their batch's reply channel.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();

        let handles = std::mem::take(&mut *self.workers.lock().await);
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Worker task failed");
            }
        }

        tracing::info!("Worker pool stopped");
    }
}

async fn run_worker(
    worker: usize,
    jobs: SharedJobReceiver,
    source: Arc<dyn ItemSource>,
    cancel_token: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            _ = cancel_token.cancelled() => break,
            job = next_job(&jobs) => job,
        };
        let Some(job) = job else { break };

        let outcome = source.get_item(job.id).await;
        if let Err(e) = &outcome {
            tracing::debug!(worker, item_id = job.id.0, error = %e, "Item lookup failed");
        }

        // The batch may have given up waiting; its result is no longer needed
        let _ = job
            .reply
            .send(FetchResult {
                rank: job.rank,
                id: job.id,
                outcome,
            })
            .await;
    }

    // Jobs left in the queue are dropped here when the last receiver goes away
    tracing::debug!(worker, "Worker exiting");
}

async fn next_job(jobs: &SharedJobReceiver) -> Option<FetchJob> {
    jobs.lock().await.recv().await
}
