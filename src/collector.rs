//! Order-preserving result collection for one batch of lookups.

use chrono::Utc;
use tokio::sync::mpsc;

use crate::pool::WorkerPool;
use crate::types::{FetchJob, FetchResult, ItemId, RankedStory, Story};

/// Resolve a batch of `(id, rank)` pairs and return the qualifying stories
/// sorted by rank
///
/// All jobs are submitted before any result is read; the reply channel is
/// sized to the batch so workers never wait on this collector. Results are
/// gathered until every job has reported or the pool has gone away, so a
/// shut-down pool yields a short list rather than a hang.
///
/// Lookup failures and records that are not linked stories are dropped.
pub async fn collect(pool: &WorkerPool, batch: &[(ItemId, usize)]) -> Vec<RankedStory> {
    if batch.is_empty() {
        return Vec::new();
    }

    let (reply, mut results) = mpsc::channel::<FetchResult>(batch.len());

    let mut submitted = 0;
    for &(id, rank) in batch {
        let job = FetchJob {
            id,
            rank,
            reply: reply.clone(),
        };
        if let Err(e) = pool.submit(job).await {
            tracing::warn!(item_id = id.0, error = %e, "Could not queue item lookup");
            break;
        }
        submitted += 1;
    }
    // Only in-flight jobs hold senders now, so `recv` ends if they are dropped
    drop(reply);

    let mut received = Vec::with_capacity(submitted);
    while received.len() < submitted {
        match results.recv().await {
            Some(result) => received.push(result),
            None => {
                tracing::warn!(
                    expected = submitted,
                    received = received.len(),
                    "Worker pool closed before the batch completed"
                );
                break;
            }
        }
    }

    received.sort_by_key(|r| r.rank);

    let observed_at = Utc::now();
    received
        .into_iter()
        .filter_map(|result| match result.outcome {
            Ok(record) => Story::from_record(record, observed_at).map(|story| RankedStory {
                rank: result.rank,
                story,
            }),
            Err(e) => {
                tracing::debug!(item_id = result.id.0, rank = result.rank, error = %e, "Skipping failed lookup");
                None
            }
        })
        .collect()
}
