use tracing::{info, warn};

use crate::{
    error::RecordCreationError,
    integrations::github::IssueTracker,
    models::{BatchResult, CollectionRef, CreatedRecord, Outcome, RecordPayload},
};

/// One request, no retry.
pub async fn create<T: IssueTracker + ?Sized>(
    tracker: &T,
    collection: &CollectionRef,
    payload: &RecordPayload,
) -> Result<CreatedRecord, RecordCreationError> {
    tracker.create_issue(collection, payload).await
}

/// Creates every payload in order, one at a time. A failed payload is recorded
/// and the loop moves on to the next one.
pub async fn create_all<T: IssueTracker + ?Sized>(
    tracker: &T,
    collection: &CollectionRef,
    payloads: &[RecordPayload],
) -> BatchResult {
    let mut result = BatchResult::with_capacity(payloads.len());

    for (i, payload) in payloads.iter().enumerate() {
        let outcome = match create(tracker, collection, payload).await {
            Ok(record) => {
                info!("created {collection}#{} ({})", record.number, record.url);
                Outcome::Created(record)
            }
            Err(e) => {
                warn!("issue {} '{}' failed: {e}", i + 1, payload.title);
                Outcome::Failed(e)
            }
        };
        result.push(payload.clone(), outcome);
    }

    result
}
