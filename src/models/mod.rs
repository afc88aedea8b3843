pub mod batch;
pub mod record;

pub use batch::{BatchRequest, BatchResult, Outcome};
pub use record::{CollectionRef, CreatedRecord, Credential, RecordPayload};
