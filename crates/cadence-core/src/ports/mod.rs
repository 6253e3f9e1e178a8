pub mod collection_store;
pub mod reconciliation;

pub use collection_store::{CollectionStore, Collections, FieldChange, FieldChanges, Filter, StoreError};
pub use reconciliation::{CompensationAction, ReconciliationEvent, ReconciliationSink};
