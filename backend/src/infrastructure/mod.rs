pub mod logging;
pub mod reconciliation;
