pub mod domain;
pub mod errors;
pub mod outcome;
pub mod ports;
pub mod services;

pub use errors::WorkflowError;
pub use outcome::Outcome;
pub use services::{CoordinatorOptions, RelationshipCoordinator};
