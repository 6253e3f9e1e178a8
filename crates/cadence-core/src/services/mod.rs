pub mod id_generator;
pub mod owner_locks;
pub mod profile_composer;
pub mod relationship_coordinator;
pub mod saga;

pub use id_generator::{IdGenerator, IdScheme};
pub use owner_locks::OwnerLocks;
pub use profile_composer::{ProfileComposer, Relation, UserProfile};
pub use relationship_coordinator::{CoordinatorOptions, RelationshipCoordinator};
pub use saga::{Compensation, Saga, Step, StepKind};
