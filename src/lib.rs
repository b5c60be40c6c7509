mod config;
mod domain;
mod error;
mod guard;
mod registry;
mod store;
mod validation;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub mod telemetry;

pub use config::{ConfigError, RegistryConfig, StorageConfig};
pub use domain::{
    Course, CourseId, Department, DepartmentFields, DepartmentId, InstructorId, NewDepartment,
    Record,
};
pub use error::RegistryError;
pub use guard::{ConcurrencyGuard, DeleteOutcome, DeletionGuard, UpdateOutcome};
pub use registry::{Registry, UpdateDepartment};
#[cfg(feature = "sqlite")]
pub use store::SqliteEntityStore;
pub use store::{EntityStore, GuardedDelete, InMemoryEntityStore, StoreError};
pub use validation::{FieldError, ValidationError};
