//! Light repository and unit-of-work abstractions.
//!
//! [`LightRepository`] stores lights by id. [`UnitOfWork`] opens
//! [`Transaction`] scopes around repository calls; a scope that is dropped
//! without [`Transaction::commit`] is rolled back.
//!
//! [`memory`] holds the in-memory backend. [`conformance`] is the suite every
//! backend is expected to pass.

pub mod conformance;
mod error;
pub mod memory;
mod traits;

pub use error::{ScopeState, StorageError};
pub use memory::{InMemoryLightRepository, InMemoryUnitOfWork, ScopeStats};
pub use traits::{LightRepository, LightUpdate, Transaction, UnitOfWork};
