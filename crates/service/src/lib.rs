//! Traffic light service layer.
//!
//! Transports call [`upsert_light`], [`get_light`] and [`advance_light`]
//! with a `&dyn UnitOfWork` obtained from [`unit_of_work_for`], using the
//! backend named in [`Settings`].

mod backend;
mod error;
mod lights;
mod settings;

pub use backend::{unit_of_work_for, AVAILABLE_BACKENDS, DEFAULT_BACKEND};
pub use error::ServiceError;
pub use lights::{advance_light, get_light, upsert_light};
pub use settings::Settings;
