//! stoplight-core: traffic light state model.
//!
//! A [`TrafficLight`] cycles green → yellow → red over `total_time` ticks.
//! Its color at any tick is resolved from the signal counter modulo the
//! cycle length, so the counter can grow without bound.
//!
//! # Public API
//!
//! - [`TrafficLight`] -- the entity and its color resolution
//! - [`LightConfig`] -- validated input for building a light
//! - [`Color`], [`LightVariant`], [`SupportedSystem`] -- wire enums
//! - [`LightError`] -- validation and model errors

pub mod color;
pub mod config;
pub mod error;
pub mod light;

pub use color::{Color, LightVariant, SupportedSystem};
pub use config::{parse_duration, LightConfig, Phases};
pub use error::LightError;
pub use light::TrafficLight;
