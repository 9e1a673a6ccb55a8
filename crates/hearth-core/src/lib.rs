//! # hearth-core
//!
//! Core types, traits, and abstractions for the hearth listing service.
//!
//! This crate provides the domain model (properties, filter criteria,
//! accounts/profiles), the pure filter predicate engine, listing form
//! validation, and the map marker projection that other hearth crates
//! depend on.

pub mod defaults;
pub mod error;
pub mod filter;
pub mod logging;
pub mod markers;
pub mod models;
pub mod seed;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use markers::{Marker, MarkerSet};
pub use models::*;
pub use traits::*;
pub use validation::{validate_property_input, FieldError};
