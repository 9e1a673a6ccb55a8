//! HTTP handler modules for hearth-api.

pub mod auth;
pub mod map;
pub mod profiles;
pub mod properties;
