//! Shared helpers: parameter validation and cache-directory configuration.

pub mod cache;
pub mod validation;
