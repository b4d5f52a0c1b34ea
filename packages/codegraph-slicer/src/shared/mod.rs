//! Shared module - IR models, constants and utilities used by all features

pub mod constants;
pub mod models;
pub mod utils;
