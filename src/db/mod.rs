//! Database access for the directory tables

pub mod queries;

pub use queries::*;
