//! DTO modules that bridge the list core, services and APIs.

pub mod api;
pub mod query;
