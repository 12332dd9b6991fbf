//! Translate list-endpoint query strings into a storage-agnostic request,
//! and that request into SQL to be run against the database.

pub mod plan;
pub mod query;
