//! Core library for the task service
//!
//! This crate contains the persistence-facing side of the service:
//! - Task model and input records
//! - List queries (filter, sort, pagination)
//! - Repository trait and the JSON document store

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
