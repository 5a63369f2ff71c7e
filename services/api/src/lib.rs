//! services/api/src/lib.rs
//!
//! Library half of the api service. The binaries in `src/bin` and the
//! integration tests both build on these modules.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
