//! Complaint router
//!
//! Classifies citizen complaints into a responsible department and a
//! severity tier, served over a single HTTP endpoint.

pub mod api;
pub mod config;
pub mod error;
pub mod ml;
pub mod models;

pub use error::{AppError, Result};
