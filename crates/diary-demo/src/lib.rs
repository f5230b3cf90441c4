//! # Diary Demo
//!
//! Runnable scenarios and a small HTTP server showing request dispatch over
//! an in-memory users feature.

pub mod error;
pub mod scenarios;
pub mod server;
pub mod users;

pub use error::{DemoError, DemoResult};
pub use scenarios::{Harness, Scenario};
