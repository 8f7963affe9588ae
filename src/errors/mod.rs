//! # Error Handling
//!
//! This module provides error handling for the flotilla control plane.
//! It defines custom error types using `thiserror`.

mod types;

pub use types::{Error, Result};
