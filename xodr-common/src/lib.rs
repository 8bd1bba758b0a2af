//! Common utilities for the xodr-graph toolkit

pub mod error;

pub use error::{suggest_correction, Error, Result};
