//! # music-cd-batch common library
//!
//! Shared code for the music-cd-batch tools:
//! - Error and result types
//! - TOML configuration loading and resolution
//! - Date helpers used in cataloging fields

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
