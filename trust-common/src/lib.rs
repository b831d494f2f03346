//! # TRUST Common Library
//!
//! Shared code for the TRUST chart service including:
//! - Database models and the profile store adapter
//! - Growth engine (support-action state transition)
//! - Access gate (private content visibility)
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod growth;

pub use error::{Error, Result};
