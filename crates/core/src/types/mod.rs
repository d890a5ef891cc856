//! Core types for CanineRacks.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod status;

pub use category::{CategoryError, MainCategory, SubCategory};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
