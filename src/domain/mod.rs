//! Domain layer for the docseek plugin.
//!
//! Core types shared by the interaction model, independent of Zellij APIs.
//!
//! - [`error`]: Error types and result aliases
//! - [`results`]: Search result model

pub mod error;
pub mod results;

pub use error::{DocseekError, ProviderError, Result};
pub use results::{Hit, ResultSet};
