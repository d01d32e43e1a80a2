//! # gluco-core
//!
//! Core types, constants, and errors for the glucocast forecasting service.
//!
//! This crate provides:
//! - The fixed shape of the model artifacts (`WINDOW_LEN`, `NUM_FEATURES`, ...)
//! - Domain types: `ReadingWindow`, `Forecast`
//! - The shared `Error` / `Result` types
//!
//! ## Example
//!
//! ```rust
//! use gluco_core::types::ReadingWindow;
//!
//! let window = ReadingWindow::new(vec![
//!     100.0, 102.0, 105.0, 107.0, 110.0, 108.0, 106.0, 104.0, 103.0, 101.0,
//! ])
//! .unwrap();
//! assert_eq!(window.len(), 10);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{Error, Result};
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::error::{Error, Result};
    pub use crate::types::*;
}
