//! mathhelper-common: Shared types, errors and configuration used across all Math Helper crates.

pub mod config;
pub mod error;
pub mod models;
pub mod number;
pub mod sandbox;

// Re-export commonly used types
pub use config::Config;
pub use error::{MathHelperError, Result};
pub use models::{Equation, EquationId, NewEquation, RationalForm};
