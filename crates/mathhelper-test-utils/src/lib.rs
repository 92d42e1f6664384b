//! Test utilities for the Math Helper workspace

mod fixtures;
mod mock_gateway;

pub use fixtures::{quadratic, sample_equations, seeded_gateway};
pub use mock_gateway::{Call, MockGateway};
