//! mathhelper-filters: Display filtering for the equation list.
//!
//! `Filters` holds one field per criterion and only changes through
//! `Filters::apply`; the predicates read it and never mutate anything.

pub mod filters;
pub mod predicates;

pub use filters::{CountRange, FilterUpdate, Filters};
pub use predicates::{matches, solutions_count_ceiling, visible};
