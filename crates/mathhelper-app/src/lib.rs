//! mathhelper-app: Equation list orchestration for Math Helper.
//! Provides:
//!   - the list orchestrator (initial fetch, error state with retry, filtered view)
//!   - mutation actions (create, delete, add solution) with local patching
//!   - user notices on a broadcast channel
//!   - plain-text card rendering for the command-line front-end

pub mod actions;
pub mod list;
pub mod render;
pub mod state;

pub use actions::{ActionError, SolutionOutcome, SolutionTicket};
pub use list::EquationList;
pub use state::{ListState, Notice};
