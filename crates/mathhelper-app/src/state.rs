//! List state, local patches and user notices.

use mathhelper_common::{Equation, EquationId};
use serde::Serialize;
use std::collections::HashMap;

/// Lifecycle of the held collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// Before the first fetch has resolved.
    Empty,
    /// Collection present; may filter down to nothing.
    Loaded(Vec<Equation>),
    /// The last fetch failed; `reload` retries.
    Error(String),
}

impl ListState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ListState::Loaded(_))
    }

    pub fn equations(&self) -> &[Equation] {
        match self {
            ListState::Loaded(equations) => equations,
            _ => &[],
        }
    }
}

/// Events pushed to whatever renders the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    Loaded { count: usize },
    LoadFailed { message: String },
    Created { id: EquationId, equation: String },
    CreateRejected { message: String },
    Deleted { id: EquationId },
    DeleteFailed { id: EquationId, message: String },
    SolutionAdded { id: EquationId, value: f64 },
    SolutionRejected { id: EquationId, value: f64 },
    ActionFailed { message: String },
}

/// A local change mirroring one the server already accepted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Patch {
    Prepend(Equation),
    Remove(EquationId),
    AppendSolution { id: EquationId, value: f64 },
}

impl Patch {
    /// Applies the patch; returns false when it targeted a missing record.
    ///
    /// A replay runs against a freshly fetched collection that may already
    /// contain the change, so it skips solutions that are already present.
    pub(crate) fn apply(&self, equations: &mut Vec<Equation>, replay: bool) -> bool {
        match self {
            Patch::Prepend(equation) => {
                equations.retain(|e| e.id != equation.id);
                equations.insert(0, equation.clone());
                true
            }
            Patch::Remove(id) => {
                let before = equations.len();
                equations.retain(|e| e.id != *id);
                equations.len() != before
            }
            Patch::AppendSolution { id, value } => {
                match equations.iter_mut().find(|e| e.id == *id) {
                    Some(equation) => {
                        if !(replay && equation.solutions.contains(value)) {
                            equation.solutions.push(*value);
                        }
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

/// Everything behind the orchestrator's lock.
#[derive(Debug)]
pub(crate) struct ListInner {
    pub state: ListState,
    pub loads_in_flight: usize,
    /// Patches to replay once the in-flight load lands.
    pub pending: Vec<Patch>,
    /// Open solution inputs: equation id -> ticket generation.
    pub inputs: HashMap<EquationId, u64>,
    pub next_ticket: u64,
}

impl Default for ListInner {
    fn default() -> Self {
        Self {
            state: ListState::Empty,
            loads_in_flight: 0,
            pending: Vec::new(),
            inputs: HashMap::new(),
            next_ticket: 1,
        }
    }
}

impl ListInner {
    /// Applies `patch` now if the collection is loaded and keeps it for
    /// replay while a load is in flight.
    ///
    /// Returns false when a loaded collection lacked the target record, or
    /// when there is neither a collection nor a load to replay onto. The
    /// next fetch reflects the server in that case.
    pub fn patch(&mut self, patch: Patch) -> bool {
        let applied = match &mut self.state {
            ListState::Loaded(equations) => patch.apply(equations, false),
            _ => self.loads_in_flight > 0,
        };
        if self.loads_in_flight > 0 {
            self.pending.push(patch);
        }
        applied
    }

    /// Installs a fetched collection and replays pending patches onto it.
    pub fn finish_load(&mut self, mut equations: Vec<Equation>) {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        for patch in &self.pending {
            patch.apply(&mut equations, true);
        }
        if self.loads_in_flight == 0 {
            self.pending.clear();
        }
        self.state = ListState::Loaded(equations);
    }

    /// Records a failed fetch. A collection that is already loaded stays.
    ///
    /// Pending patches are dropped with the last in-flight load: a loaded
    /// collection already carries them and the next fetch sees them on the
    /// server.
    pub fn fail_load(&mut self, message: String) {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        if self.loads_in_flight == 0 {
            self.pending.clear();
        }
        if !self.state.is_loaded() {
            self.state = ListState::Error(message);
        }
    }
}
