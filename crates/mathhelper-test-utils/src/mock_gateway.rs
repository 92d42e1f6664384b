//! Scripted in-memory gateway for orchestrator tests

use async_trait::async_trait;
use mathhelper_common::{Equation, EquationId};
use mathhelper_gateway::{
    CreateOutcome, DeleteOutcome, EquationGateway, GatewayError, ListQuery, Result,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A gateway call as the mock received it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchAll(ListQuery),
    FetchById(EquationId),
    FetchByLocation(String),
    Create(String),
    Delete(EquationId),
    TryAddSolution(EquationId, f64),
}

#[derive(Default)]
struct MockState {
    equations: Vec<Equation>,
    roots: HashMap<EquationId, Vec<f64>>,
    next_id: EquationId,
    list_failures: usize,
    create_rejection: Option<String>,
    calls: Vec<Call>,
}

/// Mock gateway holding the "server side" collection in memory.
///
/// `hold_list` and `hold_add_solution` make the matching calls wait until
/// the returned `Notify` fires, which lets tests interleave other actions
/// with an in-flight request.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
    list_gate: Mutex<Option<Arc<Notify>>>,
    solution_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockGateway {
    /// Create an empty mock; created records get ids from 100 upwards
    pub fn new() -> Self {
        let gateway = Self::default();
        gateway.state.lock().unwrap().next_id = 100;
        gateway
    }

    /// Add a server-side record with the values the server accepts as roots
    pub fn with_equation(self, equation: Equation, roots: impl IntoIterator<Item = f64>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.roots.insert(equation.id, roots.into_iter().collect());
            state.equations.push(equation);
        }
        self
    }

    /// Fail the next `n` list calls
    pub fn fail_list_times(self, n: usize) -> Self {
        self.state.lock().unwrap().list_failures = n;
        self
    }

    /// Reject every create with `message`
    pub fn reject_create_with(self, message: impl Into<String>) -> Self {
        self.state.lock().unwrap().create_rejection = Some(message.into());
        self
    }

    /// Make list calls wait for the returned notification
    pub fn hold_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Make solution proposals wait for the returned notification
    pub fn hold_add_solution(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.solution_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Current server-side collection
    pub fn server_equations(&self) -> Vec<Equation> {
        self.state.lock().unwrap().equations.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn find(&self, id: EquationId, locator: &str) -> Result<Equation> {
        self.state
            .lock()
            .unwrap()
            .equations
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(locator.to_string()))
    }
}

async fn wait_on(gate: &Mutex<Option<Arc<Notify>>>) {
    let gate = gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

#[async_trait]
impl EquationGateway for MockGateway {
    async fn fetch_by_id(&self, id: EquationId) -> Result<Equation> {
        self.record(Call::FetchById(id));
        self.find(id, &format!("equations/{id}"))
    }

    async fn fetch_by_location(&self, location: &str) -> Result<Equation> {
        self.record(Call::FetchByLocation(location.to_string()));
        let id = location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|tail| tail.parse::<EquationId>().ok())
            .ok_or_else(|| GatewayError::InvalidLocation(location.to_string()))?;
        self.find(id, location)
    }

    async fn fetch_all(&self, query: &ListQuery) -> Result<Vec<Equation>> {
        let snapshot = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::FetchAll(query.clone()));
            if state.list_failures > 0 {
                state.list_failures -= 1;
                return Err(GatewayError::Rejected {
                    status: 503,
                    message: "Service unavailable".to_string(),
                });
            }
            state.equations.clone()
        };
        wait_on(&self.list_gate).await;
        Ok(snapshot)
    }

    async fn create(&self, equation: &str) -> Result<CreateOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(equation.to_string()));
        if let Some(message) = state.create_rejection.clone() {
            return Ok(CreateOutcome::Rejected { message });
        }
        if !equation.contains('=') {
            return Ok(CreateOutcome::Rejected {
                message: r#"["equation must contain '='"]"#.to_string(),
            });
        }
        let id = state.next_id;
        state.next_id += 1;
        state.equations.push(Equation::new(id, equation));
        Ok(CreateOutcome::Created { location: format!("equations/{id}") })
    }

    async fn delete(&self, id: EquationId) -> Result<DeleteOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(id));
        let before = state.equations.len();
        state.equations.retain(|e| e.id != id);
        if state.equations.len() == before {
            return Ok(DeleteOutcome::Rejected { message: "Equation not found".to_string() });
        }
        Ok(DeleteOutcome::Deleted)
    }

    async fn try_add_solution(&self, id: EquationId, value: f64) -> Result<bool> {
        self.record(Call::TryAddSolution(id, value));
        wait_on(&self.solution_gate).await;
        let mut state = self.state.lock().unwrap();
        let valid = state
            .roots
            .get(&id)
            .is_some_and(|roots| roots.iter().any(|r| (r - value).abs() < 1e-9));
        if valid {
            if let Some(eq) = state.equations.iter_mut().find(|e| e.id == id) {
                eq.solutions.push(value);
            }
        }
        Ok(valid)
    }
}
