//! Mutation actions: create, delete, add solution.
//!
//! Each action calls the gateway first and patches the held collection only
//! after the server accepted the change. Rejections come back as
//! `ActionError` and are also published as a `Notice`.

use mathhelper_common::number::canonical_number;
use mathhelper_common::{Equation, EquationId};
use mathhelper_gateway::{clean_validation_message, CreateOutcome, DeleteOutcome, GatewayError};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::list::EquationList;
use crate::state::{Notice, Patch};

#[derive(Debug, Error)]
pub enum ActionError {
    /// Validation text from the server, cleaned for display.
    #[error("{message}")]
    CreateRejected { message: String },

    #[error("Failed to delete equation {id}: {message}")]
    DeleteRejected { id: EquationId, message: String },

    #[error("Invalid root {} for equation {id}", canonical_number(*.value))]
    InvalidSolution { id: EquationId, value: f64 },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// An open solution input for one equation.
///
/// Reopening the input for the same equation issues a new ticket; a late
/// answer for an old ticket does not close the new input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionTicket {
    pub equation_id: EquationId,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionOutcome {
    /// Accepted and appended to the held record.
    Appended,
    /// Accepted by the server, but the record is no longer held.
    Discarded,
}

impl EquationList {
    /// Creates an equation and prepends the canonical record.
    #[instrument(skip(self))]
    pub async fn create(&self, equation: &str) -> Result<Equation, ActionError> {
        let outcome = self.gateway.create(equation).await.map_err(|e| self.failed(e))?;

        let location = match outcome {
            CreateOutcome::Created { location } => location,
            CreateOutcome::Rejected { message } => {
                let message = clean_validation_message(&message);
                self.notify(Notice::CreateRejected { message: message.clone() });
                return Err(ActionError::CreateRejected { message });
            }
        };

        let created = self
            .gateway
            .fetch_by_location(&location)
            .await
            .map_err(|e| {
                warn!(%location, "Created equation could not be fetched");
                self.failed(e)
            })?;

        self.inner.write().await.patch(Patch::Prepend(created.clone()));
        info!(id = created.id, "Equation created");
        self.notify(Notice::Created { id: created.id, equation: created.equation_string.clone() });
        Ok(created)
    }

    /// Deletes an equation; the local copy goes only after the server agreed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: EquationId) -> Result<(), ActionError> {
        let outcome = self.gateway.delete(id).await.map_err(|e| self.failed(e))?;

        match outcome {
            DeleteOutcome::Deleted => {
                let mut inner = self.inner.write().await;
                inner.inputs.remove(&id);
                if !inner.patch(Patch::Remove(id)) {
                    info!(id, "Deleted equation was not held locally");
                }
                drop(inner);
                self.notify(Notice::Deleted { id });
                Ok(())
            }
            DeleteOutcome::Rejected { message } => {
                let message = message.trim().to_string();
                warn!(id, %message, "Delete rejected");
                self.notify(Notice::DeleteFailed { id, message: message.clone() });
                Err(ActionError::DeleteRejected { id, message })
            }
        }
    }

    /// Opens (or reopens) the solution input for an equation.
    pub async fn open_solution_input(&self, equation_id: EquationId) -> SolutionTicket {
        let mut inner = self.inner.write().await;
        let generation = inner.next_ticket;
        inner.next_ticket += 1;
        inner.inputs.insert(equation_id, generation);
        SolutionTicket { equation_id, generation }
    }

    pub async fn close_solution_input(&self, equation_id: EquationId) {
        self.inner.write().await.inputs.remove(&equation_id);
    }

    pub async fn is_solution_input_open(&self, equation_id: EquationId) -> bool {
        self.inner.read().await.inputs.contains_key(&equation_id)
    }

    /// Proposes `value` through an open input.
    ///
    /// On acceptance the value is appended to the record and the input is
    /// closed if `ticket` is still the current one. On rejection the record
    /// and the input stay as they were.
    #[instrument(skip(self))]
    pub async fn submit_solution(
        &self,
        ticket: SolutionTicket,
        value: f64,
    ) -> Result<SolutionOutcome, ActionError> {
        let id = ticket.equation_id;
        let accepted = self
            .gateway
            .try_add_solution(id, value)
            .await
            .map_err(|e| self.failed(e))?;

        if !accepted {
            warn!(id, value, "Solution rejected");
            self.notify(Notice::SolutionRejected { id, value });
            return Err(ActionError::InvalidSolution { id, value });
        }

        let mut inner = self.inner.write().await;
        if inner.inputs.get(&id) == Some(&ticket.generation) {
            inner.inputs.remove(&id);
        }
        if !inner.patch(Patch::AppendSolution { id, value }) {
            warn!(id, value, "Accepted solution for an equation no longer held; discarded");
            return Ok(SolutionOutcome::Discarded);
        }
        drop(inner);

        info!(id, value, "Solution added");
        self.notify(Notice::SolutionAdded { id, value });
        Ok(SolutionOutcome::Appended)
    }

    /// Opens an input and submits `value` through it in one step.
    pub async fn add_solution(
        &self,
        id: EquationId,
        value: f64,
    ) -> Result<SolutionOutcome, ActionError> {
        let ticket = self.open_solution_input(id).await;
        self.submit_solution(ticket, value).await
    }

    fn failed(&self, err: GatewayError) -> ActionError {
        warn!(error = %err, "Gateway call failed");
        self.notify(Notice::ActionFailed { message: err.to_string() });
        ActionError::Gateway(err)
    }
}
