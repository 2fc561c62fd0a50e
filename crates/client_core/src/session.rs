//! Explicit view state for one solver page: the form and the workflow live
//! behind a shared lock, and the solve service is awaited outside of it so
//! the form stays editable (and submittable again) while a solve is pending.

use std::sync::Arc;

use shared::{domain::Degree, protocol::SolveRequest};
use tokio::sync::Mutex;

use crate::{
    error::FormError,
    form::{FieldSet, FormState},
    transport::SolveService,
    workflow::{ResultView, Settlement, SolveResult, SolveState, SolveTicket, SolveWorkflow},
};

#[derive(Debug)]
struct SessionView {
    form: FormState,
    workflow: SolveWorkflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub degree_input: String,
    pub fields: FieldSet,
    pub state: SolveState,
    pub view: ResultView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub ticket: SolveTicket,
    pub result: SolveResult,
    pub settlement: Settlement,
}

pub struct SolverSession<S> {
    service: Arc<S>,
    view: Arc<Mutex<SessionView>>,
}

impl<S> Clone for SolverSession<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            view: Arc::clone(&self.view),
        }
    }
}

impl<S: SolveService> SolverSession<S> {
    pub fn new(service: S, workflow: SolveWorkflow) -> Self {
        Self {
            service: Arc::new(service),
            view: Arc::new(Mutex::new(SessionView {
                form: FormState::new(),
                workflow,
            })),
        }
    }

    pub async fn change_degree(&self, raw: &str) -> Degree {
        self.view.lock().await.form.set_degree_input(raw)
    }

    pub async fn set_field(&self, name: &str, value: &str) -> Result<(), FormError> {
        self.view.lock().await.form.set_value(name, value)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let view = self.view.lock().await;
        SessionSnapshot {
            degree_input: view.form.degree_input().to_string(),
            fields: view.form.fields().clone(),
            state: view.workflow.state().clone(),
            view: view.workflow.view().clone(),
        }
    }

    /// The body a submission would post right now.
    pub async fn preview_request(&self) -> Result<SolveRequest, FormError> {
        self.view.lock().await.form.submission()
    }

    /// Runs one submission to completion. A form that fails its required
    /// constraint is refused before the workflow leaves its current state.
    pub async fn submit(&self) -> Result<SubmitReport, FormError> {
        let (ticket, request) = {
            let mut view = self.view.lock().await;
            let request = view.form.submission()?;
            (view.workflow.begin(), request)
        };

        let result = SolveResult::from_exchange(self.service.solve(&request).await);

        let settlement = self
            .view
            .lock()
            .await
            .workflow
            .settle(ticket, result.clone());
        Ok(SubmitReport {
            ticket,
            result,
            settlement,
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
