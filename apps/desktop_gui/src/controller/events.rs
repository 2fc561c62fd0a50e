//! Backend -> UI events and error modeling for the desktop GUI.

use client_core::{SolveResult, SolveTicket};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    SolveSettled {
        ticket: SolveTicket,
        result: SolveResult,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status-bar text. Solving still works after these errors; every
    /// submission simply settles as unreachable.
    pub fn status_line(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => {
                format!("Solver backend unavailable: {}", self.message)
            }
            UiErrorContext::CommandQueue => format!("Could not queue request: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_names_the_failing_stage() {
        let err = UiError::new(UiErrorContext::BackendStartup, "invalid solver server url");
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
        assert_eq!(err.message(), "invalid solver server url");
        assert_eq!(
            err.status_line(),
            "Solver backend unavailable: invalid solver server url"
        );
    }
}
