//! Backend commands queued from UI to backend worker.

use client_core::SolveTicket;
use shared::protocol::SolveRequest;

pub enum BackendCommand {
    Solve {
        ticket: SolveTicket,
        request: SolveRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Solve { .. } => "solve",
        }
    }
}
