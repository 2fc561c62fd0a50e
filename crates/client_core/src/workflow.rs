//! Solve workflow state machine: `Idle -> Solving -> Settled`, plus the two
//! result regions it owns.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use shared::protocol::SolveOutcome;
use tracing::{debug, error, info, warn};

use crate::error::{SettingsError, TransportError};

pub const SOLVING_PLACEHOLDER: &str = "Solving...";
pub const UNREACHABLE_SERVER_MESSAGE: &str =
    "Could not reach the solver server. Check your connection and try again.";

/// Independent variable the solve endpoint solves for.
pub const SOLUTION_VARIABLE: &str = "t";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolveTicket(pub u64);

impl fmt::Display for SolveTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Success { latex: String, plain: String },
    ServiceFailure { message: String },
    TransportFailure,
}

impl SolveResult {
    /// Folds one network exchange into a result. Transport causes are logged
    /// here and never reach the display.
    pub fn from_exchange(exchange: Result<SolveOutcome, TransportError>) -> Self {
        match exchange {
            Ok(SolveOutcome::Solved { latex, plain }) => Self::Success { latex, plain },
            Ok(SolveOutcome::Rejected { message }) => {
                warn!(%message, "solve service rejected the equation");
                Self::ServiceFailure { message }
            }
            Err(err) => {
                error!("solve exchange failed: {err}");
                Self::TransportFailure
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            SolveResult::Success { .. } => "success",
            SolveResult::ServiceFailure { .. } => "service_failure",
            SolveResult::TransportFailure => "transport_failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SolveState {
    #[default]
    Idle,
    Solving {
        ticket: SolveTicket,
    },
    Settled {
        ticket: SolveTicket,
        result: SolveResult,
    },
}

/// The two result regions: the display area (markup on success) and the
/// plain-text line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultView {
    pub display: String,
    pub display_is_markup: bool,
    pub plain: String,
}

impl ResultView {
    fn show_solving(&mut self) {
        self.display = SOLVING_PLACEHOLDER.to_string();
        self.display_is_markup = false;
        self.plain.clear();
    }

    fn show_result(&mut self, result: &SolveResult) {
        match result {
            SolveResult::Success { latex, plain } => {
                self.display = format!("$$ y({SOLUTION_VARIABLE}) = {latex} $$");
                self.display_is_markup = true;
                self.plain = format!("y({SOLUTION_VARIABLE}) = {plain}");
            }
            SolveResult::ServiceFailure { message } => {
                self.display = message.clone();
                self.display_is_markup = false;
                self.plain = message.clone();
            }
            SolveResult::TransportFailure => {
                self.display = UNREACHABLE_SERVER_MESSAGE.to_string();
                self.display_is_markup = false;
                self.plain.clear();
            }
        }
    }
}

/// Which response may update the display when submissions overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Only the newest submission may settle; older answers are dropped.
    #[default]
    LatestRequest,
    /// Whatever answer arrives last is shown, even for an older submission.
    LastArrival,
}

impl FromStr for StalePolicy {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "latest_request" | "latest-request" => Ok(Self::LatestRequest),
            "last_arrival" | "last-arrival" => Ok(Self::LastArrival),
            _ => Err(SettingsError::InvalidStalePolicy(raw.to_string())),
        }
    }
}

/// Post-render pass over freshly written markup (math typesetting).
pub trait Typesetter: Send + Sync {
    fn typeset(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    DiscardedStale { latest: SolveTicket },
}

pub struct SolveWorkflow {
    state: SolveState,
    view: ResultView,
    policy: StalePolicy,
    next_ticket: u64,
    latest_issued: Option<SolveTicket>,
    typesetter: Option<Arc<dyn Typesetter>>,
}

impl fmt::Debug for SolveWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveWorkflow")
            .field("state", &self.state)
            .field("view", &self.view)
            .field("policy", &self.policy)
            .field("latest_issued", &self.latest_issued)
            .field("typesetter", &self.typesetter.is_some())
            .finish()
    }
}

impl Default for SolveWorkflow {
    fn default() -> Self {
        Self::new(StalePolicy::default())
    }
}

impl SolveWorkflow {
    pub fn new(policy: StalePolicy) -> Self {
        Self {
            state: SolveState::Idle,
            view: ResultView::default(),
            policy,
            next_ticket: 1,
            latest_issued: None,
            typesetter: None,
        }
    }

    pub fn with_typesetter(mut self, typesetter: Arc<dyn Typesetter>) -> Self {
        self.typesetter = Some(typesetter);
        self
    }

    pub fn state(&self) -> &SolveState {
        &self.state
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    pub fn is_solving(&self) -> bool {
        matches!(self.state, SolveState::Solving { .. })
    }

    /// Enters `Solving` for a new submission and hands out its ticket.
    pub fn begin(&mut self) -> SolveTicket {
        let ticket = SolveTicket(self.next_ticket);
        self.next_ticket += 1;
        self.latest_issued = Some(ticket);
        self.state = SolveState::Solving { ticket };
        self.view.show_solving();
        info!(%ticket, "solve submitted");
        ticket
    }

    /// Enters `Settled` with the answer for `ticket`, unless the stale policy
    /// says a newer submission owns the display.
    pub fn settle(&mut self, ticket: SolveTicket, result: SolveResult) -> Settlement {
        if let (StalePolicy::LatestRequest, Some(latest)) = (self.policy, self.latest_issued) {
            if ticket < latest {
                warn!(%ticket, %latest, "discarding stale solve response");
                return Settlement::DiscardedStale { latest };
            }
        }

        info!(%ticket, outcome = result.kind(), "solve settled");
        self.view.show_result(&result);
        let typeset = matches!(result, SolveResult::Success { .. });
        self.state = SolveState::Settled { ticket, result };

        if typeset {
            match &self.typesetter {
                Some(typesetter) => typesetter.typeset(),
                None => debug!("no typesetter attached; skipping typeset pass"),
            }
        }
        Settlement::Applied
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
