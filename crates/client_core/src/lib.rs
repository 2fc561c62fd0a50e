//! Client side of the equation solver: the degree-driven form, the solve
//! workflow state machine, the solve endpoint transport, and the session that
//! ties them together for a front end.

pub mod config;
pub mod error;
pub mod form;
pub mod session;
pub mod transport;
pub mod workflow;

pub use config::{load_settings, ClientSettings};
pub use error::{FormError, SettingsError, TransportError};
pub use form::{normalize_degree, Field, FieldSet, FormState};
pub use session::{SessionSnapshot, SolverSession, SubmitReport};
pub use transport::{HttpSolveClient, MissingSolveService, SolveService};
pub use workflow::{
    ResultView, Settlement, SolveResult, SolveState, SolveTicket, SolveWorkflow, StalePolicy,
    Typesetter,
};
