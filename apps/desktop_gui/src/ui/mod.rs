//! UI layer for desktop GUI: app shell and theme handling.

pub mod app;
pub mod theme;

pub use app::SolverApp;
