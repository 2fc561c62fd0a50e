use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use shared::error::ProtocolError;

#[derive(Default)]
struct CountingTypesetter {
    passes: AtomicUsize,
}

impl Typesetter for CountingTypesetter {
    fn typeset(&self) {
        self.passes.fetch_add(1, Ordering::SeqCst);
    }
}

fn solved() -> SolveResult {
    SolveResult::Success {
        latex: "\\sin(t)".to_string(),
        plain: "sin(t)".to_string(),
    }
}

#[test]
fn starts_idle_with_empty_regions() {
    let workflow = SolveWorkflow::default();
    assert_eq!(workflow.state(), &SolveState::Idle);
    assert_eq!(workflow.view(), &ResultView::default());
    assert!(!workflow.is_solving());
}

#[test]
fn begin_shows_placeholder_and_clears_plain_text() {
    let mut workflow = SolveWorkflow::default();
    let first = workflow.begin();
    workflow.settle(first, solved());
    assert!(!workflow.view().plain.is_empty());

    let second = workflow.begin();
    assert!(second > first);
    assert_eq!(workflow.state(), &SolveState::Solving { ticket: second });
    assert_eq!(workflow.view().display, SOLVING_PLACEHOLDER);
    assert!(!workflow.view().display_is_markup);
    assert!(workflow.view().plain.is_empty());
}

#[test]
fn success_renders_markup_and_plain_line_then_typesets() {
    let typesetter = Arc::new(CountingTypesetter::default());
    let mut workflow = SolveWorkflow::default().with_typesetter(typesetter.clone());
    let ticket = workflow.begin();

    assert_eq!(workflow.settle(ticket, solved()), Settlement::Applied);
    assert_eq!(workflow.view().display, "$$ y(t) = \\sin(t) $$");
    assert!(workflow.view().display_is_markup);
    assert_eq!(workflow.view().plain, "y(t) = sin(t)");
    assert_eq!(typesetter.passes.load(Ordering::SeqCst), 1);
    assert_eq!(
        workflow.state(),
        &SolveState::Settled {
            ticket,
            result: solved()
        }
    );
}

#[test]
fn success_without_typesetter_still_settles() {
    let mut workflow = SolveWorkflow::default();
    let ticket = workflow.begin();
    assert_eq!(workflow.settle(ticket, solved()), Settlement::Applied);
    assert_eq!(workflow.view().plain, "y(t) = sin(t)");
}

#[test]
fn service_failure_shows_message_verbatim_in_both_regions() {
    let typesetter = Arc::new(CountingTypesetter::default());
    let mut workflow = SolveWorkflow::default().with_typesetter(typesetter.clone());
    let ticket = workflow.begin();
    let result = SolveResult::from_exchange(Ok(SolveOutcome::Rejected {
        message: "No real solutions".to_string(),
    }));

    workflow.settle(ticket, result);
    assert_eq!(workflow.view().display, "No real solutions");
    assert_eq!(workflow.view().plain, "No real solutions");
    assert!(!workflow.view().display_is_markup);
    assert_eq!(typesetter.passes.load(Ordering::SeqCst), 0);
}

#[test]
fn transport_failure_hides_the_cause() {
    let mut workflow = SolveWorkflow::default();
    let ticket = workflow.begin();
    let result = SolveResult::from_exchange(Err(TransportError::Protocol(
        ProtocolError::MissingSolutionField("latex"),
    )));
    assert_eq!(result, SolveResult::TransportFailure);

    workflow.settle(ticket, result);
    assert_eq!(workflow.view().display, UNREACHABLE_SERVER_MESSAGE);
    assert!(workflow.view().plain.is_empty());
    assert!(!workflow.view().display.contains("latex"));
}

#[test]
fn latest_request_policy_drops_older_answers() {
    let mut workflow = SolveWorkflow::new(StalePolicy::LatestRequest);
    let older = workflow.begin();
    let newer = workflow.begin();

    assert_eq!(workflow.settle(newer, solved()), Settlement::Applied);
    assert_eq!(
        workflow.settle(
            older,
            SolveResult::ServiceFailure {
                message: "late".to_string()
            }
        ),
        Settlement::DiscardedStale { latest: newer }
    );
    assert_eq!(workflow.view().plain, "y(t) = sin(t)");
}

#[test]
fn latest_request_policy_keeps_solving_until_newest_arrives() {
    let mut workflow = SolveWorkflow::new(StalePolicy::LatestRequest);
    let older = workflow.begin();
    let newer = workflow.begin();

    workflow.settle(older, solved());
    assert_eq!(workflow.state(), &SolveState::Solving { ticket: newer });
    assert_eq!(workflow.view().display, SOLVING_PLACEHOLDER);
}

#[test]
fn last_arrival_policy_lets_late_answers_win() {
    let mut workflow = SolveWorkflow::new(StalePolicy::LastArrival);
    let older = workflow.begin();
    let newer = workflow.begin();

    workflow.settle(newer, solved());
    let late = SolveResult::ServiceFailure {
        message: "late".to_string(),
    };
    assert_eq!(workflow.settle(older, late.clone()), Settlement::Applied);
    assert_eq!(workflow.view().display, "late");
    assert_eq!(
        workflow.state(),
        &SolveState::Settled {
            ticket: older,
            result: late
        }
    );
}

#[test]
fn parses_stale_policy_names() {
    assert_eq!(
        "latest_request".parse::<StalePolicy>().expect("policy"),
        StalePolicy::LatestRequest
    );
    assert_eq!(
        " Last-Arrival ".parse::<StalePolicy>().expect("policy"),
        StalePolicy::LastArrival
    );
    assert!("newest".parse::<StalePolicy>().is_err());
}
