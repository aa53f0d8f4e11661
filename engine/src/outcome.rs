//! Run outcome state machine.

use eruption_core::Outcome;
use eruption_world::SimulationState;

/// Outcome the run should settle on given its counters.
///
/// A run with no citizens resolves immediately as a failure.
pub(crate) fn evaluate(state: &SimulationState) -> Outcome {
    if state.outcome().is_terminal() {
        return state.outcome();
    }
    if state.everyone_resolved() {
        return if state.saved_count() > 0 {
            Outcome::Victory
        } else {
            Outcome::Failure
        };
    }
    if state.lost_count() == state.citizens().len() {
        return Outcome::Failure;
    }
    Outcome::Running
}
