//! Solve driver: hands the model to CBC and classifies the outcome.
//!
//! CBC owns the wall-clock budget; the driver does not interrupt a running
//! solve from outside. The terminal state collapses to a tri-state: proven
//! optimal, stopped-on-time with a candidate incumbent, or no solution. The
//! candidate case is only confirmed once the extractor decodes a complete
//! integral assignment from the column values.

use coin_cbc::raw::Status;
use coin_cbc::{Model, Solution};

use crate::models::SolveStatus;
use crate::solver::SolverError;

pub(crate) fn run_solve(
    problem: &mut Model,
    timeout_seconds: u64,
) -> Result<(SolveStatus, Solution), SolverError> {
    problem.set_parameter("seconds", &timeout_seconds.to_string());
    problem.set_parameter("logLevel", "0");

    let solution = problem.solve();
    let raw = solution.raw();
    log::info!("cbc terminated with status {:?}", raw.status());

    if raw.is_proven_infeasible() {
        return Err(SolverError::NoSolution("proven infeasible".into()));
    }
    if raw.is_proven_optimal() {
        return Ok((SolveStatus::Optimal, solution));
    }
    match raw.status() {
        // Time limit reached; whatever incumbent exists is in the column
        // values and must still pass integral decoding.
        Status::Stopped => Ok((SolveStatus::Feasible, solution)),
        Status::Abandoned => Err(SolverError::SolverFailure(
            "cbc abandoned the model (numerical difficulties)".into(),
        )),
        status => Err(SolverError::NoSolution(format!("{status:?}"))),
    }
}
