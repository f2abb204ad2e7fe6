//! The team-assignment solve pipeline.
//!
//! A solve is a strict left-to-right pass over owned values: the roster
//! normalizer validates and pads the input, the model builder turns it into
//! an owned MILP problem, the driver hands that problem to CBC under the
//! wall-clock budget, and the extractor decodes the variable values into the
//! team map. Nothing is shared between solves; each call owns its model for
//! the call's lifetime.

pub(crate) mod driver;
pub(crate) mod extract;
pub(crate) mod model;
pub(crate) mod objective;
pub mod report;
pub(crate) mod roster;
#[cfg(test)]
mod tests;

use serde::Serialize;
use thiserror::Error;

use crate::models::{MatchRequest, MatchResult};

/// Errors that can occur during a solve.
#[derive(Error, Debug, Serialize)]
pub enum SolverError {
    /// The request failed validation before a model was built: a dislike
    /// index out of range, an MI score outside `[1, 8]`, contradictory
    /// quotas, or a team count too small for the roster.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The roster exceeds ten students per team slot. The message is the
    /// canonical one callers match on.
    #[error("The number of member is too many than max_team_num. The ratio should be lower than 10")]
    RosterTooLarge,

    /// The solver terminated without any incumbent: the model is proven
    /// infeasible, or the time budget expired before a first integer
    /// solution was found.
    #[error("no feasible solution ({0})")]
    NoSolution(String),

    /// CBC gave up on the model (numerical difficulties).
    #[error("solver failure: {0}")]
    SolverFailure(String),
}

pub(crate) fn run(request: &MatchRequest) -> Result<MatchResult, SolverError> {
    let roster = roster::Roster::build(&request.students, &request.constraint)?;

    let model::TeamModel { mut problem, vars } = model::build(&roster, &request.constraint);

    let (status, solution) = driver::run_solve(&mut problem, request.constraint.timeout)?;

    let teams = extract::extract_teams(&solution, &vars, &roster)?;
    let objective = solution.raw().obj_value();
    log::info!("solve finished: status {status:?}, objective {objective}");

    Ok(MatchResult {
        status,
        objective,
        teams,
    })
}
