//! # Matchmaker-Core: Classroom Team-Assignment Solver
//!
//! This crate partitions a class of students into teams that are feasible
//! under a set of structural constraints (team sizes, sex balance, leader
//! quotas, dislike separation, previous-team dispersion, seating
//! accommodation) and balanced with respect to the eight-dimensional
//! multiple-intelligences profile each student reports.
//!
//! Internally a solve builds a mixed-integer linear program over one binary
//! variable per (student, team), brackets the per-team skill sums and the
//! team totals with integer envelope variables, and asks CBC to minimize the
//! sum of the two spreads plus a seating-affinity penalty under a wall-clock
//! budget. A run that proves optimality and a run that merely times out with
//! an incumbent both succeed; only a run with no incumbent at all is an
//! error.
//!
//! ## Quick Example
//!
//! ```no_run
//! use matchmaker_core::models::*;
//! use matchmaker_core::solve;
//!
//! let students: Vec<Student> = (0..6)
//!     .map(|i| Student {
//!         dislikes: vec![],
//!         previous: None,
//!         mi_a: 3, mi_b: 4, mi_c: 2, mi_d: 5,
//!         mi_e: 3, mi_f: 4, mi_g: 2, mi_h: 3,
//!         leader: LeaderRole::Member,
//!         eyesight: Eyesight::Unrestricted,
//!         sex: if i % 2 == 0 { Sex::Male } else { Sex::Female },
//!     })
//!     .collect();
//!
//! let request = MatchRequest {
//!     students,
//!     constraint: TeamConstraints {
//!         members_per_team: 3,
//!         max_num_teams: None,
//!         at_least_one_pair_sex: true,
//!         girl_geq_boy: false,
//!         boy_geq_girl: false,
//!         at_least_one_leader: false,
//!         max_leader: Some(1),
//!         max_sub_leader: Some(1),
//!         min_member: Some(1),
//!         unique_previous: Some(1),
//!         group_diff_coeff: 1.5,
//!         timeout: 30,
//!     },
//! };
//!
//! match solve(&request) {
//!     Ok(result) => {
//!         for (team, members) in &result.teams {
//!             println!("team {team}: {members:?}");
//!         }
//!     }
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

pub mod models;
pub mod solver;

use crate::models::{MatchRequest, MatchResult};
pub use crate::solver::SolverError;

/// Runs one team-assignment solve.
///
/// Validates and pads the roster, builds the MILP model, runs CBC under the
/// request's `timeout`, and decodes the result into a team → members map
/// over real student indices.
///
/// # Errors
///
/// - [`SolverError::InvalidInput`] — malformed roster or contradictory
///   quotas; nothing was solved.
/// - [`SolverError::RosterTooLarge`] — more than ten students per team slot.
/// - [`SolverError::NoSolution`] — the model is infeasible, or the time
///   budget expired before any integer solution was found.
/// - [`SolverError::SolverFailure`] — CBC failed on the model itself.
pub fn solve(request: &MatchRequest) -> Result<MatchResult, SolverError> {
    solver::run(request)
}

/// Validates a request without solving it.
///
/// Runs exactly the checks `solve` performs before model construction:
/// roster shape, MI ranges, dislike indices, quota consistency and the
/// roster-to-team-size ratio guard.
pub fn validate(request: &MatchRequest) -> Result<(), SolverError> {
    solver::roster::Roster::build(&request.students, &request.constraint).map(|_| ())
}
