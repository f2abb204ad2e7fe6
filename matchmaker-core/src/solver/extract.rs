//! Assignment extraction.
//!
//! Decodes the binary assignment variables into the team → members map.
//! Values are read with a 0.5 threshold to absorb solver residual. Padding
//! members are dropped by reading only the real index range. A member
//! without exactly one selected team means the solver stopped before any
//! integer incumbent existed; that run is reported as having no solution.

use coin_cbc::Solution;

use crate::models::TeamMap;
use crate::solver::model::ModelVars;
use crate::solver::roster::Roster;
use crate::solver::SolverError;

pub(crate) fn extract_teams(
    solution: &Solution,
    vars: &ModelVars,
    roster: &Roster,
) -> Result<TeamMap, SolverError> {
    let mut teams: TeamMap = (0..roster.n_teams).map(|t| (t, Vec::new())).collect();

    for i in 0..roster.n_real {
        let mut assigned = None;
        for t in 0..roster.n_teams {
            if solution.col(vars.x[i][t]) > 0.5 && assigned.replace(t).is_some() {
                return Err(SolverError::NoSolution(
                    "stopped without an integral incumbent".into(),
                ));
            }
        }
        let Some(t) = assigned else {
            return Err(SolverError::NoSolution(
                "stopped without an integral incumbent".into(),
            ));
        };
        teams.entry(t).or_default().push(i);
    }

    Ok(teams)
}
