//! Post-projection helpers over a solved assignment.
//!
//! Pure aggregations for caller telemetry; none of them touch the solver.
//! All take the caller's roster plus the team map returned by the solve.

use std::collections::BTreeMap;

use crate::models::{Sex, Student, TeamMap, MI_DIMENSIONS};

/// Per-team sums of the eight MI scores, in dimension order A..H.
pub fn mi_totals_by_team(students: &[Student], teams: &TeamMap) -> BTreeMap<usize, [u32; MI_DIMENSIONS]> {
    teams
        .iter()
        .map(|(&team, members)| {
            let mut totals = [0u32; MI_DIMENSIONS];
            for &member in members {
                for (slot, score) in totals.iter_mut().zip(students[member].mi_scores()) {
                    *slot += score;
                }
            }
            (team, totals)
        })
        .collect()
}

/// Per-team list of member sexes, in member order.
pub fn sex_by_team(students: &[Student], teams: &TeamMap) -> BTreeMap<usize, Vec<Sex>> {
    teams
        .iter()
        .map(|(&team, members)| (team, members.iter().map(|&m| students[m].sex).collect()))
        .collect()
}

/// Per-team list of prior-round team indices, in member order.
pub fn previous_by_team(
    students: &[Student],
    teams: &TeamMap,
) -> BTreeMap<usize, Vec<Option<usize>>> {
    teams
        .iter()
        .map(|(&team, members)| (team, members.iter().map(|&m| students[m].previous).collect()))
        .collect()
}

/// Per-team list of each member's dislike list, in member order.
pub fn dislikes_by_team(students: &[Student], teams: &TeamMap) -> BTreeMap<usize, Vec<Vec<usize>>> {
    teams
        .iter()
        .map(|(&team, members)| {
            (
                team,
                members
                    .iter()
                    .map(|&m| students[m].dislikes.clone())
                    .collect(),
            )
        })
        .collect()
}
