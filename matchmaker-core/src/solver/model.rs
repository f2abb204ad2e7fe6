//! MILP model construction.
//!
//! Builds an owned CBC problem from the normalized roster: one binary
//! assignment variable per (member, team), integer envelope variables
//! bracketing the per-team skill sums and the team totals, binary absorb
//! flags for the must-front seating rule, and one non-negative integer
//! distance variable per front-seeking pair. Constraints are added one
//! family at a time; the builder returns the problem together with the
//! variable handles the extractor needs.

use coin_cbc::{Col, Model};

use crate::models::{LeaderRole, Sex, TeamConstraints, MI_DIMENSIONS};
use crate::solver::objective;
use crate::solver::roster::Roster;

/// Weight applied to one MI dimension when accumulating a team's per-skill
/// sums. Every dimension currently counts equally; raising a single
/// dimension's weight here is the intended way to bias the balance toward it.
fn skill_weight(_dim: usize) -> f64 {
    1.0
}

/// Distance variable for one front-seeking pair, together with its
/// objective weight (the sum of the two eyesight codes).
pub(crate) struct AffinityVar {
    pub i: usize,
    pub j: usize,
    pub col: Col,
    pub weight: f64,
}

/// Handles to every variable the extractor or objective needs.
pub(crate) struct ModelVars {
    /// `x[i][t]` — member i is assigned to team t.
    pub x: Vec<Vec<Col>>,
    /// Per-team lower envelope of the eight skill sums.
    pub y_lo: Vec<Col>,
    /// Per-team upper envelope of the eight skill sums.
    pub y_hi: Vec<Col>,
    /// Global lower envelope of the per-team aggregate totals.
    pub z_lo: Col,
    /// Global upper envelope of the per-team aggregate totals.
    pub z_hi: Col,
    /// `b[t]` — team t absorbs two or more must-front members. Empty when
    /// fewer than two such members exist.
    pub absorb: Vec<Col>,
    /// One distance variable per front-seeking pair.
    pub affinity: Vec<AffinityVar>,
}

/// An owned, fully-constrained problem ready for the solve driver.
pub(crate) struct TeamModel {
    pub problem: Model,
    pub vars: ModelVars,
}

pub(crate) fn build(roster: &Roster, constraint: &TeamConstraints) -> TeamModel {
    let mut problem = Model::default();
    let vars = declare_variables(&mut problem, roster);

    let mut rows = 0;
    rows += add_assignment_rows(&mut problem, &vars, roster);
    rows += add_team_size_rows(&mut problem, &vars, roster);
    rows += add_leader_rows(&mut problem, &vars, roster, constraint);
    rows += add_sex_rows(&mut problem, &vars, roster, constraint);
    rows += add_dislike_rows(&mut problem, &vars, roster);
    rows += add_dispersion_rows(&mut problem, &vars, roster, constraint);
    rows += add_absorb_rows(&mut problem, &vars, roster);
    rows += add_envelope_rows(&mut problem, &vars, roster);
    rows += add_affinity_rows(&mut problem, &vars, roster);

    objective::assemble(&mut problem, &vars, constraint.group_diff_coeff);

    let cols = roster.members.len() * roster.n_teams
        + 2 * roster.n_teams
        + 2
        + vars.absorb.len()
        + vars.affinity.len();
    log::info!("model has {cols} columns and {rows} rows");

    TeamModel { problem, vars }
}

fn declare_variables(problem: &mut Model, roster: &Roster) -> ModelVars {
    let n = roster.members.len();
    let k = roster.n_teams;
    let t = roster.team_size as f64;
    let (min_score, max_score) = roster.mi_score_range();

    let x: Vec<Vec<Col>> = (0..n)
        .map(|_| (0..k).map(|_| problem.add_binary()).collect())
        .collect();

    let skill_bounds = (f64::from(min_score) * t, f64::from(max_score) * t);
    let mut envelope = |bounds: (f64, f64)| {
        let col = problem.add_integer();
        problem.set_col_lower(col, bounds.0);
        problem.set_col_upper(col, bounds.1);
        col
    };
    let y_lo: Vec<Col> = (0..k).map(|_| envelope(skill_bounds)).collect();
    let y_hi: Vec<Col> = (0..k).map(|_| envelope(skill_bounds)).collect();

    // A team's aggregate total sums all eight skills over the same T members.
    let total_bounds = (
        skill_bounds.0 * MI_DIMENSIONS as f64,
        skill_bounds.1 * MI_DIMENSIONS as f64,
    );
    let z_lo = envelope(total_bounds);
    let z_hi = envelope(total_bounds);

    // The absorb block is only satisfiable with at least one must-front
    // pair; with zero or one such member it would force every roster to be
    // infeasible.
    let absorb: Vec<Col> = if roster.must_front().len() >= 2 {
        (0..k).map(|_| problem.add_binary()).collect()
    } else {
        Vec::new()
    };

    let front = roster.front_seeking();
    let mut affinity = Vec::new();
    for (a, &i) in front.iter().enumerate() {
        for &j in &front[a + 1..] {
            let col = problem.add_integer();
            problem.set_col_lower(col, 0.0);
            problem.set_col_upper(col, (k - 1) as f64);
            let weight = f64::from(roster.members[i].eyesight.code())
                + f64::from(roster.members[j].eyesight.code());
            affinity.push(AffinityVar { i, j, col, weight });
        }
    }

    ModelVars {
        x,
        y_lo,
        y_hi,
        z_lo,
        z_hi,
        absorb,
        affinity,
    }
}

/// Every member belongs to exactly one team.
fn add_assignment_rows(problem: &mut Model, vars: &ModelVars, roster: &Roster) -> usize {
    for i in 0..roster.members.len() {
        let row = problem.add_row();
        problem.set_row_equal(row, 1.0);
        for t in 0..roster.n_teams {
            problem.set_weight(row, vars.x[i][t], 1.0);
        }
    }
    roster.members.len()
}

/// Every team holds exactly T members; the padding makes this an equality.
fn add_team_size_rows(problem: &mut Model, vars: &ModelVars, roster: &Roster) -> usize {
    for t in 0..roster.n_teams {
        let row = problem.add_row();
        problem.set_row_equal(row, roster.team_size as f64);
        for i in 0..roster.members.len() {
            problem.set_weight(row, vars.x[i][t], 1.0);
        }
    }
    roster.n_teams
}

fn add_leader_rows(
    problem: &mut Model,
    vars: &ModelVars,
    roster: &Roster,
    constraint: &TeamConstraints,
) -> usize {
    let by_role = |role: LeaderRole| -> Vec<usize> {
        roster
            .members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.leader == role)
            .map(|(i, _)| i)
            .collect()
    };
    let leaders = by_role(LeaderRole::Leader);
    let sub_leaders = by_role(LeaderRole::SubLeader);
    let ordinary = by_role(LeaderRole::Member);

    let mut rows = 0;
    for t in 0..roster.n_teams {
        if constraint.at_least_one_leader {
            let row = problem.add_row();
            problem.set_row_lower(row, 1.0);
            for &i in &leaders {
                problem.set_weight(row, vars.x[i][t], 1.0);
            }
            rows += 1;
        } else if let Some(cap) = constraint.max_leader {
            let row = problem.add_row();
            problem.set_row_upper(row, f64::from(cap));
            for &i in &leaders {
                problem.set_weight(row, vars.x[i][t], 1.0);
            }
            rows += 1;
        }
        if let Some(cap) = constraint.max_sub_leader {
            let row = problem.add_row();
            problem.set_row_upper(row, f64::from(cap));
            for &i in &sub_leaders {
                problem.set_weight(row, vars.x[i][t], 1.0);
            }
            rows += 1;
        }
        if let Some(floor) = constraint.min_member {
            let row = problem.add_row();
            problem.set_row_lower(row, f64::from(floor));
            for &i in &ordinary {
                problem.set_weight(row, vars.x[i][t], 1.0);
            }
            rows += 1;
        }
    }
    rows
}

/// Sex-balance rows over real students only; fillers carry no sex and so
/// never appear in these sums.
fn add_sex_rows(
    problem: &mut Model,
    vars: &ModelVars,
    roster: &Roster,
    constraint: &TeamConstraints,
) -> usize {
    let of_sex = |sex: Sex| -> Vec<usize> {
        roster
            .members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.sex == Some(sex))
            .map(|(i, _)| i)
            .collect()
    };
    let males = of_sex(Sex::Male);
    let females = of_sex(Sex::Female);

    let mut rows = 0;
    for t in 0..roster.n_teams {
        if constraint.at_least_one_pair_sex {
            for group in [&males, &females] {
                let row = problem.add_row();
                problem.set_row_lower(row, 1.0);
                for &i in group {
                    problem.set_weight(row, vars.x[i][t], 1.0);
                }
                rows += 1;
            }
        }
        if constraint.girl_geq_boy {
            rows += add_sex_dominance_row(problem, vars, t, &females, &males);
        }
        if constraint.boy_geq_girl {
            rows += add_sex_dominance_row(problem, vars, t, &males, &females);
        }
    }
    rows
}

/// `Σ major − Σ minor ≥ 0` for one team.
fn add_sex_dominance_row(
    problem: &mut Model,
    vars: &ModelVars,
    t: usize,
    major: &[usize],
    minor: &[usize],
) -> usize {
    let row = problem.add_row();
    problem.set_row_lower(row, 0.0);
    for &i in major {
        problem.set_weight(row, vars.x[i][t], 1.0);
    }
    for &i in minor {
        problem.set_weight(row, vars.x[i][t], -1.0);
    }
    1
}

/// `x[i,t] + x[j,t] ≤ 1` for every ordered dislike pair and team. The
/// matrix is asymmetric; one row per ordered pair already separates both
/// members.
fn add_dislike_rows(problem: &mut Model, vars: &ModelVars, roster: &Roster) -> usize {
    let mut rows = 0;
    for i in 0..roster.members.len() {
        for j in 0..roster.members.len() {
            if !roster.dislikes[i][j] {
                continue;
            }
            for t in 0..roster.n_teams {
                let row = problem.add_row();
                problem.set_row_upper(row, 1.0);
                problem.set_weight(row, vars.x[i][t], 1.0);
                problem.set_weight(row, vars.x[j][t], 1.0);
                rows += 1;
            }
        }
    }
    rows
}

/// Per-student dispersion: for every member i and team t, at most
/// `unique_previous` of i's former teammates may land in t.
fn add_dispersion_rows(
    problem: &mut Model,
    vars: &ModelVars,
    roster: &Roster,
    constraint: &TeamConstraints,
) -> usize {
    let Some(limit) = constraint.unique_previous else {
        return 0;
    };
    let mut rows = 0;
    for i in 0..roster.members.len() {
        let co_previous: Vec<usize> = (0..roster.members.len())
            .filter(|&j| roster.previous[i][j])
            .collect();
        if co_previous.is_empty() {
            continue;
        }
        for t in 0..roster.n_teams {
            let row = problem.add_row();
            problem.set_row_upper(row, f64::from(limit));
            for &j in &co_previous {
                problem.set_weight(row, vars.x[j][t], 1.0);
            }
            rows += 1;
        }
    }
    rows
}

/// Big-M absorb rows: some team takes at least two must-front members and
/// every other team takes at most one. M is the team size, the tightest
/// upper bound on any team's must-front count.
fn add_absorb_rows(problem: &mut Model, vars: &ModelVars, roster: &Roster) -> usize {
    if vars.absorb.is_empty() {
        return 0;
    }
    let must_front = roster.must_front();

    let mut rows = 0;
    for (t, &flag) in vars.absorb.iter().enumerate() {
        // sum − 2b ≥ 0
        let lower = problem.add_row();
        problem.set_row_lower(lower, 0.0);
        for &i in &must_front {
            problem.set_weight(lower, vars.x[i][t], 1.0);
        }
        problem.set_weight(lower, flag, -2.0);

        // sum − T·b ≤ 1
        let upper = problem.add_row();
        problem.set_row_upper(upper, 1.0);
        for &i in &must_front {
            problem.set_weight(upper, vars.x[i][t], 1.0);
        }
        problem.set_weight(upper, flag, -(roster.team_size as f64));
        rows += 2;
    }

    let any = problem.add_row();
    problem.set_row_lower(any, 1.0);
    for &flag in &vars.absorb {
        problem.set_weight(any, flag, 1.0);
    }
    rows + 1
}

/// Envelope rows: per team, every weighted skill sum lies inside
/// `[y_lo[t], y_hi[t]]` and the aggregate total inside `[z_lo, z_hi]`.
fn add_envelope_rows(problem: &mut Model, vars: &ModelVars, roster: &Roster) -> usize {
    let n = roster.members.len();
    let mut rows = 0;
    for t in 0..roster.n_teams {
        for dim in 0..MI_DIMENSIONS {
            let weight = skill_weight(dim);

            let lower = problem.add_row();
            problem.set_row_lower(lower, 0.0);
            let upper = problem.add_row();
            problem.set_row_upper(upper, 0.0);
            for i in 0..n {
                let score = weight * f64::from(roster.members[i].mi[dim]);
                problem.set_weight(lower, vars.x[i][t], score);
                problem.set_weight(upper, vars.x[i][t], score);
            }
            problem.set_weight(lower, vars.y_lo[t], -1.0);
            problem.set_weight(upper, vars.y_hi[t], -1.0);
            rows += 2;
        }

        let lower = problem.add_row();
        problem.set_row_lower(lower, 0.0);
        let upper = problem.add_row();
        problem.set_row_upper(upper, 0.0);
        for i in 0..n {
            let total = f64::from(roster.members[i].mi_total());
            problem.set_weight(lower, vars.x[i][t], total);
            problem.set_weight(upper, vars.x[i][t], total);
        }
        problem.set_weight(lower, vars.z_lo, -1.0);
        problem.set_weight(upper, vars.z_hi, -1.0);
        rows += 2;
    }
    rows
}

/// Absolute-value linearization of the team-index distance for every
/// front-seeking pair: two rows pin `d[i,j] ≥ |team(i) − team(j)|`, where a
/// member's team index is `Σ_t t·x[i,t]`.
fn add_affinity_rows(problem: &mut Model, vars: &ModelVars, roster: &Roster) -> usize {
    let mut rows = 0;
    for pair in &vars.affinity {
        for (first, second) in [(pair.i, pair.j), (pair.j, pair.i)] {
            let row = problem.add_row();
            problem.set_row_upper(row, 0.0);
            for t in 1..roster.n_teams {
                problem.set_weight(row, vars.x[first][t], t as f64);
                problem.set_weight(row, vars.x[second][t], -(t as f64));
            }
            problem.set_weight(row, pair.col, -1.0);
            rows += 1;
        }
    }
    rows
}
