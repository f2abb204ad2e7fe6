//! Objective assembly.
//!
//! The objective is a pure composition of three minimized terms: the
//! per-team intra-skill spread `Σ_t (y_hi[t] − y_lo[t])`, the team-to-team
//! aggregate spread `group_diff_coeff · (z_hi − z_lo)`, and the seating
//! affinity penalty `Σ (eye_i + eye_j) · d[i,j]`. The only caller-supplied
//! degree of freedom is `group_diff_coeff`.

use coin_cbc::{Model, Sense};

use crate::solver::model::ModelVars;

pub(crate) fn assemble(problem: &mut Model, vars: &ModelVars, group_diff_coeff: f64) {
    for t in 0..vars.y_lo.len() {
        problem.set_obj_coeff(vars.y_hi[t], 1.0);
        problem.set_obj_coeff(vars.y_lo[t], -1.0);
    }

    problem.set_obj_coeff(vars.z_hi, group_diff_coeff);
    problem.set_obj_coeff(vars.z_lo, -group_diff_coeff);

    for pair in &vars.affinity {
        problem.set_obj_coeff(pair.col, pair.weight);
    }

    problem.set_obj_sense(Sense::Minimize);
}
