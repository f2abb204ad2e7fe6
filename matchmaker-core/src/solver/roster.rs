//! Roster normalization: validation, dummy padding and pair matrices.
//!
//! The solver works on a padded roster whose length is exactly K·T, so the
//! fixed team-size constraint can be an equality. The gap between the real
//! student count and K·T is filled with synthetic members that are inert
//! under every constraint family: all-ones MI, ordinary role, no seating
//! preference, no dislikes, no prior team, and no sex at all so the
//! sex-balance sums can never count them.

use std::collections::BTreeMap;

use crate::models::{Eyesight, LeaderRole, Sex, Student, TeamConstraints, MI_DIMENSIONS};
use crate::solver::SolverError;

/// Largest admissible ratio of students to team size.
const MAX_MEMBER_RATIO: usize = 10;

/// One entry of the padded roster: a real student or a synthetic filler.
#[derive(Debug, Clone)]
pub(crate) struct Member {
    pub mi: [u32; MI_DIMENSIONS],
    pub leader: LeaderRole,
    pub eyesight: Eyesight,
    /// `None` marks a synthetic filler.
    pub sex: Option<Sex>,
    pub previous: Option<usize>,
}

impl Member {
    fn from_student(student: &Student) -> Self {
        Member {
            mi: student.mi_scores(),
            leader: student.leader,
            eyesight: student.eyesight,
            sex: Some(student.sex),
            previous: student.previous,
        }
    }

    fn filler() -> Self {
        Member {
            mi: [1; MI_DIMENSIONS],
            leader: LeaderRole::Member,
            eyesight: Eyesight::Unrestricted,
            sex: None,
            previous: None,
        }
    }

    pub fn mi_total(&self) -> u32 {
        self.mi.iter().sum()
    }
}

/// The normalized input to the model builder.
#[derive(Debug, Clone)]
pub(crate) struct Roster {
    /// Padded roster of length `n_teams * team_size`; real students first.
    pub members: Vec<Member>,
    /// Number of real students (indices `0..n_real` in `members`).
    pub n_real: usize,
    pub n_teams: usize,
    pub team_size: usize,
    /// `dislikes[i][j]` iff student i listed j. Asymmetric by construction;
    /// the constraint generator applies it symmetrically.
    pub dislikes: Vec<Vec<bool>>,
    /// `previous[i][j]` iff i ≠ j and both shared a prior team. Symmetric,
    /// zero on the diagonal.
    pub previous: Vec<Vec<bool>>,
}

impl Roster {
    pub fn build(students: &[Student], constraint: &TeamConstraints) -> Result<Self, SolverError> {
        validate(students, constraint)?;

        let team_size = constraint.members_per_team;
        if students.len() > MAX_MEMBER_RATIO * team_size {
            return Err(SolverError::RosterTooLarge);
        }

        let n_real = students.len();
        let n_teams = constraint
            .max_num_teams
            .unwrap_or_else(|| n_real.div_ceil(team_size));
        let n_padded = n_teams * team_size;
        if n_padded < n_real {
            return Err(SolverError::InvalidInput(format!(
                "{n_teams} teams of {team_size} cannot hold {n_real} students"
            )));
        }

        let mut members: Vec<Member> = students.iter().map(Member::from_student).collect();
        members.resize_with(n_padded, Member::filler);
        log::info!(
            "normalized roster: {n_real} students padded to {n_padded} members across {n_teams} teams ({} fillers)",
            n_padded - n_real
        );

        let mut dislikes = vec![vec![false; n_padded]; n_padded];
        for (i, student) in students.iter().enumerate() {
            for &j in &student.dislikes {
                dislikes[i][j] = true;
            }
        }

        let mut previous = vec![vec![false; n_padded]; n_padded];
        let mut by_prior_team: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, member) in members.iter().enumerate() {
            if let Some(team) = member.previous {
                by_prior_team.entry(team).or_default().push(i);
            }
        }
        for group in by_prior_team.values() {
            for &i in group {
                for &j in group {
                    if i != j {
                        previous[i][j] = true;
                    }
                }
            }
        }

        Ok(Roster {
            members,
            n_real,
            n_teams,
            team_size,
            dislikes,
            previous,
        })
    }

    /// Observed minimum and maximum over the padded roster's MI matrix,
    /// used to bound the envelope variables.
    pub fn mi_score_range(&self) -> (u32, u32) {
        let mut min = u32::MAX;
        let mut max = u32::MIN;
        for member in &self.members {
            for &score in &member.mi {
                min = min.min(score);
                max = max.max(score);
            }
        }
        (min, max)
    }

    /// Indices of members that must sit in front.
    pub fn must_front(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.eyesight == Eyesight::MustFront)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of members participating in the seating-affinity term.
    pub fn front_seeking(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.eyesight.is_front_seeking())
            .map(|(i, _)| i)
            .collect()
    }
}

fn validate(students: &[Student], constraint: &TeamConstraints) -> Result<(), SolverError> {
    if students.is_empty() {
        return Err(SolverError::InvalidInput("empty roster".into()));
    }
    if constraint.members_per_team == 0 {
        return Err(SolverError::InvalidInput(
            "members_per_team must be at least 1".into(),
        ));
    }
    if constraint.at_least_one_leader && constraint.max_leader == Some(0) {
        return Err(SolverError::InvalidInput(
            "at_least_one_leader contradicts max_leader = 0".into(),
        ));
    }

    for (i, student) in students.iter().enumerate() {
        for (dim, score) in student.mi_scores().into_iter().enumerate() {
            if !(1..=8).contains(&score) {
                return Err(SolverError::InvalidInput(format!(
                    "student {i}: MI score {score} in dimension {dim} is outside [1, 8]"
                )));
            }
        }
        for &j in &student.dislikes {
            if j >= students.len() {
                return Err(SolverError::InvalidInput(format!(
                    "student {i}: dislike index {j} is out of range"
                )));
            }
            if j == i {
                return Err(SolverError::InvalidInput(format!(
                    "student {i}: dislikes itself"
                )));
            }
        }
    }

    Ok(())
}
