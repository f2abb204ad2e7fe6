//! Data models and types for the matchmaker-core API.
//!
//! This module contains the public data structures used to describe a class
//! roster, configure the team constraints, and receive the solved assignment.
//! Everything is serde-serializable so the types double as the JSON wire
//! contract of the surrounding service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A student's sex as reported by the survey.
///
/// Encoded on the wire as `0` (male) / `1` (female). Synthetic padding
/// members carry no sex at all (see the roster normalizer), so balance
/// constraints can never count them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sex {
    Male,
    Female,
}

impl TryFrom<u8> for Sex {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Sex::Male),
            1 => Ok(Sex::Female),
            other => Err(format!("invalid sex code {other}, expected 0 or 1")),
        }
    }
}

impl From<Sex> for u8 {
    fn from(sex: Sex) -> u8 {
        match sex {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }
}

/// A student's leadership self-selection.
///
/// Encoded on the wire as `1` (ordinary member), `3` (sub-leader candidate)
/// or `8` (leader candidate).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum LeaderRole {
    Member,
    SubLeader,
    Leader,
}

impl TryFrom<u8> for LeaderRole {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(LeaderRole::Member),
            3 => Ok(LeaderRole::SubLeader),
            8 => Ok(LeaderRole::Leader),
            other => Err(format!("invalid leader code {other}, expected 1, 3 or 8")),
        }
    }
}

impl From<LeaderRole> for u8 {
    fn from(role: LeaderRole) -> u8 {
        match role {
            LeaderRole::Member => 1,
            LeaderRole::SubLeader => 3,
            LeaderRole::Leader => 8,
        }
    }
}

/// A student's seating preference, driven by eyesight.
///
/// Encoded on the wire as `1` (no preference), `3` (prefers a front seat) or
/// `8` (must sit in front). The numeric code doubles as the weight of the
/// seating-affinity penalty in the objective.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum Eyesight {
    Unrestricted,
    PreferFront,
    MustFront,
}

impl Eyesight {
    /// The wire code, also used as the affinity penalty weight.
    pub fn code(self) -> u8 {
        self.into()
    }

    /// Whether this student participates in the seating-affinity term.
    pub fn is_front_seeking(self) -> bool {
        matches!(self, Eyesight::PreferFront | Eyesight::MustFront)
    }
}

impl TryFrom<u8> for Eyesight {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Eyesight::Unrestricted),
            3 => Ok(Eyesight::PreferFront),
            8 => Ok(Eyesight::MustFront),
            other => Err(format!("invalid eyesight code {other}, expected 1, 3 or 8")),
        }
    }
}

impl From<Eyesight> for u8 {
    fn from(eyesight: Eyesight) -> u8 {
        match eyesight {
            Eyesight::Unrestricted => 1,
            Eyesight::PreferFront => 3,
            Eyesight::MustFront => 8,
        }
    }
}

/// One real participant of the class.
///
/// The eight `mi_*` fields are the multiple-intelligences self-assessment,
/// each an integer in `[1, 8]`. `dislikes` holds 0-based positions of
/// students this one cannot share a team with, and `previous` the 0-based
/// index of the team this student belonged to in the prior round, if any.
///
/// # Example
///
/// ```no_run
/// use matchmaker_core::models::{Eyesight, LeaderRole, Sex, Student};
///
/// let student = Student {
///     dislikes: vec![4],
///     previous: Some(2),
///     mi_a: 3, mi_b: 5, mi_c: 2, mi_d: 4,
///     mi_e: 6, mi_f: 3, mi_g: 4, mi_h: 5,
///     leader: LeaderRole::SubLeader,
///     eyesight: Eyesight::Unrestricted,
///     sex: Sex::Female,
/// };
/// assert_eq!(student.mi_total(), 32);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Student {
    /// 0-based roster positions this student must not share a team with.
    #[serde(default)]
    pub dislikes: Vec<usize>,
    /// 0-based index of the prior round's team, if the student had one.
    #[serde(default)]
    pub previous: Option<usize>,
    pub mi_a: u32,
    pub mi_b: u32,
    pub mi_c: u32,
    pub mi_d: u32,
    pub mi_e: u32,
    pub mi_f: u32,
    pub mi_g: u32,
    pub mi_h: u32,
    pub leader: LeaderRole,
    pub eyesight: Eyesight,
    pub sex: Sex,
}

impl Student {
    /// The eight MI scores as a fixed array, in dimension order A..H.
    pub fn mi_scores(&self) -> [u32; 8] {
        [
            self.mi_a, self.mi_b, self.mi_c, self.mi_d, self.mi_e, self.mi_f, self.mi_g, self.mi_h,
        ]
    }

    /// Sum of all eight MI scores.
    pub fn mi_total(&self) -> u32 {
        self.mi_scores().iter().sum()
    }
}

/// Number of MI skill dimensions (A through H).
pub const MI_DIMENSIONS: usize = 8;

/// The structural constraint bundle for one solve.
///
/// All quota fields are optional; `None` disables the corresponding
/// constraint family entirely. Defaults mirror the classroom service this
/// solver was built for: quotas of one, a `group_diff_coeff` of 1.5 and a
/// two-minute solver budget.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamConstraints {
    /// Target team size T. The roster is padded with synthetic members until
    /// its length is a whole multiple of this.
    pub members_per_team: usize,
    /// Target team count K. Derived as ⌈N / T⌉ when absent.
    #[serde(default)]
    pub max_num_teams: Option<usize>,
    /// Every team must contain at least one male and one female.
    #[serde(default = "default_true")]
    pub at_least_one_pair_sex: bool,
    /// Per team, the number of girls must be ≥ the number of boys.
    #[serde(default)]
    pub girl_geq_boy: bool,
    /// Per team, the number of boys must be ≥ the number of girls.
    #[serde(default)]
    pub boy_geq_girl: bool,
    /// Every team must contain at least one leader candidate. When set, this
    /// floor replaces the `max_leader` cap.
    #[serde(default)]
    pub at_least_one_leader: bool,
    /// Per-team cap on leader candidates.
    #[serde(default = "default_quota")]
    pub max_leader: Option<u32>,
    /// Per-team cap on sub-leader candidates.
    #[serde(default = "default_quota")]
    pub max_sub_leader: Option<u32>,
    /// Per-team floor on ordinary (non-leader) members.
    #[serde(default = "default_quota")]
    pub min_member: Option<u32>,
    /// Per team, at most this many former teammates of any single student.
    /// `None` disables previous-team dispersion.
    #[serde(default = "default_quota")]
    pub unique_previous: Option<u32>,
    /// Weight of the team-to-team aggregate spread in the objective.
    #[serde(default = "default_group_diff_coeff")]
    pub group_diff_coeff: f64,
    /// Solver wall-clock budget in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_true() -> bool {
    true
}

fn default_quota() -> Option<u32> {
    Some(1)
}

fn default_group_diff_coeff() -> f64 {
    1.5
}

fn default_timeout() -> u64 {
    120
}

/// Complete input for one solve: the roster plus the constraint bundle.
///
/// Indices inside `student_constraints` entries (`dislikes`) refer to
/// positions in this sequence.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatchRequest {
    #[serde(rename = "student_constraints")]
    pub students: Vec<Student>,
    pub constraint: TeamConstraints,
}

/// How the solver terminated on a successful run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The solver proved the returned assignment optimal.
    Optimal,
    /// The time budget expired; the returned assignment is the best
    /// incumbent found so far.
    Feasible,
}

/// Map from 0-based team index to the 0-based roster positions of its
/// members. Every team index in `0..K` is present; padding members never
/// appear.
pub type TeamMap = BTreeMap<usize, Vec<usize>>;

/// The solved assignment.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatchResult {
    pub status: SolveStatus,
    /// Objective value of the returned assignment (lower is better).
    pub objective: f64,
    pub teams: TeamMap,
}
