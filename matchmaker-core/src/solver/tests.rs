use crate::models::{
    Eyesight, LeaderRole, MatchRequest, Sex, SolveStatus, Student, TeamConstraints, TeamMap,
};
use crate::solver::report;
use crate::solver::SolverError;
use crate::{solve, validate};

// Helpers to build deterministic rosters without repeating the full structs.

fn base_constraints(members_per_team: usize) -> TeamConstraints {
    TeamConstraints {
        members_per_team,
        max_num_teams: None,
        at_least_one_pair_sex: false,
        girl_geq_boy: false,
        boy_geq_girl: false,
        at_least_one_leader: false,
        max_leader: None,
        max_sub_leader: None,
        min_member: None,
        unique_previous: None,
        group_diff_coeff: 1.5,
        timeout: 10,
    }
}

fn student(mi: [u32; 8], sex: Sex) -> Student {
    Student {
        dislikes: vec![],
        previous: None,
        mi_a: mi[0],
        mi_b: mi[1],
        mi_c: mi[2],
        mi_d: mi[3],
        mi_e: mi[4],
        mi_f: mi[5],
        mi_g: mi[6],
        mi_h: mi[7],
        leader: LeaderRole::Member,
        eyesight: Eyesight::Unrestricted,
        sex,
    }
}

/// A student whose eight MI scores sum to `total`, spread as evenly as the
/// [1, 8] range allows.
fn student_with_total(total: u32, sex: Sex) -> Student {
    let base = total / 8;
    let remainder = (total % 8) as usize;
    let mut mi = [base; 8];
    for score in mi.iter_mut().take(remainder) {
        *score += 1;
    }
    student(mi, sex)
}

fn team_of(teams: &TeamMap, member: usize) -> usize {
    teams
        .iter()
        .find(|(_, members)| members.contains(&member))
        .map(|(&team, _)| team)
        .unwrap_or_else(|| panic!("member {member} is in no team"))
}

fn assert_each_assigned_once(teams: &TeamMap, n_students: usize) {
    let mut seen = vec![0usize; n_students];
    for members in teams.values() {
        for &m in members {
            assert!(m < n_students, "member index {m} is out of the real roster");
            seen[m] += 1;
        }
    }
    for (m, &count) in seen.iter().enumerate() {
        assert_eq!(count, 1, "student {m} assigned {count} times");
    }
}

#[test]
fn balanced_teams_minimize_total_spread() {
    // Six students, totals {20, 22, 18, 24, 21, 19}, alternating sexes.
    let totals = [20, 22, 18, 24, 21, 19];
    let students: Vec<Student> = totals
        .iter()
        .enumerate()
        .map(|(i, &total)| {
            let sex = if i % 2 == 0 { Sex::Male } else { Sex::Female };
            student_with_total(total, sex)
        })
        .collect();

    let mut constraint = base_constraints(3);
    constraint.at_least_one_pair_sex = true;
    let request = MatchRequest {
        students: students.clone(),
        constraint,
    };

    let result = solve(&request).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_each_assigned_once(&result.teams, 6);

    let sexes_by_team = report::sex_by_team(&students, &result.teams);
    let mut team_totals = Vec::new();
    for (team, members) in &result.teams {
        assert_eq!(members.len(), 3, "team {team} has wrong size");
        let sexes = &sexes_by_team[team];
        assert!(sexes.contains(&Sex::Male), "team {team} has no male");
        assert!(sexes.contains(&Sex::Female), "team {team} has no female");
        team_totals.push(members.iter().map(|&m| students[m].mi_total()).sum::<u32>());
    }
    let spread = team_totals.iter().max().unwrap() - team_totals.iter().min().unwrap();
    assert!(spread <= 4, "team total spread {spread} exceeds 4");
}

#[test]
fn disliked_students_end_up_in_different_teams() {
    let mut students = vec![
        student([4; 8], Sex::Male),
        student([4; 8], Sex::Male),
        student([3; 8], Sex::Male),
        student([5; 8], Sex::Female),
        student([4; 8], Sex::Female),
        student([4; 8], Sex::Female),
    ];
    students[0].dislikes = vec![1];
    students[1].dislikes = vec![0];

    let mut constraint = base_constraints(3);
    constraint.at_least_one_pair_sex = true;
    let request = MatchRequest {
        students,
        constraint,
    };

    let result = solve(&request).unwrap();
    assert_each_assigned_once(&result.teams, 6);
    assert_ne!(
        team_of(&result.teams, 0),
        team_of(&result.teams, 1),
        "mutually disliking students share a team"
    );
}

#[test]
fn ratio_guard_rejects_oversized_roster() {
    let students: Vec<Student> = (0..41)
        .map(|i| {
            student(
                [4; 8],
                if i % 2 == 0 { Sex::Male } else { Sex::Female },
            )
        })
        .collect();
    let request = MatchRequest {
        students,
        constraint: base_constraints(4),
    };

    let err = solve(&request).unwrap_err();
    assert!(matches!(err, SolverError::RosterTooLarge));
    assert!(err
        .to_string()
        .starts_with("The number of member is too many than max_team_num"));
}

#[test]
fn all_male_roster_with_pair_sex_is_infeasible() {
    let students: Vec<Student> = (0..4).map(|_| student([4; 8], Sex::Male)).collect();
    let mut constraint = base_constraints(4);
    constraint.at_least_one_pair_sex = true;
    let request = MatchRequest {
        students,
        constraint,
    };

    let err = solve(&request).unwrap_err();
    assert!(matches!(err, SolverError::NoSolution(_)));
    assert!(err.to_string().contains("no feasible solution"));
}

#[test]
fn must_front_students_concentrate_in_one_team() {
    let mut students: Vec<Student> = (0..9)
        .map(|i| {
            student(
                [4; 8],
                if i % 2 == 0 { Sex::Male } else { Sex::Female },
            )
        })
        .collect();
    for s in students.iter_mut().take(3) {
        s.eyesight = Eyesight::MustFront;
    }

    let request = MatchRequest {
        students,
        constraint: base_constraints(3),
    };

    let result = solve(&request).unwrap();
    let front_counts: Vec<usize> = result
        .teams
        .values()
        .map(|members| members.iter().filter(|&&m| m < 3).count())
        .collect();
    assert_eq!(front_counts.iter().sum::<usize>(), 3);
    assert!(
        front_counts.iter().any(|&c| c >= 2),
        "no team absorbed two must-front students: {front_counts:?}"
    );
}

#[test]
fn front_seeking_pair_lands_in_the_same_team() {
    // Identical MI profiles make every assignment equally balanced, so the
    // affinity penalty alone decides where the two front-seekers go.
    let mut students: Vec<Student> = (0..9).map(|_| student([4; 8], Sex::Male)).collect();
    students[0].eyesight = Eyesight::PreferFront;
    students[5].eyesight = Eyesight::PreferFront;

    let request = MatchRequest {
        students,
        constraint: base_constraints(3),
    };

    let result = solve(&request).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(
        team_of(&result.teams, 0),
        team_of(&result.teams, 5),
        "front-seeking pair was split across teams"
    );
}

#[test]
fn previous_teammates_are_dispersed() {
    // Twelve students out of three prior teams of four.
    let students: Vec<Student> = (0..12)
        .map(|i| {
            let mut s = student(
                [4; 8],
                if i % 2 == 0 { Sex::Male } else { Sex::Female },
            );
            s.previous = Some(i / 4);
            s
        })
        .collect();

    let mut constraint = base_constraints(3);
    constraint.unique_previous = Some(1);
    let request = MatchRequest {
        students: students.clone(),
        constraint,
    };

    let result = solve(&request).unwrap();
    assert_each_assigned_once(&result.teams, 12);
    for (team, members) in &result.teams {
        for (a, &i) in members.iter().enumerate() {
            for &j in &members[a + 1..] {
                assert_ne!(
                    students[i].previous, students[j].previous,
                    "team {team} reunites prior teammates {i} and {j}"
                );
            }
        }
    }
}

#[test]
fn roster_is_padded_and_fillers_never_surface() {
    // Seven students, teams of four: one filler is appended internally.
    let students: Vec<Student> = (0..7)
        .map(|i| {
            student(
                [4; 8],
                if i % 2 == 0 { Sex::Male } else { Sex::Female },
            )
        })
        .collect();
    let request = MatchRequest {
        students,
        constraint: base_constraints(4),
    };

    let result = solve(&request).unwrap();
    assert_eq!(result.teams.len(), 2);
    assert_each_assigned_once(&result.teams, 7);
    let sizes: Vec<usize> = result.teams.values().map(Vec::len).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 7);
    assert!(sizes.iter().all(|&s| s <= 4));
}

#[test]
fn leader_quotas_are_honored() {
    let mut students: Vec<Student> = (0..6)
        .map(|i| {
            student(
                [4; 8],
                if i % 2 == 0 { Sex::Male } else { Sex::Female },
            )
        })
        .collect();
    students[0].leader = LeaderRole::Leader;
    students[1].leader = LeaderRole::Leader;
    students[2].leader = LeaderRole::SubLeader;
    students[3].leader = LeaderRole::SubLeader;

    let mut constraint = base_constraints(3);
    constraint.at_least_one_leader = true;
    constraint.max_sub_leader = Some(1);
    constraint.min_member = Some(1);
    let request = MatchRequest {
        students: students.clone(),
        constraint,
    };

    let result = solve(&request).unwrap();
    for (team, members) in &result.teams {
        let count = |role: LeaderRole| members.iter().filter(|&&m| students[m].leader == role).count();
        assert_eq!(count(LeaderRole::Leader), 1, "team {team} leader count");
        assert_eq!(count(LeaderRole::SubLeader), 1, "team {team} sub-leader count");
        assert!(count(LeaderRole::Member) >= 1, "team {team} has no ordinary member");
    }
}

#[test]
fn girl_geq_boy_holds_per_team() {
    let students: Vec<Student> = (0..6)
        .map(|i| {
            student(
                [4; 8],
                if i < 2 { Sex::Male } else { Sex::Female },
            )
        })
        .collect();
    let mut constraint = base_constraints(3);
    constraint.girl_geq_boy = true;
    let request = MatchRequest {
        students: students.clone(),
        constraint,
    };

    let result = solve(&request).unwrap();
    for (team, members) in &result.teams {
        let girls = members.iter().filter(|&&m| students[m].sex == Sex::Female).count();
        let boys = members.len() - girls;
        assert!(girls >= boys, "team {team}: {girls} girls < {boys} boys");
    }
}

#[test]
fn explicit_team_count_controls_padding() {
    // Four students, teams of three, three teams: five fillers.
    let students: Vec<Student> = (0..4).map(|_| student([4; 8], Sex::Male)).collect();
    let mut constraint = base_constraints(3);
    constraint.max_num_teams = Some(3);
    let request = MatchRequest {
        students,
        constraint,
    };

    let result = solve(&request).unwrap();
    assert_eq!(result.teams.len(), 3);
    assert_each_assigned_once(&result.teams, 4);
}

// === Validation failures ===

#[test]
fn dislike_index_out_of_range_is_rejected() {
    let mut students: Vec<Student> = (0..4).map(|_| student([4; 8], Sex::Male)).collect();
    students[1].dislikes = vec![9];
    let request = MatchRequest {
        students,
        constraint: base_constraints(2),
    };

    let err = validate(&request).unwrap_err();
    assert!(matches!(err, SolverError::InvalidInput(_)));
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn self_dislike_is_rejected() {
    let mut students: Vec<Student> = (0..4).map(|_| student([4; 8], Sex::Male)).collect();
    students[2].dislikes = vec![2];
    let request = MatchRequest {
        students,
        constraint: base_constraints(2),
    };

    assert!(matches!(
        validate(&request),
        Err(SolverError::InvalidInput(_))
    ));
}

#[test]
fn out_of_range_mi_score_is_rejected() {
    let mut students: Vec<Student> = (0..4).map(|_| student([4; 8], Sex::Male)).collect();
    students[0].mi_c = 0;
    let request = MatchRequest {
        students,
        constraint: base_constraints(2),
    };

    let err = validate(&request).unwrap_err();
    assert!(err.to_string().contains("outside [1, 8]"));
}

#[test]
fn contradictory_leader_quotas_are_rejected() {
    let students: Vec<Student> = (0..4).map(|_| student([4; 8], Sex::Male)).collect();
    let mut constraint = base_constraints(2);
    constraint.at_least_one_leader = true;
    constraint.max_leader = Some(0);
    let request = MatchRequest {
        students,
        constraint,
    };

    assert!(matches!(
        validate(&request),
        Err(SolverError::InvalidInput(_))
    ));
}

#[test]
fn undersized_team_count_is_rejected() {
    let students: Vec<Student> = (0..6).map(|_| student([4; 8], Sex::Male)).collect();
    let mut constraint = base_constraints(3);
    constraint.max_num_teams = Some(1);
    let request = MatchRequest {
        students,
        constraint,
    };

    let err = validate(&request).unwrap_err();
    assert!(err.to_string().contains("cannot hold"));
}

#[test]
fn empty_roster_is_rejected() {
    let request = MatchRequest {
        students: vec![],
        constraint: base_constraints(3),
    };
    assert!(matches!(
        validate(&request),
        Err(SolverError::InvalidInput(_))
    ));
}

// === Wire format ===

#[test]
fn request_deserializes_from_numeric_codes() {
    let json = r#"{
        "student_constraints": [
            {"dislikes": [1], "previous": 0,
             "mi_a": 3, "mi_b": 4, "mi_c": 5, "mi_d": 2,
             "mi_e": 6, "mi_f": 1, "mi_g": 7, "mi_h": 4,
             "leader": 8, "eyesight": 3, "sex": 1},
            {"mi_a": 2, "mi_b": 2, "mi_c": 2, "mi_d": 2,
             "mi_e": 2, "mi_f": 2, "mi_g": 2, "mi_h": 2,
             "leader": 1, "eyesight": 1, "sex": 0}
        ],
        "constraint": {"members_per_team": 2, "timeout": 5}
    }"#;

    let request: MatchRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.students.len(), 2);
    assert_eq!(request.students[0].leader, LeaderRole::Leader);
    assert_eq!(request.students[0].eyesight, Eyesight::PreferFront);
    assert_eq!(request.students[0].sex, Sex::Female);
    assert_eq!(request.students[1].dislikes, Vec::<usize>::new());
    assert_eq!(request.constraint.max_leader, Some(1));
    assert!((request.constraint.group_diff_coeff - 1.5).abs() < f64::EPSILON);
    assert!(request.constraint.at_least_one_pair_sex);
}

#[test]
fn invalid_categorical_code_fails_deserialization() {
    let json = r#"{"dislikes": [], "previous": null,
        "mi_a": 1, "mi_b": 1, "mi_c": 1, "mi_d": 1,
        "mi_e": 1, "mi_f": 1, "mi_g": 1, "mi_h": 1,
        "leader": 5, "eyesight": 1, "sex": 0}"#;
    assert!(serde_json::from_str::<Student>(json).is_err());
}

#[test]
fn result_serializes_teams_with_string_keys() {
    let students: Vec<Student> = (0..4)
        .map(|i| {
            student(
                [4; 8],
                if i % 2 == 0 { Sex::Male } else { Sex::Female },
            )
        })
        .collect();
    let request = MatchRequest {
        students,
        constraint: base_constraints(2),
    };

    let result = solve(&request).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"teams\""));
    assert!(json.contains("\"0\":"));
    assert!(json.contains("\"status\""));
}

// === Post-projections ===

#[test]
fn projections_aggregate_per_team() {
    let mut students = vec![
        student([1, 2, 3, 4, 5, 6, 7, 8], Sex::Male),
        student([8, 7, 6, 5, 4, 3, 2, 1], Sex::Female),
        student([2; 8], Sex::Male),
        student([3; 8], Sex::Female),
    ];
    students[0].previous = Some(1);
    students[3].dislikes = vec![0];

    let teams: TeamMap = [(0, vec![0, 1]), (1, vec![2, 3])].into_iter().collect();

    let mi_totals = report::mi_totals_by_team(&students, &teams);
    assert_eq!(mi_totals[&0], [9; 8]);
    assert_eq!(mi_totals[&1], [5; 8]);

    let sexes = report::sex_by_team(&students, &teams);
    assert_eq!(sexes[&0], vec![Sex::Male, Sex::Female]);

    let previous = report::previous_by_team(&students, &teams);
    assert_eq!(previous[&0], vec![Some(1), None]);
    assert_eq!(previous[&1], vec![None, None]);

    let dislikes = report::dislikes_by_team(&students, &teams);
    assert_eq!(dislikes[&1], vec![vec![], vec![0]]);
}
