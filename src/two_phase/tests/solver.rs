use itertools::Itertools;
use two_phase::{
    apply_moves, from_moves, random_cube, random_moves, solve, try_solve, verify, SolveOptions,
};

const SOLVED: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

fn move_count(solution: &str) -> usize {
    solution.split_whitespace().count()
}

fn assert_canonical(solution: &str) {
    let faces: Vec<char> = solution
        .split_whitespace()
        .map(|tok| tok.chars().next().unwrap())
        .collect();
    let axis = |c: char| "URFDLB".find(c).unwrap() % 3;
    for window in faces.windows(2) {
        assert_ne!(window[0], window[1], "repeated face in {solution}");
    }
    for window in faces.windows(3) {
        assert!(
            !(axis(window[0]) == axis(window[1]) && window[0] == window[2]),
            "unmerged parallel pair in {solution}"
        );
    }
}

#[test_log::test]
fn test_from_moves_known_states() {
    assert_eq!(from_moves(""), SOLVED);
    assert_eq!(
        from_moves("U"),
        "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB"
    );
    assert_eq!(
        from_moves("R R"),
        "UUDUUDUUDRRRRRRRRRFFBFFBFFBDDUDDUDDULLLLLLLLLFBBFBBFBB"
    );
    assert_eq!(
        from_moves("U R U' R'"),
        "RFUUUUUURDBBRRRRRRFFFFFUFFUDDFDDDDDDULLLLLLLLLRBBBBBBB"
    );
}

#[test_log::test]
fn test_from_moves_rejects_garbage() {
    assert_eq!(from_moves("U R X"), "");
    assert_eq!(apply_moves(SOLVED, "q"), "");
    assert_eq!(apply_moves("INVALID", "U"), "");
}

#[test_log::test]
fn test_solved_cube_solves_to_empty() {
    assert_eq!(solve(SOLVED, 21), "");
    assert_eq!(solve(SOLVED, 0), "");
}

#[test_log::test]
fn test_malformed_input_reports_error_1() {
    assert_eq!(solve("INVALID", 21), "Error 1");
    assert_eq!(solve("", 21), "Error 1");
}

#[test_log::test]
fn test_validation_error_codes() {
    let swap = |positions: &[(usize, usize)]| -> String {
        let mut s: Vec<char> = SOLVED.chars().collect();
        for &(a, b) in positions {
            s.swap(a, b);
        }
        s.iter().collect()
    };

    // one edge decodes as no real piece
    assert_eq!(solve(&swap(&[(10, 1)]), 21), "Error 2");
    // one edge flipped in place
    assert_eq!(solve(&swap(&[(5, 10)]), 21), "Error 3");
    // one corner decodes as a duplicate of another
    assert_eq!(solve(&swap(&[(9, 20)]), 21), "Error 4");
    // one corner twisted in place
    let mut s: Vec<char> = SOLVED.chars().collect();
    let (a, b, c) = (s[8], s[9], s[20]);
    s[8] = c;
    s[9] = a;
    s[20] = b;
    assert_eq!(solve(&s.iter().collect::<String>(), 21), "Error 5");
    // two edges exchanged
    assert_eq!(solve(&swap(&[(10, 19), (5, 7)]), 21), "Error 6");
}

#[test_log::test]
fn test_short_scramble_solves_within_bound() {
    let facelets = from_moves("U R U' R' D B D");
    let solution = solve(&facelets, 7);
    assert!(!solution.starts_with("Error"), "got {solution}");
    assert!(move_count(&solution) <= 7);
    assert_eq!(apply_moves(&facelets, &solution), SOLVED);
    assert_canonical(&solution);
}

#[test_log::test]
fn test_solver_over_random_scrambles() {
    fastrand::seed(0x5eed);
    for len in [4usize, 8, 14, 20, 30] {
        let scramble = random_moves(len);
        let facelets = from_moves(&scramble);
        let solution = solve(&facelets, 21);
        assert!(!solution.starts_with("Error"), "{scramble} -> {solution}");
        assert!(move_count(&solution) <= 21, "{scramble} -> {solution}");
        assert_eq!(apply_moves(&facelets, &solution), SOLVED);
        assert_canonical(&solution);
    }
}

#[test_log::test]
fn test_random_cubes_solve_within_25() {
    fastrand::seed(42);
    for _ in 0..50 {
        let facelets = random_cube();
        assert!(verify(&facelets).is_ok());
        let solution = solve(&facelets, 25);
        assert!(!solution.starts_with("Error"), "{facelets} -> {solution}");
        assert!(move_count(&solution) <= 24);
        assert_eq!(apply_moves(&facelets, &solution), SOLVED);
    }
}

#[test_log::test]
fn test_solve_is_deterministic() {
    let facelets = from_moves("F2 L' U2 F U F U L' B U' F' U D2 L F2 B'");
    let first = solve(&facelets, 21);
    for _ in 0..3 {
        assert_eq!(solve(&facelets, 21), first);
    }
}

#[test_log::test]
fn test_facelet_round_trip_through_apply() {
    fastrand::seed(9);
    for _ in 0..20 {
        let facelets = from_moves(&random_moves(12));
        // re-encoding what we decoded must reproduce the string
        assert_eq!(apply_moves(&facelets, ""), facelets);
    }
}

#[test_log::test]
fn test_full_turn_is_identity() {
    let facelets = from_moves(&random_moves(10));
    assert_eq!(apply_moves(&facelets, "R R R R"), facelets);
    assert_eq!(apply_moves(&facelets, "U2 U2"), facelets);
}

#[test_log::test]
fn test_random_moves_are_canonical() {
    fastrand::seed(31);
    for n in [1usize, 5, 25] {
        let scramble = random_moves(n);
        assert_eq!(move_count(&scramble), n);
        let faces: Vec<char> = scramble
            .split_whitespace()
            .map(|tok| tok.chars().next().unwrap())
            .collect();
        for window in faces.windows(2) {
            assert_ne!(window[0], window[1]);
            // opposite faces may only appear in ascending order
            let pair = (window[0], window[1]);
            assert!(!matches!(pair, ('D', 'U') | ('L', 'R') | ('B', 'F')));
        }
    }
}

#[test_log::test]
fn test_solution_formatting_options() {
    let facelets = from_moves("R U2 D' B F2 L U");
    let plain = try_solve(&facelets, 21, SolveOptions::empty()).unwrap();

    let with_length = try_solve(&facelets, 21, SolveOptions::APPEND_LENGTH).unwrap();
    assert_eq!(
        with_length,
        format!("{plain} ({}f)", move_count(&plain))
    );

    let separated = try_solve(&facelets, 21, SolveOptions::USE_SEPARATOR).unwrap();
    let stripped = separated.split_whitespace().filter(|t| *t != ".").join(" ");
    assert_eq!(stripped, plain);

    // the inverse maneuver generates the state from solved
    let generator = try_solve(&facelets, 21, SolveOptions::INVERSE_SOLUTION).unwrap();
    assert_eq!(apply_moves(SOLVED, &generator), facelets);
}

#[test_log::test]
fn test_error_8_when_bound_too_tight() {
    // a superflip-like long scramble cannot be solved in two moves
    let facelets = from_moves("R U2 F' D L2 B U R' F D2");
    assert_eq!(solve(&facelets, 2), "Error 8");
}
