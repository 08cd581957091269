mod common;

use common::{date, session};
use starlog_core::matching::{CalibrationMatchResult, MatchConfig};
use starlog_core::recommend::recommendations;
use starlog_core::scoring::{classify_status, SessionStatus};

fn assess(
    darks: (u32, bool),
    bias: (u32, bool),
    flats: (u32, bool),
    config: &MatchConfig,
) -> (
    CalibrationMatchResult,
    CalibrationMatchResult,
    CalibrationMatchResult,
    SessionStatus,
) {
    let d = CalibrationMatchResult::new(darks.0, darks.1, config);
    let b = CalibrationMatchResult::new(bias.0, bias.1, config);
    let f = CalibrationMatchResult::new(flats.0, flats.1, config);
    let status = classify_status(&d, &b, &f, config);
    (d, b, f, status)
}

#[test]
fn test_partial_session_gets_lines_for_lacking_types_only() {
    let config = MatchConfig::default();
    let s = session(
        date(2026, 1, 15),
        Some("Ha"),
        Some("CamA"),
        Some(300.0),
        Some(-10.2),
    );
    let (d, b, f, status) = assess((20, false), (8, false), (0, false), &config);
    assert_eq!(status, SessionStatus::Partial);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    assert_eq!(lines.len(), 2);
    assert!(!lines.iter().any(|l| l.contains("dark")));
    assert!(lines.iter().any(|l| l.contains("bias")));
    assert!(lines.iter().any(|l| l.contains("flat")));
}

#[test]
fn test_capture_line_quotes_the_session_profile() {
    let config = MatchConfig::default();
    let s = session(
        date(2026, 1, 15),
        Some("Ha"),
        Some("CamA"),
        Some(300.04),
        Some(-10.2),
    );
    let (d, b, f, status) = assess((0, false), (20, false), (0, false), &config);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    let dark_line = lines.iter().find(|l| l.contains("dark")).unwrap();
    assert!(dark_line.contains("~300.0s"), "exposure rounded to one decimal: {dark_line}");
    assert!(dark_line.contains("~-10°C"), "temp rounded to whole degrees: {dark_line}");
    assert!(dark_line.contains("1x1 binning"));

    let flat_line = lines.iter().find(|l| l.contains("flat")).unwrap();
    assert!(flat_line.contains("Ha filter"));
    assert!(flat_line.contains("2026-01-15"), "flats are per-night: {flat_line}");
}

#[test]
fn test_missing_profile_fields_are_omitted_not_invented() {
    let config = MatchConfig::default();
    let s = session(date(2026, 1, 15), None, None, None, None);
    let (d, b, f, status) = assess((0, false), (0, false), (0, false), &config);
    assert_eq!(status, SessionStatus::Missing);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    assert_eq!(lines.len(), 3);
    for line in &lines {
        assert!(!line.contains("°C"), "no temp to quote: {line}");
        assert!(!line.contains("s exposure"), "no exposure to quote: {line}");
    }
    let flat_line = lines.iter().find(|l| l.contains("flat")).unwrap();
    assert!(flat_line.contains("no filter"));
}

#[test]
fn test_below_floor_asks_for_the_floor() {
    let config = MatchConfig::default();
    let s = session(date(2026, 1, 15), None, None, Some(300.0), Some(-10.0));
    let (d, b, f, status) = assess((20, false), (8, false), (20, false), &config);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("2 more bias"), "8 of 10: {}", lines[0]);
    assert!(lines[0].contains("at least 10"));
}

#[test]
fn test_between_floor_and_target_asks_for_the_target() {
    let config = MatchConfig::default();
    let s = session(date(2026, 1, 15), None, None, Some(300.0), Some(-10.0));
    // Darks at 15 satisfy the floor but sit under the 20-frame target,
    // while bias keeps the session Partial.
    let (d, b, f, status) = assess((15, false), (0, false), (20, false), &config);
    assert_eq!(status, SessionStatus::Partial);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    let dark_line = lines.iter().find(|l| l.contains("dark")).unwrap();
    assert!(dark_line.contains("5 more"), "{dark_line}");
    assert!(dark_line.contains("recommended 20+"));
}

#[test]
fn test_complete_session_gets_confirmation_and_nice_to_haves() {
    let config = MatchConfig::default();
    let s = session(date(2026, 1, 15), None, None, Some(300.0), Some(-10.0));
    let (d, b, f, status) = assess((20, false), (12, false), (20, false), &config);
    assert_eq!(status, SessionStatus::Complete);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("covered"));
    assert!(lines[1].contains("Consider adding more bias"));
}

#[test]
fn test_fully_stocked_session_gets_a_single_confirmation() {
    let config = MatchConfig::default();
    let s = session(date(2026, 1, 15), None, None, Some(300.0), Some(-10.0));
    let (d, b, f, status) = assess((20, false), (20, false), (25, false), &config);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    assert_eq!(lines.len(), 1);
}

#[test]
fn test_master_backed_type_gets_no_suggestion() {
    let config = MatchConfig::default();
    let s = session(date(2026, 1, 15), None, None, Some(300.0), Some(-10.0));
    let (d, b, f, status) = assess((0, true), (20, false), (20, false), &config);
    assert_eq!(status, SessionStatus::CompleteWithMasters);

    let lines = recommendations(&s, &d, &b, &f, status, &config);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("master"));
}
