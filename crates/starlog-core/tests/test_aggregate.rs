mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{bias, dark, date, flat, frame, light, with_instrument};
use starlog_core::aggregate::{
    run_aggregation, spawn_aggregation, AggregationController, AggregationEvent,
    AggregationOutcome, AggregationStage, CancellationToken,
};
use starlog_core::error::{Result, StarlogError};
use starlog_core::frame::{Frame, FrameKind};
use starlog_core::matching::MatchConfig;
use starlog_core::scoring::SessionStatus;
use starlog_core::store::{DateRange, FrameStore, InMemoryFrameStore};

/// The reference scenario: one CamA session short on bias, out of flats.
fn scenario_store() -> InMemoryFrameStore {
    let night = date(2026, 1, 15);
    let mut frames = Vec::new();
    let mut id = 0;

    for _ in 0..24 {
        let mut l = with_instrument(light(id, night, "M31"), "CamA");
        l.filter_name = Some("Ha".to_string());
        l.exposure_secs = Some(300.0);
        l.sensor_temp_c = Some(-10.2);
        frames.push(l);
        id += 1;
    }
    for _ in 0..20 {
        frames.push(with_instrument(dark(id, 300.0, -10.0), "CamA"));
        id += 1;
    }
    for _ in 0..8 {
        frames.push(with_instrument(bias(id, -10.0), "CamA"));
        id += 1;
    }

    InMemoryFrameStore::new(frames)
}

fn complete(store: &InMemoryFrameStore) -> starlog_core::aggregate::AggregationResult {
    match run_aggregation(
        store,
        None,
        &MatchConfig::default(),
        &CancellationToken::new(),
    )
    .unwrap()
    {
        AggregationOutcome::Completed(result) => result,
        AggregationOutcome::Cancelled => panic!("run was not cancelled"),
    }
}

#[test]
fn test_reference_scenario_end_to_end() {
    let result = complete(&scenario_store());

    assert_eq!(result.sessions.len(), 1);
    let report = &result.sessions[0];

    assert_eq!(report.session.light_frame_count, 24);
    assert_eq!(report.darks.frame_count, 20);
    assert_eq!(report.darks.quality_score(), 100);
    assert_eq!(report.bias.frame_count, 8);
    assert_eq!(report.bias.quality_score(), 40);
    assert_eq!(report.flats.frame_count, 0);
    assert_eq!(report.flats.quality_score(), 0);
    assert_eq!(report.status, SessionStatus::Partial);

    assert!(!report.recommendations.iter().any(|l| l.contains("dark")));
    assert!(report.recommendations.iter().any(|l| l.contains("bias")));
    assert!(report.recommendations.iter().any(|l| l.contains("flat")));

    assert_eq!(result.diagnostics.unassignable_lights, 0);
    assert_eq!(result.diagnostics.unusable_calibration, 0);
}

#[test]
fn test_wrong_instrument_darks_leave_the_session_bare() {
    let night = date(2026, 1, 15);
    let mut frames = Vec::new();
    for id in 0..4 {
        let mut l = with_instrument(light(id, night, "M31"), "CamA");
        l.exposure_secs = Some(300.0);
        l.sensor_temp_c = Some(-10.2);
        frames.push(l);
    }
    for id in 4..24 {
        frames.push(with_instrument(dark(id, 300.0, -10.0), "CamB"));
    }

    let result = complete(&InMemoryFrameStore::new(frames));
    assert_eq!(result.sessions[0].darks.frame_count, 0);
    assert_eq!(result.sessions[0].status, SessionStatus::Missing);
}

#[test]
fn test_aggregation_is_idempotent() {
    let store = scenario_store();
    let first = complete(&store);
    let second = complete(&store);
    assert_eq!(first, second);
}

#[test]
fn test_diagnostics_count_excluded_frames() {
    let night = date(2026, 1, 15);
    let mut undated_light = frame(0, FrameKind::Light);
    undated_light.object_name = Some("M31".to_string());
    let mut exposureless_dark = frame(1, FrameKind::Dark);
    exposureless_dark.sensor_temp_c = Some(-10.0);

    let frames = vec![undated_light, exposureless_dark, light(2, night, "M31")];
    let result = complete(&InMemoryFrameStore::new(frames));

    assert_eq!(result.diagnostics.unassignable_lights, 1);
    assert_eq!(result.diagnostics.unusable_calibration, 1);
    assert_eq!(result.sessions.len(), 1);
}

#[test]
fn test_date_range_prefilters_sessions() {
    let mut frames = vec![
        light(0, date(2026, 1, 15), "M31"),
        light(1, date(2026, 2, 10), "M42"),
    ];
    frames.push(flat(2, None, date(2026, 1, 15), -10.0));

    let store = InMemoryFrameStore::new(frames);
    let range = DateRange {
        from: date(2026, 1, 1),
        to: date(2026, 1, 31),
    };
    let outcome = run_aggregation(
        &store,
        Some(&range),
        &MatchConfig::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    let AggregationOutcome::Completed(result) = outcome else {
        panic!("run was not cancelled");
    };
    assert_eq!(result.sessions.len(), 1);
    assert_eq!(result.sessions[0].session.key.date, date(2026, 1, 15));
}

#[test]
fn test_pre_cancelled_run_reports_nothing() {
    let token = CancellationToken::new();
    token.cancel();

    let outcome = run_aggregation(
        &scenario_store(),
        None,
        &MatchConfig::default(),
        &token,
    )
    .unwrap();
    assert_eq!(outcome, AggregationOutcome::Cancelled);
}

/// Store whose reads fail, standing in for an unreachable catalog.
struct FailingStore;

impl FrameStore for FailingStore {
    fn light_frames(&self, _range: Option<&DateRange>) -> Result<Vec<Frame>> {
        Err(StarlogError::Store("catalog unreachable".to_string()))
    }
    fn calibration_frames(&self, _range: Option<&DateRange>) -> Result<Vec<Frame>> {
        Err(StarlogError::Store("catalog unreachable".to_string()))
    }
}

#[test]
fn test_store_failure_aborts_without_partial_results() {
    let outcome = run_aggregation(
        &FailingStore,
        None,
        &MatchConfig::default(),
        &CancellationToken::new(),
    );
    assert!(outcome.is_err());
}

#[test]
fn test_background_run_reports_progress_then_completes_atomically() {
    let (tx, rx) = std::sync::mpsc::channel();
    let handle = spawn_aggregation(
        Arc::new(scenario_store()),
        None,
        MatchConfig::default(),
        tx,
    );

    let events: Vec<AggregationEvent> = rx.iter().collect();
    handle.join();

    assert!(matches!(
        events.first(),
        Some(AggregationEvent::Progress {
            stage: AggregationStage::LoadingFrames,
            ..
        })
    ));
    let Some(AggregationEvent::Completed(result)) = events.last() else {
        panic!("final event must be Completed");
    };
    assert_eq!(result.sessions.len(), 1);
    // Exactly one Completed event: the result set arrives whole.
    let completions = events
        .iter()
        .filter(|e| matches!(e, AggregationEvent::Completed(_)))
        .count();
    assert_eq!(completions, 1);
}

/// Store slow enough that a cancel lands before its first read returns.
struct SlowStore(InMemoryFrameStore);

impl FrameStore for SlowStore {
    fn light_frames(&self, range: Option<&DateRange>) -> Result<Vec<Frame>> {
        std::thread::sleep(Duration::from_millis(100));
        self.0.light_frames(range)
    }
    fn calibration_frames(&self, range: Option<&DateRange>) -> Result<Vec<Frame>> {
        self.0.calibration_frames(range)
    }
}

#[test]
fn test_cancelling_a_background_run_discards_it() {
    let (tx, rx) = std::sync::mpsc::channel();
    let handle = spawn_aggregation(
        Arc::new(SlowStore(scenario_store())),
        None,
        MatchConfig::default(),
        tx,
    );
    handle.cancel();

    let events: Vec<AggregationEvent> = rx.iter().collect();
    assert!(matches!(events.last(), Some(AggregationEvent::Cancelled)));
    assert!(!events
        .iter()
        .any(|e| matches!(e, AggregationEvent::Completed(_))));
}

#[test]
fn test_controller_keeps_only_the_newest_run() {
    let store: Arc<dyn FrameStore + Send + Sync> = Arc::new(SlowStore(scenario_store()));
    let mut controller = AggregationController::new();

    let first = controller.refresh(Arc::clone(&store), None, MatchConfig::default());
    let second = controller.refresh(Arc::clone(&store), None, MatchConfig::default());

    // The superseded run ends cancelled; only the newest completes.
    let first_events: Vec<AggregationEvent> = first.iter().collect();
    assert!(matches!(
        first_events.last(),
        Some(AggregationEvent::Cancelled)
    ));

    let second_events: Vec<AggregationEvent> = second.iter().collect();
    let Some(AggregationEvent::Completed(result)) = second_events.last() else {
        panic!("newest run must complete");
    };
    assert_eq!(result.sessions.len(), 1);
}
