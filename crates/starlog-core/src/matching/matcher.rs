use crate::frame::{CalibrationKind, Frame};
use crate::scoring::quality_score;
use crate::session::Session;

use super::cache::{CachedFrame, CalibrationCache};
use super::config::MatchConfig;
use super::keys::{exposure_tenths, whole_degrees, BiasKey, DarkKey, FlatKey};

/// Outcome of matching one calibration type against a session.
///
/// The quality score is derived from the count and master flag at
/// construction and cannot be set independently of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibrationMatchResult {
    /// Tolerance-compatible non-master frames.
    pub frame_count: u32,
    /// At least one compatible master frame exists.
    pub has_master: bool,
    quality_score: u8,
}

impl CalibrationMatchResult {
    pub fn new(frame_count: u32, has_master: bool, config: &MatchConfig) -> Self {
        Self {
            frame_count,
            has_master,
            quality_score: quality_score(frame_count, config),
        }
    }

    /// 0–100 score, linear in `frame_count` up to the recommended count.
    pub fn quality_score(&self) -> u8 {
        self.quality_score
    }

    /// Enough frames (or a master) for this type to count as covered.
    pub fn satisfies_floor(&self, config: &MatchConfig) -> bool {
        self.frame_count >= config.frames_acceptable || self.has_master
    }
}

/// Widest whole-degree bucket offset still within the tolerance. Bucket
/// distances are whole degrees, so a bucket at offset k matches iff
/// k <= tolerance.
fn degree_span(tolerance_c: f64) -> i32 {
    (tolerance_c + 1e-9).floor() as i32
}

/// Widest tenth-of-a-second bucket offset still within the tolerance.
fn tenths_span(tolerance_secs: f64) -> i64 {
    (tolerance_secs * 10.0 + 1e-9).floor() as i64
}

/// Fold one bucket of cached frames into the running totals. Masters are
/// flagged, not counted; with `include_masters` off they are ignored
/// entirely.
fn accumulate(entries: &[CachedFrame], config: &MatchConfig, count: &mut u32, master: &mut bool) {
    for entry in entries {
        if entry.is_master {
            *master |= config.include_masters;
        } else {
            *count += 1;
        }
    }
}

/// Match one calibration type against a session via the per-run cache
/// (the hot path).
///
/// Both this and [`match_session_scan`] compare the same rounded buckets
/// under the same tolerance spans, so the two modes agree exactly. A
/// session missing the average a type needs (exposure for darks,
/// temperature for all three) matches nothing for that type: an unknown
/// value is never a wildcard.
pub fn match_session(
    session: &Session,
    kind: CalibrationKind,
    cache: &CalibrationCache,
    config: &MatchConfig,
) -> CalibrationMatchResult {
    match kind {
        CalibrationKind::Dark => match_darks(session, cache, config),
        CalibrationKind::Bias => match_bias(session, cache, config),
        CalibrationKind::Flat => match_flats(session, cache, config),
    }
}

fn match_darks(
    session: &Session,
    cache: &CalibrationCache,
    config: &MatchConfig,
) -> CalibrationMatchResult {
    let (Some(exposure), Some(temp)) = (session.avg_exposure_secs, session.avg_temp_c) else {
        return CalibrationMatchResult::new(0, false, config);
    };
    let exposure = exposure_tenths(exposure);
    let temp = whole_degrees(temp);
    let exp_span = tenths_span(config.exposure_tolerance_secs);
    let temp_span = degree_span(config.dark_temp_tolerance_c);

    let mut count = 0;
    let mut master = false;
    for de in -exp_span..=exp_span {
        for dt in -temp_span..=temp_span {
            let key = DarkKey {
                exposure_tenths: exposure + de,
                temp_c: temp + dt,
                binning_x: session.binning_x,
                binning_y: session.binning_y,
                instrument: session.key.instrument.clone(),
            };
            accumulate(cache.darks_at(&key), config, &mut count, &mut master);
        }
    }
    CalibrationMatchResult::new(count, master, config)
}

fn match_bias(
    session: &Session,
    cache: &CalibrationCache,
    config: &MatchConfig,
) -> CalibrationMatchResult {
    let Some(temp) = session.avg_temp_c else {
        return CalibrationMatchResult::new(0, false, config);
    };
    let temp = whole_degrees(temp);
    let temp_span = degree_span(config.bias_temp_tolerance_c);

    let mut count = 0;
    let mut master = false;
    for dt in -temp_span..=temp_span {
        let key = BiasKey {
            temp_c: temp + dt,
            binning_x: session.binning_x,
            binning_y: session.binning_y,
            instrument: session.key.instrument.clone(),
        };
        accumulate(cache.bias_at(&key), config, &mut count, &mut master);
    }
    CalibrationMatchResult::new(count, master, config)
}

fn match_flats(
    session: &Session,
    cache: &CalibrationCache,
    config: &MatchConfig,
) -> CalibrationMatchResult {
    let Some(temp) = session.avg_temp_c else {
        return CalibrationMatchResult::new(0, false, config);
    };
    let temp = whole_degrees(temp);
    let temp_span = degree_span(config.flat_temp_tolerance_c);

    let mut count = 0;
    let mut master = false;
    for dt in -temp_span..=temp_span {
        let key = FlatKey {
            filter: session.key.filter.clone(),
            date: session.key.date,
            temp_c: temp + dt,
            binning_x: session.binning_x,
            binning_y: session.binning_y,
            instrument: session.key.instrument.clone(),
        };
        accumulate(cache.flats_at(&key), config, &mut count, &mut master);
    }
    CalibrationMatchResult::new(count, master, config)
}

/// Match one calibration type against a session by scanning the frame
/// list directly (the cold path), for small catalogs and for
/// cross-checking the cache.
pub fn match_session_scan(
    session: &Session,
    kind: CalibrationKind,
    calibration_frames: &[Frame],
    config: &MatchConfig,
) -> CalibrationMatchResult {
    let frames = calibration_frames
        .iter()
        .filter(|f| f.kind == kind.frame_kind());

    let mut count = 0;
    let mut master = false;
    match kind {
        CalibrationKind::Dark => {
            let (Some(exposure), Some(temp)) = (session.avg_exposure_secs, session.avg_temp_c)
            else {
                return CalibrationMatchResult::new(0, false, config);
            };
            let exposure = exposure_tenths(exposure);
            let temp = whole_degrees(temp);
            let exp_span = tenths_span(config.exposure_tolerance_secs);
            let temp_span = degree_span(config.dark_temp_tolerance_c);
            for frame in frames {
                let Some(key) = DarkKey::for_frame(frame) else {
                    continue;
                };
                if (key.exposure_tenths - exposure).abs() <= exp_span
                    && (key.temp_c - temp).abs() <= temp_span
                    && key.binning_x == session.binning_x
                    && key.binning_y == session.binning_y
                    && key.instrument == session.key.instrument
                {
                    tally(frame, config, &mut count, &mut master);
                }
            }
        }
        CalibrationKind::Bias => {
            let Some(temp) = session.avg_temp_c else {
                return CalibrationMatchResult::new(0, false, config);
            };
            let temp = whole_degrees(temp);
            let temp_span = degree_span(config.bias_temp_tolerance_c);
            for frame in frames {
                let Some(key) = BiasKey::for_frame(frame) else {
                    continue;
                };
                if (key.temp_c - temp).abs() <= temp_span
                    && key.binning_x == session.binning_x
                    && key.binning_y == session.binning_y
                    && key.instrument == session.key.instrument
                {
                    tally(frame, config, &mut count, &mut master);
                }
            }
        }
        CalibrationKind::Flat => {
            let Some(temp) = session.avg_temp_c else {
                return CalibrationMatchResult::new(0, false, config);
            };
            let temp = whole_degrees(temp);
            let temp_span = degree_span(config.flat_temp_tolerance_c);
            for frame in frames {
                let Some(key) = FlatKey::for_frame(frame) else {
                    continue;
                };
                if key.filter == session.key.filter
                    && key.date == session.key.date
                    && (key.temp_c - temp).abs() <= temp_span
                    && key.binning_x == session.binning_x
                    && key.binning_y == session.binning_y
                    && key.instrument == session.key.instrument
                {
                    tally(frame, config, &mut count, &mut master);
                }
            }
        }
    }
    CalibrationMatchResult::new(count, master, config)
}

fn tally(frame: &Frame, config: &MatchConfig, count: &mut u32, master: &mut bool) {
    if frame.is_master {
        *master |= config.include_masters;
    } else {
        *count += 1;
    }
}
