use crate::matching::{CalibrationMatchResult, MatchConfig};

/// 0–100 score for one calibration type, linear in the frame count and
/// saturating at the recommended count: 0 frames → 0, half the
/// recommendation → 50, at or above it → 100.
///
/// A master frame does not move this number; it is surfaced separately
/// through `has_master` and feeds status classification instead.
pub fn quality_score(frame_count: u32, config: &MatchConfig) -> u8 {
    let recommended = config.frames_recommended.max(1);
    let pct = f64::from(frame_count) / f64::from(recommended) * 100.0;
    pct.round().min(100.0) as u8
}

/// Overall readiness of a session, recomputed fresh every run from its
/// three match results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// No compatible calibration of any type.
    Missing,
    /// Some types covered, others not.
    Partial,
    /// Every type has enough frames or a master.
    Complete,
    /// Complete, with at least one type backed by a master.
    CompleteWithMasters,
}

impl SessionStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete | Self::CompleteWithMasters)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing"),
            Self::Partial => write!(f, "Partial"),
            Self::Complete => write!(f, "Complete"),
            Self::CompleteWithMasters => write!(f, "Complete (masters)"),
        }
    }
}

/// Classify a session from its three match results.
///
/// The floor is inclusive: exactly `frames_acceptable` frames satisfies
/// a type.
pub fn classify_status(
    darks: &CalibrationMatchResult,
    bias: &CalibrationMatchResult,
    flats: &CalibrationMatchResult,
    config: &MatchConfig,
) -> SessionStatus {
    let results = [darks, bias, flats];

    if results.iter().all(|r| r.frame_count == 0 && !r.has_master) {
        return SessionStatus::Missing;
    }
    if results.iter().all(|r| r.satisfies_floor(config)) {
        if results.iter().any(|r| r.has_master) {
            SessionStatus::CompleteWithMasters
        } else {
            SessionStatus::Complete
        }
    } else {
        SessionStatus::Partial
    }
}
