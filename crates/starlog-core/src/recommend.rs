//! Actionable capture guidance for incomplete sessions.
//!
//! Pure text derivation from an already-matched session; no matching
//! happens here. Instructions quote the session's own averaged profile
//! (exposure to one decimal, temperature to the nearest degree) so the
//! user can dial in the capture directly. Profile fields the session
//! does not record are left out of the phrasing.

use crate::frame::CalibrationKind;
use crate::matching::keys::whole_degrees;
use crate::matching::{CalibrationMatchResult, MatchConfig};
use crate::scoring::SessionStatus;
use crate::session::Session;

/// Recommendation strings for one session, in calibration-type order.
///
/// A type at or above the recommended count, or backed by a master,
/// gets no line. A fully complete session gets a single confirmation
/// plus nice-to-have lines for types still under the recommended count.
pub fn recommendations(
    session: &Session,
    darks: &CalibrationMatchResult,
    bias: &CalibrationMatchResult,
    flats: &CalibrationMatchResult,
    status: SessionStatus,
    config: &MatchConfig,
) -> Vec<String> {
    let per_kind = [
        (CalibrationKind::Dark, darks),
        (CalibrationKind::Bias, bias),
        (CalibrationKind::Flat, flats),
    ];
    let mut lines = Vec::new();

    if status.is_complete() {
        lines.push(if status == SessionStatus::CompleteWithMasters {
            "Session is fully calibrated; master frames are available".to_string()
        } else {
            "All calibration frame types are covered".to_string()
        });
        for (kind, result) in per_kind {
            if !result.has_master && result.frame_count < config.frames_recommended {
                lines.push(format!(
                    "Consider adding more {kind} frames: currently {}, recommended {}+",
                    result.frame_count, config.frames_recommended
                ));
            }
        }
        return lines;
    }

    for (kind, result) in per_kind {
        if result.has_master || result.frame_count >= config.frames_recommended {
            continue;
        }
        lines.push(if result.frame_count == 0 {
            format!(
                "Capture {kind} frames: {} (minimum {}, recommended {}+)",
                capture_profile(session, kind),
                config.frames_acceptable,
                config.frames_recommended
            )
        } else if result.frame_count < config.frames_acceptable {
            format!(
                "Add {} more {kind} frames: currently {}, need at least {} for usable calibration",
                config.frames_acceptable - result.frame_count,
                result.frame_count,
                config.frames_acceptable
            )
        } else {
            format!(
                "Add {} more {kind} frames: currently {}, recommended {}+",
                config.frames_recommended - result.frame_count,
                result.frame_count,
                config.frames_recommended
            )
        });
    }
    lines
}

/// The capture settings to quote for a missing calibration type, from
/// the session's averaged profile.
fn capture_profile(session: &Session, kind: CalibrationKind) -> String {
    let exposure = session
        .avg_exposure_secs
        .map(|e| format!("~{e:.1}s exposure"));
    let temp = session.avg_temp_c.map(|t| format!("~{}°C", whole_degrees(t)));
    let binning = Some(format!("{}x{} binning", session.binning_x, session.binning_y));

    let parts: Vec<Option<String>> = match kind {
        CalibrationKind::Dark => vec![exposure, temp, binning],
        CalibrationKind::Bias => vec![temp, binning],
        CalibrationKind::Flat => {
            let filter = Some(match &session.key.filter {
                Some(name) => format!("{name} filter"),
                None => "no filter".to_string(),
            });
            let date = Some(format!("on {}", session.key.date));
            vec![filter, date, temp, binning]
        }
    };
    parts
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
}
