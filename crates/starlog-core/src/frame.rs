use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identity of an imported frame record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub u64);

/// What an exposure captured. Fixed at import time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameKind {
    Light,
    Dark,
    Flat,
    Bias,
}

/// The three calibration frame types a session is matched against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalibrationKind {
    Dark,
    Bias,
    Flat,
}

impl CalibrationKind {
    pub const ALL: [CalibrationKind; 3] = [
        CalibrationKind::Dark,
        CalibrationKind::Bias,
        CalibrationKind::Flat,
    ];

    /// The `FrameKind` carrying this calibration data.
    pub fn frame_kind(self) -> FrameKind {
        match self {
            Self::Dark => FrameKind::Dark,
            Self::Bias => FrameKind::Bias,
            Self::Flat => FrameKind::Flat,
        }
    }
}

impl std::fmt::Display for CalibrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Bias => write!(f, "bias"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// One imported exposure record.
///
/// Every attribute except `id`, `kind`, and the binning may be absent;
/// grouping and matching tolerate the gaps (frames missing an attribute
/// a computation needs are excluded from it and surfaced through run
/// diagnostics, never silently matched).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub kind: FrameKind,
    /// Pre-combined master frame substituting for many individual frames.
    #[serde(default)]
    pub is_master: bool,
    /// Target name; absent for calibration frames.
    pub object_name: Option<String>,
    /// Present for lights and flats, irrelevant for darks and bias.
    pub filter_name: Option<String>,
    /// Meaningful for lights and darks, not for bias.
    pub exposure_secs: Option<f64>,
    pub sensor_temp_c: Option<f64>,
    pub binning_x: u32,
    pub binning_y: u32,
    /// Calendar date of the imaging night, normalized upstream.
    pub session_date: Option<NaiveDate>,
    /// Capture device. Unknown is a distinct value, not a wildcard.
    pub instrument: Option<String>,
}
