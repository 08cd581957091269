use serde::{Deserialize, Serialize};

use crate::consts::{
    BIAS_TEMP_TOLERANCE_C, DARK_TEMP_TOLERANCE_C, EXPOSURE_TOLERANCE_SECS, FLAT_TEMP_TOLERANCE_C,
    FRAMES_ACCEPTABLE, FRAMES_RECOMMENDED,
};

/// Tunables for calibration matching and session classification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Temperature tolerance for dark frame matching (°C).
    #[serde(default = "default_dark_temp_tolerance")]
    pub dark_temp_tolerance_c: f64,
    /// Temperature tolerance for bias frame matching (°C).
    #[serde(default = "default_bias_temp_tolerance")]
    pub bias_temp_tolerance_c: f64,
    /// Temperature tolerance for flat frame matching (°C).
    #[serde(default = "default_flat_temp_tolerance")]
    pub flat_temp_tolerance_c: f64,
    /// Exposure tolerance for dark frame matching (seconds).
    #[serde(default = "default_exposure_tolerance")]
    pub exposure_tolerance_secs: f64,
    /// Minimum frames per calibration type for a session to count as
    /// covered.
    #[serde(default = "default_frames_acceptable")]
    pub frames_acceptable: u32,
    /// Frame count at which a calibration set scores 100%.
    #[serde(default = "default_frames_recommended")]
    pub frames_recommended: u32,
    /// Whether master frames participate in matching. When off, a master
    /// neither sets `has_master` nor backs a session's completeness.
    #[serde(default = "default_include_masters")]
    pub include_masters: bool,
}

fn default_dark_temp_tolerance() -> f64 {
    DARK_TEMP_TOLERANCE_C
}
fn default_bias_temp_tolerance() -> f64 {
    BIAS_TEMP_TOLERANCE_C
}
fn default_flat_temp_tolerance() -> f64 {
    FLAT_TEMP_TOLERANCE_C
}
fn default_exposure_tolerance() -> f64 {
    EXPOSURE_TOLERANCE_SECS
}
fn default_frames_acceptable() -> u32 {
    FRAMES_ACCEPTABLE
}
fn default_frames_recommended() -> u32 {
    FRAMES_RECOMMENDED
}
fn default_include_masters() -> bool {
    true
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            dark_temp_tolerance_c: DARK_TEMP_TOLERANCE_C,
            bias_temp_tolerance_c: BIAS_TEMP_TOLERANCE_C,
            flat_temp_tolerance_c: FLAT_TEMP_TOLERANCE_C,
            exposure_tolerance_secs: EXPOSURE_TOLERANCE_SECS,
            frames_acceptable: FRAMES_ACCEPTABLE,
            frames_recommended: FRAMES_RECOMMENDED,
            include_masters: true,
        }
    }
}
