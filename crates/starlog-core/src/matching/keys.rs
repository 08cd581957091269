//! Cache keys for the three calibration types.
//!
//! Keys hold rounded physical attributes as integers (exposure in tenths
//! of a second, temperature in whole degrees) so they can be hashed and
//! compared exactly. The key shapes differ per type; keeping them as
//! distinct structs means a matcher can never probe a map with a
//! wrong-shaped key.

use chrono::NaiveDate;

use crate::frame::Frame;

/// Exposure rounded to one decimal, stored as tenths of a second.
pub fn exposure_tenths(secs: f64) -> i64 {
    (secs * 10.0).round() as i64
}

/// Temperature rounded to the nearest whole degree.
pub fn whole_degrees(temp_c: f64) -> i32 {
    temp_c.round() as i32
}

/// Dark frames match on exposure, temperature, binning, and instrument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DarkKey {
    pub exposure_tenths: i64,
    pub temp_c: i32,
    pub binning_x: u32,
    pub binning_y: u32,
    pub instrument: Option<String>,
}

impl DarkKey {
    /// Key for a dark frame, or `None` if the frame lacks the exposure
    /// or temperature a dark needs to be matchable.
    pub fn for_frame(frame: &Frame) -> Option<Self> {
        Some(Self {
            exposure_tenths: exposure_tenths(frame.exposure_secs?),
            temp_c: whole_degrees(frame.sensor_temp_c?),
            binning_x: frame.binning_x,
            binning_y: frame.binning_y,
            instrument: frame.instrument.clone(),
        })
    }
}

/// Bias frames match on temperature, binning, and instrument; exposure
/// is irrelevant for a zero-length readout.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BiasKey {
    pub temp_c: i32,
    pub binning_x: u32,
    pub binning_y: u32,
    pub instrument: Option<String>,
}

impl BiasKey {
    pub fn for_frame(frame: &Frame) -> Option<Self> {
        Some(Self {
            temp_c: whole_degrees(frame.sensor_temp_c?),
            binning_x: frame.binning_x,
            binning_y: frame.binning_y,
            instrument: frame.instrument.clone(),
        })
    }
}

/// Flat frames match on filter, capture night, temperature, binning, and
/// instrument. The date is an exact key component: flats are only valid
/// for the night they were shot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlatKey {
    pub filter: Option<String>,
    pub date: NaiveDate,
    pub temp_c: i32,
    pub binning_x: u32,
    pub binning_y: u32,
    pub instrument: Option<String>,
}

impl FlatKey {
    pub fn for_frame(frame: &Frame) -> Option<Self> {
        Some(Self {
            filter: frame.filter_name.clone(),
            date: frame.session_date?,
            temp_c: whole_degrees(frame.sensor_temp_c?),
            binning_x: frame.binning_x,
            binning_y: frame.binning_y,
            instrument: frame.instrument.clone(),
        })
    }
}
