#![allow(dead_code)]

use chrono::NaiveDate;

use starlog_core::frame::{Frame, FrameId, FrameKind};
use starlog_core::session::{Session, SessionKey};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bare frame with 1x1 binning and every optional attribute absent.
pub fn frame(id: u64, kind: FrameKind) -> Frame {
    Frame {
        id: FrameId(id),
        kind,
        is_master: false,
        object_name: None,
        filter_name: None,
        exposure_secs: None,
        sensor_temp_c: None,
        binning_x: 1,
        binning_y: 1,
        session_date: None,
        instrument: None,
    }
}

pub fn light(id: u64, night: NaiveDate, object: &str) -> Frame {
    let mut f = frame(id, FrameKind::Light);
    f.session_date = Some(night);
    f.object_name = Some(object.to_string());
    f
}

pub fn dark(id: u64, exposure: f64, temp: f64) -> Frame {
    let mut f = frame(id, FrameKind::Dark);
    f.exposure_secs = Some(exposure);
    f.sensor_temp_c = Some(temp);
    f
}

pub fn bias(id: u64, temp: f64) -> Frame {
    let mut f = frame(id, FrameKind::Bias);
    f.sensor_temp_c = Some(temp);
    f
}

pub fn flat(id: u64, filter: Option<&str>, night: NaiveDate, temp: f64) -> Frame {
    let mut f = frame(id, FrameKind::Flat);
    f.filter_name = filter.map(str::to_string);
    f.session_date = Some(night);
    f.sensor_temp_c = Some(temp);
    f
}

pub fn with_instrument(mut f: Frame, name: &str) -> Frame {
    f.instrument = Some(name.to_string());
    f
}

pub fn as_master(mut f: Frame) -> Frame {
    f.is_master = true;
    f
}

/// Session profile assembled directly, for matcher-level tests.
pub fn session(
    night: NaiveDate,
    filter: Option<&str>,
    instrument: Option<&str>,
    avg_exposure: Option<f64>,
    avg_temp: Option<f64>,
) -> Session {
    Session {
        key: SessionKey {
            date: night,
            object: Some("M31".to_string()),
            filter: filter.map(str::to_string),
            instrument: instrument.map(str::to_string),
        },
        light_frame_count: 12,
        avg_exposure_secs: avg_exposure,
        avg_temp_c: avg_temp,
        binning_x: 1,
        binning_y: 1,
    }
}
