use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::frame::Frame;

/// Grouping key for an imaging session.
///
/// Two light frames belong to the same session only if all four fields
/// are equal element-wise. `None == None` holds (two frames with no
/// recorded instrument group together) but `None` never equals a
/// concrete value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub date: NaiveDate,
    pub object: Option<String>,
    pub filter: Option<String>,
    pub instrument: Option<String>,
}

/// Derived aggregate over the light frames of one imaging session.
///
/// Constructed fresh on every aggregation run and never mutated after
/// construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub key: SessionKey,
    pub light_frame_count: u32,
    /// Mean over frames that record an exposure; `None` if none do.
    pub avg_exposure_secs: Option<f64>,
    /// Mean over frames that record a temperature; `None` if none do.
    pub avg_temp_c: Option<f64>,
    pub binning_x: u32,
    pub binning_y: u32,
}

/// Output of session detection: the sessions plus the count of light
/// frames that could not be grouped.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionDetection {
    pub sessions: Vec<Session>,
    /// Light frames with no session date, excluded from grouping and
    /// reported here rather than silently dropped.
    pub unassignable_lights: u32,
}

struct SessionAccumulator {
    count: u32,
    exposure_sum: f64,
    exposure_count: u32,
    temp_sum: f64,
    temp_count: u32,
    binning_x: u32,
    binning_y: u32,
}

impl SessionAccumulator {
    fn new(first: &Frame) -> Self {
        Self {
            count: 0,
            exposure_sum: 0.0,
            exposure_count: 0,
            temp_sum: 0.0,
            temp_count: 0,
            binning_x: first.binning_x,
            binning_y: first.binning_y,
        }
    }

    fn add(&mut self, frame: &Frame) {
        self.count += 1;
        if let Some(exp) = frame.exposure_secs {
            self.exposure_sum += exp;
            self.exposure_count += 1;
        }
        if let Some(temp) = frame.sensor_temp_c {
            self.temp_sum += temp;
            self.temp_count += 1;
        }
        // First frame's binning wins; divergent binning inside one group
        // is a data-quality condition, not an error.
        if frame.binning_x != self.binning_x || frame.binning_y != self.binning_y {
            debug!(
                frame_id = frame.id.0,
                "mixed binning within session group, keeping first frame's binning"
            );
        }
    }

    fn mean(sum: f64, count: u32) -> Option<f64> {
        (count > 0).then(|| sum / f64::from(count))
    }
}

/// Group light frames into sessions by (date, object, filter, instrument).
///
/// Sessions are returned newest-first, then by object, filter, and
/// instrument with absent values ordered before present ones, so a
/// rerun over the same frames yields an identical session list.
pub fn detect_sessions(lights: &[Frame]) -> SessionDetection {
    let mut groups: HashMap<SessionKey, SessionAccumulator> = HashMap::new();
    let mut unassignable = 0u32;

    for frame in lights {
        let Some(date) = frame.session_date else {
            debug!(frame_id = frame.id.0, "light frame has no session date");
            unassignable += 1;
            continue;
        };
        let key = SessionKey {
            date,
            object: frame.object_name.clone(),
            filter: frame.filter_name.clone(),
            instrument: frame.instrument.clone(),
        };
        groups
            .entry(key)
            .or_insert_with(|| SessionAccumulator::new(frame))
            .add(frame);
    }

    let mut sessions: Vec<Session> = groups
        .into_iter()
        .map(|(key, acc)| Session {
            key,
            light_frame_count: acc.count,
            avg_exposure_secs: SessionAccumulator::mean(acc.exposure_sum, acc.exposure_count),
            avg_temp_c: SessionAccumulator::mean(acc.temp_sum, acc.temp_count),
            binning_x: acc.binning_x,
            binning_y: acc.binning_y,
        })
        .collect();

    sessions.sort_by(|a, b| {
        b.key
            .date
            .cmp(&a.key.date)
            .then_with(|| a.key.object.cmp(&b.key.object))
            .then_with(|| a.key.filter.cmp(&b.key.filter))
            .then_with(|| a.key.instrument.cmp(&b.key.instrument))
    });

    SessionDetection {
        sessions,
        unassignable_lights: unassignable,
    }
}
