use chrono::NaiveDate;

use crate::error::Result;
use crate::frame::{Frame, FrameKind};

/// Inclusive calendar-date window for pre-filtering store queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Queryable collection of frame records, the seam to whatever actually
/// persists the catalog.
///
/// The engine issues exactly one call to each method per aggregation run,
/// regardless of catalog size. Reads are fallible; retrying is the
/// caller's concern, not the engine's.
///
/// Frames without a `session_date` always pass a range filter: they
/// cannot be placed in any window, and the aggregation surfaces them
/// through diagnostics instead of dropping them here.
pub trait FrameStore {
    /// All light frames, optionally restricted to a date range.
    fn light_frames(&self, range: Option<&DateRange>) -> Result<Vec<Frame>>;

    /// All dark, bias, and flat frames, optionally restricted to a date
    /// range.
    fn calibration_frames(&self, range: Option<&DateRange>) -> Result<Vec<Frame>>;
}

/// Frame store backed by a plain `Vec`, used by tests and the CLI
/// catalog loader.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFrameStore {
    frames: Vec<Frame>,
}

impl InMemoryFrameStore {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn select(&self, pred: impl Fn(&Frame) -> bool, range: Option<&DateRange>) -> Vec<Frame> {
        self.frames
            .iter()
            .filter(|&f| pred(f))
            .filter(|f| match (range, f.session_date) {
                (Some(r), Some(date)) => r.contains(date),
                _ => true,
            })
            .cloned()
            .collect()
    }
}

impl FrameStore for InMemoryFrameStore {
    fn light_frames(&self, range: Option<&DateRange>) -> Result<Vec<Frame>> {
        Ok(self.select(|f| f.kind == FrameKind::Light, range))
    }

    fn calibration_frames(&self, range: Option<&DateRange>) -> Result<Vec<Frame>> {
        Ok(self.select(|f| f.kind != FrameKind::Light, range))
    }
}
