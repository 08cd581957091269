use std::collections::HashMap;

use tracing::debug;

use crate::frame::{Frame, FrameId, FrameKind};

use super::keys::{BiasKey, DarkKey, FlatKey};

/// Minimal record the cache keeps per calibration frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachedFrame {
    pub id: FrameId,
    pub is_master: bool,
}

/// Per-run index of calibration frames by rounded physical attributes.
///
/// Built once from a single scan of the calibration frames, owned by
/// exactly one aggregation run, and read-only afterwards. Matching a
/// session means probing the small range of buckets whose rounded
/// temperature (and, for darks, exposure) falls within tolerance of the
/// session's averages, not just the single nearest bucket.
#[derive(Debug, Default)]
pub struct CalibrationCache {
    darks: HashMap<DarkKey, Vec<CachedFrame>>,
    bias: HashMap<BiasKey, Vec<CachedFrame>>,
    flats: HashMap<FlatKey, Vec<CachedFrame>>,
    unusable: u32,
}

impl CalibrationCache {
    /// Index calibration frames for one aggregation run.
    ///
    /// Frames lacking a required attribute for their type (a dark with
    /// no exposure, a flat with no date) cannot be matched safely; they
    /// are left out and counted so the run's diagnostics can surface
    /// them. Master frames are stored alongside regular frames, flagged.
    pub fn build(frames: &[Frame]) -> Self {
        let mut cache = Self::default();

        for frame in frames {
            let entry = CachedFrame {
                id: frame.id,
                is_master: frame.is_master,
            };
            let inserted = match frame.kind {
                FrameKind::Dark => DarkKey::for_frame(frame)
                    .map(|key| cache.darks.entry(key).or_default().push(entry))
                    .is_some(),
                FrameKind::Bias => BiasKey::for_frame(frame)
                    .map(|key| cache.bias.entry(key).or_default().push(entry))
                    .is_some(),
                FrameKind::Flat => FlatKey::for_frame(frame)
                    .map(|key| cache.flats.entry(key).or_default().push(entry))
                    .is_some(),
                FrameKind::Light => {
                    debug!(frame_id = frame.id.0, "light frame in calibration scan, skipping");
                    continue;
                }
            };
            if !inserted {
                debug!(
                    frame_id = frame.id.0,
                    kind = ?frame.kind,
                    "calibration frame missing required attributes, excluded from cache"
                );
                cache.unusable += 1;
            }
        }

        cache
    }

    pub fn darks_at(&self, key: &DarkKey) -> &[CachedFrame] {
        self.darks.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bias_at(&self, key: &BiasKey) -> &[CachedFrame] {
        self.bias.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn flats_at(&self, key: &FlatKey) -> &[CachedFrame] {
        self.flats.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Calibration frames excluded at build time for missing attributes.
    pub fn unusable_count(&self) -> u32 {
        self.unusable
    }
}
