/// Temperature tolerance for matching dark frames to a session (°C).
pub const DARK_TEMP_TOLERANCE_C: f64 = 1.0;

/// Temperature tolerance for matching bias frames to a session (°C).
pub const BIAS_TEMP_TOLERANCE_C: f64 = 1.0;

/// Temperature tolerance for matching flat frames to a session (°C).
/// Flats drift less with temperature than darks, hence the wider band.
pub const FLAT_TEMP_TOLERANCE_C: f64 = 3.0;

/// Exposure tolerance for matching dark frames to a session (seconds).
pub const EXPOSURE_TOLERANCE_SECS: f64 = 0.1;

/// Frame count at which a calibration set is considered acceptable.
pub const FRAMES_ACCEPTABLE: u32 = 10;

/// Frame count at which a calibration set scores 100%.
pub const FRAMES_RECOMMENDED: u32 = 20;

/// Number of sessions matched per batch during aggregation. Cancellation
/// is checked between batches; sessions within a batch run in parallel.
pub const MATCH_BATCH_SIZE: usize = 64;
