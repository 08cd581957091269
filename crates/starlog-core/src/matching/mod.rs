pub mod cache;
pub mod config;
pub mod keys;
pub mod matcher;

pub use cache::{CachedFrame, CalibrationCache};
pub use config::MatchConfig;
pub use matcher::{match_session, match_session_scan, CalibrationMatchResult};
