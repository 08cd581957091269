use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use starlog_core::frame::Frame;
use starlog_core::matching::MatchConfig;
use starlog_core::store::InMemoryFrameStore;

/// On-disk frame catalog: a TOML file with one `[[frames]]` table per
/// record. Stands in for the real catalog store behind `FrameStore`.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    frames: Vec<Frame>,
}

pub fn load_catalog(path: &Path) -> Result<InMemoryFrameStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog: CatalogFile = toml::from_str(&text)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    Ok(InMemoryFrameStore::new(catalog.frames))
}

/// Matching config from a TOML file, or the defaults when no path is
/// given. Omitted fields fall back to their defaults.
pub fn load_match_config(path: Option<&Path>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlog_core::frame::FrameKind;
    use starlog_core::store::FrameStore;

    #[test]
    fn test_parse_minimal_catalog() {
        let text = r#"
            [[frames]]
            id = 1
            kind = "Light"
            object_name = "M31"
            filter_name = "Ha"
            exposure_secs = 300.0
            sensor_temp_c = -10.2
            binning_x = 1
            binning_y = 1
            session_date = "2026-01-15"
            instrument = "CamA"

            [[frames]]
            id = 2
            kind = "Dark"
            is_master = true
            exposure_secs = 300.0
            sensor_temp_c = -10.0
            binning_x = 1
            binning_y = 1
        "#;
        let catalog: CatalogFile = toml::from_str(text).unwrap();
        let store = InMemoryFrameStore::new(catalog.frames);

        let lights = store.light_frames(None).unwrap();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].kind, FrameKind::Light);
        assert_eq!(lights[0].instrument.as_deref(), Some("CamA"));

        let calibration = store.calibration_frames(None).unwrap();
        assert_eq!(calibration.len(), 1);
        assert!(calibration[0].is_master);
        assert!(calibration[0].session_date.is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let text = r#"
            [[frames]]
            id = 1
            kind = "Lumen"
            binning_x = 1
            binning_y = 1
        "#;
        assert!(toml::from_str::<CatalogFile>(text).is_err());
    }

    #[test]
    fn test_config_defaults_fill_omitted_fields() {
        let config: MatchConfig = toml::from_str("dark_temp_tolerance_c = 2.0").unwrap();
        assert_eq!(config.dark_temp_tolerance_c, 2.0);
        assert_eq!(config.frames_recommended, 20);
        assert!(config.include_masters);
    }
}
