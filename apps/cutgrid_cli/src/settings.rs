use anyhow::{Context, Result};
use cutgrid_cache::{waveform, CacheConfig};
use cutgrid_core::types::LayoutConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Everything tunable from a `--config` JSON file.
///
/// The file is layered over the defaults field by field, so a partial cache
/// section keeps the rest of that cache's preset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub waveforms: CacheConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            waveforms: CacheConfig::waveforms(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let overrides: Value = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        let mut merged = serde_json::to_value(Self::default())?;
        merge(&mut merged, overrides);
        let settings: Settings = serde_json::from_value(merged)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        waveform::validate_config(&self.waveforms).context("Invalid waveforms cache config")?;
        if self.layout.padding.is_nan() || self.layout.padding < 0.0 {
            anyhow::bail!("layout.padding must be a non-negative number");
        }
        Ok(())
    }
}

/// Overlay `patch` onto `base`. Objects merge key by key; anything else,
/// `null` included, replaces the base value.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("cutgrid.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn no_path_gives_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.waveforms.capacity, None);
        assert_eq!(settings.layout.padding, 10.0);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"layout": {"padding": 4}, "waveforms": {"max_age_ms": 60000}}"#);

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.layout.padding, 4.0);
        assert_eq!(settings.layout.min_transition_px, 20.0);
        assert_eq!(settings.waveforms.max_age_ms, Some(60_000));
        assert_eq!(settings.waveforms.capacity, None);
    }

    #[test]
    fn merge_keeps_preset_fields_not_mentioned() {
        let mut base = serde_json::to_value(CacheConfig::thumbnails()).unwrap();
        merge(&mut base, json!({ "capacity": 8 }));
        let config: CacheConfig = serde_json::from_value(base).unwrap();
        assert_eq!(config.capacity, Some(8));
        assert_eq!(config.max_age_ms, CacheConfig::thumbnails().max_age_ms);
    }

    #[test]
    fn explicit_null_clears_a_field() {
        let mut base = serde_json::to_value(CacheConfig::thumbnails()).unwrap();
        merge(&mut base, json!({ "max_age_ms": null }));
        let config: CacheConfig = serde_json::from_value(base).unwrap();
        assert_eq!(config.max_age_ms, None);
        assert_eq!(config.capacity, Some(50));
    }

    #[test]
    fn waveform_capacity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"waveforms": {"capacity": 2}}"#);
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn negative_padding_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"layout": {"padding": -1}}"#);
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.json"))).is_err());
    }
}
