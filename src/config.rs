//! Process settings read from a JSON document.
//!
//! Keys are uppercase (`W`, `H`, `AOV`, ...). A document may name any subset
//! of them; the rest keep their current values. `ASR` is always `W / H` and
//! is never read back from input.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::projection::Projection;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Settings {
    pub far_clip: f32,
    pub near_clip: f32,
    /// Face normals shorter than this are treated as zero.
    pub epsilon: f32,
    /// Vertical field of view in degrees.
    pub aov: f32,
    #[serde(rename = "W")]
    pub width: u32,
    #[serde(rename = "H")]
    pub height: u32,
    /// Target frames per second. 0 disables the limiter.
    pub fps: u32,
    /// Seconds between frame statistics log lines.
    pub update_time: f32,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            far_clip: 1e8,
            near_clip: 1e-3,
            epsilon: 1e-8,
            aov: 45.0,
            width: 640,
            height: 480,
            fps: 240,
            update_time: 2.0,
            debug: true,
        }
    }
}

/// Fields a document may override. Unknown keys, `ASR` included, are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct SettingsOverrides {
    far_clip: Option<f32>,
    near_clip: Option<f32>,
    epsilon: Option<f32>,
    aov: Option<f32>,
    w: Option<u32>,
    h: Option<u32>,
    fps: Option<u32>,
    update_time: Option<f32>,
    debug: Option<bool>,
}

impl Settings {
    /// Defaults overlaid with the document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.apply_file(path)?;
        Ok(settings)
    }

    pub fn apply_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_json(&json)
    }

    /// Overlays the fields present in `json`. On error `self` is unchanged.
    pub fn apply_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let overrides: SettingsOverrides = serde_json::from_str(json)?;

        let mut next = self.clone();
        if let Some(v) = overrides.far_clip {
            next.far_clip = v;
        }
        if let Some(v) = overrides.near_clip {
            next.near_clip = v;
        }
        if let Some(v) = overrides.epsilon {
            next.epsilon = v;
        }
        if let Some(v) = overrides.aov {
            next.aov = v;
        }
        if let Some(v) = overrides.w {
            next.width = v;
        }
        if let Some(v) = overrides.h {
            next.height = v;
        }
        if let Some(v) = overrides.fps {
            next.fps = v;
        }
        if let Some(v) = overrides.update_time {
            next.update_time = v;
        }
        if let Some(v) = overrides.debug {
            next.debug = v;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Writes every field, `ASR` included for reference.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let mut document = serde_json::to_value(self)?;
        if let Some(fields) = document.as_object_mut() {
            fields.insert("ASR".to_string(), self.aspect_ratio().into());
        }
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            }
        }

        if self.width == 0 {
            return Err(invalid("W", "must be positive"));
        }
        if self.height == 0 {
            return Err(invalid("H", "must be positive"));
        }
        if !(self.aov > 0.0 && self.aov < 180.0) {
            return Err(invalid("AOV", format!("{} is outside (0, 180)", self.aov)));
        }
        if !(self.near_clip > 0.0) {
            return Err(invalid("NEAR_CLIP", "must be positive"));
        }
        if !(self.far_clip > self.near_clip) {
            return Err(invalid(
                "FAR_CLIP",
                format!("{} is not beyond NEAR_CLIP {}", self.far_clip, self.near_clip),
            ));
        }
        if !(self.epsilon >= 0.0) {
            return Err(invalid("EPSILON", "must be non-negative"));
        }
        if !(self.update_time >= 0.0) {
            return Err(invalid("UPDATE_TIME", "must be non-negative"));
        }
        if Duration::try_from_secs_f32(self.update_time).is_err() {
            return Err(invalid(
                "UPDATE_TIME",
                format!("{}s is not a representable interval", self.update_time),
            ));
        }
        Ok(())
    }

    /// Always `W / H`.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn projection(&self) -> Projection {
        Projection::from_degrees(self.aov, self.aspect_ratio(), self.near_clip, self.far_clip)
    }

    /// Interval between frame statistics. Saturates for out-of-range values.
    pub fn stats_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.update_time).unwrap_or(Duration::MAX)
    }

    /// Time per frame at the target rate, or `None` when uncapped.
    pub fn frame_budget(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs_f64(1.0 / self.fps as f64))
    }

    pub fn log_summary(&self) {
        log::info!(
            "settings: {}x{} (ASR {:.4}), AOV {}°, clip [{}, {}], EPSILON {}",
            self.width,
            self.height,
            self.aspect_ratio(),
            self.aov,
            self.near_clip,
            self.far_clip,
            self.epsilon
        );
        log::info!(
            "settings: FPS {}, UPDATE_TIME {}s, DEBUG {}",
            self.fps,
            self.update_time,
            self.debug
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_derive_aspect_ratio() {
        let settings = Settings::default();
        assert_eq!((settings.width, settings.height), (640, 480));
        assert_relative_eq!(settings.aspect_ratio(), 4.0 / 3.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let mut settings = Settings::default();
        settings.apply_json(r#"{ "W": 800, "DEBUG": false }"#).unwrap();
        assert_eq!(settings.width, 800);
        assert_eq!(settings.height, 480);
        assert!(!settings.debug);
        assert_relative_eq!(settings.aov, 45.0);
        assert_relative_eq!(settings.aspect_ratio(), 800.0 / 480.0);
    }

    #[test]
    fn aspect_ratio_in_input_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_json(r#"{ "W": 100, "H": 50, "ASR": 9.0 }"#).unwrap();
        assert_relative_eq!(settings.aspect_ratio(), 2.0);
    }

    #[test]
    fn invalid_values_leave_settings_untouched() {
        let mut settings = Settings::default();
        let before = settings.clone();

        for json in [
            r#"{ "W": 0 }"#,
            r#"{ "AOV": 180 }"#,
            r#"{ "NEAR_CLIP": 10, "FAR_CLIP": 5 }"#,
            r#"{ "NEAR_CLIP": 0 }"#,
            r#"{ "EPSILON": -1 }"#,
        ] {
            let err = settings.apply_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{json}: {err}");
        }
        assert!(matches!(
            settings.apply_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(settings, before);
    }

    #[test]
    fn unrepresentable_update_time_is_rejected() {
        let mut settings = Settings::default();
        let err = settings.apply_json(r#"{ "UPDATE_TIME": 1e30 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "UPDATE_TIME",
                ..
            }
        ));
        assert_relative_eq!(settings.update_time, 2.0);

        // Large but representable values are fine.
        settings.apply_json(r#"{ "UPDATE_TIME": 1e9 }"#).unwrap();
        assert!(settings.stats_interval() >= Duration::from_secs(999_999_000));
    }

    #[test]
    fn stats_interval_saturates_after_direct_assignment() {
        let mut settings = Settings::default();
        settings.update_time = f32::MAX;
        assert_eq!(settings.stats_interval(), Duration::MAX);
    }

    #[test]
    fn aspect_ratio_tracks_direct_assignment() {
        let mut settings = Settings::default();
        settings.width = 300;
        settings.height = 100;
        assert_relative_eq!(settings.aspect_ratio(), 3.0);
        assert_relative_eq!(settings.projection().aspect_ratio(), 3.0);
    }

    #[test]
    fn uncapped_fps_has_no_budget() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.frame_budget(),
            Some(Duration::from_secs_f64(1.0 / 240.0))
        );
        settings.apply_json(r#"{ "FPS": 0 }"#).unwrap();
        assert_eq!(settings.frame_budget(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut settings = Settings::default();
        settings
            .apply_json(
                r#"{ "FAR_CLIP": 250.5, "NEAR_CLIP": 0.25, "EPSILON": 1e-6, "AOV": 72.5,
                     "W": 320, "H": 200, "FPS": 30, "UPDATE_TIME": 0.5, "DEBUG": false }"#,
            )
            .unwrap();

        let path = std::env::temp_dir().join(format!("liraster-config-{}.json", std::process::id()));
        settings.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"ASR\""));
        assert!(written.contains("\"DEBUG\": false"));

        let reloaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(reloaded, settings);
        assert_relative_eq!(reloaded.aspect_ratio(), 320.0 / 200.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Settings::load("/nonexistent/liraster.json").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with("liraster.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
