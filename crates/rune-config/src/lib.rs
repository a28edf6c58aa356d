//! Rune animation configuration system
//!
//! This crate loads animation defaults and logging settings from `rune.toml`,
//! with environment variables taking precedence for quick overrides.
//!
//! ```toml
//! [animation]
//! speed_ms = 16
//! duration_ms = 400
//! loops = 0
//! ping_pong = false
//! direction = "forward"
//!
//! [animation.curve]
//! function = "quadratic"
//! weight = "in_out"
//!
//! [logging]
//! filter = "info"
//! ```

use log::warn;
use rune_animation::{
    Animatable, AnimationCurve, AnimationError, CurveFunction, CurveWeight, Direction,
    KeyFrameAnimation,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "rune.toml";

/// Environment variables consulted by [`RuneConfig::merge_with_env`].
pub const ENV_OVERRIDES: [&str; 8] = [
    "RUNE_ANIMATION_SPEED_MS",
    "RUNE_ANIMATION_DURATION_MS",
    "RUNE_ANIMATION_LOOPS",
    "RUNE_ANIMATION_PING_PONG",
    "RUNE_ANIMATION_DIRECTION",
    "RUNE_ANIMATION_CURVE",
    "RUNE_ANIMATION_WEIGHT",
    "RUNE_LOG",
];

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is outside its allowed range.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    /// A curve, weight or direction name was not recognised.
    #[error(transparent)]
    Animation(#[from] AnimationError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Defaults applied to new animations
    pub animation: AnimationSettings,
    /// Log output settings
    pub logging: LoggingSettings,
}

/// Animation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Tick cadence in milliseconds
    pub speed_ms: u32,
    /// Run length in milliseconds; 0 leaves the animation's own duration
    pub duration_ms: u32,
    /// 0 plays once, `n > 0` repeats `n` more times, negative loops forever
    pub loops: i32,
    /// Reverse at every loop boundary
    pub ping_pong: bool,
    pub direction: Direction,
    pub curve: CurveSettings,
}

/// Timing curve defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    pub function: CurveFunction,
    pub weight: CurveWeight,
    /// Elastic and bounce amplitude
    pub amplitude: f64,
    /// Back overshoot
    pub overshoot: f64,
    /// Elastic period
    pub period: f64,
    /// Clamp curve output into [0, 1]
    pub clip: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            speed_ms: rune_animation::DEFAULT_SPEED_MS,
            duration_ms: 0,
            loops: 0,
            ping_pong: false,
            direction: Direction::Forward,
            curve: CurveSettings::default(),
        }
    }
}

impl Default for CurveSettings {
    fn default() -> Self {
        let curve = AnimationCurve::default();
        Self {
            function: curve.function(),
            weight: curve.weight(),
            amplitude: curve.amplitude(),
            overshoot: curve.overshoot(),
            period: curve.period(),
            clip: curve.clip(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AnimationSettings {
    /// Build the configured timing curve.
    ///
    /// # Panics
    /// Panics on a negative amplitude or non-positive period; configuration
    /// loaded through [`RuneConfig::load_from_file`] has already been checked.
    pub fn curve(&self) -> AnimationCurve {
        let mut curve = AnimationCurve::new(self.curve.function, self.curve.weight);
        curve.set_amplitude(self.curve.amplitude);
        curve.set_overshoot(self.curve.overshoot);
        curve.set_period(self.curve.period);
        curve.set_clip(self.curve.clip);
        curve
    }

    /// Push the timing defaults into `animation`.
    pub fn apply(&self, animation: &mut dyn Animatable) {
        animation.set_speed(self.speed_ms);
        if self.duration_ms > 0 {
            animation.set_duration(self.duration_ms);
        }
        animation.set_loops(self.loops);
        animation.set_ping_pong(self.ping_pong);
        animation.set_direction(self.direction);
    }

    /// Push the timing defaults and the curve into a keyframe animation.
    pub fn apply_to_key_frames(&self, animation: &mut KeyFrameAnimation) {
        self.apply(animation);
        animation.set_curve(self.curve());
    }

    fn validate(&self) -> Result<()> {
        if self.speed_ms == 0 {
            return Err(invalid("animation.speed_ms", "must be > 0"));
        }
        if !(self.curve.amplitude >= 0.0) {
            return Err(invalid("animation.curve.amplitude", "must be >= 0"));
        }
        if !(self.curve.period > 0.0) {
            return Err(invalid("animation.curve.period", "must be > 0"));
        }
        Ok(())
    }
}

impl RuneConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the rune.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if it is missing or unusable
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                warn!("ignoring {CONFIG_FILE}: {err}");
                Self::default()
            }
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.animation.validate()
    }

    /// Apply a single override, as if `var` had been set to `value`.
    pub fn apply_override(&mut self, var: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let animation = &mut self.animation;
        match var {
            "RUNE_ANIMATION_SPEED_MS" => {
                let speed = value
                    .parse::<u32>()
                    .map_err(|e| invalid(var, e.to_string()))?;
                if speed == 0 {
                    return Err(invalid(var, "must be > 0"));
                }
                animation.speed_ms = speed;
            }
            "RUNE_ANIMATION_DURATION_MS" => {
                animation.duration_ms = value
                    .parse()
                    .map_err(|e: std::num::ParseIntError| invalid(var, e.to_string()))?;
            }
            "RUNE_ANIMATION_LOOPS" => {
                animation.loops = value
                    .parse()
                    .map_err(|e: std::num::ParseIntError| invalid(var, e.to_string()))?;
            }
            "RUNE_ANIMATION_PING_PONG" => animation.ping_pong = parse_flag(value),
            "RUNE_ANIMATION_DIRECTION" => animation.direction = value.parse()?,
            "RUNE_ANIMATION_CURVE" => animation.curve.function = value.parse()?,
            "RUNE_ANIMATION_WEIGHT" => animation.curve.weight = value.parse()?,
            "RUNE_LOG" => self.logging.filter = value.to_string(),
            _ => return Err(invalid(var, "unknown configuration variable")),
        }
        Ok(())
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are logged and skipped.
    pub fn merge_with_env(&mut self) {
        for var in ENV_OVERRIDES {
            let Ok(value) = std::env::var(var) else {
                continue;
            };
            if let Err(err) = self.apply_override(var, &value) {
                warn!("ignoring {var}={value:?}: {err}");
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rune_animation::{AnimationState, TypedValue};
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rune-config-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = RuneConfig::default();
        assert_eq!(config.animation.speed_ms, 16);
        assert_eq!(config.animation.duration_ms, 0);
        assert_eq!(config.animation.loops, 0);
        assert!(!config.animation.ping_pong);
        assert_eq!(config.animation.direction, Direction::Forward);
        assert_eq!(config.animation.curve.function, CurveFunction::Linear);
        assert_eq!(config.animation.curve.amplitude, 1.0);
        assert_eq!(config.animation.curve.overshoot, 1.70158);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_toml_serialization() {
        let config = RuneConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: RuneConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.animation.speed_ms, config.animation.speed_ms);
        assert_eq!(parsed.animation.curve.weight, config.animation.curve.weight);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: RuneConfig = toml::from_str(
            r#"
            [animation]
            duration_ms = 250
            direction = "backward"

            [animation.curve]
            function = "elastic"
            weight = "out_in"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.animation.duration_ms, 250);
        assert_eq!(parsed.animation.speed_ms, 16);
        assert_eq!(parsed.animation.direction, Direction::Backward);
        assert_eq!(parsed.animation.curve.function, CurveFunction::Elastic);
        assert_eq!(parsed.animation.curve.weight, CurveWeight::OutIn);
        assert_eq!(parsed.animation.curve.period, 1.0);
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_file("ok.toml", "[animation]\nloops = -1\n[logging]\nfilter = \"debug\"\n");
        let config = RuneConfig::load_from_file(&path).unwrap();
        assert_eq!(config.animation.loops, -1);
        assert_eq!(config.logging.filter, "debug");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_from_file_errors() {
        let missing = std::env::temp_dir().join("rune-config-does-not-exist.toml");
        assert!(matches!(
            RuneConfig::load_from_file(&missing),
            Err(ConfigError::Io(_))
        ));

        let path = temp_file("bad.toml", "[animation]\ndirection = \"sideways\"\n");
        assert!(matches!(
            RuneConfig::load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
        std::fs::remove_file(path).unwrap();

        let path = temp_file("zero.toml", "[animation]\nspeed_ms = 0\n");
        let err = RuneConfig::load_from_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for animation.speed_ms: must be > 0");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if rune.toml doesn't exist
        let config = RuneConfig::load_or_default();
        assert!(config.animation.speed_ms > 0);
    }

    #[test]
    fn test_apply_override() {
        let mut config = RuneConfig::default();
        config.apply_override("RUNE_ANIMATION_SPEED_MS", "33").unwrap();
        config.apply_override("RUNE_ANIMATION_LOOPS", "-1").unwrap();
        config.apply_override("RUNE_ANIMATION_PING_PONG", "TRUE").unwrap();
        config.apply_override("RUNE_ANIMATION_CURVE", "bounce").unwrap();
        config.apply_override("RUNE_ANIMATION_WEIGHT", "in_out").unwrap();
        config.apply_override("RUNE_LOG", "trace").unwrap();

        assert_eq!(config.animation.speed_ms, 33);
        assert_eq!(config.animation.loops, -1);
        assert!(config.animation.ping_pong);
        assert_eq!(config.animation.curve.function, CurveFunction::Bounce);
        assert_eq!(config.animation.curve.weight, CurveWeight::InOut);
        assert_eq!(config.logging.filter, "trace");

        assert!(matches!(
            config.apply_override("RUNE_ANIMATION_DIRECTION", "up"),
            Err(ConfigError::Animation(AnimationError::UnknownDirection(_)))
        ));
        assert!(matches!(
            config.apply_override("RUNE_ANIMATION_SPEED_MS", "0"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(config.apply_override("RUNE_ANIMATION_DURATION_MS", "soon").is_err());
        assert_eq!(config.animation.speed_ms, 33);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("RUNE_ANIMATION_DURATION_MS", "750");
            std::env::set_var("RUNE_ANIMATION_DIRECTION", "backward");
            std::env::set_var("RUNE_ANIMATION_WEIGHT", "not-a-weight");
        }

        let mut config = RuneConfig::default();
        config.merge_with_env();

        assert_eq!(config.animation.duration_ms, 750);
        assert_eq!(config.animation.direction, Direction::Backward);
        assert_eq!(config.animation.curve.weight, CurveWeight::In);

        unsafe {
            std::env::remove_var("RUNE_ANIMATION_DURATION_MS");
            std::env::remove_var("RUNE_ANIMATION_DIRECTION");
            std::env::remove_var("RUNE_ANIMATION_WEIGHT");
        }
    }

    #[test]
    fn test_apply_settings_to_animation() {
        let mut settings = AnimationSettings::default();
        settings.duration_ms = 200;
        settings.loops = 2;
        settings.ping_pong = true;
        settings.curve.function = CurveFunction::Quadratic;

        let mut animation = KeyFrameAnimation::new(0, 100);
        settings.apply_to_key_frames(&mut animation);

        assert_eq!(animation.duration_ms(), 200);
        assert_eq!(animation.loops(), 2);
        assert_eq!(animation.timeline().speed_ms(), 16);
        assert!(animation.timeline().ping_pong());
        assert_eq!(animation.curve().function(), CurveFunction::Quadratic);
        assert_eq!(animation.state(), AnimationState::Stopped);

        animation.update(0.5);
        assert_eq!(animation.value(), &TypedValue::Int(25));
    }

    #[test]
    fn test_zero_duration_is_left_alone() {
        let settings = AnimationSettings::default();
        let mut animation = KeyFrameAnimation::new(0, 1).with_duration(300);
        settings.apply(&mut animation);
        assert_eq!(animation.duration_ms(), 300);
    }
}
