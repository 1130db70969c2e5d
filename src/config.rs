use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geometry::Point;

pub const CONFIG_PATH_ENV: &str = "CHASM_LEVEL_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "level.json";

/// Inclusive integer range, `min..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min as f32 && v <= self.max as f32
    }
}

/// Every tunable the generator reads, plus the runtime jump physics the
/// reach window has to agree with. Defaults produce the stock 3200px level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
    pub start: Point,

    pub segment_tiles: IntRange,
    pub gap_tiles: IntRange,
    pub double_spike_chance: f32,
    pub spike_inset: f32,

    pub platform_tiles: IntRange,
    pub path_start_x: f32,
    pub path_start_rise: f32,
    /// Height above the floor a path platform may sit at.
    pub path_rise: IntRange,
    pub path_jitter: i32,
    pub path_step: IntRange,
    pub path_end_margin: f32,

    pub decorative_platforms: u32,
    pub decorative_rise: IntRange,

    pub platform_coin_lift: f32,
    pub platform_coin_inset: f32,
    pub coin_spacing_wide: f32,
    pub coin_spacing_narrow: f32,
    pub ground_coin_rise: f32,
    /// Vertical gap between a coin and the surface it is collected from.
    pub reach_gap: IntRange,
    pub fallback_coin_xs: Vec<f32>,
    pub required_coins_cap: u32,

    pub finish_spike_clearance: f32,

    pub gravity: f32,
    pub jump_speed: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 3200.0,
            height: 720.0,
            floor_y: 656.0,
            start: Point::new(100.0, 520.0),

            segment_tiles: IntRange::new(4, 8),
            gap_tiles: IntRange::new(1, 2),
            double_spike_chance: 0.6,
            spike_inset: 12.0,

            platform_tiles: IntRange::new(2, 3),
            path_start_x: 260.0,
            path_start_rise: 140.0,
            path_rise: IntRange::new(120, 200),
            path_jitter: 60,
            path_step: IntRange::new(200, 260),
            path_end_margin: 220.0,

            decorative_platforms: 6,
            decorative_rise: IntRange::new(140, 260),

            platform_coin_lift: 96.0,
            platform_coin_inset: 32.0,
            coin_spacing_wide: 48.0,
            coin_spacing_narrow: 40.0,
            ground_coin_rise: 140.0,
            reach_gap: IntRange::new(60, 170),
            fallback_coin_xs: vec![200.0, 320.0],
            required_coins_cap: 8,

            finish_spike_clearance: 48.0,

            gravity: 1400.0,
            jump_speed: 760.0,
        }
    }
}

impl LevelConfig {
    /// Peak height of a standing jump: v^2 / (2g).
    pub fn jump_apex(&self) -> f32 {
        (self.jump_speed * self.jump_speed) / (2.0 * self.gravity)
    }

    /// Resolve the config file (explicit path, then `CHASM_LEVEL_CONFIG`,
    /// then `level.json` if present), apply env overrides and check it.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit.map(Path::to_path_buf).or_else(|| {
            std::env::var(CONFIG_PATH_ENV)
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        });
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("no level config file, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str::<Self>(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "loaded level config");
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(raw) = env_value("CHASM_LEVEL_WIDTH") {
            self.width = raw
                .parse::<f32>()
                .map_err(|_| Error::Config(format!("CHASM_LEVEL_WIDTH is not a number: {raw}")))?;
        }
        if let Some(raw) = env_value("CHASM_REQUIRED_COINS_CAP") {
            self.required_coins_cap = raw.parse::<u32>().map_err(|_| {
                Error::Config(format!("CHASM_REQUIRED_COINS_CAP is not an integer: {raw}"))
            })?;
        }
        Ok(())
    }

    /// Fewest platforms the path walk can lay: every step is at most
    /// `path_step.max`, so each stride of that length holds at least one.
    pub fn guaranteed_path_platforms(&self) -> u32 {
        let span = self.width - self.path_end_margin - self.path_start_x;
        if span <= 0.0 {
            return 0;
        }
        (span / self.path_step.max as f32).ceil() as u32
    }

    /// Reject configs the generator cannot honour. A checked config always
    /// terminates and always produces a level satisfying the level invariants.
    ///
    /// The coin guarantee rests on the path: each path platform carries a
    /// coin its own top can reach, path coins sit further apart than any
    /// platform is wide, so one decorative platform buries at most one of
    /// them. More path platforms than decorative ones leaves a survivor, and
    /// the fallback coins are never needed.
    pub fn check(&self) -> Result<()> {
        let ranges = [
            ("segment_tiles", self.segment_tiles),
            ("gap_tiles", self.gap_tiles),
            ("platform_tiles", self.platform_tiles),
            ("path_rise", self.path_rise),
            ("path_step", self.path_step),
            ("decorative_rise", self.decorative_rise),
            ("reach_gap", self.reach_gap),
        ];
        for (name, range) in ranges {
            if range.min > range.max {
                return Err(Error::Config(format!(
                    "{name} is inverted: min {} > max {}",
                    range.min, range.max
                )));
            }
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::Config("level width and height must be positive".into()));
        }
        if self.floor_y <= 0.0 || self.floor_y >= self.height {
            return Err(Error::Config(format!(
                "floor_y {} must lie inside the level height {}",
                self.floor_y, self.height
            )));
        }
        // Spikes go on interior tiles 1..=tiles-2.
        if self.segment_tiles.min < 3 {
            return Err(Error::Config("segment_tiles.min must be at least 3".into()));
        }
        if self.gap_tiles.min < 0 || self.platform_tiles.min < 1 || self.path_step.min < 1 {
            return Err(Error::Config(
                "gap_tiles, platform_tiles and path_step must be positive".into(),
            ));
        }
        if self.path_rise.min <= 0 || self.decorative_rise.min <= 0 {
            return Err(Error::Config("platforms must sit above the floor".into()));
        }
        let widest_platform = self.platform_tiles.max as f32 * crate::level::TILE_WIDTH;
        if widest_platform > self.width {
            return Err(Error::Config("platforms wider than the level".into()));
        }
        if self.reach_gap.min <= 0 {
            return Err(Error::Config("reach_gap.min must be positive".into()));
        }
        if self.required_coins_cap == 0 {
            return Err(Error::Config("required_coins_cap must be at least 1".into()));
        }
        if self.fallback_coin_xs.is_empty() {
            return Err(Error::Config("fallback_coin_xs must not be empty".into()));
        }
        if self.gravity <= 0.0 || self.jump_speed <= 0.0 {
            return Err(Error::Config("gravity and jump_speed must be positive".into()));
        }
        if !self.reach_gap.contains(self.platform_coin_lift) {
            return Err(Error::Config(format!(
                "platform_coin_lift {} is outside reach_gap {}..={}",
                self.platform_coin_lift, self.reach_gap.min, self.reach_gap.max
            )));
        }
        let narrowest_platform = self.platform_tiles.min as f32 * crate::level::TILE_WIDTH;
        if self.platform_coin_inset < 0.0 || self.platform_coin_inset > narrowest_platform {
            return Err(Error::Config(format!(
                "platform_coin_inset {} must lie on a {narrowest_platform}px platform",
                self.platform_coin_inset
            )));
        }
        if self.path_step.min as f32 <= widest_platform {
            return Err(Error::Config(format!(
                "path_step.min {} must exceed the widest platform ({widest_platform}px)",
                self.path_step.min
            )));
        }
        let path_platforms = self.guaranteed_path_platforms();
        if path_platforms <= self.decorative_platforms {
            return Err(Error::Config(format!(
                "width {} leaves room for {path_platforms} path platforms, need more than {} decorative",
                self.width, self.decorative_platforms
            )));
        }
        let apex = self.jump_apex();
        let needed = self.reach_gap.max.max(self.path_rise.max) as f32;
        if apex < needed {
            return Err(Error::Config(format!(
                "jump apex {apex:.1}px cannot clear {needed}px (reach window / path rise)"
            )));
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_check() {
        let cfg = LevelConfig::default();
        cfg.check().expect("default config is valid");
        assert!(cfg.jump_apex() > 200.0);
    }

    #[test]
    fn weak_jump_is_rejected() {
        let cfg = LevelConfig {
            jump_speed: 500.0,
            ..LevelConfig::default()
        };
        let err = cfg.check().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("jump apex")));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let cfg = LevelConfig {
            path_step: IntRange::new(260, 200),
            ..LevelConfig::default()
        };
        assert!(matches!(cfg.check(), Err(Error::Config(_))));
    }

    #[test]
    fn narrow_segments_are_rejected() {
        let cfg = LevelConfig {
            segment_tiles: IntRange::new(2, 8),
            ..LevelConfig::default()
        };
        assert!(cfg.check().is_err());
    }

    #[test]
    fn short_path_is_rejected() {
        let default = LevelConfig::default();
        assert_eq!(default.guaranteed_path_platforms(), 11);

        for width in [400.0, 800.0, 2040.0] {
            let cfg = LevelConfig {
                width,
                ..LevelConfig::default()
            };
            let err = cfg.check().unwrap_err();
            assert!(
                matches!(err, Error::Config(ref m) if m.contains("path platforms")),
                "width {width}: {err}"
            );
        }

        let cfg = LevelConfig {
            width: 2080.0,
            ..LevelConfig::default()
        };
        assert_eq!(cfg.guaranteed_path_platforms(), 7);
        cfg.check().expect("seven path platforms outnumber six decorative");
    }

    #[test]
    fn path_coins_must_be_reachable_from_their_platform() {
        let cfg = LevelConfig {
            platform_coin_lift: 40.0,
            ..LevelConfig::default()
        };
        assert!(matches!(cfg.check(), Err(Error::Config(ref m)) if m.contains("platform_coin_lift")));

        let cfg = LevelConfig {
            path_step: IntRange::new(150, 260),
            ..LevelConfig::default()
        };
        assert!(matches!(cfg.check(), Err(Error::Config(ref m)) if m.contains("path_step.min")));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: LevelConfig =
            serde_json::from_str(r#"{ "width": 1600, "reach_gap": { "min": 50, "max": 160 } }"#)
                .expect("parse");
        assert_eq!(cfg.width, 1600.0);
        assert_eq!(cfg.reach_gap, IntRange::new(50, 160));
        assert_eq!(cfg.floor_y, 656.0);
        assert_eq!(cfg.required_coins_cap, 8);
    }

    fn write_config(name: &str, width: f32) -> PathBuf {
        let path = std::env::temp_dir().join(format!("chasm-{}-{name}.json", std::process::id()));
        std::fs::write(&path, format!(r#"{{ "width": {width} }}"#)).expect("write config");
        path
    }

    // One test owns the CHASM_* variables so parallel tests never race on them.
    #[test]
    fn load_resolves_files_then_env_overrides() {
        let explicit = write_config("explicit", 2800.0);
        let from_env = write_config("env", 3000.0);
        std::env::remove_var("CHASM_LEVEL_WIDTH");
        std::env::set_var(CONFIG_PATH_ENV, &from_env);

        assert_eq!(LevelConfig::load(Some(explicit.as_path())).expect("explicit").width, 2800.0);
        assert_eq!(LevelConfig::load(None).expect("env path").width, 3000.0);

        std::env::set_var("CHASM_LEVEL_WIDTH", " 2600 ");
        assert_eq!(LevelConfig::load(Some(explicit.as_path())).expect("override").width, 2600.0);

        std::env::set_var("CHASM_LEVEL_WIDTH", "wide");
        let err = LevelConfig::load(None).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("CHASM_LEVEL_WIDTH")));

        std::env::set_var("CHASM_LEVEL_WIDTH", "400");
        let err = LevelConfig::load(None).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("path platforms")));

        std::env::remove_var("CHASM_LEVEL_WIDTH");
        std::env::remove_var(CONFIG_PATH_ENV);
        let _ = std::fs::remove_file(explicit);
        let _ = std::fs::remove_file(from_env);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = LevelConfig::from_file(Path::new("/nonexistent/level.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
