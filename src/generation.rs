use serde::Serialize;
use tracing::{debug, warn};

use crate::coins::{self, CoinStats};
use crate::config::LevelConfig;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::level::{GroundSegment, Level, Platform, Spike, TILE_WIDTH};
use crate::markers;
use crate::random::{LevelRng, SeededRng};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GenerateResult {
    pub level: Level,
    pub metrics: LevelMetrics,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct LevelMetrics {
    pub segments: u32,
    pub max_gap: f32,
    pub spike_count: u32,
    pub safe_segments: u32,
    pub path_platforms: u32,
    pub decorative_platforms: u32,
    pub coins: CoinStats,
}

pub struct LevelGenerator {
    config: LevelConfig,
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self {
            config: LevelConfig::default(),
        }
    }
}

impl LevelGenerator {
    pub fn new(config: LevelConfig) -> Result<Self> {
        config.check()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn generate<R: LevelRng + ?Sized>(&self, rng: &mut R) -> GenerateResult {
        let cfg = &self.config;

        // Draw order matters for replayability: ground, path, then decoration.
        let layout = lay_ground(cfg, rng);
        let path = walk_path(cfg, rng);
        let decorative = scatter_platforms(cfg, rng);

        let mut platforms = path.clone();
        platforms.extend(decorative.iter().copied());

        let surfaces: Vec<Rect> = layout
            .ground
            .iter()
            .map(GroundSegment::rect)
            .chain(platforms.iter().map(Platform::rect))
            .collect();

        let safe = markers::safe_segments(&layout.ground, &layout.spikes);
        let placement = coins::place_coins(cfg, &path, &safe, &surfaces);
        if placement.stats.used_fallback {
            warn!(
                candidates = placement.stats.candidates,
                "no coin survived filtering, using fallback coins"
            );
        }

        let placed = markers::place_markers(
            &layout.ground,
            &safe,
            &layout.spikes,
            cfg.floor_y,
            cfg.finish_spike_clearance,
            Point::new(cfg.start.x, cfg.floor_y),
        );

        let metrics = LevelMetrics {
            segments: layout.ground.len() as u32,
            max_gap: layout.max_gap,
            spike_count: layout.spikes.len() as u32,
            safe_segments: safe.len() as u32,
            path_platforms: path.len() as u32,
            decorative_platforms: decorative.len() as u32,
            coins: placement.stats,
        };
        debug!(
            segments = metrics.segments,
            platforms = platforms.len(),
            coins = placement.coins.len(),
            required = placement.required,
            "generated level"
        );

        GenerateResult {
            level: Level {
                width: cfg.width,
                height: cfg.height,
                start: cfg.start,
                checkpoint: placed.checkpoint,
                finish: placed.finish,
                required_coins: placement.required,
                ground: layout.ground,
                platforms,
                coins: placement.coins,
                spikes: layout.spikes,
            },
            metrics,
        }
    }
}

/// Generate with the stock config.
pub fn generate_level<R: LevelRng + ?Sized>(rng: &mut R) -> Level {
    LevelGenerator::default().generate(rng).level
}

pub fn generate_seeded(seed: u64) -> Level {
    generate_level(&mut SeededRng::new(seed))
}

struct GroundLayout {
    ground: Vec<GroundSegment>,
    spikes: Vec<Spike>,
    max_gap: f32,
}

/// Ground segments left to right, separated by gaps, spiking every odd one.
fn lay_ground<R: LevelRng + ?Sized>(cfg: &LevelConfig, rng: &mut R) -> GroundLayout {
    let mut ground = Vec::new();
    let mut spikes = Vec::new();
    let mut max_gap = 0.0f32;
    let mut x = 0.0f32;
    let mut index = 0usize;

    while x < cfg.width {
        let tiles = rng.int(cfg.segment_tiles.min, cfg.segment_tiles.max);
        ground.push(GroundSegment {
            x,
            y: cfg.floor_y,
            tiles: tiles as u32,
        });

        if index % 2 == 1 {
            let count = if rng.chance(cfg.double_spike_chance) { 2 } else { 1 };
            for _ in 0..count {
                let offset = rng.int(1, tiles - 2) as f32 * TILE_WIDTH;
                spikes.push(Point::new(x + offset + cfg.spike_inset, cfg.floor_y));
            }
        }

        let gap = rng.int(cfg.gap_tiles.min, cfg.gap_tiles.max) as f32 * TILE_WIDTH;
        max_gap = max_gap.max(gap);
        x += tiles as f32 * TILE_WIDTH + gap;
        index += 1;
    }

    GroundLayout {
        ground,
        spikes,
        max_gap,
    }
}

/// The guaranteed chain: a random walk whose height stays inside the band a
/// jump can clear.
fn walk_path<R: LevelRng + ?Sized>(cfg: &LevelConfig, rng: &mut R) -> Vec<Platform> {
    let highest = cfg.floor_y - cfg.path_rise.max as f32;
    let lowest = cfg.floor_y - cfg.path_rise.min as f32;
    let mut path = Vec::new();
    let mut x = cfg.path_start_x;
    let mut y = cfg.floor_y - cfg.path_start_rise;

    while x < cfg.width - cfg.path_end_margin {
        let tiles = rng.int(cfg.platform_tiles.min, cfg.platform_tiles.max);
        y = (y + rng.int(-cfg.path_jitter, cfg.path_jitter) as f32).clamp(highest, lowest);
        path.push(Platform {
            x,
            y,
            tiles: tiles as u32,
        });
        x += rng.int(cfg.path_step.min, cfg.path_step.max) as f32;
    }
    path
}

fn scatter_platforms<R: LevelRng + ?Sized>(cfg: &LevelConfig, rng: &mut R) -> Vec<Platform> {
    (0..cfg.decorative_platforms)
        .map(|_| {
            let tiles = rng.int(cfg.platform_tiles.min, cfg.platform_tiles.max);
            let max_x = (cfg.width - tiles as f32 * TILE_WIDTH) as i32;
            let x = rng.int(0, max_x) as f32;
            let y = cfg.floor_y - rng.int(cfg.decorative_rise.min, cfg.decorative_rise.max) as f32;
            Platform {
                x,
                y,
                tiles: tiles as u32,
            }
        })
        .collect()
}
