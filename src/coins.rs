//! Coin placement: seed candidates, then refine them through a chain of
//! filters. Every stage takes a slice and returns a fresh `Vec`, so the
//! surviving set can be traced stage by stage.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::{IntRange, LevelConfig};
use crate::geometry::{Point, Rect};
use crate::level::{Coin, GroundSegment, Platform};

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CoinStats {
    pub candidates: u32,
    pub dropped_inside_geometry: u32,
    pub dropped_duplicates: u32,
    pub dropped_unreachable: u32,
    pub used_fallback: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoinPlacement {
    pub coins: Vec<Coin>,
    pub required: u32,
    pub stats: CoinStats,
}

/// Candidate coins: a short row above every path platform, then one coin over
/// every other safe ground segment.
pub fn seed_candidates(
    config: &LevelConfig,
    path: &[Platform],
    safe_ground: &[GroundSegment],
) -> Vec<Coin> {
    let mut coins = Vec::new();
    for platform in path {
        let count = (platform.tiles / 2).max(1);
        let step = if platform.tiles > 2 {
            config.coin_spacing_wide
        } else {
            config.coin_spacing_narrow
        };
        for i in 0..count {
            coins.push(Point::new(
                platform.x + config.platform_coin_inset + i as f32 * step,
                platform.y - config.platform_coin_lift,
            ));
        }
    }
    for segment in safe_ground.iter().step_by(2) {
        coins.push(Point::new(
            segment.center_x(),
            config.floor_y - config.ground_coin_rise,
        ));
    }
    coins
}

pub fn outside_geometry(coins: &[Coin], solids: &[Rect]) -> Vec<Coin> {
    coins
        .iter()
        .copied()
        .filter(|c| !solids.iter().any(|r| r.contains(*c)))
        .collect()
}

/// First occurrence of each rounded position wins.
pub fn dedup_rounded(coins: &[Coin]) -> Vec<Coin> {
    let mut seen = HashSet::new();
    coins
        .iter()
        .copied()
        .filter(|c| seen.insert(c.rounded()))
        .collect()
}

/// Keep coins that a jump from some surface directly below can collect.
pub fn supported(coins: &[Coin], surfaces: &[Rect], reach: IntRange) -> Vec<Coin> {
    coins
        .iter()
        .copied()
        .filter(|c| has_support(*c, surfaces, reach))
        .collect()
}

pub fn has_support(coin: Coin, surfaces: &[Rect], reach: IntRange) -> bool {
    surfaces
        .iter()
        .any(|r| r.spans_x(coin.x) && reach.contains(r.y - coin.y))
}

pub fn fallback_coins(config: &LevelConfig) -> Vec<Coin> {
    let y = config.floor_y - config.ground_coin_rise;
    config
        .fallback_coin_xs
        .iter()
        .map(|&x| Point::new(x, y))
        .collect()
}

pub fn required_coins(available: usize, cap: u32) -> u32 {
    (available as u32).min(cap)
}

/// Run the whole chain over pre-seeded candidates.
pub fn refine(config: &LevelConfig, candidates: Vec<Coin>, surfaces: &[Rect]) -> CoinPlacement {
    let mut stats = CoinStats {
        candidates: candidates.len() as u32,
        ..CoinStats::default()
    };

    let clear = outside_geometry(&candidates, surfaces);
    stats.dropped_inside_geometry = (candidates.len() - clear.len()) as u32;

    let unique = dedup_rounded(&clear);
    stats.dropped_duplicates = (clear.len() - unique.len()) as u32;

    let reachable = supported(&unique, surfaces, config.reach_gap);
    stats.dropped_unreachable = (unique.len() - reachable.len()) as u32;

    let coins = if reachable.is_empty() {
        stats.used_fallback = true;
        fallback_coins(config)
    } else {
        reachable
    };
    let required = required_coins(coins.len(), config.required_coins_cap);

    CoinPlacement {
        coins,
        required,
        stats,
    }
}

pub fn place_coins(
    config: &LevelConfig,
    path: &[Platform],
    safe_ground: &[GroundSegment],
    surfaces: &[Rect],
) -> CoinPlacement {
    refine(config, seed_candidates(config, path, safe_ground), surfaces)
}
