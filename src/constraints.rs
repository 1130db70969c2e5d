use serde::Serialize;
use std::collections::HashSet;

use crate::coins::has_support;
use crate::config::LevelConfig;
use crate::level::{Level, TILE_WIDTH};

/// Every constraint [`validate_all`] checks, in report order.
pub const ALL_CONSTRAINTS: &[&str] = &[
    "ground_disjoint",
    "ground_coverage",
    "platforms_in_bounds",
    "coins_clear",
    "coins_unique",
    "coins_reachable",
    "required_coins",
    "markers_on_ground",
];

#[derive(Serialize, Debug)]
pub struct ValidateResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub passed: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
    pub details: serde_json::Value,
}

pub fn validate_all(level: &Level, config: &LevelConfig) -> ValidateResult {
    let names: Vec<String> = ALL_CONSTRAINTS.iter().map(|s| s.to_string()).collect();
    validate(level, config, &names)
}

pub fn validate(level: &Level, config: &LevelConfig, constraints: &[String]) -> ValidateResult {
    let mut violations = Vec::new();
    let mut passed = Vec::new();

    for constraint in constraints {
        let outcome = match constraint.as_str() {
            "ground_disjoint" => check_ground_disjoint(level),
            "ground_coverage" => check_ground_coverage(level, config),
            "platforms_in_bounds" => check_platforms_in_bounds(level),
            "coins_clear" => check_coins_clear(level),
            "coins_unique" => check_coins_unique(level),
            "coins_reachable" => check_coins_reachable(level, config),
            "required_coins" => check_required_coins(level, config),
            "markers_on_ground" => check_markers_on_ground(level),
            other => Err((
                format!("Unknown constraint: {other}"),
                serde_json::json!({}),
            )),
        };
        match outcome {
            Ok(()) => passed.push(constraint.clone()),
            Err((message, details)) => violations.push(Violation {
                constraint: constraint.clone(),
                message,
                details,
            }),
        }
    }

    ValidateResult {
        valid: violations.is_empty(),
        violations,
        passed,
    }
}

type Check = Result<(), (String, serde_json::Value)>;

fn check_ground_disjoint(level: &Level) -> Check {
    let rects = level.ground_rects();
    for (i, a) in rects.iter().enumerate() {
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            if a.overlaps_x(b) {
                return Err((
                    format!("Ground segments {i} and {j} overlap"),
                    serde_json::json!({ "a": a, "b": b }),
                ));
            }
        }
    }
    Ok(())
}

/// Ground starts at 0, advances with configured gaps and reaches the right edge.
fn check_ground_coverage(level: &Level, config: &LevelConfig) -> Check {
    let Some(first) = level.ground.first() else {
        return Err(("Level has no ground".to_string(), serde_json::json!({})));
    };
    if first.x != 0.0 {
        return Err((
            format!("First ground segment starts at {} instead of 0", first.x),
            serde_json::json!({ "x": first.x }),
        ));
    }
    for (i, pair) in level.ground.windows(2).enumerate() {
        let gap = pair[1].x - pair[0].right();
        if !config.gap_tiles.contains(gap / TILE_WIDTH) {
            return Err((
                format!("Gap after segment {i} is {gap}px"),
                serde_json::json!({ "segment": i, "gap": gap }),
            ));
        }
    }
    let last = level.ground[level.ground.len() - 1];
    let max_gap = config.gap_tiles.max as f32 * TILE_WIDTH;
    if last.x >= level.width || last.right() + max_gap < level.width {
        return Err((
            format!("Ground does not span the level width {}", level.width),
            serde_json::json!({ "last_x": last.x, "last_right": last.right() }),
        ));
    }
    Ok(())
}

fn check_platforms_in_bounds(level: &Level) -> Check {
    let floor = level.ground.first().map_or(level.height, |g| g.y);
    for (i, p) in level.platforms.iter().enumerate() {
        if p.x < 0.0 || p.x + p.width() > level.width || p.y >= floor {
            return Err((
                format!("Platform {i} lies outside the playable area"),
                serde_json::json!({ "platform": p }),
            ));
        }
    }
    Ok(())
}

fn check_coins_clear(level: &Level) -> Check {
    let surfaces = level.surfaces();
    for coin in &level.coins {
        if let Some(rect) = surfaces.iter().find(|r| r.contains(*coin)) {
            return Err((
                format!("Coin at ({},{}) is inside solid geometry", coin.x, coin.y),
                serde_json::json!({ "coin": coin, "rect": rect }),
            ));
        }
    }
    Ok(())
}

fn check_coins_unique(level: &Level) -> Check {
    let mut seen = HashSet::new();
    for coin in &level.coins {
        if !seen.insert(coin.rounded()) {
            return Err((
                format!("Duplicate coin at ({},{})", coin.x, coin.y),
                serde_json::json!({ "coin": coin }),
            ));
        }
    }
    Ok(())
}

fn check_coins_reachable(level: &Level, config: &LevelConfig) -> Check {
    let surfaces = level.surfaces();
    let unreachable: Vec<_> = level
        .coins
        .iter()
        .filter(|c| !has_support(**c, &surfaces, config.reach_gap))
        .collect();
    if unreachable.is_empty() {
        Ok(())
    } else {
        Err((
            format!("{} coin(s) have no surface within jump reach", unreachable.len()),
            serde_json::json!({ "coins": unreachable, "reach_gap": config.reach_gap }),
        ))
    }
}

fn check_required_coins(level: &Level, config: &LevelConfig) -> Check {
    let required = level.required_coins;
    if required == 0 || required as usize > level.coins.len() || required > config.required_coins_cap
    {
        return Err((
            format!(
                "requiredCoins {required} must be in 1..={}",
                level.coins.len().min(config.required_coins_cap as usize)
            ),
            serde_json::json!({ "required": required, "coins": level.coins.len() }),
        ));
    }
    Ok(())
}

fn check_markers_on_ground(level: &Level) -> Check {
    for (name, marker) in [("checkpoint", level.checkpoint), ("finish", level.finish)] {
        if !level.ground.iter().any(|g| g.spans_x(marker.x)) {
            return Err((
                format!("{name} at x={} is not over ground", marker.x),
                serde_json::json!({ "marker": name, "x": marker.x }),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_seeded;
    use crate::geometry::Point;
    use crate::level::GroundSegment;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn generated_level_passes_all() {
        let report = validate_all(&generate_seeded(42), &LevelConfig::default());
        assert!(report.valid, "{:?}", report.violations);
        assert_eq!(report.passed.len(), ALL_CONSTRAINTS.len());
    }

    #[test]
    fn flags_coin_inside_ground() {
        let mut level = generate_seeded(1);
        let g = level.ground[0];
        level.coins.push(Point::new(g.x + 10.0, g.y + 10.0));
        let report = validate(&level, &LevelConfig::default(), &names(&["coins_clear"]));
        assert!(!report.valid);
        assert_eq!(report.violations[0].constraint, "coins_clear");
    }

    #[test]
    fn flags_duplicate_and_floating_coins() {
        let mut level = generate_seeded(2);
        let first = level.coins[0];
        level.coins.push(Point::new(first.x + 0.3, first.y - 0.2));
        level.coins.push(Point::new(10.0, 5.0));
        let report = validate(
            &level,
            &LevelConfig::default(),
            &names(&["coins_unique", "coins_reachable"]),
        );
        let failed: Vec<_> = report.violations.iter().map(|v| v.constraint.as_str()).collect();
        assert_eq!(failed, vec!["coins_unique", "coins_reachable"]);
    }

    #[test]
    fn flags_overlapping_ground_and_bad_coverage() {
        let mut level = generate_seeded(3);
        level.ground.insert(
            1,
            GroundSegment {
                x: 100.0,
                y: level.ground[0].y,
                tiles: 4,
            },
        );
        let report = validate(
            &level,
            &LevelConfig::default(),
            &names(&["ground_disjoint", "ground_coverage"]),
        );
        assert_eq!(report.violations.len(), 2);
    }

    #[test]
    fn flags_required_count_out_of_range() {
        let cfg = LevelConfig::default();
        let mut level = generate_seeded(4);
        level.required_coins = 0;
        assert!(!validate(&level, &cfg, &names(&["required_coins"])).valid);
        level.required_coins = level.coins.len() as u32 + 1;
        assert!(!validate(&level, &cfg, &names(&["required_coins"])).valid);
    }

    #[test]
    fn flags_marker_over_gap() {
        let mut level = generate_seeded(5);
        level.finish.x = level.ground[0].right() + 1.0;
        let report = validate(&level, &LevelConfig::default(), &names(&["markers_on_ground"]));
        assert!(!report.valid);
        assert!(report.violations[0].message.contains("finish"));
    }

    #[test]
    fn unknown_constraint_is_a_violation() {
        let report = validate(&generate_seeded(6), &LevelConfig::default(), &names(&["fun"]));
        assert!(!report.valid);
        assert!(report.violations[0].message.contains("Unknown constraint"));
    }
}
