use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Tile footprint shared with the runtime that builds colliders from a level.
pub const TILE_WIDTH: f32 = 64.0;
pub const GROUND_TILE_HEIGHT: f32 = 64.0;
pub const PLATFORM_TILE_HEIGHT: f32 = 32.0;

/// Fall-detection zones hang below each gap.
const GAP_ZONE_HEIGHT: f32 = 180.0;
const GAP_ZONE_DROP: f32 = 80.0;

pub type Coin = Point;
pub type Spike = Point;

/// A horizontal run of ground tiles at floor level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    pub x: f32,
    pub y: f32,
    pub tiles: u32,
}

impl GroundSegment {
    pub fn width(&self) -> f32 {
        self.tiles as f32 * TILE_WIDTH
    }

    pub fn right(&self) -> f32 {
        self.x + self.width()
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width() / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), GROUND_TILE_HEIGHT)
    }

    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }

    pub fn has_spike(&self, spikes: &[Spike]) -> bool {
        spikes.iter().any(|s| self.spans_x(s.x))
    }
}

/// An elevated standing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub tiles: u32,
}

impl Platform {
    pub fn width(&self) -> f32 {
        self.tiles as f32 * TILE_WIDTH
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), PLATFORM_TILE_HEIGHT)
    }
}

/// One generated level. The JSON shape of this struct is what the runtime reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub start: Point,
    pub checkpoint: Point,
    pub finish: Point,
    pub required_coins: u32,
    pub ground: Vec<GroundSegment>,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub spikes: Vec<Spike>,
}

impl Level {
    pub fn ground_rects(&self) -> Vec<Rect> {
        self.ground.iter().map(GroundSegment::rect).collect()
    }

    pub fn platform_rects(&self) -> Vec<Rect> {
        self.platforms.iter().map(Platform::rect).collect()
    }

    /// Every solid rectangle, ground first.
    pub fn surfaces(&self) -> Vec<Rect> {
        let mut out = self.ground_rects();
        out.extend(self.platform_rects());
        out
    }

    /// One kill zone per positive gap between x-sorted ground segments.
    pub fn gap_zones(&self) -> Vec<Rect> {
        let Some(floor) = self.ground.first().map(|g| g.y) else {
            return Vec::new();
        };
        let mut sorted = self.ground.clone();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
        sorted
            .windows(2)
            .filter_map(|pair| {
                let end = pair[0].right();
                let gap = pair[1].x - end;
                (gap > 0.0).then(|| {
                    Rect::new(
                        end,
                        floor + GAP_ZONE_DROP - GAP_ZONE_HEIGHT / 2.0,
                        gap,
                        GAP_ZONE_HEIGHT,
                    )
                })
            })
            .collect()
    }

    /// Whether touching the finish with `collected` coins counts as a win.
    pub fn can_finish(&self, collected: u32) -> bool {
        collected >= self.required_coins
    }

    pub fn is_out_of_bounds(&self, y: f32) -> bool {
        y >= self.height
    }
}
