//! Checkpoint and finish placement on ground, plus the snap pass that keeps
//! them there.

use crate::geometry::Point;
use crate::level::{GroundSegment, Spike};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Markers {
    pub checkpoint: Point,
    pub finish: Point,
}

/// Segments with no spike anywhere in their span.
pub fn safe_segments(ground: &[GroundSegment], spikes: &[Spike]) -> Vec<GroundSegment> {
    ground
        .iter()
        .filter(|g| !g.has_spike(spikes))
        .copied()
        .collect()
}

/// Index into the safe list, wrapping; falls back to the unfiltered ground when
/// nothing is safe.
fn pick_segment<'a>(
    ground: &'a [GroundSegment],
    safe: &'a [GroundSegment],
    index: usize,
) -> Option<&'a GroundSegment> {
    if !safe.is_empty() {
        return safe.get(index % safe.len());
    }
    if ground.is_empty() {
        return None;
    }
    ground.get(index % ground.len())
}

/// Checkpoint at the middle pick, finish at the last. `fallback` stands in for
/// both when `ground` is empty, which only a hand-built ground list can be.
pub fn place_markers(
    ground: &[GroundSegment],
    safe: &[GroundSegment],
    spikes: &[Spike],
    floor_y: f32,
    finish_clearance: f32,
    fallback: Point,
) -> Markers {
    let centered = |index: usize| {
        pick_segment(ground, safe, index)
            .map(|g| Point::new(g.center_x(), floor_y))
            .unwrap_or(fallback)
    };
    let checkpoint = centered(ground.len() / 2);
    let finish = centered(ground.len().saturating_sub(1));

    Markers {
        checkpoint: snap_checkpoint(checkpoint, ground, floor_y),
        finish: snap_finish(finish, ground, spikes, floor_y, finish_clearance),
    }
}

/// Keep the checkpoint where it is if it stands on ground, else move it to the
/// nearest segment center. Spikes are not considered here.
pub fn snap_checkpoint(pos: Point, ground: &[GroundSegment], floor_y: f32) -> Point {
    if on_ground(pos.x, ground) {
        return Point::new(pos.x, floor_y);
    }
    relocate(pos, ground, floor_y)
}

/// Like [`snap_checkpoint`], but a spike within `clearance` px also forces a move.
pub fn snap_finish(
    pos: Point,
    ground: &[GroundSegment],
    spikes: &[Spike],
    floor_y: f32,
    clearance: f32,
) -> Point {
    if on_ground(pos.x, ground) && !spike_near(pos.x, spikes, clearance) {
        return Point::new(pos.x, floor_y);
    }
    relocate(pos, ground, floor_y)
}

pub fn spike_near(x: f32, spikes: &[Spike], clearance: f32) -> bool {
    spikes.iter().any(|s| (s.x - x).abs() <= clearance)
}

fn on_ground(x: f32, ground: &[GroundSegment]) -> bool {
    ground.iter().any(|g| g.spans_x(x))
}

fn relocate(pos: Point, ground: &[GroundSegment], floor_y: f32) -> Point {
    match nearest_center(pos.x, ground) {
        Some(x) => Point::new(x, floor_y),
        None => pos,
    }
}

/// Strictly-closer comparison, so the earliest segment wins ties.
fn nearest_center(x: f32, ground: &[GroundSegment]) -> Option<f32> {
    let mut best: Option<(f32, f32)> = None;
    for center in ground.iter().map(GroundSegment::center_x) {
        let dist = (x - center).abs();
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((center, dist));
        }
    }
    best.map(|(center, _)| center)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: f32 = 656.0;

    fn seg(x: f32, tiles: u32) -> GroundSegment {
        GroundSegment { x, y: FLOOR, tiles }
    }

    fn spike(x: f32) -> Spike {
        Point::new(x, FLOOR)
    }

    #[test]
    fn safe_segments_exclude_spiked_spans() {
        let ground = [seg(0.0, 4), seg(320.0, 4), seg(640.0, 4)];
        let safe = safe_segments(&ground, &[spike(396.0)]);
        assert_eq!(safe, vec![seg(0.0, 4), seg(640.0, 4)]);
    }

    #[test]
    fn markers_land_on_safe_segment_centers() {
        let ground = [seg(0.0, 4), seg(320.0, 4), seg(640.0, 4), seg(960.0, 6)];
        let spikes = [spike(396.0), spike(1100.0)];
        let safe = safe_segments(&ground, &spikes);
        let m = place_markers(&ground, &safe, &spikes, FLOOR, 48.0, Point::new(100.0, 520.0));
        // safe = [0, 640]; checkpoint index 2 % 2 = 0, finish index 3 % 2 = 1.
        assert_eq!(m.checkpoint, Point::new(128.0, FLOOR));
        assert_eq!(m.finish, Point::new(768.0, FLOOR));
    }

    #[test]
    fn empty_safe_list_falls_back_to_raw_ground() {
        let ground = [seg(0.0, 4), seg(320.0, 4), seg(640.0, 4)];
        let spikes = [spike(76.0), spike(396.0), spike(716.0)];
        let safe = safe_segments(&ground, &spikes);
        assert!(safe.is_empty());
        let m = place_markers(&ground, &safe, &spikes, FLOOR, 48.0, Point::new(100.0, 520.0));
        assert_eq!(m.checkpoint, Point::new(448.0, FLOOR));
        // Finish at 768 is 52px from the spike at 716, so it stays.
        assert_eq!(m.finish, Point::new(768.0, FLOOR));
    }

    #[test]
    fn empty_ground_leaves_markers_at_fallback() {
        let fallback = Point::new(100.0, FLOOR);
        let m = place_markers(&[], &[], &[spike(100.0)], FLOOR, 48.0, fallback);
        assert_eq!(m.checkpoint, fallback);
        assert_eq!(m.finish, fallback);
    }

    #[test]
    fn off_ground_checkpoint_moves_to_nearest_center() {
        let ground = [seg(0.0, 4), seg(320.0, 4)];
        let snapped = snap_checkpoint(Point::new(300.0, 100.0), &ground, FLOOR);
        assert_eq!(snapped, Point::new(448.0, FLOOR));
    }

    #[test]
    fn checkpoint_ignores_spikes() {
        let ground = [seg(0.0, 4)];
        let snapped = snap_checkpoint(Point::new(128.0, FLOOR), &ground, FLOOR);
        assert_eq!(snapped, Point::new(128.0, FLOOR));
    }

    #[test]
    fn finish_near_spike_is_moved() {
        let ground = [seg(0.0, 4), seg(320.0, 6)];
        let spikes = [spike(150.0)];
        let snapped = snap_finish(Point::new(120.0, FLOOR), &ground, &spikes, FLOOR, 48.0);
        // Nearest center to x=120 is 128 (segment 0), still near the spike,
        // but the move only looks at distance.
        assert_eq!(snapped, Point::new(128.0, FLOOR));
    }

    #[test]
    fn nearest_center_prefers_first_on_tie() {
        let ground = [seg(0.0, 4), seg(512.0, 4)];
        // Centers at 128 and 640; 384 is equidistant.
        assert_eq!(nearest_center(384.0, &ground), Some(128.0));
    }

    #[test]
    fn snapping_is_idempotent() {
        let ground = [seg(0.0, 4), seg(320.0, 4), seg(640.0, 5)];
        let spikes = [spike(400.0)];
        for x in [-50.0, 10.0, 300.0, 410.0, 700.0, 2000.0] {
            let once = snap_finish(Point::new(x, 0.0), &ground, &spikes, FLOOR, 48.0);
            let twice = snap_finish(once, &ground, &spikes, FLOOR, 48.0);
            assert_eq!(once, twice);
            let cp = snap_checkpoint(Point::new(x, 0.0), &ground, FLOOR);
            assert_eq!(cp, snap_checkpoint(cp, &ground, FLOOR));
        }
    }
}
