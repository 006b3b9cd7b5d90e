//! Falling-coin trajectory: randomized waypoints generated once per drop and
//! replayed on every animation frame.

use std::f64::consts::PI;

use crate::error::{DropError, DropResult};
use crate::rng::RandomSource;
use crate::slots::{slot_center_x, slot_width};

pub const NUM_BOUNCES: usize = 12;
pub const START: Waypoint = Waypoint {
    x: 50.0,
    y: 5.0,
    rotation: 0.0,
};
const BOARD_CENTER_X: f64 = 50.0;
const FALL_SPAN_Y: f64 = 88.0;
const JITTER_ENVELOPE: f64 = 45.0;
const PULL_EXPONENT: f64 = 1.5;
const MIN_X: f64 = 5.0;
const MAX_X: f64 = 95.0;
const FLOOR_Y: f64 = 100.0;
const BOUNCE_SPIN: f64 = 720.0;
const LANDING_SPIN: f64 = 1080.0;

/// Board-relative position in percent (y grows downward) plus rotation in
/// degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// Builds the `NUM_BOUNCES + 1` waypoints from the dropper to the centre of
/// `target_slot` on the board floor.
pub fn compute_waypoints(
    target_slot: usize,
    slot_count: usize,
    rng: &mut dyn RandomSource,
) -> DropResult<Vec<Waypoint>> {
    if slot_count == 0 || target_slot >= slot_count {
        return Err(DropError::InvalidSlotIndex {
            index: target_slot,
            count: slot_count,
        });
    }
    debug_assert!(slot_width(slot_count) > 0.0);
    let target_x = slot_center_x(target_slot, slot_count);
    let n = NUM_BOUNCES as f64;

    let mut points = Vec::with_capacity(NUM_BOUNCES + 1);
    points.push(START);
    for i in 1..NUM_BOUNCES {
        let frac = i as f64 / n;
        let y = frac * FALL_SPAN_Y + START.y;
        // widest wander mid-board, none at either end
        let envelope = (frac * PI).sin() * JITTER_ENVELOPE;
        let jitter = rng.centered(envelope);
        let pull = frac.powf(PULL_EXPONENT);
        let x = (BOARD_CENTER_X + (target_x - BOARD_CENTER_X) * pull + jitter).clamp(MIN_X, MAX_X);
        let rotation = rng.centered(BOUNCE_SPIN);
        points.push(Waypoint { x, y, rotation });
    }
    points.push(Waypoint {
        x: target_x,
        y: FLOOR_Y,
        rotation: rng.centered(LANDING_SPIN),
    });
    Ok(points)
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Result of advancing the animation to a given elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryFrame {
    pub position: Waypoint,
    /// Segment boundaries entered since the previous tick. Usually 0 or 1;
    /// more when a frame was late.
    pub boundaries_crossed: usize,
    /// True on the single tick that reaches the end of the path.
    pub landed: bool,
}

impl TrajectoryFrame {
    pub fn crossed_boundary(&self) -> bool {
        self.boundaries_crossed > 0
    }
}

/// Playback state for one drop. Not cancellable once started.
#[derive(Clone, Debug)]
pub struct Trajectory {
    target_slot: usize,
    duration_ms: f64,
    waypoints: Vec<Waypoint>,
    /// Highest segment index a boundary notification was issued for.
    last_segment: Option<usize>,
    complete: bool,
}

impl Trajectory {
    pub fn start(
        target_slot: usize,
        slot_count: usize,
        duration_ms: f64,
        rng: &mut dyn RandomSource,
    ) -> DropResult<Self> {
        let waypoints = compute_waypoints(target_slot, slot_count, rng)?;
        Ok(Self::from_waypoints(target_slot, duration_ms, waypoints))
    }

    pub fn from_waypoints(target_slot: usize, duration_ms: f64, waypoints: Vec<Waypoint>) -> Self {
        Self {
            target_slot,
            duration_ms,
            waypoints,
            last_segment: None,
            complete: false,
        }
    }

    pub fn target_slot(&self) -> usize {
        self.target_slot
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Position at `elapsed_ms` since the drop started, without side effects.
    pub fn sample(&self, elapsed_ms: f64) -> Waypoint {
        let segments = self.segment_count();
        if segments == 0 {
            return self.waypoints.first().copied().unwrap_or(START);
        }
        let progress = self.progress(elapsed_ms);
        let scaled = progress * segments as f64;
        let idx = (scaled.floor() as usize).min(segments);
        let t = scaled - idx as f64;
        let a = self.waypoints[idx];
        let b = self.waypoints.get(idx + 1).copied().unwrap_or(a);
        let eased = smoothstep(t);
        Waypoint {
            x: lerp(a.x, b.x, eased),
            y: lerp(a.y, b.y, t),
            rotation: lerp(a.rotation, b.rotation, eased),
        }
    }

    fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Advances playback. Boundary notifications are counted once per
    /// segment and never repeat, even if time goes backwards.
    pub fn tick(&mut self, elapsed_ms: f64) -> TrajectoryFrame {
        let position = self.sample(elapsed_ms);
        if self.complete {
            return TrajectoryFrame {
                position,
                boundaries_crossed: 0,
                landed: false,
            };
        }

        let segments = self.segment_count();
        let progress = self.progress(elapsed_ms);
        let current = ((progress * segments as f64).floor() as usize).min(segments);
        // the end of the path is not a segment of its own
        let reachable = current.min(segments.saturating_sub(1));
        let next_unvisited = self.last_segment.map_or(0, |s| s + 1);
        let boundaries_crossed = if segments > 0 && reachable + 1 > next_unvisited {
            self.last_segment = Some(reachable);
            reachable + 1 - next_unvisited
        } else {
            0
        };

        let landed = progress >= 1.0;
        if landed {
            self.complete = true;
        }
        TrajectoryFrame {
            position,
            boundaries_crossed,
            landed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ChaChaSource, SequenceSource};

    #[test]
    fn path_starts_at_dropper_and_ends_in_target_slot() {
        let mut rng = ChaChaSource::seeded(11);
        let pts = compute_waypoints(2, 7, &mut rng).unwrap();
        assert_eq!(pts.len(), NUM_BOUNCES + 1);
        assert_eq!(pts[0], START);
        let last = pts[pts.len() - 1];
        assert!((last.x - 35.714_285_714).abs() < 1e-6);
        assert_eq!(last.y, 100.0);
        assert!((-540.0..540.0).contains(&last.rotation));
    }

    #[test]
    fn interior_points_descend_and_stay_on_board() {
        let mut rng = ChaChaSource::seeded(99);
        for target in 0..7 {
            let pts = compute_waypoints(target, 7, &mut rng).unwrap();
            for (i, p) in pts.iter().enumerate().skip(1).take(NUM_BOUNCES - 1) {
                let expected_y = (i as f64 / NUM_BOUNCES as f64) * 88.0 + 5.0;
                assert!((p.y - expected_y).abs() < 1e-9);
                assert!((5.0..=95.0).contains(&p.x));
                assert!((-360.0..360.0).contains(&p.rotation));
            }
        }
    }

    #[test]
    fn zero_jitter_follows_pull_curve() {
        // 0.5 draws give zero jitter and zero rotation
        let mut rng = SequenceSource::constant(0.5);
        let pts = compute_waypoints(6, 7, &mut rng).unwrap();
        let target_x = slot_center_x(6, 7);
        for (i, p) in pts.iter().enumerate().skip(1).take(NUM_BOUNCES - 1) {
            let pull = (i as f64 / 12.0).powf(1.5);
            assert!((p.x - (50.0 + (target_x - 50.0) * pull)).abs() < 1e-9);
            assert_eq!(p.rotation, 0.0);
        }
    }

    #[test]
    fn invalid_target_is_rejected() {
        let mut rng = SequenceSource::constant(0.5);
        assert_eq!(
            compute_waypoints(7, 7, &mut rng),
            Err(DropError::InvalidSlotIndex { index: 7, count: 7 })
        );
        assert!(compute_waypoints(0, 0, &mut rng).is_err());
    }

    #[test]
    fn boundaries_fire_once_each_over_full_playback() {
        let mut rng = ChaChaSource::seeded(5);
        let mut traj = Trajectory::start(3, 7, 3000.0, &mut rng).unwrap();
        let mut fired = 0;
        let mut landed = 0;
        let mut t = 0.0;
        while t <= 3100.0 {
            let frame = traj.tick(t);
            fired += frame.boundaries_crossed;
            if frame.landed {
                landed += 1;
            }
            t += 16.7;
        }
        assert_eq!(fired, NUM_BOUNCES);
        assert_eq!(landed, 1);
        assert!(traj.is_complete());
    }

    #[test]
    fn repeated_ticks_in_one_segment_do_not_refire() {
        let mut rng = ChaChaSource::seeded(5);
        let mut traj = Trajectory::start(0, 7, 1200.0, &mut rng).unwrap();
        assert_eq!(traj.tick(0.0).boundaries_crossed, 1);
        assert_eq!(traj.tick(10.0).boundaries_crossed, 0);
        assert_eq!(traj.tick(50.0).boundaries_crossed, 0);
        // 1200ms / 12 segments = 100ms per segment
        assert_eq!(traj.tick(105.0).boundaries_crossed, 1);
        assert_eq!(traj.tick(60.0).boundaries_crossed, 0);
    }

    #[test]
    fn late_frame_catches_up_skipped_boundaries() {
        let mut rng = ChaChaSource::seeded(5);
        let mut traj = Trajectory::start(0, 7, 1200.0, &mut rng).unwrap();
        assert_eq!(traj.tick(0.0).boundaries_crossed, 1);
        assert_eq!(traj.tick(450.0).boundaries_crossed, 4);
        let last = traj.tick(5_000.0);
        assert_eq!(last.boundaries_crossed, 7);
        assert!(last.landed);
    }

    #[test]
    fn final_position_is_landing_waypoint() {
        let mut rng = ChaChaSource::seeded(8);
        let mut traj = Trajectory::start(4, 7, 3000.0, &mut rng).unwrap();
        let end = *traj.waypoints().last().unwrap();
        let frame = traj.tick(3000.0);
        assert_eq!(frame.position, end);
        assert!(frame.landed);
        assert!(!traj.tick(3100.0).landed);
    }

    #[test]
    fn vertical_is_linear_and_horizontal_eased() {
        let pts = vec![
            Waypoint { x: 0.0, y: 0.0, rotation: 0.0 },
            Waypoint { x: 100.0, y: 100.0, rotation: 100.0 },
        ];
        let traj = Trajectory::from_waypoints(0, 1000.0, pts);
        let p = traj.sample(250.0);
        assert!((p.y - 25.0).abs() < 1e-9);
        // smoothstep(0.25) = 0.15625
        assert!((p.x - 15.625).abs() < 1e-9);
        assert!((p.rotation - 15.625).abs() < 1e-9);
    }

    #[test]
    fn smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
    }
}
