/*
 * Force Model Module
 *
 * This module computes one unit's next velocity and position from the
 * previous frame's state of its candidate neighbors. The rules, in order:
 * 1. Separation: push away from units inside the protected range
 * 2. Alignment: steer toward the mean velocity of visible units
 * 3. Cohesion: steer toward the mean position of visible units
 * 4. Probe avoidance: push away from the external probe point when it is in view
 * 5. Margin steering: nudge back toward the interior near the world edges
 * 6. Speed clamp: keep speed within [min_speed, max_speed]
 * and finally an explicit Euler step, one unit of time per frame. The new
 * position is kept inside the world rectangle: a unit leaving the margin box
 * diagonally at minimum speed gets equal nudges on both axes that the speed
 * clamp undoes, so steering alone cannot bring it back.
 *
 * The model is a pure function of its inputs. It never touches shared
 * state, which is what lets every unit be updated in its own lane.
 */

use crate::params::{MarginBox, SimulationParams};
use crate::probe::EnvironmentProbe;
use crate::unit::Unit;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockingForceModel {
    visual_range_sq: f32,
    protected_range_sq: f32,
    turn_factor: f32,
    centering_factor: f32,
    avoid_factor: f32,
    align_factor: f32,
    mouse_factor: f32,
    min_speed: f32,
    max_speed: f32,
    margins: MarginBox,
    world_width: f32,
    world_height: f32,
}

/// Accumulated neighbor terms for one unit.
///
/// Units inside the protected range only add to `close_dx`/`close_dy`; the
/// remaining visible units feed the velocity and position sums.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeighborSums {
    pub close_dx: f32,
    pub close_dy: f32,
    pub vx_sum: f32,
    pub vy_sum: f32,
    pub x_sum: f32,
    pub y_sum: f32,
    pub count: u32,
}

impl FlockingForceModel {
    pub fn from_params(params: &SimulationParams) -> Self {
        Self {
            visual_range_sq: params.visual_range * params.visual_range,
            protected_range_sq: params.protected_range * params.protected_range,
            turn_factor: params.turn_factor,
            centering_factor: params.centering_factor,
            avoid_factor: params.avoid_factor,
            align_factor: params.align_factor,
            mouse_factor: params.mouse_factor,
            min_speed: params.min_speed,
            max_speed: params.max_speed,
            margins: params.margin_box(),
            world_width: params.world_width,
            world_height: params.world_height,
        }
    }

    pub fn gather<'a, I>(&self, id: usize, unit: &Unit, neighbors: I) -> NeighborSums
    where
        I: IntoIterator<Item = (usize, &'a Unit)>,
    {
        let mut sums = NeighborSums::default();

        for (other_id, other) in neighbors {
            if other_id == id {
                continue;
            }

            // Squared distances avoid a sqrt per candidate
            let d_squared = unit.distance_squared(other);
            // Written so a NaN distance counts as out of range
            if !(d_squared <= self.visual_range_sq) {
                continue;
            }

            if d_squared < self.protected_range_sq {
                sums.close_dx += unit.x - other.x;
                sums.close_dy += unit.y - other.y;
                continue;
            }

            sums.count += 1;
            sums.vx_sum += other.vx;
            sums.vy_sum += other.vy;
            sums.x_sum += other.x;
            sums.y_sum += other.y;
        }

        sums
    }

    pub fn steer(&self, unit: &Unit, sums: &NeighborSums, probe: &EnvironmentProbe) -> Unit {
        let mut vx = unit.vx;
        let mut vy = unit.vy;

        if sums.count > 0 {
            let count = sums.count as f32;

            // Alignment
            vx += (sums.vx_sum / count - unit.vx) * self.align_factor;
            vy += (sums.vy_sum / count - unit.vy) * self.align_factor;

            // Cohesion
            vx += (sums.x_sum / count - unit.x) * self.centering_factor;
            vy += (sums.y_sum / count - unit.y) * self.centering_factor;
        }

        // Separation
        vx += sums.close_dx * self.avoid_factor;
        vy += sums.close_dy * self.avoid_factor;

        if let Some((px, py)) = probe.point() {
            let dx = unit.x - px;
            let dy = unit.y - py;
            if dx * dx + dy * dy <= self.visual_range_sq {
                vx += dx * self.mouse_factor;
                vy += dy * self.mouse_factor;
            }
        }

        // Soft margins, one nudge per axis
        if unit.x < self.margins.left {
            vx += self.turn_factor;
        } else if unit.x > self.margins.right {
            vx -= self.turn_factor;
        }
        if unit.y < self.margins.bottom {
            vy += self.turn_factor;
        } else if unit.y > self.margins.top {
            vy -= self.turn_factor;
        }

        let (vx, vy) = self.clamp_speed(vx, vy, (unit.vx, unit.vy));

        let x = (unit.x + vx).clamp(0.0, self.world_width);
        let y = (unit.y + vy).clamp(0.0, self.world_height);
        Unit::new(x, y, vx, vy)
    }

    /// Full per-unit update: gather neighbor terms then steer.
    pub fn update<'a, I>(&self, id: usize, unit: &Unit, neighbors: I, probe: &EnvironmentProbe) -> Unit
    where
        I: IntoIterator<Item = (usize, &'a Unit)>,
    {
        let sums = self.gather(id, unit, neighbors);
        self.steer(unit, &sums, probe)
    }

    /// Rescale `(vx, vy)` into the speed band.
    ///
    /// A zero vector has no direction to rescale, so the unit keeps its
    /// `previous` heading at `min_speed`, or heads along +x if that is zero too.
    pub fn clamp_speed(&self, vx: f32, vy: f32, previous: (f32, f32)) -> (f32, f32) {
        let speed = (vx * vx + vy * vy).sqrt();

        if speed == 0.0 {
            let (px, py) = previous;
            let previous_speed = (px * px + py * py).sqrt();
            if previous_speed > 0.0 {
                return (px / previous_speed * self.min_speed, py / previous_speed * self.min_speed);
            }
            return (self.min_speed, 0.0);
        }

        if speed > self.max_speed {
            (vx / speed * self.max_speed, vy / speed * self.max_speed)
        } else if speed < self.min_speed {
            (vx / speed * self.min_speed, vy / speed * self.min_speed)
        } else {
            (vx, vy)
        }
    }
}
