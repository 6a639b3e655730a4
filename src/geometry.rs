/*
 * Geometry Module
 *
 * Derived draw data for the rasterizer: one triangle per unit, pointing
 * along its velocity. Refreshed after each commit and never fed back into
 * the simulation.
 */

use crate::error::{reserve, Result};
use crate::executor::Executor;
use crate::unit::Unit;

// Half the triangle's base, and how far the tip sits ahead of the unit
pub const TRIANGLE_HALF_WIDTH: f32 = 2.0;
pub const TRIANGLE_LENGTH: f32 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triangle {
    pub points: [[f32; 2]; 3],
}

impl Triangle {
    pub fn for_unit(unit: &Unit) -> Self {
        let speed = unit.speed();
        if speed == 0.0 {
            return Self { points: [[unit.x, unit.y]; 3] };
        }

        let scale = TRIANGLE_HALF_WIDTH / speed;
        // Velocity rotated a quarter turn gives the base direction
        let px = -unit.vy * scale;
        let py = unit.vx * scale;
        let tip = TRIANGLE_LENGTH / TRIANGLE_HALF_WIDTH;

        Self {
            points: [
                [unit.x + px, unit.y + py],
                [unit.x - px, unit.y - py],
                [unit.x + unit.vx * scale * tip, unit.y + unit.vy * scale * tip],
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TriangleBuffer {
    triangles: Vec<Triangle>,
}

impl TriangleBuffer {
    pub fn new(unit_count: usize) -> Result<Self> {
        let mut triangles = Vec::new();
        reserve(&mut triangles, unit_count, "triangle buffer")?;
        triangles.resize(unit_count, Triangle::default());
        Ok(Self { triangles })
    }

    pub fn refresh<E: Executor>(&mut self, units: &[Unit], executor: &E) {
        self.triangles.resize(units.len(), Triangle::default());
        executor.for_each_slot(&mut self.triangles, |i, triangle| {
            *triangle = Triangle::for_unit(&units[i]);
        });
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Flat vertex list, three vertices per unit.
    pub fn vertices(&self) -> impl Iterator<Item = [f32; 2]> + '_ {
        self.triangles.iter().flat_map(|t| t.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SequentialExecutor;

    #[test]
    fn triangle_points_along_velocity() {
        let t = Triangle::for_unit(&Unit::new(100.0, 50.0, 1.0, 0.0));
        assert_eq!(t.points, [[100.0, 52.0], [100.0, 48.0], [105.0, 50.0]]);
    }

    #[test]
    fn triangle_size_does_not_depend_on_speed() {
        let slow = Triangle::for_unit(&Unit::new(0.0, 0.0, 0.0, 0.9));
        let fast = Triangle::for_unit(&Unit::new(0.0, 0.0, 0.0, 1.2));
        for (a, b) in slow.points.iter().zip(fast.points.iter()) {
            assert!((a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5);
        }
        assert!((slow.points[2][1] - 5.0).abs() < 1e-5);
    }

    #[test]
    fn buffer_tracks_units() {
        let units = [Unit::new(0.0, 0.0, 1.0, 0.0), Unit::new(10.0, 10.0, 0.0, 1.0)];
        let mut buffer = TriangleBuffer::new(2).unwrap();
        buffer.refresh(&units, &SequentialExecutor);
        assert_eq!(buffer.triangles().len(), 2);
        assert_eq!(buffer.vertices().count(), 6);
        assert_eq!(buffer.triangles()[1], Triangle::for_unit(&units[1]));
    }
}
