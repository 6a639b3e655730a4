/*
 * Unit Module
 *
 * This module defines the Unit struct (one flocking agent: position and
 * velocity) and the UnitStore that holds the whole population. The store is
 * the authoritative state between frames; within a frame it is only read,
 * and only the frame committer writes it back.
 */

use std::f32::consts::TAU;

use rand::Rng;

use crate::error::{reserve, Result};
use crate::params::SimulationParams;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Unit {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Unit {
    pub const fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self { x, y, vx, vy }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }

    #[inline]
    pub fn distance_squared(&self, other: &Unit) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitStore {
    units: Vec<Unit>,
}

impl UnitStore {
    // Spawn the population inside the margin box, each heading a random way at minimum speed
    pub fn random<R: Rng + ?Sized>(params: &SimulationParams, rng: &mut R) -> Result<Self> {
        let mut units = Vec::new();
        reserve(&mut units, params.unit_count, "unit store")?;

        let mbox = params.margin_box();
        for _ in 0..params.unit_count {
            let x = rng.gen_range(mbox.left..mbox.right);
            let y = rng.gen_range(mbox.bottom..mbox.top);
            let heading = rng.gen_range(0.0..TAU);
            units.push(Unit::new(
                x,
                y,
                params.min_speed * heading.cos(),
                params.min_speed * heading.sin(),
            ));
        }

        Ok(Self { units })
    }

    pub fn from_units(units: Vec<Unit>) -> Self {
        Self { units }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn get(&self, id: usize) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Unit> {
        self.units.iter()
    }

    // Only the frame committer may write live state
    pub(crate) fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }
}
