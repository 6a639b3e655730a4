/*
 * Frame Commit Module
 *
 * Double buffering for the per-unit update. During a frame every lane reads
 * the live UnitStore (the previous frame, untouched) and writes only its own
 * slot of the shadow buffer. Once all lanes are done, publish copies the
 * shadow into the live store in one pass. No unit ever sees a neighbor that
 * has already moved this frame, so results do not depend on lane order.
 */

use crate::error::{reserve, Result};
use crate::executor::Executor;
use crate::unit::{Unit, UnitStore};

pub struct FrameCommitter {
    shadow: Vec<Unit>,
}

impl FrameCommitter {
    pub fn new(unit_count: usize) -> Result<Self> {
        let mut shadow = Vec::new();
        reserve(&mut shadow, unit_count, "shadow state")?;
        shadow.resize(unit_count, Unit::default());
        Ok(Self { shadow })
    }

    /// Run the per-unit lanes, each writing its result into its shadow slot.
    pub fn compute<E, F>(&mut self, executor: &E, lane: F)
    where
        E: Executor,
        F: Fn(usize, &mut Unit) + Send + Sync,
    {
        executor.for_each_slot(&mut self.shadow, lane);
    }

    /// Copy the finished shadow state into the live store.
    pub fn publish<E: Executor>(&self, store: &mut UnitStore, executor: &E) {
        debug_assert_eq!(store.len(), self.shadow.len(), "shadow and live state must match in size");
        let shadow = &self.shadow;
        executor.for_each_slot(store.units_mut(), |i, live| *live = shadow[i]);
    }

    pub fn shadow(&self) -> &[Unit] {
        &self.shadow
    }

    pub fn len(&self) -> usize {
        self.shadow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shadow.is_empty()
    }
}
