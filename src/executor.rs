/*
 * Executor Module
 *
 * The execution capability every frame phase runs on. A phase is a set of
 * independent lanes, one per output slot: lane `i` gets exclusive access to
 * `out[i]` and read-only access to whatever the closure captures. A call
 * returns only once every lane has finished, which is the barrier between
 * phases. No lane can write a slot it does not own, so phases need no locks
 * or atomics.
 *
 * Three executors are provided:
 * - RayonExecutor: chunked parallel lanes on the rayon thread pool
 * - SequentialExecutor: lanes in index order on the calling thread
 * - ShuffledExecutor: lanes in a seeded random order, for checking that
 *   results do not depend on scheduling
 */

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

pub trait Executor: Send + Sync {
    /// Run `lane(i, &mut out[i])` for every slot and wait for all of them.
    fn for_each_slot<T, F>(&self, out: &mut [T], lane: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync;

    /// Single-lane bookkeeping step between barriers.
    fn run_once<R, F>(&self, step: F) -> R
    where
        F: FnOnce() -> R,
    {
        step()
    }
}

// Below this many slots the fork/join overhead outweighs the work
const MIN_PARALLEL_SLOTS: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
pub struct RayonExecutor;

impl Executor for RayonExecutor {
    fn for_each_slot<T, F>(&self, out: &mut [T], lane: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync,
    {
        if out.len() < MIN_PARALLEL_SLOTS {
            for (i, slot) in out.iter_mut().enumerate() {
                lane(i, slot);
            }
            return;
        }

        // One chunk per worker keeps the number of rayon tasks small
        let chunk_size = std::cmp::max(out.len() / rayon::current_num_threads(), 1);
        out.par_chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let base = chunk_idx * chunk_size;
                for (offset, slot) in chunk.iter_mut().enumerate() {
                    lane(base + offset, slot);
                }
            });
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn for_each_slot<T, F>(&self, out: &mut [T], lane: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync,
    {
        for (i, slot) in out.iter_mut().enumerate() {
            lane(i, slot);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShuffledExecutor {
    pub seed: u64,
}

impl ShuffledExecutor {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Executor for ShuffledExecutor {
    fn for_each_slot<T, F>(&self, out: &mut [T], lane: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync,
    {
        let mut slots: Vec<(usize, &mut T)> = out.iter_mut().enumerate().collect();
        slots.shuffle(&mut StdRng::seed_from_u64(self.seed));
        for (i, slot) in slots {
            lane(i, slot);
        }
    }
}
