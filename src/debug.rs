/*
 * Debug Information Module
 *
 * Performance metrics shown in the overlay:
 * - FPS and frame time as nannou reports them
 * - Phase timings and grid occupancy of the last advanced frame
 */

use std::time::Duration;

use crate::simulation::FrameStats;

#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    // Last frame that actually advanced; paused frames leave it alone
    pub last_frame: FrameStats,
}

impl DebugInfo {
    pub fn record(&mut self, stats: FrameStats) {
        if stats.advanced {
            self.last_frame = stats;
        }
    }

    pub fn millis(duration: Duration) -> f64 {
        duration.as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_frames_keep_last_stats() {
        let mut info = DebugInfo::default();
        info.record(FrameStats { frame: 3, advanced: true, occupied_cells: 12, ..FrameStats::default() });
        info.record(FrameStats { frame: 3, advanced: false, ..FrameStats::default() });
        assert_eq!(info.last_frame.occupied_cells, 12);
        assert_eq!(info.last_frame.frame, 3);
    }
}
