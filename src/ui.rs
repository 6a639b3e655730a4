/*
 * UI Module
 *
 * The egui overlay: frame statistics and a pause toggle. Flocking parameters
 * are fixed for the lifetime of a simulation and only shown here.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::probe::FrameInput;

pub fn update_ui(egui: &mut Egui, input: &mut FrameInput, debug_info: &DebugInfo, unit_count: usize) {
    let ctx = egui.begin_frame();
    let last = &debug_info.last_frame;

    egui::Window::new("Simulation")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.label(format!("FPS: {:.1}", debug_info.fps));
            ui.label(format!("Frame time: {:.2} ms", DebugInfo::millis(debug_info.frame_time)));
            ui.label(format!("Units: {}", unit_count));
            ui.label(format!("Frame: {}", last.frame));

            ui.collapsing("Phase timings", |ui| {
                ui.label(format!("Grid build: {:.3} ms", DebugInfo::millis(last.grid_build)));
                ui.label(format!("Force update: {:.3} ms", DebugInfo::millis(last.force_update)));
                ui.label(format!("Commit: {:.3} ms", DebugInfo::millis(last.commit)));
                ui.label(format!("Triangles: {:.3} ms", DebugInfo::millis(last.triangles)));
            });

            ui.collapsing("Grid", |ui| {
                ui.label(format!("Occupied cells: {}", last.occupied_cells));
                ui.label(format!("Busiest cell: {}", last.max_cell_load));
            });

            ui.separator();
            ui.checkbox(&mut input.paused, "Pause Simulation (Space)");
            let probe = match input.probe.point() {
                Some((x, y)) => format!("Probe: ({:.0}, {:.0})", x, y),
                None => "Probe: off".to_string(),
            };
            ui.label(probe);
        });
}
