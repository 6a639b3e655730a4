/*
 * Input Module
 *
 * Window event handlers. They only edit the FrameInput snapshot held by the
 * model; the simulation reads it at the start of the next frame.
 * - Cursor position becomes the repulsive probe, cleared when the cursor
 *   leaves the window or hovers the overlay
 * - Space toggles pause
 */

use nannou::prelude::*;
use tracing::info;

use crate::app::{screen_to_world, Model};
use crate::probe::EnvironmentProbe;

pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    if model.egui.ctx().is_pointer_over_area() {
        model.input.probe = EnvironmentProbe::none();
        return;
    }

    let params = model.simulation.params();
    let (x, y) = screen_to_world(pos, params.world_width, params.world_height);
    model.input.probe = EnvironmentProbe::at(x, y);
}

pub fn mouse_exited(_app: &App, model: &mut Model) {
    model.input.probe = EnvironmentProbe::none();
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if key == Key::Space && !model.egui.ctx().wants_keyboard_input() {
        model.input.paused = !model.input.paused;
        info!(paused = model.input.paused, frame = model.simulation.frame(), "Pause toggled");
    }
}

// Pass events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
