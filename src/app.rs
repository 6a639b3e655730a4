/*
 * Application Module
 *
 * The nannou model for the viewer. The model function reads the command
 * line and builds the simulation itself. Each nannou update then steps the
 * simulation exactly once with the input captured since the previous
 * update, so the window shows every committed frame.
 */

use std::path::PathBuf;
use std::process;

use clap::Parser;
use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, info};

use crate::debug::DebugInfo;
use crate::error::Result;
use crate::input::{key_pressed, mouse_exited, mouse_moved, raw_window_event};
use crate::probe::FrameInput;
use crate::renderer::view;
use crate::params::SimulationParams;
use crate::simulation::Simulation;
use crate::ui;

// Advanced frames between FPS log lines
const FPS_LOG_INTERVAL: u64 = 600;

#[derive(Parser, Debug)]
#[command(name = "flocking")]
#[command(about = "Grid-accelerated flocking simulation")]
pub struct ViewerArgs {
    /// RON file with simulation parameters; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the number of units
    #[arg(long)]
    pub units: Option<usize>,

    /// Seed for the initial placement
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ViewerArgs {
    /// Parameters from the config file (or defaults) with command line overrides applied.
    pub fn params(&self) -> Result<SimulationParams> {
        let mut params = match &self.config {
            Some(path) => {
                info!("Loading parameters from {}", path.display());
                SimulationParams::load(path)?
            }
            None => SimulationParams::default(),
        };

        if let Some(units) = self.units {
            params.unit_count = units;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }

        params.validate()?;
        Ok(params)
    }
}

pub struct Model {
    pub simulation: Simulation,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    // Snapshot handed to the next step; input handlers write it between frames
    pub input: FrameInput,
}

/// Open the window and drive the flock until it is closed.
pub fn run() {
    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    let args = ViewerArgs::parse();
    let simulation = match args.params().and_then(Simulation::new) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    // One world unit per pixel
    let params = simulation.params();
    let window_id = app
        .new_window()
        .title("Flocking Simulation")
        .size(params.world_width as u32, params.world_height as u32)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_exited(mouse_exited)
        .key_pressed(key_pressed)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    Model {
        simulation,
        egui,
        debug_info: DebugInfo::default(),
        input: FrameInput::running(),
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    ui::update_ui(&mut model.egui, &mut model.input, &model.debug_info, model.simulation.units().len());

    let stats = model.simulation.step(&model.input);
    model.debug_info.record(stats);

    if stats.advanced && stats.frame % FPS_LOG_INTERVAL == 0 {
        info!(
            frame = stats.frame,
            fps = model.debug_info.fps,
            step_ms = DebugInfo::millis(stats.total()),
            "Frame rate"
        );
    }
}

/// World coordinates have their origin at the bottom-left corner, nannou's at the window center.
pub fn world_to_screen(x: f32, y: f32, world_width: f32, world_height: f32) -> Point2 {
    pt2(x - world_width / 2.0, y - world_height / 2.0)
}

pub fn screen_to_world(pos: Point2, world_width: f32, world_height: f32) -> (f32, f32) {
    (pos.x + world_width / 2.0, pos.y + world_height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_and_world_coordinates_invert() {
        let screen = world_to_screen(0.0, 0.0, 1600.0, 900.0);
        assert_eq!((screen.x, screen.y), (-800.0, -450.0));
        assert_eq!(screen_to_world(pt2(0.0, 0.0), 1600.0, 900.0), (800.0, 450.0));
        assert_eq!(screen_to_world(world_to_screen(123.0, 45.0, 1600.0, 900.0), 1600.0, 900.0), (123.0, 45.0));
    }

    #[test]
    fn command_line_overrides_defaults() {
        let args = ViewerArgs::try_parse_from(["flocking", "--units", "250", "--seed", "9"]).unwrap();
        let params = args.params().unwrap();
        assert_eq!(params.unit_count, 250);
        assert_eq!(params.seed, Some(9));
        assert_eq!(params.visual_range, 100.0);

        let args = ViewerArgs::try_parse_from(["flocking"]).unwrap();
        assert_eq!(args.params().unwrap(), SimulationParams::default());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = ViewerArgs::try_parse_from(["flocking", "--config", "/definitely/not/here.ron"]).unwrap();
        assert!(args.params().is_err());
    }
}
