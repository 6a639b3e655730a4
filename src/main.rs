/*
 * Flocking Simulation Viewer
 *
 * Installs logging and opens a window that steps the flock once per
 * displayed frame. Arguments are read when the window's model is built.
 *
 * Usage: flocking [--config params.ron] [--units N] [--seed SEED]
 */

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flocking::app;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flocking=info,wgpu=error"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() {
    init_logging();
    app::run();
}
