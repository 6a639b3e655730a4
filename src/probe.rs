/*
 * Frame Input Module
 *
 * Everything the outside world hands the pipeline for one frame: the
 * repulsive probe point (usually the mouse) and whether the frame should
 * advance at all. The snapshot is taken once before the frame starts and
 * is read-only while it runs.
 */

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvironmentProbe {
    point: Option<(f32, f32)>,
}

impl EnvironmentProbe {
    pub const fn none() -> Self {
        Self { point: None }
    }

    pub const fn at(x: f32, y: f32) -> Self {
        Self { point: Some((x, y)) }
    }

    pub fn point(&self) -> Option<(f32, f32)> {
        self.point
    }

    pub fn is_active(&self) -> bool {
        self.point.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub probe: EnvironmentProbe,
    pub paused: bool,
}

impl FrameInput {
    pub fn running() -> Self {
        Self::default()
    }

    pub fn with_probe(probe: EnvironmentProbe) -> Self {
        Self { probe, paused: false }
    }

    pub fn paused() -> Self {
        Self { probe: EnvironmentProbe::none(), paused: true }
    }
}
