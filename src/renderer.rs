/*
 * Renderer Module
 *
 * Rasterizes the triangle buffer of the last committed frame. Nothing here
 * reads or writes simulation state beyond that buffer and the world size.
 */

use nannou::prelude::*;

use crate::app::{world_to_screen, Model};

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let params = model.simulation.params();
    let (w, h) = (params.world_width, params.world_height);

    // Margin box: units outside it are being steered back
    let mbox = params.margin_box();
    let corner = world_to_screen(mbox.left, mbox.bottom, w, h);
    let opposite = world_to_screen(mbox.right, mbox.top, w, h);
    let margin_rect = Rect::from_corners(corner, opposite);
    draw.rect()
        .xy(margin_rect.xy())
        .wh(margin_rect.wh())
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));

    if let Some((px, py)) = model.input.probe.point() {
        draw.ellipse()
            .xy(world_to_screen(px, py, w, h))
            .radius(params.visual_range)
            .no_fill()
            .stroke(rgba(1.0, 0.3, 0.3, 0.5))
            .stroke_weight(1.0);
    }

    for triangle in model.simulation.triangles() {
        let points = triangle.points.map(|[x, y]| world_to_screen(x, y, w, h));
        draw.polygon()
            .color(rgb(0.85, 0.9, 1.0))
            .points(points);
    }

    draw.to_frame(app, &frame).unwrap();

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).unwrap();
}
