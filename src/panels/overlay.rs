//! Pin and connecting-line painting over the camera view.

use egui::{Color32, Pos2, Stroke};

use crate::config::OverlayStyle;
use crate::data::point::{Point, PointPair};

fn to_pos2(point: Point) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

/// Draw one pin pair: the connecting line first (under the pins), then a
/// filled circle with a white center dot per placed point.
pub fn draw_pair(
    painter: &egui::Painter,
    pair: &PointPair,
    color: Color32,
    style: &OverlayStyle,
    draw_pins: bool,
    draw_line: bool,
) {
    if draw_line {
        if let Some((a, b)) = pair.both() {
            painter.line_segment(
                [to_pos2(a), to_pos2(b)],
                Stroke::new(style.line_width, color.gamma_multiply(0.8)),
            );
        }
    }
    if draw_pins {
        for point in pair.points() {
            let center = to_pos2(point);
            painter.circle_filled(center, style.pin_radius, color);
            painter.circle_filled(center, style.pin_radius * 0.35, Color32::WHITE);
        }
    }
}
