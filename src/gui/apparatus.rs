use egui::{pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Shape, Stroke};

use crate::simulation::CollectionWindow;

const BOIL_VISIBLE_FROM_C: f64 = 70.0;

/// What the apparatus drawing needs from the simulator for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ApparatusState {
    pub temperature: f64,
    pub volume_ml: f64,
    pub receiver_capacity_ml: f64,
    pub cooling: bool,
    pub heat: u8,
    pub window: Option<CollectionWindow>,
    /// Animation counter; the sample count works well.
    pub cycle: usize,
}

pub fn receiver_level(volume_ml: f64, capacity_ml: f64) -> f32 {
    if capacity_ml <= 0.0 {
        return 0.0;
    }
    (volume_ml / capacity_ml).clamp(0.0, 1.0) as f32
}

pub fn vapor_speed(window: Option<CollectionWindow>) -> usize {
    match window {
        Some(CollectionWindow::Ethanol) => 3,
        Some(CollectionWindow::Water) => 2,
        None => 0,
    }
}

pub fn bubble_count(temperature: f64) -> usize {
    if temperature >= BOIL_VISIBLE_FROM_C {
        6
    } else {
        0
    }
}

/// Flame (height, half width) in points.
pub fn flame_size(heat: u8, cycle: usize) -> (f32, f32) {
    let heat = f32::from(heat);
    (8.0 + heat / 15.0 + (cycle % 4) as f32, 6.0 + heat / 20.0)
}

fn condenser_color(cooling: bool) -> Color32 {
    if cooling {
        Color32::from_rgb(59, 130, 246)
    } else {
        Color32::from_rgb(156, 163, 175)
    }
}

pub fn draw_apparatus(ui: &mut egui::Ui, state: &ApparatusState) {
    let desired = vec2(ui.available_width().min(440.0), 310.0);
    let (response, painter) = ui.allocate_painter(desired, Sense::hover());
    let origin = response.rect.min;
    let sx = response.rect.width() / 440.0;
    // Layout is authored on a 440x310 canvas and scaled horizontally.
    let at = |x: f32, y: f32| -> Pos2 { pos2(origin.x + x * sx, origin.y + y) };

    let outline = Stroke::new(2.0, Color32::from_rgb(107, 114, 128));
    let label_font = FontId::proportional(11.0);
    let label_color = Color32::from_rgb(75, 85, 99);
    let condenser = condenser_color(state.cooling);

    painter.rect_filled(response.rect, Rounding::same(6.0), Color32::WHITE);

    // Flask
    painter.circle(at(110.0, 210.0), 40.0, Color32::from_rgb(229, 231, 235), outline);
    painter.rect(
        Rect::from_min_max(at(95.0, 140.0), at(125.0, 172.0)),
        Rounding::ZERO,
        Color32::from_rgb(229, 231, 235),
        outline,
    );
    painter.text(at(110.0, 262.0), Align2::CENTER_CENTER, "Flask", label_font.clone(), label_color);

    for i in 0..bubble_count(state.temperature) {
        let phase = (state.cycle + i) as f32 * 0.7 + i as f32;
        let x = 110.0 + phase.sin() * 18.0;
        let y = 225.0 - ((state.cycle * 2 + i * 8) % 60) as f32;
        painter.circle_filled(at(x, y), 2.0 + (i % 3) as f32, Color32::from_rgb(147, 197, 253));
    }

    // Thermometer
    painter.line_segment([at(142.0, 125.0), at(142.0, 185.0)], Stroke::new(3.0, Color32::from_rgb(55, 65, 81)));
    painter.circle_filled(at(142.0, 120.0), 3.0, Color32::from_rgb(239, 68, 68));
    painter.text(
        at(152.0, 112.0),
        Align2::LEFT_CENTER,
        format!("Thermometer {:.1} °C", state.temperature),
        label_font.clone(),
        label_color,
    );

    // Condenser body and water jacket
    painter.rect(
        Rect::from_min_max(at(220.0, 120.0), at(310.0, 180.0)),
        Rounding::same(3.0),
        Color32::from_rgb(243, 244, 246),
        outline,
    );
    painter.line_segment([at(220.0, 132.0), at(310.0, 132.0)], Stroke::new(3.0, condenser));
    painter.line_segment([at(220.0, 168.0), at(310.0, 168.0)], Stroke::new(3.0, condenser));
    painter.text(at(265.0, 196.0), Align2::CENTER_CENTER, "Liebig condenser", label_font.clone(), label_color);

    let arrow_alpha = if state.cooling { 255 } else { 100 };
    let arrow_color = Color32::from_rgba_unmultiplied(condenser.r(), condenser.g(), condenser.b(), arrow_alpha);
    for i in 0..4 {
        let offset = ((state.cycle + i * 20) % 80) as f32;
        painter.add(Shape::convex_polygon(
            vec![at(235.0 + offset, 136.0), at(230.0 + offset, 131.0), at(240.0 + offset, 131.0)],
            arrow_color,
            Stroke::NONE,
        ));
        painter.add(Shape::convex_polygon(
            vec![at(310.0 - offset, 164.0), at(315.0 - offset, 169.0), at(305.0 - offset, 169.0)],
            arrow_color,
            Stroke::NONE,
        ));
    }

    // Vapor travelling from the flask neck to the condenser
    let speed = vapor_speed(state.window);
    if speed > 0 {
        for i in 0..5 {
            let t = ((state.cycle * speed + i * 15) % 100) as f32;
            painter.circle_filled(at(160.0 + t * 0.6, 150.0 - t * 0.1), 2.0, Color32::from_rgb(245, 158, 11));
        }
    }

    // Receiver with fill level
    let receiver = Rect::from_min_max(at(327.0, 221.0), at(383.0, 289.0));
    painter.rect(receiver, Rounding::same(12.0), Color32::from_rgb(254, 243, 199), Stroke::new(2.0, Color32::from_rgb(245, 158, 11)));
    let level = receiver_level(state.volume_ml, state.receiver_capacity_ml);
    if level > 0.0 {
        let fill = Rect::from_min_max(pos2(receiver.min.x, receiver.max.y - receiver.height() * level), receiver.max);
        painter.rect_filled(fill.shrink(2.0), Rounding::same(10.0), Color32::from_rgb(191, 219, 254));
    }
    painter.text(at(355.0, 300.0), Align2::CENTER_CENTER, format!("Receiver {:.1} mL", state.volume_ml), label_font.clone(), label_color);

    // Connecting tubes
    painter.line_segment([at(142.0, 185.0), at(220.0, 150.0)], Stroke::new(3.0, Color32::from_rgb(107, 114, 128)));
    painter.line_segment([at(310.0, 150.0), at(355.0, 221.0)], Stroke::new(3.0, Color32::from_rgb(107, 114, 128)));

    // Burner and flame
    painter.rect(
        Rect::from_min_max(at(76.0, 262.0), at(144.0, 284.0)),
        Rounding::same(2.0),
        Color32::from_rgb(254, 226, 226),
        Stroke::new(2.0, Color32::from_rgb(239, 68, 68)),
    );
    let (flame_h, flame_w) = flame_size(state.heat, state.cycle);
    if state.heat > 0 {
        painter.add(Shape::convex_polygon(
            vec![at(110.0, 260.0 - flame_h), at(110.0 + flame_w, 262.0), at(110.0 - flame_w, 262.0)],
            Color32::from_rgba_unmultiplied(245, 158, 11, 204),
            Stroke::NONE,
        ));
        painter.add(Shape::convex_polygon(
            vec![at(110.0, 262.0 - flame_h / 1.6), at(110.0 + flame_w / 2.0, 262.0), at(110.0 - flame_w / 2.0, 262.0)],
            Color32::from_rgba_unmultiplied(253, 230, 138, 230),
            Stroke::NONE,
        ));
    }

    // Water hoses
    painter.line_segment([at(200.0, 100.0), at(220.0, 132.0)], Stroke::new(2.0, condenser));
    painter.line_segment([at(310.0, 168.0), at(330.0, 140.0)], Stroke::new(2.0, condenser));
    painter.text(at(205.0, 92.0), Align2::LEFT_CENTER, "Water in", label_font.clone(), condenser);
    painter.text(at(330.0, 130.0), Align2::LEFT_CENTER, "Water out", label_font, condenser);
}
