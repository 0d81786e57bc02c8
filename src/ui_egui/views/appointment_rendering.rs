//! Appointment bar drawing inside time cells.
//!
//! A booking is drawn by the cell its start falls into; cells it spans
//! afterwards draw continuation blocks so multi-slot bookings read as one
//! contiguous bar. While its drag gesture is active the origin bar turns
//! translucent and the resolved position carries the solid preview.

use egui::{Color32, Pos2, Rect, Vec2};

use crate::models::appointment::Appointment;

const FALLBACK_COLOR: Color32 = Color32::from_rgb(100, 150, 200);

/// Parse "#RRGGBB" / "#RGB" into a color; anything else falls back.
pub fn parse_color(raw: &str) -> Option<Color32> {
    let hex = raw.strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color32::from_rgb(r, g, b))
        }
        3 => {
            let component = |i: usize| {
                u8::from_str_radix(&hex[i..=i], 16)
                    .ok()
                    .map(|v| v * 16 + v)
            };
            Some(Color32::from_rgb(component(0)?, component(1)?, component(2)?))
        }
        _ => None,
    }
}

pub fn appointment_color(appointment: &Appointment) -> Color32 {
    appointment
        .color
        .as_deref()
        .and_then(parse_color)
        .unwrap_or(FALLBACK_COLOR)
}

fn ghosted(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 70)
}

/// Draw the starting segment of an appointment inside `cell_rect`.
/// Returns the drawn rect for pointer hit testing.
#[allow(clippy::too_many_arguments)]
pub fn render_appointment_in_cell(
    ui: &mut egui::Ui,
    cell_rect: Rect,
    appointment: &Appointment,
    slot_start_minutes: i32,
    slot_duration_minutes: i32,
    is_dragged: bool,
) -> Rect {
    let ppm = cell_rect.height() / slot_duration_minutes as f32;
    let offset_minutes = appointment.start_minutes() - slot_start_minutes;
    let slot_end_minutes = slot_start_minutes + slot_duration_minutes;
    let continues = appointment.end_minutes() > slot_end_minutes;

    let top = cell_rect.top() + offset_minutes.max(0) as f32 * ppm;
    let height = if continues {
        cell_rect.bottom() - top
    } else {
        (appointment.end_minutes() - slot_start_minutes.max(appointment.start_minutes())) as f32
            * ppm
            - 2.0
    };

    let bar_rect = Rect::from_min_size(
        Pos2::new(cell_rect.left() + 1.0, top),
        Vec2::new(cell_rect.width() - 2.0, height.max(4.0)),
    );

    let base = appointment_color(appointment);
    let fill = if is_dragged { ghosted(base) } else { base };
    let rounding = if continues {
        egui::Rounding {
            nw: 2.0,
            ne: 2.0,
            sw: 0.0,
            se: 0.0,
        }
    } else {
        egui::Rounding::same(2.0)
    };
    ui.painter().rect_filled(bar_rect, rounding, fill);

    let text_color = if is_dragged {
        Color32::from_rgba_unmultiplied(255, 255, 255, 120)
    } else {
        Color32::WHITE
    };
    let mut label = appointment.client_name.clone();
    if !appointment.service.is_empty() {
        label.push_str(" · ");
        label.push_str(&appointment.service);
    }
    let layout_job = egui::text::LayoutJob::simple(
        label,
        egui::FontId::proportional(10.0),
        text_color,
        bar_rect.width() - 8.0,
    );
    let galley = ui.fonts(|f| f.layout_job(layout_job));
    ui.painter().galley(
        Pos2::new(bar_rect.left() + 4.0, bar_rect.top() + 2.0),
        galley,
        text_color,
    );

    bar_rect
}

/// Continuation block for an appointment that started in an earlier cell.
/// Extends to the cell top so consecutive segments connect seamlessly.
pub fn render_appointment_continuation(
    ui: &mut egui::Ui,
    cell_rect: Rect,
    appointment: &Appointment,
    slot_start_minutes: i32,
    slot_duration_minutes: i32,
    is_dragged: bool,
) -> Rect {
    let ppm = cell_rect.height() / slot_duration_minutes as f32;
    let slot_end_minutes = slot_start_minutes + slot_duration_minutes;
    let continues = appointment.end_minutes() > slot_end_minutes;

    let height = if continues {
        cell_rect.height()
    } else {
        (appointment.end_minutes() - slot_start_minutes) as f32 * ppm - 2.0
    };

    let block_rect = Rect::from_min_size(
        Pos2::new(cell_rect.left() + 1.0, cell_rect.top()),
        Vec2::new(cell_rect.width() - 2.0, height.max(2.0)),
    );

    let base = appointment_color(appointment);
    let fill = if is_dragged {
        ghosted(base)
    } else {
        base.linear_multiply(0.55)
    };
    let rounding = if continues {
        egui::Rounding::ZERO
    } else {
        egui::Rounding {
            nw: 0.0,
            ne: 0.0,
            sw: 2.0,
            se: 2.0,
        }
    };
    ui.painter().rect_filled(block_rect, rounding, fill);

    block_rect
}
