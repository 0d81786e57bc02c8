use egui::Color32;

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Colors for the agenda grid, derived from the active egui visuals.
#[derive(Clone, Copy)]
pub struct AgendaPalette {
    pub open_bg: Color32,
    pub closed_bg: Color32,
    pub today_bg: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub divider: Color32,
    pub hover_overlay: Color32,
    pub hover_indicator: Color32,
    pub preview_line: Color32,
    pub preview_fill: Color32,
    pub time_label: Color32,
    pub current_time: Color32,
}

impl AgendaPalette {
    pub fn from_visuals(dark: bool) -> Self {
        if dark {
            Self {
                open_bg: Color32::from_rgb(32, 33, 36),
                closed_bg: Color32::from_rgb(24, 24, 26),
                today_bg: Color32::from_rgb(36, 40, 48),
                hour_line: Color32::from_rgb(70, 72, 78),
                slot_line: with_alpha(Color32::from_rgb(70, 72, 78), 140),
                divider: with_alpha(Color32::from_rgb(70, 72, 78), 220),
                hover_overlay: with_alpha(Color32::from_rgb(140, 120, 255), 26),
                hover_indicator: Color32::from_rgb(140, 120, 255),
                preview_line: Color32::from_rgb(90, 200, 120),
                preview_fill: with_alpha(Color32::from_rgb(90, 200, 120), 46),
                time_label: Color32::GRAY,
                current_time: Color32::from_rgb(255, 100, 100),
            }
        } else {
            Self {
                open_bg: Color32::WHITE,
                closed_bg: Color32::from_rgb(229, 231, 235),
                today_bg: Color32::from_rgb(243, 240, 255),
                hour_line: Color32::from_rgb(203, 206, 212),
                slot_line: with_alpha(Color32::from_rgb(203, 206, 212), 150),
                divider: with_alpha(Color32::from_rgb(203, 206, 212), 230),
                hover_overlay: with_alpha(Color32::from_rgb(124, 58, 237), 22),
                hover_indicator: Color32::from_rgb(124, 58, 237),
                preview_line: Color32::from_rgb(22, 163, 74),
                preview_fill: with_alpha(Color32::from_rgb(22, 163, 74), 38),
                time_label: Color32::GRAY,
                current_time: Color32::from_rgb(255, 100, 100),
            }
        }
    }
}
