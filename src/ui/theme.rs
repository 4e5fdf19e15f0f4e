use eframe::egui::Color32;

use crate::domain::task::TaskStatus;
use crate::services::urgency;

/// Calm end of the urgency ramp (blue-500).
const CALM: Color32 = Color32::from_rgb(59, 130, 246);
/// Alarm end of the urgency ramp (red-500).
const ALARM: Color32 = Color32::from_rgb(239, 68, 68);

pub const BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42); // slate-900

pub fn status_color(status: TaskStatus) -> Color32 {
    match status {
        TaskStatus::Todo => Color32::from_rgb(59, 130, 246), // blue-500
        TaskStatus::InProgress => Color32::from_rgb(245, 158, 11), // amber-500
        TaskStatus::Done => Color32::from_rgb(16, 185, 129), // emerald-500
        TaskStatus::Discarded => Color32::from_rgb(239, 68, 68), // red-500
        TaskStatus::Backlog => Color32::from_rgb(100, 116, 139), // slate-500
        TaskStatus::Archived => Color32::from_rgb(244, 63, 94), // rose-500
        TaskStatus::Unset => Color32::from_rgb(148, 163, 184), // slate-400
    }
}

/// Stroke color for a bubble's border, keyed by category and independent of
/// the urgency fill.
pub fn category_color(category: Option<&str>) -> Color32 {
    match category {
        Some("Activos (Portafolio Plantillas)") => Color32::from_rgb(139, 92, 246), // violet-500
        Some("Trabajo Estable") => Color32::from_rgb(6, 182, 212),                  // cyan-500
        Some("MCPs/Automatización") => Color32::from_rgb(20, 184, 166),             // teal-500
        Some("Tesis") => Color32::from_rgb(249, 115, 22),                           // orange-500
        Some("Admin/Personal") => Color32::from_rgb(236, 72, 153),                  // pink-500
        _ => Color32::from_rgb(148, 163, 184),                                      // slate-400
    }
}

/// Fill color for a bubble: calm blue sliding into alarm red as urgency
/// climbs toward the ceiling.
pub fn urgency_color(score: u32) -> Color32 {
    lerp_color(CALM, ALARM, urgency::urgency_factor(score) as f32)
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let channel = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(
        channel(a.r(), b.r()),
        channel(a.g(), b.g()),
        channel(a.b(), b.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_color_endpoints() {
        assert_eq!(urgency_color(0), CALM);
        assert_eq!(urgency_color(150), ALARM);
        assert_eq!(urgency_color(9000), ALARM);
    }

    #[test]
    fn test_urgency_color_moves_toward_alarm() {
        let mid = urgency_color(75);
        assert!(mid.r() > CALM.r());
        assert!(mid.r() < ALARM.r());
    }

    #[test]
    fn test_unknown_category_gets_fallback() {
        assert_eq!(category_color(None), category_color(Some("???")));
        assert_ne!(category_color(Some("Tesis")), category_color(None));
    }
}
