use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui};

use crate::domain::task::{Task, TaskStatus};
use crate::physics::body::Body;
use crate::physics::consts::OUTLINE_SAMPLES;
use crate::physics::interaction::{DragController, GestureEvent};
use crate::physics::vec2::Vec2;
use crate::physics::world::PhysicsWorld;
use crate::ui::theme;

/// Pop feedback lives this long, in milliseconds.
const POP_LIFETIME_MS: f64 = 1000.0;

/// Bubbles smaller than this draw no title.
const MIN_TEXT_RADIUS: f64 = 18.0;

const MAX_TITLE_LINES: usize = 3;

/// Expanding ring + floating label confirming a status drop.
struct PopAnimation {
    position: Vec2,
    label: String,
    color: Color32,
    age_ms: f64,
}

/// The bubble scene: owns the physics world and the drag controller, steps
/// and draws once per frame from the egui paint loop.
pub struct BubbleView {
    world: PhysicsWorld,
    controller: DragController,
    pops: Vec<PopAnimation>,
    clock_ms: f64,
}

impl Default for BubbleView {
    fn default() -> Self {
        Self::new()
    }
}

impl BubbleView {
    pub fn new() -> Self {
        Self {
            // Zero arena until the first frame tells us how big we are;
            // synchronize defers placement until then.
            world: PhysicsWorld::new(Vec2::ZERO),
            controller: DragController::new(),
            pops: Vec::new(),
            clock_ms: 0.0,
        }
    }

    /// Push the current task list into the simulation. Call when the list
    /// changes, not per frame.
    pub fn synchronize(&mut self, tasks: &[Task]) {
        self.world.synchronize(tasks);
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// One frame: resize, pointer handling, physics step, draw. Returns the
    /// gesture events the host should act on.
    pub fn show(&mut self, ui: &mut Ui) -> Vec<GestureEvent> {
        let rect = ui.available_rect_before_wrap();
        let _response = ui.allocate_rect(rect, Sense::click_and_drag());

        let arena = Vec2::new(rect.width() as f64, rect.height() as f64);
        if (arena - self.world.arena()).length() > 0.5 {
            self.world.resize(arena);
        }

        let dt = (ui.input(|i| i.stable_dt) as f64).min(0.1);
        self.clock_ms += dt * 1000.0;

        let mut events = Vec::new();
        let pointer = ui.input(|i| i.pointer.interact_pos());
        let pressed = ui.input(|i| i.pointer.primary_pressed());
        let down = ui.input(|i| i.pointer.primary_down());
        let released = ui.input(|i| i.pointer.primary_released());

        if let Some(pos) = pointer {
            let local = Vec2::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
            if pressed && rect.contains(pos) {
                self.controller.press_start(&self.world, local);
            } else if down {
                events.extend(self.controller.press_move(&mut self.world, local));
            }
            if released {
                events.extend(self.controller.press_end(&mut self.world, local, self.clock_ms));
            }
        }

        self.world.step(dt);

        for event in &events {
            if let GestureEvent::StatusDropped { status, .. } = event {
                self.pops.push(PopAnimation {
                    position: self.world.arena() * 0.5,
                    label: status.label().to_string(),
                    color: theme::status_color(*status),
                    age_ms: 0.0,
                });
            }
        }

        for pop in &mut self.pops {
            pop.age_ms += dt * 1000.0;
        }
        self.pops.retain(|p| p.age_ms < POP_LIFETIME_MS);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme::BACKGROUND);

        self.draw_drop_zone(&painter, rect);
        self.draw_pops(&painter, rect);
        for body in self.world.bodies() {
            draw_body(&painter, rect, body);
        }

        // Keep the simulation animating even without input.
        ui.ctx().request_repaint();

        events
    }

    fn draw_drop_zone(&self, painter: &egui::Painter, rect: Rect) {
        let zone = self.world.drop_zone();
        let dragging = self.controller.is_dragging();
        let hovered = self.controller.hovered_band();

        let to_screen = |v: Vec2| Pos2::new(rect.min.x + v.x as f32, rect.min.y + v.y as f32);
        let zone_rect =
            Rect::from_min_max(to_screen(zone.origin()), to_screen(zone.origin() + zone.size()));

        let panel_alpha = if dragging { 36 } else { 14 };
        painter.rect_filled(
            zone_rect,
            Rounding::same(10.0),
            Color32::from_rgba_unmultiplied(255, 255, 255, panel_alpha),
        );

        for (i, status) in TaskStatus::BANDS.iter().enumerate() {
            let (min, max) = zone.band_rect(i);
            let band = Rect::from_min_max(to_screen(min), to_screen(max)).shrink(4.0);
            let color = theme::status_color(*status);
            let is_hovered = dragging && hovered == Some(*status);

            let fill_alpha = if is_hovered {
                110
            } else if dragging {
                60
            } else {
                24
            };
            painter.rect_filled(
                band,
                Rounding::same(8.0),
                Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), fill_alpha),
            );
            if is_hovered {
                painter.rect_stroke(band, Rounding::same(8.0), Stroke::new(2.0, color));
            }

            let text_alpha = if dragging { 255 } else { 90 };
            painter.text(
                band.center(),
                Align2::CENTER_CENTER,
                status.label(),
                FontId::proportional(11.0),
                Color32::from_rgba_unmultiplied(255, 255, 255, text_alpha),
            );
        }
    }

    fn draw_pops(&self, painter: &egui::Painter, rect: Rect) {
        for pop in &self.pops {
            let t = (pop.age_ms / POP_LIFETIME_MS) as f32;
            let fade = (1.0 - t).clamp(0.0, 1.0);
            let center = Pos2::new(
                rect.min.x + pop.position.x as f32,
                rect.min.y + pop.position.y as f32,
            );

            let ring = Color32::from_rgba_unmultiplied(
                pop.color.r(),
                pop.color.g(),
                pop.color.b(),
                (fade * 200.0) as u8,
            );
            painter.circle_stroke(center, 20.0 + t * 70.0, Stroke::new(1.0 + fade * 2.5, ring));
            painter.circle_stroke(
                center,
                10.0 + t * 45.0,
                Stroke::new(1.0 + fade * 1.5, ring),
            );

            painter.text(
                Pos2::new(center.x, center.y - 30.0 - t * 35.0),
                Align2::CENTER_CENTER,
                &pop.label,
                FontId::proportional(14.0),
                Color32::from_rgba_unmultiplied(255, 255, 255, (fade * 255.0) as u8),
            );
        }
    }
}

fn draw_body(painter: &egui::Painter, rect: Rect, body: &Body) {
    let center = Pos2::new(
        rect.min.x + body.position.x as f32,
        rect.min.y + body.position.y as f32,
    );

    // Sample the deformed outline, then smooth it with quadratic curves
    // through segment midpoints so dents stay organic instead of jagged.
    let n = OUTLINE_SAMPLES;
    let mut samples = Vec::with_capacity(n);
    for k in 0..n {
        let angle = k as f64 * std::f64::consts::TAU / n as f64;
        let r = body.outline_radius(angle);
        samples.push(Pos2::new(
            center.x + (angle.cos() * r) as f32,
            center.y + (angle.sin() * r) as f32,
        ));
    }

    let mut points = Vec::with_capacity(n * 4);
    for i in 0..n {
        let prev = samples[(i + n - 1) % n];
        let curr = samples[i];
        let next = samples[(i + 1) % n];
        let start = midpoint(prev, curr);
        let end = midpoint(curr, next);
        for step in 1..=4 {
            points.push(quadratic_point(start, curr, end, step as f32 / 4.0));
        }
    }

    let fill = theme::urgency_color(body.snapshot.urgency);
    let stroke_color = theme::category_color(body.snapshot.category.as_deref());

    // Settled tasks stay in the scene but fade into the background.
    let settled = matches!(
        body.snapshot.status,
        TaskStatus::Done | TaskStatus::Discarded
    );
    let fill_alpha = if settled { 100 } else { 170 };

    // Soft glow behind the bubble, same hue as the fill.
    painter.circle_filled(
        center,
        (body.pulsed_radius() * 1.12) as f32,
        Color32::from_rgba_unmultiplied(fill.r(), fill.g(), fill.b(), 26),
    );
    painter.add(Shape::convex_polygon(
        points,
        Color32::from_rgba_unmultiplied(fill.r(), fill.g(), fill.b(), fill_alpha),
        Stroke::new(2.0, stroke_color),
    ));

    let radius = body.pulsed_radius();
    if radius < MIN_TEXT_RADIUS {
        return;
    }

    let font_size = (radius * 0.28).clamp(10.0, 16.0) as f32;
    let max_chars = ((radius * 1.6) / (font_size as f64 * 0.55)) as usize;
    let lines = wrap_title(&body.snapshot.title, max_chars.max(4), MAX_TITLE_LINES);

    let line_height = font_size * 1.2;
    let total = line_height * lines.len() as f32;
    let mut y = center.y - total / 2.0 + line_height / 2.0;
    for line in lines {
        painter.text(
            Pos2::new(center.x, y),
            Align2::CENTER_CENTER,
            line,
            FontId::proportional(font_size),
            Color32::WHITE,
        );
        y += line_height;
    }
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn quadratic_point(start: Pos2, control: Pos2, end: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    Pos2::new(
        u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
        u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
    )
}

/// Greedy word wrap capped at `max_lines`. The last line gets an ellipsis
/// when the title would not fit.
fn wrap_title(title: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflowed = false;

    for word in title.split_whitespace() {
        let word: String = if word.chars().count() > max_chars {
            word.chars()
                .take(max_chars.saturating_sub(1))
                .chain(std::iter::once('…'))
                .collect()
        } else {
            word.to_string()
        };

        if current.is_empty() {
            current = word;
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                overflowed = true;
                break;
            }
            current = word;
        }
    }

    if !current.is_empty() {
        if lines.len() < max_lines {
            lines.push(current);
        } else {
            overflowed = true;
        }
    }

    if overflowed {
        if let Some(last) = lines.last_mut() {
            if !last.ends_with('…') {
                last.push('…');
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_title_is_one_line() {
        assert_eq!(wrap_title("Tesis", 12, 3), vec!["Tesis"]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        let lines = wrap_title("Configurar Supabase ahora", 12, 3);
        assert!(lines.len() <= 3);
        for line in &lines {
            assert!(line.chars().count() <= 12);
        }
        assert_eq!(lines[0], "Configurar");
    }

    #[test]
    fn test_wrap_truncates_with_ellipsis() {
        let lines = wrap_title(
            "Una tarea con un título larguísimo que jamás va a caber entero",
            10,
            3,
        );
        assert_eq!(lines.len(), 3);
        assert!(lines.last().unwrap().ends_with('…'));
    }

    #[test]
    fn test_wrap_handles_overlong_single_word() {
        let lines = wrap_title("Supercalifragilisticoespialidoso", 10, 3);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].chars().count() <= 10);
        assert!(lines[0].ends_with('…'));
    }

    #[test]
    fn test_wrap_empty_title() {
        assert!(wrap_title("", 10, 3).is_empty());
    }

    #[test]
    fn test_quadratic_endpoints() {
        let a = Pos2::new(0.0, 0.0);
        let c = Pos2::new(5.0, 10.0);
        let b = Pos2::new(10.0, 0.0);
        assert_eq!(quadratic_point(a, c, b, 0.0), a);
        assert_eq!(quadratic_point(a, c, b, 1.0), b);
        // Curve bends toward the control point at the middle.
        assert!(quadratic_point(a, c, b, 0.5).y > 0.0);
    }
}
