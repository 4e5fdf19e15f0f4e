use uuid::Uuid;

use crate::domain::task::TaskStatus;
use crate::physics::vec2::Vec2;
use crate::physics::world::PhysicsWorld;

/// Pointer travel under this many pixels still counts as a click.
pub const CLICK_SLOP: f64 = 5.0;

/// Two qualifying releases on the same body inside this window open it.
pub const DOUBLE_CLICK_WINDOW_MS: f64 = 350.0;

/// What a finished (or progressing) gesture means in task terms. A single
/// gesture emits at most one of TaskOpened / TaskMoved / StatusDropped.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    DragStarted(Uuid),
    TaskOpened(Uuid),
    TaskMoved { id: Uuid, position: Vec2 },
    StatusDropped { id: Uuid, status: TaskStatus },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerState {
    Idle,
    Pressed { start: Vec2, body: Option<Uuid> },
    Dragging { id: Uuid },
}

/// Translates arena-local pointer events into drag/click/double-click
/// semantics against the physics world. Timestamps come in from the caller
/// so the transition table tests without a clock.
pub struct DragController {
    state: PointerState,
    last_release: Option<(Uuid, f64)>,
    hovered_band: Option<TaskStatus>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: PointerState::Idle,
            last_release: None,
            hovered_band: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PointerState::Dragging { .. })
    }

    pub fn dragged_body(&self) -> Option<Uuid> {
        match self.state {
            PointerState::Dragging { id } => Some(id),
            _ => None,
        }
    }

    /// Band currently under a dragged bubble, for the hover highlight.
    pub fn hovered_band(&self) -> Option<TaskStatus> {
        self.hovered_band
    }

    pub fn press_start(&mut self, world: &PhysicsWorld, point: Vec2) {
        self.state = PointerState::Pressed {
            start: point,
            body: world.body_at(point),
        };
    }

    pub fn press_move(&mut self, world: &mut PhysicsWorld, point: Vec2) -> Vec<GestureEvent> {
        match self.state {
            PointerState::Pressed {
                start,
                body: Some(id),
            } if point.distance(start) >= CLICK_SLOP => {
                // The press became a drag: capture the body and open the
                // status strip for it.
                self.state = PointerState::Dragging { id };
                world.begin_drag(id);
                world.set_drop_zone_active(false);
                world.update_drag(id, point);
                self.hovered_band = world.drop_zone().band_at(point);
                vec![GestureEvent::DragStarted(id)]
            }
            PointerState::Dragging { id } => {
                world.update_drag(id, point);
                self.hovered_band = world.drop_zone().band_at(point);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn press_end(
        &mut self,
        world: &mut PhysicsWorld,
        point: Vec2,
        now_ms: f64,
    ) -> Vec<GestureEvent> {
        let state = std::mem::replace(&mut self.state, PointerState::Idle);
        self.hovered_band = None;

        match state {
            PointerState::Idle => Vec::new(),

            PointerState::Pressed { start, body } => {
                if point.distance(start) >= CLICK_SLOP {
                    return Vec::new();
                }
                let Some(id) = body else {
                    return Vec::new();
                };

                if let Some((last_id, last_ms)) = self.last_release {
                    if last_id == id && now_ms - last_ms < DOUBLE_CLICK_WINDOW_MS {
                        self.last_release = None;
                        return vec![GestureEvent::TaskOpened(id)];
                    }
                }
                self.last_release = Some((id, now_ms));
                Vec::new()
            }

            PointerState::Dragging { id } => {
                world.set_drop_zone_active(true);
                let final_position = world.end_drag(id);

                if let Some(status) = world.drop_zone().band_at(point) {
                    world.teleport_and_kick(id);
                    vec![GestureEvent::StatusDropped { id, status }]
                } else {
                    let position = final_position.unwrap_or(point);
                    vec![GestureEvent::TaskMoved { id, position }]
                }
            }
        }
    }

    /// Pointer lost (window blur, capture stolen). Drops any gesture in
    /// flight without signaling.
    pub fn cancel(&mut self, world: &mut PhysicsWorld) {
        if let PointerState::Dragging { id } = self.state {
            world.set_drop_zone_active(true);
            world.end_drag(id);
        }
        self.state = PointerState::Idle;
        self.hovered_band = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Task;
    use crate::physics::consts::DROP_ZONE_WIDTH;

    const DT: f64 = 1.0 / 60.0;

    fn world_with_task(x: f64, y: f64) -> (PhysicsWorld, Uuid) {
        let mut world = PhysicsWorld::new(Vec2::new(800.0, 600.0));
        let mut task = Task::new_simple("Bubble".to_string());
        task.set_position(x, y);
        world.synchronize(&[task.clone()]);
        (world, task.id)
    }

    fn drag_to(
        controller: &mut DragController,
        world: &mut PhysicsWorld,
        from: Vec2,
        to: Vec2,
    ) -> Vec<GestureEvent> {
        controller.press_start(world, from);
        let mut events = controller.press_move(world, to);
        // Let the spring actually carry the body over.
        for _ in 0..240 {
            events.extend(controller.press_move(world, to));
            world.step(DT);
        }
        events
    }

    #[test]
    fn test_drop_in_band_signals_status_change_only() {
        let (mut world, id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();

        // Band 0 (To Do) is the top sixth of the strip.
        let band_top = Vec2::new(800.0 - DROP_ZONE_WIDTH / 2.0, 40.0);
        let mut events = drag_to(&mut controller, &mut world, Vec2::new(400.0, 300.0), band_top);
        events.extend(controller.press_end(&mut world, band_top, 1000.0));

        assert!(events.contains(&GestureEvent::DragStarted(id)));
        assert!(events.contains(&GestureEvent::StatusDropped {
            id,
            status: TaskStatus::Todo
        }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GestureEvent::TaskMoved { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GestureEvent::TaskOpened(_))));

        // Pop feedback: the body snapped home with a kick.
        let body = world.body(id).unwrap();
        assert_eq!(body.position, Vec2::new(400.0, 300.0));
        assert!(body.velocity.length() > 0.0);
    }

    #[test]
    fn test_each_band_maps_to_its_status() {
        let band_height = 600.0 / TaskStatus::BANDS.len() as f64;
        for (k, expected) in TaskStatus::BANDS.iter().enumerate() {
            let (mut world, id) = world_with_task(400.0, 300.0);
            let mut controller = DragController::new();

            let target = Vec2::new(
                800.0 - DROP_ZONE_WIDTH / 2.0,
                band_height * (k as f64 + 0.5),
            );
            drag_to(&mut controller, &mut world, Vec2::new(400.0, 300.0), target);
            let events = controller.press_end(&mut world, target, 1000.0);

            assert_eq!(
                events,
                vec![GestureEvent::StatusDropped {
                    id,
                    status: *expected
                }]
            );
        }
    }

    #[test]
    fn test_drop_outside_zone_signals_moved() {
        let (mut world, id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();

        let target = Vec2::new(200.0, 150.0);
        drag_to(&mut controller, &mut world, Vec2::new(400.0, 300.0), target);
        let events = controller.press_end(&mut world, target, 1000.0);

        assert_eq!(events.len(), 1);
        match &events[0] {
            GestureEvent::TaskMoved { id: moved, position } => {
                assert_eq!(*moved, id);
                // The spring had time to converge near the pointer.
                assert!(position.distance(target) < 30.0);
            }
            other => panic!("expected TaskMoved, got {other:?}"),
        }
    }

    #[test]
    fn test_barrier_toggles_around_drag() {
        let (mut world, _id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();
        assert!(world.drop_zone().is_active());

        controller.press_start(&world, Vec2::new(400.0, 300.0));
        controller.press_move(&mut world, Vec2::new(420.0, 300.0));
        assert!(controller.is_dragging());
        assert!(!world.drop_zone().is_active());

        controller.press_end(&mut world, Vec2::new(420.0, 300.0), 0.0);
        assert!(world.drop_zone().is_active());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_double_click_opens_exactly_once() {
        let (mut world, id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();
        let point = Vec2::new(400.0, 300.0);

        controller.press_start(&world, point);
        let first = controller.press_end(&mut world, point, 1000.0);
        assert!(first.is_empty());

        controller.press_start(&world, Vec2::new(402.0, 301.0));
        let second = controller.press_end(&mut world, Vec2::new(402.0, 301.0), 1200.0);
        assert_eq!(second, vec![GestureEvent::TaskOpened(id)]);

        // The tracker was reset: a third click starts over.
        controller.press_start(&world, point);
        let third = controller.press_end(&mut world, point, 1300.0);
        assert!(third.is_empty());
    }

    #[test]
    fn test_slow_second_click_does_not_open() {
        let (mut world, _id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();
        let point = Vec2::new(400.0, 300.0);

        controller.press_start(&world, point);
        controller.press_end(&mut world, point, 1000.0);

        controller.press_start(&world, point);
        let events = controller.press_end(&mut world, point, 1000.0 + DOUBLE_CLICK_WINDOW_MS);
        assert!(events.is_empty());
    }

    #[test]
    fn test_double_click_on_different_bodies_does_not_open() {
        let mut world = PhysicsWorld::new(Vec2::new(800.0, 600.0));
        let mut a = Task::new_simple("a".to_string());
        a.set_position(150.0, 300.0);
        let mut b = Task::new_simple("b".to_string());
        b.set_position(600.0, 300.0);
        world.synchronize(&[a.clone(), b.clone()]);

        let mut controller = DragController::new();
        controller.press_start(&world, Vec2::new(150.0, 300.0));
        controller.press_end(&mut world, Vec2::new(150.0, 300.0), 1000.0);

        controller.press_start(&world, Vec2::new(600.0, 300.0));
        let events = controller.press_end(&mut world, Vec2::new(600.0, 300.0), 1100.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_drag_never_opens_even_when_released_at_start() {
        let (mut world, id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();
        let start = Vec2::new(400.0, 300.0);

        controller.press_start(&world, start);
        controller.press_move(&mut world, Vec2::new(450.0, 300.0));
        controller.press_move(&mut world, start); // wandered back
        let events = controller.press_end(&mut world, start, 1000.0);

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GestureEvent::TaskMoved { id: moved, .. } if moved == id));
    }

    #[test]
    fn test_click_on_empty_space_is_silent() {
        let (mut world, _id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();

        controller.press_start(&world, Vec2::new(50.0, 50.0));
        let events = controller.press_end(&mut world, Vec2::new(50.0, 50.0), 1000.0);
        assert!(events.is_empty());

        controller.press_start(&world, Vec2::new(50.0, 50.0));
        let events = controller.press_end(&mut world, Vec2::new(50.0, 50.0), 1100.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_cancel_drops_gesture_without_signals() {
        let (mut world, id) = world_with_task(400.0, 300.0);
        let mut controller = DragController::new();

        controller.press_start(&world, Vec2::new(400.0, 300.0));
        controller.press_move(&mut world, Vec2::new(500.0, 300.0));
        assert!(controller.is_dragging());

        controller.cancel(&mut world);
        assert!(!controller.is_dragging());
        assert!(world.drop_zone().is_active());
        assert!(!world.body(id).unwrap().dragging);
    }
}
