use chrono::Utc;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::task::{Task, TaskStatus};
use crate::physics::body::Body;
use crate::physics::consts::*;
use crate::physics::vec2::Vec2;
use crate::services::urgency;

/// Static axis-aligned slab. Bodies collide with these but never move them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub min: Vec2,
    pub max: Vec2,
}

impl Wall {
    fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y))
    }

    fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// The status strip along the right edge. While a drag is in progress its
/// barrier is parked far outside the arena so the dragged bubble can enter;
/// the rest of the time it keeps the cluster out of the strip.
#[derive(Debug, Clone, Copy)]
pub struct DropZone {
    origin: Vec2,
    size: Vec2,
    active: bool,
}

impl DropZone {
    fn layout(arena: Vec2) -> Self {
        Self {
            origin: Vec2::new(arena.x - DROP_ZONE_WIDTH, 0.0),
            size: Vec2::new(DROP_ZONE_WIDTH, arena.y),
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.size.x
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.size.y
    }

    /// Which status band a point falls in, top to bottom.
    pub fn band_at(&self, p: Vec2) -> Option<TaskStatus> {
        if !self.contains(p) || self.size.y <= 0.0 {
            return None;
        }
        let band_height = self.size.y / TaskStatus::BANDS.len() as f64;
        let index = ((p.y - self.origin.y) / band_height) as usize;
        TaskStatus::BANDS.get(index.min(TaskStatus::BANDS.len() - 1)).copied()
    }

    /// Band rectangle for rendering, as (min, max).
    pub fn band_rect(&self, index: usize) -> (Vec2, Vec2) {
        let band_height = self.size.y / TaskStatus::BANDS.len() as f64;
        let top = self.origin.y + band_height * index as f64;
        (
            Vec2::new(self.origin.x, top),
            Vec2::new(self.origin.x + self.size.x, top + band_height),
        )
    }

    /// The collision slab: in place when active, parked far away when not.
    fn barrier(&self) -> Wall {
        let offset = if self.active { 0.0 } else { 1.0e6 };
        Wall {
            min: Vec2::new(self.origin.x + offset, self.origin.y),
            max: Vec2::new(self.origin.x + self.size.x + offset, self.origin.y + self.size.y),
        }
    }
}

/// The simulation context: owns every body and slab, stepped once per frame
/// from the host's paint loop. No globals; drop it and the scene is gone.
pub struct PhysicsWorld {
    arena: Vec2,
    bodies: Vec<Body>,
    walls: [Wall; 4],
    drop_zone: DropZone,
    pending_sync: Option<Vec<Task>>,
    escape_recoveries: u64,
}

fn boundary_walls(arena: Vec2) -> [Wall; 4] {
    let t = WALL_THICKNESS;
    let (w, h) = (arena.x, arena.y);
    [
        // Top, bottom, left, right
        Wall { min: Vec2::new(-t, -t), max: Vec2::new(w + t, 0.0) },
        Wall { min: Vec2::new(-t, h), max: Vec2::new(w + t, h + t) },
        Wall { min: Vec2::new(-t, -t), max: Vec2::new(0.0, h + t) },
        Wall { min: Vec2::new(w, -t), max: Vec2::new(w + t, h + t) },
    ]
}

impl PhysicsWorld {
    pub fn new(arena: Vec2) -> Self {
        Self {
            arena,
            bodies: Vec::new(),
            walls: boundary_walls(arena),
            drop_zone: DropZone::layout(arena),
            pending_sync: None,
            escape_recoveries: 0,
        }
    }

    pub fn arena(&self) -> Vec2 {
        self.arena
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: Uuid) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    fn body_mut(&mut self, id: Uuid) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    /// How many times a body escaped the arena and had to be recovered.
    /// Always zero in a healthy, well-tuned scene.
    pub fn escape_recoveries(&self) -> u64 {
        self.escape_recoveries
    }

    fn has_area(&self) -> bool {
        self.arena.x > 0.0 && self.arena.y > 0.0
    }

    /// Recompute every slab from the new arena size. Body positions are left
    /// alone; the centering force herds stragglers back over the next frames.
    pub fn resize(&mut self, arena: Vec2) {
        self.arena = arena;
        self.walls = boundary_walls(arena);
        let active = self.drop_zone.active;
        self.drop_zone = DropZone::layout(arena);
        self.drop_zone.active = active;

        if self.has_area() {
            if let Some(tasks) = self.pending_sync.take() {
                self.synchronize(&tasks);
            }
        }
    }

    pub fn set_drop_zone_active(&mut self, active: bool) {
        self.drop_zone.active = active;
    }

    /// Mirror the authoritative task list into bodies. Idempotent: calling
    /// twice with the same list changes nothing. With a zero-area arena the
    /// list is remembered and applied once a real size shows up.
    pub fn synchronize(&mut self, tasks: &[Task]) {
        if !self.has_area() {
            self.pending_sync = Some(tasks.to_vec());
            return;
        }

        let now = Utc::now();
        let live: HashSet<Uuid> = tasks
            .iter()
            .filter(|t| t.in_simulation())
            .map(|t| t.id)
            .collect();

        let before = self.bodies.len();
        self.bodies.retain(|b| live.contains(&b.id));
        if self.bodies.len() != before {
            debug!(removed = before - self.bodies.len(), "removed stale bubble bodies");
        }

        let mut rng = rand::thread_rng();
        for task in tasks.iter().filter(|t| t.in_simulation()) {
            let score = urgency::calculate_urgency(task, now);
            if let Some(body) = self.body_mut(task.id) {
                body.refresh(task, score);
                continue;
            }

            let position = if task.position.is_unset() {
                let margin = urgency::bubble_radius(score);
                Vec2::new(
                    rng.gen_range(margin..(self.arena.x - margin).max(margin + 1.0)),
                    rng.gen_range(margin..(self.arena.y - margin).max(margin + 1.0)),
                )
            } else {
                Vec2::new(task.position.x, task.position.y)
            };

            let mut body = Body::new(task, position, score);
            body.velocity = Vec2::new(
                (rng.gen::<f64>() - 0.5) * 2.0 * SPAWN_KICK,
                (rng.gen::<f64>() - 0.5) * 2.0 * SPAWN_KICK,
            );
            debug!(task = %task.id, "spawned bubble body");
            self.bodies.push(body);
        }
    }

    /// Topmost body under the point, if any. Later bodies draw on top, so
    /// scan back to front.
    pub fn body_at(&self, point: Vec2) -> Option<Uuid> {
        self.bodies.iter().rev().find(|b| b.contains(point)).map(|b| b.id)
    }

    pub fn begin_drag(&mut self, id: Uuid) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.dragging = true;
                body.drag_target = None;
                true
            }
            None => false,
        }
    }

    pub fn update_drag(&mut self, id: Uuid, target: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.drag_target = Some(target);
        }
    }

    /// Stop dragging and return the body's resting position. The spring
    /// velocity from the last frames stays on, which reads as a throw.
    pub fn end_drag(&mut self, id: Uuid) -> Option<Vec2> {
        let body = self.body_mut(id)?;
        body.dragging = false;
        body.drag_target = None;
        Some(body.position)
    }

    /// Pop feedback after a status drop: snap home and fly off in a random
    /// direction instead of quietly materializing.
    pub fn teleport_and_kick(&mut self, id: Uuid) {
        let center = self.arena * 0.5;
        let mut rng = rand::thread_rng();
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let speed = rng.gen_range(POP_KICK_MIN..POP_KICK_MAX);
        if let Some(body) = self.body_mut(id) {
            body.position = center;
            body.velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
            body.pressure_points.clear();
        }
    }

    /// Advance the simulation by `dt` seconds. Velocities are in pixels per
    /// 60 Hz frame, so integration scales by `dt * 60`.
    pub fn step(&mut self, dt: f64) {
        if !self.has_area() {
            return;
        }
        if self.pending_sync.is_some() {
            if let Some(tasks) = self.pending_sync.take() {
                self.synchronize(&tasks);
            }
        }

        let frames = dt * 60.0;
        let center = self.arena * 0.5;
        let drag_keep = (1.0 - AIR_DRAG).powf(frames);
        let mut rng = rand::thread_rng();

        for body in &mut self.bodies {
            body.decay_pressure();
            body.advance_pulse(dt);

            if body.dragging {
                if let Some(target) = body.drag_target {
                    body.velocity = (target - body.position) * DRAG_STIFFNESS;
                }
            } else {
                body.velocity = body.velocity * drag_keep;
                body.velocity += (center - body.position) * (CENTER_PULL * frames);
                body.velocity += Vec2::new(
                    (rng.gen::<f64>() - 0.5) * 2.0 * DRIFT,
                    (rng.gen::<f64>() - 0.5) * 2.0 * DRIFT,
                ) * frames;
            }

            body.velocity = body.velocity.clamped_length(MAX_SPEED);
            body.position += body.velocity * frames;
        }

        self.collide_bodies();
        self.collide_walls();

        for body in &mut self.bodies {
            // Collisions may have added speed back; the cap is absolute.
            body.velocity = body.velocity.clamped_length(MAX_SPEED);
        }

        self.recover_escaped();
    }

    /// Pairwise circle collisions. The scene holds a few dozen bodies, so
    /// the O(n²) pass is cheap.
    fn collide_bodies(&mut self) {
        let count = self.bodies.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (left, right) = self.bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                let delta = b.position - a.position;
                let min_dist = a.base_radius + b.base_radius;
                let dist = delta.length();
                if dist >= min_dist || dist <= f64::EPSILON {
                    continue;
                }

                let normal = delta.normalized();
                let depth = min_dist - dist;

                // Positional split, half each.
                a.position -= normal * (depth * 0.5);
                b.position += normal * (depth * 0.5);

                // Restitution impulse along the contact normal.
                let closing = (b.velocity - a.velocity).dot(normal);
                if closing < 0.0 {
                    let impulse = -(1.0 + RESTITUTION) * closing * 0.5;
                    a.velocity -= normal * impulse;
                    b.velocity += normal * impulse;
                }

                // Leave a dent on each side, at the contact as seen from
                // that body.
                let target = depth / PRESSURE_DEPTH_SCALE;
                a.add_pressure(normal.angle(), target);
                b.add_pressure((-normal).angle(), target);
            }
        }
    }

    fn collide_walls(&mut self) {
        let mut slabs = self.walls.to_vec();
        slabs.push(self.drop_zone.barrier());

        for body in &mut self.bodies {
            for slab in &slabs {
                if slab.contains(body.position) {
                    // Deep overlap; shove toward the arena center and let
                    // the next frame sort the rest out.
                    let out = (self.arena * 0.5 - body.position).normalized();
                    body.position += out * body.base_radius;
                    body.velocity = out * body.velocity.length() * RESTITUTION;
                    continue;
                }

                let closest = slab.closest_point(body.position);
                let delta = body.position - closest;
                let dist = delta.length();
                if dist >= body.base_radius || dist <= f64::EPSILON {
                    continue;
                }

                let normal = delta.normalized();
                body.position += normal * (body.base_radius - dist);

                let along = body.velocity.dot(normal);
                if along < 0.0 {
                    body.velocity -= normal * ((1.0 + RESTITUTION) * along);
                }
            }
        }
    }

    /// Numerical blowups should never happen, but when one does the body is
    /// brought home instead of lost offscreen forever.
    fn recover_escaped(&mut self) {
        let center = self.arena * 0.5;
        let (w, h) = (self.arena.x, self.arena.y);
        for body in &mut self.bodies {
            let p = body.position;
            let escaped = p.x < -ESCAPE_BUFFER
                || p.x > w + ESCAPE_BUFFER
                || p.y < -ESCAPE_BUFFER
                || p.y > h + ESCAPE_BUFFER;
            if escaped {
                warn!(
                    task = %body.id,
                    x = p.x,
                    y = p.y,
                    "bubble escaped the arena; teleporting to center"
                );
                body.position = center;
                body.velocity = Vec2::ZERO;
                self.escape_recoveries += 1;
            }
        }
    }
}
