use ordered_float::OrderedFloat;
use uuid::Uuid;

use crate::domain::task::{Priority, Task, TaskStatus};
use crate::physics::consts::*;
use crate::physics::vec2::Vec2;
use crate::services::urgency;

/// Display fields cached on the body so the renderer never goes back to the
/// task list mid-frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub title: String,
    pub category: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub urgency: u32,
}

impl TaskSnapshot {
    pub fn of(task: &Task, urgency: u32) -> Self {
        Self {
            title: task.title.clone(),
            category: task.category.clone(),
            priority: task.priority,
            status: task.status,
            urgency,
        }
    }
}

/// Transient dent in a body's outline, left behind by a collision.
///
/// `intensity` chases `target_intensity` each frame; the target is zeroed
/// after every step so a dent only survives while contacts keep refreshing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressurePoint {
    pub angle: f64,
    pub intensity: f64,
    pub target_intensity: f64,
}

/// One floating task bubble.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: Uuid,
    pub position: Vec2,
    pub velocity: Vec2,
    pub base_radius: f64,
    pub pulse_phase: f64,
    pub pressure_points: Vec<PressurePoint>,
    pub dragging: bool,
    pub drag_target: Option<Vec2>,
    pub snapshot: TaskSnapshot,
}

/// Shortest angular distance between two angles, wrapped into [0, pi].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let mut d = (a - b).rem_euclid(std::f64::consts::TAU);
    if d > std::f64::consts::PI {
        d = std::f64::consts::TAU - d;
    }
    d
}

impl Body {
    pub fn new(task: &Task, position: Vec2, score: u32) -> Self {
        Self {
            id: task.id,
            position,
            velocity: Vec2::ZERO,
            base_radius: urgency::bubble_radius(score),
            pulse_phase: 0.0,
            pressure_points: Vec::new(),
            dragging: false,
            drag_target: None,
            snapshot: TaskSnapshot::of(task, score),
        }
    }

    /// Refresh cached task data without touching physical state.
    pub fn refresh(&mut self, task: &Task, score: u32) {
        self.base_radius = urgency::bubble_radius(score);
        self.snapshot = TaskSnapshot::of(task, score);
    }

    /// Current radius including the idle pulse.
    pub fn pulsed_radius(&self) -> f64 {
        let amplitude = urgency::pulse_amplitude(self.snapshot.urgency);
        self.base_radius * (1.0 + amplitude * self.pulse_phase.sin())
    }

    pub fn advance_pulse(&mut self, dt: f64) {
        self.pulse_phase += dt * urgency::pulse_rate(self.snapshot.urgency);
        if self.pulse_phase > std::f64::consts::TAU {
            self.pulse_phase -= std::f64::consts::TAU;
        }
    }

    /// Register a contact at `angle` (the contact normal as seen from this
    /// body). A nearby existing dent is deepened instead of duplicated.
    pub fn add_pressure(&mut self, angle: f64, target: f64) {
        let target = target.clamp(0.0, PRESSURE_CAP);

        if let Some(point) = self
            .pressure_points
            .iter_mut()
            .find(|p| angular_distance(p.angle, angle) < PRESSURE_ANGULAR_TOLERANCE)
        {
            point.target_intensity = point.target_intensity.max(target);
            return;
        }

        self.pressure_points.push(PressurePoint {
            angle,
            intensity: 0.0,
            target_intensity: target,
        });

        if self.pressure_points.len() > MAX_PRESSURE_POINTS {
            let faintest = self
                .pressure_points
                .iter()
                .enumerate()
                .min_by_key(|(_, p)| OrderedFloat(p.intensity))
                .map(|(i, _)| i);
            if let Some(i) = faintest {
                self.pressure_points.remove(i);
            }
        }
    }

    /// One frame of dent dynamics: chase the target (fast up, slow down),
    /// then zero the target so un-refreshed dents relax away.
    pub fn decay_pressure(&mut self) {
        for point in &mut self.pressure_points {
            let delta = point.target_intensity - point.intensity;
            let smoothing = if delta > 0.0 {
                PRESSURE_RISE
            } else {
                PRESSURE_DECAY
            };
            point.intensity += delta * smoothing;
            point.target_intensity = 0.0;
        }
        self.pressure_points
            .retain(|p| p.intensity > PRESSURE_MIN_INTENSITY);
    }

    /// Visual outline radius at `angle`: the pulsing radius minus the
    /// Gaussian-weighted dents. Each dent is capped so no single contact
    /// can push the outline more than 15% of the base radius inward.
    pub fn outline_radius(&self, angle: f64) -> f64 {
        let mut radius = self.pulsed_radius();
        for point in &self.pressure_points {
            let d = angular_distance(angle, point.angle) / PRESSURE_SIGMA;
            let dent = point.intensity.min(PRESSURE_CAP) * self.base_radius * (-d * d).exp();
            radius -= dent;
        }
        radius
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.pulsed_radius()
    }
}
