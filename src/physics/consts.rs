//! Tuning constants for the bubble simulation.
//!
//! These were arrived at by feel, not derivation. Changing any of them
//! changes how the scene moves; the tests pin the load-bearing ones.

/// Hard cap on body speed, in pixels per 60 Hz frame. Keeps fast bodies
/// from tunneling through the walls.
pub const MAX_SPEED: f64 = 15.0;

/// Wall slabs must be thicker than the farthest a capped body can travel
/// in one frame.
pub const WALL_THICKNESS: f64 = 60.0;

/// Width of the status drop zone strip along the right edge.
pub const DROP_ZONE_WIDTH: f64 = 96.0;

/// How far outside the walls a body must be before we call it escaped
/// and teleport it home.
pub const ESCAPE_BUFFER: f64 = 150.0;

/// Fraction of velocity lost per frame to air drag.
pub const AIR_DRAG: f64 = 0.005;

/// Bounciness of body-body and body-wall contacts.
pub const RESTITUTION: f64 = 0.9;

/// Pull toward the arena center, per pixel of displacement per frame.
pub const CENTER_PULL: f64 = 0.0006;

/// Random per-frame velocity jitter so the scene never goes fully still.
pub const DRIFT: f64 = 0.05;

/// Initial velocity kick for newly placed bodies, per axis.
pub const SPAWN_KICK: f64 = 1.0;

/// Spring stiffness pulling a dragged body toward the pointer.
pub const DRAG_STIFFNESS: f64 = 0.2;

/// Velocity impulse range for the post-drop teleport "pop".
pub const POP_KICK_MIN: f64 = 4.0;
pub const POP_KICK_MAX: f64 = 7.0;

// Pressure points -----------------------------------------------------------

/// Ceiling on a single pressure point's intensity.
pub const PRESSURE_CAP: f64 = 0.15;

/// Penetration depth (px) that saturates a pressure point.
pub const PRESSURE_DEPTH_SCALE: f64 = 20.0;

/// Two contacts closer than this (radians) merge into one pressure point.
pub const PRESSURE_ANGULAR_TOLERANCE: f64 = 0.35;

/// Gaussian falloff width of a dent around its contact angle, in radians.
pub const PRESSURE_SIGMA: f64 = 0.35;

/// Smoothing factors toward the target intensity: dents form fast and
/// relax slowly, which is what makes them read as viscous.
pub const PRESSURE_RISE: f64 = 0.5;
pub const PRESSURE_DECAY: f64 = 0.08;

/// Pressure points fading below this are dropped.
pub const PRESSURE_MIN_INTENSITY: f64 = 0.004;

/// At most this many live pressure points per body; the faintest one is
/// pruned first.
pub const MAX_PRESSURE_POINTS: usize = 5;

/// Number of outline samples when rendering a body.
pub const OUTLINE_SAMPLES: usize = 32;
