//! Orbital kinematics.
//!
//! Circular motion in the horizontal (x, z) plane as a pure function of
//! elapsed time and the global speed multiplier. Nothing here keeps state,
//! so any instant can be evaluated directly (seeking, pausing and tests all
//! just pass a different `t`).
//!
//! The multiplier is not clamped here: any positive value is tolerated.

use std::f64::consts::TAU;

use crate::layout::{OrbitDescriptor, SatelliteDescriptor};

/// Self-rotation per frame at 1x speed, in radians.
pub const PLANET_SPIN: f64 = 0.01;
pub const MOON_SPIN: f64 = 0.01;
pub const SUN_SPIN: f64 = 0.002;

/// Anything that moves on a circle.
pub trait Orbit {
    fn orbit_radius(&self) -> f64;
    fn angular_speed(&self) -> f64;
    fn phase(&self) -> f64;
}

impl Orbit for OrbitDescriptor {
    fn orbit_radius(&self) -> f64 {
        self.derived.orbit_radius
    }
    fn angular_speed(&self) -> f64 {
        self.session.angular_speed
    }
    fn phase(&self) -> f64 {
        self.session.phase
    }
}

impl Orbit for SatelliteDescriptor {
    fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }
    fn angular_speed(&self) -> f64 {
        self.angular_speed
    }
    fn phase(&self) -> f64 {
        self.phase
    }
}

/// `phase + t * angular_speed * speed`
#[inline]
pub fn angle<O: Orbit + ?Sized>(orbit: &O, elapsed: f64, speed: f64) -> f64 {
    orbit.phase() + elapsed * orbit.angular_speed() * speed
}

/// Planar offset `(x, z)` from the orbit centre.
#[inline]
pub fn position<O: Orbit + ?Sized>(orbit: &O, elapsed: f64, speed: f64) -> (f64, f64) {
    let a = angle(orbit, elapsed, speed);
    let r = orbit.orbit_radius();
    (r * a.cos(), r * a.sin())
}

/// Primary body position in world space; y stays on the orbital plane.
#[inline]
pub fn world_position<O: Orbit + ?Sized>(orbit: &O, elapsed: f64, speed: f64) -> [f64; 3] {
    let (x, z) = position(orbit, elapsed, speed);
    [x, 0.0, z]
}

/// Moon position: the parent's current position plus the moon's own
/// circular offset. Moons never orbit the origin directly.
#[inline]
pub fn satellite_position(
    parent: [f64; 3],
    moon: &SatelliteDescriptor,
    elapsed: f64,
    speed: f64,
) -> [f64; 3] {
    let (dx, dz) = position(moon, elapsed, speed);
    [parent[0] + dx, parent[1], parent[2] + dz]
}

/// Per-frame self-rotation increment. Callers accumulate it.
#[inline]
pub fn rotation_delta(spin: f64, speed: f64) -> f64 {
    spin * speed
}

/// Time for one full revolution, or `None` for a stationary body.
pub fn period<O: Orbit + ?Sized>(orbit: &O, speed: f64) -> Option<f64> {
    let omega = orbit.angular_speed() * speed;
    if omega == 0.0 || !omega.is_finite() {
        None
    } else {
        Some(TAU / omega.abs())
    }
}
