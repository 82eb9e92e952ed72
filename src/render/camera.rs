//! Orbit camera around the central body.
//!
//! Spherical coordinates (azimuth around +Y, polar angle from +Y, distance)
//! about a movable target, plus a pinhole projection into a viewport.

use crate::config::CameraConfig;

const ROTATE_SPEED: f64 = 0.008;
const ZOOM_SPEED: f64 = 0.003;
const PAN_SPEED: f64 = 0.0015;
/// Keeps the view basis defined when looking straight down.
const MIN_POLAR: f64 = 0.01;
const NEAR: f64 = 0.1;

type Vec3 = [f64; 3];

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: Vec3) -> Vec3 {
    let len = dot(v, v).sqrt();
    if len == 0.0 {
        v
    } else {
        [v[0] / len, v[1] / len, v[2] / len]
    }
}

/// A world point mapped into viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Pixels from the viewport's left edge.
    pub x: f64,
    /// Pixels from the viewport's top edge.
    pub y: f64,
    /// Distance along the view axis; larger is farther.
    pub depth: f64,
    /// Pixels per world unit at this depth.
    pub scale: f64,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    azimuth: f64,
    polar: f64,
    distance: f64,
    target: Vec3,
    config: CameraConfig,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        let eye = config.initial_eye;
        let distance = dot(eye, eye).sqrt().max(f64::EPSILON);
        Self {
            azimuth: eye[0].atan2(eye[2]),
            polar: (eye[1] / distance).clamp(-1.0, 1.0).acos(),
            distance,
            target: [0.0; 3],
            config,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn polar(&self) -> f64 {
        self.polar
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Drag rotation, in pointer pixels.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.azimuth -= dx * ROTATE_SPEED;
        self.polar = (self.polar - dy * ROTATE_SPEED)
            .clamp(MIN_POLAR, self.config.max_polar_angle);
    }

    /// Scroll zoom; positive moves closer.
    pub fn zoom(&mut self, scroll: f64) {
        let factor = (1.0 - scroll * ZOOM_SPEED).clamp(0.5, 1.5);
        self.distance = (self.distance * factor)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Slide the target across the screen plane, in pointer pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (_, right, up) = self.basis();
        let k = self.distance * PAN_SPEED;
        for i in 0..3 {
            self.target[i] += -right[i] * dx * k + up[i] * dy * k;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn eye(&self) -> Vec3 {
        let s = self.polar.sin();
        [
            self.target[0] + self.distance * s * self.azimuth.sin(),
            self.target[1] + self.distance * self.polar.cos(),
            self.target[2] + self.distance * s * self.azimuth.cos(),
        ]
    }

    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = normalize(sub(self.target, self.eye()));
        let right = normalize(cross(forward, [0.0, 1.0, 0.0]));
        let up = cross(right, forward);
        (forward, right, up)
    }

    /// Project a world point into a `width` x `height` viewport. `None` when
    /// the point is behind the near plane.
    pub fn project(&self, point: Vec3, width: f64, height: f64) -> Option<Projected> {
        let (forward, right, up) = self.basis();
        let v = sub(point, self.eye());
        let depth = dot(v, forward);
        if depth <= NEAR {
            return None;
        }
        let focal = (height * 0.5) / (self.config.fov_y * 0.5).tan();
        let scale = focal / depth;
        Some(Projected {
            x: width * 0.5 + dot(v, right) * scale,
            y: height * 0.5 - dot(v, up) * scale,
            depth,
            scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-9)
    }

    #[test]
    fn starts_at_configured_eye() {
        let cam = OrbitCamera::new(CameraConfig::default());
        assert!(close(cam.eye(), [0.0, 15.0, 20.0]));
        assert!((cam.distance() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn target_projects_to_centre() {
        let cam = OrbitCamera::new(CameraConfig::default());
        let p = cam.project([0.0; 3], 800.0, 600.0).unwrap();
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
        assert!((p.depth - 25.0).abs() < 1e-9);
    }

    #[test]
    fn nearer_points_are_larger() {
        let cam = OrbitCamera::new(CameraConfig::default());
        let near = cam.project([0.0, 0.0, 10.0], 800.0, 600.0).unwrap();
        let far = cam.project([0.0, 0.0, -10.0], 800.0, 600.0).unwrap();
        assert!(near.scale > far.scale);
        assert!(near.depth < far.depth);
        // +Z is toward the eye, which sits above the plane: lower on screen.
        assert!(near.y > far.y);
    }

    #[test]
    fn points_behind_are_culled() {
        let cam = OrbitCamera::new(CameraConfig::default());
        assert!(cam.project([0.0, 30.0, 40.0], 800.0, 600.0).is_none());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = OrbitCamera::new(CameraConfig::default());
        for _ in 0..200 {
            cam.zoom(100.0);
        }
        assert_eq!(cam.distance(), 5.0);
        for _ in 0..200 {
            cam.zoom(-100.0);
        }
        assert_eq!(cam.distance(), 50.0);
    }

    #[test]
    fn polar_never_passes_limit() {
        let config = CameraConfig::default();
        let mut cam = OrbitCamera::new(config);
        cam.rotate(0.0, -10_000.0);
        assert_eq!(cam.polar(), config.max_polar_angle);
        cam.rotate(0.0, 10_000.0);
        assert_eq!(cam.polar(), MIN_POLAR);
        assert!(cam.eye().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn pan_moves_eye_and_target_together() {
        let mut cam = OrbitCamera::new(CameraConfig::default());
        let before = sub(cam.eye(), cam.target());
        cam.pan(120.0, -40.0);
        assert!(cam.target() != [0.0; 3]);
        assert!(close(sub(cam.eye(), cam.target()), before));
    }

    #[test]
    fn reset_restores_pose() {
        let mut cam = OrbitCamera::new(CameraConfig::default());
        cam.rotate(300.0, 50.0);
        cam.zoom(40.0);
        cam.pan(10.0, 10.0);
        cam.reset();
        assert!(close(cam.eye(), [0.0, 15.0, 20.0]));
        assert_eq!(cam.target(), [0.0; 3]);
    }
}
