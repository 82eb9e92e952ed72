//! egui Painter-based scene rendering.
//!
//! Projects a [`Frame`] through the [`OrbitCamera`] and draws it back to
//! front: starfield, orbit rings, then sun, planets and moons sorted by
//! depth. Spheres are faked with layered discs lit from the sun's side.

use std::f64::consts::TAU;

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Shape, Stroke, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::layout::color::Rgba;
use crate::render::camera::OrbitCamera;
use crate::scene::{Frame, SceneState};

const BACKGROUND: Color32 = Color32::from_rgb(2, 2, 12);
const RING_SEGMENTS: usize = 96;
const STAR_RADIUS: f64 = 300.0;
const STAR_DEPTH: f64 = 50.0;
/// Pointer tolerance around a body's disc, in pixels.
const PICK_SLOP: f32 = 3.0;
/// Smallest clickable disc radius, in pixels.
const MIN_PICK_RADIUS: f32 = 5.0;

pub fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Which decorations to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_orbits: bool,
    pub show_moons: bool,
    pub show_labels: bool,
    pub show_stars: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_orbits: true,
            show_moons: true,
            show_labels: false,
            show_stars: true,
        }
    }
}

/// An on-screen disc used for hit testing. `body_id` is `None` for the
/// sun, which blocks the pointer but opens nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedBody {
    pub body_id: Option<u64>,
    pub center: Pos2,
    pub radius: f32,
    pub depth: f64,
}

/// Planet under `pointer`, if the front-most disc there is a planet.
pub fn pick(bodies: &[ProjectedBody], pointer: Pos2) -> Option<u64> {
    bodies
        .iter()
        .filter(|b| (pointer - b.center).length() <= b.radius.max(MIN_PICK_RADIUS) + PICK_SLOP)
        .min_by(|a, b| a.depth.total_cmp(&b.depth))
        .and_then(|b| b.body_id)
}

#[derive(Debug, Clone, Copy)]
struct Star {
    position: [f64; 3],
    size: f32,
    twinkle: f64,
}

/// Background stars on a thick shell around the origin.
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| {
                let z: f64 = rng.random_range(-1.0..1.0);
                let theta: f64 = rng.random_range(0.0..TAU);
                let r = STAR_RADIUS + rng.random_range(0.0..STAR_DEPTH);
                let ring = (1.0 - z * z).sqrt();
                Star {
                    position: [r * ring * theta.cos(), r * z, r * ring * theta.sin()],
                    size: rng.random_range(0.6..1.6),
                    twinkle: rng.random_range(0.0..TAU),
                }
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

enum Drawable {
    Sun,
    Planet(usize),
    Moon { position: [f64; 3], size: f64, rotation: f64 },
}

pub struct ScenePainter {
    starfield: Starfield,
}

impl ScenePainter {
    pub fn new(seed: u64) -> Self {
        Self {
            starfield: Starfield::new(seed, 1500),
        }
    }

    /// Draw one frame into `rect` and return the sun's and planets' screen
    /// discs.
    pub fn paint(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        frame: &Frame,
        scene: &SceneState,
        camera: &OrbitCamera,
        options: &ViewOptions,
    ) -> Vec<ProjectedBody> {
        let (w, h) = (rect.width() as f64, rect.height() as f64);
        let to_screen = |p: [f64; 3]| {
            camera
                .project(p, w, h)
                .map(|q| (rect.min + Vec2::new(q.x as f32, q.y as f32), q))
        };

        painter.rect_filled(rect, Rounding::ZERO, BACKGROUND);

        if options.show_stars {
            let speed = scene.speed_multiplier();
            for star in &self.starfield.stars {
                if let Some((pos, _)) = to_screen(star.position) {
                    if !rect.contains(pos) {
                        continue;
                    }
                    let glow = 0.55 + 0.45 * (frame.elapsed * speed + star.twinkle).sin();
                    painter.circle_filled(
                        pos,
                        star.size,
                        Color32::from_white_alpha((glow * 200.0) as u8),
                    );
                }
            }
        }

        if options.show_orbits {
            for body in &frame.bodies {
                let alpha = if body.hovered { 110 } else { 40 };
                let stroke = Stroke::new(1.0, color32(body.color.with_alpha(alpha)));
                let mut points = Vec::with_capacity(RING_SEGMENTS + 1);
                for i in 0..=RING_SEGMENTS {
                    let a = i as f64 / RING_SEGMENTS as f64 * TAU;
                    let p = [body.orbit_radius * a.cos(), 0.0, body.orbit_radius * a.sin()];
                    match to_screen(p) {
                        Some((pos, _)) => points.push(pos),
                        None => {
                            if points.len() > 1 {
                                painter.add(Shape::line(std::mem::take(&mut points), stroke));
                            } else {
                                points.clear();
                            }
                        }
                    }
                }
                if points.len() > 1 {
                    painter.add(Shape::line(points, stroke));
                }
            }
        }

        let mut drawables: Vec<(f64, Drawable)> = Vec::new();
        let sun = to_screen([0.0; 3]);
        if let Some((_, q)) = sun {
            drawables.push((q.depth, Drawable::Sun));
        }
        for (i, body) in frame.bodies.iter().enumerate() {
            if let Some((_, q)) = to_screen(body.position) {
                drawables.push((q.depth, Drawable::Planet(i)));
            }
            if options.show_moons {
                for moon in &body.moons {
                    if let Some((_, q)) = to_screen(moon.position) {
                        drawables.push((
                            q.depth,
                            Drawable::Moon {
                                position: moon.position,
                                size: moon.size,
                                rotation: moon.rotation,
                            },
                        ));
                    }
                }
            }
        }
        drawables.sort_by(|a, b| b.0.total_cmp(&a.0));

        let sun_pos = sun.map(|(p, _)| p);
        let mut projected = Vec::with_capacity(frame.bodies.len() + 1);

        for (_, drawable) in &drawables {
            match *drawable {
                Drawable::Sun => {
                    let Some((center, q)) = sun else { continue };
                    let r = (frame.sun.radius * q.scale) as f32;
                    for (k, alpha) in [(2.2, 14), (1.6, 30), (1.25, 60)] {
                        painter.circle_filled(center, r * k, color32(Rgba::ORANGE.with_alpha(alpha)));
                    }
                    paint_sphere(painter, center, r, Rgba::GOLD, None, frame.sun.rotation, true);
                    projected.push(ProjectedBody {
                        body_id: None,
                        center,
                        radius: r,
                        depth: q.depth,
                    });
                }
                Drawable::Planet(i) => {
                    let body = &frame.bodies[i];
                    let Some((center, q)) = to_screen(body.position) else { continue };
                    let r = ((body.radius * body.scale * q.scale) as f32).max(1.5);
                    let light = sun_pos.map(|s| s - center);
                    let base = if body.hovered {
                        body.color.mix(Rgba::WHITE, 0.2)
                    } else {
                        body.color
                    };
                    paint_sphere(painter, center, r, base, light, body.rotation, false);
                    if body.hovered {
                        painter.circle_stroke(
                            center,
                            r + 3.0,
                            Stroke::new(1.5, Color32::from_white_alpha(160)),
                        );
                    }
                    if options.show_labels || body.hovered {
                        if let Some(desc) = scene.descriptor(body.body_id) {
                            painter.text(
                                center + Vec2::new(0.0, r + 4.0),
                                Align2::CENTER_TOP,
                                &desc.repo.name,
                                FontId::proportional(11.0),
                                Color32::from_gray(220),
                            );
                        }
                    }
                    projected.push(ProjectedBody {
                        body_id: Some(body.body_id),
                        center,
                        radius: r,
                        depth: q.depth,
                    });
                }
                Drawable::Moon { position, size, rotation } => {
                    let Some((center, q)) = to_screen(position) else { continue };
                    let r = ((size * q.scale) as f32).max(1.0);
                    let light = sun_pos.map(|s| s - center);
                    paint_sphere(painter, center, r, Rgba::MOON_GRAY, light, rotation, false);
                }
            }
        }

        projected
    }
}

/// Layered-disc sphere. `light` points toward the light source on screen;
/// `None` with `emissive` draws a self-lit body.
fn paint_sphere(
    painter: &egui::Painter,
    center: Pos2,
    r: f32,
    base: Rgba,
    light: Option<Vec2>,
    rotation: f64,
    emissive: bool,
) {
    let dir = light
        .filter(|v| v.length() > f32::EPSILON)
        .map(|v| v.normalized())
        .unwrap_or(Vec2::new(-0.5, -0.7).normalized());

    if emissive {
        painter.circle_filled(center, r, color32(base));
        painter.circle_filled(center + dir * r * 0.3, r * 0.5, color32(base.mix(Rgba::WHITE, 0.4)));
    } else {
        painter.circle_filled(center, r, color32(base.shade(0.4)));
        painter.circle_filled(center + dir * r * 0.2, r * 0.78, color32(base));
        painter.circle_filled(center + dir * r * 0.4, r * 0.25, color32(base.mix(Rgba::WHITE, 0.35)));
    }

    // Surface mark sweeping across the front face shows self-rotation.
    if r >= 4.0 {
        let front = rotation.sin();
        if front > 0.0 {
            let mark = center + Vec2::new((rotation.cos() as f32) * r * 0.55, -r * 0.15);
            let alpha = (front * 90.0) as u8;
            painter.circle_filled(mark, r * 0.18, color32(base.shade(0.6).with_alpha(alpha)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(id: u64, x: f32, y: f32, r: f32, depth: f64) -> ProjectedBody {
        ProjectedBody {
            body_id: Some(id),
            center: Pos2::new(x, y),
            radius: r,
            depth,
        }
    }

    #[test]
    fn pick_hits_disc() {
        let bodies = [disc(1, 100.0, 100.0, 10.0, 20.0)];
        assert_eq!(pick(&bodies, Pos2::new(105.0, 104.0)), Some(1));
        assert_eq!(pick(&bodies, Pos2::new(130.0, 100.0)), None);
    }

    #[test]
    fn pick_prefers_nearest() {
        let bodies = [
            disc(1, 100.0, 100.0, 20.0, 30.0),
            disc(2, 104.0, 100.0, 8.0, 12.0),
            disc(3, 98.0, 100.0, 30.0, 45.0),
        ];
        assert_eq!(pick(&bodies, Pos2::new(102.0, 100.0)), Some(2));
    }

    #[test]
    fn sun_blocks_planets_behind_it() {
        let cam = OrbitCamera::new(crate::config::CameraConfig::default());
        let sun_at = cam.project([0.0; 3], 800.0, 600.0).unwrap();
        let planet_at = cam.project([0.0, -3.0, -4.0], 800.0, 600.0).unwrap();
        assert!(planet_at.depth > sun_at.depth);

        let centre = Pos2::new(sun_at.x as f32, sun_at.y as f32);
        let sun = ProjectedBody {
            body_id: None,
            center: centre,
            radius: (1.5 * sun_at.scale) as f32,
            depth: sun_at.depth,
        };
        let hidden = ProjectedBody {
            body_id: Some(77),
            center: Pos2::new(planet_at.x as f32, planet_at.y as f32),
            radius: (0.3 * planet_at.scale) as f32,
            depth: planet_at.depth,
        };
        assert_eq!(pick(&[hidden], centre), Some(77));
        assert_eq!(pick(&[sun, hidden], centre), None);
        assert_eq!(pick(&[hidden, sun], centre), None);
    }

    #[test]
    fn planets_in_front_of_the_sun_win() {
        let sun = ProjectedBody {
            body_id: None,
            center: Pos2::new(100.0, 100.0),
            radius: 30.0,
            depth: 25.0,
        };
        let front = disc(5, 110.0, 100.0, 6.0, 18.0);
        assert_eq!(pick(&[sun, front], Pos2::new(110.0, 100.0)), Some(5));
        assert_eq!(pick(&[sun, front], Pos2::new(80.0, 100.0)), None);
    }

    #[test]
    fn tiny_bodies_stay_clickable() {
        let bodies = [disc(9, 50.0, 50.0, 0.5, 40.0)];
        assert_eq!(pick(&bodies, Pos2::new(56.0, 50.0)), Some(9));
    }

    #[test]
    fn pick_on_empty_scene() {
        assert_eq!(pick(&[], Pos2::new(0.0, 0.0)), None);
    }

    #[test]
    fn starfield_is_seeded() {
        let a = Starfield::new(42, 200);
        let b = Starfield::new(42, 200);
        assert_eq!(a.len(), 200);
        for (x, y) in a.stars.iter().zip(&b.stars) {
            assert_eq!(x.position, y.position);
        }
        for s in &a.stars {
            let r = s.position.iter().map(|c| c * c).sum::<f64>().sqrt();
            assert!((STAR_RADIUS - 1e-6..=STAR_RADIUS + STAR_DEPTH + 1e-6).contains(&r));
        }
    }

    #[test]
    fn color_conversion_keeps_alpha() {
        let c = color32(Rgba::GOLD.with_alpha(255));
        assert_eq!(c, Color32::from_rgb(255, 215, 0));
    }
}
