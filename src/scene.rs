//! Live scene state and the per-frame update.
//!
//! A `SceneState` owns one session's descriptors. It is built once from a
//! [`Layout`] and never patched: a new fetch builds a new state and the old
//! one is dropped whole. Each frame the render loop calls
//! [`SceneState::advance`] with the elapsed session time and copies the
//! returned transforms into its own drawing code.

use std::collections::HashSet;

use crate::config::SpeedConfig;
use crate::kinematics::{self, MOON_SPIN, PLANET_SPIN, SUN_SPIN};
use crate::layout::color::Rgba;
use crate::layout::{CentralBody, Layout, OrbitDescriptor, SatelliteDescriptor};

/// Target scale of a hovered planet.
pub const HOVER_SCALE: f64 = 1.3;
/// Fraction of the remaining distance to the target scale covered per frame.
pub const SCALE_EASING: f64 = 0.1;

/// Pointer state of one body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Hovered,
}

#[derive(Debug, Clone, Copy)]
struct BodyAnim {
    scale: f64,
    spin: f64,
    moon_spin: f64,
}

impl Default for BodyAnim {
    fn default() -> Self {
        Self {
            scale: 1.0,
            spin: 0.0,
            moon_spin: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunFrame {
    pub radius: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonFrame {
    pub position: [f64; 3],
    pub size: f64,
    pub rotation: f64,
}

/// Everything needed to draw one planet this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFrame {
    pub body_id: u64,
    /// Index into [`SceneState::descriptors`].
    pub index: usize,
    pub position: [f64; 3],
    pub orbit_radius: f64,
    pub radius: f64,
    pub scale: f64,
    pub rotation: f64,
    pub color: Rgba,
    pub hovered: bool,
    pub moons: Vec<MoonFrame>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub elapsed: f64,
    pub sun: SunFrame,
    pub bodies: Vec<BodyFrame>,
    /// Bodies left out this frame because their descriptor is malformed.
    pub skipped: usize,
}

/// Counts for overlays (legend, stats panel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    pub planets: usize,
    pub moons: usize,
    pub total_stars: u64,
    pub open_issues: u64,
    /// Repositories not shown because of the body cap.
    pub dropped: usize,
}

pub struct SceneState {
    central: CentralBody,
    bodies: Vec<OrbitDescriptor>,
    moons: Vec<Vec<SatelliteDescriptor>>,
    colors: Vec<Rgba>,
    anim: Vec<BodyAnim>,
    sun_spin: f64,
    speed: f64,
    hovered: Option<u64>,
    dropped: usize,
    reported: HashSet<u64>,
}

impl SceneState {
    pub fn new(layout: Layout, speed: f64) -> Self {
        let moons = layout.bodies.iter().map(|b| b.satellites()).collect();
        let colors = layout.bodies.iter().map(|b| b.color().to_rgba()).collect();
        let anim = vec![BodyAnim::default(); layout.bodies.len()];
        let speed = if speed.is_finite() && speed > 0.0 { speed } else { 1.0 };
        Self {
            central: layout.central,
            bodies: layout.bodies,
            moons,
            colors,
            anim,
            sun_spin: 0.0,
            speed,
            hovered: None,
            dropped: layout.dropped,
            reported: HashSet::new(),
        }
    }

    pub fn central(&self) -> &CentralBody {
        &self.central
    }

    /// Read-only snapshot of the session's descriptors, in rank order.
    pub fn descriptors(&self) -> &[OrbitDescriptor] {
        &self.bodies
    }

    pub fn descriptor(&self, body_id: u64) -> Option<&OrbitDescriptor> {
        self.bodies.iter().find(|b| b.body_id == body_id)
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed
    }

    /// Set the global speed multiplier.
    ///
    /// The presentation layer clamps to its slider range; here only values
    /// the kinematics cannot use (non-finite, zero, negative) are rejected,
    /// leaving the previous value in place. Returns whether it was applied.
    pub fn set_speed_multiplier(&mut self, speed: f64) -> bool {
        if !speed.is_finite() || speed <= 0.0 {
            log::warn!("Ignoring speed multiplier {}", speed);
            return false;
        }
        self.speed = speed;
        true
    }

    /// Pointer entered a body. Unknown ids are ignored.
    pub fn pointer_enter(&mut self, body_id: u64) -> bool {
        if self.descriptor(body_id).is_none() {
            return false;
        }
        self.hovered = Some(body_id);
        true
    }

    /// Pointer left whatever it was over.
    pub fn pointer_leave(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<u64> {
        self.hovered
    }

    pub fn hover_state(&self, body_id: u64) -> HoverState {
        if self.hovered == Some(body_id) {
            HoverState::Hovered
        } else {
            HoverState::Idle
        }
    }

    /// Confirmed click on a body: the URL to open, if the body exists.
    pub fn click(&self, body_id: u64) -> Option<&str> {
        self.descriptor(body_id).map(|b| b.repo.html_url.as_str())
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            planets: self.bodies.len(),
            moons: self.moons.iter().map(Vec::len).sum(),
            total_stars: self.bodies.iter().map(|b| b.repo.stargazers_count).sum(),
            open_issues: self.bodies.iter().map(|b| b.repo.open_issues_count).sum(),
            dropped: self.dropped,
        }
    }

    /// Advance one rendered frame.
    ///
    /// Positions are a pure function of `elapsed` and the current speed.
    /// Spin and hover scale accumulate per call, so they progress once per
    /// frame. A malformed descriptor is skipped, never propagated.
    pub fn advance(&mut self, elapsed: f64) -> Frame {
        let speed = self.speed;
        self.sun_spin += kinematics::rotation_delta(SUN_SPIN, speed);

        let mut bodies = Vec::with_capacity(self.bodies.len());
        let mut skipped = 0;

        for (index, desc) in self.bodies.iter().enumerate() {
            let position = kinematics::world_position(desc, elapsed, speed);
            if !desc.is_well_formed() || !position.iter().all(|c| c.is_finite()) {
                skipped += 1;
                if self.reported.insert(desc.body_id) {
                    log::warn!(
                        "Skipping malformed body {} ({}): orbit {} size {}",
                        desc.body_id,
                        desc.repo.name,
                        desc.orbit_radius(),
                        desc.body_radius()
                    );
                }
                continue;
            }

            let hovered = self.hovered == Some(desc.body_id);
            let anim = &mut self.anim[index];
            let target = if hovered { HOVER_SCALE } else { 1.0 };
            anim.scale += (target - anim.scale) * SCALE_EASING;
            anim.spin += kinematics::rotation_delta(PLANET_SPIN, speed);
            anim.moon_spin += kinematics::rotation_delta(MOON_SPIN, speed);

            let moons = self.moons[index]
                .iter()
                .map(|moon| MoonFrame {
                    position: kinematics::satellite_position(position, moon, elapsed, speed),
                    size: moon.size,
                    rotation: anim.moon_spin,
                })
                .filter(|m| m.position.iter().all(|c| c.is_finite()))
                .collect();

            bodies.push(BodyFrame {
                body_id: desc.body_id,
                index,
                position,
                orbit_radius: desc.orbit_radius(),
                radius: desc.body_radius(),
                scale: anim.scale,
                rotation: anim.spin,
                color: self.colors[index],
                hovered,
                moons,
            });
        }

        Frame {
            elapsed,
            sun: SunFrame {
                radius: self.central.radius,
                rotation: self.sun_spin,
            },
            bodies,
            skipped,
        }
    }
}

/// Clamp a requested speed into the configured slider range.
pub fn clamp_speed(value: f64, range: &SpeedConfig) -> f64 {
    if value.is_nan() {
        return range.default;
    }
    value.clamp(range.min, range.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::model::{RepositoryRecord, UserRecord};
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn user() -> UserRecord {
        UserRecord {
            id: 1,
            login: "octocat".into(),
            name: None,
            avatar_url: String::new(),
            followers: 100,
            public_repos: 3,
            bio: None,
        }
    }

    fn repo(id: u64, stars: u64, issues: u64) -> RepositoryRecord {
        RepositoryRecord {
            id,
            name: format!("repo-{}", id),
            description: None,
            html_url: format!("https://github.com/octocat/repo-{}", id),
            stargazers_count: stars,
            forks_count: 0,
            open_issues_count: issues,
            language: None,
            updated_at: None,
        }
    }

    fn scene(repos: &[RepositoryRecord]) -> SceneState {
        let layout = layout(&user(), repos, &mut ChaChaRng::seed_from_u64(11));
        SceneState::new(layout, 1.0)
    }

    #[test]
    fn empty_scene_has_only_a_sun() {
        let mut s = scene(&[]);
        let frame = s.advance(1.0);
        assert!(frame.bodies.is_empty());
        assert_eq!(frame.skipped, 0);
        assert!(frame.sun.radius >= 1.5);
        assert!(frame.sun.rotation > 0.0);
    }

    #[test]
    fn positions_match_kinematics() {
        let mut s = scene(&[repo(1, 10, 2), repo(2, 5, 0)]);
        s.set_speed_multiplier(2.0);
        let frame = s.advance(3.5);
        for body in &frame.bodies {
            let desc = &s.descriptors()[body.index];
            let expected = kinematics::world_position(desc, 3.5, 2.0);
            assert_eq!(body.position, expected);
            assert_eq!(body.moons.len(), desc.satellite_count());
        }
    }

    #[test]
    fn moons_stay_near_their_planet() {
        let mut s = scene(&[repo(1, 1000, 5)]);
        let frame = s.advance(12.0);
        let planet = &frame.bodies[0];
        for moon in &planet.moons {
            let dx = moon.position[0] - planet.position[0];
            let dz = moon.position[2] - planet.position[2];
            let d = (dx * dx + dz * dz).sqrt();
            assert!(d > planet.radius && d < planet.radius * 1.8 + 1.3);
        }
    }

    #[test]
    fn hover_eases_toward_target_and_back() {
        let mut s = scene(&[repo(1, 10, 0)]);
        assert!(s.pointer_enter(1));
        assert_eq!(s.hover_state(1), HoverState::Hovered);

        let first = s.advance(0.0).bodies[0].scale;
        assert!((first - 1.03).abs() < 1e-12, "eases, does not snap");
        let mut scale = first;
        for _ in 0..200 {
            scale = s.advance(0.0).bodies[0].scale;
        }
        assert!((scale - HOVER_SCALE).abs() < 1e-6);

        s.pointer_leave();
        assert_eq!(s.hover_state(1), HoverState::Idle);
        let shrinking = s.advance(0.0).bodies[0].scale;
        assert!(shrinking < scale && shrinking > 1.0);
    }

    #[test]
    fn unknown_body_is_not_hoverable_or_clickable() {
        let mut s = scene(&[repo(1, 10, 0)]);
        assert!(!s.pointer_enter(999));
        assert_eq!(s.hovered(), None);
        assert_eq!(s.click(999), None);
        assert_eq!(s.click(1), Some("https://github.com/octocat/repo-1"));
    }

    #[test]
    fn malformed_body_is_skipped_not_fatal() {
        let mut layout = layout(
            &user(),
            &[repo(1, 10, 0), repo(2, 5, 3), repo(3, 1, 2)],
            &mut ChaChaRng::seed_from_u64(3),
        );
        layout.bodies[0].derived.orbit_radius = -4.0;
        layout.bodies[1].session.phase = f64::NAN;

        let mut s = SceneState::new(layout, 1.0);
        for t in [0.0, 1.0, 2.0] {
            let frame = s.advance(t);
            assert_eq!(frame.skipped, 2);
            assert_eq!(frame.bodies.len(), 1);
            assert_eq!(frame.bodies[0].body_id, 3);
            assert_eq!(frame.bodies[0].moons.len(), 2);
        }
    }

    #[test]
    fn spin_accumulates_with_speed() {
        let mut s = scene(&[repo(1, 10, 0)]);
        s.advance(0.0);
        s.set_speed_multiplier(5.0);
        let frame = s.advance(0.0);
        assert!((frame.bodies[0].rotation - 0.06).abs() < 1e-12);
    }

    #[test]
    fn invalid_speed_is_rejected() {
        let mut s = scene(&[]);
        assert!(!s.set_speed_multiplier(0.0));
        assert!(!s.set_speed_multiplier(-1.0));
        assert!(!s.set_speed_multiplier(f64::INFINITY));
        assert_eq!(s.speed_multiplier(), 1.0);
        assert!(s.set_speed_multiplier(12.0));
        assert_eq!(s.speed_multiplier(), 12.0);
    }

    #[test]
    fn clamp_speed_to_slider_range() {
        let range = SpeedConfig::default();
        assert_eq!(clamp_speed(0.0, &range), 0.1);
        assert_eq!(clamp_speed(9.0, &range), 5.0);
        assert_eq!(clamp_speed(2.5, &range), 2.5);
        assert_eq!(clamp_speed(f64::NAN, &range), 1.0);
    }

    #[test]
    fn stats_count_displayed_bodies() {
        let s = scene(&[repo(1, 10, 2), repo(2, 5, 9), repo(3, 0, 0)]);
        let stats = s.stats();
        assert_eq!(stats.planets, 3);
        assert_eq!(stats.moons, 7);
        assert_eq!(stats.total_stars, 15);
        assert_eq!(stats.open_issues, 11);
        assert_eq!(stats.dropped, 0);
    }
}
