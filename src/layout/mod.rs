//! Layout engine: repository records → orbital descriptors.
//!
//! Pure transform. Repositories are ranked by stars (stable, so ties keep
//! upstream order), capped at [`MAX_BODIES`], grouped into bands of
//! [`BAND_SIZE`] and assigned radius, size, colour and moon count.
//!
//! Fields that follow from the data live in [`DerivedOrbit`] and are
//! identical for identical input. Fields drawn from the session RNG
//! (angular speed, phase, saturation, lightness) live in [`SessionOrbit`].

pub mod color;

use std::f64::consts::TAU;

use rand::Rng;

use crate::model::{RepositoryRecord, UserRecord};
use color::Hsl;

/// Performance cap on orbiting bodies.
pub const MAX_BODIES: usize = 30;
/// Repositories per orbital band.
pub const BAND_SIZE: usize = 4;
/// Moons per planet ceiling.
pub const MAX_SATELLITES: usize = 5;

const INNER_ORBIT: f64 = 4.0;
const BAND_SPACING: f64 = 2.0;
const IN_BAND_STEP: f64 = 0.5;

const BASE_SPEED: f64 = 0.2;
const SPEED_JITTER: f64 = 0.3;

const PLANET_MIN_SIZE: f64 = 0.3;
const PLANET_LOG_SCALE: f64 = 0.2;
const PLANET_MAX_GROWTH: f64 = 0.9;

const SUN_MIN_SIZE: f64 = 1.5;
const SUN_LOG_SCALE: f64 = 0.3;
const SUN_MAX_GROWTH: f64 = 1.5;

const SATURATION_RANGE: std::ops::Range<f64> = 65.0..85.0;
const LIGHTNESS_RANGE: std::ops::Range<f64> = 45.0..60.0;

const MOON_SIZE: f64 = 0.08;
const MOON_ORBIT_FACTOR: f64 = 1.8;
const MOON_ORBIT_STEP: f64 = 0.3;
const MOON_BASE_SPEED: f64 = 1.5;
const MOON_SPEED_STEP: f64 = 0.3;

/// Data-determined orbital parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedOrbit {
    /// Position in the star-ranked sequence (0 = most stars).
    pub rank: usize,
    pub band: usize,
    pub orbit_radius: f64,
    pub body_radius: f64,
    pub hue: f64,
    pub satellite_count: usize,
}

/// Per-session random parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOrbit {
    /// Base angular velocity (rad/s) before the global multiplier.
    pub angular_speed: f64,
    /// Initial angle in [0, 2π).
    pub phase: f64,
    pub saturation: f64,
    pub lightness: f64,
}

/// One orbiting body (planet) per surviving repository.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitDescriptor {
    /// Equals the source repository id.
    pub body_id: u64,
    pub derived: DerivedOrbit,
    pub session: SessionOrbit,
    pub repo: RepositoryRecord,
}

impl OrbitDescriptor {
    pub fn orbit_radius(&self) -> f64 {
        self.derived.orbit_radius
    }

    pub fn body_radius(&self) -> f64 {
        self.derived.body_radius
    }

    pub fn angular_speed(&self) -> f64 {
        self.session.angular_speed
    }

    pub fn phase(&self) -> f64 {
        self.session.phase
    }

    pub fn satellite_count(&self) -> usize {
        self.derived.satellite_count
    }

    pub fn color(&self) -> Hsl {
        Hsl::new(
            self.derived.hue,
            self.session.saturation,
            self.session.lightness,
        )
    }

    /// Whether every parameter the frame loop consumes is finite and the
    /// radii are positive.
    pub fn is_well_formed(&self) -> bool {
        self.derived.orbit_radius.is_finite()
            && self.derived.orbit_radius > 0.0
            && self.derived.body_radius.is_finite()
            && self.derived.body_radius > 0.0
            && self.session.angular_speed.is_finite()
            && self.session.phase.is_finite()
    }

    pub fn satellites(&self) -> Vec<SatelliteDescriptor> {
        satellites(self)
    }
}

/// A moon circling its planet. Radius is relative to the planet centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteDescriptor {
    pub orbit_radius: f64,
    pub angular_speed: f64,
    pub phase: f64,
    pub size: f64,
}

/// The sun, representing the queried account.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralBody {
    pub user: UserRecord,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub central: CentralBody,
    /// In rank order.
    pub bodies: Vec<OrbitDescriptor>,
    /// Repositories dropped by the [`MAX_BODIES`] cap.
    pub dropped: usize,
}

/// Lay out a profile as a solar system.
///
/// Only the [`SessionOrbit`] fields consume `rng`; everything else is a
/// function of the input records. Inputs are never mutated.
pub fn layout<R: Rng>(
    user: &UserRecord,
    repos: &[RepositoryRecord],
    rng: &mut R,
) -> Layout {
    let ranked = rank_repositories(repos);
    let survivors = ranked.len();

    let bodies = ranked
        .into_iter()
        .enumerate()
        .map(|(rank, repo)| {
            let band = rank / BAND_SIZE;
            let derived = DerivedOrbit {
                rank,
                band,
                orbit_radius: orbit_radius(rank),
                body_radius: planet_size(repo.stargazers_count),
                hue: hue_for(rank, survivors),
                satellite_count: satellite_count(repo.open_issues_count),
            };
            let session = SessionOrbit {
                angular_speed: BASE_SPEED + rng.random_range(0.0..SPEED_JITTER) / (band + 1) as f64,
                phase: rng.random_range(0.0..TAU),
                saturation: rng.random_range(SATURATION_RANGE),
                lightness: rng.random_range(LIGHTNESS_RANGE),
            };
            OrbitDescriptor {
                body_id: repo.id,
                derived,
                session,
                repo: repo.clone(),
            }
        })
        .collect();

    Layout {
        central: CentralBody {
            user: user.clone(),
            radius: sun_size(user.followers),
        },
        bodies,
        dropped: repos.len().saturating_sub(survivors),
    }
}

/// Star-descending order, ties kept in input order, capped at [`MAX_BODIES`].
pub fn rank_repositories(repos: &[RepositoryRecord]) -> Vec<&RepositoryRecord> {
    let mut ranked: Vec<&RepositoryRecord> = repos.iter().collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    ranked.truncate(MAX_BODIES);
    ranked
}

/// Band base radius plus the in-band offset. Strictly increasing in rank.
pub fn orbit_radius(rank: usize) -> f64 {
    let band = rank / BAND_SIZE;
    let position_in_band = rank % BAND_SIZE;
    INNER_ORBIT + band as f64 * BAND_SPACING + position_in_band as f64 * IN_BAND_STEP
}

/// Planet radius in [0.3, 1.2], logarithmic in stars.
pub fn planet_size(stars: u64) -> f64 {
    PLANET_MIN_SIZE + (log_count(stars) * PLANET_LOG_SCALE).min(PLANET_MAX_GROWTH)
}

/// Sun radius in [1.5, 3.0], logarithmic in followers.
pub fn sun_size(followers: u64) -> f64 {
    SUN_MIN_SIZE + (log_count(followers) * SUN_LOG_SCALE).min(SUN_MAX_GROWTH)
}

pub fn satellite_count(open_issues: u64) -> usize {
    open_issues.min(MAX_SATELLITES as u64) as usize
}

/// Moons of a planet, evenly phased, each one a little further out and
/// faster than the last.
pub fn satellites(planet: &OrbitDescriptor) -> Vec<SatelliteDescriptor> {
    let count = planet.satellite_count();
    (0..count)
        .map(|index| SatelliteDescriptor {
            orbit_radius: planet.body_radius() * MOON_ORBIT_FACTOR + index as f64 * MOON_ORBIT_STEP,
            angular_speed: MOON_BASE_SPEED + index as f64 * MOON_SPEED_STEP,
            phase: index as f64 / count as f64 * TAU,
            size: MOON_SIZE,
        })
        .collect()
}

fn hue_for(rank: usize, survivors: usize) -> f64 {
    if survivors == 0 {
        return 0.0;
    }
    (rank as f64 * 360.0 / survivors as f64) % 360.0
}

#[inline]
fn log_count(n: u64) -> f64 {
    (n.max(1) as f64).log10()
}
