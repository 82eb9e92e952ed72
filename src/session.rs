//! Exploration session lifecycle.
//!
//! ```text
//!  Welcome ──begin──▶ Loading ──complete(Ok)──▶ Live(SceneState)
//!     ▲                  │
//!     │                  ├──complete(NotFound)──▶ NotFound
//!   reset                └──complete(Err)───────▶ Failed
//! ```
//!
//! Exactly one scene is live at a time. `begin` drops the current scene
//! before anything else happens, and each fetch carries a ticket so that a
//! result arriving after a newer `begin` is discarded instead of mixed in.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::error::{FetchError, FetchErrorKind};
use crate::layout::layout;
use crate::model::ProfileData;
use crate::scene::SceneState;

pub enum SessionState {
    Welcome,
    Loading { username: String },
    Live(Box<SceneState>),
    NotFound { username: String },
    Failed { username: String, error: FetchError },
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Welcome => "welcome",
            SessionState::Loading { .. } => "loading",
            SessionState::Live(_) => "live",
            SessionState::NotFound { .. } => "not-found",
            SessionState::Failed { .. } => "failed",
        }
    }
}

/// Identifies one fetch; stale tickets are rejected by [`Session::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

pub struct Session {
    state: SessionState,
    generation: u64,
    rng: ChaChaRng,
    speed: f64,
}

impl Session {
    /// `seed` drives the session-random layout fields.
    pub fn new(seed: u64, speed: f64) -> Self {
        Self {
            state: SessionState::Welcome,
            generation: 0,
            rng: ChaChaRng::seed_from_u64(seed),
            speed,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    pub fn scene(&self) -> Option<&SceneState> {
        match &self.state {
            SessionState::Live(scene) => Some(&**scene),
            _ => None,
        }
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneState> {
        match &mut self.state {
            SessionState::Live(scene) => Some(&mut **scene),
            _ => None,
        }
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed
    }

    /// Remember the speed for future scenes and apply it to the live one.
    pub fn set_speed_multiplier(&mut self, speed: f64) {
        let applied = match self.scene_mut() {
            Some(scene) => scene.set_speed_multiplier(speed),
            None if speed.is_finite() && speed > 0.0 => true,
            None => {
                log::warn!("Ignoring speed multiplier {}", speed);
                false
            }
        };
        if applied {
            self.speed = speed;
        }
    }

    /// Start a fetch for `username`. The previous scene is dropped now.
    pub fn begin(&mut self, username: &str) -> Ticket {
        self.generation += 1;
        log::info!("Session {}: loading {:?}", self.generation, username);
        self.state = SessionState::Loading {
            username: username.to_string(),
        };
        Ticket(self.generation)
    }

    /// Apply a fetch result. Returns `false` (and changes nothing) when the
    /// ticket is stale or no fetch is pending.
    pub fn complete(&mut self, ticket: Ticket, result: Result<ProfileData, FetchError>) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "Discarding result of session {} (current {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        let username = match &self.state {
            SessionState::Loading { username } => username.clone(),
            _ => return false,
        };

        self.state = match result {
            Ok(profile) => {
                let layout = layout(&profile.user, &profile.repos, &mut self.rng);
                log::info!(
                    "Session {}: {} planets for {} ({} dropped)",
                    self.generation,
                    layout.bodies.len(),
                    profile.user.login,
                    layout.dropped
                );
                for body in &layout.bodies {
                    log::debug!(
                        "  {} orbit {:.1} size {:.2} {}",
                        body.repo.name,
                        body.orbit_radius(),
                        body.body_radius(),
                        body.color()
                    );
                }
                SessionState::Live(Box::new(SceneState::new(layout, self.speed)))
            }
            Err(e) if e.kind == FetchErrorKind::NotFound => {
                log::info!("Session {}: {:?} not found", self.generation, username);
                SessionState::NotFound { username }
            }
            Err(e) => {
                log::warn!("Session {}: fetch failed: {}", self.generation, e);
                SessionState::Failed { username, error: e }
            }
        };
        true
    }

    /// Back to the welcome state; any in-flight result becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SessionState::Welcome;
    }
}
