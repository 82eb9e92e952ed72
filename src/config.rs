//! Runtime configuration.
//!
//! Everything here has a sensible default; `ApiConfig::from_env` lets the
//! API endpoint, token and timeout be overridden without a config file.

use std::f64::consts::PI;
use std::time::Duration;

/// Upstream API settings used by the profile adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// API root, e.g. `https://api.github.com`.
    pub base_url: String,
    /// Optional bearer token (raises the upstream rate limit).
    pub token: Option<String>,
    pub timeout: Duration,
    /// Repositories requested per page (single page is fetched).
    pub per_page: u32,
    /// Upstream sort key for the repository listing.
    pub sort: String,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.github.com"),
            token: None,
            timeout: Duration::from_secs(15),
            per_page: 100,
            sort: String::from("updated"),
            user_agent: concat!("repo-orbit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by `GITHUB_API_URL`, `GITHUB_TOKEN` and
    /// `REPO_ORBIT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = lookup("GITHUB_API_URL") {
            match url::Url::parse(&base) {
                Ok(_) => config.base_url = base.trim_end_matches('/').to_string(),
                Err(e) => log::warn!("Ignoring GITHUB_API_URL={:?}: {}", base, e),
            }
        }

        config.token = lookup("GITHUB_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(raw) = lookup("REPO_ORBIT_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => log::warn!("Ignoring REPO_ORBIT_TIMEOUT_SECS={:?}", raw),
            }
        }

        config
    }
}

/// Orbit-camera bounds and starting pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub min_distance: f64,
    pub max_distance: f64,
    /// Polar angle ceiling measured from +Y; keeps the eye from flipping
    /// under the orbital plane.
    pub max_polar_angle: f64,
    pub initial_eye: [f64; 3],
    /// Vertical field of view in radians.
    pub fov_y: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance: 5.0,
            max_distance: 50.0,
            max_polar_angle: PI / 1.5,
            initial_eye: [0.0, 15.0, 20.0],
            fov_y: 60.0_f64.to_radians(),
        }
    }
}

/// Range of the global speed control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 5.0,
            step: 0.1,
            default: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub camera: CameraConfig,
    pub speed: SpeedConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            ..Default::default()
        }
    }
}
