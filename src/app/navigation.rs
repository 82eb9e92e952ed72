//! Navigation methods for `OrbitApp`.
//!
//! Starts profile fetches on a worker thread (`explore`, `explore_random`)
//! and applies their results to the session (`check_fetch`).

use std::time::Instant;

use eframe::egui;
use rand::seq::IndexedRandom;

use repo_orbit::net::fetch::ProfileClient;

use super::OrbitApp;

/// Accounts offered by the "Random" button; all have public repositories.
pub const SAMPLE_ACCOUNTS: &[&str] = &[
    "torvalds",
    "octocat",
    "vercel",
    "tailwindlabs",
    "facebook",
    "google",
    "microsoft",
    "airbnb",
    "netflix",
    "spotify",
    "stripe",
    "shopify",
    "atlassian",
    "github",
    "gitlab",
    "freeCodeCamp",
];

impl OrbitApp {
    /// Fetch the profile named in the search box. The current scene is
    /// dropped immediately; the new one appears when the fetch lands.
    pub fn explore(&mut self, ctx: &egui::Context) {
        let username = self.username_input.trim().to_string();
        if username.is_empty() {
            self.notice = Some("Please enter a username to explore.".to_string());
            return;
        }
        self.notice = None;

        let ticket = self.session.begin(&username);
        let tx = self.fetch_tx.clone();
        let api = self.config.api.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let result = ProfileClient::new(api).and_then(|client| client.fetch_profile(&username));
            let _ = tx.send((ticket, result));
            ctx.request_repaint();
        });
    }

    /// Pick a sample account (different from the current input) and fetch it.
    pub fn explore_random(&mut self, ctx: &egui::Context) {
        let current = self.username_input.trim().to_string();
        let choices: Vec<&str> = SAMPLE_ACCOUNTS
            .iter()
            .copied()
            .filter(|name| !name.eq_ignore_ascii_case(&current))
            .collect();
        if let Some(name) = choices.choose(&mut rand::rng()) {
            self.username_input = (*name).to_string();
            self.explore(ctx);
        }
    }

    /// Back to the welcome screen.
    pub fn go_home(&mut self) {
        self.username_input.clear();
        self.notice = None;
        self.session.reset();
    }

    /// Drain finished fetches. Stale results are discarded by the session.
    pub fn check_fetch(&mut self, ctx: &egui::Context) {
        while let Ok((ticket, result)) = self.fetch_rx.try_recv() {
            if !self.session.complete(ticket, result) {
                continue;
            }
            log::debug!("Session is now {}", self.session.state().label());
            if let Some(scene) = self.session.scene() {
                self.scene_start = Instant::now();
                let url = scene.central().user.avatar_url.clone();
                let ctx = ctx.clone();
                self.avatars.request(&url, move || ctx.request_repaint());
            }
        }
    }
}
