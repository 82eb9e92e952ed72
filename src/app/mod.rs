//! `OrbitApp`: the top-level egui application state.
//!
//! This module declares the `OrbitApp` struct, its constructor and the
//! `eframe::App` frame loop. Methods are split across sibling sub-modules:
//!
//! - `navigation`: profile fetch lifecycle and sample accounts
//! - `toolbar`: search bar and view toggles
//! - `content`: scene viewport, overlays and status screens

pub mod content;
pub mod navigation;
pub mod toolbar;

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use repo_orbit::config::AppConfig;
use repo_orbit::error::FetchError;
use repo_orbit::model::ProfileData;
use repo_orbit::net::image::AvatarLoader;
use repo_orbit::render::camera::OrbitCamera;
use repo_orbit::render::painter::{ScenePainter, ViewOptions};
use repo_orbit::session::{Session, Ticket};

pub type FetchResult = (Ticket, Result<ProfileData, FetchError>);

// ─── Application state ───────────────────────────────────────────────────────

pub struct OrbitApp {
    pub config: AppConfig,
    pub username_input: String,
    /// Inline toolbar message, e.g. for a blank username.
    pub notice: Option<String>,
    pub session: Session,
    pub fetch_tx: mpsc::Sender<FetchResult>,
    pub fetch_rx: mpsc::Receiver<FetchResult>,
    pub camera: OrbitCamera,
    pub scene_painter: ScenePainter,
    pub view: ViewOptions,
    /// Slider value; mirrored into the session when it changes.
    pub speed: f64,
    pub show_ui: bool,
    pub show_stats: bool,
    pub avatars: AvatarLoader,
    pub avatar_textures: HashMap<String, egui::TextureHandle>,
    /// Zero point of the live scene's clock.
    pub scene_start: Instant,
}

impl OrbitApp {
    pub fn new(config: AppConfig) -> Self {
        let seed: u64 = rand::random();
        let (fetch_tx, fetch_rx) = mpsc::channel();
        Self {
            username_input: String::new(),
            notice: None,
            session: Session::new(seed, config.speed.default),
            fetch_tx,
            fetch_rx,
            camera: OrbitCamera::new(config.camera),
            scene_painter: ScenePainter::new(seed),
            view: ViewOptions::default(),
            speed: config.speed.default,
            show_ui: true,
            show_stats: false,
            avatars: AvatarLoader::new(),
            avatar_textures: HashMap::new(),
            scene_start: Instant::now(),
            config,
        }
    }

    /// Upload freshly decoded avatars as textures.
    fn upload_avatars(&mut self, ctx: &egui::Context) {
        self.avatars.poll();
        let Some(scene) = self.session.scene() else {
            return;
        };
        let url = &scene.central().user.avatar_url;
        if self.avatar_textures.contains_key(url) {
            return;
        }
        if let Some(img) = self.avatars.get(url) {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [img.width as usize, img.height as usize],
                &img.rgba,
            );
            let texture = ctx.load_texture(url.as_str(), image, egui::TextureOptions::LINEAR);
            self.avatar_textures.insert(url.clone(), texture);
        }
    }
}

impl eframe::App for OrbitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.check_fetch(ctx);
        self.upload_avatars(ctx);

        let live = self.session.scene().is_some();
        if self.show_ui || !live {
            egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
                self.draw_toolbar(ui, ctx);
            });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_content(ui, ctx);
            });
    }
}
