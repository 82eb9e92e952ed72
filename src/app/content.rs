//! Main viewport rendering for `OrbitApp`.
//!
//! The live scene is painted into the whole central panel; camera input,
//! hover and click resolution happen here. Overlay windows (profile card,
//! legend, speed, instructions, stats) float on top and can be dragged.

use eframe::egui;
use egui::{Align2, Color32, Rounding};

use repo_orbit::kinematics;
use repo_orbit::render::painter::pick;
use repo_orbit::scene::clamp_speed;
use repo_orbit::session::SessionState;

use super::OrbitApp;
use crate::ui::{format_count, format_date, truncate_str};

const SPACE: Color32 = Color32::from_rgb(2, 2, 12);
const ACCENT: Color32 = Color32::from_rgb(255, 200, 60);

/// What the central panel shows, detached from the session borrow.
enum Screen {
    Welcome,
    Loading(String),
    NotFound(String),
    Failed { username: String, message: String },
    Live,
}

impl OrbitApp {
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let screen = match self.session.state() {
            SessionState::Welcome => Screen::Welcome,
            SessionState::Loading { username } => Screen::Loading(username.clone()),
            SessionState::NotFound { username } => Screen::NotFound(username.clone()),
            SessionState::Failed { username, error } => Screen::Failed {
                username: username.clone(),
                message: error.message.clone(),
            },
            SessionState::Live(_) => Screen::Live,
        };

        if !matches!(screen, Screen::Live) {
            ui.painter().rect_filled(ui.max_rect(), Rounding::ZERO, SPACE);
        }

        match screen {
            Screen::Welcome => self.draw_welcome(ui, ctx),
            Screen::Loading(username) => {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.4);
                        ui.spinner();
                        ui.add_space(8.0);
                        ui.label(format!("Charting the system of {}...", username));
                    });
                });
            }
            Screen::NotFound(username) => self.draw_not_found(ui, ctx, &username),
            Screen::Failed { username, message } => {
                self.draw_error(ui, ctx, &username, &message)
            }
            Screen::Live => {
                self.draw_scene(ui, ctx);
                if self.show_ui {
                    self.draw_overlays(ctx);
                } else {
                    egui::Area::new(egui::Id::new("show_ui"))
                        .anchor(Align2::RIGHT_TOP, [-12.0, 12.0])
                        .show(ctx, |ui| {
                            if ui.button("Show UI").clicked() {
                                self.show_ui = true;
                            }
                        });
                }
            }
        }
    }

    // ── Scene viewport ───────────────────────────────────────────────────────

    fn draw_scene(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag().union(egui::Sense::hover()),
        );

        // Left drag rotates, right drag pans, scroll zooms.
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x as f64, delta.y as f64);
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.camera.pan(delta.x as f64, delta.y as f64);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll as f64);
            }
        }
        if response.double_clicked() {
            self.camera.reset();
        }

        let elapsed = self.scene_start.elapsed().as_secs_f64();
        let Some(scene) = self.session.scene_mut() else {
            return;
        };
        let frame = scene.advance(elapsed);
        let painter = ui.painter_at(rect);
        let projected = self
            .scene_painter
            .paint(&painter, rect, &frame, scene, &self.camera, &self.view);

        let hit = response.hover_pos().and_then(|pos| pick(&projected, pos));
        match hit {
            Some(id) => {
                scene.pointer_enter(id);
                ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            None => scene.pointer_leave(),
        }

        if opens_repository(response.clicked(), response.double_clicked()) {
            let target = response
                .interact_pointer_pos()
                .and_then(|pos| pick(&projected, pos))
                .and_then(|id| scene.click(id));
            if let Some(url) = target {
                log::info!("Opening {}", url);
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
        }

        if let Some(desc) = hit.and_then(|id| scene.descriptor(id)) {
            response.on_hover_ui_at_pointer(|ui| {
                ui.label(egui::RichText::new(&desc.repo.name).strong().color(ACCENT));
                if let Some(ref text) = desc.repo.description {
                    ui.label(truncate_str(text, 90));
                }
                ui.separator();
                ui.label(format!(
                    "\u{2605} {}   \u{2442} {}   Issues {}",
                    format_count(desc.repo.stargazers_count),
                    format_count(desc.repo.forks_count),
                    desc.repo.open_issues_count
                ));
                ui.label(format!(
                    "Language: {}",
                    desc.repo.language.as_deref().unwrap_or("Unknown")
                ));
                ui.label(format!("Updated {}", format_date(desc.repo.updated_at)));
                ui.weak("Click to open repository");
            });
        }

        ctx.request_repaint();
    }

    // ── Overlays ─────────────────────────────────────────────────────────────

    fn draw_overlays(&mut self, ctx: &egui::Context) {
        self.draw_profile_card(ctx);
        self.draw_legend(ctx);
        self.draw_speed_panel(ctx);
        self.draw_instructions(ctx);
        if self.show_stats {
            self.draw_stats_panel(ctx);
        }
    }

    fn draw_profile_card(&mut self, ctx: &egui::Context) {
        let Some(scene) = self.session.scene() else {
            return;
        };
        let user = &scene.central().user;
        let texture = self.avatar_textures.get(&user.avatar_url);
        let avatar_pending = self.avatars.is_pending(&user.avatar_url);
        let mut hide = false;

        egui::Window::new("Profile")
            .default_pos([16.0, 56.0])
            .resizable(false)
            .collapsible(false)
            .title_bar(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    match texture {
                        Some(texture) => {
                            ui.add(
                                egui::Image::new(texture)
                                    .fit_to_exact_size(egui::vec2(56.0, 56.0))
                                    .rounding(28.0),
                            );
                        }
                        None if avatar_pending => {
                            ui.spinner();
                        }
                        None => {}
                    }
                    ui.vertical(|ui| {
                        ui.heading(user.display_name());
                        ui.weak(format!("@{}", user.login));
                    });
                    if ui.small_button("\u{2715}").on_hover_text("Hide UI").clicked() {
                        hide = true;
                    }
                });
                ui.horizontal(|ui| {
                    ui.label(format!("{} followers", format_count(user.followers)));
                    ui.separator();
                    ui.label(format!("{} public repos", format_count(user.public_repos)));
                });
                if let Some(ref bio) = user.bio {
                    ui.label(truncate_str(bio, 120));
                }
            });

        if hide {
            self.show_ui = false;
        }
    }

    fn draw_legend(&self, ctx: &egui::Context) {
        egui::Window::new("Legend")
            .pivot(Align2::LEFT_BOTTOM)
            .default_pos([16.0, ctx.screen_rect().bottom() - 16.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                legend_row(ui, ACCENT, "Sun: the account, sized by followers");
                legend_row(ui, Color32::from_rgb(90, 170, 255), "Planet: a repository, sized by stars");
                legend_row(ui, Color32::from_gray(170), "Moon: open issues (up to 5)");
                ui.weak("Brightest repositories orbit closest");
            });
    }

    fn draw_speed_panel(&mut self, ctx: &egui::Context) {
        let range = self.config.speed;
        let before = self.speed;

        egui::Window::new("Galaxy speed")
            .pivot(Align2::CENTER_BOTTOM)
            .default_pos([ctx.screen_rect().center().x, ctx.screen_rect().bottom() - 16.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.weak("Slow");
                    ui.add(
                        egui::Slider::new(&mut self.speed, range.min..=range.max)
                            .step_by(range.step)
                            .show_value(false),
                    );
                    ui.weak("Fast");
                    ui.label(egui::RichText::new(format!("{:.1}x", self.speed)).monospace());
                });
            });

        if self.speed != before {
            self.speed = clamp_speed(self.speed, &range);
            self.session.set_speed_multiplier(self.speed);
        }
    }

    fn draw_instructions(&self, ctx: &egui::Context) {
        egui::Window::new("Controls")
            .pivot(Align2::RIGHT_BOTTOM)
            .default_pos([ctx.screen_rect().right() - 16.0, ctx.screen_rect().bottom() - 16.0])
            .resizable(false)
            .collapsible(true)
            .default_open(false)
            .show(ctx, |ui| {
                ui.label("Click a planet to open its repository");
                ui.label("Drag to rotate, right-drag to pan");
                ui.label("Scroll to zoom, double-click to reset");
            });
    }

    fn draw_stats_panel(&self, ctx: &egui::Context) {
        let Some(scene) = self.session.scene() else {
            return;
        };
        let stats = scene.stats();

        egui::Window::new("Stats")
            .pivot(Align2::RIGHT_TOP)
            .default_pos([ctx.screen_rect().right() - 16.0, 56.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Planets: {}", stats.planets));
                ui.label(format!("Moons: {}", stats.moons));
                ui.label(format!("Total stars: {}", format_count(stats.total_stars)));
                ui.label(format!("Open issues: {}", format_count(stats.open_issues)));
                if stats.dropped > 0 {
                    ui.weak(format!("{} smaller repositories not shown", stats.dropped));
                }
                ui.separator();
                ui.label(format!("Speed: {:.1}x", scene.speed_multiplier()));
                if let Some(year) = scene
                    .descriptors()
                    .first()
                    .and_then(|inner| kinematics::period(inner, scene.speed_multiplier()))
                {
                    ui.label(format!("Innermost year: {:.1}s", year));
                }
                ui.label(format!(
                    "Camera: {:.1} away, {:.0}\u{b0} tilt",
                    self.camera.distance(),
                    self.camera.polar().to_degrees()
                ));
            });
    }

    // ── Status screens ───────────────────────────────────────────────────────

    fn draw_welcome(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading(egui::RichText::new("\u{2609} Repo Orbit").size(32.0).color(ACCENT));
            ui.add_space(8.0);
            ui.label(
                "Enter a username to visualize their profile as an interactive 3D solar system.",
            );
            ui.add_space(16.0);
            if ui.button("\u{1F3B2} Random user").clicked() {
                self.explore_random(ctx);
            }
            ui.add_space(24.0);
            ui.weak("Planets are repositories, moons are open issues. Click a planet to open it.");
        });
    }

    fn draw_not_found(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, username: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading("User not found");
            ui.add_space(8.0);
            ui.label(format!("No account named \"{}\" exists.", username));
            ui.weak("Try a random user with repositories, or check the username and try again.");
            ui.add_space(16.0);
            ui.horizontal(|ui| {
                // Centre the two buttons.
                ui.add_space((ui.available_width() - 260.0).max(0.0) / 2.0);
                if ui.button("Random user").clicked() {
                    self.explore_random(ctx);
                }
                if ui.button("Try a different username").clicked() {
                    self.go_home();
                }
            });
        });
    }

    fn draw_error(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        username: &str,
        message: &str,
    ) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading("Something went wrong");
            ui.add_space(8.0);
            ui.colored_label(Color32::from_rgb(255, 110, 110), message);
            ui.add_space(16.0);
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - 160.0).max(0.0) / 2.0);
                if ui.button("Retry").clicked() {
                    self.username_input = username.to_string();
                    self.explore(ctx);
                }
                if ui.button("Back").clicked() {
                    self.go_home();
                }
            });
        });
    }
}

fn legend_row(ui: &mut egui::Ui, color: Color32, text: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 5.0, color);
        ui.label(text);
    });
}

/// egui only reports a click when the pointer did not drag. The second press
/// of a double-click also reports one; that press resets the camera instead.
fn opens_repository(clicked: bool, double_clicked: bool) -> bool {
    clicked && !double_clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_click_does_not_open_twice() {
        assert!(opens_repository(true, false));
        assert!(!opens_repository(true, true));
        assert!(!opens_repository(false, false));
    }
}
