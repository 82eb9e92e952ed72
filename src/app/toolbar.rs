//! Toolbar rendering for `OrbitApp`.
//!
//! Draws the username search field, the Go / Random buttons and, once a
//! scene is live, the view toggles.

use eframe::egui;

use super::OrbitApp;

impl OrbitApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let loading = self.session.is_loading();
        let live = self.session.scene().is_some();

        ui.horizontal(|ui| {
            ui.add_space(4.0);

            if ui
                .add(egui::Button::new(egui::RichText::new("\u{2609} Repo Orbit").strong()).frame(false))
                .on_hover_text("Home")
                .clicked()
            {
                self.go_home();
            }

            ui.separator();

            let response = ui.add_sized(
                [220.0, 24.0],
                egui::TextEdit::singleline(&mut self.username_input)
                    .hint_text("Enter a username...")
                    .font(egui::TextStyle::Monospace),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && !loading {
                self.explore(ctx);
            }

            if ui.add_enabled(!loading, egui::Button::new("Go")).clicked() {
                self.explore(ctx);
            }
            if ui
                .add_enabled(!loading, egui::Button::new("\u{1F3B2} Random"))
                .clicked()
            {
                self.explore_random(ctx);
            }
            if loading {
                ui.spinner();
            }
            if let Some(ref notice) = self.notice {
                ui.colored_label(egui::Color32::from_rgb(255, 110, 110), notice.as_str());
            }

            if live {
                ui.separator();
                ui.toggle_value(&mut self.view.show_orbits, "Orbits");
                ui.toggle_value(&mut self.view.show_moons, "Moons");
                ui.toggle_value(&mut self.view.show_labels, "Labels");
                ui.toggle_value(&mut self.view.show_stars, "Stars");
                ui.toggle_value(&mut self.show_stats, "Stats");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Hide UI").clicked() {
                        self.show_ui = false;
                    }
                });
            }
        });
    }
}
