use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Gender;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – query form
// ---------------------------------------------------------------------------

/// Render the query form.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Your details");
    ui.separator();

    let Some(table) = state.table else {
        if state.status_message.is_some() {
            ui.label("Cutoff data failed to load.");
        } else {
            ui.label("Downloading cutoff data…");
        }
        return;
    };
    let Some(form) = &mut state.form else {
        return;
    };

    let mut trigger_search = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category ----
            ui.strong("Category");
            egui::ComboBox::from_id_salt("category")
                .selected_text(&form.category)
                .show_ui(ui, |ui: &mut Ui| {
                    for cat in &table.categories {
                        if ui.selectable_label(form.category == *cat, cat).clicked() {
                            form.category = cat.clone();
                        }
                    }
                });
            ui.add_space(4.0);

            // ---- Ranks ----
            ui.strong(format!("{} rank", form.category));
            ui.add(
                egui::DragValue::new(&mut form.category_rank)
                    .range(1..=2_000_000)
                    .speed(25),
            );
            ui.add_space(4.0);

            ui.strong("CRL rank");
            ui.add(
                egui::DragValue::new(&mut form.crl_rank)
                    .range(1..=2_000_000)
                    .speed(25),
            );
            ui.add_space(4.0);

            // ---- Gender ----
            ui.strong("Gender");
            egui::ComboBox::from_id_salt("gender")
                .selected_text(form.gender.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for gender in [Gender::Male, Gender::Female] {
                        if ui
                            .selectable_label(form.gender == gender, gender.label())
                            .clicked()
                        {
                            form.gender = gender;
                        }
                    }
                });
            ui.add_space(4.0);

            // ---- Quota ----
            ui.strong("Quota");
            let quota_text = form.quota.clone().unwrap_or_else(|| "All".to_string());
            egui::ComboBox::from_id_salt("quota")
                .selected_text(quota_text)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(form.quota.is_none(), "All").clicked() {
                        form.quota = None;
                    }
                    for quota in &table.quotas {
                        if ui
                            .selectable_label(form.quota.as_deref() == Some(quota), quota)
                            .clicked()
                        {
                            form.quota = Some(quota.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Preferred branches (optional) ----
            let header_text = format!(
                "Preferred branches  ({}/{})",
                form.branches.len(),
                table.branches.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label("No selection = every branch.");

                    // Select all / none buttons
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            form.branches = table.branches.iter().cloned().collect();
                        }
                        if ui.small_button("None").clicked() {
                            form.branches.clear();
                        }
                    });

                    for branch in &table.branches {
                        let mut checked = form.branches.contains(branch);
                        if ui.checkbox(&mut checked, branch).changed() {
                            if checked {
                                form.branches.insert(branch.clone());
                            } else {
                                form.branches.remove(branch);
                            }
                        }
                    }
                });

            ui.separator();
            if ui.button("Find eligible colleges").clicked() {
                trigger_search = true;
            }
        });

    if trigger_search {
        state.run_search();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top title / status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("JEE Main College Predictor");
        ui.separator();

        if let Some(table) = state.table {
            ui.label(format!("{} seats loaded", table.len()));

            if let Some(results) = &state.results {
                ui.separator();
                ui.label(format!("{} eligible", results.len()));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
