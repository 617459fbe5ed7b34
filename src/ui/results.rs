use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Result table (central panel)
// ---------------------------------------------------------------------------

/// Render the eligible-seat table, or the appropriate placeholder.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let Some(table) = state.table else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => ui.heading(RichText::new(msg).color(Color32::RED)),
            None => ui.heading("Downloading cutoff data…"),
        });
        return;
    };

    let Some(results) = &state.results else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Enter your details and press “Find eligible colleges”.")
        });
        return;
    };

    if results.is_empty() {
        // A valid outcome, not a failure: rendered as a notice, not in red.
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(
                RichText::new("No eligible colleges found for the given rank.")
                    .color(Color32::GOLD),
            )
        });
        return;
    }

    ui.label(format!("Found {} eligible college seats.", results.len()));
    ui.add_space(4.0);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::remainder())
        .column(Column::remainder())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            for title in [
                "Institute",
                "Branch",
                "Quota",
                "Category",
                "Gender",
                "Closing rank",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, results.len(), |mut row| {
                let seat = &table.seats[results[row.index()]];
                row.col(|ui| {
                    ui.label(&seat.institute);
                });
                row.col(|ui| {
                    ui.label(&seat.branch);
                });
                row.col(|ui| {
                    ui.label(&seat.quota);
                });
                row.col(|ui| {
                    ui.label(&seat.category);
                });
                row.col(|ui| {
                    ui.label(&seat.gender);
                });
                row.col(|ui| {
                    ui.label(seat.closing_rank.to_string());
                });
            });
        });
}
