use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – date range
// ---------------------------------------------------------------------------

/// Render the left panel with the start / end date pickers.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Date");
    ui.separator();

    let (Some(interval), Some((min, max))) = (state.interval, state.bounds) else {
        ui.label("No dated rows loaded.");
        return;
    };

    let mut start = interval.start;
    let mut end = interval.end;

    egui::Grid::new("date_range")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            if ui
                .add(DatePickerButton::new(&mut start).id_salt("start_date"))
                .changed()
            {
                state.set_start(start);
            }
            ui.end_row();

            ui.label("To");
            if ui
                .add(DatePickerButton::new(&mut end).id_salt("end_date"))
                .changed()
            {
                state.set_end(end);
            }
            ui.end_row();
        });

    ui.add_space(4.0);
    ui.small(format!("Available: {min} – {max}"));

    if ui.small_button("Reset range").clicked() {
        state.set_start(min);
        state.set_end(max);
    }

    if state.interval.is_some_and(|iv| iv.is_inverted()) {
        ui.add_space(4.0);
        ui.label(RichText::new("Start date is after end date.").color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} rows loaded, {} in range",
            state.table.len(),
            state.visible.len()
        ));

        if let Some(path) = &state.source {
            ui.separator();
            ui.weak(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Replace the dataset with one picked by the user. On failure the current
/// dataset stays and the error goes to the status bar.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bike sharing data")
        .add_filter("Supported files", &["csv", "txt", "tsv", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("TSV", &["tsv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load(&path) {
            Ok(table) => {
                log::info!("Loaded {} rows from {}", table.len(), path.display());
                state.set_dataset(table, Some(path));
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
