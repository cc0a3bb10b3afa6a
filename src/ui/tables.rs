use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Column, Table};

/// Columns of the main selected-date table.
pub const DAILY_COLUMNS: [Column; 4] = [
    Column::Dteday,
    Column::CasualDay,
    Column::RegisteredDay,
    Column::CntDay,
];

/// Columns of the 2-hour bucket detail table.
pub const HOURLY_COLUMNS: [Column; 4] = [
    Column::Dteday,
    Column::CasualHour,
    Column::RegisteredHour,
    Column::CntHour,
];

/// Columns of the environmental conditions table.
pub const CONDITION_COLUMNS: [Column; 6] = [
    Column::Dteday,
    Column::TempDay,
    Column::AtempDay,
    Column::HumDay,
    Column::WindspeedDay,
    Column::WeathersitDay,
];

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 260.0;

/// Scrollable table of `columns` for every row of `table`.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table, columns: &[Column]) {
    if table.is_empty() {
        ui.weak("No rows in the selected date range.");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(TableColumn::auto().at_least(90.0), columns.len())
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for c in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(c.name());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let rec = &table.records()[row.index()];
                    for c in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(rec.value(*c).to_string());
                        });
                    }
                });
            });
    });
}
