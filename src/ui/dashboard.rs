use eframe::egui::{ScrollArea, Ui};

use crate::color::ChartPalette;
use crate::data::aggregate::{AggregateRow, Reducer, aggregate_by};
use crate::data::error::InvalidColumnError;
use crate::data::model::{Column, Table};
use crate::data::stats::pairs;
use crate::state::{AppState, Panel, PanelToggles};
use crate::ui::charts::{ChartLabels, bar_chart, line_plot, regression_plot};
use crate::ui::tables::{CONDITION_COLUMNS, DAILY_COLUMNS, HOURLY_COLUMNS, data_table};

// ---------------------------------------------------------------------------
// Chart definitions
// ---------------------------------------------------------------------------

/// A bar chart of one categorical column.
struct Breakdown {
    panel: Panel,
    title: &'static str,
    x_label: &'static str,
    group: Column,
    value: Column,
    reducer: Reducer,
    note: Option<&'static str>,
}

const CALENDAR_BREAKDOWNS: [Breakdown; 3] = [
    Breakdown {
        panel: Panel::Season,
        title: "Bike Renters By Season",
        x_label: "Season",
        group: Column::SeasonDay,
        value: Column::CntDay,
        reducer: Reducer::Sum,
        note: None,
    },
    Breakdown {
        panel: Panel::Month,
        title: "Bike Renters By Month",
        x_label: "Month",
        group: Column::MnthDay,
        value: Column::CntDay,
        reducer: Reducer::Sum,
        note: None,
    },
    Breakdown {
        panel: Panel::Weekday,
        title: "Bike Renters By Day",
        x_label: "Day",
        group: Column::WeekdayHour,
        value: Column::CntHour,
        reducer: Reducer::Mean,
        note: None,
    },
];

const WEATHER_BREAKDOWN: Breakdown = Breakdown {
    panel: Panel::Weather,
    title: "Bike Renters",
    x_label: "Weather",
    group: Column::WeathersitDay,
    value: Column::CntDay,
    reducer: Reducer::Mean,
    note: Some("note: 1: Sunny, 2: Misty, 3: Light Rain/Snow"),
};

/// Regression of the daily count on a daily measurement, plus mean hourly
/// count per distinct value of the hourly measurement.
struct Effect {
    panel: Panel,
    name: &'static str,
    day: Column,
    hour: Column,
}

const EFFECTS: [Effect; 3] = [
    Effect {
        panel: Panel::Temperature,
        name: "Temperature",
        day: Column::TempDay,
        hour: Column::TempHour,
    },
    Effect {
        panel: Panel::Humidity,
        name: "Humidity",
        day: Column::HumDay,
        hour: Column::HumHour,
    },
    Effect {
        panel: Panel::Windspeed,
        name: "Windspeed",
        day: Column::WindspeedDay,
        hour: Column::WindspeedHour,
    },
];

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the whole dashboard page.
///
/// Tables show the rows in the selected date range; charts always
/// summarise the full table.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        table,
        visible,
        panels,
        palette,
        ..
    } = state;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Bike Sharing Data Analysis");
            ui.add_space(4.0);
            ui.strong("Business Questions:");
            ui.label("• How do environmental conditions affect the number of bicycle rentals?");
            ui.label("• How do seasons, months, and days affect the usage patterns of bike sharing services?");
            ui.separator();

            ui.heading("Sharing Bike in Selected Date:");
            data_table(ui, "daily_table", visible, &DAILY_COLUMNS);

            if toggle_button(ui, panels, Panel::Hourly) {
                ui.label("Hourly data based on a 2-hour time span:");
                data_table(ui, "hourly_table", visible, &HOURLY_COLUMNS);
            }

            if toggle_button(ui, panels, Panel::Condition) {
                ui.label("Condition in Selected Date:");
                data_table(ui, "condition_table", visible, &CONDITION_COLUMNS);
            }
            ui.separator();

            ui.heading("Season, Month, & Day:");
            for breakdown in &CALENDAR_BREAKDOWNS {
                if toggle_button(ui, panels, breakdown.panel) {
                    breakdown_chart(ui, table, breakdown, palette);
                }
            }
            ui.separator();

            ui.heading("Effect of environmental conditions:");
            for effect in &EFFECTS {
                if toggle_button(ui, panels, effect.panel) {
                    effect_charts(ui, table, effect, palette);
                }
            }
            if toggle_button(ui, panels, WEATHER_BREAKDOWN.panel) {
                breakdown_chart(ui, table, &WEATHER_BREAKDOWN, palette);
            }
        });
}

/// A selectable button flipping `panel`; returns whether it is now open.
fn toggle_button(ui: &mut Ui, panels: &mut PanelToggles, panel: Panel) -> bool {
    ui.add_space(4.0);
    if ui
        .selectable_label(panels.is_open(panel), panel.button_label())
        .clicked()
    {
        panels.toggle(panel);
    }
    panels.is_open(panel)
}

fn breakdown_chart(ui: &mut Ui, table: &Table, breakdown: &Breakdown, palette: &ChartPalette) {
    let Some(rows) = query(ui, aggregate_by(table, breakdown.group, breakdown.value, breakdown.reducer))
    else {
        return;
    };
    if let Some(note) = breakdown.note {
        ui.label(note);
    }
    let labels = ChartLabels {
        id: breakdown.title,
        title: breakdown.title,
        x: breakdown.x_label,
        y: &value_axis_label(breakdown.value, Some(breakdown.reducer)),
    };
    bar_chart(ui, &labels, &rows, palette);
}

fn effect_charts(ui: &mut Ui, table: &Table, effect: &Effect, palette: &ChartPalette) {
    let title = format!("{} vs Count", effect.name);

    if let Some(points) = query(ui, pairs(table, effect.day, Column::CntDay)) {
        let id = format!("{}_regression", effect.day);
        let labels = ChartLabels {
            id: &id,
            title: &title,
            x: effect.name,
            y: &value_axis_label(Column::CntDay, None),
        };
        regression_plot(ui, &labels, points, palette);
    }

    let rows: Option<Vec<AggregateRow>> =
        query(ui, aggregate_by(table, effect.hour, Column::CntHour, Reducer::Mean));
    if let Some(rows) = rows {
        let id = format!("{}_mean_line", effect.hour);
        let x = format!("{} (Normalized)", effect.name);
        let labels = ChartLabels {
            id: &id,
            title: &title,
            x: &x,
            y: &value_axis_label(Column::CntHour, Some(Reducer::Mean)),
        };
        line_plot(ui, &labels, &rows, palette);
    }
}

/// Y-axis caption naming the granularity of `value` and how it was reduced.
fn value_axis_label(value: Column, reducer: Option<Reducer>) -> String {
    match (value.granularity(), reducer) {
        (Some(g), Some(r)) => format!("Count ({r} of {} values)", g.label()),
        (Some(g), None) => format!("Count ({})", g.label()),
        (None, _) => "Count".to_string(),
    }
}

/// Show a failed query in place of its chart.
fn query<T>(ui: &mut Ui, result: Result<T, InvalidColumnError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            log::error!("Chart query failed: {e}");
            ui.colored_label(eframe::egui::Color32::RED, e.to_string());
            None
        }
    }
}
