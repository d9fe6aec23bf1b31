use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::month::MonthOrder;
use crate::report::{constraint_label, export_json};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the options so the state can be mutated inside the widgets.
    let companies = dataset.companies();
    let departments = dataset.departments();
    let dates = dataset.dates();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(choice) =
                selector(ui, "Select Company", &state.selection.company, &companies)
            {
                state.set_company(choice);
            }
            if let Some(choice) = selector(
                ui,
                "Select Department",
                &state.selection.department,
                &departments,
            ) {
                state.set_department(choice);
            }
            if let Some(choice) = selector(ui, "Select Month", &state.selection.date, &dates) {
                state.set_date(choice);
            }

            ui.add_space(8.0);
            if ui
                .add_enabled(
                    !state.selection.is_unconstrained(),
                    egui::Button::new("Clear filters"),
                )
                .clicked()
            {
                state.clear_filters();
            }

            ui.separator();
            ui.strong("Month order");
            let mut order = state.month_order;
            ui.radio_value(&mut order, MonthOrder::Label, "By label");
            ui.radio_value(&mut order, MonthOrder::Chronological, "Chronological");
            if order != state.month_order {
                state.set_month_order(order);
            }
        });
}

/// One "All" + values combo box. Returns the new constraint when the user
/// picked something different.
fn selector(
    ui: &mut Ui,
    title: &str,
    current: &Option<String>,
    options: &[String],
) -> Option<Option<String>> {
    ui.strong(title);
    let mut picked = None;
    egui::ComboBox::from_id_salt(title)
        .selected_text(constraint_label(current))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), "All").clicked() {
                picked = Some(None);
            }
            for opt in options {
                let is_current = current.as_deref() == Some(opt.as_str());
                if ui.selectable_label(is_current, opt).clicked() {
                    picked = Some(Some(opt.clone()));
                }
            }
        });
    ui.add_space(4.0);
    picked.filter(|p| p != current)
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
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export summary…"))
                .clicked()
            {
                save_summary_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.heading("Wage Summary Dashboard");
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
            let missing = ds.missing_wages();
            if missing > 0 {
                ui.label(
                    RichText::new(format!("{missing} non-numeric wages ignored"))
                        .color(Color32::YELLOW),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open wage data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

fn save_summary_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name("wage_summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = export_json(&path, &state.summary, &state.selection, state.month_order) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
