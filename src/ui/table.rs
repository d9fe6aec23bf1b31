use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::report::format_currency;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Rows passing the current filters, with every column of the source.
pub fn row_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    ui.strong(format!("Filtered rows ({})", state.visible_indices.len()));

    let columns = dataset.column_names();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(360.0)
        .columns(Column::auto().at_least(80.0), columns.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in &columns {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let r = &dataset.rows[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(&r.company);
                });
                row.col(|ui| {
                    ui.label(&r.department);
                });
                row.col(|ui| {
                    ui.label(&r.date);
                });
                row.col(|ui| match r.wage {
                    Some(w) => {
                        ui.label(format_currency(w));
                    }
                    None => {
                        ui.label(RichText::new("N/A").weak());
                    }
                });
                for value in &r.extra {
                    row.col(|ui| {
                        ui.label(value);
                    });
                }
            });
        });
}
