use std::f64::consts::TAU;

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi, Points, Polygon};

use crate::color::ColorMap;
use crate::data::aggregate::{SumView, ViewEntry};
use crate::report::{format_currency, format_percent};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Placeholders and KPI cards
// ---------------------------------------------------------------------------

/// Shown in the central panel while no dataset is loaded.
pub fn empty_prompt(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading("Open a file to view wages  (File → Open…)");
            if let Some(msg) = &state.status_message {
                ui.add_space(8.0);
                ui.label(RichText::new(msg).color(Color32::RED));
            }
        });
    });
}

/// Total wage bill, company count and department count.
pub fn kpi_cards(ui: &mut Ui, state: &AppState) {
    let k = &state.summary.kpis;
    let cards = [
        ("Total Wage Bill", format_currency(k.total_wage)),
        ("Total Companies", k.companies.to_string()),
        ("Total Departments", k.departments.to_string()),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            col.group(|ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(label);
                ui.label(RichText::new(value).size(26.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Chart grid
// ---------------------------------------------------------------------------

/// Every chart, two per row.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let s = &state.summary;

    ui.columns(2, |cols| {
        titled(&mut cols[0], "Total Wage by Company", |ui| {
            pie_chart(ui, "company_pie", &s.by_company, &state.company_colors, 0.3);
        });
        titled(&mut cols[1], "Total Wage by Department", |ui| {
            bar_chart(ui, "department_bars", &s.by_department, &state.department_colors);
        });
    });

    ui.columns(2, |cols| {
        titled(&mut cols[0], "Monthly Wage", |ui| {
            line_chart(ui, "monthly_line", &s.monthly, Color32::LIGHT_BLUE);
        });
        titled(&mut cols[1], "Month-over-Month Wage Change (%)", |ui| {
            change_chart(ui, "mom_bars", &s.monthly_change);
        });
    });

    ui.columns(2, |cols| {
        titled(&mut cols[0], "Department Wage %", |ui| {
            share_pie(ui, "department_share_pie", &s.department_share, &state.department_colors);
        });
        titled(&mut cols[1], "Quarterly Wage Trend", |ui| {
            line_chart(ui, "quarterly_line", &s.quarterly, Color32::LIGHT_GREEN);
        });
    });
}

fn titled(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.strong(title);
        body(ui);
    });
}

fn no_data(ui: &mut Ui) {
    ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data for the current filters");
        });
    });
}

// ---------------------------------------------------------------------------
// Category axes
// ---------------------------------------------------------------------------

/// Show a plot whose x axis reads `labels[i]` at `x = i`.
fn category_plot(
    ui: &mut Ui,
    id: &str,
    labels: Vec<String>,
    add: impl FnOnce(&mut PlotUi),
) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .show(ui, add);
}

fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn labels_of<T>(view: &[ViewEntry<T>]) -> Vec<String> {
    view.iter().map(|e| e.label.clone()).collect()
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, id: &str, view: &SumView, colors: &ColorMap) {
    if view.is_empty() {
        return no_data(ui);
    }
    let bars: Vec<Bar> = view
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new(i as f64, e.value)
                .name(format!("{}: {}", e.label, format_currency(e.value)))
                .fill(colors.color_for(&e.label))
                .width(0.7)
        })
        .collect();
    category_plot(ui, id, labels_of(view), |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars));
    });
}

fn line_chart(ui: &mut Ui, id: &str, view: &SumView, color: Color32) {
    if view.is_empty() {
        return no_data(ui);
    }
    let points: Vec<[f64; 2]> = view
        .iter()
        .enumerate()
        .map(|(i, e)| [i as f64, e.value])
        .collect();
    category_plot(ui, id, labels_of(view), |plot_ui| {
        plot_ui.line(Line::new(PlotPoints::from(points.clone())).color(color).width(2.0));
        plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(4.0));
    });
}

/// Undefined entries leave a gap; their x slot is kept so bars line up with
/// the monthly chart.
fn change_chart(ui: &mut Ui, id: &str, view: &[ViewEntry<Option<f64>>]) {
    if view.is_empty() {
        return no_data(ui);
    }
    let bars: Vec<Bar> = view
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            let v = e.value?;
            let color = if v < 0.0 {
                Color32::LIGHT_RED
            } else {
                Color32::LIGHT_GREEN
            };
            Some(
                Bar::new(i as f64, v)
                    .name(format!("{}: {}", e.label, format_percent(Some(v))))
                    .fill(color)
                    .width(0.7),
            )
        })
        .collect();
    category_plot(ui, id, labels_of(view), |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars));
    });
}

fn share_pie(ui: &mut Ui, id: &str, view: &[ViewEntry<Option<f64>>], colors: &ColorMap) {
    let slices: SumView = view
        .iter()
        .filter_map(|e| {
            e.value.map(|v| ViewEntry {
                label: e.label.clone(),
                value: v,
            })
        })
        .collect();
    if slices.is_empty() && !view.is_empty() {
        ui.label(format_percent(None));
    }
    pie_chart(ui, id, &slices, colors, 0.0);
}

/// Pie (or donut when `hole > 0`). Slices are drawn as many thin convex
/// wedges because plot polygons are filled as convex shapes.
fn pie_chart(ui: &mut Ui, id: &str, view: &SumView, colors: &ColorMap, hole: f64) {
    let total: f64 = view.iter().map(|e| e.value.max(0.0)).sum();
    if total <= 0.0 {
        return no_data(ui);
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for e in view.iter().filter(|e| e.value > 0.0) {
                let sweep = e.value / total * TAU;
                let name = format!("{} ({:.1}%)", e.label, e.value / total * 100.0);
                let color = colors.color_for(&e.label);
                for wedge in wedges(start, sweep, hole) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(wedge))
                            .name(&name)
                            .fill_color(color)
                            .stroke(Stroke::new(0.0, color)),
                    );
                }
                start += sweep;
            }
        });
}

/// Split an annular sector into convex pieces of at most ~6 degrees.
fn wedges(start: f64, sweep: f64, hole: f64) -> Vec<Vec<[f64; 2]>> {
    // The epsilon keeps exact multiples of the step from gaining a sliver.
    let steps = ((sweep / (TAU / 60.0) - 1e-9).ceil() as usize).max(1);
    let step = sweep / steps as f64;
    // Angles run clockwise from 12 o'clock.
    let at = |r: f64, a: f64| [r * (TAU / 4.0 - a).cos(), r * (TAU / 4.0 - a).sin()];

    (0..steps)
        .map(|i| {
            let a0 = start + step * i as f64;
            let a1 = a0 + step;
            let mut piece = vec![at(1.0, a0), at(1.0, a1)];
            if hole > 0.0 {
                piece.push(at(hole, a1));
                piece.push(at(hole, a0));
            } else {
                piece.push([0.0, 0.0]);
            }
            piece
        })
        .collect()
}
