use std::collections::HashSet;
use std::path::PathBuf;

use egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};
use itertools::Itertools;
use log::error;

use pitwall::{
    Dataset, LapRow, PitwallError, ResultRow, TARGET_RACE_NAME, TARGET_SEASON, filter_by_drivers,
    laps_at_lap, prepare_laps, prepare_results, resolve_race,
};

use super::config::AppConfig;
use super::team_color32;

/// Drivers checked by default when a race is first displayed.
const DEFAULT_SELECTED_DRIVERS: usize = 5;

const LAP_CHART_HEIGHT: f32 = 260.0;
const PROGRESSION_CHART_HEIGHT: f32 = 320.0;

pub(crate) struct DashboardApp {
    data_dir: PathBuf,
    config: AppConfig,
    state: UiState,
}

enum UiState {
    Loading,
    Display { view: RaceView },
    Error { message: String },
}

/// Derived tables for the target race plus the interactive widget state
/// that filters them. The tables themselves are never mutated after
/// preparation; interactions only re-run the pure filters.
struct RaceView {
    laps: Vec<LapRow>,
    results: Vec<ResultRow>,
    drivers: Vec<String>,
    selected: HashSet<String>,
    selected_lap: u32,
}

impl RaceView {
    fn build(dataset: &Dataset) -> Result<Self, PitwallError> {
        let race_id = resolve_race(&dataset.races, TARGET_SEASON, TARGET_RACE_NAME)?;
        let laps = prepare_laps(
            &dataset.laps,
            &dataset.drivers,
            &dataset.constructors,
            &dataset.results,
            race_id,
        );
        let results = prepare_results(
            &dataset.results,
            &dataset.drivers,
            &dataset.constructors,
            race_id,
        );

        // The lap table is sorted by driver, so dedup yields each driver once.
        let drivers: Vec<String> = laps.iter().map(|r| r.driver_name.clone()).dedup().collect();
        let selected = drivers
            .iter()
            .take(DEFAULT_SELECTED_DRIVERS)
            .cloned()
            .collect();

        Ok(Self {
            laps,
            results,
            drivers,
            selected,
            selected_lap: 1,
        })
    }
}

impl DashboardApp {
    pub(crate) fn new(data_dir: PathBuf, config: AppConfig, cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            data_dir,
            config,
            state: UiState::Loading,
        }
    }

    fn set_data_dir(&mut self, dir: PathBuf) {
        self.data_dir = dir;
        self.config.data_dir = Some(self.data_dir.clone());
        if let Err(e) = self.config.save() {
            error!("Could not save config file: {}", e);
        }
        self.state = UiState::Loading;
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut picked_dir: Option<PathBuf> = None;
        egui::TopBottomPanel::top("dashboard_top_bar")
            .frame(egui::Frame::new().inner_margin(4))
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.visuals_mut().button_frame = false;
                    ui.strong(format!(
                        "{} {} — Lap Times & Positions",
                        TARGET_SEASON, TARGET_RACE_NAME
                    ));
                    ui.separator();
                    ui.label(format!("Data: {}", self.data_dir.display()));
                    if ui.button("📂 Data folder").clicked()
                        && let Some(path) = rfd::FileDialog::new().pick_folder()
                    {
                        picked_dir = Some(path);
                    }
                });
            });
        if let Some(dir) = picked_dir {
            self.set_data_dir(dir);
        }

        if matches!(self.state, UiState::Loading) {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.label("Loading timing data…");
            });
            self.state = match Dataset::load(&self.data_dir).and_then(|d| RaceView::build(&d)) {
                Ok(view) => UiState::Display { view },
                Err(e) => UiState::Error {
                    message: format!("Could not prepare race data: {}", e),
                },
            };
            ctx.request_repaint();
            return;
        }

        match &mut self.state {
            UiState::Display { view } => {
                egui::SidePanel::left("driver_selector")
                    .resizable(true)
                    .min_width(180.0)
                    .max_width(280.0)
                    .show(ctx, |ui| {
                        show_driver_selector(view, ui);
                    });

                egui::CentralPanel::default().show(ctx, |ui| {
                    show_dashboard(view, ui);
                });
            }
            UiState::Error { message } => {
                let message = message.clone();
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading(RichText::new(message).color(Color32::RED).strong());
                    ui.label("Pick the folder holding the timing CSV exports from the top bar.");
                });
            }
            UiState::Loading => {}
        }
    }
}

fn show_driver_selector(view: &mut RaceView, ui: &mut Ui) {
    ui.label(RichText::new("Drivers").strong());
    ui.horizontal(|ui| {
        if ui.button("All").clicked() {
            view.selected = view.drivers.iter().cloned().collect();
        }
        if ui.button("None").clicked() {
            view.selected.clear();
        }
    });
    ui.separator();
    egui::ScrollArea::vertical().show(ui, |ui| {
        for driver in &view.drivers {
            let mut checked = view.selected.contains(driver);
            if ui.checkbox(&mut checked, driver).changed() {
                if checked {
                    view.selected.insert(driver.clone());
                } else {
                    view.selected.remove(driver);
                }
            }
        }
    });
}

fn show_dashboard(view: &mut RaceView, ui: &mut Ui) {
    let filtered_laps = filter_by_drivers(&view.laps, &view.selected);
    if filtered_laps.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Select at least one driver to display.").strong());
        });
        return;
    }
    let filtered_results = filter_by_drivers(&view.results, &view.selected);

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.label(RichText::new("Lap times by driver (seconds)").strong());
        show_lap_time_chart(&filtered_laps, ui);
        ui.separator();

        ui.label(RichText::new("Positions by driver").strong());
        show_position_chart(&filtered_laps, ui);
        ui.separator();

        ui.label(RichText::new("Race progression").strong());
        show_race_progression(view, &filtered_laps, ui);
        ui.separator();

        ui.label(RichText::new("Race summary").strong());
        show_summary_table(&filtered_results, ui);
    });
}

fn show_lap_time_chart(rows: &[LapRow], ui: &mut Ui) {
    Plot::new("lap_times")
        .height(LAP_CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Lap")
        .y_axis_label("Lap time (s)")
        .show(ui, |plot_ui| {
            for (driver, lap_rows) in &rows.iter().chunk_by(|r| r.driver_name.as_str()) {
                let lap_rows: Vec<&LapRow> = lap_rows.collect();
                let color = team_color32(lap_rows[0].team_color);
                let points = PlotPoints::new(
                    lap_rows
                        .iter()
                        .map(|r| [r.lap as f64, r.lap_time_seconds])
                        .collect(),
                );
                plot_ui.line(Line::new(driver, points).color(color));
            }
        });
}

fn show_position_chart(rows: &[LapRow], ui: &mut Ui) {
    Plot::new("positions")
        .height(LAP_CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Lap")
        .y_axis_label("Position")
        .y_axis_formatter(|mark, _range| {
            let position = -mark.value;
            if position >= 1.0 && position.fract() == 0.0 {
                format!("{position:.0}")
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for (driver, lap_rows) in &rows.iter().chunk_by(|r| r.driver_name.as_str()) {
                let lap_rows: Vec<&LapRow> = lap_rows.collect();
                let color = team_color32(lap_rows[0].team_color);
                // Positions are plotted negated so the leader reads on top.
                let points = PlotPoints::new(
                    lap_rows
                        .iter()
                        .map(|r| [r.lap as f64, -(r.position as f64)])
                        .collect(),
                );
                plot_ui.line(Line::new(driver, points).color(color));
            }
        });
}

fn show_race_progression(view: &mut RaceView, filtered_laps: &[LapRow], ui: &mut Ui) {
    let max_lap = filtered_laps.iter().map(|r| r.lap).max().unwrap_or(1);
    view.selected_lap = view.selected_lap.clamp(1, max_lap);
    ui.add(egui::Slider::new(&mut view.selected_lap, 1..=max_lap).text("Lap"));

    let snapshot = laps_at_lap(filtered_laps, view.selected_lap);
    let count = snapshot.len();
    let mut labels = vec![String::new(); count];
    let bars: Vec<Bar> = snapshot
        .iter()
        .enumerate()
        .map(|(i, row)| {
            // Snapshot is sorted by position; slot the leader at the top.
            let slot = count - 1 - i;
            labels[slot] = row.driver_name.clone();
            Bar::new(slot as f64, row.position as f64)
                .name(&row.driver_name)
                .fill(team_color32(row.team_color))
        })
        .collect();

    Plot::new("race_progression")
        .height(PROGRESSION_CHART_HEIGHT)
        .x_axis_label("Position")
        .y_axis_formatter(move |mark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 0.01 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new("positions_at_lap", bars).horizontal());
        });
}

fn show_summary_table(rows: &[ResultRow], ui: &mut Ui) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Driver");
            });
            header.col(|ui| {
                ui.strong("Team");
            });
            header.col(|ui| {
                ui.strong("Final position");
            });
            header.col(|ui| {
                ui.strong("Best lap (s)");
            });
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.colored_label(team_color32(row.team_color), &row.driver_name);
                    });
                    table_row.col(|ui| {
                        ui.label(&row.team_name);
                    });
                    table_row.col(|ui| {
                        ui.label(
                            row.final_position
                                .map(|p| p.to_string())
                                .unwrap_or_default(),
                        );
                    });
                    table_row.col(|ui| {
                        // Absent best laps render blank, never 0.000.
                        ui.label(
                            row.best_lap_seconds
                                .map(|s| format!("{s:.3}"))
                                .unwrap_or_default(),
                        );
                    });
                });
            }
        });
}
