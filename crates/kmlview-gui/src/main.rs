mod loader;
mod map;

use eframe::egui;
use kmlview_core::analysis::AnalysisConfig;
use kmlview_core::report::{LineDetail, SummaryCounts};
use kmlview_core::view::ViewState;
use loader::FileLoader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "KML File Viewer",
        native_options,
        Box::new(|cc| Ok(Box::new(KmlViewApp::new(cc)))),
    )
}

struct KmlViewApp {
    state: ViewState,
    loader: FileLoader,
    cfg: AnalysisConfig,

    input_path: Option<PathBuf>,

    map: map::MapView,

    status: String,
}

impl KmlViewApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: ViewState::new(),
            loader: FileLoader::default(),
            cfg: AnalysisConfig::default(),
            input_path: None,
            map: map::MapView::default(),
            status: "Upload a KML file to begin.".to_string(),
        }
    }

    fn pick_input(&mut self, ctx: &egui::Context) {
        let file = rfd::FileDialog::new()
            .add_filter("KML", &["kml"])
            .pick_file();
        if let Some(path) = file {
            self.start_load(ctx, &path);
        }
    }

    fn start_load(&mut self, ctx: &egui::Context, path: &Path) {
        let repaint = ctx.clone();
        self.loader.start(path, move || repaint.request_repaint());
        self.status = format!("Reading {}…", path.display());
    }

    fn finish_load(&mut self) {
        let Some((path, read)) = self.loader.poll() else {
            return;
        };
        let outcome = read.and_then(|text| kmlview_import_kml::analyze(&text, &self.cfg));
        match &outcome {
            Ok(analysis) => {
                self.status = format!(
                    "Loaded {} ({} features)",
                    path.display(),
                    analysis.collection.features.len()
                );
                self.input_path = Some(path);
                self.map.reset();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), stage = e.stage(), "load failed: {e}");
                self.status = format!("Failed to load {}: {e}", path.display());
            }
        }
        self.state.apply(outcome);
    }

    fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().find(|f| f.path.is_some()) else {
            return;
        };
        if let Some(path) = file.path {
            self.start_load(ctx, &path);
        }
    }
}

impl eframe::App for KmlViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_file_drop(ctx);
        self.finish_load();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.heading("KML File Viewer");
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.loader.is_busy(), egui::Button::new("Upload KML…"))
                    .clicked()
                {
                    self.pick_input(ctx);
                }
                if ui.button("Summary").clicked() {
                    self.state.toggle_summary();
                }
                if ui.button("Details").clicked() {
                    self.state.toggle_details();
                }
                ui.separator();
                if ui
                    .checkbox(
                        &mut self.cfg.descend_into_collections,
                        "Lines inside MultiGeometry",
                    )
                    .changed()
                {
                    if let Some(path) = self.input_path.clone() {
                        self.start_load(ctx, &path);
                    }
                }
            });

            if let Some(p) = &self.input_path {
                ui.label(format!("Input: {}", p.display()));
            }
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = self.state.last_error() {
                    ui.colored_label(egui::Color32::from_rgb(0xC0, 0x39, 0x2B), err.to_string());
                } else {
                    ui.label(&self.status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(summary) = self.state.summary_table() {
                draw_summary(ui, &summary);
                ui.separator();
            }
            if let Some(details) = self.state.details_table() {
                draw_details(ui, details);
                ui.separator();
            }
            if let Some(analysis) = self.state.analysis() {
                ui.collapsing("Raw GeoJSON", |ui| {
                    if let Ok(json) = serde_json::to_string_pretty(&analysis.collection) {
                        egui::ScrollArea::vertical()
                            .max_height(200.0)
                            .show(ui, |ui| {
                                ui.monospace(json);
                            });
                    }
                });
            }

            ui.heading("Map View");
            ui.separator();
            self.map.show(ui, self.state.collection());
        });
    }
}

fn draw_summary(ui: &mut egui::Ui, summary: &SummaryCounts) {
    egui::Grid::new("summary")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui| {
            ui.strong("Element Type");
            ui.strong("Count");
            ui.end_row();
            for (key, count) in summary.rows() {
                ui.label(key);
                ui.label(count.to_string());
                ui.end_row();
            }
        });
}

fn draw_details(ui: &mut egui::Ui, details: &[LineDetail]) {
    egui::ScrollArea::vertical()
        .id_salt("details")
        .max_height(200.0)
        .show(ui, |ui| {
            egui::Grid::new("details")
                .striped(true)
                .num_columns(2)
                .show(ui, |ui| {
                    ui.strong("Type");
                    ui.strong("Length");
                    ui.end_row();
                    for detail in details {
                        ui.label(&detail.kind);
                        ui.label(format!("{:.2}", detail.length));
                        ui.end_row();
                    }
                });
        });
}
