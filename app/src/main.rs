use std::time::Instant;

use eframe::{App, Frame, NativeOptions, egui, run_native};
use egui::{ColorImage, TextureHandle};
use image::RgbImage;
use plasma_core::{
    DisplacementModel, PlasmaConfig, PlasmaFractal,
    displacement::{DEFAULT_ATTENUATION, DEFAULT_INITIAL_MAX},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum DisplacementKind {
    #[default]
    SizeScaled,
    Attenuated,
    Flat,
}

struct PlasmaApp {
    // parameters
    width: u32,
    height: u32,
    seed: u64,
    // draw the seed from the OS instead of using `seed`
    random_seed: bool,
    displacement: DisplacementKind,
    initial_max: f32,
    attenuation: f32,
    parallel: bool,

    // renderer kept across clicks so every click continues the rng stream
    fractal: Option<PlasmaFractal>,
    active_config: Option<PlasmaConfig>,

    // generated texture
    plasma_texture: Option<TextureHandle>,

    // status line
    status_message: String,
    // regenerate on the first frame
    pending: bool,
}

impl PlasmaApp {
    fn from_config(cfg: PlasmaConfig) -> Self {
        let (displacement, initial_max, attenuation) = match cfg.displacement {
            DisplacementModel::SizeScaled => (
                DisplacementKind::SizeScaled,
                DEFAULT_INITIAL_MAX,
                DEFAULT_ATTENUATION,
            ),
            DisplacementModel::Attenuated {
                initial_max,
                attenuation,
            } => (DisplacementKind::Attenuated, initial_max, attenuation),
            DisplacementModel::Flat => (
                DisplacementKind::Flat,
                DEFAULT_INITIAL_MAX,
                DEFAULT_ATTENUATION,
            ),
        };
        Self {
            width: cfg.width,
            height: cfg.height,
            seed: cfg.seed.unwrap_or(2025),
            random_seed: cfg.seed.is_none(),
            displacement,
            initial_max,
            attenuation,
            parallel: cfg.parallel,
            fractal: None,
            active_config: None,
            plasma_texture: None,
            status_message: String::new(),
            pending: true,
        }
    }

    fn config(&self) -> PlasmaConfig {
        let displacement = match self.displacement {
            DisplacementKind::SizeScaled => DisplacementModel::SizeScaled,
            DisplacementKind::Attenuated => DisplacementModel::Attenuated {
                initial_max: self.initial_max,
                attenuation: self.attenuation,
            },
            DisplacementKind::Flat => DisplacementModel::Flat,
        };
        PlasmaConfig {
            width: self.width,
            height: self.height,
            seed: (!self.random_seed).then_some(self.seed),
            displacement,
            parallel: self.parallel,
        }
    }

    // Drop the renderer so the next regeneration starts from the seed again
    fn reset(&mut self) {
        self.fractal = None;
        self.active_config = None;
    }

    fn regenerate(&mut self, ctx: &egui::Context) {
        let cfg = self.config();
        if self.active_config.as_ref() != Some(&cfg) {
            match PlasmaFractal::from_config(&cfg) {
                Ok(fractal) => {
                    self.fractal = Some(fractal);
                    self.active_config = Some(cfg.clone());
                }
                Err(e) => {
                    error!(error = %e, "invalid plasma parameters");
                    self.status_message = format!("Config error: {}", e);
                    return;
                }
            }
        }
        let Some(fractal) = self.fractal.as_mut() else {
            return;
        };

        let canvas = fractal.canvas();
        let model = fractal.displacement();

        let start = Instant::now();
        let mut img = RgbImage::new(canvas.width(), canvas.height());
        let stats = if cfg.parallel {
            fractal.generate_parallel(&mut img)
        } else {
            fractal.generate(&mut img)
        };
        let ms = start.elapsed().as_secs_f32() * 1000.0;

        let size = [canvas.width() as usize, canvas.height() as usize];
        let color_image = ColorImage::from_rgb(size, img.as_raw());
        self.plasma_texture =
            Some(ctx.load_texture("plasma", color_image, egui::TextureOptions::NEAREST));
        self.status_message = format!(
            "Computed in {:.2} ms ({} px, depth {}, {:?})",
            ms, stats.pixels_written, stats.max_depth, model
        );
        info!(
            width = canvas.width(),
            height = canvas.height(),
            model = ?model,
            parallel = cfg.parallel,
            pixels = stats.pixels_written,
            cells = stats.cells_visited,
            depth = stats.max_depth,
            ms,
            "plasma regenerated"
        );
        ctx.request_repaint();
    }
}

impl App for PlasmaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut trigger = std::mem::take(&mut self.pending);

        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Plasma Fractal");
            ui.separator();

            // Canvas size
            ui.label("Width");
            ui.add(egui::Slider::new(&mut self.width, 1..=1024));
            ui.label("Height");
            ui.add(egui::Slider::new(&mut self.height, 1..=1024));

            // Seed
            ui.checkbox(&mut self.random_seed, "Random seed");
            ui.add_enabled_ui(!self.random_seed, |ui| {
                ui.label("Seed");
                ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));
            });

            // Displacement model selector
            ui.label("Displacement");
            egui::ComboBox::from_label("Model")
                .selected_text(format!("{:?}", self.displacement))
                .show_ui(ui, |ui| {
                    ui.selectable_value(
                        &mut self.displacement,
                        DisplacementKind::SizeScaled,
                        "SizeScaled",
                    );
                    ui.selectable_value(
                        &mut self.displacement,
                        DisplacementKind::Attenuated,
                        "Attenuated",
                    );
                    ui.selectable_value(&mut self.displacement, DisplacementKind::Flat, "Flat");
                });
            if self.displacement == DisplacementKind::Attenuated {
                ui.label("Initial amplitude");
                ui.add(egui::Slider::new(&mut self.initial_max, 0.0..=2.0));
                ui.label("Attenuation per level");
                ui.add(egui::Slider::new(&mut self.attenuation, 0.0..=1.0));
            }

            ui.checkbox(&mut self.parallel, "Render quadrants in parallel");

            ui.separator();

            if ui.button("Regenerate").clicked() {
                trigger = true;
            }
            if ui.button("Restart from seed").clicked() {
                self.reset();
                trigger = true;
            }

            ui.separator();
            ui.label(&self.status_message);
        });

        // central display, clicking the image also regenerates
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.plasma_texture {
                let available = ui.available_size();
                let response = ui.add(
                    egui::Image::new((tex.id(), available)).sense(egui::Sense::click()),
                );
                if response.clicked() {
                    trigger = true;
                }
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Regenerate” to start");
                });
            }
        });

        if trigger {
            self.regenerate(ctx);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> eframe::Result<()> {
    init_tracing();

    let cfg = PlasmaConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring PLASMA_* overrides");
        PlasmaConfig::default()
    });

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    run_native(
        "Plasma Fractal",
        opts,
        Box::new(|_cc| Ok(Box::new(PlasmaApp::from_config(cfg)))),
    )
}
