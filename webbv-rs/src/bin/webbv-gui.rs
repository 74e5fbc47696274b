use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use eframe::egui;
use log::{debug, info};
use webbv_rs::application::{init_logging, Cli};
use webbv_rs::calculation::{run_calculation, CalculationRequest, ResultArtifact};
use webbv_rs::exclusions::parse_excluded_atoms;
use webbv_rs::report::{
    archive_file_name, bundle_archive, report_file_name, steric_map_file_name,
};
use webbv_rs::session::{SessionContext, UploadedGeometry};

fn main() -> Result<(), eframe::Error> {
    let cli = Cli::parse();
    init_logging(&cli);
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "WebBV",
        native_options,
        Box::new(|cc| Box::new(WebbvApp::new(cc))),
    )
}

struct NumericField<NumType>
where
    NumType: FromStr + PartialOrd,
{
    label: String,
    default: String,
    raw: String,
    minimum: Option<NumType>,
}

impl<NumType> NumericField<NumType>
where
    NumType: FromStr + PartialOrd,
{
    fn new(label: impl ToString, default: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            default: default.to_string(),
            raw: default.to_string(),
            minimum: None,
        }
    }

    fn with_minimum(mut self, minimum: NumType) -> Self {
        self.minimum = Some(minimum);
        self
    }

    fn convert(&self) -> Result<NumType, ()> {
        let value: NumType = self.raw.trim().parse().map_err(|_| ())?;
        match self.minimum {
            Some(ref minimum) if &value < minimum => Err(()),
            _ => Ok(value),
        }
    }

    fn is_valid(&self) -> bool {
        self.convert().is_ok()
    }

    fn widget(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let text_color;
            if self.is_valid() {
                ui.label(&self.label);
                text_color = None;
            } else {
                ui.label(egui::RichText::new(&self.label).color(egui::Color32::RED));
                text_color = Some(egui::Color32::RED);
            }
            egui::TextEdit::singleline(&mut self.raw)
                .text_color_opt(text_color)
                .show(ui);
            if ui.button("Set to default").clicked() {
                self.raw = self.default.clone();
            }
        });
    }
}

struct WebbvApp {
    session: SessionContext,
    geometry: Option<UploadedGeometry>,
    upload_error: Option<String>,
    center_index: NumericField<usize>,
    z_axis_index: NumericField<usize>,
    xz_plane_index: NumericField<usize>,
    excluded_atoms: String,
    sphere_radius: NumericField<f64>,
    include_hs: bool,
    reverse_z: bool,
    error: Option<String>,
    progress: Option<f32>,
    steric_map_texture: Option<egui::TextureHandle>,
}

impl Default for WebbvApp {
    fn default() -> Self {
        let reference = CalculationRequest::default();
        Self {
            session: SessionContext::new(),
            geometry: None,
            upload_error: None,
            center_index: NumericField::new("Central atom index", reference.center_index),
            z_axis_index: NumericField::new("Z-axis atom index", reference.z_axis_index),
            xz_plane_index: NumericField::new("XZ-plane atom index", reference.xz_plane_index),
            excluded_atoms: String::new(),
            sphere_radius: NumericField::new("Sphere radius (Å)", reference.sphere_radius)
                .with_minimum(0.0),
            include_hs: reference.include_hs,
            reverse_z: reference.reverse_z,
            error: None,
            progress: None,
            steric_map_texture: None,
        }
    }
}

impl WebbvApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    fn upload_section(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Select an XYZ file").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("XYZ geometry", &["xyz"])
                    .pick_file()
                {
                    self.open_geometry(path);
                };
            };
            if let Some(ref geometry) = self.geometry {
                ui.label(
                    egui::RichText::new(format!(
                        "Loaded {}: the molecule contains {} atoms.",
                        geometry.ligand_name, geometry.declared_atom_count
                    ))
                    .color(egui::Color32::DARK_GREEN),
                );
            };
        });
        if let Some(ref error) = self.upload_error {
            ui.label(
                egui::RichText::new(error)
                    .color(egui::Color32::RED)
                    .strong(),
            );
        };
    }

    fn open_geometry(&mut self, path: PathBuf) {
        // A new upload starts a fresh cycle: the previous result and the
        // staging directory go away first.
        self.session.reset();
        self.steric_map_texture = None;
        self.progress = None;
        self.error = None;
        match UploadedGeometry::load(&path) {
            Ok(geometry) => {
                info!(
                    "Loaded {} with {} declared atoms",
                    geometry.ligand_name, geometry.declared_atom_count
                );
                if let Err(error) = self.session.stage_upload(&geometry) {
                    debug!("Could not stage the upload: {error}");
                };
                self.upload_error = None;
                self.geometry = Some(geometry);
            }
            Err(error) => {
                self.geometry = None;
                self.upload_error = Some(format!("{error}"));
            }
        }
    }

    fn parameter_form(&mut self, ui: &mut egui::Ui) {
        let mut header = egui::RichText::new("Parameters");
        if !self.parameters_are_valid() {
            header = header.color(egui::Color32::RED);
        };
        egui::CollapsingHeader::new(header)
            .default_open(true)
            .show(ui, |ui| {
                self.center_index.widget(ui);
                self.z_axis_index.widget(ui);
                self.xz_plane_index.widget(ui);
                ui.horizontal(|ui| {
                    ui.label("Excluded atom indices (comma separated)");
                    ui.text_edit_singleline(&mut self.excluded_atoms);
                });
                self.sphere_radius.widget(ui);
                ui.checkbox(
                    &mut self.include_hs,
                    "Include hydrogen atoms in the calculation",
                );
                ui.checkbox(
                    &mut self.reverse_z,
                    "Draw the view from the opposite direction of the z-axis atom",
                );
            });
    }

    fn parameters_are_valid(&self) -> bool {
        self.center_index.is_valid()
            && self.z_axis_index.is_valid()
            && self.xz_plane_index.is_valid()
            && self.sphere_radius.is_valid()
    }

    fn run_button(&mut self, ui: &mut egui::Ui) {
        let ready = self.geometry.is_some() && self.parameters_are_valid();
        let button = egui::widgets::Button::new("Run calculation");
        if ui.add_enabled(ready, button).clicked() {
            self.start_calculation(ui.ctx());
        }
    }

    fn build_request(&self) -> Result<CalculationRequest, ()> {
        Ok(CalculationRequest {
            center_index: self.center_index.convert()?,
            z_axis_index: self.z_axis_index.convert()?,
            xz_plane_index: self.xz_plane_index.convert()?,
            excluded_atoms: parse_excluded_atoms(&self.excluded_atoms),
            sphere_radius: self.sphere_radius.convert()?,
            include_hs: self.include_hs,
            reverse_z: self.reverse_z,
        })
    }

    fn start_calculation(&mut self, ctx: &egui::Context) {
        self.error = None;
        let Some(ref geometry) = self.geometry else {
            return;
        };
        let Ok(request) = self.build_request() else {
            self.error = Some("An invalid parameter was provided. Check the red fields.".into());
            return;
        };
        info!("Running the calculation for {}", geometry.ligand_name);
        self.progress = Some(0.0);
        match run_calculation(geometry, &request) {
            Ok(artifact) => {
                self.progress = Some(0.8);
                // A short pause so the run does not appear to end before
                // it visibly started.
                std::thread::sleep(Duration::from_millis(300));
                self.steric_map_texture = load_steric_map_texture(ctx, &artifact.steric_map_png);
                self.session.store_result(artifact);
                self.progress = Some(1.0);
            }
            Err(error) => {
                self.progress = None;
                self.error = Some(format!("The calculation failed: {error}"));
            }
        }
    }

    fn error_message(&mut self, ui: &mut egui::Ui) {
        let Some(ref error) = self.error else { return };
        let error_text = egui::RichText::new(error)
            .color(egui::Color32::RED)
            .strong();
        ui.label(error_text);
    }

    fn result_section(&mut self, ui: &mut egui::Ui) {
        if let Some(progress) = self.progress {
            ui.add(egui::ProgressBar::new(progress).show_percentage());
        };
        let Some(result) = self.session.result().cloned() else {
            return;
        };
        ui.separator();
        ui.label(
            egui::RichText::new("Calculation completed!")
                .color(egui::Color32::DARK_GREEN)
                .strong(),
        );
        if let Some(ref texture) = self.steric_map_texture {
            ui.add(
                egui::Image::new(texture).fit_to_exact_size(egui::vec2(360.0, 360.0)),
            );
        };
        ui.label(format!(
            "Buried volume percentage: {:.2}%",
            result.percent_buried_volume()
        ));
        self.save_buttons(ui, &result);
    }

    fn save_buttons(&mut self, ui: &mut egui::Ui, result: &ResultArtifact) {
        ui.horizontal(|ui| {
            if ui.button("Save report").clicked() {
                self.save_bytes(report_file_name(&result.ligand_name), &result.report);
            };
            if ui.button("Save steric map").clicked() {
                self.save_bytes(
                    steric_map_file_name(&result.ligand_name),
                    &result.steric_map_png,
                );
            };
            if ui.button("Save complete results (ZIP)").clicked() {
                match bundle_archive(result) {
                    Ok(archive) => {
                        self.save_bytes(archive_file_name(&result.ligand_name), &archive)
                    }
                    Err(error) => self.error = Some(format!("{error}")),
                };
            };
        });
    }

    fn save_bytes(&mut self, suggested_name: String, bytes: &[u8]) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(suggested_name.as_str())
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, bytes) {
            Ok(()) => info!("Saved {}", path.display()),
            Err(error) => {
                self.error = Some(format!("Could not save {}: {error}", path.display()))
            }
        };
    }
}

fn load_steric_map_texture(ctx: &egui::Context, png: &[u8]) -> Option<egui::TextureHandle> {
    let decoded = match image::load_from_memory(png) {
        Ok(decoded) => decoded.to_rgba8(),
        Err(error) => {
            debug!("Could not decode the steric map: {error}");
            return None;
        }
    };
    let size = [decoded.width() as usize, decoded.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
    Some(ctx.load_texture("steric-map", pixels, egui::TextureOptions::LINEAR))
}

impl eframe::App for WebbvApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("WebBV buried volume calculator");
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.upload_section(ui);
                self.parameter_form(ui);
                self.run_button(ui);
                self.error_message(ui);
                self.result_section(ui);
            });
        });
    }
}
