//! Native viewer: runs the [`Engine`] inside an eframe window.
//!
//! Each repaint drains the inbound channel, renders one frame of draw commands
//! into the retained [`Surface`], uploads the surface as an egui texture and
//! paints the readout labels over it.

use std::sync::mpsc::Receiver;

use eframe::egui;
use tracing::{debug, info, warn};

use crate::config::StrokeplotConfig;
use crate::engine::Engine;
use crate::render::Rgba;
use crate::sink::Inbound;
use crate::surface::Surface;

const TEXTURE_NAME: &str = "strokeplot-surface";

fn color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

fn allocate_surface(w: f32, h: f32) -> Option<Surface> {
    let surface = Surface::new(w.ceil() as u32, h.ceil() as u32);
    if surface.is_none() {
        warn!(width = w, height = h, "could not allocate surface; charts hidden");
    }
    surface
}

/// Upload the surface as a texture, reallocating it only when the size changed.
fn upload(
    texture: &mut Option<egui::TextureHandle>,
    surface: &mut Surface,
    ctx: &egui::Context,
) -> egui::TextureId {
    let size = [surface.width() as usize, surface.height() as usize];
    let dirty = surface.take_dirty();
    let stale = texture.as_ref().map_or(true, |t| t.size() != size);
    if stale {
        let image = egui::ColorImage::from_rgba_premultiplied(size, surface.pixels());
        *texture = Some(ctx.load_texture(TEXTURE_NAME, image, egui::TextureOptions::NEAREST));
    } else if dirty {
        if let Some(tex) = texture {
            let image = egui::ColorImage::from_rgba_premultiplied(size, surface.pixels());
            tex.set(image, egui::TextureOptions::NEAREST);
        }
    }
    texture.as_ref().map(|t| t.id()).unwrap_or_default()
}

pub struct StrokeplotApp {
    engine: Engine,
    rx: Receiver<Inbound>,
    /// `None` only if the last allocation failed.
    surface: Option<Surface>,
    texture: Option<egui::TextureHandle>,
    fitted_width: Option<u32>,
    /// Stretch the strips to the window width on resize.
    pub fit_width: bool,
}

impl StrokeplotApp {
    pub fn new(rx: Receiver<Inbound>, config: StrokeplotConfig) -> Self {
        let [w, h] = config.surface_size();
        Self {
            engine: Engine::new(config),
            rx,
            surface: allocate_surface(w, h),
            texture: None,
            fitted_width: None,
            fit_width: true,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Rebuild the surface when the window width changes. The trace restarts
    /// because its history lives only in the old pixels.
    fn fit_to(&mut self, available_width: f32) {
        if !self.fit_width {
            return;
        }
        let width = available_width.floor().max(1.0);
        if self.fitted_width == Some(width as u32) {
            return;
        }
        self.fitted_width = Some(width as u32);
        self.engine.fit_strips_to_width(width);
        self.engine.restart_trace();
        let [w, h] = self.engine.config().surface_size();
        let w = w.max(width);
        debug!(width = w, height = h, "resizing surface");
        self.surface = allocate_surface(w, h);
    }

    fn new_session(&mut self) {
        info!("new session");
        self.engine.new_session();
        if let Some(surface) = &mut self.surface {
            surface.clear();
        }
    }
}

impl eframe::App for StrokeplotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::N)) {
            self.new_session();
        }

        self.engine.pump(&self.rx);

        let background = color32(self.engine.config().palette.background);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(background))
            .show(ctx, |ui| {
                self.fit_to(ui.available_width());

                let commands = self.engine.frame();
                let Some(surface) = self.surface.as_mut() else {
                    return;
                };
                surface.apply(&commands);
                let texture = upload(&mut self.texture, surface, ctx);

                let size = egui::vec2(surface.width() as f32, surface.height() as f32);
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                let painter = ui.painter_at(rect);
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture, rect, uv, egui::Color32::WHITE);
                for label in surface.labels() {
                    painter.text(
                        rect.min + egui::vec2(label.anchor.x, label.anchor.y),
                        egui::Align2::RIGHT_BOTTOM,
                        &label.text,
                        egui::FontId::proportional(label.size),
                        color32(label.color),
                    );
                }
            });

        // Request continuous repainting (~60 fps).
        ctx.request_repaint_after(std::time::Duration::from_millis(16));
    }
}

/// Open a native window and render samples from `rx` until it is closed.
pub fn run_strokeplot(rx: Receiver<Inbound>, config: StrokeplotConfig) -> eframe::Result<()> {
    let [w, h] = config.surface_size();
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("strokeplot")
            .with_inner_size(egui::vec2(w.max(640.0), h.max(240.0) + 16.0)),
        ..Default::default()
    };
    let app = StrokeplotApp::new(rx, config);
    eframe::run_native("strokeplot", opts, Box::new(|_cc| Ok(Box::new(app))))
}
